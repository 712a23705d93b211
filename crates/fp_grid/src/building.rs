// crates/fp_grid/src/building.rs

//! 建筑参考数据
//!
//! 每栋建筑只用一个代表性检查单元来评估淹没；轮廓多边形仅用于
//! 报告和绘图。

use fp_foundation::error::{FpError, FpResult};
use fp_foundation::index::{CellIndex, SourceCell};
use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// 建筑
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// 建筑编号
    pub id: u32,
    /// 地板高程 [m]
    pub floor_elevation: f64,
    /// 检查单元（源数据 1 起始坐标）
    pub check_cell: SourceCell,
    /// 轮廓多边形顶点 `[x, y]`（闭合，仅用于报告）
    #[serde(default)]
    pub footprint: Vec<[f64; 2]>,
}

impl Building {
    /// 创建建筑
    pub fn new(id: u32, floor_elevation: f64, check_cell: SourceCell) -> Self {
        Self {
            id,
            floor_elevation,
            check_cell,
            footprint: Vec::new(),
        }
    }

    /// 设置轮廓
    pub fn with_footprint(mut self, footprint: Vec<[f64; 2]>) -> Self {
        self.footprint = footprint;
        self
    }

    /// 检查单元在网格中的 0 起始索引
    pub fn locate(&self, grid: &Grid) -> FpResult<CellIndex> {
        self.locate_in(grid.rows, grid.cols)
    }

    /// 检查单元在 `rows x cols` 场中的 0 起始索引
    pub fn locate_in(&self, rows: usize, cols: usize) -> FpResult<CellIndex> {
        self.check_cell
            .to_cell(rows, cols)
            .map_err(|_| FpError::CheckCellOutOfRange {
                building_id: self.id,
                row: self.check_cell.row,
                col: self.check_cell.col,
                rows,
                cols,
            })
    }
}
