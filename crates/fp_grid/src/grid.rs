// crates/fp_grid/src/grid.rs

//! 网格尺寸与稠密二维场
//!
//! 所有按 `(rows, cols)` 索引的数组都必须与 [`Grid`] 完全一致，
//! 尺寸不符是硬错误。

use fp_foundation::error::{FpError, FpResult};
use fp_foundation::index::CellIndex;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// 规则矩形网格
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// 行数
    pub rows: usize,
    /// 列数
    pub cols: usize,
    /// 单元边长 [m]
    pub cell_length: f64,
}

impl Grid {
    /// 创建网格
    pub fn new(rows: usize, cols: usize, cell_length: f64) -> Self {
        Self {
            rows,
            cols,
            cell_length,
        }
    }

    /// 单元总数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.rows * self.cols
    }

    /// U 面数量（竖直面，`rows x (cols + 1)`）
    #[inline]
    pub fn n_u_faces(&self) -> usize {
        self.rows * (self.cols + 1)
    }

    /// V 面数量（水平面，`(rows + 1) x cols`）
    #[inline]
    pub fn n_v_faces(&self) -> usize {
        (self.rows + 1) * self.cols
    }

    /// 单元是否在网格内
    #[inline]
    pub fn contains(&self, cell: CellIndex) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// 校验网格参数
    pub fn validate(&self) -> FpResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(FpError::invalid_config(
                "grid",
                format!("{}x{}", self.rows, self.cols),
                "行列数必须为正",
            ));
        }
        if !(self.cell_length.is_finite() && self.cell_length > 0.0) {
            return Err(FpError::invalid_config(
                "grid.cell_length",
                self.cell_length.to_string(),
                "单元边长必须为正",
            ));
        }
        Ok(())
    }
}

/// 行优先存储的稠密二维场
#[derive(Debug, Clone, PartialEq)]
pub struct Field2D {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Field2D {
    /// 创建全零场
    pub fn zeros(grid: &Grid) -> Self {
        Self {
            rows: grid.rows,
            cols: grid.cols,
            data: vec![0.0; grid.n_cells()],
        }
    }

    /// 从展平数据创建，长度必须等于 `rows * cols`
    pub fn from_flat(name: &'static str, grid: &Grid, data: Vec<f64>) -> FpResult<Self> {
        FpError::check_size(name, grid.n_cells(), data.len())?;
        Ok(Self {
            rows: grid.rows,
            cols: grid.cols,
            data,
        })
    }

    /// 行数
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// 列数
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// 获取单元值
    #[inline]
    pub fn get(&self, cell: CellIndex) -> Option<f64> {
        if cell.row < self.rows && cell.col < self.cols {
            Some(self.data[cell.flat(self.cols)])
        } else {
            None
        }
    }

    /// 设置单元值，越界时忽略
    #[inline]
    pub fn set(&mut self, cell: CellIndex, value: f64) {
        if cell.row < self.rows && cell.col < self.cols {
            let i = cell.flat(self.cols);
            self.data[i] = value;
        }
    }

    /// 展平数据
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// 可变展平数据
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// 取出展平数据
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// 最大值（空场为 0）
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0_f64, f64::max)
    }

    /// 最大绝对值
    pub fn max_abs(&self) -> f64 {
        self.data.iter().map(|v| v.abs()).fold(0.0_f64, f64::max)
    }

    /// 是否与网格尺寸一致
    pub fn matches(&self, grid: &Grid) -> bool {
        self.rows == grid.rows && self.cols == grid.cols
    }
}

impl Index<CellIndex> for Field2D {
    type Output = f64;

    fn index(&self, cell: CellIndex) -> &f64 {
        assert!(
            cell.row < self.rows && cell.col < self.cols,
            "cell {} outside {}x{} field",
            cell,
            self.rows,
            self.cols
        );
        &self.data[cell.flat(self.cols)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_counts() {
        let grid = Grid::new(200, 70, 5.0);
        assert_eq!(grid.n_cells(), 14_000);
        assert_eq!(grid.n_u_faces(), 14_200);
        assert_eq!(grid.n_v_faces(), 14_070);
    }

    #[test]
    fn test_from_flat_size_mismatch() {
        let grid = Grid::new(2, 3, 1.0);
        assert!(Field2D::from_flat("topo", &grid, vec![0.0; 6]).is_ok());
        let err = Field2D::from_flat("topo", &grid, vec![0.0; 5]).unwrap_err();
        assert!(matches!(
            err,
            FpError::SizeMismatch {
                expected: 6,
                actual: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_row_major_layout() {
        let grid = Grid::new(2, 3, 1.0);
        let field =
            Field2D::from_flat("depth", &grid, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(field[CellIndex::new(0, 2)], 2.0);
        assert_eq!(field[CellIndex::new(1, 0)], 3.0);
        assert_eq!(field.get(CellIndex::new(2, 0)), None);
    }

    #[test]
    fn test_max_abs() {
        let grid = Grid::new(1, 3, 1.0);
        let field = Field2D::from_flat("u", &grid, vec![0.5, -2.0, 1.0]).unwrap();
        assert_eq!(field.max(), 1.0);
        assert_eq!(field.max_abs(), 2.0);
    }

    #[test]
    fn test_validate() {
        assert!(Grid::new(200, 70, 5.0).validate().is_ok());
        assert!(Grid::new(0, 70, 5.0).validate().is_err());
        assert!(Grid::new(200, 70, 0.0).validate().is_err());
    }
}
