// crates/fp_foundation/src/index.rs

//! 网格索引系统
//!
//! 源数据（建筑检查单元、卡片说明）使用 1 起始的 `(row, col)`，
//! 内部数组统一使用 0 起始。两者之间的换算只在
//! [`SourceCell::to_cell`] 一处进行。
//!
//! 交错网格上的面速度按面网格行优先展平：
//!
//! - U 位于竖直面，面网格为 `rows x (cols + 1)`
//! - V 位于水平面，面网格为 `(rows + 1) x cols`
//!
//! # 示例
//!
//! ```
//! use fp_foundation::index::{u_face_index, v_face_index};
//!
//! // 单元 (1, 2) 在 70 列网格上的左右 U 面与上下 V 面
//! assert_eq!(u_face_index(1, 2, 70), 73);
//! assert_eq!(u_face_index(1, 3, 70), 74);
//! assert_eq!(v_face_index(1, 2, 70), 72);
//! assert_eq!(v_face_index(2, 2, 70), 142);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FpError, FpResult};

/// 0 起始的单元索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellIndex {
    /// 行（0 起始）
    pub row: usize,
    /// 列（0 起始）
    pub col: usize,
}

impl CellIndex {
    /// 创建单元索引
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// 行优先展平索引
    #[inline]
    pub const fn flat(self, cols: usize) -> usize {
        self.row * cols + self.col
    }

    /// 换回源数据坐标
    #[inline]
    pub fn to_source(self) -> SourceCell {
        SourceCell::new(self.row as u32 + 1, self.col as u32 + 1)
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

/// 源数据中的 1 起始单元坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceCell {
    /// 行（1 起始）
    pub row: u32,
    /// 列（1 起始）
    pub col: u32,
}

impl SourceCell {
    /// 创建源数据坐标
    #[inline]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// 是否落在 `rows x cols` 网格内
    #[inline]
    pub fn is_within(self, rows: usize, cols: usize) -> bool {
        self.row >= 1 && self.col >= 1 && self.row as usize <= rows && self.col as usize <= cols
    }

    /// 转换为 0 起始的单元索引
    ///
    /// 项目中唯一的坐标原点换算点。`0` 或大于网格尺寸的坐标返回
    /// [`FpError::InvalidConfig`]；带建筑编号的报错由调用方补充。
    pub fn to_cell(self, rows: usize, cols: usize) -> FpResult<CellIndex> {
        if !self.is_within(rows, cols) {
            return Err(FpError::invalid_config(
                "cell",
                self.to_string(),
                format!("超出网格 1..={} x 1..={}", rows, cols),
            ));
        }
        Ok(CellIndex::new(self.row as usize - 1, self.col as usize - 1))
    }
}

impl fmt::Display for SourceCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 单元 `(row, col)` 左侧 U 面的展平索引；右侧面为 `col + 1`
#[inline]
pub const fn u_face_index(row: usize, col: usize, cols: usize) -> usize {
    row * (cols + 1) + col
}

/// 单元 `(row, col)` 下侧 V 面的展平索引；上侧面为 `row + 1`
#[inline]
pub const fn v_face_index(row: usize, col: usize, cols: usize) -> usize {
    row * cols + col
}
