// crates/fp_foundation/src/lib.rs

//! FloodPRA Foundation Layer
//!
//! 基础层，提供整个项目共用的错误类型和网格索引换算。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型与错误分类（配置/形状/外部工具/IO）
//! - [`index`]: 单元索引、1 基源数据坐标与交错网格面索引
//!
//! # 示例
//!
//! ```
//! use fp_foundation::index::SourceCell;
//!
//! // 源数据中的 (1, 1) 对应内部数组的 (0, 0)
//! let cell = SourceCell::new(1, 1).to_cell(200, 70).unwrap();
//! assert_eq!((cell.row, cell.col), (0, 0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod index;

// 重导出常用类型
pub use error::{ErrorKind, FpError, FpResult};
pub use index::{CellIndex, SourceCell};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{ErrorKind, FpError, FpResult};
    pub use crate::index::{u_face_index, v_face_index, CellIndex, SourceCell};
}
