// crates/fp_grid/src/lib.rs

//! 网格几何模型
//!
//! 描述计算网格的固定数据：行列数、单元地形、入流边界分档、
//! 建筑位置与地板高程。本层只有数据与查找，没有计算逻辑。
//!
//! # 模块
//!
//! - [`grid`]: 网格尺寸与稠密二维场 [`Field2D`]
//! - [`inflow`]: 入流分档 [`InflowBin`] 与入流地形 [`InflowTopo`]
//! - [`building`]: 建筑参考数据
//! - [`geometry`]: 聚合后的 [`GridGeometry`]
//! - [`reference`]: 参考研究区的默认数据

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod building;
pub mod geometry;
pub mod grid;
pub mod inflow;
pub mod reference;

// 重导出常用类型
pub use building::Building;
pub use geometry::GridGeometry;
pub use grid::{Field2D, Grid};
pub use inflow::{InflowBin, InflowBoundary, InflowTopo};
