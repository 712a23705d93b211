// crates/fp_physics/src/lib.rs

//! FloodPRA 核心算法
//!
//! 两段纯函数算法，构成淹没概率评估中唯一有数值内容的部分：
//!
//! - [`boundary`]: 由标量流量合成入流边界的水深/流速剖面
//! - [`postprocess`]: 交错网格输出的中心化与建筑淹没评估
//!
//! 所有函数都没有隐藏状态，对相同输入给出逐位相同的结果。
//!
//! # 示例
//!
//! ```
//! use fp_grid::reference;
//! use fp_physics::boundary::synthesize;
//!
//! let grid = reference::grid();
//! let inflow = reference::inflow_boundary();
//! let profile = synthesize(250.0, &inflow, &grid).unwrap();
//! assert_eq!(profile.depth[30], 1.0);
//! assert_eq!(profile.depth[39], 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boundary;
pub mod constants;
pub mod postprocess;

// 重导出常用类型
pub use boundary::{synthesize, InflowProfile};
pub use constants::{DEPTH_CUTOFF, UNIT_INFLOW_VELOCITY, VELOCITY_NOISE_FLOOR};
pub use postprocess::{
    evaluate, reconcile, CellFields, InundationRecord, RawOutputs, RunMetrics,
};
