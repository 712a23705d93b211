// crates/fp_physics/src/postprocess/mod.rs

//! 求解器输出后处理
//!
//! # 子模块
//!
//! - [`staggered`]: 交错网格 -> 单元中心场（干湿掩膜、面速度平均、噪声截断）
//! - [`inundation`]: 建筑检查单元上的淹没深度
//! - [`metrics`]: 单次运行的标量指标
//!
//! 数据流：`RawOutputs -> reconcile -> CellFields -> evaluate -> InundationRecord`

pub mod inundation;
pub mod metrics;
pub mod staggered;

pub use inundation::{evaluate, flood_depth, InundationRecord};
pub use metrics::RunMetrics;
pub use staggered::{reconcile, CellFields, RawOutputs};
