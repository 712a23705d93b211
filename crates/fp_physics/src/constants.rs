// crates/fp_physics/src/constants.rs

//! 全局数值常量
//!
//! 这些值属于研究定义的一部分，不是单次运行的配置项。

/// 干湿判定水深阈值 [m]，小于等于该值视为干
pub const DEPTH_CUTOFF: f64 = 0.01;

/// 中心化流速噪声下限 [m/s]，绝对值小于该值置零
pub const VELOCITY_NOISE_FLOOR: f64 = 1e-4;

/// 入流活动列上的固定流速 [m/s]（不随流量缩放）
pub const UNIT_INFLOW_VELOCITY: f64 = 1.0;
