// crates/fp_physics/src/postprocess/metrics.rs

//! 单次运行的标量指标

use serde::{Deserialize, Serialize};

use super::inundation::InundationRecord;
use super::staggered::CellFields;

/// 单次运行的标量指标
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// 各建筑检查单元的最大水深 [m]
    pub max_water_depth: f64,
    /// 各建筑的最大淹没深度 [m]
    pub max_flood_depth: f64,
    /// 全场最大 |U| [m/s]
    ///
    /// 取绝对值后的最大值，不是带符号的最大值；负向流速同样计入。
    pub max_abs_u: f64,
    /// 全场最大 |V| [m/s]，同样取绝对值
    pub max_abs_v: f64,
    /// 全场最大水深 [m]
    pub max_domain_depth: f64,
}

impl RunMetrics {
    /// 由淹没表和中心场提取指标
    pub fn from_parts(records: &[InundationRecord], fields: &CellFields) -> Self {
        Self {
            max_water_depth: records.iter().map(|r| r.water_depth).fold(0.0_f64, f64::max),
            max_flood_depth: records.iter().map(|r| r.flood_depth).fold(0.0_f64, f64::max),
            max_abs_u: fields.u.max_abs(),
            max_abs_v: fields.v.max_abs(),
            max_domain_depth: fields.depth.max(),
        }
    }
}
