// crates/fp_physics/src/postprocess/inundation.rs

//! 建筑淹没评估
//!
//! 对每栋建筑，在其检查单元上：
//!
//! ```text
//! floor_height = floor_elevation - topo
//! flood_depth  = max(0, water_depth - floor_height)
//! ```

use fp_foundation::error::{FpError, FpResult};
use fp_grid::{Building, Field2D};
use serde::{Deserialize, Serialize};

/// 单栋建筑的淹没记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InundationRecord {
    /// 建筑编号
    pub building_id: u32,
    /// 检查单元行（1 起始，与源数据一致）
    pub row: u32,
    /// 检查单元列（1 起始）
    pub col: u32,
    /// 检查单元地形 [m]
    pub topo_elevation: f64,
    /// 地板高程 [m]
    pub floor_elevation: f64,
    /// 地板高出地面的高度 [m]
    pub floor_height: f64,
    /// 检查单元水深 [m]
    pub water_depth: f64,
    /// 地板以上水深 [m]
    pub flood_depth: f64,
}

/// 地板以上水深，恒非负
#[inline]
pub fn flood_depth(water_depth: f64, floor_height: f64) -> f64 {
    (water_depth - floor_height).max(0.0)
}

/// 逐栋评估淹没
///
/// 输出顺序与 `buildings` 声明顺序一致。
///
/// # 错误
///
/// - 地形与水深尺寸不一致: [`FpError::SizeMismatch`]
/// - 检查单元越界: [`FpError::CheckCellOutOfRange`]
pub fn evaluate(
    buildings: &[Building],
    topo: &Field2D,
    depth: &Field2D,
) -> FpResult<Vec<InundationRecord>> {
    FpError::check_size("depth rows", topo.rows(), depth.rows())?;
    FpError::check_size("depth cols", topo.cols(), depth.cols())?;

    buildings
        .iter()
        .map(|b| {
            let cell = b.locate_in(topo.rows(), topo.cols())?;
            let topo_elevation = topo[cell];
            let water_depth = depth[cell];
            let floor_height = b.floor_elevation - topo_elevation;
            Ok(InundationRecord {
                building_id: b.id,
                row: b.check_cell.row,
                col: b.check_cell.col,
                topo_elevation,
                floor_elevation: b.floor_elevation,
                floor_height,
                water_depth,
                flood_depth: flood_depth(water_depth, floor_height),
            })
        })
        .collect()
}
