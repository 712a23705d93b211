// crates/fp_physics/src/postprocess/staggered.rs

//! 交错网格中心化
//!
//! 求解器把地形和水深存放在单元中心，把速度存放在单元面上：
//!
//! ```text
//!        V[i+1, j]
//!       +---------+
//!       |         |
//! U[i,j]|  (i,j)  |U[i,j+1]
//!       |         |
//!       +---------+
//!         V[i, j]
//! ```
//!
//! 中心化步骤：
//!
//! 1. 水深 `<= cutoff` 置零，得到权威水深场
//! 2. 面水深 `<= cutoff` 的面速度置零
//! 3. 取两侧面的平均值
//! 4. `|v| < 1e-4` 置零
//! 5. 干单元的 U、V 严格置零

use fp_foundation::error::{FpError, FpResult};
use fp_foundation::index::{u_face_index, v_face_index, CellIndex};
use fp_grid::{Field2D, Grid};

use crate::constants::VELOCITY_NOISE_FLOOR;

/// 求解器原始输出（全部为行优先展平数组）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOutputs {
    /// 单元地形，`rows * cols`
    pub topo: Vec<f64>,
    /// 单元水深，`rows * cols`
    pub depth: Vec<f64>,
    /// U 面速度，`rows * (cols + 1)`
    pub u_face: Vec<f64>,
    /// V 面速度，`(rows + 1) * cols`
    pub v_face: Vec<f64>,
    /// U 面水深，与 `u_face` 同长
    pub u_face_depth: Vec<f64>,
    /// V 面水深，与 `v_face` 同长
    pub v_face_depth: Vec<f64>,
}

impl RawOutputs {
    /// 校验所有数组长度，在任何计算之前调用
    pub fn check_shapes(&self, grid: &Grid) -> FpResult<()> {
        FpError::check_size("topography", grid.n_cells(), self.topo.len())?;
        FpError::check_size("computed depth", grid.n_cells(), self.depth.len())?;
        FpError::check_size("U face velocity", grid.n_u_faces(), self.u_face.len())?;
        FpError::check_size("V face velocity", grid.n_v_faces(), self.v_face.len())?;
        FpError::check_size("U face depth", grid.n_u_faces(), self.u_face_depth.len())?;
        FpError::check_size("V face depth", grid.n_v_faces(), self.v_face_depth.len())?;
        Ok(())
    }
}

/// 单元中心场
#[derive(Debug, Clone, PartialEq)]
pub struct CellFields {
    /// 地形 [m]
    pub topo: Field2D,
    /// 掩膜后的水深 [m]
    pub depth: Field2D,
    /// 中心化 U [m/s]
    pub u: Field2D,
    /// 中心化 V [m/s]
    pub v: Field2D,
}

#[inline]
fn mask_dry(value: f64, depth: f64, cutoff: f64) -> f64 {
    if depth <= cutoff {
        0.0
    } else {
        value
    }
}

#[inline]
fn floor_noise(v: f64) -> f64 {
    if v.abs() < VELOCITY_NOISE_FLOOR {
        0.0
    } else {
        v
    }
}

/// 将交错网格输出中心化到规则网格
///
/// # 错误
///
/// 任一数组长度与网格不符时返回 [`FpError::SizeMismatch`]，
/// 不进行任何平均。
pub fn reconcile(raw: &RawOutputs, grid: &Grid, depth_cutoff: f64) -> FpResult<CellFields> {
    raw.check_shapes(grid)?;

    let (rows, cols) = (grid.rows, grid.cols);

    let depth: Vec<f64> = raw
        .depth
        .iter()
        .map(|&h| mask_dry(h, h, depth_cutoff))
        .collect();

    let u_face: Vec<f64> = raw
        .u_face
        .iter()
        .zip(&raw.u_face_depth)
        .map(|(&u, &h)| mask_dry(u, h, depth_cutoff))
        .collect();

    let v_face: Vec<f64> = raw
        .v_face
        .iter()
        .zip(&raw.v_face_depth)
        .map(|(&v, &h)| mask_dry(v, h, depth_cutoff))
        .collect();

    let mut u = vec![0.0; grid.n_cells()];
    let mut v = vec![0.0; grid.n_cells()];

    for i in 0..rows {
        for j in 0..cols {
            let k = CellIndex::new(i, j).flat(cols);
            if depth[k] <= depth_cutoff {
                continue;
            }
            let uc = 0.5 * (u_face[u_face_index(i, j, cols)] + u_face[u_face_index(i, j + 1, cols)]);
            let vc = 0.5 * (v_face[v_face_index(i, j, cols)] + v_face[v_face_index(i + 1, j, cols)]);
            u[k] = floor_noise(uc);
            v[k] = floor_noise(vc);
        }
    }

    Ok(CellFields {
        topo: Field2D::from_flat("topography", grid, raw.topo.clone())?,
        depth: Field2D::from_flat("computed depth", grid, depth)?,
        u: Field2D::from_flat("U", grid, u)?,
        v: Field2D::from_flat("V", grid, v)?,
    })
}
