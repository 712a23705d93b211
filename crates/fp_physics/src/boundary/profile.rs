// crates/fp_physics/src/boundary/profile.rs

//! 入流剖面

use fp_foundation::error::{FpError, FpResult};
use fp_grid::{Grid, InflowBoundary};

use crate::constants::UNIT_INFLOW_VELOCITY;

/// 入流边界剖面，长度均为 `grid.cols`
#[derive(Debug, Clone, PartialEq)]
pub struct InflowProfile {
    /// 选中的分档序号
    pub bin_index: usize,
    /// 单宽项 `(Q - low) / (n * dx)`
    pub top_height: f64,
    /// 入流水深剖面
    pub depth: Vec<f64>,
    /// 入流流速剖面
    pub velocity: Vec<f64>,
}

impl InflowProfile {
    /// 非零列（活动列）
    pub fn active_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.velocity
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(c, _)| c)
    }
}

/// 由流量合成入流剖面
///
/// 先完成全部计算再返回，出错时不产生任何部分剖面。
///
/// # 错误
///
/// - [`FpError::NoMatchingBin`]: 没有分档包含该流量
/// - [`FpError::InvalidConfig`]: 活动列超出网格或缺少入流高程
pub fn synthesize(discharge: f64, inflow: &InflowBoundary, grid: &Grid) -> FpResult<InflowProfile> {
    let (bin_index, bin) = inflow.select(discharge)?;

    let n = bin.len();
    let first = *bin.cells.first().ok_or_else(|| {
        FpError::invalid_config(
            format!("inflow.bins[{}].cells", bin_index),
            "[]",
            "分档必须至少包含一个活动列",
        )
    })?;

    let top_height = (discharge - bin.discharge_low) / (n as f64 * grid.cell_length);
    let ref_elev = inflow.topography.elevation(first)?;

    let mut depth = vec![0.0; grid.cols];
    let mut velocity = vec![0.0; grid.cols];

    for (c, &col) in bin.cells.iter().enumerate() {
        if col >= grid.cols {
            return Err(FpError::invalid_config(
                format!("inflow.bins[{}].cells", bin_index),
                col.to_string(),
                format!("列号超出网格 0..{}", grid.cols),
            ));
        }
        depth[col] = if c == 0 || c == n - 1 {
            top_height
        } else {
            (ref_elev - inflow.topography.elevation(col)?) + top_height
        };
        velocity[col] = UNIT_INFLOW_VELOCITY;
    }

    tracing::debug!(
        "Inflow profile: Q={:.2}, bin={}, n={}, top_height={:.4}",
        discharge,
        bin_index,
        n,
        top_height
    );

    Ok(InflowProfile {
        bin_index,
        top_height,
        depth,
        velocity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_grid::{reference, InflowBin, InflowTopo};

    #[test]
    fn test_scenario_a() {
        let grid = reference::grid();
        let inflow = reference::inflow_boundary();
        let p = synthesize(250.0, &inflow, &grid).unwrap();

        assert_eq!(p.bin_index, 1);
        assert_eq!(p.top_height, 1.0);
        assert_eq!(p.depth[30], 1.0);
        assert_eq!(p.depth[39], 1.0);
        // 第 31 列：107.5 - 105.0 + 1.0
        assert!((p.depth[31] - 3.5).abs() < 1e-12);
        // 最低点第 34 列：107.5 - 100.0 + 1.0
        assert!((p.depth[34] - 8.5).abs() < 1e-12);
        assert_eq!(p.depth[29], 0.0);
        assert_eq!(p.depth[40], 0.0);
    }

    #[test]
    fn test_velocity_is_unit_on_active_set() {
        let grid = reference::grid();
        let inflow = reference::inflow_boundary();
        let p = synthesize(150.0, &inflow, &grid).unwrap();

        let active: Vec<usize> = p.active_columns().collect();
        assert_eq!(active, (31..=38).collect::<Vec<_>>());
        for (c, &v) in p.velocity.iter().enumerate() {
            if (31..=38).contains(&c) {
                assert_eq!(v, 1.0);
            } else {
                assert_eq!(v, 0.0);
            }
        }
    }

    #[test]
    fn test_scenario_d_zero_discharge() {
        let grid = reference::grid();
        let inflow = reference::inflow_boundary();
        let err = synthesize(0.0, &inflow, &grid).unwrap_err();
        assert!(matches!(err, FpError::NoMatchingBin { .. }));
    }

    #[test]
    fn test_single_column_bin() {
        let grid = Grid::new(4, 3, 2.0);
        let topo: InflowTopo = [(1, 50.0)].into_iter().collect();
        let inflow = InflowBoundary::new(vec![InflowBin::new(10.0, 0.0, 50.0, vec![1])], topo);
        let p = synthesize(4.0, &inflow, &grid).unwrap();
        assert_eq!(p.depth, vec![0.0, 2.0, 0.0]);
        assert_eq!(p.velocity, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_missing_topography_is_error() {
        let grid = Grid::new(4, 4, 1.0);
        let topo: InflowTopo = [(0, 10.0), (3, 10.0)].into_iter().collect();
        let inflow =
            InflowBoundary::new(vec![InflowBin::new(10.0, 0.0, 10.0, vec![0, 1, 3])], topo);
        assert!(synthesize(5.0, &inflow, &grid).is_err());
    }
}
