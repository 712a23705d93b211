// crates/fp_grid/src/inflow.rs

//! 入流边界分档
//!
//! 每个分档覆盖一个左开右闭的流量区间 `(low, high]`，并给出该区间
//! 内入流边界上的活动列。分档按声明顺序扫描，首个匹配者胜出。

use fp_foundation::error::{FpError, FpResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::grid::Grid;

/// 流量分档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflowBin {
    /// 区间上界（闭）[m³/s]
    pub discharge_high: f64,
    /// 区间下界（开）[m³/s]
    pub discharge_low: f64,
    /// 参考水面高程 [m]，仅作记录
    pub reference_elevation: f64,
    /// 活动列（0 起始，有序）
    pub cells: Vec<usize>,
}

impl InflowBin {
    /// 创建分档
    pub fn new(
        discharge_high: f64,
        discharge_low: f64,
        reference_elevation: f64,
        cells: Vec<usize>,
    ) -> Self {
        Self {
            discharge_high,
            discharge_low,
            reference_elevation,
            cells,
        }
    }

    /// 流量是否落在 `(low, high]` 内
    #[inline]
    pub fn contains(&self, discharge: f64) -> bool {
        discharge > self.discharge_low && discharge <= self.discharge_high
    }

    /// 活动列数量
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// 是否没有活动列
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// 入流边界列的床面高程（列号 -> 高程）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InflowTopo(BTreeMap<usize, f64>);

impl InflowTopo {
    /// 创建空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入列高程
    pub fn insert(&mut self, col: usize, elevation: f64) {
        self.0.insert(col, elevation);
    }

    /// 查询列高程
    #[inline]
    pub fn get(&self, col: usize) -> Option<f64> {
        self.0.get(&col).copied()
    }

    /// 查询列高程，缺失时返回配置错误
    pub fn elevation(&self, col: usize) -> FpResult<f64> {
        self.get(col).ok_or_else(|| {
            FpError::invalid_config("inflow.topography", col.to_string(), "缺少该入流列的高程")
        })
    }

    /// 列数
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 按列号遍历
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().map(|(&c, &z)| (c, z))
    }
}

impl FromIterator<(usize, f64)> for InflowTopo {
    fn from_iter<I: IntoIterator<Item = (usize, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 完整的入流边界描述：有序分档 + 入流地形
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflowBoundary {
    /// 有序分档
    pub bins: Vec<InflowBin>,
    /// 入流列高程
    pub topography: InflowTopo,
}

impl InflowBoundary {
    /// 创建入流边界
    pub fn new(bins: Vec<InflowBin>, topography: InflowTopo) -> Self {
        Self { bins, topography }
    }

    /// 选择包含该流量的分档，返回 `(分档序号, 分档)`
    ///
    /// 恰好等于某档上界的流量属于该档（下档）。没有匹配时返回
    /// [`FpError::NoMatchingBin`]。
    pub fn select(&self, discharge: f64) -> FpResult<(usize, &InflowBin)> {
        self.bins
            .iter()
            .enumerate()
            .find(|(_, bin)| bin.contains(discharge))
            .ok_or_else(|| FpError::no_matching_bin(discharge))
    }

    /// 分档覆盖的流量区间 `(min low, max high]`
    pub fn discharge_range(&self) -> Option<(f64, f64)> {
        let low = self
            .bins
            .iter()
            .map(|b| b.discharge_low)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))));
        let high = self
            .bins
            .iter()
            .map(|b| b.discharge_high)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));
        low.zip(high)
    }

    /// 校验分档
    ///
    /// - 至少一个分档，每档至少一个活动列
    /// - `low < high`，按声明顺序首尾相接（`bins[i].high == bins[i+1].low`）
    /// - 活动列在网格内，且都有入流高程
    pub fn validate(&self, grid: &Grid) -> FpResult<()> {
        if self.bins.is_empty() {
            return Err(FpError::config("入流边界没有定义任何流量分档"));
        }

        for (i, bin) in self.bins.iter().enumerate() {
            if !(bin.discharge_low < bin.discharge_high) {
                return Err(FpError::invalid_config(
                    format!("inflow.bins[{}]", i),
                    format!("({}, {}]", bin.discharge_low, bin.discharge_high),
                    "下界必须小于上界",
                ));
            }
            if bin.is_empty() {
                return Err(FpError::invalid_config(
                    format!("inflow.bins[{}].cells", i),
                    "[]",
                    "分档必须至少包含一个活动列",
                ));
            }
            for &col in &bin.cells {
                if col >= grid.cols {
                    return Err(FpError::invalid_config(
                        format!("inflow.bins[{}].cells", i),
                        col.to_string(),
                        format!("列号超出网格 0..{}", grid.cols),
                    ));
                }
                self.topography.elevation(col)?;
            }
        }

        for (i, pair) in self.bins.windows(2).enumerate() {
            if pair[0].discharge_high != pair[1].discharge_low {
                return Err(FpError::invalid_config(
                    format!("inflow.bins[{}]", i + 1),
                    format!("({}, {}]", pair[1].discharge_low, pair[1].discharge_high),
                    format!("必须紧接上一档的上界 {}", pair[0].discharge_high),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference;

    fn two_bins() -> InflowBoundary {
        let topo: InflowTopo = (0..6).map(|c| (c, 100.0 + c as f64)).collect();
        InflowBoundary::new(
            vec![
                InflowBin::new(200.0, 100.0, 0.0, vec![1, 2]),
                InflowBin::new(325.0, 200.0, 0.0, vec![0, 1, 2, 3]),
            ],
            topo,
        )
    }

    #[test]
    fn test_half_open_interval() {
        let bin = InflowBin::new(325.0, 200.0, 110.0, vec![30]);
        assert!(!bin.contains(200.0));
        assert!(bin.contains(200.0001));
        assert!(bin.contains(325.0));
        assert!(!bin.contains(325.0001));
    }

    #[test]
    fn test_shared_edge_goes_to_lower_bin() {
        let inflow = two_bins();
        let (idx, _) = inflow.select(200.0).unwrap();
        assert_eq!(idx, 0);
        let (idx, _) = inflow.select(200.5).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_no_bin_is_configuration_error() {
        let inflow = two_bins();
        let err = inflow.select(100.0).unwrap_err();
        assert!(matches!(err, FpError::NoMatchingBin { .. }));
        assert!(inflow.select(400.0).is_err());
    }

    #[test]
    fn test_discharge_range() {
        assert_eq!(two_bins().discharge_range(), Some((100.0, 325.0)));
        let empty = InflowBoundary::new(vec![], InflowTopo::new());
        assert_eq!(empty.discharge_range(), None);
    }

    #[test]
    fn test_validate_gap_between_bins() {
        let grid = Grid::new(10, 6, 5.0);
        let mut inflow = two_bins();
        assert!(inflow.validate(&grid).is_ok());
        inflow.bins[1].discharge_low = 210.0;
        assert!(inflow.validate(&grid).is_err());
    }

    #[test]
    fn test_validate_missing_topography() {
        let grid = Grid::new(10, 6, 5.0);
        let mut inflow = two_bins();
        inflow.bins[0].cells.push(5);
        let topo: InflowTopo = (0..5).map(|c| (c, 100.0)).collect();
        inflow.topography = topo;
        assert!(inflow.validate(&grid).is_err());
    }

    #[test]
    fn test_validate_column_outside_grid() {
        let grid = Grid::new(10, 3, 5.0);
        assert!(two_bins().validate(&grid).is_err());
    }

    #[test]
    fn test_reference_bins_are_valid() {
        let grid = reference::grid();
        assert!(reference::inflow_boundary().validate(&grid).is_ok());
    }

    #[test]
    fn test_topography_json_keys() {
        let topo: InflowTopo = [(28, 111.667), (35, 100.0)].into_iter().collect();
        let json = serde_json::to_string(&topo).unwrap();
        let parsed: InflowTopo = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.get(28), Some(111.667));
        assert_eq!(parsed.len(), 2);
    }
}
