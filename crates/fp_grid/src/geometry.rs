// crates/fp_grid/src/geometry.rs

//! 网格几何聚合
//!
//! 每个进程加载一次，之后只读。

use fp_foundation::error::{FpError, FpResult};
use fp_foundation::index::CellIndex;
use std::collections::HashSet;

use crate::building::Building;
use crate::grid::Grid;
use crate::inflow::InflowBoundary;
use crate::reference;

/// 网格几何：网格、入流边界、建筑
#[derive(Debug, Clone)]
pub struct GridGeometry {
    grid: Grid,
    inflow: InflowBoundary,
    buildings: Vec<Building>,
    check_cells: Vec<CellIndex>,
}

impl GridGeometry {
    /// 创建并校验几何
    ///
    /// 建筑检查单元在此处一次性换算为 0 起始索引。
    pub fn new(grid: Grid, inflow: InflowBoundary, buildings: Vec<Building>) -> FpResult<Self> {
        grid.validate()?;
        inflow.validate(&grid)?;

        let mut seen = HashSet::with_capacity(buildings.len());
        for b in &buildings {
            if !seen.insert(b.id) {
                return Err(FpError::invalid_config(
                    "buildings.id",
                    b.id.to_string(),
                    "建筑编号重复",
                ));
            }
        }

        let check_cells = buildings
            .iter()
            .map(|b| b.locate(&grid))
            .collect::<FpResult<Vec<_>>>()?;

        Ok(Self {
            grid,
            inflow,
            buildings,
            check_cells,
        })
    }

    /// 参考研究区
    pub fn reference() -> FpResult<Self> {
        Self::new(
            reference::grid(),
            reference::inflow_boundary(),
            reference::buildings(),
        )
    }

    /// 网格
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// 入流边界
    #[inline]
    pub fn inflow(&self) -> &InflowBoundary {
        &self.inflow
    }

    /// 建筑（声明顺序）
    #[inline]
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    /// 与 [`Self::buildings`] 一一对应的 0 起始检查单元
    #[inline]
    pub fn check_cells(&self) -> &[CellIndex] {
        &self.check_cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_foundation::index::SourceCell;

    #[test]
    fn test_reference_geometry() {
        let geo = GridGeometry::reference().unwrap();
        assert_eq!(geo.buildings().len(), 44);
        assert_eq!(geo.check_cells().len(), 44);
        assert_eq!(geo.check_cells()[0], CellIndex::new(112, 24));
    }

    #[test]
    fn test_duplicate_building_id() {
        let mut buildings = reference::buildings();
        buildings[1].id = buildings[0].id;
        let result = GridGeometry::new(reference::grid(), reference::inflow_boundary(), buildings);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_cell_outside_grid() {
        let mut buildings = reference::buildings();
        buildings.push(Building::new(99, 100.0, SourceCell::new(201, 1)));
        let result = GridGeometry::new(reference::grid(), reference::inflow_boundary(), buildings);
        assert!(matches!(
            result,
            Err(FpError::CheckCellOutOfRange { building_id: 99, .. })
        ));
    }
}
