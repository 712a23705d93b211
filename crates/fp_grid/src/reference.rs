// crates/fp_grid/src/reference.rs

//! 参考研究区数据
//!
//! 200 x 70 网格（5 m 单元），上游入流边界位于第 28..=41 列，
//! 44 栋建筑分四排沿河道两侧布置。配置层以这些数据作为默认值。

use fp_foundation::index::SourceCell;

use crate::building::Building;
use crate::grid::Grid;
use crate::inflow::{InflowBin, InflowBoundary, InflowTopo};

/// 参考网格行数
pub const ROWS: usize = 200;
/// 参考网格列数
pub const COLS: usize = 70;
/// 参考单元边长 [m]
pub const CELL_LENGTH: f64 = 5.0;

/// 入流列高程（0 起始列号）
const INFLOW_TOPO: [(usize, f64); 14] = [
    (28, 111.667),
    (29, 110.000),
    (30, 107.500),
    (31, 105.000),
    (32, 103.333),
    (33, 101.667),
    (34, 100.000),
    (35, 100.000),
    (36, 101.667),
    (37, 103.333),
    (38, 105.000),
    (39, 107.500),
    (40, 110.000),
    (41, 111.667),
];

/// 外侧两排（第 25、45 列）地板高程，按行自上游向下游
const FLOOR_OUTER: [f64; 11] = [
    109.633, 109.383, 109.133, 108.883, 108.633, 108.383, 108.133, 107.883, 107.633, 107.383,
    107.133,
];

/// 内侧两排（第 29、41 列）地板高程
const FLOOR_INNER: [f64; 11] = [
    104.300, 104.050, 103.800, 103.550, 103.300, 103.050, 102.800, 102.550, 102.300, 102.050,
    101.800,
];

/// 第一栋建筑检查单元所在行（1 起始）
const FIRST_CHECK_ROW: u32 = 113;
/// 相邻建筑的行距
const CHECK_ROW_STEP: u32 = 5;
/// 第一栋建筑轮廓的南侧 y 坐标 [m]
const FIRST_FOOTPRINT_Y: f64 = 555.0;
/// 相邻建筑轮廓的 y 间距 [m]
const FOOTPRINT_Y_STEP: f64 = 25.0;

/// 参考网格
pub fn grid() -> Grid {
    Grid::new(ROWS, COLS, CELL_LENGTH)
}

/// 参考入流地形
pub fn inflow_topo() -> InflowTopo {
    INFLOW_TOPO.iter().copied().collect()
}

/// 参考入流分档
pub fn inflow_bins() -> Vec<InflowBin> {
    vec![
        InflowBin::new(200.0, 100.0, 107.500, (31..=38).collect()),
        InflowBin::new(325.0, 200.0, 110.000, (30..=39).collect()),
        InflowBin::new(425.0, 325.0, 111.667, (29..=40).collect()),
        InflowBin::new(541.7, 425.0, 113.333, (28..=41).collect()),
    ]
}

/// 参考入流边界
pub fn inflow_boundary() -> InflowBoundary {
    InflowBoundary::new(inflow_bins(), inflow_topo())
}

/// L 形轮廓，缺角位于东北（西侧两排）或东南（东侧两排）
fn footprint(x0: f64, y0: f64, notch_north: bool) -> Vec<[f64; 2]> {
    if notch_north {
        vec![
            [x0, y0],
            [x0 + 10.0, y0],
            [x0 + 10.0, y0 + 15.0],
            [x0 + 5.0, y0 + 15.0],
            [x0 + 5.0, y0 + 10.0],
            [x0, y0 + 10.0],
            [x0, y0],
        ]
    } else {
        vec![
            [x0, y0],
            [x0 + 10.0, y0],
            [x0 + 10.0, y0 + 10.0],
            [x0 + 5.0, y0 + 10.0],
            [x0 + 5.0, y0 + 15.0],
            [x0, y0 + 15.0],
            [x0, y0],
        ]
    }
}

/// 参考建筑，编号 1..=44
pub fn buildings() -> Vec<Building> {
    // (检查列, 地板高程表, 轮廓 x0, 缺角方向)
    let rows_of_buildings: [(u32, &[f64; 11], f64, bool); 4] = [
        (25, &FLOOR_OUTER, 120.0, true),
        (29, &FLOOR_INNER, 140.0, true),
        (41, &FLOOR_INNER, 200.0, false),
        (45, &FLOOR_OUTER, 220.0, false),
    ];

    let mut out = Vec::with_capacity(44);
    let mut id = 1;
    for (col, floors, x0, notch_north) in rows_of_buildings {
        for (k, &floor) in floors.iter().enumerate() {
            let row = FIRST_CHECK_ROW + CHECK_ROW_STEP * k as u32;
            let y0 = FIRST_FOOTPRINT_Y + FOOTPRINT_Y_STEP * k as f64;
            out.push(
                Building::new(id, floor, SourceCell::new(row, col))
                    .with_footprint(footprint(x0, y0, notch_north)),
            );
            id += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_buildings() {
        let b = buildings();
        assert_eq!(b.len(), 44);
        assert_eq!(b[0].id, 1);
        assert_eq!(b[0].check_cell, SourceCell::new(113, 25));
        assert_eq!(b[10].check_cell, SourceCell::new(163, 25));
        assert_eq!(b[11].floor_elevation, 104.300);
        assert_eq!(b[22].check_cell, SourceCell::new(113, 41));
        assert_eq!(b[43].id, 44);
        assert_eq!(b[43].floor_elevation, 107.133);
        assert_eq!(b[43].check_cell, SourceCell::new(163, 45));
    }

    #[test]
    fn test_reference_footprint_closed() {
        for b in buildings() {
            assert_eq!(b.footprint.first(), b.footprint.last());
        }
        assert_eq!(buildings()[22].footprint[2], [210.0, 565.0]);
    }

    #[test]
    fn test_reference_bins() {
        let bins = inflow_bins();
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[1].cells, (30..=39).collect::<Vec<_>>());
        assert_eq!(bins[3].len(), 14);
        assert_eq!(inflow_topo().get(34), Some(100.0));
    }
}
