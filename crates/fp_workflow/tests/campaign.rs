// crates/fp_workflow/tests/campaign.rs

//! 战役驱动器集成测试
//!
//! 使用 6x5 小网格和一个读取输入卡片、写出均匀水深的假求解器。

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fp_config::{CampaignConfig, RealizationRange, WorkspaceConfig};
use fp_foundation::error::{ErrorKind, FpError, FpResult};
use fp_foundation::index::SourceCell;
use fp_grid::{Building, Grid, InflowBin, InflowBoundary, InflowTopo};
use fp_io::{parse_catalog, CatalogConfig, RealizationCatalog};
use fp_workflow::{
    CampaignDriver, CampaignEvent, HydraulicSolver, RunState, RunnerError, SolverOutcome,
};
use parking_lot::Mutex;

const ROWS: usize = 5;
const COLS: usize = 6;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Normal,
    FailOnCall(usize),
    SilentOnCall(usize),
    ShortDepth,
}

/// 把卡片中最大入流水深铺满全场的假求解器
struct FakeSolver {
    calls: Arc<AtomicUsize>,
    mode: Mode,
}

impl FakeSolver {
    fn new(mode: Mode) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
                mode,
            },
            calls,
        )
    }
}

fn inflow_depth(deck: &str) -> f64 {
    deck.lines()
        .filter_map(|l| l.split_once('='))
        .find(|(k, _)| k.trim() == "TDEPDYDEP")
        .map(|(_, v)| {
            v.split_whitespace()
                .filter_map(|t| t.parse::<f64>().ok())
                .fold(0.0, f64::max)
        })
        .unwrap_or(0.0)
}

fn write_field(path: &Path, rows: usize, cols: usize, value: f64, drop_last: bool) {
    let mut text = String::new();
    for r in 0..rows {
        let n = if drop_last && r == rows - 1 { cols - 1 } else { cols };
        let line: Vec<String> = (0..n).map(|_| format!("{value}")).collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    std::fs::write(path, text).unwrap();
}

impl HydraulicSolver for FakeSolver {
    fn run(&self, workspace: &Path) -> FpResult<SolverOutcome> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.mode == Mode::FailOnCall(call) {
            return Ok(SolverOutcome {
                status: Some(3),
                stdout: String::new(),
                stderr: "diverged".into(),
            });
        }

        if self.mode == Mode::SilentOnCall(call) {
            return Ok(SolverOutcome::ok());
        }

        let deck = std::fs::read_to_string(workspace.join("input.txt"))
            .map_err(|e| FpError::io_with_source("fake solver", e))?;
        let d = inflow_depth(&deck);

        write_field(&workspace.join("H.txt"), ROWS, COLS, d, self.mode == Mode::ShortDepth);
        write_field(&workspace.join("U.txt"), ROWS, COLS + 1, 0.5, false);
        write_field(&workspace.join("V.txt"), ROWS + 1, COLS, -0.25, false);
        write_field(&workspace.join("Hux.txt"), ROWS, COLS + 1, d, false);
        write_field(&workspace.join("Hvy.txt"), ROWS + 1, COLS, d, false);
        Ok(SolverOutcome::ok())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn write_templates(dir: &Path) {
    let tpl = dir.join("Model_Files");
    std::fs::create_dir_all(&tpl).unwrap();
    std::fs::write(
        tpl.join("input.txt"),
        "# test deck\n\
         NROWS = 5\n\
         TDEPDYDEP = 0 0 0 0 0 0\n\
         VELDYVEL = 0 0 0 0 0 0\n\
         END\n",
    )
    .unwrap();
    write_field(&tpl.join("Depth.txt"), ROWS, COLS, 0.0, false);
    write_field(&tpl.join("Topo.txt"), ROWS, COLS, 0.0, false);
    write_field(&tpl.join("Mann.txt"), ROWS, COLS, 0.035, false);
}

fn config(root: &Path, start: u32, end: u32) -> CampaignConfig {
    CampaignConfig {
        grid: Grid::new(ROWS, COLS, 1.0),
        realizations: RealizationRange::new(start, end),
        workspace: WorkspaceConfig {
            root: root.to_path_buf(),
            template_dir: PathBuf::from("Model_Files"),
            results_dir: PathBuf::from("Results"),
        },
        inflow: InflowBoundary::new(
            vec![
                InflowBin::new(10.0, 0.0, 0.0, vec![1, 2, 3]),
                InflowBin::new(40.0, 10.0, 0.0, (0..COLS).collect()),
            ],
            (0..COLS).map(|c| (c, 0.0)).collect::<InflowTopo>(),
        ),
        buildings: vec![
            Building::new(1, 1.5, SourceCell::new(2, 2)),
            Building::new(2, 5.0, SourceCell::new(4, 5)),
        ],
        ..CampaignConfig::default()
    }
}

fn catalog(text: &str) -> RealizationCatalog {
    parse_catalog(text, &CatalogConfig::default()).unwrap()
}

const CATALOG: &str = "RealNum,DateTime,Precip_mm,Discharge_cms\n\
1,2030-01-01 00:00:00,10.0,6.0\n\
1,2030-02-01 00:00:00,20.0,30.0\n\
3,2030-03-01,5.0,6.0\n";

#[test]
fn campaign_records_events_in_catalog_order() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let config = config(dir.path(), 1, 3);
    let (solver, calls) = FakeSolver::new(Mode::Normal);

    let driver = CampaignDriver::new(&config, Box::new(solver)).unwrap();
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&transitions);
    driver.dispatcher().add_fn_listener("states", move |e| {
        if let CampaignEvent::StateChanged {
            realization: 1,
            flood_index: 1,
            new_state,
            ..
        } = e
        {
            sink.lock().push(*new_state);
        }
    });

    let summary = driver.run(&catalog(CATALOG)).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let order: Vec<(u32, u32)> = summary
        .rows
        .iter()
        .map(|r| (r.realization, r.flood_index))
        .collect();
    assert_eq!(order, vec![(1, 1), (1, 2), (3, 1)]);
    assert_eq!(summary.skipped, vec![2]);

    // 6 m³/s 落在第一档：3 列，水深 2.0
    let first = &summary.rows[0];
    assert!((first.max_water_depth - 2.0).abs() < 1e-12);
    assert!((first.max_flood_depth - 0.5).abs() < 1e-12);
    assert_eq!(first.max_abs_u, 0.5);
    assert_eq!(first.max_abs_v, 0.25);
    assert_eq!(first.obstruction_depth, 0.0);
    assert_eq!(summary.tables[0].records.len(), 2);
    assert_eq!(summary.tables[0].records[1].flood_depth, 0.0);

    // 30 m³/s 落在第二档：(30 - 10) / 6
    let second = &summary.rows[1];
    assert!((second.max_water_depth - 20.0 / 6.0).abs() < 1e-12);

    assert_eq!(
        *transitions.lock(),
        vec![
            RunState::Staged,
            RunState::BoundarySet,
            RunState::Solved,
            RunState::PostProcessed,
            RunState::Recorded,
        ]
    );

    let results = config.workspace.results_path();
    let written = summary.write_tables(&results).unwrap();
    assert_eq!(written.len(), 4);
    assert!(results.join("R0001to0003_Flooding_Summary_All.csv").is_file());
    assert!(results.join("Inun_R0003_Fl01.csv").is_file());
}

#[test]
fn deck_keeps_unrelated_lines() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let config = config(dir.path(), 3, 3);
    let (solver, _) = FakeSolver::new(Mode::Normal);

    CampaignDriver::new(&config, Box::new(solver))
        .unwrap()
        .run(&catalog(CATALOG))
        .unwrap();

    let deck = std::fs::read_to_string(dir.path().join("input.txt")).unwrap();
    let lines: Vec<&str> = deck.lines().collect();
    assert_eq!(lines[0], "# test deck");
    assert_eq!(lines[1], "NROWS = 5");
    assert_eq!(
        lines[2].split_whitespace().collect::<Vec<_>>(),
        vec!["TDEPDYDEP", "=", "0.00", "2.00", "2.00", "2.00", "0.00", "0.00"]
    );
    assert_eq!(lines[4], "END");
}

#[test]
fn solver_failure_aborts_campaign() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let config = config(dir.path(), 1, 3);
    let (solver, calls) = FakeSolver::new(Mode::FailOnCall(2));

    let driver = CampaignDriver::new(&config, Box::new(solver)).unwrap();
    let names = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&names);
    driver
        .dispatcher()
        .add_fn_listener("names", move |e| sink.lock().push(e.name()));

    let err = driver.run(&catalog(CATALOG)).unwrap_err();

    // 第三个事件（实现 3）从未运行
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(err.kind(), ErrorKind::ExternalTool);
    match &err {
        RunnerError::EventFailed {
            realization,
            flood_index,
            discharge,
            state,
            source,
        } => {
            assert_eq!((*realization, *flood_index), (1, 2));
            assert_eq!(*discharge, 30.0);
            assert_eq!(*state, RunState::BoundarySet);
            assert!(matches!(
                source,
                FpError::ExternalTool {
                    status: Some(3),
                    ..
                }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }

    let names = names.lock();
    assert!(names.contains(&"EventFailed"));
    assert!(!names.contains(&"CampaignCompleted"));
}

#[test]
fn silent_solver_does_not_reuse_previous_outputs() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let config = config(dir.path(), 1, 3);
    let (solver, calls) = FakeSolver::new(Mode::SilentOnCall(2));

    let err = CampaignDriver::new(&config, Box::new(solver))
        .unwrap()
        .run(&catalog(CATALOG))
        .unwrap_err();

    // 第二个事件退出码为 0 但没有写出结果，第一个事件的 H.txt 已在暂存时清除
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(err.kind(), ErrorKind::Io);
    match err {
        RunnerError::EventFailed {
            realization,
            flood_index,
            state,
            source,
            ..
        } => {
            assert_eq!((realization, flood_index), (1, 2));
            assert_eq!(state, RunState::Solved);
            assert!(matches!(source, FpError::FileNotFound { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn zero_event_realizations_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let config = config(dir.path(), 4, 6);
    let (solver, calls) = FakeSolver::new(Mode::Normal);

    let driver = CampaignDriver::new(&config, Box::new(solver)).unwrap();
    let summary = driver.run(&catalog(CATALOG)).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(summary.rows.is_empty());
    assert_eq!(summary.skipped, vec![4, 5, 6]);
}

#[test]
fn wrong_output_shape_is_shape_error() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let config = config(dir.path(), 1, 1);
    let (solver, _) = FakeSolver::new(Mode::ShortDepth);

    let err = CampaignDriver::new(&config, Box::new(solver))
        .unwrap()
        .run(&catalog(CATALOG))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Shape);
    assert_eq!(err.state(), Some(RunState::Solved));
}

#[test]
fn discharge_outside_bins_fails_before_solver() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let config = config(dir.path(), 1, 1);
    let (solver, calls) = FakeSolver::new(Mode::Normal);

    let text = "RealNum,DateTime,Precip_mm,Discharge_cms\n1,2030-01-01,10.0,100.0\n";
    let err = CampaignDriver::new(&config, Box::new(solver))
        .unwrap()
        .run(&catalog(text))
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.state(), Some(RunState::Staged));
}

#[test]
fn missing_template_fails_while_pending() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    std::fs::remove_file(dir.path().join("Model_Files").join("Depth.txt")).unwrap();
    let config = config(dir.path(), 1, 1);
    let (solver, calls) = FakeSolver::new(Mode::Normal);

    let err = CampaignDriver::new(&config, Box::new(solver))
        .unwrap()
        .run(&catalog(CATALOG))
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.state(), Some(RunState::Pending));
}
