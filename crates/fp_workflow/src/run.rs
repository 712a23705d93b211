// crates/fp_workflow/src/run.rs

//! 单事件运行
//!
//! 一个洪水事件依次经过：
//!
//! ```text
//! Pending → Staged → BoundarySet → Solved → PostProcessed → Recorded
//! ```
//!
//! 任一步失败即转入 `Failed`，错误中携带失败前到达的状态。

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use fp_foundation::error::{FpError, FpResult};
use fp_grid::GridGeometry;
use fp_io::{write_inflow_deck, DeckKeys, RealizationEvent, SummaryRow};
use fp_physics::{evaluate, reconcile, synthesize, InundationRecord, RunMetrics, DEPTH_CUTOFF};

use crate::driver::RunnerError;
use crate::events::{CampaignEvent, EventDispatcher};
use crate::solver::HydraulicSolver;
use crate::workspace::Workspace;

/// 事件运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    /// 尚未开始
    Pending,
    /// 模板已复制到工作区
    Staged,
    /// 入流边界已写入卡片
    BoundarySet,
    /// 求解器正常退出
    Solved,
    /// 输出已中心化
    PostProcessed,
    /// 淹没表与指标已生成
    Recorded,
    /// 失败
    Failed,
}

impl RunState {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Recorded | Self::Failed)
    }

    /// 正常流程中的下一个状态
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Staged),
            Self::Staged => Some(Self::BoundarySet),
            Self::BoundarySet => Some(Self::Solved),
            Self::Solved => Some(Self::PostProcessed),
            Self::PostProcessed => Some(Self::Recorded),
            Self::Recorded | Self::Failed => None,
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Staged => write!(f, "Staged"),
            Self::BoundarySet => write!(f, "BoundarySet"),
            Self::Solved => write!(f, "Solved"),
            Self::PostProcessed => write!(f, "PostProcessed"),
            Self::Recorded => write!(f, "Recorded"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// 单事件结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// 实现编号
    pub realization: u32,
    /// 洪水序号（1 起始）
    pub flood_index: u32,
    /// 事件时间
    pub timestamp: NaiveDateTime,
    /// 降水 [mm]
    pub precipitation: f64,
    /// 入流流量 [m³/s]
    pub discharge: f64,
    /// 阻塞深度 [m]，恒为 0
    pub obstruction_depth: f64,
    /// 标量指标
    pub metrics: RunMetrics,
    /// 淹没表
    pub records: Vec<InundationRecord>,
}

impl RunResult {
    /// 汇总表中的一行
    pub fn to_summary_row(&self) -> SummaryRow {
        SummaryRow {
            realization: self.realization,
            flood_index: self.flood_index,
            timestamp: self.timestamp,
            precipitation: self.precipitation,
            discharge: self.discharge,
            obstruction_depth: self.obstruction_depth,
            max_water_depth: self.metrics.max_water_depth,
            max_flood_depth: self.metrics.max_flood_depth,
            max_abs_u: self.metrics.max_abs_u,
            max_abs_v: self.metrics.max_abs_v,
        }
    }
}

/// 单事件运行器
///
/// 借用驱动器持有的几何、工作区和求解器，不保存跨事件状态。
pub struct EventRunner<'a> {
    geometry: &'a GridGeometry,
    workspace: &'a Workspace,
    deck: &'a DeckKeys,
    solver: &'a dyn HydraulicSolver,
    dispatcher: &'a EventDispatcher,
}

impl<'a> EventRunner<'a> {
    /// 创建运行器
    pub fn new(
        geometry: &'a GridGeometry,
        workspace: &'a Workspace,
        deck: &'a DeckKeys,
        solver: &'a dyn HydraulicSolver,
        dispatcher: &'a EventDispatcher,
    ) -> Self {
        Self {
            geometry,
            workspace,
            deck,
            solver,
            dispatcher,
        }
    }

    /// 运行一个洪水事件
    ///
    /// # 错误
    ///
    /// 返回 [`RunnerError::EventFailed`]，其中 `state` 为失败前到达的状态。
    pub fn run(
        &self,
        realization: u32,
        flood_index: u32,
        event: &RealizationEvent,
    ) -> Result<RunResult, RunnerError> {
        self.dispatcher.emit(CampaignEvent::EventStarted {
            realization,
            flood_index,
            discharge: event.discharge,
            obstruction_depth: 0.0,
        });

        let mut state = RunState::Pending;
        match self.execute(realization, flood_index, event, &mut state) {
            Ok(result) => {
                self.dispatcher.emit(CampaignEvent::EventRecorded {
                    realization,
                    flood_index,
                    max_flood_depth: result.metrics.max_flood_depth,
                });
                Ok(result)
            }
            Err(source) => {
                self.dispatcher.emit(CampaignEvent::EventFailed {
                    realization,
                    flood_index,
                    discharge: event.discharge,
                    state,
                    error: source.to_string(),
                });
                self.dispatcher.emit(CampaignEvent::StateChanged {
                    realization,
                    flood_index,
                    old_state: state,
                    new_state: RunState::Failed,
                });
                Err(RunnerError::EventFailed {
                    realization,
                    flood_index,
                    discharge: event.discharge,
                    state,
                    source,
                })
            }
        }
    }

    fn execute(
        &self,
        realization: u32,
        flood_index: u32,
        event: &RealizationEvent,
        state: &mut RunState,
    ) -> FpResult<RunResult> {
        let grid = self.geometry.grid();

        self.workspace.stage()?;
        self.advance(state, realization, flood_index);

        let profile = synthesize(event.discharge, self.geometry.inflow(), grid)?;
        write_inflow_deck(&self.workspace.deck_path(), self.deck, &profile, grid.cols)?;
        self.advance(state, realization, flood_index);

        let outcome = self.solver.run(self.workspace.root())?;
        if !outcome.stdout.is_empty() {
            tracing::debug!("{} stdout:\n{}", self.solver.name(), outcome.stdout.trim_end());
        }
        if !outcome.success() {
            return Err(FpError::external_tool(
                self.solver.name(),
                outcome.status,
                outcome.stderr,
            ));
        }
        self.advance(state, realization, flood_index);

        let raw = self.workspace.load_outputs()?;
        let fields = reconcile(&raw, grid, DEPTH_CUTOFF)?;
        self.advance(state, realization, flood_index);

        let records = evaluate(self.geometry.buildings(), &fields.topo, &fields.depth)?;
        let metrics = RunMetrics::from_parts(&records, &fields);
        self.advance(state, realization, flood_index);

        Ok(RunResult {
            realization,
            flood_index,
            timestamp: event.timestamp,
            precipitation: event.precipitation,
            discharge: event.discharge,
            obstruction_depth: 0.0,
            metrics,
            records,
        })
    }

    fn advance(&self, state: &mut RunState, realization: u32, flood_index: u32) {
        let old_state = *state;
        if let Some(new_state) = old_state.next() {
            *state = new_state;
            self.dispatcher.emit(CampaignEvent::StateChanged {
                realization,
                flood_index,
                old_state,
                new_state,
            });
        }
    }
}
