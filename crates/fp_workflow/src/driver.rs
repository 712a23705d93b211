// crates/fp_workflow/src/driver.rs

//! 蒙特卡洛战役驱动器
//!
//! 按升序遍历配置范围内的实现，对每个洪水事件串行运行
//! [`EventRunner`]。任一事件失败即终止整个战役，不重试。

use std::sync::Arc;
use std::time::Instant;

use fp_config::CampaignConfig;
use fp_foundation::error::{ErrorKind, FpError};
use fp_grid::GridGeometry;
use fp_io::{DeckKeys, RealizationCatalog};
use thiserror::Error;

use crate::events::{CampaignEvent, EventDispatcher};
use crate::run::{EventRunner, RunState};
use crate::solver::HydraulicSolver;
use crate::summary::{CampaignSummary, SummaryAggregator};
use crate::workspace::Workspace;

/// 运行器错误
#[derive(Debug, Error)]
pub enum RunnerError {
    /// 事件失败，战役终止
    #[error(
        "Climate realization {realization}, flood index {flood_index} \
         (discharge {discharge:.2}) failed after {state}: {source}"
    )]
    EventFailed {
        /// 实现编号
        realization: u32,
        /// 洪水序号
        flood_index: u32,
        /// 入流流量 [m³/s]
        discharge: f64,
        /// 失败前到达的状态
        state: RunState,
        /// 原因
        #[source]
        source: FpError,
    },

    /// 战役开始前的准备失败
    #[error("Campaign setup failed: {0}")]
    Setup(#[from] FpError),
}

impl RunnerError {
    /// 底层错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EventFailed { source, .. } => source.kind(),
            Self::Setup(e) => e.kind(),
        }
    }

    /// 失败前到达的状态，准备阶段失败时为 None
    pub fn state(&self) -> Option<RunState> {
        match self {
            Self::EventFailed { state, .. } => Some(*state),
            Self::Setup(_) => None,
        }
    }
}

/// 战役驱动器
pub struct CampaignDriver {
    geometry: GridGeometry,
    workspace: Workspace,
    deck: DeckKeys,
    solver: Box<dyn HydraulicSolver>,
    dispatcher: Arc<EventDispatcher>,
    start: u32,
    end: u32,
}

impl CampaignDriver {
    /// 由配置创建驱动器
    ///
    /// 几何在此处一次性校验，之后每个事件直接使用。
    pub fn new(
        config: &CampaignConfig,
        solver: Box<dyn HydraulicSolver>,
    ) -> Result<Self, RunnerError> {
        let geometry = config.geometry().map_err(FpError::from)?;
        Ok(Self {
            geometry,
            workspace: Workspace::from_config(config),
            deck: config.deck.clone(),
            solver,
            dispatcher: Arc::new(EventDispatcher::new()),
            start: config.realizations.start,
            end: config.realizations.end,
        })
    }

    /// 覆盖实现范围（含两端）
    pub fn with_range(mut self, start: u32, end: u32) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// 替换工作区
    pub fn with_workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = workspace;
        self
    }

    /// 事件分发器
    pub fn dispatcher(&self) -> Arc<EventDispatcher> {
        Arc::clone(&self.dispatcher)
    }

    /// 工作区
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// 几何
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// 实现范围
    pub fn range(&self) -> (u32, u32) {
        (self.start, self.end)
    }

    /// 运行战役
    ///
    /// # 错误
    ///
    /// - 范围无效: [`RunnerError::Setup`]
    /// - 任一事件失败: [`RunnerError::EventFailed`]，之后的事件不再运行
    pub fn run(&self, catalog: &RealizationCatalog) -> Result<CampaignSummary, RunnerError> {
        if self.start > self.end {
            return Err(RunnerError::Setup(FpError::invalid_config(
                "realizations",
                format!("{}..={}", self.start, self.end),
                "start must not exceed end",
            )));
        }

        let started = Instant::now();
        let total_events: usize = (self.start..=self.end)
            .map(|r| catalog.events_for(r).count())
            .sum();

        tracing::info!(
            "Starting campaign R{:04}to{:04} with solver {}",
            self.start,
            self.end,
            self.solver.name()
        );
        self.dispatcher.emit(CampaignEvent::CampaignStarted {
            start: self.start,
            end: self.end,
            total_events,
        });

        let runner = EventRunner::new(
            &self.geometry,
            &self.workspace,
            &self.deck,
            self.solver.as_ref(),
            &self.dispatcher,
        );
        let mut aggregator = SummaryAggregator::new(self.start, self.end);

        for realization in self.start..=self.end {
            let events: Vec<_> = catalog.events_for(realization).collect();
            if events.is_empty() {
                aggregator.skip(realization);
                self.dispatcher
                    .emit(CampaignEvent::RealizationSkipped { realization });
                continue;
            }

            for (flood_index, event) in (1u32..).zip(events) {
                let result = runner.run(realization, flood_index, event)?;
                aggregator.record(result);
            }
        }

        let summary = aggregator.finish();
        self.dispatcher.emit(CampaignEvent::CampaignCompleted {
            events: summary.rows.len(),
            skipped: summary.skipped.len(),
            duration_secs: started.elapsed().as_secs_f64(),
        });
        Ok(summary)
    }
}

impl std::fmt::Debug for CampaignDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignDriver")
            .field("solver", &self.solver.name())
            .field("workspace", &self.workspace.root())
            .field("start", &self.start)
            .field("end", &self.end)
            .finish()
    }
}
