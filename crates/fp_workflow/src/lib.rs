// crates/fp_workflow/src/lib.rs

//! FloodPRA 工作流模块
//!
//! 蒙特卡洛战役的顺序执行：对每个实现的每个洪水事件，依次完成
//! 模板暂存、入流边界设置、外部求解、输出中心化、淹没评估与记录。
//! 任何一步失败都会终止整个战役。
//!
//! # 模块结构
//!
//! - [`solver`]: 外部求解器抽象与进程实现
//! - [`workspace`]: 共享工作区（模板暂存、输出读取）
//! - [`run`]: 单个事件的状态机
//! - [`events`]: 事件系统
//! - [`driver`]: 战役驱动器
//! - [`summary`]: 结果汇总
//!
//! # 示例
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fp_config::CampaignConfig;
//! use fp_io::load_catalog;
//! use fp_workflow::{CampaignDriver, LoggingListener, ProcessSolver};
//!
//! let config = CampaignConfig::from_file("campaign.json")?;
//! let catalog = load_catalog(&config.catalog_path(), &config.catalog.format)?;
//! let solver = ProcessSolver::new(&config.solver.executable);
//!
//! let driver = CampaignDriver::new(&config, Box::new(solver))?;
//! driver.dispatcher().add_listener(Arc::new(LoggingListener::new("campaign")));
//! let summary = driver.run(&catalog)?;
//! summary.write_tables(&config.workspace.results_path())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod driver;
pub mod events;
pub mod run;
pub mod solver;
pub mod summary;
pub mod workspace;

// 重导出核心类型
pub use driver::{CampaignDriver, RunnerError};
pub use events::{CampaignEvent, EventDispatcher, EventListener, FnListener, LoggingListener};
pub use run::{EventRunner, RunResult, RunState};
pub use solver::{HydraulicSolver, ProcessSolver, SolverOutcome};
pub use summary::{CampaignSummary, EventTable, SummaryAggregator};
pub use workspace::Workspace;
