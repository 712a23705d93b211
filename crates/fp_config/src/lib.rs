// crates/fp_config/src/lib.rs

//! FloodPRA Config Layer
//!
//! 战役配置：网格、实现范围、工作区路径、文件名、求解器、
//! 输入卡片键名、实现目录、入流分档和建筑。每一节都可以省略，
//! 省略时回落到参考研究区的数据。
//!
//! # 模块概览
//!
//! - [`campaign_config`]: [`CampaignConfig`] 及其各节
//! - [`error`]: 配置错误类型
//!
//! # 示例
//!
//! ```
//! use fp_config::CampaignConfig;
//!
//! let config: CampaignConfig = serde_json::from_str(r#"{
//!     "realizations": { "start": 1, "end": 10 }
//! }"#).unwrap();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.grid.cols, 70);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod campaign_config;
pub mod error;

// 重导出核心类型
pub use campaign_config::{
    CampaignConfig, CatalogSection, FileNames, RealizationRange, SolverSection, WorkspaceConfig,
};
pub use error::ConfigError;
