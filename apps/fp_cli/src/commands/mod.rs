// apps/fp_cli/src/commands/mod.rs

//! 子命令

pub mod info;
pub mod run;
pub mod validate;

use anyhow::{Context, Result};
use fp_config::CampaignConfig;
use std::path::Path;

/// 加载配置文件，未指定时使用参考战役
pub fn load_config(path: Option<&Path>) -> Result<CampaignConfig> {
    match path {
        Some(p) => CampaignConfig::from_file(p)
            .with_context(|| format!("无法加载配置文件 {}", p.display())),
        None => {
            tracing::info!("未指定配置文件，使用参考战役配置");
            Ok(CampaignConfig::default())
        }
    }
}
