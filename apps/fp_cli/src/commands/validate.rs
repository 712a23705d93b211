// apps/fp_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 验证配置文件、模板目录和实现目录，不运行求解器。

use anyhow::{bail, Result};
use clap::Args;
use fp_config::CampaignConfig;
use fp_io::{load_catalog, RealizationCatalog};
use fp_workflow::Workspace;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 实现目录 CSV，未指定时使用配置中的路径
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn is_ok_strict(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== FloodPRA 配置验证 ===");

    let mut result = ValidationResult::default();

    let config = match &args.config {
        Some(path) => validate_config(path, &mut result),
        None => {
            println!("未指定配置文件，检查参考战役配置");
            Some(CampaignConfig::default())
        }
    };

    if let Some(mut config) = config {
        if let Some(path) = &args.catalog {
            config.catalog.path = path.clone();
        }
        validate_workspace(&config, &mut result);
        validate_catalog(&config, &mut result);
    }

    print_validation_result(&result, args.strict)
}

fn validate_config(path: &PathBuf, result: &mut ValidationResult) -> Option<CampaignConfig> {
    println!("\n检查配置文件: {}", path.display());

    if !path.exists() {
        result.add_error(format!("配置文件不存在: {}", path.display()));
        return None;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            result.add_error(format!("无法读取配置文件: {}", e));
            return None;
        }
    };

    let config = match CampaignConfig::from_json_str(&content) {
        Ok(c) => c,
        Err(e) => {
            result.add_error(e.to_string());
            return None;
        }
    };

    if let Err(e) = config.validate() {
        result.add_error(e.to_string());
        return None;
    }

    println!("  ✓ 配置文件有效");
    Some(config)
}

fn validate_workspace(config: &CampaignConfig, result: &mut ValidationResult) {
    println!("\n检查工作区: {}", config.workspace.root.display());

    let workspace = Workspace::from_config(config);
    match workspace.check_templates() {
        Ok(()) => println!("  ✓ 模板文件齐全"),
        Err(e) => result.add_warning(format!("模板目录不完整: {}", e)),
    }

    let exe = &config.solver.executable;
    let located = if exe.is_absolute() {
        exe.is_file()
    } else {
        config.workspace.root.join(exe).is_file()
    };
    if !located {
        result.add_warning(format!(
            "求解器 {} 不在工作区中，将依赖 PATH 查找",
            exe.display()
        ));
    }
}

fn validate_catalog(config: &CampaignConfig, result: &mut ValidationResult) {
    let path = config.catalog_path();
    println!("\n检查实现目录: {}", path.display());

    let catalog = match load_catalog(&path, &config.catalog.format) {
        Ok(c) => c,
        Err(e) => {
            result.add_error(e.to_string());
            return;
        }
    };

    check_catalog_range(config, &catalog, result);
    println!("  ✓ 实现目录格式有效 ({} 个事件)", catalog.len());
}

/// 范围内的事件数和超出分档的流量
fn check_catalog_range(
    config: &CampaignConfig,
    catalog: &RealizationCatalog,
    result: &mut ValidationResult,
) {
    let range = config.realizations;
    let mut in_range = 0usize;
    for realization in range.iter() {
        for event in catalog.events_for(realization) {
            in_range += 1;
            if config.inflow.select(event.discharge).is_err() {
                result.add_error(format!(
                    "实现 {} 的流量 {:.2} m³/s 不在任何分档内",
                    realization, event.discharge
                ));
            }
        }
    }

    if in_range == 0 {
        result.add_warning(format!(
            "实现范围 {}..={} 内没有洪水事件",
            range.start, range.end
        ));
    } else {
        println!(
            "  实现范围 {}..={} 内共 {} 个事件",
            range.start, range.end, in_range
        );
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if strict {
        result.is_ok_strict()
    } else {
        result.is_ok()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
