// apps/fp_cli/src/commands/run.rs

//! 运行战役命令
//!
//! 加载配置与实现目录，串行运行范围内的全部洪水事件，
//! 写出汇总表、淹没表和 `summary.json`。运行日志记录开始时间、
//! 每个事件一行和总耗时（小时）。

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use fp_config::CampaignConfig;
use fp_io::load_catalog;
use fp_workflow::{CampaignDriver, LoggingListener, ProcessSolver};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::load_config;

/// 运行战役参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 起始实现（含）
    #[arg(long)]
    pub start: Option<u32>,

    /// 结束实现（含）
    #[arg(long)]
    pub end: Option<u32>,

    /// 共享工作区目录
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// 求解器可执行文件
    #[arg(short, long)]
    pub solver: Option<PathBuf>,

    /// 实现目录 CSV
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// 输出状态变更日志
    #[arg(short, long)]
    pub verbose: bool,
}

/// 运行日志文件名
pub fn run_log_name(start: u32, end: u32) -> String {
    format!("FR-PRA_Log_R{:04}to{:04}.txt", start, end)
}

/// 加载配置并应用命令行覆盖
pub fn effective_config(args: &RunArgs) -> Result<CampaignConfig> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(root) = &args.workspace {
        config.workspace.root = root.clone();
    }
    if let Some(start) = args.start {
        config.realizations.start = start;
    }
    if let Some(end) = args.end {
        config.realizations.end = end;
    }
    if let Some(solver) = &args.solver {
        config.solver.executable = solver.clone();
    }
    if let Some(catalog) = &args.catalog {
        config.catalog.path = catalog.clone();
    }
    config.validate().context("配置无效")?;
    Ok(config)
}

/// 在结果目录中创建本范围的运行日志
pub fn open_run_log(config: &CampaignConfig) -> Result<File> {
    let results_dir = config.workspace.results_path();
    std::fs::create_dir_all(&results_dir)
        .with_context(|| format!("无法创建结果目录 {}", results_dir.display()))?;
    let path = results_dir.join(run_log_name(
        config.realizations.start,
        config.realizations.end,
    ));
    File::create(&path).with_context(|| format!("无法创建运行日志 {}", path.display()))
}

/// 执行运行命令
pub fn execute(args: RunArgs, config: CampaignConfig) -> Result<()> {
    info!("=== FloodPRA 战役启动 ===");
    info!("开始时间: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    info!(
        "实现范围: {}..={}, 工作区: {}",
        config.realizations.start,
        config.realizations.end,
        config.workspace.root.display()
    );
    info!("求解器: {}", config.solver.executable.display());

    let catalog_path = config.catalog_path();
    let catalog = load_catalog(&catalog_path, &config.catalog.format)
        .with_context(|| format!("无法加载实现目录 {}", catalog_path.display()))?;

    let solver = ProcessSolver::new(&config.solver.executable);
    let driver = CampaignDriver::new(&config, Box::new(solver)).context("初始化战役失败")?;

    let listener = LoggingListener::new("campaign");
    let listener = if args.verbose { listener.verbose() } else { listener };
    driver.dispatcher().add_listener(Arc::new(listener));

    let start = Instant::now();
    let summary = driver.run(&catalog)?;

    let results_dir = config.workspace.results_path();
    let written = summary
        .write_tables(&results_dir)
        .context("写出结果表失败")?;
    let json_path = results_dir.join("summary.json");
    summary.save_json(&json_path).context("写出 summary.json 失败")?;

    info!("=== 战役完成 ===");
    info!("记录事件数: {}", summary.rows.len());
    info!("跳过实现数: {}", summary.skipped.len());
    info!("最大淹没深度: {:.3} m", summary.max_flood_depth());
    info!("输出文件数: {}", written.len() + 1);
    info!(
        "总耗时: {:.4} 小时",
        start.elapsed().as_secs_f64() / 3600.0
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_run_log_name() {
        assert_eq!(run_log_name(51, 100), "FR-PRA_Log_R0051to0100.txt");
        assert_eq!(run_log_name(1, 1), "FR-PRA_Log_R0001to0001.txt");
    }

    #[test]
    fn test_open_run_log_in_results_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CampaignConfig::default();
        config.workspace.root = dir.path().to_path_buf();
        config.realizations.start = 3;
        config.realizations.end = 7;

        let mut file = open_run_log(&config).unwrap();
        writeln!(file, "Climate realization 3, flood index 1").unwrap();
        drop(file);

        let path = dir.path().join("Results").join("FR-PRA_Log_R0003to0007.txt");
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("Climate realization 3"));
    }

    #[test]
    fn test_overrides_applied() {
        let args = RunArgs {
            config: None,
            start: Some(4),
            end: Some(9),
            workspace: Some(PathBuf::from("/data/run")),
            solver: Some(PathBuf::from("solver.sh")),
            catalog: None,
            verbose: false,
        };
        let config = effective_config(&args).unwrap();
        assert_eq!((config.realizations.start, config.realizations.end), (4, 9));
        assert_eq!(config.workspace.root, PathBuf::from("/data/run"));
        assert_eq!(config.solver.executable, PathBuf::from("solver.sh"));
    }

    #[test]
    fn test_inverted_override_rejected() {
        let args = RunArgs {
            config: None,
            start: Some(9),
            end: Some(4),
            workspace: None,
            solver: None,
            catalog: None,
            verbose: false,
        };
        assert!(effective_config(&args).is_err());
    }
}
