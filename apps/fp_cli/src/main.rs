// apps/fp_cli/src/main.rs

//! FloodPRA 命令行界面
//!
//! 运行蒙特卡洛淹没战役、验证配置、查看生效配置。
//! 并行只能通过多个进程处理不相交的实现范围（`--start/--end`）。
//! `run` 另外把日志写入结果目录下的 `FR-PRA_Log_R{start:04}to{end:04}.txt`。

mod commands;

use clap::{Parser, Subcommand};
use std::fs::File;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// FloodPRA 洪水风险概率评估命令行工具
#[derive(Parser)]
#[command(name = "fp_cli")]
#[command(author = "FloodPRA Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "FloodPRA Monte Carlo flood inundation campaign", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行战役
    Run(commands::run::RunArgs),
    /// 显示信息
    Info(commands::info::InfoArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // 执行命令
    match cli.command {
        Commands::Run(args) => {
            let config = commands::run::effective_config(&args)?;
            let run_log = commands::run::open_run_log(&config)?;
            init_logging(level, Some(run_log))?;
            commands::run::execute(args, config)
        }
        Commands::Info(args) => {
            init_logging(level, None)?;
            commands::info::execute(args)
        }
        Commands::Validate(args) => {
            init_logging(level, None)?;
            commands::validate::execute(args)
        }
    }
}

/// 安装全局订阅器：终端输出，外加可选的运行日志文件
fn init_logging(level: Level, run_log: Option<File>) -> anyhow::Result<()> {
    let terminal = fmt::layer().with_target(false);
    let file = run_log.map(|f| {
        fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(f))
    });

    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(terminal)
        .with(file);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
