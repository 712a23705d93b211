// apps/fp_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示生效配置、网格和流量分档表。

use anyhow::{Context, Result};
use clap::Args;
use fp_config::CampaignConfig;
use std::path::PathBuf;
use tracing::info;

use super::load_config;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 以 JSON 输出完整生效配置
    #[arg(long)]
    pub json: bool,

    /// 列出建筑检查单元
    #[arg(long)]
    pub buildings: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== FloodPRA 信息 ===");

    let config = load_config(args.config.as_deref())?;

    if args.json {
        let text = serde_json::to_string_pretty(&config).context("配置序列化失败")?;
        println!("{}", text);
        return Ok(());
    }

    print_campaign(&config);
    println!();
    print_bins(&config);
    if args.buildings {
        println!();
        print_buildings(&config);
    }

    Ok(())
}

fn print_campaign(config: &CampaignConfig) {
    let grid = &config.grid;
    println!("=== 战役配置 ===");
    println!("FloodPRA CLI 版本: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "网格: {} 行 x {} 列, 单元边长 {} m",
        grid.rows, grid.cols, grid.cell_length
    );
    println!(
        "实现范围: {}..={}",
        config.realizations.start, config.realizations.end
    );
    println!("工作区: {}", config.workspace.root.display());
    println!("模板目录: {}", config.workspace.template_path().display());
    println!("结果目录: {}", config.workspace.results_path().display());
    println!("实现目录: {}", config.catalog_path().display());
    println!("求解器: {}", config.solver.executable.display());
    println!(
        "卡片键: {} / {}",
        config.deck.depth_key, config.deck.velocity_key
    );
    println!("建筑数: {}", config.buildings.len());
}

fn print_bins(config: &CampaignConfig) {
    println!("=== 流量分档 ===");
    println!(
        "{:>4}  {:>10}  {:>10}  {:>10}  {:>6}  活动列",
        "档", "下界", "上界", "参考高程", "列数"
    );
    for (i, bin) in config.inflow.bins.iter().enumerate() {
        let first = bin.cells.first().copied().unwrap_or_default();
        let last = bin.cells.last().copied().unwrap_or_default();
        println!(
            "{:>4}  {:>10.2}  {:>10.2}  {:>10.2}  {:>6}  {}..={}",
            i,
            bin.discharge_low,
            bin.discharge_high,
            bin.reference_elevation,
            bin.len(),
            first,
            last
        );
    }
    if let Some((low, high)) = config.inflow.discharge_range() {
        println!("覆盖流量: ({:.2}, {:.2}] m³/s", low, high);
    }
}

fn print_buildings(config: &CampaignConfig) {
    println!("=== 建筑检查单元 ===");
    println!("{:>4}  {:>5}  {:>5}  {:>10}", "编号", "行", "列", "地板高程");
    for b in &config.buildings {
        println!(
            "{:>4}  {:>5}  {:>5}  {:>10.3}",
            b.id, b.check_cell.row, b.check_cell.col, b.floor_elevation
        );
    }
}
