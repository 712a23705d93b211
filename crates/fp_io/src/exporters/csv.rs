// crates/fp_io/src/exporters/csv.rs

//! CSV 表格导出
//!
//! 两类表：
//!
//! - 战役汇总表 `R{start:04}to{end:04}_Flooding_Summary_All.csv`，每个事件一行
//! - 淹没表 `Inun_R{real:04}_Fl{flood:02}.csv`，每栋建筑一行
//!
//! 长度、高程保留 3 位小数，流速保留 4 位。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDateTime;
use fp_foundation::error::{FpError, FpResult};
use fp_physics::InundationRecord;
use serde::{Deserialize, Serialize};

/// 汇总表时间格式
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SUMMARY_HEADER: &str = "Realization,Flood Num.,Date,Precip_mm,Discharge_cms,\
Obstruction_Depth_m,Max_Water_Depth_m,Max_Flood_Depth_m,Max_U_mps,Max_V_mps";

const INUNDATION_HEADER: &str =
    "Building,Row,Column,Topo_m,FloorEl_m,FloorHeight_m,WaterDepth_m,FloodDepth_m";

/// 汇总表中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// 实现编号
    pub realization: u32,
    /// 实现内的洪水序号（1 起始）
    pub flood_index: u32,
    /// 事件时间
    pub timestamp: NaiveDateTime,
    /// 降水 [mm]
    pub precipitation: f64,
    /// 入流流量 [m³/s]
    pub discharge: f64,
    /// 阻塞深度 [m]
    pub obstruction_depth: f64,
    /// 建筑检查单元最大水深 [m]
    pub max_water_depth: f64,
    /// 最大淹没深度 [m]
    pub max_flood_depth: f64,
    /// 最大 |U| [m/s]
    pub max_abs_u: f64,
    /// 最大 |V| [m/s]
    pub max_abs_v: f64,
}

/// 汇总表文件名
pub fn summary_table_name(start: u32, end: u32) -> String {
    format!("R{:04}to{:04}_Flooding_Summary_All.csv", start, end)
}

/// 淹没表文件名
pub fn inundation_table_name(realization: u32, flood_index: u32) -> String {
    format!("Inun_R{:04}_Fl{:02}.csv", realization, flood_index)
}

/// 写出汇总表
pub fn write_summary<'a, W, I>(mut writer: W, rows: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a SummaryRow>,
{
    writeln!(writer, "{}", SUMMARY_HEADER)?;
    for r in rows {
        writeln!(
            writer,
            "{},{},{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.4},{:.4}",
            r.realization,
            r.flood_index,
            r.timestamp.format(TIMESTAMP_FORMAT),
            r.precipitation,
            r.discharge,
            r.obstruction_depth,
            r.max_water_depth,
            r.max_flood_depth,
            r.max_abs_u,
            r.max_abs_v,
        )?;
    }
    writer.flush()
}

/// 写出淹没表，每栋建筑一行
pub fn write_inundation<W: Write>(mut writer: W, records: &[InundationRecord]) -> std::io::Result<()> {
    writeln!(writer, "{}", INUNDATION_HEADER)?;
    for rec in records {
        writeln!(
            writer,
            "{},{},{},{:.3},{:.3},{:.3},{:.3},{:.3}",
            rec.building_id,
            rec.row,
            rec.col,
            rec.topo_elevation,
            rec.floor_elevation,
            rec.floor_height,
            rec.water_depth,
            rec.flood_depth,
        )?;
    }
    writer.flush()
}

fn create(path: &Path) -> FpResult<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FpError::io_with_source(format!("Failed to create {}", parent.display()), e)
            })?;
        }
    }
    let file = File::create(path).map_err(|e| {
        FpError::io_with_source(format!("Failed to create {}", path.display()), e)
    })?;
    Ok(BufWriter::new(file))
}

/// 将汇总表写入文件
pub fn write_summary_csv<'a, I>(path: &Path, rows: I) -> FpResult<()>
where
    I: IntoIterator<Item = &'a SummaryRow>,
{
    let writer = create(path)?;
    write_summary(writer, rows).map_err(|e| {
        FpError::io_with_source(format!("Failed to write {}", path.display()), e)
    })?;
    tracing::info!("Summary table written: {}", path.display());
    Ok(())
}

/// 将淹没表写入文件
pub fn write_inundation_csv(path: &Path, records: &[InundationRecord]) -> FpResult<()> {
    let writer = create(path)?;
    write_inundation(writer, records).map_err(|e| {
        FpError::io_with_source(format!("Failed to write {}", path.display()), e)
    })?;
    tracing::debug!("Inundation table written: {}", path.display());
    Ok(())
}
