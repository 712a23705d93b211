// crates/fp_workflow/src/summary.rs

//! 战役汇总
//!
//! [`SummaryAggregator`] 按记录顺序折叠 [`RunResult`]，生成汇总表行和
//! 每个事件的淹没表。

use std::path::{Path, PathBuf};

use fp_foundation::error::{FpError, FpResult};
use fp_io::{
    inundation_table_name, summary_table_name, write_inundation_csv, write_summary_csv,
    SummaryRow,
};
use fp_physics::{InundationRecord, RunMetrics};
use serde::{Deserialize, Serialize};

use crate::run::RunResult;

/// 单个事件的淹没表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTable {
    /// 实现编号
    pub realization: u32,
    /// 洪水序号
    pub flood_index: u32,
    /// 标量指标
    pub metrics: RunMetrics,
    /// 每栋建筑一行
    pub records: Vec<InundationRecord>,
}

impl EventTable {
    /// 表文件名
    pub fn file_name(&self) -> String {
        inundation_table_name(self.realization, self.flood_index)
    }
}

/// 战役汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSummary {
    /// 起始实现
    pub start: u32,
    /// 结束实现（含）
    pub end: u32,
    /// 汇总表，按记录顺序
    pub rows: Vec<SummaryRow>,
    /// 淹没表，与 rows 一一对应
    pub tables: Vec<EventTable>,
    /// 没有事件的实现
    pub skipped: Vec<u32>,
}

impl CampaignSummary {
    /// 汇总表文件名
    pub fn summary_file_name(&self) -> String {
        summary_table_name(self.start, self.end)
    }

    /// 写出汇总表和全部淹没表，返回写出的文件
    pub fn write_tables(&self, results_dir: &Path) -> FpResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.tables.len() + 1);

        for table in &self.tables {
            let path = results_dir.join(table.file_name());
            write_inundation_csv(&path, &table.records)?;
            written.push(path);
        }

        let path = results_dir.join(self.summary_file_name());
        write_summary_csv(&path, &self.rows)?;
        written.push(path);

        Ok(written)
    }

    /// 以 JSON 保存汇总
    pub fn save_json(&self, path: &Path) -> FpResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FpError::io(format!("Failed to serialize summary: {e}")))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    FpError::io_with_source(format!("Failed to create {}", parent.display()), e)
                })?;
            }
        }
        std::fs::write(path, content).map_err(|e| {
            FpError::io_with_source(format!("Failed to write {}", path.display()), e)
        })?;
        tracing::info!("Campaign summary saved: {}", path.display());
        Ok(())
    }

    /// 全部事件中的最大淹没深度
    pub fn max_flood_depth(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.max_flood_depth)
            .fold(0.0_f64, f64::max)
    }
}

/// 汇总累加器
#[derive(Debug, Clone)]
pub struct SummaryAggregator {
    start: u32,
    end: u32,
    rows: Vec<SummaryRow>,
    tables: Vec<EventTable>,
    skipped: Vec<u32>,
}

impl SummaryAggregator {
    /// 创建累加器
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end,
            rows: Vec::new(),
            tables: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// 记录一个事件
    pub fn record(&mut self, result: RunResult) {
        self.rows.push(result.to_summary_row());
        self.tables.push(EventTable {
            realization: result.realization,
            flood_index: result.flood_index,
            metrics: result.metrics,
            records: result.records,
        });
    }

    /// 记录被跳过的实现
    pub fn skip(&mut self, realization: u32) {
        self.skipped.push(realization);
    }

    /// 已记录事件数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 是否没有记录
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 完成汇总
    pub fn finish(self) -> CampaignSummary {
        CampaignSummary {
            start: self.start,
            end: self.end,
            rows: self.rows,
            tables: self.tables,
            skipped: self.skipped,
        }
    }
}
