// crates/fp_io/src/import/catalog.rs

//! 气候实现目录导入
//!
//! 目录是带表头的 CSV，每行一个洪水事件：
//!
//! ```text
//! RealNum,DateTime,Precip_mm,Discharge_cms
//! 1,2031-05-14 06:00:00,88.4,212.7
//! 1,2031-09-02 18:00:00,61.0,143.2
//! 3,2033-04-27,120.9,388.0
//! ```
//!
//! 列名可配置，匹配不区分大小写，列的先后顺序不限。字段可按 RFC 4180
//! 用双引号包裹，引号内可以含分隔符。目录中的任何无效行都是配置错误，
//! 不会被静默跳过。
//!
//! # 使用示例
//!
//! ```ignore
//! use std::path::Path;
//! use fp_io::import::catalog::{load_catalog, CatalogConfig};
//!
//! let catalog = load_catalog(Path::new("events.csv"), &CatalogConfig::default())?;
//! let n = catalog.events_for(1).count();
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use fp_foundation::error::{FpError, FpResult};
use serde::{Deserialize, Serialize};

/// 支持的时间格式，按顺序尝试
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// 目录 CSV 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// 实现编号列
    #[serde(default = "default_realization_column")]
    pub realization_column: String,
    /// 事件时间列
    #[serde(default = "default_datetime_column")]
    pub datetime_column: String,
    /// 降水列 [mm]
    #[serde(default = "default_precipitation_column")]
    pub precipitation_column: String,
    /// 流量列 [m³/s]
    #[serde(default = "default_discharge_column")]
    pub discharge_column: String,
    /// 分隔符
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// 注释行前缀
    #[serde(default = "default_comment_prefix")]
    pub comment_prefix: Option<char>,
}

fn default_realization_column() -> String {
    "RealNum".into()
}
fn default_datetime_column() -> String {
    "DateTime".into()
}
fn default_precipitation_column() -> String {
    "Precip_mm".into()
}
fn default_discharge_column() -> String {
    "Discharge_cms".into()
}
fn default_delimiter() -> char {
    ','
}
fn default_comment_prefix() -> Option<char> {
    Some('#')
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            realization_column: default_realization_column(),
            datetime_column: default_datetime_column(),
            precipitation_column: default_precipitation_column(),
            discharge_column: default_discharge_column(),
            delimiter: default_delimiter(),
            comment_prefix: default_comment_prefix(),
        }
    }
}

impl CatalogConfig {
    /// 创建制表符分隔的配置
    pub fn tab_separated() -> Self {
        Self {
            delimiter: '\t',
            ..Default::default()
        }
    }
}

/// 单个洪水事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealizationEvent {
    /// 实现编号
    pub realization: u32,
    /// 事件时间
    pub timestamp: NaiveDateTime,
    /// 降水 [mm]
    pub precipitation: f64,
    /// 入流流量 [m³/s]
    pub discharge: f64,
}

/// 按目录顺序保存的全部事件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RealizationCatalog {
    events: Vec<RealizationEvent>,
}

impl RealizationCatalog {
    /// 由事件列表创建
    pub fn new(events: Vec<RealizationEvent>) -> Self {
        Self { events }
    }

    /// 某个实现的全部事件，保持目录顺序
    pub fn events_for(&self, realization: u32) -> impl Iterator<Item = &RealizationEvent> + '_ {
        self.events
            .iter()
            .filter(move |e| e.realization == realization)
    }

    /// 目录中出现过的实现编号（升序）
    pub fn realizations(&self) -> BTreeSet<u32> {
        self.events.iter().map(|e| e.realization).collect()
    }

    /// 全部事件
    pub fn events(&self) -> &[RealizationEvent] {
        &self.events
    }

    /// 事件总数
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// 从文件加载目录
pub fn load_catalog(path: &Path, config: &CatalogConfig) -> FpResult<RealizationCatalog> {
    if !path.exists() {
        return Err(FpError::file_not_found(path));
    }
    let content = std::fs::read_to_string(path).map_err(|e| {
        FpError::io_with_source(format!("Failed to read {}", path.display()), e)
    })?;

    let catalog = parse_catalog_content(&content, config, path)?;
    tracing::info!(
        "Loaded realization catalog {}: {} events in {} realizations",
        path.display(),
        catalog.len(),
        catalog.realizations().len()
    );
    Ok(catalog)
}

/// 从字符串解析目录
pub fn parse_catalog(content: &str, config: &CatalogConfig) -> FpResult<RealizationCatalog> {
    parse_catalog_content(content, config, Path::new("<string>"))
}

/// 解析事件时间
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// 解析实现编号，接受 `3` 和 `3.0`
fn parse_realization(s: &str) -> Option<u32> {
    s.parse::<u32>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    })
}

/// 单字节 ASCII 字符，csv 读取器只接受字节分隔符
fn ascii_byte(key: &str, c: char) -> FpResult<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(FpError::invalid_config(
            key,
            c.to_string(),
            "必须是单字节 ASCII 字符",
        ))
    }
}

/// 在表头中按名称查找列
fn resolve_column(
    name: &str,
    headers: &csv::StringRecord,
    path: &Path,
    line: usize,
) -> FpResult<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| FpError::parse(path, line, format!("缺少列 '{}'", name)))
}

/// 内部解析函数
fn parse_catalog_content(
    content: &str,
    config: &CatalogConfig,
    path: &Path,
) -> FpResult<RealizationCatalog> {
    let delimiter = ascii_byte("catalog.delimiter", config.delimiter)?;
    let comment = config
        .comment_prefix
        .map(|c| ascii_byte("catalog.comment_prefix", c))
        .transpose()?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .comment(comment)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    // 表头
    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, &e))?
        .clone();
    let header_line = headers.position().map_or(1, |p| p.line() as usize);
    if headers.is_empty() {
        return Err(FpError::parse(path, header_line, "目录为空，缺少表头"));
    }

    let real_col = resolve_column(&config.realization_column, &headers, path, header_line)?;
    let time_col = resolve_column(&config.datetime_column, &headers, path, header_line)?;
    let precip_col = resolve_column(&config.precipitation_column, &headers, path, header_line)?;
    let dis_col = resolve_column(&config.discharge_column, &headers, path, header_line)?;
    let max_col = real_col.max(time_col).max(precip_col).max(dis_col);

    let mut events = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, &e))?;
        let line_num = record.position().map_or(0, |p| p.line() as usize);

        if record.len() <= max_col {
            return Err(FpError::parse(
                path,
                line_num,
                format!(
                    "Insufficient columns: expected at least {}, got {}",
                    max_col + 1,
                    record.len()
                ),
            ));
        }

        let field = |idx: usize| record.get(idx).unwrap_or_default();

        let realization = parse_realization(field(real_col)).ok_or_else(|| {
            FpError::parse(path, line_num, format!("无效的实现编号: '{}'", field(real_col)))
        })?;
        let timestamp = parse_timestamp(field(time_col)).ok_or_else(|| {
            FpError::parse(path, line_num, format!("无效的时间: '{}'", field(time_col)))
        })?;
        let precipitation = parse_finite(field(precip_col)).ok_or_else(|| {
            FpError::parse(path, line_num, format!("无效的降水: '{}'", field(precip_col)))
        })?;
        let discharge = parse_finite(field(dis_col)).ok_or_else(|| {
            FpError::parse(path, line_num, format!("无效的流量: '{}'", field(dis_col)))
        })?;

        events.push(RealizationEvent {
            realization,
            timestamp,
            precipitation,
            discharge,
        });
    }

    Ok(RealizationCatalog::new(events))
}

fn csv_error(path: &Path, err: &csv::Error) -> FpError {
    let line = err.position().map_or(0, |p| p.line() as usize);
    FpError::parse(path, line, format!("CSV 解析错误: {}", err))
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
