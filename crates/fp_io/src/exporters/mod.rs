// crates/fp_io/src/exporters/mod.rs

//! 数据导出模块
//!
//! - [`csv`]: 战役汇总表与逐事件淹没表

pub mod csv;

pub use csv::{
    inundation_table_name, summary_table_name, write_inundation, write_inundation_csv,
    write_summary, write_summary_csv, SummaryRow,
};
