// crates/fp_io/src/lib.rs

//! FloodPRA IO 模块
//!
//! 与外部求解器和数据文件打交道的全部文本格式。
//!
//! # 模块
//!
//! - [`deck`]: 求解器输入卡片中入流剖面行的改写
//! - [`array`]: 求解器输出的空白分隔数值数组
//! - [`import`]: 气候实现目录（CSV）导入
//! - [`exporters`]: 战役汇总表与淹没表的 CSV 导出
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use fp_io::import::{load_catalog, CatalogConfig};
//!
//! let catalog = load_catalog(Path::new("Realizations.csv"), &CatalogConfig::default())?;
//! for event in catalog.events_for(3) {
//!     println!("{} {:.2}", event.timestamp, event.discharge);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod deck;
pub mod exporters;
pub mod import;

// 重导出常用类型
pub use array::{load_array, parse_array};
pub use deck::{rewrite_inflow_deck, write_inflow_deck, DeckKeys};
pub use exporters::{
    inundation_table_name, summary_table_name, write_inundation_csv, write_summary_csv,
    SummaryRow,
};
pub use import::{load_catalog, parse_catalog, CatalogConfig, RealizationCatalog, RealizationEvent};
