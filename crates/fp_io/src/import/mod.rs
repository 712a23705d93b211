// crates/fp_io/src/import/mod.rs

//! 数据导入模块

pub mod catalog;

pub use catalog::{
    load_catalog, parse_catalog, CatalogConfig, RealizationCatalog, RealizationEvent,
};
