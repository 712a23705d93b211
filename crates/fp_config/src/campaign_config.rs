// crates/fp_config/src/campaign_config.rs

//! CampaignConfig - 战役配置
//!
//! JSON 格式，每一节都有默认值：
//!
//! ```json
//! {
//!   "realizations": { "start": 51, "end": 100 },
//!   "workspace": { "root": "run", "template_dir": "Model_Files", "results_dir": "Results" },
//!   "solver": { "executable": "MOD_FreeSurf2D.exe" },
//!   "catalog": { "path": "events.csv", "delimiter": "," }
//! }
//! ```
//!
//! `grid`、`inflow`、`buildings` 省略时使用参考研究区。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use fp_grid::{reference, Building, Grid, GridGeometry, InflowBoundary};
use fp_io::{CatalogConfig, DeckKeys};

use crate::error::ConfigError;

/// 战役配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// 网格
    #[serde(default = "reference::grid")]
    pub grid: Grid,

    /// 实现范围
    #[serde(default)]
    pub realizations: RealizationRange,

    /// 工作区路径
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// 文件名
    #[serde(default)]
    pub files: FileNames,

    /// 外部求解器
    #[serde(default)]
    pub solver: SolverSection,

    /// 输入卡片键名
    #[serde(default)]
    pub deck: DeckKeys,

    /// 实现目录
    #[serde(default)]
    pub catalog: CatalogSection,

    /// 入流边界
    #[serde(default = "reference::inflow_boundary")]
    pub inflow: InflowBoundary,

    /// 建筑
    #[serde(default = "reference::buildings")]
    pub buildings: Vec<Building>,
}

/// 实现范围（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizationRange {
    /// 起始实现
    #[serde(default = "default_start")]
    pub start: u32,
    /// 结束实现（含）
    #[serde(default = "default_end")]
    pub end: u32,
}

fn default_start() -> u32 { 51 }
fn default_end() -> u32 { 100 }

impl Default for RealizationRange {
    fn default() -> Self {
        Self {
            start: default_start(),
            end: default_end(),
        }
    }
}

impl RealizationRange {
    /// 创建范围
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// 按升序遍历
    pub fn iter(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}

/// 工作区路径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// 共享工作区，求解器在此目录运行
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// 模板文件目录（相对 root）
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,
    /// 结果目录（相对 root）
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

fn default_root() -> PathBuf { PathBuf::from(".") }
fn default_template_dir() -> PathBuf { PathBuf::from("Model_Files") }
fn default_results_dir() -> PathBuf { PathBuf::from("Results") }

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            template_dir: default_template_dir(),
            results_dir: default_results_dir(),
        }
    }
}

impl WorkspaceConfig {
    /// 模板目录的完整路径
    pub fn template_path(&self) -> PathBuf {
        self.root.join(&self.template_dir)
    }

    /// 结果目录的完整路径
    pub fn results_path(&self) -> PathBuf {
        self.root.join(&self.results_dir)
    }
}

/// 工作区中的文件名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNames {
    /// 输入卡片
    #[serde(default = "default_input_deck")]
    pub input_deck: String,
    /// 初始水深
    #[serde(default = "default_initial_depth")]
    pub initial_depth: String,
    /// 地形
    #[serde(default = "default_topography")]
    pub topography: String,
    /// Manning 糙率
    #[serde(default = "default_roughness")]
    pub roughness: String,
    /// 计算水深
    #[serde(default = "default_computed_depth")]
    pub computed_depth: String,
    /// U 面速度
    #[serde(default = "default_u_velocity")]
    pub u_velocity: String,
    /// V 面速度
    #[serde(default = "default_v_velocity")]
    pub v_velocity: String,
    /// U 面水深
    #[serde(default = "default_u_face_depth")]
    pub u_face_depth: String,
    /// V 面水深
    #[serde(default = "default_v_face_depth")]
    pub v_face_depth: String,
}

fn default_input_deck() -> String { "input.txt".into() }
fn default_initial_depth() -> String { "Depth.txt".into() }
fn default_topography() -> String { "Topo.txt".into() }
fn default_roughness() -> String { "Mann.txt".into() }
fn default_computed_depth() -> String { "H.txt".into() }
fn default_u_velocity() -> String { "U.txt".into() }
fn default_v_velocity() -> String { "V.txt".into() }
fn default_u_face_depth() -> String { "Hux.txt".into() }
fn default_v_face_depth() -> String { "Hvy.txt".into() }

impl Default for FileNames {
    fn default() -> Self {
        Self {
            input_deck: default_input_deck(),
            initial_depth: default_initial_depth(),
            topography: default_topography(),
            roughness: default_roughness(),
            computed_depth: default_computed_depth(),
            u_velocity: default_u_velocity(),
            v_velocity: default_v_velocity(),
            u_face_depth: default_u_face_depth(),
            v_face_depth: default_v_face_depth(),
        }
    }
}

impl FileNames {
    /// 每个事件前从模板目录复制的文件
    pub fn templates(&self) -> [&str; 4] {
        [
            self.input_deck.as_str(),
            self.initial_depth.as_str(),
            self.topography.as_str(),
            self.roughness.as_str(),
        ]
    }

    /// 求解器写出的结果文件，每个事件暂存时清除
    pub fn solver_outputs(&self) -> [&str; 5] {
        [
            self.computed_depth.as_str(),
            self.u_velocity.as_str(),
            self.v_velocity.as_str(),
            self.u_face_depth.as_str(),
            self.v_face_depth.as_str(),
        ]
    }

    fn all(&self) -> [(&'static str, &str); 9] {
        [
            ("files.input_deck", self.input_deck.as_str()),
            ("files.initial_depth", self.initial_depth.as_str()),
            ("files.topography", self.topography.as_str()),
            ("files.roughness", self.roughness.as_str()),
            ("files.computed_depth", self.computed_depth.as_str()),
            ("files.u_velocity", self.u_velocity.as_str()),
            ("files.v_velocity", self.v_velocity.as_str()),
            ("files.u_face_depth", self.u_face_depth.as_str()),
            ("files.v_face_depth", self.v_face_depth.as_str()),
        ]
    }
}

/// 外部求解器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSection {
    /// 可执行文件
    #[serde(default = "default_executable")]
    pub executable: PathBuf,
}

fn default_executable() -> PathBuf { PathBuf::from("MOD_FreeSurf2D.exe") }

impl Default for SolverSection {
    fn default() -> Self {
        Self {
            executable: default_executable(),
        }
    }
}

/// 实现目录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSection {
    /// 目录 CSV 路径
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    /// 列名与分隔符
    #[serde(flatten)]
    pub format: CatalogConfig,
}

fn default_catalog_path() -> PathBuf { PathBuf::from("All_Events_Summary-Processed.csv") }

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            format: CatalogConfig::default(),
        }
    }
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            grid: reference::grid(),
            realizations: RealizationRange::default(),
            workspace: WorkspaceConfig::default(),
            files: FileNames::default(),
            solver: SolverSection::default(),
            deck: DeckKeys::default(),
            catalog: CatalogSection::default(),
            inflow: reference::inflow_boundary(),
            buildings: reference::buildings(),
        }
    }
}

impl CampaignConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        let config = Self::from_json_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 字符串解析（不校验）
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.realizations.start > self.realizations.end {
            return Err(ConfigError::invalid(
                "realizations",
                format!("{}..={}", self.realizations.start, self.realizations.end),
                "start 必须不大于 end",
            ));
        }

        for (key, name) in self.files.all() {
            if name.trim().is_empty() {
                return Err(ConfigError::Missing(key.to_string()));
            }
        }

        if self.solver.executable.as_os_str().is_empty() {
            return Err(ConfigError::Missing("solver.executable".to_string()));
        }

        if self.deck.depth_key.trim().is_empty() || self.deck.velocity_key.trim().is_empty() {
            return Err(ConfigError::Missing("deck.depth_key / deck.velocity_key".to_string()));
        }
        if self.deck.depth_key == self.deck.velocity_key {
            return Err(ConfigError::invalid(
                "deck.velocity_key",
                &self.deck.velocity_key,
                "水深与流速键名不能相同",
            ));
        }

        // 网格、分档、检查单元
        self.geometry()?;
        Ok(())
    }

    /// 构建并校验网格几何
    pub fn geometry(&self) -> Result<GridGeometry, ConfigError> {
        Ok(GridGeometry::new(
            self.grid,
            self.inflow.clone(),
            self.buildings.clone(),
        )?)
    }

    /// 实现目录的完整路径，相对路径以工作区根目录为基准
    pub fn catalog_path(&self) -> PathBuf {
        if self.catalog.path.is_absolute() {
            self.catalog.path.clone()
        } else {
            self.workspace.root.join(&self.catalog.path)
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }
}
