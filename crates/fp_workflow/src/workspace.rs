// crates/fp_workflow/src/workspace.rs

//! 共享工作区
//!
//! 所有事件共用一个目录，每个事件开始前从模板目录覆盖复制
//! 输入卡片、初始水深、地形和糙率文件。求解器在同一目录写出结果。

use std::path::{Path, PathBuf};

use fp_config::{CampaignConfig, FileNames};
use fp_foundation::error::{FpError, FpResult};
use fp_io::load_array;
use fp_physics::RawOutputs;

/// 共享工作区
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    template_dir: PathBuf,
    results_dir: PathBuf,
    files: FileNames,
}

impl Workspace {
    /// 创建工作区
    pub fn new(
        root: impl Into<PathBuf>,
        template_dir: impl Into<PathBuf>,
        results_dir: impl Into<PathBuf>,
        files: FileNames,
    ) -> Self {
        Self {
            root: root.into(),
            template_dir: template_dir.into(),
            results_dir: results_dir.into(),
            files,
        }
    }

    /// 由战役配置创建
    pub fn from_config(config: &CampaignConfig) -> Self {
        Self::new(
            config.workspace.root.clone(),
            config.workspace.template_path(),
            config.workspace.results_path(),
            config.files.clone(),
        )
    }

    /// 工作区根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 模板目录
    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// 结果目录
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// 文件名
    pub fn files(&self) -> &FileNames {
        &self.files
    }

    /// 工作区中的文件
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// 输入卡片路径
    pub fn deck_path(&self) -> PathBuf {
        self.path(&self.files.input_deck)
    }

    /// 清除上一个事件的求解器输出，再从模板目录复制模板文件
    ///
    /// 求解器正常退出却没有写出结果时，读取输出会失败而不是拿到旧数据。
    ///
    /// # 错误
    ///
    /// - 模板不存在: [`FpError::FileNotFound`]
    /// - 删除或复制失败: [`FpError::Io`]
    pub fn stage(&self) -> FpResult<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            FpError::io_with_source(format!("Failed to create {}", self.root.display()), e)
        })?;

        for name in self.files.solver_outputs() {
            let stale = self.path(name);
            match std::fs::remove_file(&stale) {
                Ok(()) => tracing::trace!("Removed stale output {}", stale.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(FpError::io_with_source(
                        format!("Failed to remove {}", stale.display()),
                        e,
                    ))
                }
            }
        }

        for name in self.files.templates() {
            let src = self.template_dir.join(name);
            let dst = self.path(name);
            if !src.is_file() {
                return Err(FpError::file_not_found(src));
            }
            std::fs::copy(&src, &dst).map_err(|e| {
                FpError::io_with_source(
                    format!("Error copying file {} to {}", src.display(), dst.display()),
                    e,
                )
            })?;
        }
        tracing::trace!("Staged templates into {}", self.root.display());
        Ok(())
    }

    /// 读取求解器输出
    ///
    /// 只负责读取，数组形状由 [`fp_physics::reconcile`] 对照网格检查。
    pub fn load_outputs(&self) -> FpResult<RawOutputs> {
        let f = &self.files;
        Ok(RawOutputs {
            topo: load_array(&self.path(&f.topography))?,
            depth: load_array(&self.path(&f.computed_depth))?,
            u_face: load_array(&self.path(&f.u_velocity))?,
            v_face: load_array(&self.path(&f.v_velocity))?,
            u_face_depth: load_array(&self.path(&f.u_face_depth))?,
            v_face_depth: load_array(&self.path(&f.v_face_depth))?,
        })
    }

    /// 检查模板目录是否齐全，不复制
    pub fn check_templates(&self) -> FpResult<()> {
        for name in self.files.templates() {
            let src = self.template_dir.join(name);
            if !src.is_file() {
                return Err(FpError::file_not_found(src));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_foundation::error::ErrorKind;

    fn workspace(dir: &Path) -> Workspace {
        Workspace::new(
            dir.join("run"),
            dir.join("Model_Files"),
            dir.join("run").join("Results"),
            FileNames::default(),
        )
    }

    fn write_templates(dir: &Path) {
        let tpl = dir.join("Model_Files");
        std::fs::create_dir_all(&tpl).unwrap();
        for name in ["input.txt", "Depth.txt", "Topo.txt", "Mann.txt"] {
            std::fs::write(tpl.join(name), format!("template {name}\n")).unwrap();
        }
    }

    #[test]
    fn test_stage_overwrites_previous_event() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path());
        let ws = workspace(dir.path());

        ws.stage().unwrap();
        std::fs::write(ws.deck_path(), "modified by last event").unwrap();
        ws.stage().unwrap();

        let deck = std::fs::read_to_string(ws.deck_path()).unwrap();
        assert_eq!(deck, "template input.txt\n");
        assert!(ws.path("Mann.txt").exists());
    }

    #[test]
    fn test_stage_clears_previous_outputs() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path());
        let ws = workspace(dir.path());

        ws.stage().unwrap();
        for name in ["H.txt", "U.txt", "V.txt", "Hux.txt", "Hvy.txt"] {
            std::fs::write(ws.path(name), "1.0\n").unwrap();
        }
        ws.stage().unwrap();

        for name in ["H.txt", "U.txt", "V.txt", "Hux.txt", "Hvy.txt"] {
            assert!(!ws.path(name).exists(), "{name} survived staging");
        }
        assert!(ws.path("Topo.txt").exists());
        assert!(matches!(
            ws.load_outputs(),
            Err(FpError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_template_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path());
        std::fs::remove_file(dir.path().join("Model_Files").join("Mann.txt")).unwrap();

        let ws = workspace(dir.path());
        assert!(ws.check_templates().is_err());
        let err = ws.stage().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_load_outputs_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(dir.path());
        std::fs::create_dir_all(ws.root()).unwrap();
        std::fs::write(ws.path("Topo.txt"), "1 2\n").unwrap();
        assert!(matches!(
            ws.load_outputs(),
            Err(FpError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_from_config_paths() {
        let mut config = CampaignConfig::default();
        config.workspace.root = PathBuf::from("/data/run");
        let ws = Workspace::from_config(&config);
        assert_eq!(ws.template_dir(), Path::new("/data/run/Model_Files"));
        assert_eq!(ws.results_dir(), Path::new("/data/run/Results"));
        assert_eq!(ws.deck_path(), PathBuf::from("/data/run/input.txt"));
    }
}
