// crates/fp_workflow/src/solver.rs

//! 外部水动力求解器
//!
//! 求解器是一个不带参数的可执行文件，在共享工作区中读取输入卡片和
//! 初始场，写出结果数组。调用阻塞直到进程退出，没有超时。

use std::path::{Path, PathBuf};
use std::process::Command;

use fp_foundation::error::{FpError, FpResult};

/// 求解器进程结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutcome {
    /// 退出码，被信号终止时为 None
    pub status: Option<i32>,
    /// 标准输出
    pub stdout: String,
    /// 标准错误
    pub stderr: String,
}

impl SolverOutcome {
    /// 正常退出的结果
    pub fn ok() -> Self {
        Self {
            status: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// 是否成功（退出码为 0）
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// 求解器抽象
pub trait HydraulicSolver: Send + Sync {
    /// 在工作区中运行一次
    ///
    /// 只有无法启动进程时返回错误；非零退出通过 [`SolverOutcome::status`] 报告。
    fn run(&self, workspace: &Path) -> FpResult<SolverOutcome>;

    /// 求解器名称 (用于日志)
    fn name(&self) -> &str {
        "solver"
    }
}

/// 以子进程方式运行的求解器
#[derive(Debug, Clone)]
pub struct ProcessSolver {
    executable: PathBuf,
    name: String,
}

impl ProcessSolver {
    /// 创建进程求解器
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        let executable = executable.into();
        let name = executable
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| executable.display().to_string());
        Self { executable, name }
    }

    /// 可执行文件路径
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// 解析实际启动的程序
    ///
    /// 相对路径先在工作区中查找，找不到再交给 PATH。
    fn program(&self, workspace: &Path) -> PathBuf {
        if self.executable.is_absolute() {
            return self.executable.clone();
        }
        let local = workspace.join(&self.executable);
        if local.is_file() {
            std::fs::canonicalize(&local).unwrap_or(local)
        } else {
            self.executable.clone()
        }
    }
}

impl HydraulicSolver for ProcessSolver {
    fn run(&self, workspace: &Path) -> FpResult<SolverOutcome> {
        let program = self.program(workspace);
        tracing::debug!(
            "Launching {} in {}",
            program.display(),
            workspace.display()
        );

        let output = Command::new(&program)
            .current_dir(workspace)
            .output()
            .map_err(|e| {
                FpError::external_tool(
                    &self.name,
                    None,
                    format!("无法启动 {}: {}", program.display(), e),
                )
            })?;

        Ok(SolverOutcome {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_foundation::error::ErrorKind;

    #[test]
    fn test_outcome_success() {
        assert!(SolverOutcome::ok().success());
        let failed = SolverOutcome {
            status: Some(3),
            ..SolverOutcome::ok()
        };
        assert!(!failed.success());
        let killed = SolverOutcome {
            status: None,
            ..SolverOutcome::ok()
        };
        assert!(!killed.success());
    }

    #[test]
    fn test_name_from_executable() {
        let solver = ProcessSolver::new("/opt/model/MOD_FreeSurf2D.exe");
        assert_eq!(solver.name(), "MOD_FreeSurf2D.exe");
    }

    #[test]
    fn test_missing_executable_is_external_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let solver = ProcessSolver::new(dir.path().join("no_such_solver"));
        let err = solver.run(dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExternalTool);
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_workspace() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("solve.sh");
        std::fs::write(&script, "#!/bin/sh\necho running\ntouch H.txt\nexit 0\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let solver = ProcessSolver::new("solve.sh");
        let outcome = solver.run(dir.path()).unwrap();
        assert!(outcome.success());
        assert_eq!(outcome.stdout.trim(), "running");
        assert!(dir.path().join("H.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fail.sh");
        std::fs::write(&script, "#!/bin/sh\necho boom >&2\nexit 7\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let outcome = ProcessSolver::new(&script).run(dir.path()).unwrap();
        assert_eq!(outcome.status, Some(7));
        assert_eq!(outcome.stderr.trim(), "boom");
    }
}
