// crates/fp_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `FpError` 枚举和 `FpResult` 类型别名。所有错误均为致命错误：
//! 战役（campaign）不做任何自动重试，出错即记录原因并终止。
//!
//! # 错误分类
//!
//! 通过 [`FpError::kind`] 将每个错误归入四类之一：
//!
//! | 分类 | 典型原因 |
//! |------|----------|
//! | [`ErrorKind::Configuration`] | 流量无匹配分档、输入卡片行格式错误、建筑检查单元越界 |
//! | [`ErrorKind::Shape`] | 数组尺寸与网格声明不符，求解器输出损坏 |
//! | [`ErrorKind::ExternalTool`] | 求解器退出码非零 |
//! | [`ErrorKind::Io`] | 模板文件复制失败、文件不存在 |
//!
//! # 示例
//!
//! ```
//! use fp_foundation::error::{ErrorKind, FpError, FpResult};
//!
//! fn pick_bin(discharge: f64) -> FpResult<usize> {
//!     Err(FpError::no_matching_bin(discharge))
//! }
//!
//! let err = pick_bin(0.0).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Configuration);
//! ```

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 统一结果类型
pub type FpResult<T> = Result<T, FpError>;

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 配置错误（永不重试）
    Configuration,
    /// 形状错误（数组尺寸不符，说明工作区或求解器输出已损坏）
    Shape,
    /// 外部工具错误（求解器失败）
    ExternalTool,
    /// IO 错误
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Configuration => "ConfigurationError",
            Self::Shape => "ShapeError",
            Self::ExternalTool => "ExternalToolError",
            Self::Io => "IOError",
        };
        write!(f, "{}", s)
    }
}

/// FloodPRA 错误类型
#[derive(Error, Debug)]
pub enum FpError {
    // ========================================================================
    // 配置错误
    // ========================================================================
    /// 没有任何流量分档包含该流量
    #[error("未找到流量 {discharge:.2} 对应的入流边界分档")]
    NoMatchingBin {
        /// 输入流量 [m³/s]
        discharge: f64,
    },

    /// 输入卡片中键匹配但格式错误的行
    #[error("输入卡片第{line}行 ({key}) 格式错误: {message}")]
    MalformedDeckLine {
        /// 卡片键
        key: String,
        /// 行号（1 起始）
        line: usize,
        /// 错误信息
        message: String,
    },

    /// 输入卡片缺少必需的键
    #[error("输入卡片缺少键: {key}")]
    MissingDeckKey {
        /// 卡片键
        key: String,
    },

    /// 建筑检查单元超出网格
    #[error("建筑 {building_id} 的检查单元 ({row}, {col}) 超出网格 1..={rows} x 1..={cols}")]
    CheckCellOutOfRange {
        /// 建筑编号
        building_id: u32,
        /// 行（1 起始）
        row: u32,
        /// 列（1 起始）
        col: u32,
        /// 网格行数
        rows: usize,
        /// 网格列数
        cols: usize,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidConfig {
        /// 配置键名
        key: String,
        /// 配置值
        value: String,
        /// 无效原因说明
        reason: String,
    },

    /// 文本解析错误（目录、配置）
    #[error("文件解析错误: {file} 第{line}行: {message}")]
    Parse {
        /// 文件路径
        file: PathBuf,
        /// 行号
        line: usize,
        /// 错误信息
        message: String,
    },

    // ========================================================================
    // 形状错误
    // ========================================================================
    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 求解器输出数组中出现非数值
    #[error("数组文件解析错误: {file} 第{line}行: {message}")]
    ArrayParse {
        /// 文件路径
        file: PathBuf,
        /// 行号
        line: usize,
        /// 错误信息
        message: String,
    },

    // ========================================================================
    // 外部工具错误
    // ========================================================================
    /// 外部求解器执行失败
    #[error("外部工具 {tool} 执行失败 (退出状态: {status:?}): {stderr}")]
    ExternalTool {
        /// 工具名
        tool: String,
        /// 退出码，被信号终止时为 None
        status: Option<i32>,
        /// 标准错误输出
        stderr: String,
    },

    // ========================================================================
    // IO 错误
    // ========================================================================
    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 文件不存在
    #[error("文件不存在: {path}")]
    FileNotFound {
        /// 未找到的路径
        path: PathBuf,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl FpError {
    /// 流量无匹配分档
    pub fn no_matching_bin(discharge: f64) -> Self {
        Self::NoMatchingBin { discharge }
    }

    /// 卡片行格式错误
    pub fn malformed_deck_line(
        key: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedDeckLine {
            key: key.into(),
            line,
            message: message.into(),
        }
    }

    /// 卡片缺少键
    pub fn missing_deck_key(key: impl Into<String>) -> Self {
        Self::MissingDeckKey { key: key.into() }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 配置值无效
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// 解析错误
    pub fn parse(file: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 数组文件解析错误
    pub fn array_parse(file: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::ArrayParse {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// 外部工具失败
    pub fn external_tool(
        tool: impl Into<String>,
        status: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            status,
            stderr: stderr.into(),
        }
    }

    /// 从描述创建 IO 错误
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// 从 IO 错误创建（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 文件不存在
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// 错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoMatchingBin { .. }
            | Self::MalformedDeckLine { .. }
            | Self::MissingDeckKey { .. }
            | Self::CheckCellOutOfRange { .. }
            | Self::Config { .. }
            | Self::InvalidConfig { .. }
            | Self::Parse { .. } => ErrorKind::Configuration,
            Self::SizeMismatch { .. } | Self::ArrayParse { .. } => ErrorKind::Shape,
            Self::ExternalTool { .. } => ErrorKind::ExternalTool,
            Self::Io { .. } | Self::FileNotFound { .. } => ErrorKind::Io,
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl FpError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> FpResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }
}

// ========================================================================
// 标准库错误转换
// ========================================================================

impl From<std::io::Error> for FpError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FpError::config("测试配置错误");
        assert!(err.to_string().contains("配置错误"));
    }

    #[test]
    fn test_no_matching_bin_display() {
        let err = FpError::no_matching_bin(12.5);
        assert!(err.to_string().contains("12.50"));
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(FpError::no_matching_bin(0.0).kind(), ErrorKind::Configuration);
        assert_eq!(
            FpError::malformed_deck_line("TDEPDYDEP", 3, "bad").kind(),
            ErrorKind::Configuration
        );
        assert_eq!(FpError::size_mismatch("U", 10, 9).kind(), ErrorKind::Shape);
        assert_eq!(
            FpError::array_parse("H.txt", 1, "nan?").kind(),
            ErrorKind::Shape
        );
        assert_eq!(
            FpError::external_tool("solver", Some(1), "").kind(),
            ErrorKind::ExternalTool
        );
        assert_eq!(FpError::io("copy").kind(), ErrorKind::Io);
        assert_eq!(FpError::file_not_found("/x").kind(), ErrorKind::Io);
    }

    #[test]
    fn test_check_size() {
        assert!(FpError::check_size("test", 10, 10).is_ok());
        assert!(FpError::check_size("test", 10, 5).is_err());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let fp_err: FpError = io_err.into();
        assert!(matches!(fp_err, FpError::Io { .. }));
        assert_eq!(fp_err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::Shape.to_string(), "ShapeError");
        assert_eq!(ErrorKind::ExternalTool.to_string(), "ExternalToolError");
    }
}
