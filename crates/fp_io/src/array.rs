// crates/fp_io/src/array.rs

//! 求解器输出数组读取
//!
//! 求解器把每个场写成空白分隔的文本矩阵，一行对应一行网格。
//! 读取结果按行优先展平，形状由调用方对照网格检查。

use std::path::Path;

use fp_foundation::error::{FpError, FpResult};

/// 从字符串解析数组
///
/// `source` 只用于错误信息。
pub fn parse_array(content: &str, source: &Path) -> FpResult<Vec<f64>> {
    let mut values = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        for token in line.split_whitespace() {
            let v = token.parse::<f64>().map_err(|_| {
                FpError::array_parse(source, line_num + 1, format!("非数值: '{}'", token))
            })?;
            values.push(v);
        }
    }
    Ok(values)
}

/// 从文件读取数组
///
/// # 错误
///
/// - 文件不存在: [`FpError::FileNotFound`]
/// - 出现非数值: [`FpError::ArrayParse`]
pub fn load_array(path: &Path) -> FpResult<Vec<f64>> {
    if !path.exists() {
        return Err(FpError::file_not_found(path));
    }
    let content = std::fs::read_to_string(path).map_err(|e| {
        FpError::io_with_source(format!("Failed to read {}", path.display()), e)
    })?;
    let values = parse_array(&content, path)?;
    tracing::trace!("Loaded {} values from {}", values.len(), path.display());
    Ok(values)
}
