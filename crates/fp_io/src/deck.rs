// crates/fp_io/src/deck.rs

//! 求解器输入卡片改写
//!
//! 输入卡片是按行组织的 `KEY = v0 v1 ... v(cols-1)` 文本，
//! 夹杂 `#` 注释行和空行。入流边界只改写两行：
//!
//! ```text
//! TDEPDYDEP =  0.00  0.00 ...  1.00  3.50 ...
//! VELDYVEL =  0.00  0.00 ...  1.00  1.00 ...
//! ```
//!
//! 其余每一行（包括行尾符）原样保留。

use std::path::Path;

use fp_foundation::error::{FpError, FpResult};
use fp_physics::InflowProfile;
use serde::{Deserialize, Serialize};

/// 入流剖面在输入卡片中的键名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckKeys {
    /// 入流水深行的键
    #[serde(default = "default_depth_key")]
    pub depth_key: String,
    /// 入流流速行的键
    #[serde(default = "default_velocity_key")]
    pub velocity_key: String,
}

fn default_depth_key() -> String {
    "TDEPDYDEP".into()
}

fn default_velocity_key() -> String {
    "VELDYVEL".into()
}

impl Default for DeckKeys {
    fn default() -> Self {
        Self {
            depth_key: default_depth_key(),
            velocity_key: default_velocity_key(),
        }
    }
}

/// 拆出行尾符
fn split_terminator(segment: &str) -> (&str, &str) {
    if let Some(body) = segment.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = segment.strip_suffix('\n') {
        (body, "\n")
    } else {
        (segment, "")
    }
}

/// 行的键名，注释行、过短行和不含 `=` 的行返回 None
fn line_key(body: &str) -> Option<(&str, &str)> {
    let stripped = body.trim();
    if stripped.len() < 3 || stripped.starts_with('#') {
        return None;
    }
    stripped
        .split_once('=')
        .map(|(lhs, rhs)| (lhs.trim(), rhs))
}

/// 检查被替换行的右侧恰好是 `cols` 个浮点数
fn check_values(key: &str, line: usize, rhs: &str, cols: usize) -> FpResult<()> {
    let mut count = 0;
    for token in rhs.split_whitespace() {
        if token.parse::<f64>().is_err() {
            return Err(FpError::malformed_deck_line(
                key,
                line,
                format!("非数值: '{}'", token),
            ));
        }
        count += 1;
    }
    if count != cols {
        return Err(FpError::malformed_deck_line(
            key,
            line,
            format!("期望 {} 个数值, 实际 {}", cols, count),
        ));
    }
    Ok(())
}

fn format_line(key: &str, values: &[f64], terminator: &str) -> String {
    let mut out = String::with_capacity(key.len() + 3 + values.len() * 6 + terminator.len());
    out.push_str(key);
    out.push_str(" = ");
    for v in values {
        out.push_str(&format!("{:5.2} ", v));
    }
    out.push_str(terminator);
    out
}

/// 将入流剖面写入卡片文本
///
/// 返回改写后的完整文本；出错时不产生任何输出。
///
/// # 错误
///
/// - 剖面长度与 `cols` 不符: [`FpError::SizeMismatch`]
/// - 键匹配但数值个数或格式不对: [`FpError::MalformedDeckLine`]
/// - 任一键不存在: [`FpError::MissingDeckKey`]
pub fn rewrite_inflow_deck(
    content: &str,
    keys: &DeckKeys,
    profile: &InflowProfile,
    cols: usize,
) -> FpResult<String> {
    FpError::check_size("inflow depth profile", cols, profile.depth.len())?;
    FpError::check_size("inflow velocity profile", cols, profile.velocity.len())?;

    let mut out = String::with_capacity(content.len() + cols * 12);
    let mut found_depth = false;
    let mut found_velocity = false;

    for (idx, segment) in content.split_inclusive('\n').enumerate() {
        let (body, terminator) = split_terminator(segment);
        let line = idx + 1;

        match line_key(body) {
            Some((key, rhs)) if key == keys.depth_key => {
                check_values(key, line, rhs, cols)?;
                out.push_str(&format_line(key, &profile.depth, terminator));
                found_depth = true;
            }
            Some((key, rhs)) if key == keys.velocity_key => {
                check_values(key, line, rhs, cols)?;
                out.push_str(&format_line(key, &profile.velocity, terminator));
                found_velocity = true;
            }
            _ => out.push_str(segment),
        }
    }

    if !found_depth {
        return Err(FpError::missing_deck_key(&keys.depth_key));
    }
    if !found_velocity {
        return Err(FpError::missing_deck_key(&keys.velocity_key));
    }

    Ok(out)
}

/// 就地改写卡片文件
pub fn write_inflow_deck(
    path: &Path,
    keys: &DeckKeys,
    profile: &InflowProfile,
    cols: usize,
) -> FpResult<()> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        FpError::io_with_source(format!("Failed to read {}", path.display()), e)
    })?;

    let rewritten = rewrite_inflow_deck(&content, keys, profile, cols)?;

    std::fs::write(path, rewritten).map_err(|e| {
        FpError::io_with_source(format!("Failed to write {}", path.display()), e)
    })?;

    tracing::debug!(
        "Inflow deck updated: {} (bin {}, top_height {:.4})",
        path.display(),
        profile.bin_index,
        profile.top_height
    );
    Ok(())
}
