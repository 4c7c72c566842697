//! # 峰列表解析器
//!
//! 峰位 q 列表，来自文件或命令行字符串，
//! 以逗号、分号或空白分隔；`#` 之后为注释。
//!
//! ## 依赖关系
//! - 被 `commands/identify.rs` 使用
//! - 使用 `models/peak.rs`

use crate::error::{Result, SaxsError};
use crate::models::PeakSet;

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[,;\s]+").expect("separator pattern is valid"))
}

/// 解析峰列表字符串
pub fn parse_peak_list(content: &str) -> Result<PeakSet> {
    let mut positions = Vec::new();

    for line in content.lines() {
        let data = line.split('#').next().unwrap_or("");
        for token in separator().split(data.trim()).filter(|t| !t.is_empty()) {
            let q: f64 = token.parse().map_err(|_| {
                SaxsError::InvalidArgument(format!("'{}' is not a peak position", token))
            })?;
            if !q.is_finite() || q <= 0.0 {
                return Err(SaxsError::InvalidArgument(format!(
                    "peak position must be positive, got {}",
                    token
                )));
            }
            positions.push(q);
        }
    }

    Ok(PeakSet::from_positions(&positions))
}

/// 解析峰列表文件
pub fn parse_peak_file(path: &Path) -> Result<PeakSet> {
    let content = fs::read_to_string(path).map_err(|e| SaxsError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_peak_list(&content).map_err(|e| SaxsError::ParseError {
        format: "peak list".to_string(),
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// 参数若是存在的文件则按文件解析，否则当作内联列表
pub fn parse_peak_argument(arg: &str) -> Result<PeakSet> {
    let path = Path::new(arg);
    if path.is_file() {
        parse_peak_file(path)
    } else {
        parse_peak_list(arg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_separators() {
        let set = parse_peak_list("0.12, 0.15;0.17  0.2\n0.1\t# comment 0.9").unwrap();
        assert_eq!(set.positions(), vec![0.1, 0.12, 0.15, 0.17, 0.2]);
    }

    #[test]
    fn test_invalid_token() {
        assert!(parse_peak_list("0.1, abc").is_err());
        assert!(parse_peak_list("0.1, -0.2").is_err());
    }

    #[test]
    fn test_empty_list() {
        assert!(parse_peak_list("  \n# nothing\n").unwrap().is_empty());
    }
}
