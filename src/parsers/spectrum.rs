//! # SAXS 曲线文件解析器
//!
//! 两列文本文件：q 与 I(q)，可能带有额外列（误差等，忽略）。
//!
//! ## 格式约定
//! - 分隔符由仪器决定（Ganesha 为 Tab，DLS 为逗号）；未指定仪器时
//!   从第一行数据推断（Tab、逗号、分号，否则按空白）
//! - 前两列无法解析为数字的行（表头、注释）跳过
//! - 含 NaN/Inf 的行丢弃
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/spectrum.rs`、`detect/instrument.rs`
//! - 使用 `csv` 读取分隔文本

use crate::detect::Instrument;
use crate::error::{Result, SaxsError};
use crate::models::Spectrum;

use std::fs;
use std::path::Path;

/// 解析曲线文件，名称取文件名主干
pub fn parse_spectrum_file(path: &Path, instrument: Option<Instrument>) -> Result<Spectrum> {
    if !path.exists() {
        return Err(SaxsError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| SaxsError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    parse_spectrum_content(&content, name, instrument.map(Instrument::delimiter)).map_err(|e| {
        match e {
            SaxsError::ParseError { format, reason, .. } => SaxsError::ParseError {
                format,
                path: path.display().to_string(),
                reason,
            },
            other => other,
        }
    })
}

/// 从字符串内容解析曲线
pub fn parse_spectrum_content(
    content: &str,
    name: &str,
    delimiter: Option<u8>,
) -> Result<Spectrum> {
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(content));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());

    let mut q = Vec::new();
    let mut intensity = Vec::new();

    for record in reader.records() {
        let record = record?;
        // 空白分隔时连续空格会产生空字段
        let mut fields = record.iter().filter(|f| !f.is_empty());

        let (Some(x), Some(y)) = (fields.next(), fields.next()) else {
            continue;
        };
        let (Ok(x), Ok(y)) = (x.parse::<f64>(), y.parse::<f64>()) else {
            continue;
        };

        if x.is_finite() && y.is_finite() {
            q.push(x);
            intensity.push(y);
        }
    }

    if q.is_empty() {
        return Err(SaxsError::ParseError {
            format: "spectrum".to_string(),
            path: name.to_string(),
            reason: "no numeric (q, I) rows found".to_string(),
        });
    }

    Spectrum::new(name, q, intensity)
}

/// 由第一行数据推断分隔符
fn sniff_delimiter(content: &str) -> u8 {
    let first_data_line = content
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or("");

    if first_data_line.contains('\t') {
        b'\t'
    } else if first_data_line.contains(',') {
        b','
    } else if first_data_line.contains(';') {
        b';'
    } else {
        b' '
    }
}
