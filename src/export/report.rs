//! # 结果导出
//!
//! ## 支持格式
//! - 文本清单：每个文件一段，`名称:` 行后每个相一行
//!   （相标签、晶格常数、指数、峰位，Tab 分隔），段末空行；批处理时追加到同一文件
//! - CSV：峰列表（q, σ, 幅值），或相指认（每个反射一行）
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `models/` 的 PeakSet 与 IdentificationResult
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{Result, SaxsError};
use crate::models::{miller_label, IdentificationResult, PeakSet};

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// 一个文件的文本清单段落
pub fn format_listing(name: &str, result: &IdentificationResult) -> String {
    let mut out = format!("{}:\n", name);

    for assignment in result.phases.values() {
        out.push_str(&format!("{}\t{:.6}\t", assignment.phase, assignment.lattice_parameter));
        for index in &assignment.indices {
            out.push_str(&format!("{}\t", index));
        }
        for q in &assignment.peaks {
            out.push_str(&format!("{:.6}\t", q));
        }
        out.push('\n');
    }

    if !result.unassigned_peaks.is_empty() {
        out.push_str("unassigned\t");
        for q in &result.unassigned_peaks {
            out.push_str(&format!("{:.6}\t", q));
        }
        out.push('\n');
    }

    out.push('\n');
    out
}

/// 把清单段落追加到文件（不存在时创建）
pub fn append_listing(path: &Path, name: &str, result: &IdentificationResult) -> Result<()> {
    let write_err = |e: std::io::Error| SaxsError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_err)?;

    file.write_all(format_listing(name, result).as_bytes())
        .map_err(write_err)
}

/// 导出峰列表为 CSV
pub fn peaks_to_csv(peaks: &PeakSet, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["q", "sigma", "amplitude"])?;

    let optional = |v: Option<f64>| v.map(|x| format!("{:.6}", x)).unwrap_or_default();
    for peak in peaks.peaks() {
        wtr.write_record([
            format!("{:.6}", peak.q),
            optional(peak.sigma),
            optional(peak.amplitude),
        ])?;
    }

    wtr.flush().map_err(|e| SaxsError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出相指认为 CSV，每个 (文件, 相, 反射) 一行
pub fn assignments_to_csv(
    results: &[(String, IdentificationResult)],
    output_path: &Path,
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["name", "phase", "lattice_parameter", "index", "hkl", "q"])?;

    for (name, result) in results {
        for assignment in result.phases.values() {
            for (index, q) in assignment.reflections() {
                wtr.write_record([
                    name.clone(),
                    assignment.phase.to_string(),
                    format!("{:.4}", assignment.lattice_parameter),
                    index.to_string(),
                    miller_label(assignment.phase, index),
                    format!("{:.6}", q),
                ])?;
            }
        }
    }

    wtr.flush().map_err(|e| SaxsError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
