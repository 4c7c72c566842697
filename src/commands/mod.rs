//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑，以及命令间共用的表格输出。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`、`utils/` 与 lipidsaxs 库
//! - 子模块: find, identify, analyze

pub mod analyze;
pub mod find;
pub mod identify;

use crate::cli::Commands;
use lipidsaxs::error::Result;
use lipidsaxs::models::{IdentificationResult, PeakSet};

use std::f64::consts::PI;
use tabled::{Table, Tabled};

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Find(args) => find::execute(args),
        Commands::Identify(args) => identify::execute(args),
        Commands::Analyze(args) => analyze::execute(args),
    }
}

/// 峰列表表格行
#[derive(Debug, Clone, Tabled)]
struct PeakRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "q (Å⁻¹)")]
    q: String,
    #[tabled(rename = "d (Å)")]
    d_spacing: String,
    #[tabled(rename = "σ (Å⁻¹)")]
    sigma: String,
    #[tabled(rename = "Amplitude")]
    amplitude: String,
}

/// 相指认表格行
#[derive(Debug, Clone, Tabled)]
struct PhaseRow {
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "a (Å)")]
    lattice: String,
    #[tabled(rename = "Peaks")]
    count: usize,
    #[tabled(rename = "(hkl)")]
    labels: String,
    #[tabled(rename = "q (Å⁻¹)")]
    positions: String,
}

/// 打印峰列表
pub(crate) fn print_peak_table(peaks: &PeakSet) {
    let optional = |v: Option<f64>, digits: usize| {
        v.map(|x| format!("{:.*}", digits, x))
            .unwrap_or_else(|| "-".to_string())
    };

    let rows: Vec<PeakRow> = peaks
        .peaks()
        .iter()
        .enumerate()
        .map(|(i, p)| PeakRow {
            index: i + 1,
            q: format!("{:.5}", p.q),
            d_spacing: format!("{:.2}", 2.0 * PI / p.q),
            sigma: optional(p.sigma, 5),
            amplitude: optional(p.amplitude, 4),
        })
        .collect();

    println!("{}", Table::new(&rows));
}

/// 打印相指认结果
pub(crate) fn print_phase_table(result: &IdentificationResult) {
    let rows: Vec<PhaseRow> = result
        .phases
        .values()
        .map(|a| PhaseRow {
            phase: a.phase.to_string(),
            lattice: format!("{:.2}", a.lattice_parameter),
            count: a.peaks.len(),
            labels: a.labels().join(" "),
            positions: a
                .peaks
                .iter()
                .map(|q| format!("{:.4}", q))
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect();

    println!("{}", Table::new(&rows));
}

/// 未指认峰的文字说明
pub(crate) fn describe_unassigned(result: &IdentificationResult) -> Option<String> {
    if result.unassigned_peaks.is_empty() {
        return None;
    }
    let list = result
        .unassigned_peaks
        .iter()
        .map(|q| format!("{:.4}", q))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "{} unassigned peak(s): {}",
        result.unassigned_peaks.len(),
        list
    ))
}
