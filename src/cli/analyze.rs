//! # analyze 子命令 CLI 定义
//!
//! 完整流程：峰检测 + 相识别。输入为目录时进入批量模式。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/analyze.rs`

use super::options::{DetectArgs, PhaseArgs};

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 图像输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum FigureFormat {
    /// PNG image
    #[default]
    Png,
    /// SVG vector image
    Svg,
}

impl FigureFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FigureFormat::Png => "png",
            FigureFormat::Svg => "svg",
        }
    }
}

/// analyze 子命令参数
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input: SAXS curve file or directory of curve files
    pub input: PathBuf,

    #[command(flatten)]
    pub detect: DetectArgs,

    #[command(flatten)]
    pub phase: PhaseArgs,

    /// Text listing the results are appended to
    #[arg(short, long, default_value = "phases.txt")]
    pub listing: PathBuf,

    /// Also write every assignment to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Directory for log(I) figures with peak markers (no figures if omitted)
    #[arg(long)]
    pub figures: Option<PathBuf>,

    /// Figure format
    #[arg(long, value_enum, default_value = "png")]
    pub figure_format: FigureFormat,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode, e.g., "*.dat,*.csv")
    #[arg(long, default_value = "*.dat,*.csv,*.txt")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,
}
