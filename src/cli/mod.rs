//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `find`: 从曲线文件检测峰位
//! - `identify`: 从峰列表识别相
//! - `analyze`: 完整流程（单文件或批量目录）
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: options, find, identify, analyze

pub mod analyze;
pub mod find;
pub mod identify;
pub mod options;

use clap::{Parser, Subcommand};

/// lipidsaxs - SAXS 峰检测与脂质相识别
#[derive(Parser)]
#[command(name = "lipidsaxs")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Bragg peak finding and lipid mesophase identification for 1D SAXS data", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Detect Bragg peaks in a SAXS curve
    Find(find::FindArgs),

    /// Identify lipid phases from a list of peak positions
    Identify(identify::IdentifyArgs),

    /// Detect peaks and identify phases for one file or a whole folder
    Analyze(analyze::AnalyzeArgs),
}
