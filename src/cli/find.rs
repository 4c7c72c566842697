//! # find 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/find.rs`

use super::options::DetectArgs;

use clap::Args;
use std::path::PathBuf;

/// find 子命令参数
#[derive(Args, Debug)]
pub struct FindArgs {
    /// SAXS curve file (two columns: q, I)
    pub input: PathBuf,

    #[command(flatten)]
    pub detect: DetectArgs,

    /// Write the peak list to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save a log(I) figure with peak markers (.png or .svg)
    #[arg(short, long)]
    pub plot: Option<PathBuf>,
}
