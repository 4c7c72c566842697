//! # identify 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/identify.rs`

use super::options::PhaseArgs;

use clap::Args;
use std::path::PathBuf;

/// identify 子命令参数
#[derive(Args, Debug)]
pub struct IdentifyArgs {
    /// Peak positions in Å⁻¹: a file, or an inline list such as "0.1,0.122,0.141"
    pub peaks: String,

    /// Low-q limit used when the peaks were searched (Å⁻¹)
    #[arg(long, default_value_t = 0.04)]
    pub lo_q: f64,

    #[command(flatten)]
    pub phase: PhaseArgs,

    /// Write the assignments to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
