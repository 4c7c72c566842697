//! # identify 子命令实现
//!
//! 从峰列表（文件或内联字符串）识别相。
//!
//! ## 依赖关系
//! - 使用 `cli/identify.rs` 定义的 IdentifyArgs
//! - 使用 lipidsaxs 的 `parsers`、`phase`、`export`

use crate::cli::identify::IdentifyArgs;
use crate::utils::output;
use lipidsaxs::error::Result;
use lipidsaxs::phase::PhaseIdentifier;
use lipidsaxs::{export, parsers};

/// 执行相识别
pub fn execute(args: IdentifyArgs) -> Result<()> {
    output::print_header("Lipid Phase Identification");

    let identifier = PhaseIdentifier::new(args.phase.identify_config())?;
    let peaks = parsers::parse_peak_argument(&args.peaks)?;
    output::print_info(&format!(
        "{} peak(s), low-q limit {} Å⁻¹",
        peaks.len(),
        args.lo_q
    ));

    let result = identifier.identify(&peaks, args.lo_q);

    if result.is_empty() {
        output::print_warning("No phase could be verified");
    } else {
        output::print_success(&format!(
            "{} phase(s) confirmed in {} round(s)",
            result.phases.len(),
            result.rounds
        ));
        super::print_phase_table(&result);
    }

    if let Some(msg) = super::describe_unassigned(&result) {
        output::print_warning(&msg);
    }

    if let Some(path) = &args.output {
        export::assignments_to_csv(&[("peaks".to_string(), result)], path)?;
        output::print_success(&format!("Assignments saved to '{}'", path.display()));
    }

    Ok(())
}
