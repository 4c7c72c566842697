//! # find 子命令实现
//!
//! 读取一条曲线，检测峰位并输出表格；可选导出 CSV 与叠加图。
//!
//! ## 依赖关系
//! - 使用 `cli/find.rs` 定义的 FindArgs
//! - 使用 lipidsaxs 的 `parsers`、`detect`、`export`

use crate::cli::find::FindArgs;
use crate::utils::output;
use lipidsaxs::detect::PeakDetector;
use lipidsaxs::error::Result;
use lipidsaxs::{export, parsers};

/// 执行峰检测
pub fn execute(args: FindArgs) -> Result<()> {
    output::print_header("Bragg Peak Detection");

    let config = args.detect.detector_config()?;
    let detector = PeakDetector::new(config)?;
    let cfg = detector.config();
    output::print_detector_settings(cfg, cfg.height_threshold()?);

    let spectrum = parsers::parse_spectrum_file(&args.input, cfg.instrument)?;
    output::print_info(&format!(
        "Loaded '{}' ({} points)",
        spectrum.name,
        spectrum.len()
    ));

    let report = detector.detect_with_report(&spectrum);
    output::print_info(&format!(
        "{} samples in q = {}-{}: {} accepted fits, {} rejected",
        report.samples,
        cfg.lo_q,
        cfg.hi_q,
        report.raw_detections.len(),
        report.rejections.total()
    ));

    if report.peaks.is_empty() {
        output::print_warning("No peaks found in the search window");
    } else {
        output::print_success(&format!("Found {} peak(s)", report.peaks.len()));
        super::print_peak_table(&report.peaks);
    }

    if let Some(path) = &args.output {
        export::peaks_to_csv(&report.peaks, path)?;
        output::print_success(&format!("Peak list saved to '{}'", path.display()));
    }

    if let Some(path) = &args.plot {
        export::plot_peaks(
            &spectrum,
            &report.peaks,
            (cfg.lo_q, cfg.hi_q),
            path,
            export::DEFAULT_SIZE,
        )?;
        output::print_success(&format!("Figure saved to '{}'", path.display()));
    }

    Ok(())
}
