//! # analyze 子命令实现
//!
//! 完整流程：读取曲线 → 峰检测 → 相识别 → 清单/CSV/图像输出。
//!
//! ## 功能
//! - 支持单文件和批量目录处理
//! - 批量模式并行分析（rayon），结果按自然排序顺序追加到清单
//! - 可选叠加图 (PNG/SVG)
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的 AnalyzeArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 lipidsaxs 的 `parsers`、`detect`、`phase`、`export`

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::analyze::{AnalyzeArgs, FigureFormat};
use crate::utils::output;
use lipidsaxs::detect::PeakDetector;
use lipidsaxs::error::{Result, SaxsError};
use lipidsaxs::models::{IdentificationResult, PeakSet};
use lipidsaxs::phase::PhaseIdentifier;
use lipidsaxs::{export, parsers};

use std::fs;
use std::path::{Path, PathBuf};

/// 单个文件的分析结果
struct FileAnalysis {
    name: String,
    peaks: PeakSet,
    result: IdentificationResult,
}

/// 分析流程（批量模式下在各线程间共享）
struct Pipeline {
    detector: PeakDetector,
    identifier: PhaseIdentifier,
    figures: Option<(PathBuf, FigureFormat)>,
}

impl Pipeline {
    fn from_args(args: &AnalyzeArgs) -> Result<Self> {
        let detector = PeakDetector::new(args.detect.detector_config()?)?;
        let identifier = PhaseIdentifier::new(args.phase.identify_config())?;
        let figures = args
            .figures
            .as_ref()
            .map(|dir| (dir.clone(), args.figure_format));
        Ok(Self {
            detector,
            identifier,
            figures,
        })
    }

    /// 分析一条曲线；搜索区间内没有数据时返回 None
    fn analyze(&self, input: &Path) -> Result<Option<FileAnalysis>> {
        let cfg = self.detector.config();
        let spectrum = parsers::parse_spectrum_file(input, cfg.instrument)?;

        let report = self.detector.detect_with_report(&spectrum);
        if report.samples == 0 {
            return Ok(None);
        }

        let result = self.identifier.identify(&report.peaks, cfg.lo_q);

        if let Some((dir, format)) = &self.figures {
            let path = dir.join(format!("{}_peaks.{}", spectrum.name, format.extension()));
            export::plot_peaks(
                &spectrum,
                &report.peaks,
                (cfg.lo_q, cfg.hi_q),
                &path,
                export::DEFAULT_SIZE,
            )?;
        }

        Ok(Some(FileAnalysis {
            name: spectrum.name,
            peaks: report.peaks,
            result,
        }))
    }
}

/// 执行完整分析
pub fn execute(args: AnalyzeArgs) -> Result<()> {
    output::print_header("SAXS Peak Finding & Phase Identification");

    let pipeline = Pipeline::from_args(&args)?;
    let cfg = pipeline.detector.config();
    output::print_detector_settings(cfg, cfg.height_threshold()?);

    if let Some(dir) = &args.figures {
        fs::create_dir_all(dir).map_err(|e| SaxsError::FileWriteError {
            path: dir.display().to_string(),
            source: e,
        })?;
    }

    if args.input.is_file() {
        execute_single_file(&args, &pipeline)
    } else if args.input.is_dir() {
        execute_batch(&args, &pipeline)
    } else {
        Err(SaxsError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single_file(args: &AnalyzeArgs, pipeline: &Pipeline) -> Result<()> {
    output::print_info(&format!("Single file mode: '{}'", args.input.display()));

    let Some(analysis) = pipeline.analyze(&args.input)? else {
        output::print_skip("No samples inside the q search window");
        return Ok(());
    };

    if analysis.peaks.is_empty() {
        output::print_warning("No peaks found in the search window");
    } else {
        output::print_success(&format!("Found {} peak(s)", analysis.peaks.len()));
        super::print_peak_table(&analysis.peaks);
    }

    if analysis.result.is_empty() {
        output::print_warning("No phase could be verified");
    } else {
        super::print_phase_table(&analysis.result);
    }
    if let Some(msg) = super::describe_unassigned(&analysis.result) {
        output::print_warning(&msg);
    }

    write_outputs(args, &[analysis])
}

/// 批量处理模式
fn execute_batch(args: &AnalyzeArgs, pipeline: &Pipeline) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let collector = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive);

    // 清单文件可能也在输入目录中
    let listing = fs::canonicalize(&args.listing).ok();
    let files: Vec<PathBuf> = collector
        .collect()?
        .into_iter()
        .filter(|f| listing.is_none() || fs::canonicalize(f).ok() != listing)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} curve files", files.len()));

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, |file| match pipeline.analyze(file) {
        Ok(Some(analysis)) => ProcessResult::Success(analysis),
        Ok(None) => ProcessResult::Skipped(format!(
            "{}: no samples inside the q search window",
            file.display()
        )),
        Err(e) => ProcessResult::Failed(file.display().to_string(), e.to_string()),
    })?;

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} curves, {} success, {} skipped, {} failed",
        result.total(),
        result.success,
        result.skipped,
        result.failed
    ));
    for reason in &result.skips {
        output::print_skip(reason);
    }

    let identified = result
        .outputs
        .iter()
        .filter(|(_, a)| !a.result.is_empty())
        .count();
    output::print_info(&format!(
        "{} of {} curves have at least one verified phase",
        identified, result.success
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    let analyses: Vec<FileAnalysis> = result.outputs.into_iter().map(|(_, a)| a).collect();
    write_outputs(args, &analyses)
}

/// 追加清单并按需写 CSV（按输入顺序，串行）
fn write_outputs(args: &AnalyzeArgs, analyses: &[FileAnalysis]) -> Result<()> {
    for analysis in analyses {
        export::append_listing(&args.listing, &analysis.name, &analysis.result)?;
    }
    output::print_success(&format!(
        "Results appended to '{}'",
        args.listing.display()
    ));

    if let Some(path) = &args.csv {
        let rows: Vec<(String, IdentificationResult)> = analyses
            .iter()
            .map(|a| (a.name.clone(), a.result.clone()))
            .collect();
        export::assignments_to_csv(&rows, path)?;
        output::print_success(&format!("Assignments saved to '{}'", path.display()));
    }

    if let Some(dir) = &args.figures {
        output::print_success(&format!("Figures saved in '{}'", dir.display()));
    }

    Ok(())
}
