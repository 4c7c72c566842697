//! # 共享参数组
//!
//! `find` 与 `analyze` 共用峰检测参数，`identify` 与 `analyze` 共用相识别参数，
//! 通过 `#[command(flatten)]` 嵌入各子命令。
//!
//! ## 依赖关系
//! - 被 `cli/` 其他子模块使用
//! - 转换为 `detect::DetectorConfig` 与 `phase::IdentifyConfig`

use lipidsaxs::detect::{DetectionStrategy, DetectorConfig, Instrument};
use lipidsaxs::error::{Result, SaxsError};
use lipidsaxs::phase::IdentifyConfig;

use clap::{Args, ValueEnum};

// ─────────────────────────────────────────────────────────────
// 峰检测参数
// ─────────────────────────────────────────────────────────────

/// 粗选峰策略
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum StrategyArg {
    /// Sliding-window Voigt fits (high recall)
    #[default]
    Window,
    /// Local maxima refit individually (coarse, no duplicates)
    Maxima,
}

impl From<StrategyArg> for DetectionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Window => DetectionStrategy::SlidingWindow,
            StrategyArg::Maxima => DetectionStrategy::LocalMaxima,
        }
    }
}

/// 峰检测参数
#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    /// Instrument that produced the data (ganesha, dls); sets delimiter and height threshold
    #[arg(short, long, env = "LIPIDSAXS_INSTRUMENT")]
    pub instrument: Option<String>,

    /// q search window in Å⁻¹ (e.g., "0.04-0.35")
    #[arg(short, long, default_value = "0.04-0.35")]
    pub q_range: String,

    /// Minimum separation between distinct peaks (Å⁻¹)
    #[arg(short, long, default_value_t = 0.01)]
    pub separation: f64,

    /// Voigt amplitude threshold (overrides the instrument default)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Peak picking strategy
    #[arg(long, value_enum, default_value = "window")]
    pub strategy: StrategyArg,

    /// Sliding window width in samples
    #[arg(long, default_value_t = 10)]
    pub window: usize,

    /// Minimum distance between local maxima in samples (maxima strategy)
    #[arg(long, default_value_t = 10)]
    pub maxima_distance: usize,

    /// Samples on each side of a local maximum used for its refit (maxima strategy)
    #[arg(long, default_value_t = 7)]
    pub refit_half_width: usize,

    /// Iteration cap for each Voigt fit
    #[arg(long, default_value_t = 200)]
    pub max_iterations: usize,
}

impl DetectArgs {
    /// 解析仪器名称（未指定时为 None）
    pub fn instrument(&self) -> Result<Option<Instrument>> {
        self.instrument.as_deref().map(Instrument::parse).transpose()
    }

    /// 组装检测配置
    pub fn detector_config(&self) -> Result<DetectorConfig> {
        let (lo_q, hi_q) = parse_q_range(&self.q_range)?;

        Ok(DetectorConfig {
            lo_q,
            hi_q,
            min_separation: self.separation,
            window: self.window,
            strategy: self.strategy.into(),
            maxima_distance: self.maxima_distance,
            refit_half_width: self.refit_half_width,
            instrument: self.instrument()?,
            height_threshold: self.threshold,
            max_iterations: self.max_iterations,
        })
    }
}

// ─────────────────────────────────────────────────────────────
// 相识别参数
// ─────────────────────────────────────────────────────────────

/// 相识别参数
#[derive(Args, Debug, Clone)]
pub struct PhaseArgs {
    /// Cubic histogram bins per candidate lattice value
    #[arg(long, default_value_t = 2.0)]
    pub granularity: f64,

    /// La/HII histogram bins per candidate lattice value
    #[arg(long, default_value_t = 2.0)]
    pub lamellar_granularity: f64,

    /// A histogram bin must hold more than this many candidates to be traced
    #[arg(long, default_value_t = 3)]
    pub population_threshold: usize,

    /// q tolerance for matching predicted reflections (Å⁻¹)
    #[arg(long, default_value_t = 0.001)]
    pub tolerance: f64,

    /// Maximum number of identification rounds
    #[arg(long, default_value_t = 10)]
    pub max_rounds: usize,
}

impl PhaseArgs {
    pub fn identify_config(&self) -> IdentifyConfig {
        IdentifyConfig {
            granularity: self.granularity,
            lamellar_granularity: self.lamellar_granularity,
            population_threshold: self.population_threshold,
            tolerance: self.tolerance,
            max_rounds: self.max_rounds,
        }
    }
}

/// 解析 "lo-hi" 形式的 q 区间（允许 1e-2 这样的科学计数法）
pub fn parse_q_range(range: &str) -> Result<(f64, f64)> {
    let bytes = range.as_bytes();
    let split = (1..bytes.len())
        .find(|&i| bytes[i] == b'-' && !matches!(bytes[i - 1], b'e' | b'E'))
        .ok_or_else(|| SaxsError::InvalidRange(range.to_string()))?;

    let lo: f64 = range[..split]
        .trim()
        .parse()
        .map_err(|_| SaxsError::InvalidRange(range.to_string()))?;
    let hi: f64 = range[split + 1..]
        .trim()
        .parse()
        .map_err(|_| SaxsError::InvalidRange(range.to_string()))?;

    if !(lo.is_finite() && hi.is_finite()) || lo < 0.0 || lo >= hi {
        return Err(SaxsError::InvalidRange(range.to_string()));
    }

    Ok((lo, hi))
}
