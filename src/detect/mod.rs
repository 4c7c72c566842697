//! # 峰检测模块
//!
//! 把一条带噪声的 I(q) 曲线变成升序、无重复的峰列表。
//!
//! ## 流程
//! 1. 截取 lo_q < q < hi_q 的样本
//! 2. 滑动窗口（或局部极大值）拟合，收集被接受的峰位；
//!    局部极大值在整条曲线上寻找并拟合，只保留搜索区间内的极大值与拟合中心
//! 3. 按最小峰间距分箱合并重复检测
//!
//! ## 子模块
//! - `instrument`: 仪器选择与默认阈值
//! - `window`: 滑动窗口扫描
//! - `maxima`: 局部极大值 + 单独拟合
//! - `dedup`: 重复检测合并
//!
//! ## 依赖关系
//! - 被 `commands/` 与集成测试使用
//! - 使用 `fitting/`、`histogram.rs`、`models/`

pub mod dedup;
pub mod instrument;
pub mod maxima;
pub mod window;

pub use dedup::merge_detections;
pub use instrument::Instrument;

use crate::error::{Result, SaxsError};
use crate::fitting::{CurveFitter, FitOutcome, FitRejection};
use crate::models::{Peak, PeakSet, Spectrum};

use serde::{Deserialize, Serialize};

/// 粗选峰策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetectionStrategy {
    /// 固定宽度窗口逐样本平移拟合
    #[default]
    SlidingWindow,
    /// 先找局部极大值，再逐个拟合
    LocalMaxima,
}

/// 峰检测参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// 搜索下限 q（不含）
    pub lo_q: f64,
    /// 搜索上限 q（不含）
    pub hi_q: f64,
    /// 最小峰间距，同时是去重箱宽
    pub min_separation: f64,
    /// 滑动窗口样本数 W
    pub window: usize,
    pub strategy: DetectionStrategy,
    /// 局部极大值之间的最小样本距离
    pub maxima_distance: usize,
    /// 局部极大值重新拟合的半宽（样本数）
    pub refit_half_width: usize,
    pub instrument: Option<Instrument>,
    /// 显式幅值阈值，优先于仪器默认值
    pub height_threshold: Option<f64>,
    /// 拟合器迭代上限
    pub max_iterations: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            lo_q: 0.04,
            hi_q: 0.35,
            min_separation: 0.01,
            window: 10,
            strategy: DetectionStrategy::SlidingWindow,
            maxima_distance: 10,
            refit_half_width: 7,
            instrument: None,
            height_threshold: None,
            max_iterations: 200,
        }
    }
}

impl DetectorConfig {
    /// 指定仪器的默认配置
    pub fn for_instrument(instrument: Instrument) -> Self {
        Self {
            instrument: Some(instrument),
            ..Self::default()
        }
    }

    /// 生效的幅值阈值；既无仪器也无显式阈值时报配置错误
    pub fn height_threshold(&self) -> Result<f64> {
        match (self.height_threshold, self.instrument) {
            (Some(t), _) => Ok(t),
            (None, Some(instrument)) => Ok(instrument.height_threshold()),
            (None, None) => Err(SaxsError::MissingInstrument),
        }
    }

    /// 校验参数
    pub fn validate(&self) -> Result<()> {
        if !(self.lo_q.is_finite() && self.hi_q.is_finite()) || self.lo_q >= self.hi_q {
            return Err(SaxsError::InvalidRange(format!(
                "q window [{}, {}] is empty",
                self.lo_q, self.hi_q
            )));
        }
        if !self.min_separation.is_finite() || self.min_separation <= 0.0 {
            return Err(SaxsError::InvalidArgument(format!(
                "minimum peak separation must be positive, got {}",
                self.min_separation
            )));
        }
        if self.window < crate::fitting::VoigtLinear::N_PARAMS {
            return Err(SaxsError::InvalidArgument(format!(
                "window of {} samples cannot constrain a {}-parameter fit",
                self.window,
                crate::fitting::VoigtLinear::N_PARAMS
            )));
        }
        if let Some(t) = self.height_threshold {
            if !t.is_finite() || t < 0.0 {
                return Err(SaxsError::InvalidArgument(format!(
                    "height threshold must be non-negative, got {}",
                    t
                )));
            }
        }
        Ok(())
    }
}

/// 各类拒绝的计数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionTally {
    pub too_few_samples: usize,
    pub not_converged: usize,
    pub non_finite: usize,
    pub below_threshold: usize,
    pub outside_window: usize,
}

impl RejectionTally {
    fn record(&mut self, rejection: &FitRejection) {
        match rejection {
            FitRejection::TooFewSamples { .. } => self.too_few_samples += 1,
            FitRejection::NotConverged { .. } => self.not_converged += 1,
            FitRejection::NonFinite => self.non_finite += 1,
            FitRejection::BelowThreshold { .. } => self.below_threshold += 1,
            FitRejection::CenterOutsideWindow { .. } => self.outside_window += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.too_few_samples
            + self.not_converged
            + self.non_finite
            + self.below_threshold
            + self.outside_window
    }
}

/// 检测结果及诊断信息
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionReport {
    pub peaks: PeakSet,
    /// 合并前被接受的原始检测
    pub raw_detections: Vec<Peak>,
    /// 搜索区间内的样本数
    pub samples: usize,
    pub rejections: RejectionTally,
}

/// 峰检测器
#[derive(Debug, Clone)]
pub struct PeakDetector {
    config: DetectorConfig,
    fitter: CurveFitter,
}

impl PeakDetector {
    /// 创建检测器；配置错误（含未指定仪器）在此处报告
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        let threshold = config.height_threshold()?;
        let fitter = CurveFitter::new(threshold).with_max_iterations(config.max_iterations);
        Ok(Self { config, fitter })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// 检测峰位
    pub fn detect(&self, spectrum: &Spectrum) -> PeakSet {
        self.detect_with_report(spectrum).peaks
    }

    /// 检测峰位并返回拒绝统计
    pub fn detect_with_report(&self, spectrum: &Spectrum) -> DetectionReport {
        let cfg = &self.config;
        let region = spectrum.restrict(cfg.lo_q, cfg.hi_q);

        let outcomes: Vec<FitOutcome> = match cfg.strategy {
            DetectionStrategy::SlidingWindow => window::scan(&region, cfg.window, &self.fitter),
            DetectionStrategy::LocalMaxima => {
                let q = spectrum.q();
                let maxima: Vec<usize> =
                    maxima::local_maxima(spectrum.intensity(), cfg.maxima_distance)
                        .into_iter()
                        .filter(|&i| q[i] > cfg.lo_q && q[i] < cfg.hi_q)
                        .collect();
                maxima::refit_maxima(spectrum, &maxima, cfg.refit_half_width, &self.fitter)
            }
        };

        let mut rejections = RejectionTally::default();
        let mut raw_detections = Vec::new();
        for outcome in &outcomes {
            match outcome {
                Ok(fit) => raw_detections.push(Peak::fitted(fit.center, fit.sigma, fit.amplitude)),
                Err(rejection) => rejections.record(rejection),
            }
        }

        // 拟合窗口可伸出搜索区间，拟合中心需再筛一次
        if cfg.strategy == DetectionStrategy::LocalMaxima {
            raw_detections.retain(|p| p.q > cfg.lo_q && p.q < cfg.hi_q);
        }

        let peaks = merge_detections(&raw_detections, cfg.min_separation);

        DetectionReport {
            peaks,
            raw_detections,
            samples: region.len(),
            rejections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitting::voigt;

    /// 线性背景上两个 Voigt 峰（0.1 与 0.16）
    fn two_peak_spectrum() -> Spectrum {
        let points: Vec<(f64, f64)> = (0..251)
            .map(|i| {
                let q = 0.05 + i as f64 * 0.001;
                let intensity =
                    10.0 - 5.0 * q + voigt(q, 1.0, 0.1, 0.002) + voigt(q, 0.6, 0.16, 0.002);
                (q, intensity)
            })
            .collect();
        Spectrum::from_points("synthetic", &points).unwrap()
    }

    fn config(strategy: DetectionStrategy) -> DetectorConfig {
        DetectorConfig {
            lo_q: 0.06,
            hi_q: 0.3,
            height_threshold: Some(0.1),
            strategy,
            ..DetectorConfig::default()
        }
    }

    #[test]
    fn test_missing_instrument_is_fatal() {
        let err = PeakDetector::new(DetectorConfig::default()).unwrap_err();
        assert!(matches!(err, SaxsError::MissingInstrument));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_instrument_threshold_and_override() {
        let cfg = DetectorConfig::for_instrument(Instrument::Dls);
        assert_eq!(cfg.height_threshold().unwrap(), 0.5);

        let cfg = DetectorConfig {
            height_threshold: Some(0.2),
            ..cfg
        };
        assert_eq!(cfg.height_threshold().unwrap(), 0.2);
    }

    #[test]
    fn test_invalid_window_rejected() {
        let cfg = DetectorConfig {
            lo_q: 0.3,
            hi_q: 0.1,
            ..DetectorConfig::for_instrument(Instrument::Ganesha)
        };
        assert!(matches!(
            PeakDetector::new(cfg),
            Err(SaxsError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_sliding_window_finds_both_peaks() {
        let detector = PeakDetector::new(config(DetectionStrategy::SlidingWindow)).unwrap();
        let report = detector.detect_with_report(&two_peak_spectrum());

        let positions = report.peaks.positions();
        assert_eq!(positions.len(), 2, "peaks = {:?}", positions);
        assert!((positions[0] - 0.1).abs() < 0.002);
        assert!((positions[1] - 0.16).abs() < 0.002);
        assert!(report.raw_detections.len() >= 2);
        assert!(report.rejections.total() > 0);
    }

    #[test]
    fn test_local_maxima_finds_both_peaks() {
        let detector = PeakDetector::new(config(DetectionStrategy::LocalMaxima)).unwrap();
        let positions = detector.detect(&two_peak_spectrum()).positions();
        assert_eq!(positions.len(), 2, "peaks = {:?}", positions);
        assert!((positions[0] - 0.1).abs() < 0.002);
        assert!((positions[1] - 0.16).abs() < 0.002);
    }

    #[test]
    fn test_empty_range_is_not_an_error() {
        let cfg = DetectorConfig {
            lo_q: 0.5,
            hi_q: 0.6,
            ..config(DetectionStrategy::SlidingWindow)
        };
        let detector = PeakDetector::new(cfg).unwrap();
        let report = detector.detect_with_report(&two_peak_spectrum());
        assert!(report.peaks.is_empty());
        assert_eq!(report.samples, 0);
    }

    #[test]
    fn test_local_maxima_at_search_window_edge() {
        // 0.063 处的极大值是截取后区域的第一个样本
        let points: Vec<(f64, f64)> = (0..251)
            .map(|i| {
                let q = 0.05 + i as f64 * 0.001;
                let intensity =
                    10.0 - 5.0 * q + voigt(q, 1.0, 0.063, 0.002) + voigt(q, 0.6, 0.16, 0.002);
                (q, intensity)
            })
            .collect();
        let spectrum = Spectrum::from_points("edge", &points).unwrap();
        let cfg = DetectorConfig {
            lo_q: 0.0625,
            ..config(DetectionStrategy::LocalMaxima)
        };

        let peaks = PeakDetector::new(cfg).unwrap().detect(&spectrum);
        assert_eq!(peaks.len(), 2, "{:?}", peaks.positions());
        assert!((peaks.peaks()[0].q - 0.063).abs() < 0.0005);
    }
}
