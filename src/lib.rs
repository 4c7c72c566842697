//! # lipidsaxs
//!
//! 一维 SAXS 曲线的 Bragg 峰检测与脂质自组装相识别。
//!
//! ## 流程
//! ```text
//! Spectrum ──detect──▶ PeakSet ──phase──▶ IdentificationResult
//!            (Voigt 窗口拟合 + 去重)      (直方图投票 + 溯源 + 投影验证，多轮)
//! ```
//!
//! ## 模块
//! - `models`: 曲线、峰、相指认数据模型
//! - `fitting`: 线性背景 + Voigt 拟合
//! - `detect`: 峰检测
//! - `histogram`: 共享的分箱规则
//! - `phase`: 相识别引擎
//! - `parsers`: 曲线与峰列表文件
//! - `export`: 清单、CSV 与图像输出
//! - `error`: 统一错误类型

pub mod detect;
pub mod error;
pub mod export;
pub mod fitting;
pub mod histogram;
pub mod models;
pub mod parsers;
pub mod phase;

pub use detect::{DetectorConfig, Instrument, PeakDetector};
pub use error::{Result, SaxsError};
pub use models::{IdentificationResult, Peak, PeakSet, PhaseAssignment, PhaseTag, Spectrum};
pub use phase::{IdentifyConfig, PhaseIdentifier};
