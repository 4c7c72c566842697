//! # 数据模型模块
//!
//! 定义散射曲线、衍射峰和相指认结果的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`detect/`、`phase/` 和 `export/` 使用
//! - 子模块: spectrum, peak, phase

pub mod peak;
pub mod phase;
pub mod spectrum;

pub use peak::{Peak, PeakSet};
pub use phase::{miller_label, IdentificationResult, PhaseAssignment, PhaseFamily, PhaseTag};
pub use spectrum::Spectrum;
