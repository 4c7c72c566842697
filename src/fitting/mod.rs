//! # 曲线拟合模块
//!
//! 线性背景 + Voigt 峰的窗口拟合。
//!
//! ## 子模块
//! - `voigt`: Faddeeva 函数与 Voigt 线型
//! - `fitter`: Levenberg-Marquardt 拟合器
//!
//! ## 依赖关系
//! - 被 `detect/` 使用

pub mod fitter;
pub mod voigt;

pub use fitter::{CurveFitter, FitOutcome, FitRejection, FittedPeak};
pub use voigt::{voigt, VoigtLinear};
