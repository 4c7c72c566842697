//! # 解析器模块
//!
//! SAXS 曲线文件与峰列表的解析。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: spectrum, peaks

pub mod peaks;
pub mod spectrum;

pub use peaks::{parse_peak_argument, parse_peak_file, parse_peak_list};
pub use spectrum::{parse_spectrum_content, parse_spectrum_file};
