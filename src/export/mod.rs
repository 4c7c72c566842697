//! # 结果输出模块
//!
//! ## 子模块
//! - `report`: 文本清单与 CSV 导出
//! - `plot`: 峰位叠加图
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `models/`

pub mod plot;
pub mod report;

pub use plot::{plot_peaks, DEFAULT_SIZE};
pub use report::{append_listing, assignments_to_csv, format_listing, peaks_to_csv};
