//! # 相识别模块
//!
//! 从峰列表推断脂质相（D、P、G、La、HII）及其晶格常数，支持两相共存。
//!
//! ## 子模块
//! - `candidates`: Bragg 反演生成候选晶格常数
//! - `tracer`: 投票箱溯源到 (相, 指数, 峰)
//! - `degeneracy`: D/P 简并消解
//! - `projection`: 投影验证
//! - `engine`: 多轮迭代编排
//!
//! ## 依赖关系
//! - 被 `commands/` 与集成测试使用
//! - 使用 `histogram.rs`、`models/`

pub mod candidates;
pub mod degeneracy;
pub mod engine;
pub mod projection;
pub mod tracer;

pub use candidates::CandidateValue;
pub use degeneracy::Proposal;
pub use engine::{IdentifyConfig, PhaseIdentifier, Progress};
pub use projection::Verdict;
pub use tracer::{Reflection, Support};
