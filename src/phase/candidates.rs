//! # 候选晶格常数生成
//!
//! 对每个峰、每个相族的每个允许指数做 Bragg 反演，
//! 得到带来源标记的候选值 (a, 相, 指数, 峰)。
//!
//! ## 依赖关系
//! - 被 `phase/engine.rs` 使用
//! - 使用 `models/phase.rs` 的相族定义

use crate::models::PhaseTag;

/// 一个候选晶格常数及其来源
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateValue {
    /// 晶格常数 a（Å）
    pub lattice: f64,
    pub phase: PhaseTag,
    pub index: u32,
    /// 来源峰在本轮峰列表中的下标
    pub peak: usize,
}

/// 为给定相族生成候选值，顺序为 相 → 峰 → 指数
pub fn generate(peaks: &[f64], phases: &[PhaseTag]) -> Vec<CandidateValue> {
    phases
        .iter()
        .flat_map(|&phase| {
            let family = phase.family();
            peaks.iter().enumerate().flat_map(move |(peak, &q)| {
                family.indices.iter().map(move |&index| CandidateValue {
                    lattice: family.lattice_parameter(index, q),
                    phase,
                    index,
                    peak,
                })
            })
        })
        .filter(|c| c.lattice.is_finite() && c.lattice > 0.0)
        .collect()
}

/// 候选值的晶格常数列（直方图输入）
pub fn lattice_values(candidates: &[CandidateValue]) -> Vec<f64> {
    candidates.iter().map(|c| c.lattice).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_pool_size() {
        let pool = generate(&[0.1, 0.2], &PhaseTag::CUBIC);
        assert_eq!(pool.len(), 2 * 8 * 3);
        assert!(pool.iter().all(|c| c.lattice > 0.0));
    }

    #[test]
    fn test_bragg_inversion() {
        let pool = generate(&[0.1], &[PhaseTag::D]);
        let first = pool[0];
        assert_eq!(first.index, 2);
        assert_eq!(first.peak, 0);
        assert!((first.lattice - 2.0 * PI * 2f64.sqrt() / 0.1).abs() < 1e-9);

        let lamellar = generate(&[0.1], &[PhaseTag::La]);
        assert!((lamellar[1].lattice - 2.0 * PI * 2.0 / 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_peaks_skipped() {
        assert!(generate(&[0.0], &[PhaseTag::La]).is_empty());
    }
}
