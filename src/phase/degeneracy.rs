//! # D/P 简并消解
//!
//! Pn3m 与 Im3m 的峰位比有大量重合（P 的 √2,√4,√6,√8 与 D 的同名指数一致），
//! 同一个箱常常同时为 D 和 P 提供足够支持。
//! 若较小一方的峰与指数都包含于较大一方，较小一方视为对称性伪影丢弃，
//! 保留较大一方，晶格常数取两组支持的总均值。两组同样大时保留 D。
//! G 与 D/P 的比值很少重合，始终独立保留。
//!
//! ## 依赖关系
//! - 被 `phase/engine.rs` 使用
//! - 使用 `phase/tracer.rs`

use super::tracer::Support;
use crate::models::PhaseTag;

/// 一个待验证的相
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub support: Support,
    /// 报告用晶格常数
    pub lattice_parameter: f64,
}

impl Proposal {
    pub fn new(support: Support) -> Self {
        let lattice_parameter = support.mean_lattice();
        Self {
            support,
            lattice_parameter,
        }
    }

    pub fn phase(&self) -> PhaseTag {
        self.support.phase
    }
}

/// 处理同一个箱内临时确认的立方相（按 D、P、G 顺序给出）
pub fn resolve(confirmed: Vec<Support>) -> Vec<Proposal> {
    let position = |tag: PhaseTag| confirmed.iter().position(|s| s.phase == tag);

    let (d, p) = match (position(PhaseTag::D), position(PhaseTag::P)) {
        (Some(d), Some(p)) => (d, p),
        _ => return confirmed.into_iter().map(Proposal::new).collect(),
    };

    let (big, small) = if confirmed[d].len() >= confirmed[p].len() {
        (d, p)
    } else {
        (p, d)
    };

    if !contained(&confirmed[small], &confirmed[big]) {
        return confirmed.into_iter().map(Proposal::new).collect();
    }

    let combined = confirmed[big]
        .reflections
        .iter()
        .chain(&confirmed[small].reflections)
        .map(|r| r.lattice);
    let count = confirmed[big].len() + confirmed[small].len();
    let mean = combined.sum::<f64>() / count as f64;

    confirmed
        .into_iter()
        .enumerate()
        .filter(|&(i, _)| i != small)
        .map(|(i, support)| {
            if i == big {
                Proposal {
                    support,
                    lattice_parameter: mean,
                }
            } else {
                Proposal::new(support)
            }
        })
        .collect()
}

/// small 的峰与指数是否都包含于 large
fn contained(small: &Support, large: &Support) -> bool {
    small.peak_set().is_subset(&large.peak_set()) && small.index_set().is_subset(&large.index_set())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::tracer::Reflection;

    fn support(phase: PhaseTag, pairs: &[(u32, usize, f64)]) -> Support {
        Support {
            phase,
            reflections: pairs
                .iter()
                .map(|&(index, peak, lattice)| Reflection {
                    index,
                    peak,
                    lattice,
                })
                .collect(),
        }
    }

    #[test]
    fn test_contained_primitive_is_dropped() {
        let d = support(
            PhaseTag::D,
            &[(2, 0, 100.0), (3, 1, 100.0), (4, 2, 100.0), (6, 3, 100.0), (8, 4, 100.0)],
        );
        let p = support(
            PhaseTag::P,
            &[(2, 0, 102.0), (4, 2, 102.0), (6, 3, 102.0), (8, 4, 102.0)],
        );

        let proposals = resolve(vec![d, p]);
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].phase(), PhaseTag::D);
        let expected = (5.0 * 100.0 + 4.0 * 102.0) / 9.0;
        assert!((proposals[0].lattice_parameter - expected).abs() < 1e-9);
    }

    #[test]
    fn test_independent_sets_both_kept() {
        let d = support(
            PhaseTag::D,
            &[(2, 0, 100.0), (3, 1, 100.0), (4, 2, 100.0), (6, 3, 100.0)],
        );
        let p = support(
            PhaseTag::P,
            &[(2, 5, 100.0), (4, 6, 100.0), (6, 7, 100.0), (8, 8, 100.0)],
        );
        let proposals = resolve(vec![d, p]);
        assert_eq!(proposals.len(), 2);
    }

    #[test]
    fn test_equal_sizes_keep_diamond() {
        let pairs = [(2, 0, 100.0), (4, 1, 100.0), (6, 2, 100.0), (8, 3, 100.0)];
        let proposals = resolve(vec![support(PhaseTag::D, &pairs), support(PhaseTag::P, &pairs)]);
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].phase(), PhaseTag::D);
    }

    #[test]
    fn test_gyroid_untouched() {
        let g = support(
            PhaseTag::G,
            &[(6, 0, 90.0), (8, 1, 90.0), (14, 2, 90.0), (16, 3, 90.0)],
        );
        let proposals = resolve(vec![g]);
        assert_eq!(proposals.len(), 1);
        assert!((proposals[0].lattice_parameter - 90.0).abs() < 1e-12);
    }
}
