//! # 投影验证
//!
//! 由支持对求基频 f = mean(q / ratio(m))，预测相族的理论峰位，
//! 与完整的观测峰列表比对：
//! - 最低预测峰 ≤ lo_q：该相在搜索区间内本就不可观测，拒绝
//! - 预测峰在容差内找不到观测峰即为缺失；缺失数超过相族允许值则拒绝
//!
//! 通过验证后由 [`claim`] 按预测峰位重新认领反射：
//! 箱边界可能把同一套反射切进相邻两个箱，只靠溯源会漏掉一部分。
//!
//! ## 依赖关系
//! - 被 `phase/engine.rs` 使用
//! - 使用 `phase/tracer.rs`

use super::tracer::{Reflection, Support};

use std::collections::BTreeSet;

/// 验证结论
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// 通过；`misses` 为缺失的预测峰数
    Confirmed { misses: usize },
    /// 最低预测峰不在搜索区间内
    BelowLowQ { lowest: f64 },
    /// 缺失过多
    Incomplete { misses: usize, allowed: usize },
}

impl Verdict {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Verdict::Confirmed { .. })
    }
}

/// 支持对的基频（`peaks` 为本轮峰列表）
pub fn fundamental(support: &Support, peaks: &[f64]) -> Option<f64> {
    let family = support.phase.family();
    let ratios: Vec<f64> = support
        .reflections
        .iter()
        .filter_map(|r| peaks.get(r.peak).map(|&q| q / family.ratio(r.index)))
        .collect();

    if ratios.is_empty() {
        None
    } else {
        Some(ratios.iter().sum::<f64>() / ratios.len() as f64)
    }
}

/// 验证一个临时确认的相
///
/// `peaks` 是本轮（残余）峰列表，`observed` 是最初的完整峰列表。
pub fn verify(
    support: &Support,
    peaks: &[f64],
    observed: &[f64],
    lo_q: f64,
    tolerance: f64,
) -> Verdict {
    let family = support.phase.family();
    let allowed = family.allowed_misses;

    let Some(f) = fundamental(support, peaks) else {
        return Verdict::Incomplete {
            misses: family.projection.len(),
            allowed,
        };
    };

    let predicted = family.project(f);
    let lowest = predicted.iter().copied().fold(f64::INFINITY, f64::min);
    if lowest <= lo_q {
        return Verdict::BelowLowQ { lowest };
    }

    let misses = predicted
        .iter()
        .filter(|&&p| !observed.iter().any(|&o| (p - o).abs() < tolerance))
        .count();

    if misses <= allowed {
        Verdict::Confirmed { misses }
    } else {
        Verdict::Incomplete { misses, allowed }
    }
}

/// 按预测峰位认领反射
///
/// 相族每个指数取离预测峰位最近的候选峰，候选为容差内的 `peaks`
/// 以及溯源时已配给该指数的峰；每个峰只归一个指数（按指数升序分配）。
pub fn claim(support: &Support, peaks: &[f64], tolerance: f64) -> Support {
    let Some(f) = fundamental(support, peaks) else {
        return support.clone();
    };

    let family = support.phase.family();
    let traced: BTreeSet<(u32, usize)> = support
        .reflections
        .iter()
        .map(|r| (r.index, r.peak))
        .collect();

    let mut taken: BTreeSet<usize> = BTreeSet::new();
    let mut reflections = Vec::new();
    for &index in family.indices {
        let predicted = f * family.ratio(index);
        let best = peaks
            .iter()
            .enumerate()
            .filter(|&(j, &q)| {
                !taken.contains(&j)
                    && ((q - predicted).abs() < tolerance || traced.contains(&(index, j)))
            })
            .fold(None, |best: Option<(usize, f64)>, (j, &q)| {
                let distance = (q - predicted).abs();
                match best {
                    Some((_, d)) if d <= distance => best,
                    _ => Some((j, distance)),
                }
            });

        if let Some((peak, _)) = best {
            taken.insert(peak);
            reflections.push(Reflection {
                index,
                peak,
                lattice: family.lattice_parameter(index, peaks[peak]),
            });
        }
    }

    Support {
        phase: support.phase,
        reflections,
    }
}
