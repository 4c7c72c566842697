//! # 重复检测合并
//!
//! 滑动窗口相互重叠，同一个真实峰会被检测多次。
//! 将原始峰位按最小峰间距为箱宽分箱，然后逐箱处理：
//! - 仅本箱有成员：输出本箱均值
//! - 恰有一侧相邻箱有成员：与该箱合并后输出均值
//! - 两侧相邻箱都有成员：与成员更多的一侧合并（相等取低 q 一侧）
//!
//! 相邻两箱无论从哪一侧处理，合并顺序都是低箱在前，
//! 得到的均值逐位相同，最后按峰位去重即可。
//!
//! 该步骤依赖全部原始峰位的全局顺序，必须在收集完所有窗口结果后串行执行。
//!
//! ## 依赖关系
//! - 被 `detect/mod.rs` 调用
//! - 使用 `histogram.rs`

use crate::histogram::Histogram;
use crate::models::{Peak, PeakSet};

/// 合并原始检测结果
pub fn merge_detections(raw: &[Peak], min_separation: f64) -> PeakSet {
    let centers: Vec<f64> = raw.iter().map(|p| p.q).collect();
    let hist = match Histogram::with_bin_width(&centers, min_separation) {
        Some(h) => h,
        None => return PeakSet::default(),
    };

    let len = hist.len();
    let populated = |k: usize| hist.population(k) > 0;
    let mut merged = Vec::new();

    for k in hist.populated() {
        let left = k > 0 && populated(k - 1);
        let right = k + 1 < len && populated(k + 1);

        let partner = match (left, right) {
            (false, false) => None,
            (true, false) => Some(k - 1),
            (false, true) => Some(k + 1),
            (true, true) => {
                if hist.population(k + 1) > hist.population(k - 1) {
                    Some(k + 1)
                } else {
                    Some(k - 1)
                }
            }
        };

        let members: Vec<usize> = match partner {
            None => hist.members(k).to_vec(),
            Some(j) => {
                let (low, high) = (j.min(k), j.max(k));
                hist.members(low)
                    .iter()
                    .chain(hist.members(high))
                    .copied()
                    .collect()
            }
        };

        merged.push(mean_peak(raw, &members));
    }

    PeakSet::new(merged)
}

/// 成员峰的平均（宽度与幅值仅在所有成员都有时才平均）
fn mean_peak(raw: &[Peak], members: &[usize]) -> Peak {
    let n = members.len() as f64;
    let q = members.iter().map(|&i| raw[i].q).sum::<f64>() / n;

    let mean_of = |field: fn(&Peak) -> Option<f64>| -> Option<f64> {
        members
            .iter()
            .map(|&i| field(&raw[i]))
            .sum::<Option<f64>>()
            .map(|s| s / n)
    };

    Peak {
        q,
        sigma: mean_of(|p| p.sigma),
        amplitude: mean_of(|p| p.amplitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(centers: &[f64]) -> Vec<Peak> {
        centers.iter().map(|&q| Peak::fitted(q, 0.002, 1.0)).collect()
    }

    #[test]
    fn test_close_detections_collapse_to_mean() {
        let set = merge_detections(&raw(&[0.091, 0.093]), 0.01);
        assert_eq!(set.len(), 1);
        assert!((set.peaks()[0].q - 0.092).abs() < 1e-12);
        assert_eq!(set.peaks()[0].sigma, Some(0.002));
    }

    #[test]
    fn test_distant_detections_stay_distinct() {
        let set = merge_detections(&raw(&[0.091, 0.15]), 0.01);
        assert_eq!(set.positions(), vec![0.091, 0.15]);
    }

    #[test]
    fn test_adjacent_bins_emit_one_peak() {
        // 0.100 在第 0 箱，0.1105 在第 1 箱
        let set = merge_detections(&raw(&[0.1105, 0.100]), 0.01);
        assert_eq!(set.len(), 1);
        assert!((set.peaks()[0].q - 0.10525).abs() < 1e-12);
    }

    #[test]
    fn test_sandwiched_bin_joins_denser_neighbour() {
        // 箱 0: 0.100；箱 1: 0.111, 0.112；箱 2: 0.121, 0.122
        let set = merge_detections(&raw(&[0.100, 0.111, 0.112, 0.121, 0.122]), 0.01);
        let positions = set.positions();
        assert_eq!(positions.len(), 2);
        assert!((positions[0] - (0.100 + 0.111 + 0.112) / 3.0).abs() < 1e-12);
        assert!((positions[1] - (0.111 + 0.112 + 0.121 + 0.122) / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_detections(&[], 0.01).is_empty());
    }

    #[test]
    fn test_tiny_separation_over_wide_range() {
        let merged = merge_detections(&raw(&[0.05, 0.2, 0.35]), 1e-9);
        assert_eq!(merged.positions(), vec![0.05, 0.2, 0.35]);
    }

    #[test]
    fn test_missing_fit_attributes_not_averaged() {
        let peaks = vec![Peak::at(0.1), Peak::fitted(0.101, 0.002, 1.0)];
        let set = merge_detections(&peaks, 0.01);
        assert_eq!(set.len(), 1);
        assert_eq!(set.peaks()[0].sigma, None);
    }
}
