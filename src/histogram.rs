//! # 等宽直方图分箱
//!
//! 峰去重与晶格常数投票共用的分箱规则，边界约定固定如下：
//! - N 个等宽箱覆盖 [min, max]，宽度 w = (max - min) / N
//! - 第 k 箱为 [lo + k·w, lo + (k+1)·w)，最后一箱为闭区间
//! - 箱号 = ⌊(v - lo) / w⌋，截断到 [0, N-1]
//! - min == max 时所有值落入同一箱
//!
//! 每个箱保存成员在输入数组中的下标，溯源时不需要再按数值反查。
//! 只存非空箱：箱宽远小于取值范围时箱数可以很大，但非空箱最多与输入等长。
//!
//! ## 依赖关系
//! - 被 `detect/dedup.rs` 与 `phase/tracer.rs` 使用
//! - 无外部模块依赖

use std::collections::BTreeMap;

/// 直方图
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bin_count: usize,
    /// 非空箱：箱号 → 成员下标
    bins: BTreeMap<usize, Vec<usize>>,
}

impl Histogram {
    /// 按箱数分箱；空输入或含非有限值时返回 None
    pub fn with_bin_count(values: &[f64], bin_count: usize) -> Option<Self> {
        let (lo, hi) = value_range(values)?;
        let bin_count = bin_count.max(1);
        let width = (hi - lo) / bin_count as f64;
        Some(Self::fill(values, lo, width, bin_count))
    }

    /// 按箱宽分箱，箱数 = ⌊(max - min) / w⌋ + 1
    pub fn with_bin_width(values: &[f64], width: f64) -> Option<Self> {
        let (lo, hi) = value_range(values)?;
        if width <= 0.0 || !width.is_finite() {
            return None;
        }
        let bin_count = (((hi - lo) / width).floor() as usize).saturating_add(1);
        Some(Self::fill(values, lo, width, bin_count))
    }

    fn fill(values: &[f64], lo: f64, width: f64, bin_count: usize) -> Self {
        let mut bins: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, &v) in values.iter().enumerate() {
            bins.entry(bin_index(v, lo, width, bin_count))
                .or_default()
                .push(i);
        }
        Self { bin_count, bins }
    }

    /// 箱数（含空箱）
    pub fn len(&self) -> usize {
        self.bin_count
    }

    pub fn is_empty(&self) -> bool {
        self.bin_count == 0
    }

    /// 第 k 箱的成员下标（按输入顺序）
    pub fn members(&self, k: usize) -> &[usize] {
        self.bins.get(&k).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 非空箱的箱号（升序）
    pub fn populated(&self) -> impl Iterator<Item = usize> + '_ {
        self.bins.keys().copied()
    }

    /// 第 k 箱的计数
    pub fn population(&self, k: usize) -> usize {
        self.members(k).len()
    }

    /// 计数最多的箱（并列时取箱号最小者）
    pub fn most_populated(&self) -> Option<usize> {
        self.bins
            .iter()
            .max_by(|(i, a), (j, b)| a.len().cmp(&b.len()).then(j.cmp(i)))
            .map(|(&k, _)| k)
    }

    /// 计数严格大于阈值的箱号（升序）
    pub fn over_populated(&self, threshold: usize) -> impl Iterator<Item = usize> + '_ {
        self.bins
            .iter()
            .filter(move |(_, b)| b.len() > threshold)
            .map(|(&k, _)| k)
    }
}

fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((lo, hi))
}

fn bin_index(v: f64, lo: f64, width: f64, bin_count: usize) -> usize {
    if width <= 0.0 {
        return 0;
    }
    let k = ((v - lo) / width).floor();
    if k <= 0.0 {
        0
    } else {
        (k as usize).min(bin_count - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_edge_belongs_to_right_bin() {
        // 边界 0.0, 1.0, 2.0, 3.0, 4.0
        let values = [0.0, 1.0, 2.0, 4.0];
        let hist = Histogram::with_bin_count(&values, 4).unwrap();
        assert_eq!(hist.members(0), &[0]);
        assert_eq!(hist.members(1), &[1]);
        assert_eq!(hist.members(2), &[2]);
        assert_eq!(hist.members(3), &[3]);
    }

    #[test]
    fn test_maximum_lands_in_last_closed_bin() {
        let values = [0.0, 0.5, 3.0];
        let hist = Histogram::with_bin_count(&values, 3).unwrap();
        assert_eq!(hist.len(), 3);
        assert_eq!(hist.members(2), &[2]);
        assert!(hist.members(1).is_empty());
    }

    #[test]
    fn test_degenerate_range_single_bin() {
        let values = [5.0, 5.0, 5.0];
        let hist = Histogram::with_bin_count(&values, 10).unwrap();
        assert_eq!(hist.population(0), 3);
        assert_eq!(hist.most_populated(), Some(0));

        let hist = Histogram::with_bin_width(&values, 0.01).unwrap();
        assert_eq!(hist.len(), 1);
    }

    #[test]
    fn test_bin_width_count() {
        let values = [0.091, 0.15];
        let hist = Histogram::with_bin_width(&values, 0.01).unwrap();
        assert_eq!(hist.len(), 6);
        assert_eq!(hist.population(0), 1);
        assert_eq!(hist.population(5), 1);
    }

    #[test]
    fn test_empty_and_non_finite() {
        assert!(Histogram::with_bin_count(&[], 3).is_none());
        assert!(Histogram::with_bin_count(&[1.0, f64::NAN], 3).is_none());
        assert!(Histogram::with_bin_width(&[1.0], 0.0).is_none());
    }

    #[test]
    fn test_most_populated_prefers_lowest_bin() {
        let values = [0.0, 0.1, 1.5, 1.6, 3.0];
        let hist = Histogram::with_bin_count(&values, 3).unwrap();
        assert_eq!(hist.most_populated(), Some(0));
        assert_eq!(hist.over_populated(1).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_tiny_width_keeps_only_populated_bins() {
        let values = [0.05, 0.2, 0.35];
        let hist = Histogram::with_bin_width(&values, 1e-9).unwrap();
        assert!(hist.len() > 100_000_000);
        assert_eq!(hist.populated().collect::<Vec<_>>().len(), 3);
        assert_eq!(hist.population(hist.len() - 1), 1);
    }
}
