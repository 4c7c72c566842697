//! # 滑动窗口扫描
//!
//! 固定宽度 W 的窗口每次平移一个样本，在每个位置以窗口平均 q
//! 作为初始峰位调用拟合器。各窗口相互独立，使用 rayon 并行；
//! `collect` 保持窗口位置顺序。
//!
//! ## 依赖关系
//! - 被 `detect/mod.rs` 调用
//! - 使用 `fitting/fitter.rs`

use crate::fitting::{CurveFitter, FitOutcome};
use crate::models::Spectrum;

use rayon::prelude::*;

/// 对（已截取搜索区间的）曲线做滑动窗口拟合，按窗口位置返回结果
pub fn scan(spectrum: &Spectrum, width: usize, fitter: &CurveFitter) -> Vec<FitOutcome> {
    let q = spectrum.q();
    let intensity = spectrum.intensity();

    if width == 0 || q.len() < width {
        return Vec::new();
    }

    (0..=q.len() - width)
        .into_par_iter()
        .map(|start| {
            let window_q = &q[start..start + width];
            let window_i = &intensity[start..start + width];
            let mean_q = window_q.iter().sum::<f64>() / width as f64;
            fitter.fit(window_q, window_i, mean_q)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_count() {
        let points: Vec<(f64, f64)> = (1..=25).map(|i| (i as f64 * 0.01, 1.0)).collect();
        let spectrum = Spectrum::from_points("flat", &points).unwrap();
        let outcomes = scan(&spectrum, 10, &CurveFitter::new(0.1));
        assert_eq!(outcomes.len(), 16);
        assert!(outcomes.iter().all(|o| o.is_err()));
    }

    #[test]
    fn test_short_range_yields_nothing() {
        let points: Vec<(f64, f64)> = (1..=5).map(|i| (i as f64 * 0.01, 1.0)).collect();
        let spectrum = Spectrum::from_points("short", &points).unwrap();
        assert!(scan(&spectrum, 10, &CurveFitter::new(0.1)).is_empty());
    }
}
