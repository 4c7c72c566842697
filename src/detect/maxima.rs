//! # 局部极大值检测
//!
//! 粗略选峰策略：先找局部极大值（相距不足 `min_distance` 个样本时保留较高者），
//! 再以每个极大值为中心取 ±`half_width` 个样本单独拟合。
//! 召回率低于滑动窗口，但没有重复检测。
//!
//! ## 依赖关系
//! - 被 `detect/mod.rs` 调用
//! - 使用 `fitting/fitter.rs`

use crate::fitting::{CurveFitter, FitOutcome};
use crate::models::Spectrum;

use rayon::prelude::*;

/// 局部极大值下标（升序）
pub fn local_maxima(intensity: &[f64], min_distance: usize) -> Vec<usize> {
    if intensity.len() < 3 {
        return Vec::new();
    }

    // 上升沿后不再上升的点；平台取最左端
    let mut candidates: Vec<usize> = (1..intensity.len() - 1)
        .filter(|&i| intensity[i] > intensity[i - 1] && intensity[i] >= intensity[i + 1])
        .collect();

    if min_distance > 1 && candidates.len() > 1 {
        // 从最高峰开始，压制其邻域内的较低极大值
        let mut by_height = candidates.clone();
        by_height.sort_by(|&a, &b| intensity[b].total_cmp(&intensity[a]).then(a.cmp(&b)));

        let mut kept: Vec<usize> = Vec::new();
        for i in by_height {
            if kept.iter().all(|&k| k.abs_diff(i) >= min_distance) {
                kept.push(i);
            }
        }
        kept.sort_unstable();
        candidates = kept;
    }

    candidates
}

/// 在每个局部极大值处拟合
pub fn refit_maxima(
    spectrum: &Spectrum,
    maxima: &[usize],
    half_width: usize,
    fitter: &CurveFitter,
) -> Vec<FitOutcome> {
    let q = spectrum.q();
    let intensity = spectrum.intensity();

    maxima
        .par_iter()
        .map(|&i| {
            let start = i.saturating_sub(half_width);
            let end = (i + half_width).min(q.len());
            fitter.fit(&q[start..end], &intensity[start..end], q[i])
        })
        .collect()
}
