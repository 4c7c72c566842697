//! # Bragg 峰数据模型
//!
//! `Peak` 是拟合得到的峰位 q，可附带拟合宽度与幅值；
//! `PeakSet` 是升序、无重复的峰列表。
//!
//! ## 依赖关系
//! - 被 `detect/` 构造
//! - 被 `phase/` 与 `export/` 使用

use serde::{Deserialize, Serialize};

/// 单个衍射峰
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// 峰位 q（Å⁻¹）
    pub q: f64,
    /// Voigt 宽度 σ（Å⁻¹）
    pub sigma: Option<f64>,
    /// Voigt 幅值（峰面积）
    pub amplitude: Option<f64>,
}

impl Peak {
    /// 仅有峰位的峰（例如从峰列表文件读入）
    pub fn at(q: f64) -> Self {
        Self {
            q,
            sigma: None,
            amplitude: None,
        }
    }

    /// 带拟合参数的峰
    pub fn fitted(q: f64, sigma: f64, amplitude: f64) -> Self {
        Self {
            q,
            sigma: Some(sigma),
            amplitude: Some(amplitude),
        }
    }
}

/// 升序、无重复的峰集合
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakSet {
    peaks: Vec<Peak>,
}

impl PeakSet {
    /// 排序并去除重复峰位；非有限值被丢弃
    pub fn new(mut peaks: Vec<Peak>) -> Self {
        peaks.retain(|p| p.q.is_finite());
        peaks.sort_by(|a, b| a.q.total_cmp(&b.q));
        peaks.dedup_by(|b, a| a.q == b.q);
        Self { peaks }
    }

    /// 从峰位列表创建
    pub fn from_positions(positions: &[f64]) -> Self {
        Self::new(positions.iter().map(|&q| Peak::at(q)).collect())
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// 峰位（升序）
    pub fn positions(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.q).collect()
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}
