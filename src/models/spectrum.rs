//! # SAXS 一维曲线数据模型
//!
//! I(q) 曲线：q 严格递增、强度非负。构造后不可变。
//!
//! ## 依赖关系
//! - 被 `parsers/spectrum.rs` 构造
//! - 被 `detect/` 和 `export/plot.rs` 使用

use crate::error::{Result, SaxsError};
use serde::{Deserialize, Serialize};

/// 一维散射曲线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// 曲线名称（通常为文件名）
    pub name: String,
    /// 散射矢量 q（Å⁻¹），严格递增
    q: Vec<f64>,
    /// 强度 I(q)
    intensity: Vec<f64>,
}

impl Spectrum {
    /// 从 (q, I) 列创建曲线并校验
    pub fn new(name: impl Into<String>, q: Vec<f64>, intensity: Vec<f64>) -> Result<Self> {
        if q.len() != intensity.len() {
            return Err(SaxsError::InvalidSpectrum(format!(
                "column length mismatch: {} q values, {} intensities",
                q.len(),
                intensity.len()
            )));
        }

        for (i, (&qi, &ii)) in q.iter().zip(intensity.iter()).enumerate() {
            if !qi.is_finite() || qi <= 0.0 {
                return Err(SaxsError::InvalidSpectrum(format!(
                    "q must be finite and positive (row {}: {})",
                    i, qi
                )));
            }
            if !ii.is_finite() || ii < 0.0 {
                return Err(SaxsError::InvalidSpectrum(format!(
                    "intensity must be finite and non-negative (row {}: {})",
                    i, ii
                )));
            }
        }

        if let Some(i) = q.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SaxsError::InvalidSpectrum(format!(
                "q is not strictly ascending at row {} ({} -> {})",
                i + 1,
                q[i],
                q[i + 1]
            )));
        }

        Ok(Self {
            name: name.into(),
            q,
            intensity,
        })
    }

    /// 从 (q, I) 点列创建
    pub fn from_points(name: impl Into<String>, points: &[(f64, f64)]) -> Result<Self> {
        let (q, intensity) = points.iter().copied().unzip();
        Self::new(name, q, intensity)
    }

    pub fn q(&self) -> &[f64] {
        &self.q
    }

    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// 截取 lo < q < hi 的样本（开区间）
    pub fn restrict(&self, lo: f64, hi: f64) -> Spectrum {
        let start = self.q.partition_point(|&q| q <= lo);
        let end = self.q.partition_point(|&q| q < hi).max(start);

        Spectrum {
            name: self.name.clone(),
            q: self.q[start..end].to_vec(),
            intensity: self.intensity[start..end].to_vec(),
        }
    }

    /// (q, I) 点迭代器
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.q.iter().copied().zip(self.intensity.iter().copied())
    }
}
