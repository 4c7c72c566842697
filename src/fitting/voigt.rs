//! # Voigt 线型
//!
//! Voigt 线型是 Gaussian 与 Lorentzian 的卷积：
//! V(x) = A · Re[w(z)] / (σ√(2π))，z = (x - x₀ + iγ) / (σ√2)，
//! 其中 w(z) 为 Faddeeva 函数。此处固定 γ = σ，只拟合 σ。
//!
//! Faddeeva 函数采用 Humlicek (1982) W4 有理近似，相对误差约 1e-4，
//! 对峰位拟合足够。
//!
//! ## 依赖关系
//! - 被 `fitting/fitter.rs` 使用
//! - 使用 `num-complex`

use num_complex::Complex64;
use std::f64::consts::{PI, SQRT_2};

/// Faddeeva 函数 w(x + iy)，要求 y ≥ 0
pub fn faddeeva(x: f64, y: f64) -> Complex64 {
    let t = Complex64::new(y, -x);
    let s = x.abs() + y;

    if s >= 15.0 {
        // 区域 I
        t * 0.564_189_6 / (t * t + 0.5)
    } else if s >= 5.5 {
        // 区域 II
        let u = t * t;
        t * (u * 0.564_189_6 + 1.410_474) / (u * (u + 3.0) + 0.75)
    } else if y >= 0.195 * x.abs() - 0.176 {
        // 区域 III
        let num = t * (t * (t * (t * 0.564_223_6 + 3.778_987) + 11.964_82) + 20.209_33) + 16.4955;
        let den = t * (t * (t * (t * (t + 6.699_398) + 21.692_74) + 39.271_21) + 38.823_63)
            + 16.4955;
        num / den
    } else {
        // 区域 IV
        let u = t * t;
        let num = t
            * (36183.31
                - u * (3321.9905
                    - u * (1540.787
                        - u * (219.0313 - u * (35.766_83 - u * (1.320_522 - u * 0.56419))))));
        let den = 32066.6
            - u * (24322.84
                - u * (9022.228
                    - u * (2186.181
                        - u * (364.2191 - u * (61.570_37 - u * (1.841_439 - u))))));
        u.exp() - num / den
    }
}

/// Voigt 线型（γ = σ）
pub fn voigt(x: f64, amplitude: f64, center: f64, sigma: f64) -> f64 {
    let scale = sigma * SQRT_2;
    let w = faddeeva((x - center) / scale, 1.0 / SQRT_2);
    amplitude * w.re / (sigma * (2.0 * PI).sqrt())
}

/// 线性背景 + Voigt 峰模型参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoigtLinear {
    pub intercept: f64,
    pub slope: f64,
    pub amplitude: f64,
    pub center: f64,
    pub sigma: f64,
}

impl VoigtLinear {
    pub const N_PARAMS: usize = 5;

    pub fn eval(&self, x: f64) -> f64 {
        self.intercept + self.slope * x + voigt(x, self.amplitude, self.center, self.sigma)
    }

    pub fn to_array(&self) -> [f64; 5] {
        [
            self.intercept,
            self.slope,
            self.amplitude,
            self.center,
            self.sigma,
        ]
    }

    pub fn from_array(p: [f64; 5]) -> Self {
        Self {
            intercept: p[0],
            slope: p[1],
            amplitude: p[2],
            center: p[3],
            sigma: p[4],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}
