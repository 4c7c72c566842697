//! # 窗口曲线拟合器
//!
//! 在一小段 (q, I) 数据上拟合 线性背景 + Voigt 峰，
//! 使用 Levenberg-Marquardt 最小二乘（数值 Jacobian）。
//!
//! ## 初值
//! - 背景：窗口数据的一次线性回归
//! - 峰位：调用方给出的近似中心
//! - 宽度 σ：窗口 q 跨度 / 5
//! - 幅值：窗口强度极差 / 50
//!
//! ## 拒绝条件
//! 不收敛、参数非有限、幅值低于高度阈值、或峰位落在窗口 q 范围之外。
//! 拒绝不是错误，调用方把它当作“此窗口无峰”。
//!
//! ## 依赖关系
//! - 被 `detect/` 使用
//! - 使用 `fitting/voigt.rs` 的模型
//! - 使用 `nalgebra` 求解正规方程

use crate::fitting::voigt::VoigtLinear;

use nalgebra::{SMatrix, SVector};
use thiserror::Error;

const N: usize = VoigtLinear::N_PARAMS;
type Mat5 = SMatrix<f64, N, N>;
type Vec5 = SVector<f64, N>;

/// 单个窗口的成功拟合
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedPeak {
    pub center: f64,
    pub sigma: f64,
    pub amplitude: f64,
    /// 完整模型参数（含背景）
    pub model: VoigtLinear,
    /// 约化 χ²
    pub reduced_chi_square: f64,
    pub iterations: usize,
}

/// 拟合被拒绝的原因
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FitRejection {
    #[error("window has {len} samples, at least {min} are needed")]
    TooFewSamples { len: usize, min: usize },

    #[error("no convergence after {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("fit produced non-finite parameters")]
    NonFinite,

    #[error("amplitude {amplitude:.4} below threshold {threshold:.4}")]
    BelowThreshold { amplitude: f64, threshold: f64 },

    #[error("center {center:.5} outside window [{lo:.5}, {hi:.5}]")]
    CenterOutsideWindow { center: f64, lo: f64, hi: f64 },
}

/// 拟合结果
pub type FitOutcome = std::result::Result<FittedPeak, FitRejection>;

/// Voigt + 线性背景拟合器
#[derive(Debug, Clone)]
pub struct CurveFitter {
    /// 幅值下限（与仪器相关，由调用方提供）
    height_threshold: f64,
    max_iterations: usize,
    /// 相对代价下降小于此值即视为收敛
    tolerance: f64,
}

impl CurveFitter {
    pub fn new(height_threshold: f64) -> Self {
        Self {
            height_threshold,
            max_iterations: 200,
            tolerance: 1e-10,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn height_threshold(&self) -> f64 {
        self.height_threshold
    }

    /// 拟合一个窗口
    pub fn fit(&self, q: &[f64], intensity: &[f64], approx_center: f64) -> FitOutcome {
        let n = q.len().min(intensity.len());
        if n < N {
            return Err(FitRejection::TooFewSamples { len: n, min: N });
        }
        let q = &q[..n];
        let intensity = &intensity[..n];

        let initial = initial_guess(q, intensity, approx_center);
        let (model, cost, iterations) = self.minimize(q, intensity, initial)?;

        if !model.is_finite() || model.sigma <= 0.0 {
            return Err(FitRejection::NonFinite);
        }

        if model.amplitude < self.height_threshold {
            return Err(FitRejection::BelowThreshold {
                amplitude: model.amplitude,
                threshold: self.height_threshold,
            });
        }

        let (lo, hi) = (q[0], q[n - 1]);
        if model.center < lo || model.center > hi {
            return Err(FitRejection::CenterOutsideWindow {
                center: model.center,
                lo,
                hi,
            });
        }

        Ok(FittedPeak {
            center: model.center,
            sigma: model.sigma,
            amplitude: model.amplitude,
            model,
            reduced_chi_square: cost / (n - N).max(1) as f64,
            iterations,
        })
    }

    /// Levenberg-Marquardt 迭代，返回 (模型, 残差平方和, 迭代次数)
    fn minimize(
        &self,
        q: &[f64],
        intensity: &[f64],
        initial: VoigtLinear,
    ) -> std::result::Result<(VoigtLinear, f64, usize), FitRejection> {
        let mut params = Vec5::from(initial.to_array());
        let mut cost = sum_of_squares(q, intensity, &params);
        if !cost.is_finite() {
            return Err(FitRejection::NonFinite);
        }

        let mut lambda = 1e-3;

        for iteration in 1..=self.max_iterations {
            let (jtj, jtr) = normal_equations(q, intensity, &params);

            // 逐步增大阻尼直到代价下降
            let mut accepted = None;
            while lambda < 1e12 {
                let mut damped = jtj;
                for i in 0..N {
                    damped[(i, i)] += lambda * jtj[(i, i)].max(1e-30);
                }

                if let Some(delta) = damped.lu().solve(&(-jtr)) {
                    let trial = params + delta;
                    if trial[4] > 0.0 {
                        let trial_cost = sum_of_squares(q, intensity, &trial);
                        if trial_cost.is_finite() && trial_cost < cost {
                            accepted = Some((trial, trial_cost));
                            break;
                        }
                    }
                }
                lambda *= 10.0;
            }

            match accepted {
                Some((trial, trial_cost)) => {
                    let relative_drop = (cost - trial_cost) / cost.max(f64::MIN_POSITIVE);
                    params = trial;
                    cost = trial_cost;
                    lambda = (lambda / 10.0).max(1e-12);

                    if relative_drop < self.tolerance {
                        return Ok((to_model(&params), cost, iteration));
                    }
                }
                // 任何方向都无法再下降：已在极小值
                None => return Ok((to_model(&params), cost, iteration)),
            }
        }

        Err(FitRejection::NotConverged {
            iterations: self.max_iterations,
        })
    }
}

/// 初值：线性回归背景 + 给定中心
fn initial_guess(q: &[f64], intensity: &[f64], approx_center: f64) -> VoigtLinear {
    let n = q.len() as f64;
    let mean_q = q.iter().sum::<f64>() / n;
    let mean_i = intensity.iter().sum::<f64>() / n;

    let sxx: f64 = q.iter().map(|x| (x - mean_q).powi(2)).sum();
    let sxy: f64 = q
        .iter()
        .zip(intensity)
        .map(|(x, y)| (x - mean_q) * (y - mean_i))
        .sum();
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };

    let q_span = q[q.len() - 1] - q[0];
    let i_max = intensity.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let i_min = intensity.iter().copied().fold(f64::INFINITY, f64::min);

    VoigtLinear {
        intercept: mean_i - slope * mean_q,
        slope,
        amplitude: (i_max - i_min) / 50.0,
        center: approx_center,
        sigma: q_span / 5.0,
    }
}

fn to_model(params: &Vec5) -> VoigtLinear {
    VoigtLinear::from_array([params[0], params[1], params[2], params[3], params[4]])
}

fn sum_of_squares(q: &[f64], intensity: &[f64], params: &Vec5) -> f64 {
    let model = to_model(params);
    q.iter()
        .zip(intensity)
        .map(|(&x, &y)| (model.eval(x) - y).powi(2))
        .sum()
}

/// 前向差分 Jacobian 累加出 JᵀJ 与 Jᵀr
fn normal_equations(q: &[f64], intensity: &[f64], params: &Vec5) -> (Mat5, Vec5) {
    let model = to_model(params);

    let steps: [f64; N] = std::array::from_fn(|j| 1e-7 * params[j].abs().max(1e-6));
    let shifted: [VoigtLinear; N] = std::array::from_fn(|j| {
        let mut p = *params;
        p[j] += steps[j];
        to_model(&p)
    });

    let mut jtj = Mat5::zeros();
    let mut jtr = Vec5::zeros();

    for (&x, &y) in q.iter().zip(intensity) {
        let base = model.eval(x);
        let residual = base - y;
        let row = Vec5::from_fn(|j, _| (shifted[j].eval(x) - base) / steps[j]);

        jtj += row * row.transpose();
        jtr += row * residual;
    }

    (jtj, jtr)
}
