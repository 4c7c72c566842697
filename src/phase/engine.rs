//! # 相识别引擎
//!
//! 多轮迭代：每轮在残余峰上投票、溯源、消解简并、投影验证，
//! 确认的相并入累计结果，其峰从残余中移除，直到不动点。
//!
//! ## 单轮流程
//! 1. 残余峰 ≥ 4 个走立方路径，否则走 La/HII 路径
//! 2. 立方：D/P/G 候选值合池分箱，计数超过阈值的箱逐个溯源，
//!    支持对 > 3 的相族临时确认，再做 D/P 简并消解
//! 3. La/HII：两族候选值合池分箱，取计数最多的箱，成员占多数的相族胜出
//! 4. 投影验证；通过的相按预测峰位重新认领残余峰
//! 5. 通过验证的相按（支持峰数多、缺失少、标签序）贪心接受，
//!    与已接受相共用峰、或标签在之前轮次已确认的，本轮跳过
//!
//! ## 终止
//! 残余峰少于 2 个、某轮没有新相、或达到轮数上限。
//! 迭代写成 `Progress` 状态上的纯函数折叠，中间状态可由 [`PhaseIdentifier::rounds`] 观察。
//!
//! ## 依赖关系
//! - 被 `commands/` 与集成测试使用
//! - 使用 `phase/` 其他子模块、`histogram.rs`、`models/`

use super::candidates::{self, CandidateValue};
use super::degeneracy::{self, Proposal};
use super::projection::{self, Verdict};
use super::tracer::{self, Support};
use crate::error::{Result, SaxsError};
use crate::histogram::Histogram;
use crate::models::{IdentificationResult, PeakSet, PhaseAssignment, PhaseTag};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 立方路径所需的最少残余峰数
const CUBIC_MIN_PEAKS: usize = 4;
/// 临时确认立方相所需的支持对数下限（不含）
const CUBIC_MIN_SUPPORT: usize = 3;

/// 相识别参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifyConfig {
    /// 立方路径箱数 = 粒度 × 候选值个数
    pub granularity: f64,
    /// La/HII 路径箱数 = 粒度 × 候选值个数
    pub lamellar_granularity: f64,
    /// 箱计数需严格大于此值才被溯源
    pub population_threshold: usize,
    /// 预测峰与观测峰的匹配容差（Å⁻¹）
    pub tolerance: f64,
    /// 轮数上限
    pub max_rounds: usize,
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        Self {
            granularity: 2.0,
            lamellar_granularity: 2.0,
            population_threshold: 3,
            tolerance: 0.001,
            max_rounds: 10,
        }
    }
}

impl IdentifyConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("granularity", self.granularity),
            ("lamellar granularity", self.lamellar_granularity),
            ("tolerance", self.tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SaxsError::InvalidArgument(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.max_rounds == 0 {
            return Err(SaxsError::InvalidArgument(
                "at least one identification round is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// 迭代中间状态
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// 累计确认的相
    pub confirmed: BTreeMap<PhaseTag, PhaseAssignment>,
    /// 残余峰（升序）
    pub residue: Vec<f64>,
    /// 已完成的有效轮数
    pub rounds: usize,
}

impl Progress {
    fn start(peaks: &PeakSet) -> Self {
        Self {
            confirmed: BTreeMap::new(),
            residue: peaks.positions(),
            rounds: 0,
        }
    }

    fn into_result(self) -> IdentificationResult {
        IdentificationResult {
            phases: self.confirmed,
            unassigned_peaks: self.residue,
            rounds: self.rounds,
        }
    }
}

/// 通过验证、等待贪心接受的相
#[derive(Debug, Clone)]
struct Verified {
    proposal: Proposal,
    misses: usize,
    peaks: BTreeSet<usize>,
}

/// 相识别器
#[derive(Debug, Clone, Default)]
pub struct PhaseIdentifier {
    config: IdentifyConfig,
}

impl PhaseIdentifier {
    pub fn new(config: IdentifyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &IdentifyConfig {
        &self.config
    }

    /// 识别峰列表中的相；`lo_q` 为峰检测时的搜索下限
    pub fn identify(&self, peaks: &PeakSet, lo_q: f64) -> IdentificationResult {
        self.rounds(peaks, lo_q)
            .last()
            .unwrap_or_else(|| Progress::start(peaks))
            .into_result()
    }

    /// 逐轮状态：首项为初始状态，其后每项对应一个产生新相的轮次
    pub fn rounds<'a>(&'a self, peaks: &PeakSet, lo_q: f64) -> impl Iterator<Item = Progress> + 'a {
        let observed = peaks.positions();
        std::iter::successors(Some(Progress::start(peaks)), move |progress| {
            self.advance(progress, &observed, lo_q)
        })
    }

    /// 执行一轮；到达不动点时返回 None
    fn advance(&self, progress: &Progress, observed: &[f64], lo_q: f64) -> Option<Progress> {
        if progress.residue.len() < 2 || progress.rounds >= self.config.max_rounds {
            return None;
        }

        let residue = &progress.residue;
        let accepted = self.round(residue, observed, lo_q, &progress.confirmed);
        if accepted.is_empty() {
            return None;
        }

        let used: BTreeSet<usize> = accepted
            .iter()
            .flat_map(|v| v.peaks.iter().copied())
            .collect();

        let mut confirmed = progress.confirmed.clone();
        for verified in accepted {
            let assignment = to_assignment(&verified.proposal, residue);
            confirmed.insert(assignment.phase, assignment);
        }

        let remaining = residue
            .iter()
            .enumerate()
            .filter(|(i, _)| !used.contains(i))
            .map(|(_, &q)| q)
            .collect();

        Some(Progress {
            confirmed,
            residue: remaining,
            rounds: progress.rounds + 1,
        })
    }

    /// 单轮：生成、验证并贪心接受
    fn round(
        &self,
        residue: &[f64],
        observed: &[f64],
        lo_q: f64,
        earlier: &BTreeMap<PhaseTag, PhaseAssignment>,
    ) -> Vec<Verified> {
        let proposals = if residue.len() >= CUBIC_MIN_PEAKS {
            self.cubic_proposals(residue)
        } else {
            self.lamellar_hexagonal_proposals(residue)
        };

        let mut verified: Vec<Verified> = proposals
            .into_iter()
            .filter(|p| !earlier.contains_key(&p.phase()))
            .filter_map(|proposal| {
                match projection::verify(
                    &proposal.support,
                    residue,
                    observed,
                    lo_q,
                    self.config.tolerance,
                ) {
                    Verdict::Confirmed { misses } => {
                        let support =
                            projection::claim(&proposal.support, residue, self.config.tolerance);
                        Some(Verified {
                            peaks: support.peak_set(),
                            proposal: Proposal {
                                support,
                                ..proposal
                            },
                            misses,
                        })
                    }
                    _ => None,
                }
            })
            .collect();

        // 稳定排序：同键时保持箱号顺序
        verified.sort_by(|a, b| {
            b.peaks
                .len()
                .cmp(&a.peaks.len())
                .then(a.misses.cmp(&b.misses))
                .then(a.proposal.phase().cmp(&b.proposal.phase()))
        });

        let mut used = BTreeSet::new();
        let mut tags = BTreeSet::new();
        verified
            .into_iter()
            .filter(|v| {
                if tags.contains(&v.proposal.phase()) || !v.peaks.is_disjoint(&used) {
                    return false;
                }
                tags.insert(v.proposal.phase());
                used.extend(v.peaks.iter().copied());
                true
            })
            .collect()
    }

    /// 立方路径
    fn cubic_proposals(&self, residue: &[f64]) -> Vec<Proposal> {
        let pool = candidates::generate(residue, &PhaseTag::CUBIC);
        let Some(hist) = self.histogram(&pool, self.config.granularity) else {
            return Vec::new();
        };

        hist.over_populated(self.config.population_threshold)
            .flat_map(|k| {
                let members = hist.members(k);
                let confirmed: Vec<Support> = PhaseTag::CUBIC
                    .iter()
                    .map(|&tag| tracer::trace(&pool, members, tag, residue.len()))
                    .filter(|s| s.len() > CUBIC_MIN_SUPPORT)
                    .collect();
                degeneracy::resolve(confirmed)
            })
            .collect()
    }

    /// La/HII 路径
    fn lamellar_hexagonal_proposals(&self, residue: &[f64]) -> Vec<Proposal> {
        let pool = candidates::generate(residue, &PhaseTag::LAMELLAR_HEXAGONAL);
        let Some(hist) = self.histogram(&pool, self.config.lamellar_granularity) else {
            return Vec::new();
        };
        let Some(best) = hist.most_populated() else {
            return Vec::new();
        };

        let members = hist.members(best);
        let lamellar = tracer::trace(&pool, members, PhaseTag::La, residue.len());
        let hexagonal = tracer::trace(&pool, members, PhaseTag::Hii, residue.len());

        let winner = if lamellar.len() >= hexagonal.len() {
            lamellar
        } else {
            hexagonal
        };

        if winner.is_empty() {
            Vec::new()
        } else {
            vec![Proposal::new(winner)]
        }
    }

    fn histogram(&self, pool: &[CandidateValue], granularity: f64) -> Option<Histogram> {
        let bins = (granularity * pool.len() as f64).floor() as usize;
        Histogram::with_bin_count(&candidates::lattice_values(pool), bins.max(1))
    }
}

/// 支持对转为对外的指认结果（按峰位、指数升序）
fn to_assignment(proposal: &Proposal, residue: &[f64]) -> PhaseAssignment {
    let mut pairs: Vec<(f64, u32)> = proposal
        .support
        .reflections
        .iter()
        .filter_map(|r| residue.get(r.peak).map(|&q| (q, r.index)))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    PhaseAssignment {
        phase: proposal.phase(),
        lattice_parameter: proposal.lattice_parameter,
        indices: pairs.iter().map(|&(_, m)| m).collect(),
        peaks: pairs.iter().map(|&(q, _)| q).collect(),
    }
}
