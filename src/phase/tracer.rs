//! # 投票箱溯源
//!
//! 直方图箱保存的是候选值下标，溯源直接按下标取回 (相, 指数, 峰)，
//! 不再按数值在拼接数组里反查。
//! 下标失效（越界）的成员视为“无来源”，跳过而不中断本轮。
//!
//! ## 依赖关系
//! - 被 `phase/engine.rs` 与 `phase/degeneracy.rs` 使用
//! - 使用 `phase/candidates.rs`

use super::candidates::CandidateValue;
use crate::models::PhaseTag;

use std::collections::BTreeSet;

/// 支持某个相的一个 (指数, 峰) 对
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflection {
    pub index: u32,
    /// 峰在本轮峰列表中的下标
    pub peak: usize,
    /// 该对给出的晶格常数
    pub lattice: f64,
}

/// 一个箱内某相族的全部支持
#[derive(Debug, Clone, PartialEq)]
pub struct Support {
    pub phase: PhaseTag,
    /// 按首次出现顺序，(指数, 峰) 不重复
    pub reflections: Vec<Reflection>,
}

impl Support {
    /// 不同 (指数, 峰) 对的个数
    pub fn len(&self) -> usize {
        self.reflections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reflections.is_empty()
    }

    /// 涉及的峰下标
    pub fn peak_set(&self) -> BTreeSet<usize> {
        self.reflections.iter().map(|r| r.peak).collect()
    }

    /// 涉及的指数
    pub fn index_set(&self) -> BTreeSet<u32> {
        self.reflections.iter().map(|r| r.index).collect()
    }

    /// 晶格常数均值
    pub fn mean_lattice(&self) -> f64 {
        let sum: f64 = self.reflections.iter().map(|r| r.lattice).sum();
        sum / self.reflections.len().max(1) as f64
    }
}

/// 把箱成员追溯到指定相族
pub fn trace(
    pool: &[CandidateValue],
    members: &[usize],
    phase: PhaseTag,
    peak_count: usize,
) -> Support {
    let mut seen = BTreeSet::new();
    let reflections = members
        .iter()
        .filter_map(|&i| pool.get(i))
        .filter(|c| c.phase == phase && c.peak < peak_count)
        .filter(|c| seen.insert((c.index, c.peak)))
        .map(|c| Reflection {
            index: c.index,
            peak: c.peak,
            lattice: c.lattice,
        })
        .collect();

    Support { phase, reflections }
}
