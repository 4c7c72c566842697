//! # 脂质自组装相数据模型
//!
//! 定义相标签（立方 D/P/G、层状 La、反六角 HII）、各相族允许的
//! 指数集合，以及相指认结果。
//!
//! ## 指数约定
//! - 立方相：指数 m = h² + k² + l²，峰位比 √m
//! - 反六角 HII：指数 m = h² + hk + k²，峰位比 √m，晶格常数额外乘 2/√3
//! - 层状 La：指数为衍射级次 n，峰位比 n
//!
//! ## 依赖关系
//! - 被 `phase/` 识别引擎使用
//! - 被 `export/` 输出使用

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

/// 2/√3
const HEX_SCALE: f64 = 1.154_700_538_379_251_5;

/// 相标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PhaseTag {
    /// 双连续立方 Pn3m (Diamond)
    D,
    /// 双连续立方 Im3m (Primitive)
    P,
    /// 双连续立方 Ia3d (Gyroid)
    G,
    /// 层状相
    La,
    /// 反六角相
    Hii,
}

impl PhaseTag {
    pub const CUBIC: [PhaseTag; 3] = [PhaseTag::D, PhaseTag::P, PhaseTag::G];
    pub const LAMELLAR_HEXAGONAL: [PhaseTag; 2] = [PhaseTag::La, PhaseTag::Hii];

    /// 相族定义
    pub fn family(self) -> &'static PhaseFamily {
        match self {
            PhaseTag::D => &DIAMOND,
            PhaseTag::P => &PRIMITIVE,
            PhaseTag::G => &GYROID,
            PhaseTag::La => &LAMELLAR,
            PhaseTag::Hii => &HEXAGONAL,
        }
    }
}

impl fmt::Display for PhaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseTag::D => write!(f, "D"),
            PhaseTag::P => write!(f, "P"),
            PhaseTag::G => write!(f, "G"),
            PhaseTag::La => write!(f, "La"),
            PhaseTag::Hii => write!(f, "HII"),
        }
    }
}

/// 指数到峰位比的映射方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    /// 比值 = √index
    SquareRoot,
    /// 比值 = index
    Linear,
}

/// 相族：允许的指数集合与投影检验参数
#[derive(Debug)]
pub struct PhaseFamily {
    /// 生成候选晶格常数使用的指数
    pub indices: &'static [u32],
    /// 投影检验时预测的指数
    pub projection: &'static [u32],
    pub spacing: Spacing,
    /// 晶格常数比例因子
    pub scale: f64,
    /// 投影检验允许缺失的预测峰数
    pub allowed_misses: usize,
}

static DIAMOND: PhaseFamily = PhaseFamily {
    indices: &[2, 3, 4, 6, 8, 9, 10, 12],
    projection: &[2, 3, 4, 6, 8, 9],
    spacing: Spacing::SquareRoot,
    scale: 1.0,
    allowed_misses: 2,
};

static PRIMITIVE: PhaseFamily = PhaseFamily {
    indices: &[2, 4, 6, 8, 10, 12, 14, 16],
    projection: &[2, 4, 6, 8, 10, 12],
    spacing: Spacing::SquareRoot,
    scale: 1.0,
    allowed_misses: 2,
};

static GYROID: PhaseFamily = PhaseFamily {
    indices: &[6, 8, 14, 16, 20, 22, 24, 26],
    projection: &[6, 8, 14, 16, 20, 22],
    spacing: Spacing::SquareRoot,
    scale: 1.0,
    allowed_misses: 2,
};

static LAMELLAR: PhaseFamily = PhaseFamily {
    indices: &[1, 2, 3],
    projection: &[1, 2, 3],
    spacing: Spacing::Linear,
    scale: 1.0,
    allowed_misses: 1,
};

static HEXAGONAL: PhaseFamily = PhaseFamily {
    indices: &[1, 3, 4],
    projection: &[1, 3, 4],
    spacing: Spacing::SquareRoot,
    scale: HEX_SCALE,
    allowed_misses: 1,
};

impl PhaseFamily {
    /// 指数对应的峰位比
    pub fn ratio(&self, index: u32) -> f64 {
        match self.spacing {
            Spacing::SquareRoot => (index as f64).sqrt(),
            Spacing::Linear => index as f64,
        }
    }

    /// Bragg 反演：a = 2π · scale · ratio / q
    pub fn lattice_parameter(&self, index: u32, q: f64) -> f64 {
        2.0 * PI * self.scale * self.ratio(index) / q
    }

    /// 由基频预测的峰位（与 `projection` 同序）
    pub fn project(&self, fundamental: f64) -> Vec<f64> {
        self.projection
            .iter()
            .map(|&m| fundamental * self.ratio(m))
            .collect()
    }
}

/// 指数的 Miller 标记
///
/// 立方取 h≥k≥l≥0 且 h²+k²+l²=m 中字典序最小的一组；
/// HII 取 h≥k≥0 且 h²+hk+k²=m；La 记为 (0 0 n)。
pub fn miller_label(tag: PhaseTag, index: u32) -> String {
    let limit = (index as f64).sqrt() as u32 + 1;
    match tag {
        PhaseTag::La => format!("(00{})", index),
        PhaseTag::Hii => (0..=limit)
            .flat_map(|h| (0..=h).map(move |k| (h, k)))
            .find(|&(h, k)| h * h + h * k + k * k == index)
            .map(|(h, k)| format!("({}{})", h, k))
            .unwrap_or_else(|| format!("[{}]", index)),
        _ => (0..=limit)
            .flat_map(|h| (0..=h).flat_map(move |k| (0..=k).map(move |l| (h, k, l))))
            .find(|&(h, k, l)| h * h + k * k + l * l == index)
            .map(|(h, k, l)| format!("({}{}{})", h, k, l))
            .unwrap_or_else(|| format!("[{}]", index)),
    }
}

/// 单个相的指认：晶格常数 + 按峰位升序排列的 (指数, 峰) 对
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseAssignment {
    pub phase: PhaseTag,
    /// 晶格常数 a（Å）
    pub lattice_parameter: f64,
    pub indices: Vec<u32>,
    pub peaks: Vec<f64>,
}

impl PhaseAssignment {
    /// (指数, 峰位) 对
    pub fn reflections(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.indices.iter().copied().zip(self.peaks.iter().copied())
    }

    /// 各峰的 Miller 标记
    pub fn labels(&self) -> Vec<String> {
        self.indices
            .iter()
            .map(|&m| miller_label(self.phase, m))
            .collect()
    }
}

/// 相识别结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentificationResult {
    pub phases: BTreeMap<PhaseTag, PhaseAssignment>,
    /// 所有轮次结束后仍未归属任何相的峰（升序）
    pub unassigned_peaks: Vec<f64>,
    /// 实际执行的轮数
    pub rounds: usize,
}

impl IdentificationResult {
    pub fn get(&self, tag: PhaseTag) -> Option<&PhaseAssignment> {
        self.phases.get(&tag)
    }

    pub fn contains(&self, tag: PhaseTag) -> bool {
        self.phases.contains_key(&tag)
    }

    /// 已指认的峰总数
    pub fn assigned_count(&self) -> usize {
        self.phases.values().map(|a| a.peaks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}
