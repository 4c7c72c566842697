//! # 仪器选择
//!
//! 不同仪器的数据文件分隔符与背景噪声水平不同，峰高阈值随仪器而定。
//! 没有通用的安全默认值：未识别的仪器名称直接报配置错误。
//!
//! | 仪器 | 说明 | 分隔符 | 默认幅值阈值 |
//! |------|------|--------|--------------|
//! | Ganesha | 实验室光源，低背景 | Tab | 0.05 |
//! | DLS | Diamond 同步辐射，噪声较高 | `,` | 0.5 |
//!
//! ## 依赖关系
//! - 被 `detect/mod.rs` 与 `parsers/spectrum.rs` 使用

use crate::error::{Result, SaxsError};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 采集数据的仪器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    /// SAXSLAB Ganesha 实验室小角散射仪
    Ganesha,
    /// Diamond Light Source 同步辐射线站
    Dls,
}

impl Instrument {
    /// 默认 Voigt 幅值阈值
    pub fn height_threshold(self) -> f64 {
        match self {
            Instrument::Ganesha => 0.05,
            Instrument::Dls => 0.5,
        }
    }

    /// 数据文件列分隔符
    pub fn delimiter(self) -> u8 {
        match self {
            Instrument::Ganesha => b'\t',
            Instrument::Dls => b',',
        }
    }

    /// 按名称解析（大小写不敏感）
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "ganesha" | "saxslab" => Ok(Instrument::Ganesha),
            "dls" | "diamond" | "i22" => Ok(Instrument::Dls),
            _ => Err(SaxsError::UnknownInstrument {
                name: name.to_string(),
            }),
        }
    }
}

impl FromStr for Instrument {
    type Err = SaxsError;

    fn from_str(s: &str) -> Result<Self> {
        Instrument::parse(s)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instrument::Ganesha => write!(f, "Ganesha"),
            Instrument::Dls => write!(f, "DLS"),
        }
    }
}
