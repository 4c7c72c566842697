//! # 统一错误处理模块
//!
//! 定义 lipidsaxs 的所有错误类型，使用 `thiserror` 派生。
//!
//! 单个窗口拟合失败不属于错误（见 `fitting::FitRejection`），
//! 核心算法中唯一致命的是配置错误。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// lipidsaxs 统一错误类型
#[derive(Error, Debug)]
pub enum SaxsError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid spectrum: {0}")]
    InvalidSpectrum(String),

    // ─────────────────────────────────────────────────────────────
    // 配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown instrument '{name}' (expected one of: ganesha, dls)")]
    UnknownInstrument { name: String },

    #[error("No instrument selected: cannot choose a peak height threshold")]
    MissingInstrument,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    // ─────────────────────────────────────────────────────────────
    // 输出错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot rendering failed: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

impl SaxsError {
    /// 是否为配置类错误（调用方必须修正参数，不能重试）
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SaxsError::UnknownInstrument { .. }
                | SaxsError::MissingInstrument
                | SaxsError::InvalidArgument(_)
                | SaxsError::InvalidRange(_)
        )
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, SaxsError>;
