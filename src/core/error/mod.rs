//! 统一错误处理
//!
//! 统计核心本身没有可失败的操作：列从未出现过用 `None` 表示，而不是错误。
//! 只有边界上的操作会失败：配置加载、块元数据读写、输入解析、列ID分配。
//! 这些操作统一返回 `StatsResult<T>`。

use thiserror::Error;

use crate::core::types::ValueType;

/// 统一的结果类型
pub type StatsResult<T> = Result<T, StatsError>;

/// 统计引擎错误类型
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON序列化错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("配置解析错误: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("配置序列化错误: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("第{line}行解析错误: {reason}")]
    Parse { line: usize, reason: String },

    #[error("非法的作用域名称 '{0}'：不能为空、绝对路径或包含 '..'")]
    InvalidScopeName(String),

    #[error("列ID已耗尽，无法为列 '{0}' 分配ID")]
    ColumnIdExhausted(String),

    #[error("值ID已耗尽，无法驻留 '{0}'")]
    ValueIdExhausted(String),

    #[error("列 '{name}' 类型冲突: 已声明为 {declared:?}，实际为 {found:?}")]
    TypeMismatch {
        name: String,
        declared: ValueType,
        found: ValueType,
    },

    #[error("日志系统错误: {0}")]
    Logging(String),
}

impl From<flexi_logger::FlexiLoggerError> for StatsError {
    fn from(e: flexi_logger::FlexiLoggerError) -> Self {
        StatsError::Logging(e.to_string())
    }
}

impl StatsError {
    /// 创建解析错误
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        StatsError::Parse {
            line,
            reason: reason.into(),
        }
    }
}
