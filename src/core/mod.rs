pub mod error;
pub mod types;

// 错误和结果类型
pub use error::{StatsError, StatsResult};

// 核心数据类型
pub use types::{ColumnId, ValueId, ValueType};
