//! 列统计信息模块
//!
//! 为每个块和每张表增量维护列级统计信息，供查询规划做区间裁剪和基数估算
//!
//! ## 模块结构
//!
//! - `numeric` - 整数列的计数、最值与均值
//! - `frequency` - 分类列的有界高频值表
//! - `registry` - 按作用域惰性创建和查询统计表
//! - `snapshot` - 块元数据快照的持久化

pub mod frequency;
pub mod numeric;
pub mod registry;
pub mod snapshot;

pub use frequency::{FrequencyTable, FrequencyTracker, TOP_STRING_COUNT};
pub use numeric::{NumericAggregate, NumericTable};
pub use registry::{ScopeHandle, ScopedRegistry};
pub use snapshot::BlockInfo;
