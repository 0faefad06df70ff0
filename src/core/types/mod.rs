// 核心类型模块
//
// 列ID、作用域名、值类型标签等在各模块间共享的基础类型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 列ID
///
/// 由列注册表为每个列名分配一次，热路径上一律用它代替列名做键
pub type ColumnId = u16;

/// 分类值ID（字符串驻留后的整数）
pub type ValueId = i32;

/// 列的声明类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// 整数列，维护数值聚合
    Int,
    /// 字符串列，维护频率表
    Str,
    /// 多值字符串列，每个成员单独计数
    Set,
}

impl ValueType {
    /// 是否为分类类型（走频率表）
    pub fn is_categorical(&self) -> bool {
        matches!(self, ValueType::Str | ValueType::Set)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Int => write!(f, "INT"),
            ValueType::Str => write!(f, "STR"),
            ValueType::Set => write!(f, "SET"),
        }
    }
}
