//! 列分类
//!
//! 按声明类型划分表的列，输出按列名排序的结果，只用于人工查看

use std::collections::HashMap;
use std::fmt::Write;

use crate::core::{ColumnId, ValueType};

/// 声明类型为 `wanted` 的列名，按字典序
pub fn columns_of_type(
    key_ids: &HashMap<String, ColumnId>,
    key_types: &HashMap<ColumnId, ValueType>,
    wanted: ValueType,
) -> Vec<String> {
    let mut names: Vec<String> = key_ids
        .iter()
        .filter(|(_, id)| key_types.get(*id) == Some(&wanted))
        .map(|(name, _)| name.clone())
        .collect();
    names.sort();
    names
}

/// 渲染列信息：先字符串列，后整数列，多值列存在时附在最后
pub fn render_column_info(
    key_ids: &HashMap<String, ColumnId>,
    key_types: &HashMap<ColumnId, ValueType>,
) -> String {
    let mut out = String::new();
    let mut section = |title: &str, value_type: ValueType, always: bool| {
        let names = columns_of_type(key_ids, key_types, value_type);
        if names.is_empty() && !always {
            return;
        }
        let _ = writeln!(out, "\n{}\n", title);
        for name in names {
            let _ = writeln!(out, "  {}", name);
        }
    };

    section("String Columns", ValueType::Str, true);
    section("Integer Columns", ValueType::Int, true);
    section("Set Columns", ValueType::Set, false);
    out.push('\n');
    out
}
