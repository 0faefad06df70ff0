//! 版本与特性信息
//!
//! 扁平的 特性名 -> 值 映射，进程生命周期内不变

use std::collections::BTreeMap;

use serde::Serialize;

pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// 特性值：版本号字符串或开关
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VersionValue {
    Str(&'static str),
    Bool(bool),
}

pub fn version_info() -> BTreeMap<&'static str, VersionValue> {
    let mut info = BTreeMap::new();
    info.insert("version", VersionValue::Str(VERSION_STRING));
    info.insert("field_separator", VersionValue::Bool(true));
    info.insert("log_hist", VersionValue::Bool(true));
    info.insert("query_cache", VersionValue::Bool(true));
    info.insert("top_k_pruning", VersionValue::Bool(true));
    info.insert("profiler", VersionValue::Bool(crate::utils::profiler::PROFILER_ENABLED));
    info
}
