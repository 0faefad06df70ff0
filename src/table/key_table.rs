//! 列注册表
//!
//! 为每个列名分配一次稳定的列ID，并记录列ID到声明类型的映射

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::core::{ColumnId, StatsError, StatsResult, ValueType};

#[derive(Debug, Default)]
struct KeyTableInner {
    /// 列名 -> 列ID
    key_ids: HashMap<String, ColumnId>,
    /// 列ID -> 类型（下标即列ID）
    key_types: Vec<ValueType>,
    /// 列ID -> 列名（下标即列ID）
    key_names: Vec<String>,
}

/// 列注册表
///
/// 内部加读写锁，多个块工作线程可以共享同一张表
#[derive(Debug, Default)]
pub struct KeyTable {
    inner: RwLock<KeyTableInner>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取列ID，列名首次出现时按声明类型分配新ID
    ///
    /// 同名列以不同类型出现时返回 `TypeMismatch`
    pub fn get_or_assign(&self, name: &str, value_type: ValueType) -> StatsResult<ColumnId> {
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.key_ids.get(name) {
                return check_type(name, inner.key_types[id as usize], value_type).map(|_| id);
            }
        }

        let mut inner = self.inner.write();
        // 拿到写锁前可能已被其他线程分配
        if let Some(&id) = inner.key_ids.get(name) {
            return check_type(name, inner.key_types[id as usize], value_type).map(|_| id);
        }

        let id = ColumnId::try_from(inner.key_names.len())
            .map_err(|_| StatsError::ColumnIdExhausted(name.to_string()))?;
        inner.key_ids.insert(name.to_string(), id);
        inner.key_types.push(value_type);
        inner.key_names.push(name.to_string());
        log::debug!("分配列ID: {} -> {} ({})", name, id, value_type);
        Ok(id)
    }

    pub fn get_id(&self, name: &str) -> Option<ColumnId> {
        self.inner.read().key_ids.get(name).copied()
    }

    pub fn get_name(&self, id: ColumnId) -> Option<String> {
        self.inner.read().key_names.get(id as usize).cloned()
    }

    pub fn get_type(&self, id: ColumnId) -> Option<ValueType> {
        self.inner.read().key_types.get(id as usize).copied()
    }

    /// 列名 -> 列ID 映射的副本
    pub fn key_ids(&self) -> HashMap<String, ColumnId> {
        self.inner.read().key_ids.clone()
    }

    /// 列ID -> 类型 映射的副本
    pub fn key_types(&self) -> HashMap<ColumnId, ValueType> {
        self.inner
            .read()
            .key_types
            .iter()
            .enumerate()
            .map(|(id, &t)| (id as ColumnId, t))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().key_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_type(name: &str, declared: ValueType, found: ValueType) -> StatsResult<()> {
    if declared == found {
        Ok(())
    } else {
        Err(StatsError::TypeMismatch {
            name: name.to_string(),
            declared,
            found,
        })
    }
}
