//! 字符串驻留
//!
//! 把分类值字符串映射为稳定的整数ID，频率表只处理整数键

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::core::{StatsError, StatsResult, ValueId};

/// 字符串驻留表
#[derive(Debug, Default)]
pub struct StringInterner {
    ids: DashMap<String, ValueId>,
    names: RwLock<Vec<String>>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取字符串的ID，首次出现时分配
    pub fn intern(&self, value: &str) -> StatsResult<ValueId> {
        if let Some(id) = self.ids.get(value) {
            return Ok(*id);
        }

        // 持有写锁分配，保证ID与下标一致
        let mut names = self.names.write();
        if let Some(id) = self.ids.get(value) {
            return Ok(*id);
        }
        let id = ValueId::try_from(names.len())
            .map_err(|_| StatsError::ValueIdExhausted(value.to_string()))?;
        names.push(value.to_string());
        self.ids.insert(value.to_string(), id);
        Ok(id)
    }

    pub fn get(&self, value: &str) -> Option<ValueId> {
        self.ids.get(value).map(|id| *id)
    }

    /// 根据ID还原字符串
    pub fn resolve(&self, id: ValueId) -> Option<String> {
        let index = usize::try_from(id).ok()?;
        self.names.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
