//! 作用域统计注册表
//!
//! 按作用域（表名或块名）管理各列的数值聚合与频率表，首次写入时惰性创建。
//!
//! 每个作用域的统计表各自挂在一把互斥锁后面，同一作用域在同一时刻只有一个写者；
//! 不同作用域之间互不阻塞。注册表由存储会话持有，生命周期随会话结束

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use super::frequency::{self, FrequencyTable, FrequencyTracker};
use super::numeric::{self, NumericAggregate, NumericTable};
use super::snapshot::BlockInfo;
use crate::core::{ColumnId, ValueId};

/// 作用域统计表句柄
pub type ScopeHandle<T> = Arc<Mutex<T>>;

/// 作用域统计注册表
#[derive(Debug, Default)]
pub struct ScopedRegistry {
    /// 作用域 -> 数值聚合表
    numeric: DashMap<String, ScopeHandle<NumericTable>>,
    /// 作用域 -> 频率表
    frequency: DashMap<String, ScopeHandle<FrequencyTable>>,
}

fn get_or_create<T: Default>(map: &DashMap<String, ScopeHandle<T>>, scope: &str) -> ScopeHandle<T> {
    if let Some(handle) = map.get(scope) {
        return handle.value().clone();
    }
    map.entry(scope.to_string())
        .or_insert_with(|| {
            log::debug!("创建统计作用域: {}", scope);
            Arc::new(Mutex::new(T::default()))
        })
        .value()
        .clone()
}

impl ScopedRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取作用域的数值聚合表，不存在时创建
    ///
    /// 同一作用域每次返回同一个实例
    pub fn get_or_create_numeric(&self, scope: &str) -> ScopeHandle<NumericTable> {
        get_or_create(&self.numeric, scope)
    }

    /// 获取作用域的频率表，不存在时创建
    pub fn get_or_create_frequency(&self, scope: &str) -> ScopeHandle<FrequencyTable> {
        get_or_create(&self.frequency, scope)
    }

    /// 更新作用域内某列的数值聚合
    pub fn update_numeric(&self, scope: &str, column: ColumnId, value: i64) {
        let handle = self.get_or_create_numeric(scope);
        numeric::update_numeric(&mut handle.lock(), column, value);
    }

    /// 记录作用域内某列的分类值出现次数
    pub fn record_frequency(&self, scope: &str, column: ColumnId, value_id: ValueId, increment: u64) {
        let handle = self.get_or_create_frequency(scope);
        frequency::record_frequency(&mut handle.lock(), column, value_id, increment);
    }

    /// 查询数值聚合；作用域或列从未写入时返回 `None`
    pub fn lookup_numeric(&self, scope: &str, column: ColumnId) -> Option<NumericAggregate> {
        let handle = self.numeric.get(scope)?.value().clone();
        let table = handle.lock();
        table.get(&column).copied()
    }

    /// 查询频率表；作用域或列从未写入时返回 `None`
    pub fn lookup_frequency(&self, scope: &str, column: ColumnId) -> Option<FrequencyTracker> {
        let handle = self.frequency.get(scope)?.value().clone();
        let table = handle.lock();
        table.get(&column).cloned()
    }

    /// 裁剪作用域内所有频率表，返回丢弃的总项数
    ///
    /// 持有该作用域的锁，与同一作用域的其他访问串行
    pub fn prune_scope(&self, scope: &str, limit: usize) -> usize {
        let handle = match self.frequency.get(scope) {
            Some(handle) => handle.value().clone(),
            None => return 0,
        };
        let discarded = frequency::prune_all(&mut handle.lock(), limit);
        if discarded > 0 {
            log::debug!("作用域 {} 裁剪了 {} 个低频值", scope, discarded);
        }
        discarded
    }

    /// 所有已创建的作用域名称，按字典序
    pub fn scopes(&self) -> Vec<String> {
        let names: BTreeSet<String> = self
            .numeric
            .iter()
            .map(|r| r.key().clone())
            .chain(self.frequency.iter().map(|r| r.key().clone()))
            .collect();
        names.into_iter().collect()
    }

    pub fn contains_scope(&self, scope: &str) -> bool {
        self.numeric.contains_key(scope) || self.frequency.contains_key(scope)
    }

    /// 生成作用域的快照；作用域不存在时返回 `None`
    pub fn snapshot(&self, scope: &str) -> Option<BlockInfo> {
        let numeric = self.numeric.get(scope).map(|r| r.value().clone());
        let frequency = self.frequency.get(scope).map(|r| r.value().clone());
        if numeric.is_none() && frequency.is_none() {
            return None;
        }

        let mut info = BlockInfo::new(scope);
        if let Some(handle) = numeric {
            info.numeric = handle.lock().iter().map(|(&k, v)| (k, *v)).collect();
        }
        if let Some(handle) = frequency {
            info.categorical = handle.lock().iter().map(|(&k, v)| (k, v.clone())).collect();
        }
        Some(info)
    }

    /// 用快照重建作用域，覆盖已有内容
    pub fn restore(&self, info: BlockInfo) {
        let name = info.name.clone();
        let (numeric, frequency) = info.into_tables();
        self.numeric.insert(name.clone(), Arc::new(Mutex::new(numeric)));
        self.frequency.insert(name.clone(), Arc::new(Mutex::new(frequency)));
        log::debug!("已从快照恢复作用域: {}", name);
    }

    /// 移除作用域并返回其快照，用于块封存后释放内存
    pub fn take_scope(&self, scope: &str) -> Option<BlockInfo> {
        let numeric = self.numeric.remove(scope).map(|(_, handle)| handle);
        let frequency = self.frequency.remove(scope).map(|(_, handle)| handle);
        if numeric.is_none() && frequency.is_none() {
            return None;
        }

        let mut info = BlockInfo::new(scope);
        if let Some(handle) = numeric {
            let table = std::mem::take(&mut *handle.lock());
            info.numeric = table.into_iter().collect();
        }
        if let Some(handle) = frequency {
            let table = std::mem::take(&mut *handle.lock());
            info.categorical = table.into_iter().collect();
        }
        log::debug!("已移除统计作用域: {}", scope);
        Some(info)
    }
}
