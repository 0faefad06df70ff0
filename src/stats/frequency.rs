//! 频率表模块
//!
//! 为分类列维护有界的近似 Top-K 频率表。写入不做裁剪，
//! 由调用方在合适的时机显式调用 `prune` 控制内存

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::{ColumnId, ValueId};

/// 默认保留的高频值数量
pub const TOP_STRING_COUNT: usize = 20;

/// 某个作用域内各列的频率表
pub type FrequencyTable = HashMap<ColumnId, FrequencyTracker>;

/// 频率表
///
/// `cardinality` 始终等于当前保留的不同值数量。裁剪之后它不再是历史上的真实基数。
/// 持久化时只写计数，加载时重新计算 `cardinality`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredTracker")]
pub struct FrequencyTracker {
    counts: HashMap<ValueId, u64>,
    #[serde(skip)]
    cardinality: usize,
}

/// 频率表的持久化形式
#[derive(Deserialize)]
struct StoredTracker {
    #[serde(default)]
    counts: HashMap<ValueId, u64>,
}

impl From<StoredTracker> for FrequencyTracker {
    fn from(stored: StoredTracker) -> Self {
        let cardinality = stored.counts.len();
        Self {
            counts: stored.counts,
            cardinality,
        }
    }
}

/// 裁剪排序：计数升序，计数相同时ID大的排前（先被丢弃）
fn prune_order(a: &(ValueId, u64), b: &(ValueId, u64)) -> Ordering {
    a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0))
}

impl FrequencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加某个值的出现次数
    ///
    /// `increment` 为 1 时记录单次出现，大于 1 时合并预聚合的计数
    pub fn record(&mut self, value_id: ValueId, increment: u64) {
        match self.counts.entry(value_id) {
            Entry::Occupied(mut e) => {
                let count = e.get_mut();
                *count = count.saturating_add(increment);
            }
            Entry::Vacant(e) => {
                e.insert(increment);
                self.cardinality += 1;
            }
        }
    }

    /// 裁剪低频值，最多保留 `limit + 1` 项
    ///
    /// 保留项的计数不小于任何被丢弃项的计数。返回丢弃的项数
    pub fn prune(&mut self, limit: usize) -> usize {
        self.cardinality = self.counts.len();
        if self.cardinality <= limit {
            return 0;
        }

        let mut entries: Vec<(ValueId, u64)> =
            self.counts.iter().map(|(&id, &count)| (id, count)).collect();
        entries.sort_unstable_by(prune_order);

        let keep = limit.saturating_add(1);
        let discard = entries.len().saturating_sub(keep);
        for (id, _) in &entries[..discard] {
            self.counts.remove(id);
        }

        self.cardinality = self.counts.len();
        discard
    }

    /// 当前保留的不同值数量
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// 某个值的计数
    pub fn count(&self, value_id: ValueId) -> Option<u64> {
        self.counts.get(&value_id).copied()
    }

    pub fn counts(&self) -> &HashMap<ValueId, u64> {
        &self.counts
    }

    /// 保留项的计数总和
    pub fn total(&self) -> u64 {
        self.counts.values().fold(0u64, |acc, &c| acc.saturating_add(c))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// 计数最高的 `n` 项，计数相同时ID小的在前
    pub fn top(&self, n: usize) -> Vec<(ValueId, u64)> {
        let mut entries: Vec<(ValueId, u64)> =
            self.counts.iter().map(|(&id, &count)| (id, count)).collect();
        entries.sort_unstable_by(|a, b| prune_order(b, a));
        entries.truncate(n);
        entries
    }

    /// 合并另一个频率表的计数
    pub fn merge(&mut self, other: &FrequencyTracker) {
        for (&id, &count) in &other.counts {
            self.record(id, count);
        }
    }

    /// 估算等值条件选择性
    ///
    /// 未保留的值按当前最小计数估计，这是被裁剪值频率的上界
    pub fn estimate_equality_selectivity(&self, value_id: ValueId) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let count = match self.count(value_id) {
            Some(count) => count,
            None => self.counts.values().copied().min().unwrap_or(0),
        };
        count as f64 / total as f64
    }
}

/// 记录某列的一次分类值出现，首次出现时创建频率表
pub fn record_frequency(table: &mut FrequencyTable, column: ColumnId, value_id: ValueId, increment: u64) {
    table.entry(column).or_default().record(value_id, increment);
}

/// 裁剪作用域内所有频率表，返回丢弃的总项数
pub fn prune_all(table: &mut FrequencyTable, limit: usize) -> usize {
    table.values_mut().map(|tracker| tracker.prune(limit)).sum()
}
