//! 数值聚合模块
//!
//! 为整数列维护单遍的计数、最小值、最大值和滑动均值，每次更新 O(1)

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::ColumnId;

/// 某个作用域内各列的数值聚合
pub type NumericTable = HashMap<ColumnId, NumericAggregate>;

/// 数值聚合
///
/// `count > 0` 时，`min <= 任意已观测值 <= max`，`mean` 为所有已观测值的算术平均
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericAggregate {
    /// 观测次数
    pub count: u64,
    /// 最小值
    pub min: i64,
    /// 最大值
    pub max: i64,
    /// 均值
    pub mean: f64,
}

impl NumericAggregate {
    /// 以第一个观测值创建聚合
    pub fn new(value: i64) -> Self {
        Self {
            count: 1,
            min: value,
            max: value,
            mean: value as f64,
        }
    }

    /// 加入一个观测值
    pub fn update(&mut self, value: i64) {
        if self.count == 0 {
            *self = Self::new(value);
            return;
        }

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }

        self.count += 1;
        // 增量均值，避免求和溢出
        self.mean += (value as f64 - self.mean) / self.count as f64;
    }

    /// 合并另一个不相交观测集上的聚合
    pub fn merge(&mut self, other: &NumericAggregate) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }

        let total = self.count + other.count;
        self.mean += (other.mean - self.mean) * (other.count as f64 / total as f64);
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.count = total;
    }

    /// 闭区间 `[lo, hi]` 是否可能包含已观测值，用于区间裁剪
    pub fn range_overlaps(&self, lo: i64, hi: i64) -> bool {
        self.count > 0 && lo <= hi && self.max >= lo && self.min <= hi
    }
}

/// 更新某列的数值聚合，首次出现时创建
pub fn update_numeric(table: &mut NumericTable, column: ColumnId, value: i64) {
    match table.entry(column) {
        Entry::Occupied(mut e) => e.get_mut().update(value),
        Entry::Vacant(e) => {
            e.insert(NumericAggregate::new(value));
        }
    }
}

/// 把一个作用域的数值聚合合并进另一个
pub fn merge_numeric(target: &mut NumericTable, source: &NumericTable) {
    for (&column, agg) in source {
        target.entry(column).or_default().merge(agg);
    }
}
