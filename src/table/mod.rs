//! 表与块
//!
//! 表级数值统计直接挂在 `Table` 上，跨所有块累计；
//! 块级数值统计和所有分类统计放在共享的 `ScopedRegistry` 中，以块名为作用域

pub mod classifier;
pub mod interner;
pub mod key_table;

pub use interner::StringInterner;
pub use key_table::KeyTable;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::core::{ColumnId, ValueId, ValueType};
use crate::stats::numeric::{self, NumericAggregate, NumericTable};
use crate::stats::{BlockInfo, FrequencyTracker, ScopedRegistry};

/// 表
#[derive(Debug)]
pub struct Table {
    name: String,
    keys: KeyTable,
    strings: StringInterner,
    /// 表级数值统计
    int_info: Mutex<NumericTable>,
    next_block: AtomicUsize,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: KeyTable::new(),
            strings: StringInterner::new(),
            int_info: Mutex::new(NumericTable::new()),
            next_block: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keys(&self) -> &KeyTable {
        &self.keys
    }

    pub fn strings(&self) -> &StringInterner {
        &self.strings
    }

    /// 更新表级数值统计
    pub fn update_int_info(&self, column: ColumnId, value: i64) {
        numeric::update_numeric(&mut self.int_info.lock(), column, value);
    }

    /// 合并一个工作线程累计的表级数值统计
    pub fn merge_int_info(&self, partial: &NumericTable) {
        numeric::merge_numeric(&mut self.int_info.lock(), partial);
    }

    /// 查询表级数值统计；列从未出现时返回 `None`
    pub fn get_int_info(&self, column: ColumnId) -> Option<NumericAggregate> {
        self.int_info.lock().get(&column).copied()
    }

    /// 表级数值统计快照，按列ID排序
    pub fn int_info(&self) -> BTreeMap<ColumnId, NumericAggregate> {
        self.int_info.lock().iter().map(|(&k, v)| (k, *v)).collect()
    }

    /// 分配 `count` 个连续的块序号，返回第一个
    pub fn allocate_blocks(&self, count: usize) -> usize {
        self.next_block.fetch_add(count, Ordering::Relaxed)
    }

    /// 归还 `allocate_blocks` 分配的块序号
    ///
    /// 只有这批序号仍是最后一次分配时才回退，否则保留空洞
    pub fn release_blocks(&self, first: usize, count: usize) -> bool {
        self.next_block
            .compare_exchange(first + count, first, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
    }

    /// 已分配的块数量
    pub fn block_count(&self) -> usize {
        self.next_block.load(Ordering::Relaxed)
    }

    /// 第 `index` 个块
    pub fn block(&self, index: usize) -> TableBlock {
        TableBlock::new(format!("{}/block{:05}", self.name, index))
    }

    /// 所有已分配的块
    pub fn blocks(&self) -> Vec<TableBlock> {
        (0..self.block_count()).map(|i| self.block(i)).collect()
    }

    /// 声明类型为 `value_type` 的列名，按字典序
    pub fn columns_of_type(&self, value_type: ValueType) -> Vec<String> {
        classifier::columns_of_type(&self.keys.key_ids(), &self.keys.key_types(), value_type)
    }

    /// 列信息报告
    pub fn column_info(&self) -> String {
        classifier::render_column_info(&self.keys.key_ids(), &self.keys.key_types())
    }
}

/// 表块
///
/// 块只是一个统计作用域名，统计数据存放在注册表中
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableBlock {
    name: String,
}

impl TableBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn update_int_info(&self, registry: &ScopedRegistry, column: ColumnId, value: i64) {
        registry.update_numeric(&self.name, column, value);
    }

    pub fn update_str_info(&self, registry: &ScopedRegistry, column: ColumnId, value_id: ValueId, increment: u64) {
        registry.record_frequency(&self.name, column, value_id, increment);
    }

    pub fn get_int_info(&self, registry: &ScopedRegistry, column: ColumnId) -> Option<NumericAggregate> {
        registry.lookup_numeric(&self.name, column)
    }

    pub fn get_str_info(&self, registry: &ScopedRegistry, column: ColumnId) -> Option<FrequencyTracker> {
        registry.lookup_frequency(&self.name, column)
    }

    /// 裁剪块内所有频率表
    pub fn prune(&self, registry: &ScopedRegistry, limit: usize) -> usize {
        registry.prune_scope(&self.name, limit)
    }

    /// 块元数据快照
    pub fn info(&self, registry: &ScopedRegistry) -> Option<BlockInfo> {
        registry.snapshot(&self.name)
    }
}
