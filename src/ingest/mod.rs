//! 数据导入
//!
//! 把 JSON 行记录切分为块，逐值更新块级与表级统计。
//!
//! 块之间并行处理：每个工作线程独占一个块作用域，表级数值统计先在线程内累计，
//! 所有线程结束后再合并进表，保证每个作用域只有一个写者

use std::io::BufRead;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde_json::{Map, Number, Value};

use crate::config::StatsConfig;
use crate::core::{StatsError, StatsResult, ValueType};
use crate::stats::frequency;
use crate::stats::numeric::{self, NumericTable};
use crate::stats::{BlockInfo, ScopedRegistry};
use crate::table::{Table, TableBlock};

/// 一行记录
pub type Record = Map<String, Value>;

/// 导入结果汇总
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    /// 导入的行数
    pub rows: usize,
    /// 本次写入的块
    pub blocks: Vec<String>,
    /// 因类型不支持或冲突而跳过的字段数
    pub skipped_fields: usize,
    /// 裁剪丢弃的低频值数量
    pub pruned_entries: usize,
}

/// 单个块的处理结果
struct BlockOutcome {
    name: String,
    rows: usize,
    int_info: NumericTable,
    skipped_fields: usize,
    pruned_entries: usize,
}

/// 读取 JSON 行输入，空行跳过
pub fn read_json_lines<R: BufRead>(reader: R) -> StatsResult<Vec<Record>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(record)) => records.push(record),
            Ok(_) => return Err(StatsError::parse(index + 1, "记录必须是JSON对象")),
            Err(e) => return Err(StatsError::parse(index + 1, e.to_string())),
        }
    }
    Ok(records)
}

/// JSON 数字转整数：浮点数截断，超出范围时饱和
fn number_to_int(n: &Number) -> i64 {
    if let Some(v) = n.as_i64() {
        v
    } else if n.as_u64().is_some() {
        i64::MAX
    } else {
        n.as_f64().map_or(0, |f| f as i64)
    }
}

/// 导入器
pub struct Ingestor<'a> {
    registry: &'a ScopedRegistry,
    config: StatsConfig,
}

impl<'a> Ingestor<'a> {
    pub fn new(registry: &'a ScopedRegistry, config: StatsConfig) -> Self {
        Self { registry, config }
    }

    /// 导入一批记录，追加为表的新块
    pub fn ingest(&self, table: &Table, rows: &[Record]) -> StatsResult<IngestReport> {
        let rows_per_block = self.config.rows_per_block.max(1);
        let block_count = rows.len().div_ceil(rows_per_block);
        let first_block = table.allocate_blocks(block_count);

        log::info!(
            "开始导入表 {}: {} 行，{} 个块，每块 {} 行",
            table.name(),
            rows.len(),
            block_count,
            rows_per_block
        );

        let outcomes: StatsResult<Vec<BlockOutcome>> = rows
            .par_chunks(rows_per_block)
            .enumerate()
            .map(|(i, chunk)| self.ingest_block(table, &table.block(first_block + i), chunk))
            .collect();

        // 任一块失败时整批作废：表级统计不合并，已写入的块作用域移除
        let outcomes = match outcomes {
            Ok(outcomes) => outcomes,
            Err(e) => {
                for i in first_block..first_block + block_count {
                    self.registry.take_scope(table.block(i).name());
                }
                table.release_blocks(first_block, block_count);
                log::warn!("表 {} 导入失败，已回滚 {} 个块: {}", table.name(), block_count, e);
                return Err(e);
            }
        };

        let mut report = IngestReport::default();
        for outcome in outcomes {
            table.merge_int_info(&outcome.int_info);
            report.rows += outcome.rows;
            report.skipped_fields += outcome.skipped_fields;
            report.pruned_entries += outcome.pruned_entries;
            report.blocks.push(outcome.name);
        }

        log::info!(
            "表 {} 导入完成: {} 行，跳过 {} 个字段，裁剪 {} 个低频值",
            table.name(),
            report.rows,
            report.skipped_fields,
            report.pruned_entries
        );
        Ok(report)
    }

    /// 处理一个块，持有该块作用域的锁直到结束
    fn ingest_block(&self, table: &Table, block: &TableBlock, rows: &[Record]) -> StatsResult<BlockOutcome> {
        let numeric_handle = self.registry.get_or_create_numeric(block.name());
        let frequency_handle = self.registry.get_or_create_frequency(block.name());
        let mut block_ints = numeric_handle.lock();
        let mut block_strs = frequency_handle.lock();

        let mut table_ints = NumericTable::new();
        let mut skipped_fields = 0;

        for row in rows {
            for (name, value) in row {
                let value_type = match value {
                    Value::Number(_) => ValueType::Int,
                    Value::String(_) => ValueType::Str,
                    Value::Array(_) => ValueType::Set,
                    _ => {
                        log::debug!("跳过不支持的字段: {} = {}", name, value);
                        skipped_fields += 1;
                        continue;
                    }
                };

                let column = match table.keys().get_or_assign(name, value_type) {
                    Ok(column) => column,
                    Err(StatsError::TypeMismatch { declared, found, .. }) => {
                        log::warn!("块 {} 中列 {} 类型冲突: {} / {}，已跳过", block.name(), name, declared, found);
                        skipped_fields += 1;
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                match value {
                    Value::Number(n) => {
                        let v = number_to_int(n);
                        numeric::update_numeric(&mut block_ints, column, v);
                        numeric::update_numeric(&mut table_ints, column, v);
                    }
                    Value::String(s) => {
                        let id = table.strings().intern(s)?;
                        frequency::record_frequency(&mut block_strs, column, id, 1);
                    }
                    Value::Array(items) => {
                        for item in items {
                            match item {
                                Value::String(s) => {
                                    let id = table.strings().intern(s)?;
                                    frequency::record_frequency(&mut block_strs, column, id, 1);
                                }
                                _ => skipped_fields += 1,
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        let pruned_entries = frequency::prune_all(&mut block_strs, self.config.top_string_count);
        log::debug!("块 {} 处理完成: {} 行，裁剪 {} 个低频值", block.name(), rows.len(), pruned_entries);

        Ok(BlockOutcome {
            name: block.name().to_string(),
            rows: rows.len(),
            int_info: table_ints,
            skipped_fields,
            pruned_entries,
        })
    }

    /// 把块的统计信息写为 info 侧文件，返回写入的路径
    pub fn persist(&self, blocks: &[String], dir: &Path) -> StatsResult<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(blocks.len());
        for name in blocks {
            let info = self.registry.snapshot(name).unwrap_or_else(|| BlockInfo::new(name.as_str()));
            paths.push(info.save(dir)?);
        }
        log::info!("已写入 {} 个块的元数据到 {}", paths.len(), dir.display());
        Ok(paths)
    }
}
