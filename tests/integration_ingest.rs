//! 导入流程集成测试
//!
//! 测试范围:
//! - ingest::read_json_lines - JSON 行解析
//! - ingest::Ingestor - 分块、并行统计、表级合并、块内裁剪
//! - stats::snapshot - 块元数据写出与重新加载

mod common;

use colstats::config::StatsConfig;
use colstats::core::ValueType;
use colstats::ingest::{read_json_lines, Ingestor};
use colstats::stats::{BlockInfo, ScopedRegistry};
use colstats::table::Table;
use common::assertions::{assert_aggregate_of, assert_err_with, assert_ok, assert_some};
use common::data_fixtures::{access_log_json_lines, access_log_records, HOSTS};
use tempfile::TempDir;

fn stats_config(rows_per_block: usize, top_string_count: usize) -> StatsConfig {
    StatsConfig {
        rows_per_block,
        top_string_count,
        ..Default::default()
    }
}

#[test]
fn test_ingest_json_lines_end_to_end() {
    let rows = assert_ok(read_json_lines(access_log_json_lines(1000).as_bytes()));
    assert_eq!(rows.len(), 1000);

    let registry = ScopedRegistry::new();
    let table = Table::new("access");
    let ingestor = Ingestor::new(&registry, stats_config(128, 20));
    let report = assert_ok(ingestor.ingest(&table, &rows));

    assert_eq!(report.rows, 1000);
    assert_eq!(report.blocks.len(), 8);
    assert_eq!(report.skipped_fields, 0);

    assert_eq!(table.columns_of_type(ValueType::Str), vec!["host", "method"]);
    assert_eq!(table.columns_of_type(ValueType::Int), vec!["latency", "status"]);
    assert_eq!(table.columns_of_type(ValueType::Set), vec!["tags"]);

    // 表级统计覆盖所有块
    let latency = assert_some(table.keys().get_id("latency"));
    let expected: Vec<i64> = (0..1000).map(|i| (i % 100) as i64).collect();
    assert_aggregate_of(&assert_some(table.get_int_info(latency)), &expected);

    // 块级统计只覆盖本块
    let last_block = assert_some(report.blocks.last());
    let block_expected: Vec<i64> = (896..1000).map(|i| (i % 100) as i64).collect();
    assert_aggregate_of(
        &assert_some(registry.lookup_numeric(last_block, latency)),
        &block_expected,
    );
}

#[test]
fn test_ingest_block_frequencies() {
    let rows = access_log_records(100);
    let registry = ScopedRegistry::new();
    let table = Table::new("access");
    let report = assert_ok(Ingestor::new(&registry, stats_config(100, 20)).ingest(&table, &rows));
    let block = &report.blocks[0];

    let host = assert_some(table.keys().get_id("host"));
    let tracker = assert_some(registry.lookup_frequency(block, host));
    assert_eq!(tracker.cardinality(), HOSTS.len());
    assert_eq!(tracker.total(), 100);

    let method = assert_some(table.keys().get_id("method"));
    let tracker = assert_some(registry.lookup_frequency(block, method));
    let top = tracker.top(1);
    assert_eq!(table.strings().resolve(top[0].0).as_deref(), Some("GET"));
    assert_eq!(top[0].1, 60);

    let tags = assert_some(table.keys().get_id("tags"));
    let tracker = assert_some(registry.lookup_frequency(block, tags));
    assert_eq!(tracker.count(assert_some(table.strings().get("api"))), Some(100));
    assert_eq!(tracker.count(assert_some(table.strings().get("even"))), Some(50));
}

#[test]
fn test_ingest_prunes_to_top_values() {
    let rows = access_log_records(200);
    let registry = ScopedRegistry::new();
    let table = Table::new("access");
    let report = assert_ok(Ingestor::new(&registry, stats_config(200, 1)).ingest(&table, &rows));
    assert!(report.pruned_entries > 0);

    let method = assert_some(table.keys().get_id("method"));
    let tracker = assert_some(registry.lookup_frequency(&report.blocks[0], method));
    assert_eq!(tracker.cardinality(), 2);
    assert!(tracker.count(assert_some(table.strings().get("GET"))).is_some());
    assert!(tracker.count(assert_some(table.strings().get("POST"))).is_some());
    assert!(tracker.count(assert_some(table.strings().get("DELETE"))).is_none());
}

#[test]
fn test_persist_and_reload_block_info() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let rows = access_log_records(300);
    let registry = ScopedRegistry::new();
    let table = Table::new("access");
    let ingestor = Ingestor::new(&registry, stats_config(100, 20));
    let report = assert_ok(ingestor.ingest(&table, &rows));

    let paths = assert_ok(ingestor.persist(&report.blocks, dir.path()));
    assert_eq!(paths.len(), 3);

    let restored = ScopedRegistry::new();
    for (name, path) in report.blocks.iter().zip(&paths) {
        let info = assert_ok(BlockInfo::load(path));
        assert_eq!(&info.name, name);
        assert_eq!(Some(&info), registry.snapshot(name).as_ref());
        restored.restore(info);
    }

    let status = assert_some(table.keys().get_id("status"));
    for name in &report.blocks {
        assert_eq!(restored.lookup_numeric(name, status), registry.lookup_numeric(name, status));
    }
}

#[test]
fn test_read_json_lines_reports_line() {
    let input = "{\"a\": 1}\n{\"a\": 2}\nnot json\n";
    assert_err_with(read_json_lines(input.as_bytes()), "第3行");
}
