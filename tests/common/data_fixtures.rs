//! 测试数据生成模块
//!
//! 提供访问日志风格的 JSON 行数据

use colstats::ingest::Record;
use serde_json::{json, Value};

pub const HOSTS: [&str; 4] = ["web-1", "web-2", "web-3", "db-1"];
pub const METHODS: [&str; 3] = ["GET", "POST", "DELETE"];

/// 第 `i` 行访问日志
pub fn access_log_row(i: usize) -> Value {
    json!({
        "host": HOSTS[i % HOSTS.len()],
        // GET 最多，DELETE 最少
        "method": METHODS[if i % 10 < 6 { 0 } else if i % 10 < 9 { 1 } else { 2 }],
        "status": if i % 7 == 0 { 500 } else { 200 },
        "latency": (i % 100) as i64,
        "tags": ["api", if i % 2 == 0 { "even" } else { "odd" }],
    })
}

/// `n` 行访问日志记录
pub fn access_log_records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| match access_log_row(i) {
            Value::Object(map) => map,
            _ => unreachable!(),
        })
        .collect()
}

/// `n` 行访问日志的 JSON 行文本
pub fn access_log_json_lines(n: usize) -> String {
    let mut out = String::new();
    for i in 0..n {
        out.push_str(&access_log_row(i).to_string());
        out.push('\n');
    }
    out
}
