//! 自定义断言辅助模块
//!
//! 提供测试中的常用断言函数

use colstats::stats::NumericAggregate;

/// 断言结果成功，返回内部值
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
    result.expect("操作应该成功")
}

/// 断言结果失败并匹配错误消息
pub fn assert_err_with<T: std::fmt::Debug, E: std::fmt::Display>(result: Result<T, E>, expected_msg: &str) {
    let err = result.expect_err("操作应该失败");
    let err_str = err.to_string();
    assert!(
        err_str.contains(expected_msg),
        "错误消息应包含 '{}', 实际是 '{}'",
        expected_msg,
        err_str
    );
}

/// 断言 Option 是 Some 并返回内部值
pub fn assert_some<T>(opt: Option<T>) -> T {
    opt.expect("值应该是 Some")
}

/// 断言浮点数在容差内相等
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "浮点数不相等: 期望 {}, 实际 {}",
        expected,
        actual
    );
}

/// 断言数值聚合与给定值序列一致
pub fn assert_aggregate_of(agg: &NumericAggregate, values: &[i64]) {
    assert_eq!(agg.count, values.len() as u64, "观测次数不匹配");
    assert_eq!(Some(agg.min), values.iter().copied().min(), "最小值不匹配");
    assert_eq!(Some(agg.max), values.iter().copied().max(), "最大值不匹配");
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64;
    assert_close(agg.mean, mean);
}
