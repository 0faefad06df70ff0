// 工具模块 - 仅用于导出各个子模块，不包含具体实现

// 日志模块
pub mod logging;

// 性能分析模块
pub mod profiler;
pub use profiler::{profiler, Profiler, PROFILER_ENABLED};
