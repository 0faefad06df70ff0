//! 性能分析门面
//!
//! 导入过程由 `start()` / `stop()` 包围。只有启用 `profile` 特性编译时才真正计时，
//! 否则是空实现

use std::time::{Duration, Instant};

/// 是否以 `profile` 特性编译
pub const PROFILER_ENABLED: bool = cfg!(feature = "profile");

pub trait Profiler: Send {
    fn start(&mut self);
    fn stop(&mut self);
}

/// 空实现
#[derive(Debug, Default)]
pub struct NoopProfiler;

impl Profiler for NoopProfiler {
    fn start(&mut self) {}
    fn stop(&mut self) {}
}

/// 记录 start 到 stop 之间的耗时
#[derive(Debug, Default)]
pub struct TimingProfiler {
    started: Option<Instant>,
    elapsed: Option<Duration>,
}

impl TimingProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最近一次 start..stop 的耗时
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}

impl Profiler for TimingProfiler {
    fn start(&mut self) {
        log::info!("性能分析器已启动");
        self.started = Some(Instant::now());
        self.elapsed = None;
    }

    fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            let elapsed = started.elapsed();
            log::info!("性能分析器已停止，耗时 {:?}", elapsed);
            self.elapsed = Some(elapsed);
        }
    }
}

/// 按编译配置选择性能分析器
pub fn profiler() -> Box<dyn Profiler> {
    if PROFILER_ENABLED {
        Box::new(TimingProfiler::new())
    } else {
        Box::new(NoopProfiler)
    }
}
