use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::StatsResult;
use crate::stats::TOP_STRING_COUNT;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub stats: StatsConfig,
    pub log: LogConfig,
}

/// 统计相关配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct StatsConfig {
    /// 每个块裁剪后保留的高频值数量
    pub top_string_count: usize,
    /// 每个块的行数
    pub rows_per_block: usize,
    /// 块元数据输出目录
    pub info_dir: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_string_count: TOP_STRING_COUNT,
            rows_per_block: 65536,
            info_dir: "data/blocks".to_string(),
        }
    }
}

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "colstats".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> StatsResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 配置文件存在时加载，否则使用默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> StatsResult<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> StatsResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
