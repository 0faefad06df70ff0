//! 块元数据快照
//!
//! 把一个作用域的统计信息转换为纯数据结构，作为块的 info 侧文件持久化。
//! 加载时原样重建内存中的统计表，没有隐藏状态

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::frequency::{FrequencyTable, FrequencyTracker};
use super::numeric::{NumericAggregate, NumericTable};
use crate::core::{ColumnId, StatsError, StatsResult};

/// 块统计信息快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// 作用域名称（块名或表名）
    pub name: String,
    /// 整数列聚合
    pub numeric: BTreeMap<ColumnId, NumericAggregate>,
    /// 分类列频率表
    pub categorical: BTreeMap<ColumnId, FrequencyTracker>,
}

impl BlockInfo {
    /// 侧文件名
    pub const FILE_NAME: &'static str = "info.json";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 从作用域的统计表构建快照
    pub fn from_tables(name: impl Into<String>, numeric: &NumericTable, categorical: &FrequencyTable) -> Self {
        Self {
            name: name.into(),
            numeric: numeric.iter().map(|(&k, v)| (k, *v)).collect(),
            categorical: categorical.iter().map(|(&k, v)| (k, v.clone())).collect(),
        }
    }

    /// 还原为可更新的统计表
    pub fn into_tables(self) -> (NumericTable, FrequencyTable) {
        (
            self.numeric.into_iter().collect(),
            self.categorical.into_iter().collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.numeric.is_empty() && self.categorical.is_empty()
    }

    /// 快照在 `dir` 下的文件路径：`<dir>/<name>/info.json`
    ///
    /// 名称只能由普通路径段组成，保证文件落在 `dir` 之内
    pub fn path_in(&self, dir: &Path) -> StatsResult<PathBuf> {
        let name = Path::new(&self.name);
        let mut components = name.components().peekable();
        let valid = components.peek().is_some()
            && components.all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(StatsError::InvalidScopeName(self.name.clone()));
        }
        Ok(dir.join(name).join(Self::FILE_NAME))
    }

    /// 写入 `<dir>/<name>/info.json`，返回文件路径
    pub fn save(&self, dir: &Path) -> StatsResult<PathBuf> {
        let path = self.path_in(dir)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(self)?;
        fs::write(&path, content)?;
        log::debug!("块元数据已写入: {}", path.display());
        Ok(path)
    }

    /// 从 info 文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> StatsResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let info: BlockInfo = serde_json::from_str(&content)?;
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::frequency::record_frequency;
    use crate::stats::numeric::update_numeric;
    use tempfile::TempDir;

    fn sample_info() -> BlockInfo {
        let mut numeric = NumericTable::new();
        for v in [3, 1, 4, 1, 5] {
            update_numeric(&mut numeric, 0, v);
        }
        let mut categorical = FrequencyTable::new();
        for id in [7, 7, 7, 9, 9, 2] {
            record_frequency(&mut categorical, 1, id, 1);
        }
        BlockInfo::from_tables("events/block00000", &numeric, &categorical)
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let info = sample_info();

        let path = info.save(dir.path()).expect("Failed to save block info");
        assert!(path.ends_with("events/block00000/info.json"));

        let loaded = BlockInfo::load(&path).expect("Failed to load block info");
        assert_eq!(loaded, info);
    }

    #[test]
    fn test_into_tables() {
        let (numeric, categorical) = sample_info().into_tables();
        assert_eq!(numeric[&0].count, 5);
        assert_eq!(categorical[&1].count(7), Some(3));
        assert_eq!(categorical[&1].cardinality(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let result = BlockInfo::load(dir.path().join("nope").join(BlockInfo::FILE_NAME));
        assert!(result.is_err());
    }

    #[test]
    fn test_path_stays_inside_dir() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = BlockInfo::new("events/block00000").path_in(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("events/block00000/info.json"));

        for name in ["../x/block00000", "events/../../x", "/tmp/x", "./x", ""] {
            let err = BlockInfo::new(name).save(dir.path()).unwrap_err();
            assert!(matches!(err, StatsError::InvalidScopeName(_)), "{} 应该被拒绝", name);
        }
    }

    #[test]
    fn test_load_recomputes_cardinality() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(BlockInfo::FILE_NAME);
        let content = r#"{"name":"b","numeric":{},"categorical":{"1":{"counts":{"7":3,"9":2},"cardinality":40}}}"#;
        fs::write(&path, content).unwrap();

        let info = BlockInfo::load(&path).unwrap();
        let tracker = &info.categorical[&1];
        assert_eq!(tracker.cardinality(), 2);
        assert_eq!(tracker.cardinality(), tracker.counts().len());
    }

    #[test]
    fn test_empty() {
        assert!(BlockInfo::new("b").is_empty());
        assert!(!sample_info().is_empty());
    }
}
