// ==========================================
// 静态数据源 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use std::collections::HashMap;
use taskray_seed::config::DatasetSpec;
use taskray_seed::domain::RawRow;
use taskray_seed::importer::{CsvParser, DatasetSource, ImportError, ImportResult};

#[derive(Default)]
pub struct StaticDatasetSource {
    rows: HashMap<String, Vec<RawRow>>,
    failing: Vec<String>,
}

impl StaticDatasetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 CSV 文本登记某对象的数据
    pub fn with_csv(mut self, object_name: &str, csv_text: &str) -> Self {
        let rows = CsvParser.parse_str(csv_text).expect("测试 CSV 解析失败");
        self.rows.insert(object_name.to_string(), rows);
        self
    }

    /// 该对象拉取失败
    pub fn failing(mut self, object_name: &str) -> Self {
        self.failing.push(object_name.to_string());
        self
    }
}

#[async_trait]
impl DatasetSource for StaticDatasetSource {
    async fn fetch(&self, dataset: &DatasetSpec) -> ImportResult<Vec<RawRow>> {
        if self.failing.contains(&dataset.object_name) {
            return Err(ImportError::FetchError {
                object_name: dataset.object_name.clone(),
                message: "HTTP 503 Service Unavailable".to_string(),
            });
        }
        Ok(self
            .rows
            .get(&dataset.object_name)
            .cloned()
            .unwrap_or_default())
    }
}

/// 由对象名列表构造数据集声明（地址仅占位）
pub fn datasets(object_names: &[&str]) -> Vec<DatasetSpec> {
    object_names
        .iter()
        .map(|name| DatasetSpec::new(*name, format!("https://cdn.example.com/{}.csv", name)))
        .collect()
}
