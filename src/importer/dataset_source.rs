// ==========================================
// TaskRay 示例数据导入器 - 数据源实现
// ==========================================
// 支持: 远端 CSV（HTTP）/ 本地目录 CSV
// ==========================================

use crate::config::DatasetSpec;
use crate::domain::RawRow;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::CsvParser;
use crate::importer::seed_importer_trait::DatasetSource;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::path::PathBuf;
use tracing::debug;

// ==========================================
// HttpCsvSource - 远端 CSV 下载
// ==========================================
pub struct HttpCsvSource {
    http: Client,
    cache_bust: bool,
}

impl HttpCsvSource {
    pub fn new(cache_bust: bool) -> ImportResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| ImportError::Other(anyhow::Error::new(e)))?;
        Ok(Self { http, cache_bust })
    }

    /// 下载地址（可选追加 `s=<毫秒时间戳>` 绕过缓存）
    pub fn request_url(&self, dataset: &DatasetSpec) -> String {
        if !self.cache_bust {
            return dataset.url.clone();
        }
        cache_busted_url(&dataset.url, Utc::now().timestamp_millis())
    }
}

pub fn cache_busted_url(url: &str, stamp_millis: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}s={}", url, separator, stamp_millis)
}

#[async_trait]
impl DatasetSource for HttpCsvSource {
    async fn fetch(&self, dataset: &DatasetSpec) -> ImportResult<Vec<RawRow>> {
        let url = self.request_url(dataset);
        debug!(object_name = %dataset.object_name, url = %url, "下载数据集");

        let fetch_error = |message: String| ImportError::FetchError {
            object_name: dataset.object_name.clone(),
            message,
        };

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        CsvParser.parse_str(&text)
    }
}

// ==========================================
// LocalCsvSource - 本地目录读取
// ==========================================
// 文件名取自数据集地址的最后一段（如 Projects.csv）
pub struct LocalCsvSource {
    data_dir: PathBuf,
}

impl LocalCsvSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, dataset: &DatasetSpec) -> PathBuf {
        self.data_dir.join(dataset.file_name())
    }
}

#[async_trait]
impl DatasetSource for LocalCsvSource {
    async fn fetch(&self, dataset: &DatasetSpec) -> ImportResult<Vec<RawRow>> {
        let path = self.path_for(dataset);
        debug!(object_name = %dataset.object_name, path = %path.display(), "读取本地数据集");

        tokio::task::spawn_blocking(move || CsvParser.parse_file(&path))
            .await
            .map_err(|e| ImportError::Other(anyhow::Error::new(e)))?
    }
}
