// ==========================================
// TaskRay 示例数据导入器 - 运行配置
// ==========================================
// 职责: 数据集顺序、轮次上限、请求额度、远端连接参数
// 来源: 默认值 → 配置文件（JSON，可选） → 环境变量覆写
// ==========================================

use crate::domain::types::object_names;
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 单个记录集的默认轮次上限
pub const DEFAULT_MAX_PASSES: usize = 10;

/// 启动时提升的全局请求额度
pub const DEFAULT_MAX_REQUESTS: u64 = 5000;

pub const DEFAULT_API_VERSION: &str = "58.0";

pub const DEFAULT_UNASSIGNED_QUEUE: &str = "trUnassigned";

const SAMPLE_DATA_BASE_URL: &str = "https://s3.amazonaws.com/blstatic/sdo_data";

// ==========================================
// 配置键（环境变量名）
// ==========================================
pub mod config_keys {
    pub const CONFIG_FILE: &str = "SEED_CONFIG_FILE";
    pub const MAX_PASSES: &str = "SEED_MAX_PASSES";
    pub const MAX_REQUESTS: &str = "SEED_MAX_REQUESTS";
    pub const DATA_DIR: &str = "SEED_DATA_DIR";
    pub const CACHE_BUST: &str = "SEED_CACHE_BUST";
    pub const RETRY_FAILED_BATCHES: &str = "SEED_RETRY_FAILED_BATCHES";
    pub const STOP_ON_NO_PROGRESS: &str = "SEED_STOP_ON_NO_PROGRESS";
    pub const UNASSIGNED_QUEUE: &str = "SEED_UNASSIGNED_QUEUE";

    pub const INSTANCE_URL: &str = "SF_INSTANCE_URL";
    pub const ACCESS_TOKEN: &str = "SF_ACCESS_TOKEN";
    pub const API_VERSION: &str = "SF_API_VERSION";
}

// ==========================================
// DatasetSpec - 单个数据集声明
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// 目标对象类型名
    pub object_name: String,
    /// 数据文件地址（CSV）
    pub url: String,
}

impl DatasetSpec {
    pub fn new(object_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            url: url.into(),
        }
    }

    /// 地址中的文件名（去掉查询串），本地目录模式下用于定位文件
    pub fn file_name(&self) -> &str {
        let without_query = self.url.split('?').next().unwrap_or(&self.url);
        without_query
            .rsplit('/')
            .next()
            .unwrap_or(without_query)
    }
}

/// 默认数据集列表
///
/// 顺序是人工维护的拓扑近似（项目 → 任务组 → 任务 → 检查组 → 检查项 → 工时 → 依赖），
/// 不是计算得出的排序：完整的引用图在导入前不可知。
pub fn default_datasets() -> Vec<DatasetSpec> {
    [
        (object_names::PROJECT, "Projects.csv"),
        (object_names::TASK_GROUP, "TaskGroups.csv"),
        (object_names::PROJECT_TASK, "Tasks.csv"),
        (object_names::CHECKLIST_GROUP, "ChecklistGroups.csv"),
        (object_names::CHECKLIST_ITEM, "ChecklistItems.csv"),
        (object_names::TASK_TIME, "TimeEntries.csv"),
        (object_names::DEPENDENCY, "Dependencies.csv"),
    ]
    .into_iter()
    .map(|(object_name, file)| {
        DatasetSpec::new(object_name, format!("{}/{}", SAMPLE_DATA_BASE_URL, file))
    })
    .collect()
}

// ==========================================
// SeedConfig - 导入运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// 按声明顺序处理的数据集
    pub datasets: Vec<DatasetSpec>,
    /// 单个记录集的轮次上限
    pub max_passes: usize,
    /// 启动时提升的请求额度
    pub max_requests: u64,
    /// 下载地址追加时间戳查询串，绕过 CDN 缓存
    pub cache_bust: bool,
    /// 整批提交失败时，本轮就绪记录是否回到延后集合重试
    pub retry_failed_batches: bool,
    /// 连续两轮无插入成功时提前结束
    pub stop_on_no_progress: bool,
    /// 未分配队列的 DeveloperName
    pub unassigned_queue_name: String,
    /// 设置后从本地目录读取 CSV，而非 HTTP 下载
    pub data_dir: Option<PathBuf>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            datasets: default_datasets(),
            max_passes: DEFAULT_MAX_PASSES,
            max_requests: DEFAULT_MAX_REQUESTS,
            cache_bust: true,
            retry_failed_batches: false,
            stop_on_no_progress: false,
            unassigned_queue_name: DEFAULT_UNASSIGNED_QUEUE.to_string(),
            data_dir: None,
        }
    }
}

impl SeedConfig {
    /// 从环境变量加载配置
    ///
    /// # 逻辑
    /// 1. 若设置了 SEED_CONFIG_FILE，读取 JSON 文件作为基础
    /// 2. 否则使用默认值
    /// 3. 逐项应用环境变量覆写
    pub fn from_env() -> ImportResult<Self> {
        let mut config = match std::env::var(config_keys::CONFIG_FILE) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Some(v) = read_parsed::<usize>(config_keys::MAX_PASSES)? {
            config.max_passes = v;
        }
        if let Some(v) = read_parsed::<u64>(config_keys::MAX_REQUESTS)? {
            config.max_requests = v;
        }
        if let Some(v) = read_bool(config_keys::CACHE_BUST)? {
            config.cache_bust = v;
        }
        if let Some(v) = read_bool(config_keys::RETRY_FAILED_BATCHES)? {
            config.retry_failed_batches = v;
        }
        if let Some(v) = read_bool(config_keys::STOP_ON_NO_PROGRESS)? {
            config.stop_on_no_progress = v;
        }
        if let Ok(v) = std::env::var(config_keys::UNASSIGNED_QUEUE) {
            config.unassigned_queue_name = v;
        }
        if let Ok(v) = std::env::var(config_keys::DATA_DIR) {
            config.data_dir = Some(PathBuf::from(v));
        }

        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载（缺省字段取默认值）
    pub fn from_file<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            key: config_keys::CONFIG_FILE.to_string(),
            message: format!("{}: {}", path.display(), e),
        })?;
        let config: SeedConfig =
            serde_json::from_str(&raw).map_err(|e| ImportError::ConfigValueError {
                key: config_keys::CONFIG_FILE.to_string(),
                value: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 配置合法性校验
    pub fn validate(&self) -> ImportResult<()> {
        if self.max_passes == 0 {
            return Err(ImportError::ConfigValueError {
                key: config_keys::MAX_PASSES.to_string(),
                value: "0".to_string(),
                message: "轮次上限必须大于 0".to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// StoreConfig - 远端记录存储连接参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub instance_url: String,
    pub access_token: String,
    pub api_version: String,
}

impl StoreConfig {
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            instance_url: instance_url.into(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// 从环境变量加载（实例地址与令牌必填）
    pub fn from_env() -> ImportResult<Self> {
        let instance_url = read_required(config_keys::INSTANCE_URL)?;
        let access_token = read_required(config_keys::ACCESS_TOKEN)?;
        let api_version = std::env::var(config_keys::API_VERSION)
            .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string());

        Ok(Self {
            instance_url,
            access_token,
            api_version,
        })
    }
}

fn read_required(key: &str) -> ImportResult<String> {
    std::env::var(key).map_err(|e| ImportError::ConfigReadError {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn read_parsed<T>(key: &str) -> ImportResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw.clone(),
                message: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn read_bool(key: &str) -> ImportResult<Option<bool>> {
    match std::env::var(key) {
        Ok(raw) => parse_bool_flag(&raw)
            .map(Some)
            .ok_or_else(|| ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw.clone(),
                message: "期望 true/false/1/0".to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn parse_bool_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
