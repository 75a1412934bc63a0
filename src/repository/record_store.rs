// ==========================================
// TaskRay 示例数据导入器 - 远端记录存储 Trait
// ==========================================
// 职责: 定义导入流程所需的远端访问接口（不包含实现）
// 红线: 不含占位符解析、不含重试策略
// ==========================================

use crate::domain::Record;
use crate::repository::error::StoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ==========================================
// ActorIdentity - 当前操作者身份
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorIdentity {
    pub user_id: String,
    pub organization_id: String,
}

/// 整块提交失败时为块内每条记录生成的状态码（远端不会返回该值）
pub const CHUNK_FAILED_STATUS: &str = "CHUNK_FAILED";

// ==========================================
// SaveResult - 单条创建结果（与提交顺序一致）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    #[serde(default)]
    pub id: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<SaveError>,
}

impl SaveResult {
    pub fn ok(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            success: true,
            errors: Vec::new(),
        }
    }

    pub fn failed(status_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: None,
            success: false,
            errors: vec![SaveError {
                status_code: status_code.into(),
                message: message.into(),
                fields: Vec::new(),
            }],
        }
    }

    /// 所在分块整体提交失败（记录本身未被远端校验）
    pub fn chunk_failed(message: impl Into<String>) -> Self {
        Self::failed(CHUNK_FAILED_STATUS, message)
    }

    pub fn is_chunk_failure(&self) -> bool {
        !self.success && self.errors.iter().any(|e| e.status_code == CHUNK_FAILED_STATUS)
    }

    /// 拼接全部错误消息
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.status_code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveError {
    #[serde(default)]
    pub status_code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

// ==========================================
// QueryResult - 查询结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub records: Vec<serde_json::Value>,
}

impl QueryResult {
    /// 第一行的 Id 列
    pub fn first_id(&self) -> Option<&str> {
        self.records
            .first()
            .and_then(|row| row.get("Id"))
            .and_then(|id| id.as_str())
    }
}

// ==========================================
// RecordStore Trait
// ==========================================
// 用途: 远端记录存储客户端
// 实现者: RestRecordStore（reqwest）、测试中的内存实现
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 查询当前操作者身份（用户 ID + 组织 ID）
    async fn identify_current_actor(&self) -> StoreResult<ActorIdentity>;

    /// 执行查询表达式
    async fn query(&self, expression: &str) -> StoreResult<QueryResult>;

    /// 批量创建记录
    ///
    /// # 参数
    /// - object_type: 目标对象类型名
    /// - records: 已完成占位符解析的记录
    ///
    /// # 返回
    /// - Ok(Vec<SaveResult>): 与 records 一一对应（按下标对齐）
    /// - Err: 整批提交失败（网络/认证/API 级错误）
    async fn bulk_create(
        &self,
        object_type: &str,
        records: &[Record],
    ) -> StoreResult<Vec<SaveResult>>;

    /// 提升全局请求额度（启动时调用一次）
    fn raise_request_allowance(&self, max_requests: u64);
}
