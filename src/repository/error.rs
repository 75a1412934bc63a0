// ==========================================
// TaskRay 示例数据导入器 - 远端存储错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 不区分瞬时错误与永久错误，调用方一律按"整批失败"处理
// ==========================================

use thiserror::Error;

/// 远端记录存储错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    // ===== 连接/传输错误 =====
    #[error("HTTP 请求失败: {0}")]
    Http(String),

    #[error("远端 API 返回错误 (status={status}): {body}")]
    Api { status: u16, body: String },

    #[error("响应解析失败: {0}")]
    Decode(String),

    // ===== 额度错误 =====
    #[error("请求额度已用尽: limit={limit}")]
    RequestBudgetExceeded { limit: u64 },

    // ===== 业务错误 =====
    #[error("响应条数与提交条数不一致: submitted={submitted}, returned={returned}")]
    ResultCountMismatch { submitted: usize, returned: usize },
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;
