// ==========================================
// TaskRay 示例数据导入器 - 远端存储访问层
// ==========================================
// 红线: 本层不含占位符解析与轮次策略
// ==========================================
// 职责: 提供远端记录存储接口,屏蔽 HTTP 细节
// ==========================================

pub mod error;
pub mod record_store;
pub mod request_budget;
pub mod rest_record_store;

// 重导出核心类型
pub use error::{StoreError, StoreResult};
pub use record_store::{
    ActorIdentity, QueryResult, RecordStore, SaveError, SaveResult, CHUNK_FAILED_STATUS,
};
pub use request_budget::{RequestBudget, DEFAULT_REQUEST_ALLOWANCE};
pub use rest_record_store::{
    build_create_payload, merge_chunk_outcomes, RestRecordStore, COMPOSITE_BATCH_LIMIT,
};
