// ==========================================
// TaskRay 示例数据导入器 - 领域模型层
// ==========================================
// 职责: 定义记录、字段值、结果模型与领域常量
// 红线: 不含远端访问逻辑，不含解析/插入流程
// ==========================================

pub mod record;
pub mod summary;
pub mod types;

// 重导出核心类型
pub use record::{
    FieldValue, Placeholder, PlaceholderKind, RawRow, Record, RecordSet, RelativeDate,
};
pub use summary::{ImportSummary, RecordSetReport, RunOutcome};
