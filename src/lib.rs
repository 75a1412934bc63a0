// ==========================================
// TaskRay 示例数据导入器 - 核心库
// ==========================================
// 技术栈: Rust + tokio + reqwest
// 系统定位: 带占位符的示例数据按依赖多轮插入远端记录存储
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录、字段值、结果模型
pub mod domain;

// 远端存储访问层
pub mod repository;

// 导入层 - 解析与多轮插入
pub mod importer;

// 配置层
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{DatasetSpec, SeedConfig, StoreConfig};

pub use domain::{
    FieldValue, ImportSummary, PlaceholderKind, Record, RecordSet, RecordSetReport, RunOutcome,
};

pub use importer::{
    BatchInserter, DatasetOrchestrator, DatasetSource, HttpCsvSource, IdentifierRegistry,
    ImportContext, ImportError, ImportResult, LocalCsvSource, PassPolicy, PlaceholderResolver,
};

pub use repository::{ActorIdentity, RecordStore, RestRecordStore, SaveResult, StoreError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "TaskRay 示例数据导入器";
