// ==========================================
// TaskRay 示例数据导入器 - 导入层
// ==========================================
// 职责: 数据集拉取 → 占位符解析 → 多轮批量插入 → ID 登记
// 支持: 远端 CSV、本地目录 CSV
// ==========================================

// 模块声明
pub mod batch_inserter;
pub mod dataset_source;
pub mod date_math;
pub mod error;
pub mod file_parser;
pub mod identifier_registry;
pub mod import_context;
pub mod orchestrator;
pub mod placeholder_resolver;
pub mod seed_importer_trait;

// 重导出核心类型
pub use batch_inserter::{BatchInserter, PassPolicy};
pub use dataset_source::{HttpCsvSource, LocalCsvSource};
pub use error::{ImportError, ImportResult};
pub use file_parser::CsvParser;
pub use identifier_registry::IdentifierRegistry;
pub use import_context::ImportContext;
pub use orchestrator::DatasetOrchestrator;
pub use placeholder_resolver::{PlaceholderResolver, Resolution, ResolvedPartition};

// 重导出 Trait 接口
pub use seed_importer_trait::DatasetSource;
