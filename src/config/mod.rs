// ==========================================
// TaskRay 示例数据导入器 - 配置层
// ==========================================
// 职责: 导入运行配置与远端连接配置，支持文件 + 环境变量覆写
// ==========================================

pub mod seed_config;

// 重导出核心配置
pub use seed_config::{
    config_keys, default_datasets, DatasetSpec, SeedConfig, StoreConfig, DEFAULT_MAX_PASSES,
    DEFAULT_MAX_REQUESTS,
};
