// ==========================================
// TaskRay 示例数据导入器 - 主入口
// ==========================================
// 配置: 环境变量（见 config::config_keys）
// 输出: 运行结果 JSON（stdout），进度日志（tracing）
// ==========================================

use anyhow::Context;
use taskray_seed::config::{SeedConfig, StoreConfig};
use taskray_seed::importer::{DatasetOrchestrator, HttpCsvSource, LocalCsvSource};
use taskray_seed::repository::RestRecordStore;
use taskray_seed::{logging, RunOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", taskray_seed::APP_NAME);
    tracing::info!("系统版本: {}", taskray_seed::VERSION);
    tracing::info!("==================================================");

    let seed_config = SeedConfig::from_env().context("加载导入配置失败")?;
    let store_config = StoreConfig::from_env().context("加载远端连接配置失败")?;
    let store = RestRecordStore::new(store_config).context("创建远端存储客户端失败")?;

    let outcome: RunOutcome = match seed_config.data_dir.clone() {
        Some(data_dir) => {
            tracing::info!("使用本地数据目录: {}", data_dir.display());
            let source = LocalCsvSource::new(data_dir);
            DatasetOrchestrator::new(store, source, seed_config)
                .run_import()
                .await?
        }
        None => {
            let source = HttpCsvSource::new(seed_config.cache_bust)?;
            DatasetOrchestrator::new(store, source, seed_config)
                .run_import()
                .await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
