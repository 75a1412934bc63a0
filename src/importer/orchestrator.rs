// ==========================================
// TaskRay 示例数据导入器 - 数据集编排器
// ==========================================
// 职责: 一次完整导入运行的入口
// 流程: 提升请求额度 → 识别当前操作者 → 查询未分配队列
//       → 并发拉取全部数据集 → 按声明顺序逐个插入记录集
// ==========================================
// 约束: 记录集严格串行（后续记录集的占位符依赖前序记录集登记的 ID）
// ==========================================

use crate::config::{DatasetSpec, SeedConfig};
use crate::domain::{ImportSummary, RecordSet, RunOutcome};
use crate::importer::batch_inserter::{BatchInserter, PassPolicy};
use crate::importer::date_math::today_utc;
use crate::importer::error::ImportResult;
use crate::importer::import_context::ImportContext;
use crate::importer::seed_importer_trait::DatasetSource;
use crate::repository::RecordStore;
use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// 拉取阶段的产物
struct FetchedDataset {
    record_set: RecordSet,
    fetch_failed: bool,
}

// ==========================================
// DatasetOrchestrator
// ==========================================
pub struct DatasetOrchestrator<S, D>
where
    S: RecordStore,
    D: DatasetSource,
{
    store: S,
    source: D,
    config: SeedConfig,
    // 相对日期基准日期，None 时取当前 UTC 日期
    today: Option<NaiveDate>,
}

impl<S, D> DatasetOrchestrator<S, D>
where
    S: RecordStore,
    D: DatasetSource,
{
    pub fn new(store: S, source: D, config: SeedConfig) -> Self {
        Self {
            store,
            source,
            config,
            today: None,
        }
    }

    /// 固定相对日期的基准日期
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// 执行一次完整导入
    ///
    /// # 返回
    /// - Ok(RunOutcome): 组织 ID + 汇总（记录集内部的部分失败不影响返回）
    /// - Err: 无法识别当前操作者
    #[instrument(skip(self), fields(run_id))]
    pub async fn run_import(&self) -> ImportResult<RunOutcome> {
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());

        // === 步骤 1: 提升请求额度 ===
        self.store.raise_request_allowance(self.config.max_requests);

        // === 步骤 2: 当前操作者 ===
        let actor = self.store.identify_current_actor().await.map_err(|e| {
            error!(error = %e, "无法识别当前操作者");
            e
        })?;
        info!(
            actor_id = %actor.user_id,
            organization_id = %actor.organization_id,
            "当前操作者已识别"
        );

        // === 步骤 3: 未分配队列 ===
        let unassigned_queue_id = self.lookup_unassigned_queue().await;

        let today = self.today.unwrap_or_else(today_utc);
        let mut ctx = ImportContext::new(actor, today).with_unassigned_queue(unassigned_queue_id);

        // === 步骤 4: 拉取数据集 ===
        let datasets = self.fetch_all().await;

        // === 步骤 5: 逐个插入 ===
        let policy = PassPolicy::from(&self.config);
        let inserter = BatchInserter::new(&self.store, policy);
        let mut reports = Vec::with_capacity(datasets.len());

        for dataset in datasets {
            let FetchedDataset {
                record_set,
                fetch_failed,
            } = dataset;
            let object_name = record_set.object_name.clone();
            info!("Inserting {} {}", record_set.len(), object_name);

            let mut report = inserter.insert_record_set(&mut ctx, record_set).await;
            report.fetch_failed = fetch_failed;

            info!("completed insert for {}", object_name);
            reports.push(report);
        }

        let summary = ImportSummary {
            record_sets: reports,
            registry_size: ctx.registry.len(),
        };
        info!(
            fetched = summary.total_fetched(),
            inserted = summary.total_inserted(),
            abandoned = summary.total_abandoned(),
            registry_size = summary.registry_size,
            "导入运行结束"
        );

        Ok(RunOutcome {
            run_id,
            organization_id: ctx.organization_id,
            actor_id: ctx.actor_id,
            unassigned_queue_id: ctx.unassigned_queue_id,
            summary,
        })
    }

    /// 查询未分配队列 ID（失败不影响运行）
    async fn lookup_unassigned_queue(&self) -> Option<String> {
        let expression = format!(
            "SELECT Id,Name FROM Group WHERE Type = 'Queue' AND DeveloperName = '{}'",
            self.config.unassigned_queue_name.replace('\'', "\\'")
        );

        match self.store.query(&expression).await {
            Ok(result) if result.total_size > 0 => {
                let queue_id = result.first_id().map(str::to_string);
                info!(queue_id = ?queue_id, "未分配队列已找到");
                queue_id
            }
            Ok(_) => {
                info!(queue = %self.config.unassigned_queue_name, "未找到未分配队列");
                None
            }
            Err(e) => {
                warn!(error = %e, "未分配队列查询失败");
                None
            }
        }
    }

    /// 并发拉取全部数据集，结果保持声明顺序
    ///
    /// 拉取失败的数据集按空集处理。
    async fn fetch_all(&self) -> Vec<FetchedDataset> {
        let tasks = self
            .config
            .datasets
            .iter()
            .map(|dataset| self.fetch_one(dataset));
        join_all(tasks).await
    }

    async fn fetch_one(&self, dataset: &DatasetSpec) -> FetchedDataset {
        match self.source.fetch(dataset).await {
            Ok(rows) => {
                info!(object_name = %dataset.object_name, rows = rows.len(), "数据集拉取完成");
                FetchedDataset {
                    record_set: RecordSet::from_raw_rows(&dataset.object_name, rows),
                    fetch_failed: false,
                }
            }
            Err(e) => {
                error!(object_name = %dataset.object_name, error = %e, "数据集拉取失败，按空集处理");
                FetchedDataset {
                    record_set: RecordSet::empty(&dataset.object_name),
                    fetch_failed: true,
                }
            }
        }
    }
}
