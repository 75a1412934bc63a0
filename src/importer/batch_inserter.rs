// ==========================================
// TaskRay 示例数据导入器 - 批量插入器
// ==========================================
// 职责: 对单个记录集执行"解析 → 批量提交 → 登记 ID"多轮循环
// 终止: 延后集合为空 / 达到轮次上限 / （可选）连续两轮无进展
// ==========================================
// 说明: 不做依赖图拓扑排序。引用图可能有环或指向数据集外的标识，
//       因此以固定轮次上限约束最坏情况，每轮成功插入的 ID
//       为下一轮解析提供依据，深度不超过上限的依赖链可自然解开。
// ==========================================

use crate::config::{SeedConfig, DEFAULT_MAX_PASSES};
use crate::domain::{Record, RecordSet, RecordSetReport};
use crate::importer::import_context::ImportContext;
use crate::importer::placeholder_resolver::{PlaceholderResolver, ResolvedPartition};
use crate::repository::{RecordStore, SaveResult};
use tracing::{debug, error, info, instrument, warn};

/// 连续无进展轮次阈值（启用提前结束时）
const NO_PROGRESS_PASS_LIMIT: usize = 2;

// ==========================================
// PassPolicy - 轮次策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassPolicy {
    pub max_passes: usize,
    /// 整批失败时，本轮就绪记录回到延后集合
    pub retry_failed_batches: bool,
    /// 连续两轮无插入成功时提前结束
    pub stop_on_no_progress: bool,
}

impl Default for PassPolicy {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            retry_failed_batches: false,
            stop_on_no_progress: false,
        }
    }
}

impl From<&SeedConfig> for PassPolicy {
    fn from(config: &SeedConfig) -> Self {
        Self {
            max_passes: config.max_passes,
            retry_failed_batches: config.retry_failed_batches,
            stop_on_no_progress: config.stop_on_no_progress,
        }
    }
}

/// 单批提交的登记结果
#[derive(Default)]
struct PassTally {
    inserted: usize,
    /// 分块失败、需回到延后集合的记录
    requeued: Vec<Record>,
}

// ==========================================
// BatchInserter
// ==========================================
pub struct BatchInserter<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    resolver: PlaceholderResolver,
    policy: PassPolicy,
}

impl<'a, S: RecordStore + ?Sized> BatchInserter<'a, S> {
    pub fn new(store: &'a S, policy: PassPolicy) -> Self {
        Self {
            store,
            resolver: PlaceholderResolver::new(),
            policy,
        }
    }

    /// 将单个记录集推进到完成或放弃
    ///
    /// # 参数
    /// - ctx: 运行上下文（插入成功后登记注册表）
    /// - record_set: 待插入记录集
    ///
    /// # 返回
    /// - RecordSetReport: 插入统计（本函数不向调用方抛出错误）
    #[instrument(skip(self, ctx, record_set), fields(object_name = %record_set.object_name))]
    pub async fn insert_record_set(
        &self,
        ctx: &mut ImportContext,
        record_set: RecordSet,
    ) -> RecordSetReport {
        let RecordSet {
            object_name,
            records,
        } = record_set;
        let mut report = RecordSetReport::new(&object_name, records.len());
        let mut working = records;
        let mut idle_passes = 0;

        while !working.is_empty() && report.passes < self.policy.max_passes {
            report.passes += 1;

            // === 步骤 a: 解析 ===
            let ResolvedPartition { ready, mut deferred } =
                self.resolver.partition(&object_name, working, ctx);
            debug!(
                pass = report.passes,
                ready = ready.len(),
                deferred = deferred.len(),
                "本轮解析完成"
            );

            // === 步骤 b/c: 批量提交 ===
            let mut inserted_this_pass = 0;
            if !ready.is_empty() {
                let outcome = self.store.bulk_create(&object_name, &ready).await;
                match outcome {
                    Ok(results) => {
                        let tally =
                            self.register_results(ctx, &object_name, ready, results, &mut report);
                        inserted_this_pass = tally.inserted;
                        deferred.extend(tally.requeued);
                    }
                    Err(e) => {
                        error!(
                            pass = report.passes,
                            count = ready.len(),
                            error = %e,
                            "批量提交失败"
                        );
                        report.failed_batches += 1;
                        if self.policy.retry_failed_batches {
                            deferred.extend(ready);
                        } else {
                            report.dropped_in_failed_batches += ready.len();
                        }
                    }
                }
            }

            // === 步骤 d: 延后集合进入下一轮 ===
            working = deferred;

            if self.policy.stop_on_no_progress && !working.is_empty() {
                if inserted_this_pass == 0 {
                    idle_passes += 1;
                } else {
                    idle_passes = 0;
                }
                if idle_passes >= NO_PROGRESS_PASS_LIMIT {
                    debug!(pass = report.passes, "连续无进展，提前结束");
                    break;
                }
            }
        }

        // === 步骤 e: 剩余记录放弃 ===
        report.abandoned = working.len();
        if report.abandoned > 0 {
            debug!(
                abandoned = report.abandoned,
                passes = report.passes,
                "存在无法解析的记录，已放弃"
            );
        }

        info!(
            inserted = report.inserted,
            rejected = report.rejected,
            abandoned = report.abandoned,
            passes = report.passes,
            "记录集插入结束"
        );
        report
    }

    /// 按下标对齐提交记录与返回结果，登记成功项
    ///
    /// 分块整体失败的记录按整批失败处理（重试通道开启时回到延后集合）。
    fn register_results(
        &self,
        ctx: &mut ImportContext,
        object_name: &str,
        submitted: Vec<Record>,
        results: Vec<SaveResult>,
        report: &mut RecordSetReport,
    ) -> PassTally {
        if results.len() != submitted.len() {
            warn!(
                submitted = submitted.len(),
                returned = results.len(),
                "返回结果条数与提交条数不一致"
            );
            report.rejected += submitted.len().saturating_sub(results.len());
        }

        let mut tally = PassTally::default();
        let mut chunk_failed = 0;
        for (record, result) in submitted.into_iter().zip(results) {
            if result.is_chunk_failure() {
                chunk_failed += 1;
                if self.policy.retry_failed_batches {
                    tally.requeued.push(record);
                } else {
                    report.dropped_in_failed_batches += 1;
                }
                continue;
            }

            let identifier = record.source_identifier();
            if !result.success {
                report.rejected += 1;
                warn!(
                    object_name = %object_name,
                    identifier = identifier.unwrap_or("-"),
                    errors = %result.error_summary(),
                    "记录被远端拒绝，已丢弃"
                );
                continue;
            }

            tally.inserted += 1;
            match (identifier, result.id) {
                (Some(key), Some(new_id)) => {
                    ctx.registry.set(key, new_id);
                }
                (_, None) => {
                    warn!(
                        object_name = %object_name,
                        identifier = identifier.unwrap_or("-"),
                        "插入成功但未返回 ID，无法登记"
                    );
                }
                (None, Some(_)) => {}
            }
        }

        if chunk_failed > 0 {
            report.failed_batches += 1;
            error!(
                pass = report.passes,
                count = chunk_failed,
                requeued = tally.requeued.len(),
                "部分分块提交失败"
            );
        }

        report.inserted += tally.inserted;
        tally
    }
}
