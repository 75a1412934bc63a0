// ==========================================
// TaskRay 示例数据导入器 - 导入结果模型
// ==========================================
// 职责: 单个记录集的插入报告、整次运行的汇总
// ==========================================

use serde::Serialize;

// ==========================================
// RecordSetReport - 单个记录集的插入报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordSetReport {
    pub object_name: String,
    /// 数据源拉取到的记录数
    pub fetched: usize,
    /// 插入成功的记录数
    pub inserted: usize,
    /// 远端逐条拒绝的记录数（不重试）
    pub rejected: usize,
    /// 整批提交失败而丢弃的记录数
    pub dropped_in_failed_batches: usize,
    /// 达到轮次上限后仍未解析、被放弃的记录数
    pub abandoned: usize,
    /// 整批提交失败次数
    pub failed_batches: usize,
    /// 实际执行的轮次
    pub passes: usize,
    /// 数据源拉取是否失败（失败时按空集处理）
    pub fetch_failed: bool,
}

impl RecordSetReport {
    pub fn new(object_name: impl Into<String>, fetched: usize) -> Self {
        Self {
            object_name: object_name.into(),
            fetched,
            ..Default::default()
        }
    }
}

// ==========================================
// ImportSummary - 整次运行汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub record_sets: Vec<RecordSetReport>,
    /// 运行结束时注册表条目数
    pub registry_size: usize,
}

impl ImportSummary {
    pub fn total_fetched(&self) -> usize {
        self.record_sets.iter().map(|r| r.fetched).sum()
    }

    pub fn total_inserted(&self) -> usize {
        self.record_sets.iter().map(|r| r.inserted).sum()
    }

    pub fn total_abandoned(&self) -> usize {
        self.record_sets.iter().map(|r| r.abandoned).sum()
    }

    pub fn report_for(&self, object_name: &str) -> Option<&RecordSetReport> {
        self.record_sets
            .iter()
            .find(|r| r.object_name == object_name)
    }
}

// ==========================================
// RunOutcome - 导入入口返回值
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub run_id: String,
    pub organization_id: String,
    pub actor_id: String,
    /// 未分配队列 ID（仅查询保留，解析逻辑不使用）
    pub unassigned_queue_id: Option<String>,
    pub summary: ImportSummary,
}
