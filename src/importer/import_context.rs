// ==========================================
// TaskRay 示例数据导入器 - 运行上下文
// ==========================================
// 职责: 一次运行内共享的状态（注册表、当前操作者、未分配队列、基准日期）
// 生命周期: 运行开始时创建，按 &mut 传递，运行结束即丢弃，不跨运行复用
// ==========================================

use crate::importer::identifier_registry::IdentifierRegistry;
use crate::repository::ActorIdentity;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct ImportContext {
    pub registry: IdentifierRegistry,
    /// `$User:` 未解析时的回退值
    pub actor_id: String,
    pub organization_id: String,
    /// 仅查询保留，解析逻辑不使用
    pub unassigned_queue_id: Option<String>,
    /// 相对日期的基准日期（UTC）
    pub today: NaiveDate,
}

impl ImportContext {
    pub fn new(actor: ActorIdentity, today: NaiveDate) -> Self {
        Self {
            registry: IdentifierRegistry::new(),
            actor_id: actor.user_id,
            organization_id: actor.organization_id,
            unassigned_queue_id: None,
            today,
        }
    }

    pub fn with_unassigned_queue(mut self, queue_id: Option<String>) -> Self {
        self.unassigned_queue_id = queue_id;
        self
    }
}
