// ==========================================
// TaskRay 示例数据导入器 - 占位符解析器
// ==========================================
// 职责: 按注册表当前状态解析记录字段，划分"本轮插入"与"延后"
// 输入: 一个记录集的待处理记录 + 运行上下文（只读）
// 输出: ResolvedPartition { ready, deferred }
// ==========================================
// 字段规则（按优先级依次作用，后一条读取前一条修改后的值）:
// 1. 空字符串或管理字段 → 删除字段
// 2. "TRUE" / "FALSE" → 布尔
// 3. `$User:` 未解析 → 当前操作者 ID
// 4. `$Account:` / `$Opp:` 未解析 → 删除字段
// 5. 任意占位符已解析 → 替换为真实 ID
//    （检查项负责人字段解析到队列 ID 时删除字段）
// 6. 其余未解析占位符（Id 字段与豁免字面值除外）→ 整条记录延后
// 7. 日期字段: 相对日期 / YYYY-MM-DD → UTC 零点毫秒时间戳
// ==========================================

use crate::domain::types::{
    field_names, is_date_field, is_queue_id, is_transient_field, object_names, EXEMPT_LITERAL,
};
use crate::domain::{FieldValue, Placeholder, PlaceholderKind, Record};
use crate::importer::date_math::{parse_calendar_date, resolve_relative};
use crate::importer::import_context::ImportContext;
use tracing::{debug, warn};

/// 一轮解析的划分结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPartition {
    pub ready: Vec<Record>,
    pub deferred: Vec<Record>,
}

/// 单条记录的解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Ready(Record),
    /// 保留本轮已完成的部分替换
    Deferred(Record),
}

/// 单个字段的解析结果
#[derive(Debug, Clone, PartialEq)]
enum FieldOutcome {
    Keep(FieldValue),
    Drop,
    /// 字段保留，但整条记录延后
    Defer(FieldValue),
}

// ==========================================
// PlaceholderResolver
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderResolver;

impl PlaceholderResolver {
    pub fn new() -> Self {
        Self
    }

    /// 解析一批记录并划分
    pub fn partition(
        &self,
        object_name: &str,
        records: Vec<Record>,
        ctx: &ImportContext,
    ) -> ResolvedPartition {
        let mut partition = ResolvedPartition::default();
        for record in records {
            match self.resolve_record(object_name, record, ctx) {
                Resolution::Ready(record) => partition.ready.push(record),
                Resolution::Deferred(record) => partition.deferred.push(record),
            }
        }

        debug!(
            object_name = %object_name,
            ready = partition.ready.len(),
            deferred = partition.deferred.len(),
            registry_size = ctx.registry.len(),
            "占位符解析完成"
        );
        partition
    }

    /// 解析单条记录
    pub fn resolve_record(
        &self,
        object_name: &str,
        mut record: Record,
        ctx: &ImportContext,
    ) -> Resolution {
        let mut blocked_by: Option<String> = None;

        for field_name in record.field_names() {
            let Some(value) = record.get(&field_name).cloned() else {
                continue;
            };

            match self.resolve_field(object_name, &field_name, value, ctx) {
                FieldOutcome::Keep(value) => record.set(&field_name, value),
                FieldOutcome::Drop => {
                    record.remove(&field_name);
                }
                FieldOutcome::Defer(value) => {
                    if blocked_by.is_none() {
                        blocked_by = value.as_text().map(str::to_string);
                    }
                    record.set(&field_name, value);
                }
            }
        }

        match blocked_by {
            None => Resolution::Ready(record),
            Some(placeholder) => {
                debug!(
                    object_name = %object_name,
                    identifier = record.source_identifier().unwrap_or("-"),
                    blocked_by = %placeholder,
                    "存在未解析占位符，记录延后"
                );
                Resolution::Deferred(record)
            }
        }
    }

    fn resolve_field(
        &self,
        object_name: &str,
        field_name: &str,
        value: FieldValue,
        ctx: &ImportContext,
    ) -> FieldOutcome {
        // 规则 1
        if value == FieldValue::Empty || is_transient_field(field_name) {
            return FieldOutcome::Drop;
        }

        // 规则 2
        let value = coerce_boolean(value);

        // 规则 3-6
        let outcome = match value {
            FieldValue::Placeholder(placeholder) => {
                self.resolve_placeholder(object_name, field_name, placeholder, ctx)
            }
            other => FieldOutcome::Keep(other),
        };

        // 规则 7
        match outcome {
            FieldOutcome::Keep(value) => FieldOutcome::Keep(resolve_date(field_name, value, ctx)),
            FieldOutcome::Defer(value) => {
                FieldOutcome::Defer(resolve_date(field_name, value, ctx))
            }
            FieldOutcome::Drop => FieldOutcome::Drop,
        }
    }

    fn resolve_placeholder(
        &self,
        object_name: &str,
        field_name: &str,
        placeholder: Placeholder,
        ctx: &ImportContext,
    ) -> FieldOutcome {
        // 记录自身标识原样保留，插入成功后以其为注册表键
        if field_name == field_names::IDENTIFIER {
            return FieldOutcome::Keep(FieldValue::Placeholder(placeholder));
        }

        match (placeholder.kind, ctx.registry.get(&placeholder.raw)) {
            // 规则 5
            (_, Some(concrete_id)) => {
                if object_name == object_names::CHECKLIST_ITEM
                    && field_name == field_names::CHECKLIST_OWNER
                    && is_queue_id(concrete_id)
                {
                    return FieldOutcome::Drop;
                }
                FieldOutcome::Keep(FieldValue::Literal(concrete_id.to_string()))
            }
            // 规则 3
            (PlaceholderKind::User, None) => {
                FieldOutcome::Keep(FieldValue::Literal(ctx.actor_id.clone()))
            }
            // 规则 4
            (PlaceholderKind::Account | PlaceholderKind::Opp, None) => FieldOutcome::Drop,
            // 规则 6
            (PlaceholderKind::Generic, None) => {
                if placeholder.raw == EXEMPT_LITERAL {
                    FieldOutcome::Keep(FieldValue::Placeholder(placeholder))
                } else {
                    FieldOutcome::Defer(FieldValue::Placeholder(placeholder))
                }
            }
        }
    }
}

fn coerce_boolean(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Literal(ref s) if s == "TRUE" => FieldValue::Boolean(true),
        FieldValue::Literal(ref s) if s == "FALSE" => FieldValue::Boolean(false),
        other => other,
    }
}

fn resolve_date(field_name: &str, value: FieldValue, ctx: &ImportContext) -> FieldValue {
    if !is_date_field(field_name) {
        return value;
    }
    match value {
        FieldValue::RelativeDate(token) => match resolve_relative(token, ctx.today) {
            Some(millis) => FieldValue::Number(millis),
            None => {
                warn!(field = %field_name, token = %token, "相对日期超出范围，保留原值");
                FieldValue::RelativeDate(token)
            }
        },
        FieldValue::Literal(text) => match parse_calendar_date(&text) {
            Some(millis) => FieldValue::Number(millis),
            None => FieldValue::Literal(text),
        },
        other => other,
    }
}
