// ==========================================
// TaskRay 示例数据导入器 - 领域常量
// ==========================================
// 职责: 对象类型名、字段名、特殊取值的统一定义
// 说明: 仅包含常量与纯判断函数，不含解析逻辑
// ==========================================

// ==========================================
// 对象类型名（远端记录存储的目标对象）
// ==========================================
pub mod object_names {
    pub const PROJECT: &str = "TASKRAY__Project__c";
    pub const TASK_GROUP: &str = "TASKRAY__trTaskGroup__c";
    pub const PROJECT_TASK: &str = "TASKRAY__Project_Task__c";
    pub const CHECKLIST_GROUP: &str = "TASKRAY__trChecklistGroup__c";
    pub const CHECKLIST_ITEM: &str = "TASKRAY__trChecklistItem__c";
    pub const TASK_TIME: &str = "TASKRAY__trTaskTime__c";
    pub const DEPENDENCY: &str = "TASKRAY__trDependency__c";
}

// ==========================================
// 字段名
// ==========================================
pub mod field_names {
    /// 记录自身标识字段（导入前为占位符，导入后作为注册表键）
    pub const IDENTIFIER: &str = "Id";

    // ===== 禁止发送到远端的管理字段 =====
    pub const DEPENDENT_UPDATE_PENDING: &str = "TASKRAY__Dependent_Update_Pending__c";
    pub const TEMPLATE_SOURCE: &str = "TASKRAY__trTemplateSource__c";

    /// 检查项负责人字段（只接受用户，不接受队列）
    pub const CHECKLIST_OWNER: &str = "TASKRAY__trOwner__c";

    // ===== 日期字段 =====
    pub const END_DATE: &str = "TASKRAY__trEndDate__c";
    pub const START_DATE: &str = "TASKRAY__trStartDate__c";
    pub const DEADLINE: &str = "TASKRAY__Deadline__c";
    pub const PROJECT_START: &str = "TASKRAY__Project_Start__c";
    pub const PROJECT_END: &str = "TASKRAY__Project_End__c";
    pub const DATE: &str = "TASKRAY__Date__c";

    pub const DATE_FIELDS: [&str; 6] = [
        END_DATE,
        START_DATE,
        DEADLINE,
        PROJECT_START,
        PROJECT_END,
        DATE,
    ];

    pub const TRANSIENT_FIELDS: [&str; 2] = [DEPENDENT_UPDATE_PENDING, TEMPLATE_SOURCE];
}

/// 队列/组标识前缀（以此开头的 ID 不是用户）
pub const QUEUE_ID_PREFIX: &str = "00G";

/// 以 `$` 开头但按字面值原样发送的取值
pub const EXEMPT_LITERAL: &str = "$Burlington";

/// 判断字段是否为日期字段
pub fn is_date_field(field_name: &str) -> bool {
    field_names::DATE_FIELDS.contains(&field_name)
}

/// 判断字段是否为禁止发送的管理字段
pub fn is_transient_field(field_name: &str) -> bool {
    field_names::TRANSIENT_FIELDS.contains(&field_name)
}

/// 判断 ID 是否为队列/组标识
pub fn is_queue_id(id: &str) -> bool {
    id.starts_with(QUEUE_ID_PREFIX)
}
