// ==========================================
// 集成测试辅助模块
// ==========================================

#![allow(dead_code)]

pub mod mock_store;
pub mod static_source;

use chrono::NaiveDate;
use taskray_seed::importer::ImportContext;
use taskray_seed::repository::ActorIdentity;

/// 固定基准日期 2024-03-15
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

/// 以 Mock 身份创建运行上下文
pub fn test_context() -> ImportContext {
    ImportContext::new(
        ActorIdentity {
            user_id: mock_store::MOCK_ACTOR_ID.to_string(),
            organization_id: mock_store::MOCK_ORG_ID.to_string(),
        },
        fixed_today(),
    )
}
