// ==========================================
// TaskRay 示例数据导入器 - 请求额度
// ==========================================
// 职责: 统计远端请求次数，超出额度后拒绝
// 说明: 额度只升不降；启动时按累计创建调用量一次性提升
// ==========================================

use crate::repository::error::{StoreError, StoreResult};
use std::sync::atomic::{AtomicU64, Ordering};

/// 未提升前的默认额度
pub const DEFAULT_REQUEST_ALLOWANCE: u64 = 10;

#[derive(Debug)]
pub struct RequestBudget {
    used: AtomicU64,
    limit: AtomicU64,
}

impl Default for RequestBudget {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_ALLOWANCE)
    }
}

impl RequestBudget {
    pub fn new(limit: u64) -> Self {
        Self {
            used: AtomicU64::new(0),
            limit: AtomicU64::new(limit),
        }
    }

    /// 提升额度（低于当前额度时忽略）
    pub fn raise(&self, limit: u64) {
        self.limit.fetch_max(limit, Ordering::SeqCst);
    }

    /// 占用一次请求额度
    pub fn acquire(&self) -> StoreResult<()> {
        let limit = self.limit.load(Ordering::SeqCst);
        let used = self.used.fetch_add(1, Ordering::SeqCst) + 1;
        if used > limit {
            return Err(StoreError::RequestBudgetExceeded { limit });
        }
        Ok(())
    }

    pub fn used(&self) -> u64 {
        self.used.load(Ordering::SeqCst)
    }

    pub fn limit(&self) -> u64 {
        self.limit.load(Ordering::SeqCst)
    }
}
