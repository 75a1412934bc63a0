// ==========================================
// TaskRay 示例数据导入器 - 标识注册表
// ==========================================
// 职责: 占位符原文 → 远端真实 ID
// 约束: 只增不减；同一键首次写入后不再覆盖；生命周期为一次运行
// ==========================================

use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct IdentifierRegistry {
    entries: HashMap<String, String>,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// 登记插入成功后的真实 ID
    ///
    /// # 返回
    /// - true: 新登记
    /// - false: 键已存在，保留原值
    pub fn set(&mut self, key: impl Into<String>, concrete_id: impl Into<String>) -> bool {
        let key = key.into();
        let concrete_id = concrete_id.into();
        if let Some(existing) = self.entries.get(&key) {
            warn!(
                key = %key,
                existing = %existing,
                ignored = %concrete_id,
                "注册表键已存在，忽略重复登记"
            );
            return false;
        }
        self.entries.insert(key, concrete_id);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
