// ==========================================
// Mock 远端记录存储 - 用于集成测试
// ==========================================
// 行为: 按提交顺序分配 ID；可配置逐条拒绝、整批失败、身份识别失败
// ==========================================

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use taskray_seed::domain::{FieldValue, Record};
use taskray_seed::repository::{
    ActorIdentity, QueryResult, RecordStore, SaveResult, StoreError, StoreResult,
};

pub const MOCK_ACTOR_ID: &str = "0055e000001ActorAAA";
pub const MOCK_ORG_ID: &str = "00D5e000000OrgAAAA";
pub const DEFAULT_ID_PREFIX: &str = "a0X";

/// 一次批量提交
#[derive(Debug, Clone)]
pub struct Submission {
    pub object_type: String,
    pub records: Vec<Record>,
    pub failed: bool,
}

#[derive(Debug, Default)]
struct MockState {
    next_id: u64,
    submissions: Vec<Submission>,
    queries: Vec<String>,
    allowance: Option<u64>,
    fail_batches_remaining: usize,
    chunk_failing_names: HashSet<String>,
}

pub struct MockRecordStore {
    state: Mutex<MockState>,
    identity_fails: bool,
    unassigned_queue_id: Option<String>,
    id_prefixes: HashMap<String, String>,
    rejected_names: HashSet<String>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            identity_fails: false,
            unassigned_queue_id: None,
            id_prefixes: HashMap::new(),
            rejected_names: HashSet::new(),
        }
    }

    /// 指定对象分配 ID 的前缀（如队列 00G）
    pub fn with_id_prefix(mut self, object_type: &str, prefix: &str) -> Self {
        self.id_prefixes
            .insert(object_type.to_string(), prefix.to_string());
        self
    }

    /// Name 字段等于该值的记录被逐条拒绝
    pub fn rejecting_name(mut self, name: &str) -> Self {
        self.rejected_names.insert(name.to_string());
        self
    }

    /// Name 字段等于该值的记录首次提交时所在分块失败，之后正常
    pub fn failing_chunk_once(self, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .chunk_failing_names
            .insert(name.to_string());
        self
    }

    /// 接下来 n 次批量提交整批失败
    pub fn failing_batches(self, n: usize) -> Self {
        self.state.lock().unwrap().fail_batches_remaining = n;
        self
    }

    pub fn with_unassigned_queue(mut self, queue_id: &str) -> Self {
        self.unassigned_queue_id = Some(queue_id.to_string());
        self
    }

    pub fn failing_identity(mut self) -> Self {
        self.identity_fails = true;
        self
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn submissions_for(&self, object_type: &str) -> Vec<Submission> {
        self.submissions()
            .into_iter()
            .filter(|s| s.object_type == object_type)
            .collect()
    }

    /// 某对象所有成功提交的记录
    pub fn created_records(&self, object_type: &str) -> Vec<Record> {
        self.submissions_for(object_type)
            .into_iter()
            .filter(|s| !s.failed)
            .flat_map(|s| s.records)
            .collect()
    }

    pub fn queries(&self) -> Vec<String> {
        self.state.lock().unwrap().queries.clone()
    }

    pub fn allowance(&self) -> Option<u64> {
        self.state.lock().unwrap().allowance
    }

    fn is_rejected(&self, record: &Record) -> bool {
        record_name(record).is_some_and(|name| self.rejected_names.contains(name))
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn identify_current_actor(&self) -> StoreResult<ActorIdentity> {
        if self.identity_fails {
            return Err(StoreError::Api {
                status: 401,
                body: "INVALID_SESSION_ID".to_string(),
            });
        }
        Ok(ActorIdentity {
            user_id: MOCK_ACTOR_ID.to_string(),
            organization_id: MOCK_ORG_ID.to_string(),
        })
    }

    async fn query(&self, expression: &str) -> StoreResult<QueryResult> {
        self.state
            .lock()
            .unwrap()
            .queries
            .push(expression.to_string());

        let records = match &self.unassigned_queue_id {
            Some(id) => vec![serde_json::json!({ "Id": id, "Name": "trUnassigned" })],
            None => Vec::new(),
        };
        Ok(QueryResult {
            total_size: records.len() as u64,
            done: true,
            records,
        })
    }

    async fn bulk_create(
        &self,
        object_type: &str,
        records: &[Record],
    ) -> StoreResult<Vec<SaveResult>> {
        let mut state = self.state.lock().unwrap();

        if state.fail_batches_remaining > 0 {
            state.fail_batches_remaining -= 1;
            state.submissions.push(Submission {
                object_type: object_type.to_string(),
                records: records.to_vec(),
                failed: true,
            });
            return Err(StoreError::Http("simulated network failure".to_string()));
        }

        let prefix = self
            .id_prefixes
            .get(object_type)
            .map(String::as_str)
            .unwrap_or(DEFAULT_ID_PREFIX);

        let mut results = Vec::with_capacity(records.len());
        for record in records {
            if let Some(name) = record_name(record) {
                if state.chunk_failing_names.remove(name) {
                    results.push(SaveResult::chunk_failed("simulated chunk failure"));
                    continue;
                }
            }
            if self.is_rejected(record) {
                results.push(SaveResult::failed(
                    "FIELD_CUSTOM_VALIDATION_EXCEPTION",
                    "rejected by mock",
                ));
                continue;
            }
            state.next_id += 1;
            results.push(SaveResult::ok(format!("{}{:015}", prefix, state.next_id)));
        }

        state.submissions.push(Submission {
            object_type: object_type.to_string(),
            records: records.to_vec(),
            failed: false,
        });
        Ok(results)
    }

    fn raise_request_allowance(&self, max_requests: u64) {
        self.state.lock().unwrap().allowance = Some(max_requests);
    }
}

fn record_name(record: &Record) -> Option<&str> {
    match record.get("Name") {
        Some(FieldValue::Literal(name)) => Some(name),
        _ => None,
    }
}
