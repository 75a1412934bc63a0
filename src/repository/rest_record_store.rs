// ==========================================
// TaskRay 示例数据导入器 - REST 记录存储实现
// ==========================================
// 职责: 基于 reqwest 的远端记录存储客户端
// 接口: userinfo（身份）/ query（查询）/ composite sobjects（批量创建）
// ==========================================

use crate::config::StoreConfig;
use crate::domain::types::field_names;
use crate::domain::{FieldValue, Record};
use crate::repository::error::{StoreError, StoreResult};
use crate::repository::record_store::{ActorIdentity, QueryResult, RecordStore, SaveResult};
use crate::repository::request_budget::RequestBudget;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// composite sobjects 单次请求的记录上限
pub const COMPOSITE_BATCH_LIMIT: usize = 200;

const ERROR_BODY_PREVIEW: usize = 500;

// ==========================================
// RestRecordStore
// ==========================================
pub struct RestRecordStore {
    http: Client,
    config: StoreConfig,
    budget: RequestBudget,
}

impl RestRecordStore {
    /// 创建客户端（不设置额外超时，沿用远端自身限制）
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            config,
            budget: RequestBudget::default(),
        })
    }

    pub fn budget(&self) -> &RequestBudget {
        &self.budget
    }

    fn instance_url(&self) -> &str {
        self.config.instance_url.trim_end_matches('/')
    }

    fn data_url(&self, path: &str) -> String {
        format!(
            "{}/services/data/v{}{}",
            self.instance_url(),
            self.config.api_version,
            path
        )
    }

    /// 发送请求并解析 JSON（每次调用占用一次请求额度）
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> StoreResult<T> {
        self.budget.acquire()?;

        let response = request
            .bearer_auth(&self.config.access_token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn identify_current_actor(&self) -> StoreResult<ActorIdentity> {
        let url = format!("{}/services/oauth2/userinfo", self.instance_url());
        self.send_json(self.http.get(&url)).await
    }

    async fn query(&self, expression: &str) -> StoreResult<QueryResult> {
        let url = self.data_url("/query");
        self.send_json(self.http.get(&url).query(&[("q", expression)]))
            .await
    }

    /// 批量创建（超过单次上限时分块提交，结果按输入顺序拼接）
    async fn bulk_create(
        &self,
        object_type: &str,
        records: &[Record],
    ) -> StoreResult<Vec<SaveResult>> {
        let url = self.data_url("/composite/sobjects");
        let mut outcomes = Vec::new();

        for chunk in records.chunks(COMPOSITE_BATCH_LIMIT) {
            let payload = build_create_payload(object_type, chunk);
            debug!(object_type = %object_type, count = chunk.len(), "提交创建分块");

            let outcome = self
                .send_json::<Vec<SaveResult>>(self.http.post(&url).json(&payload))
                .await;
            if let Err(e) = &outcome {
                warn!(object_type = %object_type, error = %e, "创建分块提交失败");
            }
            outcomes.push((chunk.len(), outcome));
        }

        merge_chunk_outcomes(outcomes)
    }

    fn raise_request_allowance(&self, max_requests: u64) {
        self.budget.raise(max_requests);
    }
}

// ==========================================
// 分块结果合并
// ==========================================

/// 按提交顺序合并各分块结果
///
/// # 参数
/// - outcomes: (分块记录数, 分块提交结果)
///
/// # 失败处理
/// - 条数不一致的分块按整块失败处理
/// - 全部分块失败 → 返回第一个错误（整批失败）
/// - 部分分块失败 → 块内每条记录标记为 `CHUNK_FAILED`，由调用方决定是否重试
pub fn merge_chunk_outcomes(
    outcomes: Vec<(usize, StoreResult<Vec<SaveResult>>)>,
) -> StoreResult<Vec<SaveResult>> {
    let mut merged = Vec::new();
    let mut first_error: Option<StoreError> = None;
    let mut any_chunk_succeeded = false;

    for (chunk_len, outcome) in outcomes {
        let outcome = outcome.and_then(|chunk_results| {
            if chunk_results.len() == chunk_len {
                Ok(chunk_results)
            } else {
                Err(StoreError::ResultCountMismatch {
                    submitted: chunk_len,
                    returned: chunk_results.len(),
                })
            }
        });

        match outcome {
            Ok(chunk_results) => {
                any_chunk_succeeded = true;
                merged.extend(chunk_results);
            }
            Err(e) => {
                let message = e.to_string();
                merged.extend((0..chunk_len).map(|_| SaveResult::chunk_failed(message.clone())));
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if !any_chunk_succeeded => Err(e),
        _ => Ok(merged),
    }
}

// ==========================================
// 请求体构建
// ==========================================

/// 构建 composite sobjects 创建请求体
///
/// Id 字段只用于注册表键，不发送到远端。
pub fn build_create_payload(object_type: &str, records: &[Record]) -> Value {
    let records: Vec<Value> = records
        .iter()
        .map(|record| {
            let mut object = Map::new();
            object.insert("attributes".to_string(), json!({ "type": object_type }));
            for (name, value) in record.fields() {
                if name == field_names::IDENTIFIER {
                    continue;
                }
                object.insert(name.to_string(), field_value_to_json(value));
            }
            Value::Object(object)
        })
        .collect();

    json!({
        "allOrNone": false,
        "records": records,
    })
}

fn field_value_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Empty => Value::Null,
        FieldValue::Boolean(b) => Value::Bool(*b),
        FieldValue::Literal(s) => Value::String(s.clone()),
        FieldValue::Number(n) => Value::from(*n),
        FieldValue::RelativeDate(d) => Value::String(d.to_string()),
        FieldValue::Placeholder(p) => Value::String(p.raw.clone()),
    }
}
