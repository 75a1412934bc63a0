// ==========================================
// BatchInserter 集成测试
// ==========================================
// 测试范围:
// 1. 同一记录集内的多级依赖链按轮次解开
// 2. 轮次上限与放弃
// 3. 逐条拒绝、整批失败、失败重试通道
// 4. 注册表单调性
// ==========================================

mod helpers;

use helpers::mock_store::MockRecordStore;
use helpers::test_context;
use taskray_seed::domain::types::object_names;
use taskray_seed::domain::{FieldValue, Record, RecordSet};
use taskray_seed::importer::{BatchInserter, PassPolicy};

fn record(id: &str, name: &str) -> Record {
    Record::new().with_raw("Id", id).with_raw("Name", name)
}

fn task(id: &str, name: &str, parent: &str) -> Record {
    record(id, name).with_raw("TASKRAY__Dependent_On__c", parent)
}

// ==========================================
// 基本流程
// ==========================================

#[tokio::test]
async fn test_independent_records_insert_in_one_pass() {
    let store = MockRecordStore::new();
    let mut ctx = test_context();
    let set = RecordSet::new(
        object_names::PROJECT,
        vec![record("$P1", "Alpha"), record("$P2", "Beta")],
    );

    let report = BatchInserter::new(&store, PassPolicy::default())
        .insert_record_set(&mut ctx, set)
        .await;

    assert_eq!(report.passes, 1);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.abandoned, 0);
    assert_eq!(store.submissions().len(), 1, "就绪记录应一次批量提交");
    assert!(ctx.registry.get("$P1").is_some());
    assert!(ctx.registry.get("$P2").is_some());
}

#[tokio::test]
async fn test_dependency_chain_resolves_over_passes() {
    let store = MockRecordStore::new();
    let mut ctx = test_context();
    // 声明顺序与依赖方向相反: C → B → A
    let set = RecordSet::new(
        object_names::PROJECT_TASK,
        vec![
            task("$C", "Ship", "$B"),
            task("$B", "Build", "$A"),
            record("$A", "Design"),
        ],
    );

    let report = BatchInserter::new(&store, PassPolicy::default())
        .insert_record_set(&mut ctx, set)
        .await;

    assert_eq!(report.passes, 3);
    assert_eq!(report.inserted, 3);
    assert_eq!(report.abandoned, 0);

    let submissions = store.submissions();
    assert_eq!(submissions.len(), 3);
    assert_eq!(submissions[0].records[0].source_identifier(), Some("$A"));
    assert_eq!(submissions[1].records[0].source_identifier(), Some("$B"));
    assert_eq!(submissions[2].records[0].source_identifier(), Some("$C"));

    // C 提交时引用字段已替换为 B 的真实 ID
    let b_id = ctx.registry.get("$B").unwrap().to_string();
    assert_eq!(
        submissions[2].records[0].get("TASKRAY__Dependent_On__c"),
        Some(&FieldValue::Literal(b_id))
    );
}

#[tokio::test]
async fn test_empty_record_set_makes_no_calls() {
    let store = MockRecordStore::new();
    let mut ctx = test_context();

    let report = BatchInserter::new(&store, PassPolicy::default())
        .insert_record_set(&mut ctx, RecordSet::empty(object_names::DEPENDENCY))
        .await;

    assert_eq!(report.passes, 0);
    assert_eq!(report.fetched, 0);
    assert!(store.submissions().is_empty());
}

// ==========================================
// 轮次上限
// ==========================================

#[tokio::test]
async fn test_unresolvable_set_abandoned_after_ten_passes() {
    let store = MockRecordStore::new();
    let mut ctx = test_context();
    let set = RecordSet::new(
        object_names::TASK_TIME,
        vec![
            task("$TT1", "Entry 1", "$Missing1"),
            task("$TT2", "Entry 2", "$Missing2"),
        ],
    );

    let report = BatchInserter::new(&store, PassPolicy::default())
        .insert_record_set(&mut ctx, set)
        .await;

    assert_eq!(report.passes, 10);
    assert_eq!(report.abandoned, 2);
    assert_eq!(report.inserted, 0);
    assert!(ctx.registry.is_empty(), "该记录集不应登记任何 ID");
    assert!(store.submissions().is_empty(), "没有就绪记录时不应提交");
}

#[tokio::test]
async fn test_custom_pass_ceiling() {
    let store = MockRecordStore::new();
    let mut ctx = test_context();
    let set = RecordSet::new(
        object_names::PROJECT_TASK,
        vec![task("$C", "Ship", "$B"), task("$B", "Build", "$A"), record("$A", "Design")],
    );
    let policy = PassPolicy {
        max_passes: 2,
        ..PassPolicy::default()
    };

    let report = BatchInserter::new(&store, policy)
        .insert_record_set(&mut ctx, set)
        .await;

    assert_eq!(report.passes, 2);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.abandoned, 1);
    assert!(!ctx.registry.contains("$C"));
}

#[tokio::test]
async fn test_stop_on_no_progress_exits_early() {
    let store = MockRecordStore::new();
    let mut ctx = test_context();
    let set = RecordSet::new(
        object_names::TASK_TIME,
        vec![task("$TT1", "Entry 1", "$Missing")],
    );
    let policy = PassPolicy {
        stop_on_no_progress: true,
        ..PassPolicy::default()
    };

    let report = BatchInserter::new(&store, policy)
        .insert_record_set(&mut ctx, set)
        .await;

    assert_eq!(report.passes, 2);
    assert_eq!(report.abandoned, 1);
}

// ==========================================
// 失败处理
// ==========================================

#[tokio::test]
async fn test_rejected_record_is_not_retried() {
    let store = MockRecordStore::new().rejecting_name("Broken");
    let mut ctx = test_context();
    let set = RecordSet::new(
        object_names::PROJECT_TASK,
        vec![
            record("$A", "Broken"),
            record("$B", "Fine"),
            task("$C", "Child", "$A"),
        ],
    );

    let report = BatchInserter::new(&store, PassPolicy::default())
        .insert_record_set(&mut ctx, set)
        .await;

    assert_eq!(report.inserted, 1);
    assert_eq!(report.rejected, 1);
    // 依赖被拒绝记录的子记录无法解析，直到上限后放弃
    assert_eq!(report.abandoned, 1);
    assert_eq!(report.passes, 10);
    assert!(!ctx.registry.contains("$A"));
    assert!(ctx.registry.contains("$B"));
    assert_eq!(store.submissions().len(), 1, "被拒绝的记录不应再次提交");
}

#[tokio::test]
async fn test_failed_batch_consumes_pass_and_drops_records() {
    let store = MockRecordStore::new().failing_batches(1);
    let mut ctx = test_context();
    let set = RecordSet::new(
        object_names::PROJECT_TASK,
        vec![record("$A", "Design"), task("$B", "Build", "$A")],
    );

    let report = BatchInserter::new(&store, PassPolicy::default())
        .insert_record_set(&mut ctx, set)
        .await;

    assert_eq!(report.failed_batches, 1);
    assert_eq!(report.dropped_in_failed_batches, 1);
    assert_eq!(report.inserted, 0);
    assert_eq!(report.abandoned, 1);
    assert_eq!(report.passes, 10);
    assert!(ctx.registry.is_empty());
}

#[tokio::test]
async fn test_retry_lane_resubmits_failed_batch() {
    let store = MockRecordStore::new().failing_batches(1);
    let mut ctx = test_context();
    let set = RecordSet::new(
        object_names::PROJECT_TASK,
        vec![record("$A", "Design"), task("$B", "Build", "$A")],
    );
    let policy = PassPolicy {
        retry_failed_batches: true,
        ..PassPolicy::default()
    };

    let report = BatchInserter::new(&store, policy)
        .insert_record_set(&mut ctx, set)
        .await;

    assert_eq!(report.failed_batches, 1);
    assert_eq!(report.dropped_in_failed_batches, 0);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.passes, 3);
    assert!(ctx.registry.contains("$B"));
}

#[tokio::test]
async fn test_failed_chunk_requeued_by_retry_lane() {
    let store = MockRecordStore::new().failing_chunk_once("Design");
    let mut ctx = test_context();
    let set = RecordSet::new(
        object_names::PROJECT_TASK,
        vec![record("$A", "Design"), record("$B", "Build")],
    );
    let policy = PassPolicy {
        retry_failed_batches: true,
        ..PassPolicy::default()
    };

    let report = BatchInserter::new(&store, policy)
        .insert_record_set(&mut ctx, set)
        .await;

    assert_eq!(report.failed_batches, 1);
    assert_eq!(report.rejected, 0, "分块失败不应计为逐条拒绝");
    assert_eq!(report.inserted, 2);
    assert_eq!(report.passes, 2);
    assert!(ctx.registry.contains("$A"));

    let submissions = store.submissions();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[1].records.len(), 1);
    assert_eq!(submissions[1].records[0].source_identifier(), Some("$A"));
}

#[tokio::test]
async fn test_failed_chunk_dropped_without_retry_lane() {
    let store = MockRecordStore::new().failing_chunk_once("Design");
    let mut ctx = test_context();
    let set = RecordSet::new(
        object_names::PROJECT_TASK,
        vec![record("$A", "Design"), record("$B", "Build")],
    );

    let report = BatchInserter::new(&store, PassPolicy::default())
        .insert_record_set(&mut ctx, set)
        .await;

    assert_eq!(report.failed_batches, 1);
    assert_eq!(report.dropped_in_failed_batches, 1);
    assert_eq!(report.rejected, 0);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.passes, 1);
    assert!(!ctx.registry.contains("$A"));
}

// ==========================================
// 注册表单调性
// ==========================================

#[tokio::test]
async fn test_registry_entries_never_overwritten() {
    let store = MockRecordStore::new();
    let mut ctx = test_context();
    let inserter = BatchInserter::new(&store, PassPolicy::default());

    inserter
        .insert_record_set(
            &mut ctx,
            RecordSet::new(object_names::PROJECT, vec![record("$P1", "Alpha")]),
        )
        .await;
    let first_id = ctx.registry.get("$P1").unwrap().to_string();

    // 另一记录集出现同一符号标识
    inserter
        .insert_record_set(
            &mut ctx,
            RecordSet::new(object_names::TASK_GROUP, vec![record("$P1", "Duplicate")]),
        )
        .await;

    assert_eq!(ctx.registry.get("$P1"), Some(first_id.as_str()));
    assert_eq!(ctx.registry.len(), 1);
}
