//! Persistence Tests
//!
//! Drafts and history on the SQLite store, including reopening a saved
//! result for further editing.

use std::sync::Arc;

use serde_json::json;
use tempfile::tempdir;

use crate::catalog::ModuleId;
use crate::fallback::{DetailOutcome, FallbackAnalyzer};
use crate::models::{AnalysisRequest, FormDraft, Goal};
use crate::session::Workspace;
use crate::store::{DraftRepository, HistoryLog, KeyValueStore, SqliteStore, DRAFT_KEY, HISTORY_KEY};

fn request() -> AnalysisRequest {
    AnalysisRequest::new(
        vec![Goal::Strategy],
        vec!["法人".to_string()],
        "競合が多い市場で収支シミュレーションをしたい",
    )
}

#[tokio::test]
async fn test_history_survives_reopen_and_edits_are_saved_as_new_entry() {
    let dir = tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("consulting24.sqlite");

    let saved_id = {
        let store = SqliteStore::open(&db_path).await.unwrap();
        let history = HistoryLog::new(Arc::new(store.clone()));
        let entry = history.save(&FallbackAnalyzer.analyze(&request())).await.unwrap();
        store.pool().close().await;
        entry.id
    };

    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&db_path).await.unwrap());
    let history = HistoryLog::new(store);
    let entry = history.get(&saved_id).await.unwrap().expect("entry survives reopen");

    let mut workspace = Workspace::new();
    workspace.open(entry.data);
    assert_eq!(
        workspace.generate_detail(ModuleId::M91).unwrap(),
        DetailOutcome::Generated
    );
    workspace
        .edit_payload(ModuleId::M00, "/problems/0", json!("価格競争に巻き込まれている"))
        .unwrap();

    let edited = workspace.current().unwrap();
    history.save(edited).await.unwrap();

    let entries = history.list().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].data.has_payload(ModuleId::M91));
    assert!(!entries[1].data.has_payload(ModuleId::M91));
    assert_eq!(entries[1].id, saved_id);
    assert_eq!(
        entries[0].data.structure().unwrap().problems[0],
        "価格競争に巻き込まれている"
    );
}

#[tokio::test]
async fn test_draft_and_history_share_one_store() {
    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::in_memory().await.unwrap());
    let drafts = DraftRepository::new(store.clone());
    let history = HistoryLog::new(store.clone());

    drafts.save(&FormDraft::from(&request())).await.unwrap();
    let entry = history.save(&FallbackAnalyzer.analyze(&request())).await.unwrap();

    assert!(store.get(DRAFT_KEY).await.unwrap().is_some());
    assert!(store.get(HISTORY_KEY).await.unwrap().is_some());
    assert_eq!(AnalysisRequest::from(drafts.load().await.unwrap()), request());

    assert!(history.delete(&entry.id).await.unwrap());
    assert!(history.list().await.unwrap().is_empty());
    // the draft is untouched by history changes
    assert_eq!(drafts.load().await.unwrap(), FormDraft::from(&request()));

    store.clear().await.unwrap();
    assert_eq!(drafts.load().await.unwrap(), FormDraft::default());
}

#[tokio::test]
async fn test_corrupt_history_on_disk_is_recovered() {
    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::in_memory().await.unwrap());
    store.set(HISTORY_KEY, "[{\"id\":").await.unwrap();

    let history = HistoryLog::new(store);
    assert!(history.list().await.unwrap().is_empty());
    history.save(&FallbackAnalyzer.analyze(&request())).await.unwrap();
    assert_eq!(history.list().await.unwrap().len(), 1);
}
