use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use uuid::Uuid;

use super::{KeyValueStore, DRAFT_KEY, HISTORY_KEY};
use crate::error::AppError;
use crate::models::{AnalysisResult, FormDraft, HistoryEntry};

/// Reads a JSON value, treating a malformed one as absent.
async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, AppError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, "Ignoring malformed stored value: {}", e);
            Ok(None)
        }
    }
}

/// The in-progress intake form.
#[derive(Clone)]
pub struct DraftRepository {
    store: Arc<dyn KeyValueStore>,
}

impl DraftRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<FormDraft, AppError> {
        Ok(load_json(self.store.as_ref(), DRAFT_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn save(&self, draft: &FormDraft) -> Result<(), AppError> {
        self.store
            .set(DRAFT_KEY, &serde_json::to_string(draft)?)
            .await
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        self.store.remove(DRAFT_KEY).await
    }
}

/// Saved reports, newest first.
///
/// Every change reads the whole log, edits it in memory and writes it back.
#[derive(Clone)]
pub struct HistoryLog {
    store: Arc<dyn KeyValueStore>,
}

impl HistoryLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<HistoryEntry>, AppError> {
        Ok(load_json(self.store.as_ref(), HISTORY_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn get(&self, id: &str) -> Result<Option<HistoryEntry>, AppError> {
        Ok(self.list().await?.into_iter().find(|entry| entry.id == id))
    }

    /// Saves a snapshot dated today (UTC).
    pub async fn save(&self, result: &AnalysisResult) -> Result<HistoryEntry, AppError> {
        self.save_on(result, Utc::now().date_naive()).await
    }

    pub async fn save_on(
        &self,
        result: &AnalysisResult,
        date: NaiveDate,
    ) -> Result<HistoryEntry, AppError> {
        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            title: result.refined_goal.clone(),
            data: result.clone(),
        };

        let mut entries = self.list().await?;
        entries.insert(0, entry.clone());
        self.write(&entries).await?;

        info!(id = %entry.id, "Saved report to history");
        Ok(entry)
    }

    /// Removes an entry. Returns `false` when no entry had that id.
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut entries = self.list().await?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.write(&entries).await?;
        Ok(true)
    }

    async fn write(&self, entries: &[HistoryEntry]) -> Result<(), AppError> {
        self.store
            .set(HISTORY_KEY, &serde_json::to_string(entries)?)
            .await
    }
}
