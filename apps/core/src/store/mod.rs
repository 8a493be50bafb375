//! Client-local persistence.
//!
//! A string key-value port with SQLite and in-memory adapters, and typed
//! repositories for the form draft and the history log on top of it. Values
//! are JSON documents read and written whole.

mod memory;
mod repository;
mod sqlite;

use async_trait::async_trait;

use crate::error::AppError;

pub use memory::MemoryStore;
pub use repository::{DraftRepository, HistoryLog};
pub use sqlite::SqliteStore;

/// Key of the in-progress intake form.
pub const DRAFT_KEY: &str = "consulting24_state";
/// Key of the saved report list.
pub const HISTORY_KEY: &str = "consulting_history";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    async fn remove(&self, key: &str) -> Result<(), AppError>;

    /// Removes every key.
    async fn clear(&self) -> Result<(), AppError>;
}
