//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{TodoId, TodoRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("integrity error: {message}")]
    Integrity { message: String },
}

impl RepoError {
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTodoParams {
    pub task: String,
    pub owner: String,
}

/// Ordered record storage. Lookups are "first match in insertion order".
#[async_trait]
pub trait TodosRepo: Send + Sync {
    /// Every record, in insertion order.
    async fn list_all(&self) -> Result<Vec<TodoRecord>, RepoError>;

    /// Assign an id and add the record to the end of the sequence.
    async fn append(&self, params: NewTodoParams) -> Result<TodoRecord, RepoError>;

    /// Remove the first record matching `id` and `owner`; `false` when none does.
    async fn find_and_remove(&self, id: TodoId, owner: &str) -> Result<bool, RepoError>;

    /// Replace the task of the first record matching `id` and `owner`.
    async fn find_and_update(
        &self,
        id: TodoId,
        owner: &str,
        task: &str,
    ) -> Result<bool, RepoError>;
}
