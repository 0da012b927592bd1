//! Todo board use cases: listing, creation, deletion and form-driven actions.
//!
//! Reads go through the snapshot cache when one is configured; every
//! successful mutation clears it before returning.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{NewTodoParams, RepoError, TodosRepo};
use crate::cache::{Snapshot, SnapshotCache};
use crate::domain::entities::{TodoId, TodoRecord};
use crate::domain::error::DomainError;
use crate::domain::types::TodoAction;

const TODO_ENTITY: &str = "todo";

#[derive(Debug, Error)]
pub enum TodoServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("edit requires a task")]
    MissingTask,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateTodoCommand {
    pub task: String,
    pub owner: String,
}

/// Raw action request as submitted by the row forms.
#[derive(Debug, Clone)]
pub struct TodoActionCommand {
    pub id: TodoId,
    pub method: String,
    pub task: Option<String>,
    pub owner: String,
}

/// Records visible under an optional owner filter.
#[derive(Debug, Clone)]
pub struct OwnerListing {
    pub todos: Vec<TodoRecord>,
    pub owner: Option<String>,
}

#[derive(Clone)]
pub struct TodoService {
    repo: Arc<dyn TodosRepo>,
    cache: Option<Arc<SnapshotCache>>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodosRepo>) -> Self {
        Self { repo, cache: None }
    }

    pub fn with_cache(mut self, cache: Arc<SnapshotCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_cache_opt(mut self, cache: Option<Arc<SnapshotCache>>) -> Self {
        self.cache = cache;
        self
    }

    /// All records in store order.
    pub async fn snapshot(&self) -> Result<Snapshot, TodoServiceError> {
        match &self.cache {
            Some(cache) => {
                let repo = Arc::clone(&self.repo);
                let snapshot = cache.get_snapshot(|| async move { repo.list_all().await }).await?;
                Ok(snapshot)
            }
            None => Ok(self.repo.list_all().await?.into()),
        }
    }

    /// Records owned by `owner`, or every record when the filter is absent or empty.
    pub async fn list_for_owner(
        &self,
        owner: Option<&str>,
    ) -> Result<OwnerListing, TodoServiceError> {
        let snapshot = self.snapshot().await?;
        let owner = owner.filter(|value| !value.is_empty());

        let todos = match owner {
            Some(owner) => snapshot
                .iter()
                .filter(|todo| todo.is_owned_by(owner))
                .cloned()
                .collect(),
            None => snapshot.to_vec(),
        };

        Ok(OwnerListing {
            todos,
            owner: owner.map(str::to_string),
        })
    }

    pub async fn create(&self, command: CreateTodoCommand) -> Result<TodoRecord, TodoServiceError> {
        let record = self
            .repo
            .append(NewTodoParams {
                task: command.task,
                owner: command.owner,
            })
            .await?;
        self.invalidate().await;

        info!(
            target: "todos::store",
            id = record.id,
            owner = %record.owner,
            "Created todo"
        );
        Ok(record)
    }

    pub async fn delete(&self, id: TodoId, owner: &str) -> Result<(), TodoServiceError> {
        if !self.repo.find_and_remove(id, owner).await? {
            return Err(DomainError::not_found(TODO_ENTITY).into());
        }
        self.invalidate().await;

        info!(target: "todos::store", id, owner, "Deleted todo");
        Ok(())
    }

    pub async fn edit(&self, id: TodoId, owner: &str, task: &str) -> Result<(), TodoServiceError> {
        if !self.repo.find_and_update(id, owner, task).await? {
            return Err(DomainError::not_found(TODO_ENTITY).into());
        }
        self.invalidate().await;

        info!(target: "todos::store", id, owner, "Updated todo task");
        Ok(())
    }

    /// Dispatch a row form submission to edit or delete.
    pub async fn apply_action(
        &self,
        command: TodoActionCommand,
    ) -> Result<TodoAction, TodoServiceError> {
        let action = TodoAction::parse(&command.method)?;
        match (action, command.task) {
            (TodoAction::Put, Some(task)) => self.edit(command.id, &command.owner, &task).await?,
            (TodoAction::Put, None) => {
                // a missing record wins over a missing field
                let snapshot = self.snapshot().await?;
                if !snapshot
                    .iter()
                    .any(|todo| todo.matches(command.id, &command.owner))
                {
                    return Err(DomainError::not_found(TODO_ENTITY).into());
                }
                return Err(TodoServiceError::MissingTask);
            }
            (TodoAction::Delete, _) => self.delete(command.id, &command.owner).await?,
        }

        info!(
            target: "todos::store",
            id = command.id,
            owner = %command.owner,
            %action,
            "Applied todo action"
        );
        Ok(action)
    }

    async fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::domain::types::IdStrategy;
    use crate::infra::memory::InMemoryTodos;

    fn service() -> (TodoService, Arc<InMemoryTodos>) {
        let store = Arc::new(InMemoryTodos::new(IdStrategy::Length));
        let cache = Arc::new(SnapshotCache::new(&CacheConfig::default()));
        let service = TodoService::new(store.clone()).with_cache(cache);
        (service, store)
    }

    fn create(task: &str, owner: &str) -> CreateTodoCommand {
        CreateTodoCommand {
            task: task.to_string(),
            owner: owner.to_string(),
        }
    }

    fn action(id: TodoId, method: &str, task: Option<&str>, owner: &str) -> TodoActionCommand {
        TodoActionCommand {
            id,
            method: method.to_string(),
            task: task.map(str::to_string),
            owner: owner.to_string(),
        }
    }

    #[tokio::test]
    async fn created_todo_is_listed_for_its_owner() {
        let (service, _) = service();
        service.create(create("buy milk", "alice")).await.unwrap();
        service.create(create("walk dog", "bob")).await.unwrap();

        let listing = service.list_for_owner(Some("alice")).await.unwrap();

        assert_eq!(listing.owner.as_deref(), Some("alice"));
        assert_eq!(listing.todos, vec![TodoRecord::new(1, "buy milk", "alice")]);
    }

    #[tokio::test]
    async fn empty_owner_filter_lists_everything() {
        let (service, _) = service();
        service.create(create("buy milk", "alice")).await.unwrap();
        service.create(create("walk dog", "bob")).await.unwrap();

        let listing = service.list_for_owner(Some("")).await.unwrap();
        assert!(listing.owner.is_none());
        assert_eq!(listing.todos.len(), 2);

        let listing = service.list_for_owner(None).await.unwrap();
        assert_eq!(listing.todos.len(), 2);
    }

    #[tokio::test]
    async fn unknown_owner_yields_empty_listing() {
        let (service, _) = service();
        service.create(create("buy milk", "alice")).await.unwrap();

        let listing = service.list_for_owner(Some("carol")).await.unwrap();
        assert!(listing.todos.is_empty());
    }

    #[tokio::test]
    async fn reads_observe_mutations_through_the_cache() {
        let (service, _) = service();
        assert!(service.snapshot().await.unwrap().is_empty());

        service.create(create("buy milk", "alice")).await.unwrap();
        assert_eq!(service.snapshot().await.unwrap().len(), 1);

        service.edit(1, "alice", "buy oat milk").await.unwrap();
        assert_eq!(service.snapshot().await.unwrap()[0].task, "buy oat milk");

        service.delete(1, "alice").await.unwrap();
        assert!(service.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_with_wrong_owner_is_not_found_and_keeps_store() {
        let (service, store) = service();
        service.create(create("walk dog", "bob")).await.unwrap();

        let err = service.delete(1, "alice").await.unwrap_err();

        assert!(matches!(
            err,
            TodoServiceError::Domain(DomainError::NotFound { entity: "todo" })
        ));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn put_action_changes_only_the_task() {
        let (service, _) = service();
        service.create(create("buy milk", "alice")).await.unwrap();

        let applied = service
            .apply_action(action(1, "put", Some("buy bread"), "alice"))
            .await
            .unwrap();

        assert_eq!(applied, TodoAction::Put);
        let snapshot = service.snapshot().await.unwrap();
        assert_eq!(snapshot[0], TodoRecord::new(1, "buy bread", "alice"));
    }

    #[tokio::test]
    async fn put_action_without_task_is_rejected() {
        let (service, _) = service();
        service.create(create("buy milk", "alice")).await.unwrap();

        let err = service
            .apply_action(action(1, "put", None, "alice"))
            .await
            .unwrap_err();

        assert!(matches!(err, TodoServiceError::MissingTask));
        assert_eq!(service.snapshot().await.unwrap()[0].task, "buy milk");
    }

    #[tokio::test]
    async fn put_action_without_task_on_unknown_record_is_not_found() {
        let (service, _) = service();
        service.create(create("buy milk", "alice")).await.unwrap();

        let err = service
            .apply_action(action(1, "put", None, "mallory"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TodoServiceError::Domain(DomainError::NotFound { entity: "todo" })
        ));
    }

    #[tokio::test]
    async fn delete_action_removes_the_record() {
        let (service, store) = service();
        service.create(create("buy milk", "alice")).await.unwrap();

        let applied = service
            .apply_action(action(1, "delete", None, "alice"))
            .await
            .unwrap();

        assert_eq!(applied, TodoAction::Delete);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn unknown_action_is_a_validation_error() {
        let (service, store) = service();
        service.create(create("buy milk", "alice")).await.unwrap();

        let err = service
            .apply_action(action(1, "patch", Some("x"), "alice"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TodoServiceError::Domain(DomainError::Validation { .. })
        ));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn uncached_service_reads_store_directly() {
        let store = Arc::new(InMemoryTodos::new(IdStrategy::Length));
        let service = TodoService::new(store.clone());

        service.create(create("buy milk", "alice")).await.unwrap();
        assert_eq!(service.snapshot().await.unwrap().len(), 1);
    }
}
