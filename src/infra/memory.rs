//! Process-memory record store.

use std::sync::RwLock;

use async_trait::async_trait;
use metrics::gauge;

use crate::application::repos::{NewTodoParams, RepoError, TodosRepo};
use crate::cache::lock::{rw_read, rw_write};
use crate::domain::entities::{TodoId, TodoRecord};
use crate::domain::types::IdStrategy;

const SOURCE: &str = "infra::memory";
pub(crate) const METRIC_STORE_LEN: &str = "todos_store_len";

#[derive(Default)]
struct StoreState {
    records: Vec<TodoRecord>,
    highest_issued: TodoId,
}

/// Ordered, append-only sequence of todos; every lookup is a linear scan.
pub struct InMemoryTodos {
    strategy: IdStrategy,
    state: RwLock<StoreState>,
}

impl InMemoryTodos {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            state: RwLock::new(StoreState::default()),
        }
    }

    pub fn len(&self) -> usize {
        rw_read(&self.state, SOURCE, "len").records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> Vec<TodoRecord> {
        rw_read(&self.state, SOURCE, "records").records.clone()
    }

    /// Number the record and push it to the end; id choice and append share one lock.
    pub fn insert(&self, task: String, owner: String) -> Result<TodoRecord, RepoError> {
        let mut state = rw_write(&self.state, SOURCE, "insert");
        let id = self.next_id(&state)?;
        let record = TodoRecord { id, task, owner };

        state.highest_issued = state.highest_issued.max(id);
        state.records.push(record.clone());
        gauge!(METRIC_STORE_LEN).set(state.records.len() as f64);
        Ok(record)
    }

    pub fn remove_first(&self, id: TodoId, owner: &str) -> bool {
        let mut state = rw_write(&self.state, SOURCE, "remove_first");
        let Some(position) = state.records.iter().position(|todo| todo.matches(id, owner)) else {
            return false;
        };
        state.records.remove(position);
        gauge!(METRIC_STORE_LEN).set(state.records.len() as f64);
        true
    }

    pub fn update_first(&self, id: TodoId, owner: &str, task: &str) -> bool {
        let mut state = rw_write(&self.state, SOURCE, "update_first");
        match state.records.iter_mut().find(|todo| todo.matches(id, owner)) {
            Some(todo) => {
                todo.task = task.to_string();
                true
            }
            None => false,
        }
    }

    fn next_id(&self, state: &StoreState) -> Result<TodoId, RepoError> {
        let base = match self.strategy {
            IdStrategy::Length => TodoId::try_from(state.records.len())
                .map_err(|_| RepoError::integrity("store length exceeds id range"))?,
            IdStrategy::Monotonic => state.highest_issued,
        };
        base.checked_add(1)
            .ok_or_else(|| RepoError::integrity("todo id space exhausted"))
    }
}

impl Default for InMemoryTodos {
    fn default() -> Self {
        Self::new(IdStrategy::default())
    }
}

#[async_trait]
impl TodosRepo for InMemoryTodos {
    async fn list_all(&self) -> Result<Vec<TodoRecord>, RepoError> {
        Ok(self.records())
    }

    async fn append(&self, params: NewTodoParams) -> Result<TodoRecord, RepoError> {
        self.insert(params.task, params.owner)
    }

    async fn find_and_remove(&self, id: TodoId, owner: &str) -> Result<bool, RepoError> {
        Ok(self.remove_first(id, owner))
    }

    async fn find_and_update(
        &self,
        id: TodoId,
        owner: &str,
        task: &str,
    ) -> Result<bool, RepoError> {
        Ok(self.update_first(id, owner, task))
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    fn seeded(strategy: IdStrategy) -> InMemoryTodos {
        let store = InMemoryTodos::new(strategy);
        store.insert("buy milk".into(), "alice".into()).unwrap();
        store.insert("walk dog".into(), "bob".into()).unwrap();
        store
    }

    #[test]
    fn ids_follow_store_length() {
        let store = seeded(IdStrategy::Length);

        assert_eq!(
            store.records(),
            vec![
                TodoRecord::new(1, "buy milk", "alice"),
                TodoRecord::new(2, "walk dog", "bob"),
            ]
        );
    }

    #[test]
    fn length_strategy_reuses_ids_after_deletion() {
        let store = seeded(IdStrategy::Length);
        assert!(store.remove_first(1, "alice"));

        let created = store.insert("feed cat".into(), "carol".into()).unwrap();

        // length is 1 again, so the new record collides with "walk dog"
        assert_eq!(created.id, 2);
        let ids: Vec<_> = store.records().iter().map(|todo| todo.id).collect();
        assert_eq!(ids, vec![2, 2]);
    }

    #[test]
    fn monotonic_strategy_never_reuses_ids() {
        let store = seeded(IdStrategy::Monotonic);
        assert!(store.remove_first(2, "bob"));

        let created = store.insert("feed cat".into(), "carol".into()).unwrap();
        assert_eq!(created.id, 3);
    }

    #[test]
    fn remove_requires_matching_owner() {
        let store = seeded(IdStrategy::Length);

        assert!(!store.remove_first(2, "alice"));
        assert_eq!(store.len(), 2);

        assert!(store.remove_first(2, "bob"));
        assert_eq!(store.records(), vec![TodoRecord::new(1, "buy milk", "alice")]);
    }

    #[test]
    fn remove_and_update_touch_only_the_first_match() {
        let store = InMemoryTodos::new(IdStrategy::Length);
        store.insert("first".into(), "alice".into()).unwrap();
        store.remove_first(1, "alice");
        store.insert("second".into(), "alice".into()).unwrap();
        store.insert("third".into(), "alice".into()).unwrap();
        store.remove_first(1, "alice");
        store.insert("fourth".into(), "alice".into()).unwrap();
        // [2:third, 2:fourth]
        assert!(store.update_first(2, "alice", "changed"));
        let tasks: Vec<_> = store.records().into_iter().map(|todo| todo.task).collect();
        assert_eq!(tasks, vec!["changed", "fourth"]);

        assert!(store.remove_first(2, "alice"));
        assert_eq!(store.records(), vec![TodoRecord::new(2, "fourth", "alice")]);
    }

    #[test]
    fn update_misses_leave_records_untouched() {
        let store = seeded(IdStrategy::Length);

        assert!(!store.update_first(1, "bob", "steal"));
        assert!(!store.update_first(9, "alice", "ghost"));
        assert_eq!(store.records()[0].task, "buy milk");
    }

    #[test]
    fn store_recovers_from_poisoned_lock() {
        let store = seeded(IdStrategy::Length);

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = store.state.write().expect("store lock should be acquired");
            panic!("poison store lock");
        }));

        store.insert("after panic".into(), "alice".into()).unwrap();
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn repo_trait_delegates_to_store() {
        let store = InMemoryTodos::default();
        let repo: &dyn TodosRepo = &store;

        let created = repo
            .append(NewTodoParams {
                task: "buy milk".into(),
                owner: "alice".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
        assert!(repo.find_and_update(1, "alice", "buy bread").await.unwrap());
        assert_eq!(repo.list_all().await.unwrap()[0].task, "buy bread");
        assert!(repo.find_and_remove(1, "alice").await.unwrap());
        assert!(repo.list_all().await.unwrap().is_empty());
    }
}
