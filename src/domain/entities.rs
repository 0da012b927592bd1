//! Records held by the todo store.

pub type TodoId = u64;

/// A single work item. `id` and `owner` are fixed at creation; only `task` changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRecord {
    pub id: TodoId,
    pub task: String,
    pub owner: String,
}

impl TodoRecord {
    pub fn new(id: TodoId, task: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id,
            task: task.into(),
            owner: owner.into(),
        }
    }

    /// Exact, case-sensitive match on both identity fields.
    pub fn matches(&self, id: TodoId, owner: &str) -> bool {
        self.id == id && self.owner == owner
    }

    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.owner == owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_requires_both_id_and_owner() {
        let todo = TodoRecord::new(3, "water plants", "alice");

        assert!(todo.matches(3, "alice"));
        assert!(!todo.matches(3, "bob"));
        assert!(!todo.matches(4, "alice"));
    }

    #[test]
    fn owner_match_is_case_sensitive() {
        let todo = TodoRecord::new(1, "buy milk", "alice");

        assert!(todo.is_owned_by("alice"));
        assert!(!todo.is_owned_by("Alice"));
        assert!(!todo.matches(1, "ALICE"));
    }
}
