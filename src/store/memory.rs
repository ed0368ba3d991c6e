//! In-memory task store (non-persistent).

use chrono::Local;

use super::{Completion, StoreError, TaskMap, TaskStore};
use crate::task::Task;

/// Task store that lives and dies with the process. Same operation semantics
/// as the file store, minus persistence; the operation tests run against it.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: TaskMap,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn is_persistent(&self) -> bool {
        false
    }

    fn list(&self) -> Vec<&Task> {
        self.tasks.values().collect()
    }

    fn get(&self, title: &str) -> Option<&Task> {
        self.tasks.get(title)
    }

    fn add(&mut self, task: Task) -> Result<(), StoreError> {
        super::add_task(&mut self.tasks, task)
    }

    fn complete(&mut self, title: &str) -> Result<Completion, StoreError> {
        super::complete_task(&mut self.tasks, title, Local::now())
    }

    fn pending_dependencies(&self, title: &str) -> Vec<String> {
        super::pending_dependencies(&self.tasks, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecurrenceWarning;
    use crate::task::{Priority, ValidationError};
    use chrono::Duration;

    fn plain_task(title: &str) -> Task {
        Task::new(title, Priority::Medium, None, vec![], false, None).unwrap()
    }

    fn task_with_deps(title: &str, deps: &[&str]) -> Task {
        Task::new(
            title,
            Priority::High,
            None,
            deps.iter().map(|d| d.to_string()).collect(),
            false,
            None,
        )
        .unwrap()
    }

    #[test]
    fn add_succeeds_once_per_title() {
        let mut store = InMemoryTaskStore::new();
        store.add(plain_task("a")).unwrap();

        let err = store.add(plain_task("a")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTitle(title) if title == "a"));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn add_rejects_unknown_dependencies() {
        let mut store = InMemoryTaskStore::new();
        store.add(plain_task("a")).unwrap();

        let err = store.add(task_with_deps("b", &["a", "ghost"])).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnknownDependency { title, dependency }
                if title == "b" && dependency == "ghost"
        ));
        assert!(store.get("b").is_none());

        // Forward references are impossible, so neither are cycles.
        store.add(task_with_deps("b", &["a"])).unwrap();
    }

    #[test]
    fn duplicate_dependency_entries_are_allowed() {
        let mut store = InMemoryTaskStore::new();
        store.add(plain_task("a")).unwrap();
        store.add(task_with_deps("b", &["a", "a"])).unwrap();

        assert_eq!(store.pending_dependencies("b"), ["a", "a"]);
    }

    #[test]
    fn complete_unknown_title_leaves_store_unmodified() {
        let mut store = InMemoryTaskStore::new();
        store.add(plain_task("a")).unwrap();

        let err = store.complete("ghost").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(title) if title == "ghost"));
        assert!(!store.get("a").unwrap().is_completed());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn complete_does_not_check_dependencies() {
        // Dependency gating lives in the presentation layer; the store
        // completes regardless of pending dependencies.
        let mut store = InMemoryTaskStore::new();
        store.add(plain_task("a")).unwrap();
        store.add(task_with_deps("b", &["a"])).unwrap();

        assert_eq!(store.pending_dependencies("b"), ["a"]);
        store.complete("b").unwrap();
        assert!(store.get("b").unwrap().is_completed());
    }

    #[test]
    fn completing_twice_is_a_noop() {
        let mut store = InMemoryTaskStore::new();
        store
            .add(Task::new("r", Priority::Low, None, vec![], true, Some(5)).unwrap())
            .unwrap();

        let first = store.complete("r").unwrap();
        assert!(matches!(first, Completion::Completed { .. }));

        // No second successor and no state change.
        let second = store.complete("r").unwrap();
        assert_eq!(second, Completion::AlreadyCompleted);
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn pending_dependencies_scenario() {
        let mut store = InMemoryTaskStore::new();
        store.add(plain_task("A")).unwrap();
        store.add(task_with_deps("B", &["A"])).unwrap();

        assert!(matches!(
            store.add(task_with_deps("B", &[])),
            Err(StoreError::DuplicateTitle(_))
        ));

        assert_eq!(store.pending_dependencies("B"), ["A"]);
        store.complete("A").unwrap();
        assert!(store.pending_dependencies("B").is_empty());
    }

    #[test]
    fn pending_dependencies_of_unknown_title_is_empty() {
        let store = InMemoryTaskStore::new();
        assert!(store.pending_dependencies("ghost").is_empty());
    }

    #[test]
    fn missing_dependency_record_counts_as_pending() {
        // Cannot happen through add(), but a hand-edited file can get here;
        // an unverifiable dependency must block, not pass.
        let mut tasks = TaskMap::new();
        let orphan = task_with_deps("b", &["gone"]);
        tasks.insert("b".to_string(), orphan);

        assert_eq!(super::super::pending_dependencies(&tasks, "b"), ["gone"]);
    }

    #[test]
    fn recurring_completion_spawns_successor() {
        let mut store = InMemoryTaskStore::new();
        let deadline = Local::now() + Duration::days(1);
        store
            .add(Task::new("R", Priority::Medium, Some(deadline), vec![], true, Some(3)).unwrap())
            .unwrap();

        let outcome = store.complete("R").unwrap();
        assert_eq!(
            outcome,
            Completion::Completed {
                successor: Some("R (Recurring)".to_string()),
                warning: None
            }
        );

        assert!(store.get("R").unwrap().is_completed());
        let next = store.get("R (Recurring)").unwrap();
        assert_eq!(next.deadline(), Some(deadline + Duration::days(3)));
        assert_eq!(next.recurrence_interval(), Some(3));
        assert!(next.is_recurring());
        assert!(!next.is_completed());
    }

    #[test]
    fn successor_chain_gets_distinct_titles() {
        let mut store = InMemoryTaskStore::new();
        store
            .add(Task::new("R", Priority::Medium, None, vec![], true, Some(3)).unwrap())
            .unwrap();

        store.complete("R").unwrap();
        let outcome = store.complete("R (Recurring)").unwrap();
        assert_eq!(
            outcome,
            Completion::Completed {
                successor: Some("R (Recurring #2)".to_string()),
                warning: None
            }
        );

        let titles: Vec<&str> = store.list().iter().map(|t| t.title()).collect();
        assert_eq!(titles, ["R", "R (Recurring)", "R (Recurring #2)"]);
    }

    #[test]
    fn failed_synthesis_still_completes_the_original() {
        let mut store = InMemoryTaskStore::new();
        let long_root = "x".repeat(100);
        store
            .add(Task::new(long_root.clone(), Priority::Low, None, vec![], true, Some(3)).unwrap())
            .unwrap();

        // The derived title exceeds the length limit, so synthesis fails.
        let outcome = store.complete(&long_root).unwrap();
        match outcome {
            Completion::Completed {
                successor: None,
                warning: Some(RecurrenceWarning::Validation(err)),
            } => assert!(matches!(err, ValidationError::TitleLength(_))),
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert!(store.get(&long_root).unwrap().is_completed());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn successor_dependencies_are_copied() {
        let mut store = InMemoryTaskStore::new();
        store.add(plain_task("prep")).unwrap();
        store
            .add(
                Task::new(
                    "weekly report",
                    Priority::High,
                    None,
                    vec!["prep".to_string()],
                    true,
                    Some(7),
                )
                .unwrap(),
            )
            .unwrap();

        store.complete("weekly report").unwrap();
        let next = store.get("weekly report (Recurring)").unwrap();
        assert_eq!(next.dependencies(), ["prep".to_string()]);
        assert_eq!(next.priority(), Priority::High);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let mut store = InMemoryTaskStore::new();
        for title in ["z", "a", "m"] {
            store.add(plain_task(title)).unwrap();
        }
        let titles: Vec<&str> = store.list().iter().map(|t| t.title()).collect();
        assert_eq!(titles, ["z", "a", "m"]);
        assert!(!store.is_persistent());
    }
}
