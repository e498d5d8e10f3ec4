use crate::protocol::{Task, TaskId};

/// The latest full task snapshot from the backend.
///
/// Each successful poll replaces the whole collection; there is no history
/// and no partial merge, so a task the server stops reporting disappears on
/// the next replace, even if the omission was transient.
#[derive(Debug, Default)]
pub struct TaskCache {
    tasks: Vec<Task>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new snapshot, dropping the previous one wholesale.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Current snapshot in server order. Display order equals last-poll
    /// order; nothing here re-sorts.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task in the current snapshot.
    ///
    /// `None` is an expected outcome: the id may come from a row rendered
    /// before the task dropped out of a later snapshot.
    pub fn find_by_id(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task(id: i64, state: &str) -> Task {
        serde_json::from_value(json!({"id": id, "state": state})).unwrap()
    }

    #[test]
    fn preserves_server_order() {
        let mut cache = TaskCache::new();
        cache.replace_all(vec![task(9, "done"), task(2, "queued"), task(5, "running")]);
        let ids: Vec<String> = cache.all().iter().map(|t| t.id.to_string()).collect();
        assert_eq!(ids, ["9", "2", "5"]);
    }

    #[test]
    fn find_by_id_hits_and_misses() {
        let mut cache = TaskCache::new();
        cache.replace_all(vec![task(5, "queued")]);
        assert!(cache.find_by_id(&TaskId::Number(5)).is_some());
        assert!(cache.find_by_id(&TaskId::Number(6)).is_none());
    }

    #[test]
    fn ids_from_a_prior_snapshot_go_stale() {
        let mut cache = TaskCache::new();
        cache.replace_all(vec![task(5, "queued"), task(6, "queued")]);
        cache.replace_all(vec![task(6, "running")]);
        assert!(cache.find_by_id(&TaskId::Number(5)).is_none());
        assert_eq!(
            cache.find_by_id(&TaskId::Number(6)).unwrap().state,
            "running"
        );
    }
}
