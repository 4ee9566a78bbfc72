//! This module provides the local, date-keyed task cache
//!
//! The cache is the single owner of the in-memory task lists. Collaborators receive it by handle (constructor injection) and go through its operations, they never touch the mapping directly.
//!
//! Remote-touching operations follow a confirm-then-apply rule: the remote call happens first, and the local mapping is only updated once the server agreed. Either an operation fully succeeds and the cache reflects the new truth, or it fails and the cache is unchanged. The two documented exceptions are the 404-is-success delete and the missing-identity fetch degrade.

use std::collections::HashMap;

use thiserror::Error;

use crate::client::RemoteError;
use crate::task::{Task, TaskDraft};
use crate::traits::{RemoteSource, TaskPayload};

/// A remote operation failed. The cache was left as it was before the call
#[derive(Debug, Error)]
#[error("remote {operation} failed for {date_key}: {source}")]
pub struct CacheError {
    operation: &'static str,
    date_key: String,
    #[source]
    source: RemoteError,
}

impl CacheError {
    fn new(operation: &'static str, date_key: &str, source: RemoteError) -> Self {
        Self {
            operation,
            date_key: date_key.to_string(),
            source,
        }
    }

    /// Which operation failed (`"create"`, `"delete"` or `"fetch"`)
    pub fn operation(&self) -> &str { self.operation }
    /// The date-key the operation was about
    pub fn date_key(&self) -> &str { &self.date_key }
    /// The underlying remote failure
    pub fn remote_error(&self) -> &RemoteError { &self.source }
}

/// The in-memory task store, keyed by calendar date (`YYYY-MM-DD`).
///
/// An absent date-key and an empty list both mean "no tasks for that day": [`get`](TaskCache::get) hides the difference by always returning a slice.
///
/// Every operation takes `&mut self`, so the borrow checker serializes all accesses to one cache instance, including across the single await point of the remote-touching operations. Two operations on the same date-key can therefore never interleave.
pub struct TaskCache<R: RemoteSource> {
    remote: R,
    slots: HashMap<String, Vec<Task>>,
}

impl<R: RemoteSource> TaskCache<R> {
    /// Create an empty cache around the remote source it will drive.
    /// One cache instance is meant to live as long as the user's session
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            slots: HashMap::new(),
        }
    }

    /// Append a task to its day's list, creating the slot if needed.
    ///
    /// Local-only: no remote call, cannot fail. This is where derived reminder tasks land
    pub fn add(&mut self, date_key: &str, task: Task) {
        self.slots.entry(date_key.to_string()).or_insert_with(Vec::new).push(task);
    }

    /// The tasks of one day, in insertion order (or in the server's order right after a fetch).
    /// Days the cache knows nothing about are empty, not `None`
    pub fn get(&self, date_key: &str) -> &[Task] {
        self.slots.get(date_key).map(|tasks| tasks.as_slice()).unwrap_or(&[])
    }

    /// Persist a draft remotely, then add the server's version of it to the cache.
    ///
    /// The draft is sent with a client-side nonce id; whatever the server echoes back (id included) wins over the draft. On failure nothing is added and the error is propagated, so the caller decides what to show
    pub async fn create(&mut self, draft: TaskDraft, user_email: &str) -> Result<Task, CacheError> {
        let payload = TaskPayload {
            id: crate::utils::nonce_id(),
            description: draft.description().to_string(),
            time: draft.time().to_string(),
            date: draft.date().to_string(),
            user_email: user_email.to_string(),
        };

        let confirmed = match self.remote.create_task(&payload).await {
            Ok(task) => task,
            Err(source) => {
                log::warn!("Unable to create task for {}: {}", draft.date(), source);
                return Err(CacheError::new("create", draft.date(), source));
            }
        };

        let date_key = confirmed.date().to_string();
        self.add(&date_key, confirmed.clone());
        Ok(confirmed)
    }

    /// Delete a task remotely, then drop it from its day's list.
    ///
    /// Deleting an id the server has already forgotten is a success (the task is gone either way), so repeating a delete is safe. Any other remote failure is propagated and the list is left untouched
    pub async fn delete(&mut self, date_key: &str, task_id: i64) -> Result<(), CacheError> {
        if let Err(source) = self.remote.delete_task(task_id).await {
            log::warn!("Unable to delete task {} for {}: {}", task_id, date_key, source);
            return Err(CacheError::new("delete", date_key, source));
        }

        if let Some(tasks) = self.slots.get_mut(date_key) {
            tasks.retain(|task| task.id() != task_id);
        }
        Ok(())
    }

    /// Pull one day's tasks from the server and replace the local slot wholesale.
    ///
    /// With no identity at hand there is nothing to ask the server: the slot is set to an empty list and returned, without any network call. On a remote failure the existing slot is kept as-is (or initialized empty if the day was unknown) and the error is propagated
    pub async fn fetch_for_date(&mut self, date_key: &str, identity: Option<&str>) -> Result<&[Task], CacheError> {
        let user_email = match identity {
            None => {
                log::debug!("No user identity available, not fetching tasks for {}", date_key);
                self.slots.insert(date_key.to_string(), Vec::new());
                return Ok(self.get(date_key));
            },
            Some(email) => email,
        };

        match self.remote.list_tasks(date_key, user_email).await {
            Ok(tasks) => {
                self.slots.insert(date_key.to_string(), tasks);
                Ok(self.get(date_key))
            },
            Err(source) => {
                log::warn!("Unable to fetch tasks for {}: {}", date_key, source);
                self.slots.entry(date_key.to_string()).or_insert_with(Vec::new);
                Err(CacheError::new("fetch", date_key, source))
            },
        }
    }

    /// A copy of the whole mapping. Mutating the copy does not affect the cache
    pub fn snapshot(&self) -> HashMap<String, Vec<Task>> {
        self.slots.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use crate::mock_behaviour::MockBehaviour;
    use crate::mock_remote::MemoryRemote;

    const USER: &str = "someone@example.com";

    fn task(id: i64, description: &str, date: &str) -> Task {
        Task::from_parts(id, description.to_string(), date.to_string(), "09:00".to_string())
    }

    #[test]
    fn add_preserves_insertion_order() {
        let mut cache = TaskCache::new(MemoryRemote::new());
        let first = task(1, "first", "2024-04-01");
        let second = task(2, "second", "2024-04-01");

        cache.add("2024-04-01", first.clone());
        cache.add("2024-04-01", second.clone());

        assert_eq!(cache.get("2024-04-01"), &[first, second]);
    }

    #[test]
    fn get_unknown_date_is_empty() {
        let cache = TaskCache::new(MemoryRemote::new());
        assert_eq!(cache.get("1970-01-01"), &[] as &[Task]);
    }

    #[tokio::test]
    async fn create_uses_the_server_assigned_id() {
        let mut cache = TaskCache::new(MemoryRemote::with_server_ids(42));
        let draft = TaskDraft::new("Pay bill", "2024-04-01", "09:00").unwrap();

        let created = cache.create(draft, USER).await.unwrap();

        assert_eq!(created.id(), 42);
        let tasks = cache.get("2024-04-01");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id(), 42);
        assert_eq!(tasks[0].description(), "Pay bill");
    }

    #[tokio::test]
    async fn same_millisecond_creates_get_distinct_ids() {
        // With a server that keeps client nonce ids, back-to-back creates must not collide
        let mut cache = TaskCache::new(MemoryRemote::new());
        let first = cache.create(TaskDraft::new("first", "2024-04-01", "08:00").unwrap(), USER).await.unwrap();
        let second = cache.create(TaskDraft::new("second", "2024-04-01", "08:00").unwrap(), USER).await.unwrap();

        assert_ne!(first.id(), second.id());

        // And an exact delete only takes out the task it names
        cache.delete("2024-04-01", first.id()).await.unwrap();
        let remaining = cache.get("2024-04-01");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id(), second.id());
    }

    #[tokio::test]
    async fn failed_create_leaves_the_cache_unchanged() {
        let behaviour = Arc::new(Mutex::new(MockBehaviour::fail_now(1)));
        let remote = MemoryRemote::new().with_behaviour(Arc::clone(&behaviour));
        let mut cache = TaskCache::new(remote);
        cache.add("2024-04-01", task(1, "already there", "2024-04-01"));
        let before = cache.snapshot();

        let draft = TaskDraft::new("Pay bill", "2024-04-01", "09:00").unwrap();
        let err = cache.create(draft, USER).await.unwrap_err();

        assert_eq!(err.operation(), "create");
        assert_eq!(err.date_key(), "2024-04-01");
        assert_eq!(cache.snapshot(), before);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_task_and_is_idempotent() {
        let mut cache = TaskCache::new(MemoryRemote::new());
        let keep = TaskDraft::new("keep me", "2024-04-01", "08:00").unwrap();
        let drop = TaskDraft::new("drop me", "2024-04-01", "09:00").unwrap();
        cache.create(keep, USER).await.unwrap();
        let doomed = cache.create(drop, USER).await.unwrap();

        cache.delete("2024-04-01", doomed.id()).await.unwrap();
        assert_eq!(cache.get("2024-04-01").len(), 1);
        assert_eq!(cache.get("2024-04-01")[0].description(), "keep me");

        // Second delete: the server no longer knows the id, still a success
        cache.delete("2024-04-01", doomed.id()).await.unwrap();
        assert_eq!(cache.get("2024-04-01").len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_leaves_the_cache_unchanged() {
        let behaviour = Arc::new(Mutex::new(MockBehaviour::new()));
        let remote = MemoryRemote::new().with_behaviour(Arc::clone(&behaviour));
        let mut cache = TaskCache::new(remote);
        let created = cache.create(TaskDraft::new("stay", "2024-04-01", "09:00").unwrap(), USER).await.unwrap();

        behaviour.lock().unwrap().delete_task_behaviour = (0, 1);
        let err = cache.delete("2024-04-01", created.id()).await.unwrap_err();

        assert_eq!(err.operation(), "delete");
        assert_eq!(cache.get("2024-04-01").len(), 1);
    }

    #[tokio::test]
    async fn fetch_without_identity_makes_no_remote_call() {
        // Any remote call would fail loudly; fetch must not make one
        let behaviour = Arc::new(Mutex::new(MockBehaviour::fail_now(u32::MAX)));
        let remote = MemoryRemote::new().with_behaviour(behaviour);
        let mut cache = TaskCache::new(remote);

        let tasks = cache.fetch_for_date("2024-04-01", None).await.unwrap();
        assert!(tasks.is_empty());
        assert_eq!(cache.get("2024-04-01"), &[] as &[Task]);
    }

    #[tokio::test]
    async fn fetch_replaces_the_slot_with_the_server_order() {
        let remote = MemoryRemote::new();
        remote.seed(USER, task(7, "remote says first", "2024-04-01"));
        remote.seed(USER, task(3, "remote says second", "2024-04-01"));
        remote.seed(USER, task(9, "another day", "2024-04-02"));
        remote.seed("else@example.com", task(8, "another user", "2024-04-01"));
        let mut cache = TaskCache::new(remote);
        cache.add("2024-04-01", task(1, "stale local entry", "2024-04-01"));

        let tasks = cache.fetch_for_date("2024-04-01", Some(USER)).await.unwrap();

        let ids: Vec<i64> = tasks.iter().map(|task| task.id()).collect();
        assert_eq!(ids, vec![7, 3]);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_the_existing_slot() {
        let behaviour = Arc::new(Mutex::new(MockBehaviour::new()));
        let remote = MemoryRemote::new().with_behaviour(Arc::clone(&behaviour));
        let mut cache = TaskCache::new(remote);
        let existing = task(1, "still here", "2024-04-01");
        cache.add("2024-04-01", existing.clone());

        behaviour.lock().unwrap().list_tasks_behaviour = (0, 1);
        let err = cache.fetch_for_date("2024-04-01", Some(USER)).await.unwrap_err();

        assert_eq!(err.operation(), "fetch");
        assert_eq!(cache.get("2024-04-01"), &[existing]);

        // An unknown date-key is initialized to an empty slot instead
        behaviour.lock().unwrap().list_tasks_behaviour = (0, 1);
        cache.fetch_for_date("2024-04-02", Some(USER)).await.unwrap_err();
        assert!(cache.snapshot().contains_key("2024-04-02"));
        assert_eq!(cache.get("2024-04-02"), &[] as &[Task]);
    }

    #[test]
    fn snapshot_is_detached_from_the_cache() {
        let mut cache = TaskCache::new(MemoryRemote::new());
        cache.add("2024-04-01", task(1, "original", "2024-04-01"));

        let mut snapshot = cache.snapshot();
        snapshot.get_mut("2024-04-01").unwrap().clear();
        snapshot.insert("2024-05-01".to_string(), vec![task(2, "injected", "2024-05-01")]);

        assert_eq!(cache.get("2024-04-01").len(), 1);
        assert_eq!(cache.get("2024-05-01"), &[] as &[Task]);
    }
}
