use async_trait::async_trait;
use serde::Serialize;

use crate::client::RemoteError;
use crate::task::Task;

/// The JSON body sent to the task-creation endpoint.
///
/// `id` is a client-side nonce: the server may keep it, or assign its own and echo it back. Whatever the server returns wins.
#[derive(Clone, Debug, Serialize)]
pub struct TaskPayload {
    pub id: i64,
    pub description: String,
    pub time: String,
    pub date: String,
    pub user_email: String,
}

/// The boundary the [`TaskCache`](crate::cache::TaskCache) drives.
///
/// Implemented by [`RemoteTaskClient`](crate::client::RemoteTaskClient) for the real HTTP service, and by [`MemoryRemote`](crate::mock_remote::MemoryRemote) so tests can mock it.
#[async_trait]
pub trait RemoteSource {
    /// Persist a new task remotely, and return the task as the server recorded it (server-assigned fields included)
    async fn create_task(&self, payload: &TaskPayload) -> Result<Task, RemoteError>;

    /// Delete a task remotely. Deleting an id the server no longer knows about is a success, not an error
    async fn delete_task(&self, task_id: i64) -> Result<(), RemoteError>;

    /// List the given user's tasks for one calendar date, in the server's order
    async fn list_tasks(&self, date: &str, user_email: &str) -> Result<Vec<Task>, RemoteError>;
}
