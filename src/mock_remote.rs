//! An in-memory stand-in for the remote task service, so tests do not need a network
#![cfg(any(test, feature = "memory_mocks_remote_source"))]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::RemoteError;
use crate::mock_behaviour::MockBehaviour;
use crate::task::Task;
use crate::traits::{RemoteSource, TaskPayload};

struct StoredTask {
    user_email: String,
    task: Task,
}

#[derive(Default)]
struct MemoryState {
    tasks: Vec<StoredTask>,
    /// When set, created tasks get sequential server-side ids instead of keeping the client's nonce
    server_ids: Option<i64>,
}

/// A [`RemoteSource`] backed by a plain in-memory list.
///
/// By default it keeps the client-provided nonce ids, like the simplest possible server; [`with_server_ids`](MemoryRemote::with_server_ids) makes it assign its own instead, which is what the real service does. A shared [`MockBehaviour`] can script failures
pub struct MemoryRemote {
    state: Mutex<MemoryState>,
    behaviour: Arc<Mutex<MockBehaviour>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            behaviour: Arc::new(Mutex::new(MockBehaviour::new())),
        }
    }

    /// A remote that ignores client nonce ids and assigns its own, starting at `first_id`
    pub fn with_server_ids(first_id: i64) -> Self {
        let remote = Self::new();
        remote.state.lock().unwrap().server_ids = Some(first_id);
        remote
    }

    /// Attach a behaviour handle. Keep a clone of the `Arc` around to tweak failures mid-test, after the remote has moved into a cache
    pub fn with_behaviour(mut self, behaviour: Arc<Mutex<MockBehaviour>>) -> Self {
        self.behaviour = behaviour;
        self
    }

    /// Put a task into the "server", bypassing `create_task` and its behaviour checks
    pub fn seed(&self, user_email: &str, task: Task) {
        self.state.lock().unwrap().tasks.push(StoredTask {
            user_email: user_email.to_string(),
            task,
        });
    }
}

#[async_trait]
impl RemoteSource for MemoryRemote {
    async fn create_task(&self, payload: &TaskPayload) -> Result<Task, RemoteError> {
        self.behaviour.lock().unwrap().can_create_task()?;

        let mut state = self.state.lock().unwrap();
        let id = match state.server_ids {
            None => payload.id,
            Some(next_id) => {
                state.server_ids = Some(next_id + 1);
                next_id
            },
        };

        let task = Task::from_parts(id, payload.description.clone(), payload.date.clone(), payload.time.clone());
        state.tasks.push(StoredTask {
            user_email: payload.user_email.clone(),
            task: task.clone(),
        });
        Ok(task)
    }

    async fn delete_task(&self, task_id: i64) -> Result<(), RemoteError> {
        self.behaviour.lock().unwrap().can_delete_task()?;

        // An unknown id behaves like the real service's 404: already gone, not an error
        self.state.lock().unwrap().tasks.retain(|stored| stored.task.id() != task_id);
        Ok(())
    }

    async fn list_tasks(&self, date: &str, user_email: &str) -> Result<Vec<Task>, RemoteError> {
        self.behaviour.lock().unwrap().can_list_tasks()?;

        let state = self.state.lock().unwrap();
        Ok(state.tasks.iter()
            .filter(|stored| stored.user_email == user_email && stored.task.date() == date)
            .map(|stored| stored.task.clone())
            .collect()
        )
    }
}
