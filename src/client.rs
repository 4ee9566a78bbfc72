//! This module provides a client to connect to the remote task service

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::task::Task;
use crate::traits::{RemoteSource, TaskPayload};

/// A failure reported by a remote service, or by the transport underneath it
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never got a usable response (DNS, connection, malformed body...)
    #[error("request could not be performed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a status code the operation does not accept
    #[error("unexpected HTTP status code {0}")]
    Status(StatusCode),
    /// A failure scripted by a [`MockBehaviour`](crate::mock_behaviour::MockBehaviour)
    #[cfg(any(test, feature = "memory_mocks_remote_source"))]
    #[error("{0}")]
    Mocked(String),
}

/// A [`RemoteSource`] that reaches the task service over HTTP
pub struct RemoteTaskClient {
    tasks_url: Url,
    http: reqwest::Client,
}

impl RemoteTaskClient {
    /// Create a client against the service's base URL. This does not start a connection
    pub fn new<S: AsRef<str>>(base_url: S) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url.as_ref())?;
        let tasks_url = base_url.join("tasks")?;

        Ok(Self {
            tasks_url,
            http: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl RemoteSource for RemoteTaskClient {
    async fn create_task(&self, payload: &TaskPayload) -> Result<Task, RemoteError> {
        let response = self.http
            .post(self.tasks_url.clone())
            .json(payload)
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(RemoteError::Status(response.status()));
        }

        // Server-assigned fields take precedence over the draft we sent
        let confirmed = response.json::<Task>().await?;
        log::debug!("Server confirmed task {} for {}", confirmed.id(), confirmed.date());
        Ok(confirmed)
    }

    async fn delete_task(&self, task_id: i64) -> Result<(), RemoteError> {
        let mut url = self.tasks_url.clone();
        url.query_pairs_mut().append_pair("task_id", &task_id.to_string());

        let response = self.http
            .delete(url)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            // The task is already gone, which is what we wanted anyway
            log::debug!("Task {} was already deleted on the server", task_id);
            return Ok(());
        }
        if status.is_success() == false {
            return Err(RemoteError::Status(status));
        }

        Ok(())
    }

    async fn list_tasks(&self, date: &str, user_email: &str) -> Result<Vec<Task>, RemoteError> {
        let mut url = self.tasks_url.clone();
        url.query_pairs_mut()
            .append_pair("date", date)
            .append_pair("user_email", user_email);

        let response = self.http
            .get(url)
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(RemoteError::Status(response.status()));
        }

        // Deserializing into `Task` drops the server-only fields (e.g. the echoed user email)
        let tasks = response.json::<Vec<Task>>().await?;
        Ok(tasks)
    }
}
