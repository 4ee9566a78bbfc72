//! Per-day reminder tasks

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a task draft was rejected, before any remote call was attempted
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InvalidTaskError {
    #[error("task description must not be empty")]
    EmptyDescription,
    #[error("invalid task date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid task time {0:?}, expected HH:MM (24-hour)")]
    InvalidTime(String),
}

/// A per-day reminder task.
///
/// The four fields below are the whole wire format: when a task comes back from the remote service, any extra field the server added (e.g. an echoed user identifier) is dropped during deserialization, so server data is already normalized by the time it reaches the cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique within a process lifetime. Server-assigned when the task went through [`create`](crate::cache::TaskCache::create), client-assigned otherwise
    id: i64,
    description: String,
    /// The day this task belongs to (`YYYY-MM-DD`), which is also its date-key in the cache
    date: String,
    /// 24-hour `HH:MM`
    time: String,
}

impl Task {
    /// Assemble a Task from its raw parts, without validating them.
    ///
    /// This is meant for data echoed by the server, which is passed through as-is. User input should go through [`TaskDraft::new`] instead
    pub fn from_parts(id: i64, description: String, date: String, time: String) -> Self {
        Self { id, description, date, time }
    }

    pub fn id(&self) -> i64           { self.id           }
    pub fn description(&self) -> &str { &self.description }
    pub fn date(&self) -> &str        { &self.date        }
    pub fn time(&self) -> &str        { &self.time        }
}

/// A task the user has typed in but the server does not know about yet: same fields as [`Task`], minus the id
#[derive(Clone, Debug, PartialEq)]
pub struct TaskDraft {
    description: String,
    date: String,
    time: String,
}

impl TaskDraft {
    /// Validate user input into a draft ready for [`create`](crate::cache::TaskCache::create)
    pub fn new<S: ToString, T: ToString, U: ToString>(description: S, date: T, time: U) -> Result<Self, InvalidTaskError> {
        let description = description.to_string();
        let date = date.to_string();
        let time = time.to_string();

        if description.trim().is_empty() {
            return Err(InvalidTaskError::EmptyDescription);
        }
        if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
            return Err(InvalidTaskError::InvalidDate(date));
        }
        if NaiveTime::parse_from_str(&time, "%H:%M").is_err() {
            return Err(InvalidTaskError::InvalidTime(time));
        }

        Ok(Self { description, date, time })
    }

    pub fn description(&self) -> &str { &self.description }
    pub fn date(&self) -> &str        { &self.date        }
    pub fn time(&self) -> &str        { &self.time        }
}
