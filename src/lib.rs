//! This crate provides a way to manage per-day reminder tasks.
//!
//! Tasks are persisted by a remote task service. Because the connection to that service may be slow (or down), this crate keeps the tasks of each day in a local [`cache`](crate::cache::TaskCache), that mediates every read and write: remote-touching operations confirm with the server first, and only apply their change locally once the server agreed.
//!
//! The [`recurrence`] module covers the other half of the crate: given a weekly bin-collection schedule (fetched by [`schedule::ScheduleClient`]), it resolves the next occurrence of the collection weekday and can derive a reminder task from it, ready to be added to the cache.

pub mod traits;

mod task;
pub use task::Task;
pub use task::TaskDraft;
pub use task::InvalidTaskError;

pub mod cache;
pub use cache::TaskCache;

pub mod client;
pub mod schedule;
pub mod recurrence;

pub mod settings;
pub mod utils;

pub mod mock_behaviour;
pub mod mock_remote;
