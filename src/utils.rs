///! Some utility functions

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::task::Task;

/// Extract the calendar-date part of a timestamp string such as `2024-03-06T00:00:00`.
/// Time-of-day and timezone offset are irrelevant to recurrence decisions, so everything after the `T` is ignored
pub fn date_part(timestamp: &str) -> Option<NaiveDate> {
    let date = timestamp.split('T').next().unwrap_or(timestamp);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// The next client-side id to hand out. Seeded from epoch milliseconds so ids keep growing across restarts, then bumped per call so back-to-back calls never collide
static NEXT_ID: Lazy<AtomicI64> = Lazy::new(|| AtomicI64::new(chrono::Utc::now().timestamp_millis()));

/// Generate a client-side task id, unique within this process lifetime.
///
/// A nonce is all this needs to be: the server's echoed id replaces it for tasks that go remote, and local-only tasks just need to not collide with each other
pub fn nonce_id() -> i64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A debug utility that pretty-prints a cache snapshot
pub fn print_task_lists(slots: &HashMap<String, Vec<Task>>) {
    for (date_key, tasks) in slots {
        println!("DAY {}", date_key);
        for task in tasks {
            println!("    * {} {}\t(id {})", task.time(), task.description(), task.id());
        }
    }
}
