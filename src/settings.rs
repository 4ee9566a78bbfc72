//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// Description given to reminder tasks derived from a bin-day schedule.
/// Feel free to override it when initing this library.
pub static REMINDER_DESCRIPTION: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Take the bin out".to_string())));

/// Time of day (24-hour `HH:MM`) given to derived reminder tasks.
/// Feel free to override it when initing this library.
pub static REMINDER_TIME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("07:00".to_string())));
