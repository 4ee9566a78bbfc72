//! Bin-day recurrence: next weekday occurrence, and whether recycling coincides with it

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use thiserror::Error;

use crate::schedule::BinSchedule;
use crate::task::Task;

/// The given name did not match one of the seven English weekday names
#[derive(Clone, Debug, PartialEq, Error)]
#[error("unrecognized weekday name {name:?}")]
pub struct InvalidWeekdayError {
    name: String,
}

/// Matching is exact and case-sensitive: schedule feeds send proper-cased English names
const WEEKDAY_NAMES: [(&str, Weekday); 7] = [
    ("Monday",    Weekday::Mon),
    ("Tuesday",   Weekday::Tue),
    ("Wednesday", Weekday::Wed),
    ("Thursday",  Weekday::Thu),
    ("Friday",    Weekday::Fri),
    ("Saturday",  Weekday::Sat),
    ("Sunday",    Weekday::Sun),
];

fn weekday_from_name(name: &str) -> Result<Weekday, InvalidWeekdayError> {
    WEEKDAY_NAMES.iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, weekday)| *weekday)
        .ok_or_else(|| InvalidWeekdayError { name: name.to_string() })
}

/// The next calendar date falling on the given weekday, strictly after `reference`.
///
/// The result is 1 to 7 days ahead: when `reference` itself falls on the target weekday, the occurrence is a full week away, never `reference` itself
pub fn next_occurrence(weekday_name: &str, reference: NaiveDate) -> Result<NaiveDate, InvalidWeekdayError> {
    let target = weekday_from_name(weekday_name)?;

    // Monday=0 .. Sunday=6 on both sides of the subtraction
    let target_index = target.num_days_from_monday() as i64;
    let today_index = reference.weekday().num_days_from_monday() as i64;

    let mut days_ahead = (target_index - today_index + 7) % 7;
    if days_ahead == 0 {
        days_ahead = 7;
    }

    Ok(reference + Duration::days(days_ahead))
}

/// Whether two dates fall on the same calendar day.
/// Both sides are date-only already, so this is a plain year/month/day comparison
pub fn coincides(next_occurrence: NaiveDate, candidate: NaiveDate) -> bool {
    next_occurrence == candidate
}

/// The outcome of evaluating a bin-day schedule against a reference date.
///
/// Carries the human-readable narrative, plus the resolved facts the caller needs to build a derived reminder task
#[derive(Clone, Debug, PartialEq)]
pub struct BinDayReport {
    lines: Vec<String>,
    next_occurrence: Option<NaiveDate>,
    recycling_coincides: bool,
}

impl BinDayReport {
    fn unavailable(reason: &str) -> Self {
        Self {
            lines: vec![reason.to_string()],
            next_occurrence: None,
            recycling_coincides: false,
        }
    }

    /// The narrative, one sentence per line
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn narrative(&self) -> String {
        self.lines.join("\n")
    }

    /// The resolved next bin day, when the schedule had one
    pub fn next_occurrence(&self) -> Option<NaiveDate> {
        self.next_occurrence
    }

    /// Whether the next recycling date falls on the next bin day
    pub fn recycling_coincides(&self) -> bool {
        self.recycling_coincides
    }
}

/// Evaluate a fetched schedule record against a reference date (usually "today").
///
/// A schedule with no weekday, or no next-recycling date, short-circuits into a one-line report without any date arithmetic
pub fn evaluate_schedule(schedule: &BinSchedule, reference: NaiveDate) -> Result<BinDayReport, InvalidWeekdayError> {
    let weekday = match schedule.day_of_week() {
        None => return Ok(BinDayReport::unavailable("no bin day available")),
        Some(day) => day,
    };

    let recycling_date = match schedule.next_recycling_date().and_then(crate::utils::date_part) {
        None => return Ok(BinDayReport::unavailable("no recycling date available")),
        Some(date) => date,
    };

    let next = next_occurrence(weekday, reference)?;
    let recycling_coincides = coincides(next, recycling_date);

    let mut lines = Vec::new();
    lines.push(format!("bin day is {}, next on {}", weekday, next));
    lines.push(format!("next recycling date is {}", recycling_date));
    if recycling_coincides {
        lines.push("remember to take the recycling bin out".to_string());
    } else {
        lines.push("no recycling bin for this bin day".to_string());
    }

    Ok(BinDayReport {
        lines,
        next_occurrence: Some(next),
        recycling_coincides,
    })
}

/// Build the reminder task a report implies, if any.
///
/// The task is dated on the resolved bin day, with its description and time taken from [`settings`](crate::settings). It gets a client-side id: derived reminders are local-only, they are meant for [`TaskCache::add`](crate::cache::TaskCache::add), not for the remote service
pub fn derived_reminder(report: &BinDayReport) -> Option<Task> {
    let next = report.next_occurrence()?;

    let description = crate::settings::REMINDER_DESCRIPTION.lock().unwrap().clone();
    let time = crate::settings::REMINDER_TIME.lock().unwrap().clone();

    Some(Task::from_parts(
        crate::utils::nonce_id(),
        description,
        next.format("%Y-%m-%d").to_string(),
        time,
    ))
}
