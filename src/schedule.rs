//! This module provides a client to the third-party waste-schedule service

use serde::Deserialize;
use url::Url;

use crate::client::RemoteError;

/// One address's weekly collection schedule, as returned by the waste-schedule API.
///
/// The API returns more fields than this; only the three the reminder flow consumes are kept. All of them are optional on the wire, and an absent field makes the recurrence evaluation short-circuit rather than fail
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BinSchedule {
    /// English weekday name of the collection day (e.g. `"Wednesday"`)
    day_of_week: Option<String>,
    /// Timestamp string whose date part is the feed's own idea of the next service date.
    /// The recurrence evaluation recomputes that date from `day_of_week` instead of trusting this field (the feed is sometimes a week stale right after a collection); it is kept so callers can display what the feed said
    recurrence: Option<String>,
    /// Timestamp string whose date part is the next date recycling is included
    next_recycling_date: Option<String>,
}

impl BinSchedule {
    pub fn new(day_of_week: Option<String>, recurrence: Option<String>, next_recycling_date: Option<String>) -> Self {
        Self { day_of_week, recurrence, next_recycling_date }
    }

    pub fn day_of_week(&self) -> Option<&str>         { self.day_of_week.as_deref()         }
    pub fn recurrence(&self) -> Option<&str>          { self.recurrence.as_deref()          }
    pub fn next_recycling_date(&self) -> Option<&str> { self.next_recycling_date.as_deref() }
}

/// A client for the waste-schedule lookup, keyed by street address
pub struct ScheduleClient {
    lookup_url: Url,
    http: reqwest::Client,
}

impl ScheduleClient {
    /// Create a client against the lookup endpoint. This does not start a connection
    pub fn new<S: AsRef<str>>(lookup_url: S) -> Result<Self, url::ParseError> {
        Ok(Self {
            lookup_url: Url::parse(lookup_url.as_ref())?,
            http: reqwest::Client::new(),
        })
    }

    /// Fetch the schedule for an address.
    ///
    /// The service may return several records; only the first one is meaningful, the rest are duplicates for adjacent collection zones. `None` means the address is unknown to the service
    pub async fn lookup(&self, street_number: &str, street_name: &str, suburb: &str) -> Result<Option<BinSchedule>, RemoteError> {
        let mut url = self.lookup_url.clone();
        url.query_pairs_mut()
            .append_pair("street_number", street_number)
            .append_pair("street_name", street_name)
            .append_pair("suburb", suburb);

        let response = self.http
            .get(url)
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(RemoteError::Status(response.status()));
        }

        let mut records = response.json::<Vec<BinSchedule>>().await?;
        if records.is_empty() {
            log::info!("No bin schedule found for {} {} {}", street_number, street_name, suburb);
            return Ok(None);
        }
        Ok(Some(records.remove(0)))
    }
}
