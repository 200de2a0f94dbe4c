use crate::api::{ApiClient, Page};
use crate::domain::days_ago;
use crate::domain::log::{DailyLog, DailyLogDraft};
use crate::domain::wire;
use crate::error::Result;
use serde::Serialize;
use time::Date;

use super::absent_as_none;

/// Daily log CRUD. Logs are keyed by calendar date; the server owns the
/// per-day uniqueness, the future-date rejection and the seven-day edit
/// window, and computes `protein_hit`/`calories_ok` from the account's
/// targets.
#[derive(Clone, Debug)]
pub struct LogService {
    client: ApiClient,
}

#[derive(Serialize)]
struct LogWriteBody<'a> {
    #[serde(with = "wire::date")]
    date: Date,
    #[serde(flatten)]
    draft: &'a DailyLogDraft,
}

impl LogService {
    #[must_use]
    pub fn new(client: &ApiClient) -> Self {
        Self { client: client.clone() }
    }

    /// The log for a given date, or `None` when that day was never logged.
    pub async fn get(&self, date: Date) -> Result<Option<DailyLog>> {
        absent_as_none(self.client.get(&detail_path(date)).await)
    }

    pub async fn today(&self) -> Result<Option<DailyLog>> {
        absent_as_none(self.client.get("/logs/today/").await)
    }

    pub async fn yesterday(&self) -> Result<Option<DailyLog>> {
        self.get(days_ago(1)).await
    }

    /// One page of logs, newest first. `since` narrows the range to dates
    /// on or after the given day.
    pub async fn list(&self, since: Option<Date>, page_size: u32) -> Result<Page<DailyLog>> {
        let mut query: Vec<(&str, String)> = vec![("page_size", page_size.to_string())];
        if let Some(since) = since {
            query.push(("date__gte", since.to_string()));
        }
        self.client.get_with_query("/logs/", &query).await
    }

    /// Writes the log for `date`. The server upserts on a duplicate date,
    /// so resubmitting the same day overwrites it rather than failing.
    #[tracing::instrument(skip(self, draft), err(level = "warn"))]
    pub async fn create(&self, date: Date, draft: &DailyLogDraft) -> Result<DailyLog> {
        draft.validate()?;
        self.client.post("/logs/", &LogWriteBody { date, draft }).await
    }

    /// Replaces an existing day's log. Days older than the server's edit
    /// window are rejected with a forbidden status.
    #[tracing::instrument(skip(self, draft), err(level = "warn"))]
    pub async fn update(&self, date: Date, draft: &DailyLogDraft) -> Result<DailyLog> {
        draft.validate()?;
        self.client.put(&detail_path(date), draft).await
    }

    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn delete(&self, date: Date) -> Result<()> {
        self.client.delete(&detail_path(date)).await
    }
}

fn detail_path(date: Date) -> String {
    format!("/logs/{date}/")
}
