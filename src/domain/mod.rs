pub mod auth;
pub mod dashboard;
pub mod log;
pub mod measurement;
pub mod onboarding;
pub mod user;
pub(crate) mod wire;

use time::{Date, OffsetDateTime};

/// Current date in UTC. Daily logs are keyed by this, matching the server's
/// notion of "today".
#[must_use]
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// The UTC date `days` days before today, saturating at the calendar's lower
/// bound rather than panicking.
#[must_use]
pub fn days_ago(days: i64) -> Date {
    today_utc()
        .checked_sub(time::Duration::days(days))
        .unwrap_or(Date::MIN)
}
