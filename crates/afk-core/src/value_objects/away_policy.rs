//! Away-time policy
//!
//! An away flag without an explicit duration clears at a fixed wall-clock boundary:
//! the start of the current day plus 33 hours, i.e. 09:00 the following morning, no
//! matter when during the day the command was issued. The 33 hours are elapsed time,
//! so across a DST change the boundary lands an hour earlier or later on the clock.

use chrono::{DateTime, Duration, NaiveTime, TimeZone};

/// Hours from the start of today to the auto-clear boundary
pub const NEXT_DAY_BOUNDARY_HOURS: i64 = 33;

/// First instant of the calendar day `now` falls on
fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    now.date_naive()
        .and_time(NaiveTime::MIN)
        .and_local_timezone(now.timezone())
        .earliest()
        // Midnight skipped by a DST jump: count back the wall-clock time instead
        .unwrap_or_else(|| now.clone() - now.time().signed_duration_since(NaiveTime::MIN))
}

/// Start of today plus [`NEXT_DAY_BOUNDARY_HOURS`]
#[must_use]
pub fn next_day_boundary<Tz: TimeZone>(now: DateTime<Tz>) -> DateTime<Tz> {
    start_of_day(&now) + Duration::hours(NEXT_DAY_BOUNDARY_HOURS)
}

/// Whole seconds from `now` until `target`, floored and never negative
#[must_use]
pub fn seconds_until<Tz: TimeZone>(now: DateTime<Tz>, target: DateTime<Tz>) -> u64 {
    (target - now).num_seconds().max(0) as u64
}

/// TTL for an away flag that should clear at the next-day boundary
#[must_use]
pub fn seconds_until_next_day_boundary<Tz: TimeZone>(now: DateTime<Tz>) -> u64 {
    let boundary = next_day_boundary(now.clone());
    seconds_until(now, boundary)
}
