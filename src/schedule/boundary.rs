//! Hour-granularity boundary search over a window set.
//!
//! All searches operate on wall-clock time in a caller-supplied timezone but
//! step by absolute hours, so daylight-saving transitions are handled by the
//! timezone projection rather than by naive local arithmetic.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use chrono_tz::Tz;

use super::window::WindowSet;

// A week of hours plus one; the grid is finite, so any non-empty window set
// is found within this bound.
const MAX_SEARCH_HOURS: i64 = 24 * 7;

/// True when `instant`, projected into `tz` and truncated to the hour, falls
/// on a (weekday, hour) cell of `windows`.
pub fn is_within_window(instant: DateTime<Utc>, windows: &WindowSet, tz: Tz) -> bool {
    let local = instant.with_timezone(&tz);
    windows.contains(local.weekday().number_from_monday() as u8, local.hour() as u8)
}

/// The most recent instant, at or before `now`, whose local (weekday, hour)
/// is a member of `windows`. Falls back to `now` itself if nothing matches
/// within a week, which only an empty window set can cause.
pub fn last_boundary_before(now: DateTime<Utc>, windows: &WindowSet, tz: Tz) -> DateTime<Utc> {
    let mut cursor = truncate_to_hour(now.with_timezone(&tz));

    for _ in 0..=MAX_SEARCH_HOURS {
        if windows.contains(cursor.weekday().number_from_monday() as u8, cursor.hour() as u8) {
            return cursor.with_timezone(&Utc);
        }
        cursor = cursor - Duration::hours(1);
    }

    now
}

/// The next instant, strictly after the current truncated hour, whose local
/// (weekday, hour) is a member of `windows`. Same bound and fallback as
/// [`last_boundary_before`].
pub fn next_boundary_after(now: DateTime<Utc>, windows: &WindowSet, tz: Tz) -> DateTime<Utc> {
    let mut cursor = truncate_to_hour(now.with_timezone(&tz)) + Duration::hours(1);

    for _ in 0..=MAX_SEARCH_HOURS {
        if windows.contains(cursor.weekday().number_from_monday() as u8, cursor.hour() as u8) {
            return cursor.with_timezone(&Utc);
        }
        cursor = cursor + Duration::hours(1);
    }

    now
}

/// Zero the local minutes, seconds and sub-second part by subtracting the
/// elapsed time, keeping the projection instant-based.
fn truncate_to_hour(local: DateTime<Tz>) -> DateTime<Tz> {
    local
        - Duration::minutes(local.minute() as i64)
        - Duration::seconds(local.second() as i64)
        - Duration::nanoseconds(local.nanosecond() as i64)
}
