//! Parser for the textual window grammars.
//!
//! Two grammars exist, selected by the request mode. Delay mode uses the
//! recurring grammar `<days>T<hours>` where each field is a concatenation of
//! singles, inclusive ranges and the `*` wildcard. Include/Exclude modes use
//! the interval grammar `<day>T<hour>-<day>T<hour>` describing one contiguous
//! span on the cyclic week, wrapping across the week boundary when the end
//! day precedes the start day.

use lazy_static::lazy_static;
use regex::Regex;

use super::window::{WindowDay, WindowSet};
use crate::error::{Error, Result};
use crate::request::Mode;

// Two-digit hour, 00-23.
const HH: &str = "(?:[01][0-9]|2[0-3])";

lazy_static! {
    static ref DELAY_SPEC: Regex = Regex::new(&format!(
        r"^(?P<days>(?:[1-7]+|[1-7]:[1-7]|\*)+)T(?P<hours>(?:{HH}:{HH}|{HH}|\*)+)$"
    ))
    .unwrap();
    static ref INTERVAL_SPEC: Regex = Regex::new(&format!(
        r"^(?P<from_day>[1-7])T(?P<from_hour>{HH})-(?P<to_day>[1-7])T(?P<to_hour>{HH})$"
    ))
    .unwrap();
    static ref DAY_RANGE: Regex = Regex::new(r"[1-7]:[1-7]").unwrap();
    static ref HOUR_RANGE: Regex = Regex::new(r"[0-9]{2}:[0-9]{2}").unwrap();
}

/// Check every specification against the grammar for `mode`, reporting the
/// first offending literal. Expansion assumes this has passed.
pub fn validate<S: AsRef<str>>(specs: &[S], mode: Mode) -> Result<()> {
    let pattern: &Regex = match mode {
        Mode::Delay => &DELAY_SPEC,
        Mode::Include | Mode::Exclude => &INTERVAL_SPEC,
    };

    for spec in specs {
        if !pattern.is_match(spec.as_ref()) {
            return Err(Error::MalformedScheduleSpec(spec.as_ref().to_string()));
        }
    }

    Ok(())
}

/// Expand a list of window specifications into a canonical [`WindowSet`],
/// merging the per-specification results.
pub fn unpack<S: AsRef<str>>(specs: &[S], mode: Mode) -> Result<WindowSet> {
    validate(specs, mode)?;

    match mode {
        Mode::Delay => unpack_delay(specs),
        Mode::Include | Mode::Exclude => unpack_interval(specs),
    }
}

fn unpack_delay<S: AsRef<str>>(specs: &[S]) -> Result<WindowSet> {
    let mut windows = WindowSet::new();

    for spec in specs {
        let spec = spec.as_ref();
        let caps = DELAY_SPEC
            .captures(spec)
            .ok_or_else(|| Error::MalformedScheduleSpec(spec.to_string()))?;

        let days = resolve_days(&caps["days"]);
        let hours = resolve_hours(&caps["hours"]);

        let mut current = WindowSet::new();
        for &day in &days {
            let mut window_day = WindowDay::new(day);
            for &hour in &hours {
                window_day.add_hour(hour);
            }
            current.add(window_day);
        }

        windows.merge(current);
    }

    Ok(windows)
}

/// Resolve the day field of a recurring specification. A wildcard overrides
/// everything else in the field; otherwise ranges are resolved first and
/// removed, then the remaining digits are taken as discrete days.
fn resolve_days(field: &str) -> Vec<u8> {
    if field.contains('*') {
        return (1..=7).collect();
    }

    let mut days: Vec<u8> = Vec::new();

    for range in DAY_RANGE.find_iter(field) {
        let (min, max) = range_bounds(range.as_str());
        for day in min..=max {
            if !days.contains(&day) {
                days.push(day);
            }
        }
    }

    let singles = DAY_RANGE.replace_all(field, "");
    for ch in singles.chars() {
        if let Some(day) = ch.to_digit(10) {
            let day = day as u8;
            if !days.contains(&day) {
                days.push(day);
            }
        }
    }

    days
}

/// Resolve the hour field of a recurring specification, with the same
/// wildcard-then-ranges-then-singles precedence as the day field.
fn resolve_hours(field: &str) -> Vec<u8> {
    if field.contains('*') {
        return (0..=23).collect();
    }

    let mut hours: Vec<u8> = Vec::new();

    for range in HOUR_RANGE.find_iter(field) {
        let (min, max) = range_bounds(range.as_str());
        for hour in min..=max {
            if !hours.contains(&hour) {
                hours.push(hour);
            }
        }
    }

    let singles = HOUR_RANGE.replace_all(field, "");
    for pair in singles.as_bytes().chunks(2) {
        if let [tens, ones] = pair {
            let hour = (tens - b'0') * 10 + (ones - b'0');
            if !hours.contains(&hour) {
                hours.push(hour);
            }
        }
    }

    hours
}

/// Split a validated `a:b` range literal, normalizing inverted bounds.
fn range_bounds(range: &str) -> (u8, u8) {
    let mut parts = range.split(':');
    let min: u8 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let max: u8 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);

    if max < min {
        (max, min)
    } else {
        (min, max)
    }
}

fn unpack_interval<S: AsRef<str>>(specs: &[S]) -> Result<WindowSet> {
    let mut windows = WindowSet::new();

    for spec in specs {
        let spec = spec.as_ref();
        let caps = INTERVAL_SPEC
            .captures(spec)
            .ok_or_else(|| Error::MalformedScheduleSpec(spec.to_string()))?;

        let from_day: u8 = parse_capture(&caps["from_day"], spec)?;
        let to_day: u8 = parse_capture(&caps["to_day"], spec)?;
        let from_hour: u8 = parse_capture(&caps["from_hour"], spec)?;
        let to_hour: u8 = parse_capture(&caps["to_hour"], spec)?;

        let mut current = WindowSet::new();
        let mut day = from_day;

        // Walk days from the start day, wrapping 7 -> 1. A degenerate
        // interval with equal start/end hours on the same day never meets
        // the closing condition, so the walk is capped at a week plus the
        // revisited start day.
        for processed in 0..8 {
            let is_start = day == from_day && processed == 0;
            let is_end = closes_interval(day, from_day, to_day, from_hour, to_hour, processed);

            let start_hour = if is_start { from_hour } else { 0 };
            let end_hour = if is_end { to_hour } else { 23 };

            let mut window_day = WindowDay::new(day);
            for hour in start_hour..=end_hour {
                window_day.add_hour(hour);
            }
            current.add(window_day);

            if is_end {
                break;
            }

            day = if day == 7 { 1 } else { day + 1 };
        }

        windows.merge(current);
    }

    Ok(windows)
}

/// The interval closes on `day` when it is the end day and either the
/// interval spans distinct days, is a same-day non-wrapping span, or is a
/// same-day wrapping span that has already traversed the full week.
fn closes_interval(
    day: u8,
    from_day: u8,
    to_day: u8,
    from_hour: u8,
    to_hour: u8,
    processed: u8,
) -> bool {
    day == to_day
        && (from_day != to_day
            || from_hour < to_hour
            || (from_hour > to_hour && processed > 0))
}

fn parse_capture(value: &str, spec: &str) -> Result<u8> {
    value
        .parse()
        .map_err(|_| Error::MalformedScheduleSpec(spec.to_string()))
}
