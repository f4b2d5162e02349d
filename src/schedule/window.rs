//! Canonical in-memory representation of a weekly schedule: a mapping from
//! weekday to the set of hours during which the window is open.

use std::collections::BTreeSet;

/// One weekday's share of a schedule window.
///
/// Days are ISO numbered: Monday=1 through Sunday=7. Hours are 0-23. Both
/// invariants are upheld by the grammar before a `WindowDay` is ever built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDay {
    day: u8,
    hours: BTreeSet<u8>,
}

impl WindowDay {
    pub fn new(day: u8) -> Self {
        debug_assert!((1..=7).contains(&day));
        Self {
            day,
            hours: BTreeSet::new(),
        }
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn add_hour(&mut self, hour: u8) {
        debug_assert!(hour <= 23);
        self.hours.insert(hour);
    }

    pub fn contains(&self, hour: u8) -> bool {
        self.hours.contains(&hour)
    }

    pub fn hours(&self) -> &BTreeSet<u8> {
        &self.hours
    }
}

/// An expanded schedule: one entry per weekday, unique by weekday.
///
/// Day insertion order is preserved but is not part of the contract;
/// consumers must only rely on (day, hour) membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowSet {
    days: Vec<WindowDay>,
}

impl WindowSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(&self, day: u8) -> Option<&WindowDay> {
        self.days.iter().find(|d| d.day() == day)
    }

    /// Add a single day, unioning hours if the weekday is already present.
    pub fn add(&mut self, source: WindowDay) {
        match self.days.iter_mut().find(|d| d.day() == source.day()) {
            Some(existing) => {
                for &hour in source.hours() {
                    existing.add_hour(hour);
                }
            }
            None => self.days.push(source),
        }
    }

    /// Union another window set into this one. Associative and commutative
    /// with respect to the resulting (day, hour) membership.
    pub fn merge(&mut self, source: WindowSet) {
        for day in source.days {
            self.add(day);
        }
    }

    pub fn contains(&self, day: u8, hour: u8) -> bool {
        self.day(day).is_some_and(|d| d.contains(hour))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowDay> {
        self.days.iter()
    }
}
