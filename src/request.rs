//! Request surface: the validated, immutable description of one feed
//! filtering request, plus the fingerprint used as its cache key.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::schedule::parser;

/// Selects both the window grammar accepted and how the expanded window set
/// is applied to feed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Delay,
    Include,
    Exclude,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Delay => "Delay",
            Mode::Include => "Include",
            Mode::Exclude => "Exclude",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("delay") {
            Ok(Mode::Delay)
        } else if s.eq_ignore_ascii_case("include") {
            Ok(Mode::Include)
        } else if s.eq_ignore_ascii_case("exclude") {
            Ok(Mode::Exclude)
        } else {
            Err(Error::InvalidMode(s.to_string()))
        }
    }
}

/// A fully validated feed filtering request.
///
/// Instances only exist after every field has been checked: the window
/// specifications against the grammar for the chosen mode, the timezone
/// against the IANA database and the limit against non-negativity. Values
/// are immutable once constructed.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    url: String,
    mode: Mode,
    when: Vec<String>,
    timezone: Tz,
    categories: Vec<String>,
    limit: usize,
    enforce_chronology: bool,
}

impl ScheduleRequest {
    pub fn new(
        url: impl Into<String>,
        mode: Mode,
        when: Vec<String>,
        timezone: &str,
        categories: Vec<String>,
        limit: i64,
        enforce_chronology: bool,
    ) -> Result<Self> {
        parser::validate(&when, mode)?;

        let timezone: Tz = timezone
            .parse()
            .map_err(|_| Error::InvalidTimezone(timezone.to_string()))?;

        if limit < 0 {
            return Err(Error::InvalidLimit(limit));
        }

        Ok(Self {
            url: url.into(),
            mode,
            when,
            timezone,
            categories,
            limit: limit as usize,
            enforce_chronology,
        })
    }

    /// Build a request from an inbound query string, accepting an optional
    /// leading `?`. Unknown fields are ignored; missing fields fall back to
    /// their defaults (mode Delay, timezone UTC, limit 0, chronology off).
    pub fn from_query(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let fields: HashMap<String, String> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        let url = fields
            .get("url")
            .filter(|u| !u.is_empty())
            .ok_or(Error::InvalidParameter {
                field: "url",
                value: String::new(),
            })?;

        let mode = match fields.get("mode") {
            Some(raw) => raw.parse()?,
            None => Mode::Delay,
        };

        let when = fields
            .get("when")
            .map(|raw| raw.split(',').map(str::to_string).collect())
            .unwrap_or_default();

        let timezone = fields.get("timezone").map(String::as_str).unwrap_or("UTC");

        let categories = fields
            .get("categories")
            .map(|raw| raw.split(',').map(str::to_string).collect())
            .unwrap_or_default();

        let limit = match fields.get("limit") {
            Some(raw) => raw.parse().map_err(|_| Error::InvalidParameter {
                field: "limit",
                value: raw.clone(),
            })?,
            None => 0,
        };

        let enforce_chronology = match fields.get("enforceChronology") {
            Some(raw) if raw.eq_ignore_ascii_case("true") => true,
            Some(raw) if raw.eq_ignore_ascii_case("false") => false,
            Some(raw) => {
                return Err(Error::InvalidParameter {
                    field: "enforceChronology",
                    value: raw.clone(),
                })
            }
            None => false,
        };

        Self::new(
            url.as_str(),
            mode,
            when,
            timezone,
            categories,
            limit,
            enforce_chronology,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn when(&self) -> &[String] {
        &self.when
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn enforce_chronology(&self) -> bool {
        self.enforce_chronology
    }

    /// Deterministic cache key: every request field, one per line, hashed
    /// with SHA-256 and rendered as uppercase hex. Any change to any field
    /// changes the fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut buf = String::new();
        buf.push_str(&self.url);
        buf.push('\n');
        buf.push_str(self.mode.as_str());
        buf.push('\n');

        for spec in &self.when {
            buf.push_str(spec);
            buf.push('\n');
        }

        buf.push_str(self.timezone.name());
        buf.push('\n');

        for category in &self.categories {
            buf.push_str(category);
            buf.push('\n');
        }

        buf.push_str(if self.enforce_chronology { "true" } else { "false" });
        buf.push('\n');
        buf.push_str(&self.limit.to_string());
        buf.push('\n');

        let digest = Sha256::digest(buf.as_bytes());
        digest.iter().map(|b| format!("{b:02X}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_query_string() {
        let query = "?url=https://foo.com/rss&mode=Delay&when=1:5T0620,6:7T18&limit=10&categories=Foo,!Bar&timezone=Europe/London";

        let request = ScheduleRequest::from_query(query).unwrap();

        assert_eq!(request.url(), "https://foo.com/rss");
        assert_eq!(request.mode(), Mode::Delay);
        assert_eq!(request.when(), ["1:5T0620", "6:7T18"]);
        assert_eq!(request.limit(), 10);
        assert_eq!(request.categories(), ["Foo", "!Bar"]);
        assert_eq!(request.timezone().name(), "Europe/London");
        assert!(!request.enforce_chronology());
    }

    #[test]
    fn defaults_apply_when_fields_are_absent() {
        let request = ScheduleRequest::from_query("url=https://foo.com/rss").unwrap();

        assert_eq!(request.mode(), Mode::Delay);
        assert!(request.when().is_empty());
        assert_eq!(request.timezone().name(), "UTC");
        assert!(request.categories().is_empty());
        assert_eq!(request.limit(), 0);
        assert!(!request.enforce_chronology());
    }

    #[test]
    fn rejects_unknown_mode() {
        let result = ScheduleRequest::from_query("url=https://foo.com/rss&mode=INVALID");
        assert!(matches!(result, Err(Error::InvalidMode(m)) if m == "INVALID"));
    }

    #[test]
    fn rejects_interval_specs_in_delay_mode() {
        let result =
            ScheduleRequest::from_query("url=https://foo.com/rss&mode=Delay&when=1-5T0620");
        assert!(matches!(result, Err(Error::MalformedScheduleSpec(_))));
    }

    #[test]
    fn rejects_negative_limit() {
        let result = ScheduleRequest::from_query("url=https://foo.com/rss&limit=-100");
        assert!(matches!(result, Err(Error::InvalidLimit(-100))));
    }

    #[test]
    fn rejects_unknown_timezone() {
        let result = ScheduleRequest::from_query("url=https://foo.com/rss&timezone=Foo/Bar");
        assert!(matches!(result, Err(Error::InvalidTimezone(tz)) if tz == "Foo/Bar"));
    }

    #[test]
    fn rejects_missing_url() {
        let result = ScheduleRequest::from_query("mode=Delay&when=1T10");
        assert!(matches!(
            result,
            Err(Error::InvalidParameter { field: "url", .. })
        ));
    }

    #[test]
    fn mode_parsing_is_case_insensitive() {
        assert_eq!("include".parse::<Mode>().unwrap(), Mode::Include);
        assert_eq!("EXCLUDE".parse::<Mode>().unwrap(), Mode::Exclude);
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let a = ScheduleRequest::from_query(
            "url=https://foo.com/rss&when=1T10,2T12&categories=Foo,!Bar&limit=5",
        )
        .unwrap();
        let b = ScheduleRequest::from_query(
            "url=https://foo.com/rss&when=1T10,2T12&categories=Foo,!Bar&limit=5",
        )
        .unwrap();

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
        assert!(a
            .fingerprint()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn fingerprint_changes_with_any_field() {
        let base = "url=https://foo.com/rss&when=1T10,2T12&categories=Foo&limit=5";
        let reference = ScheduleRequest::from_query(base).unwrap().fingerprint();

        let variants = [
            "url=https://foo.com/rss2&when=1T10,2T12&categories=Foo&limit=5",
            "url=https://foo.com/rss&when=2T12,1T10&categories=Foo&limit=5",
            "url=https://foo.com/rss&when=1T10,2T12&categories=Bar&limit=5",
            "url=https://foo.com/rss&when=1T10,2T12&categories=Foo&limit=6",
            "url=https://foo.com/rss&when=1T10,2T12&categories=Foo&limit=5&timezone=Europe/London",
            "url=https://foo.com/rss&when=1T10,2T12&categories=Foo&limit=5&enforceChronology=true",
        ];

        for variant in variants {
            let fingerprint = ScheduleRequest::from_query(variant).unwrap().fingerprint();
            assert_ne!(fingerprint, reference, "variant '{variant}' collided");
        }
    }
}
