//! Typed sort rules over captured keys.
//!
//! A [`SortRule`] is compiled once from configuration. At ranking time it
//! turns a file's [`Captures`] into a [`SortKey`] and compares two keys,
//! honoring its own direction.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::format::{self, Item, Numeric, Parsed, StrftimeItems};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::extract::Captures;
use crate::error::{ConfigError, MatchError, SortRuleError};
use crate::options::SortSpec;

/// Kind of comparison a sort rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortType {
    /// Signed decimal integers
    Numeric,
    /// Byte-wise string comparison
    Alphabetical,
    /// Instants parsed with a layout and timezone
    Timestamp,
}

impl FromStr for SortType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "numeric" | "number" => Ok(SortType::Numeric),
            "alphabetical" | "alpha" | "lexical" => Ok(SortType::Alphabetical),
            "timestamp" | "temporal" => Ok(SortType::Timestamp),
            _ => Err(format!("Unknown sort type: {}", s)),
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortType::Numeric => "numeric",
            SortType::Alphabetical => "alphabetical",
            SortType::Timestamp => "timestamp",
        })
    }
}

/// Timezone used to interpret timestamps without an explicit offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Named(Tz),
    Local,
}

impl Zone {
    /// Empty means UTC, `Local` is the host zone, anything else is an IANA name.
    pub fn resolve(location: &str) -> Result<Self, SortRuleError> {
        match location {
            "" => Ok(Zone::Named(Tz::UTC)),
            "Local" => Ok(Zone::Local),
            name => name
                .parse::<Tz>()
                .map(Zone::Named)
                .map_err(|_| SortRuleError::UnknownLocation(name.to_string())),
        }
    }

    fn instant(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Zone::Named(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Zone::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// A parsed, comparable key.
///
/// A given rule always yields the same variant, so the derived ordering only
/// ever compares like with like.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Number(i64),
    Text(String),
    Instant(DateTime<Utc>),
}

/// One compiled comparator in the ranking chain.
#[derive(Debug, Clone)]
pub enum SortRule {
    Numeric {
        key: String,
        ascending: bool,
    },
    Alphabetical {
        key: String,
        ascending: bool,
    },
    Timestamp {
        key: String,
        ascending: bool,
        layout: String,
        zone: Zone,
    },
}

fn require_key(key: &str) -> Result<String, SortRuleError> {
    if key.is_empty() {
        return Err(SortRuleError::EmptyKey);
    }
    Ok(key.to_string())
}

impl SortRule {
    pub fn numeric(key: &str, ascending: bool) -> Result<Self, SortRuleError> {
        Ok(SortRule::Numeric {
            key: require_key(key)?,
            ascending,
        })
    }

    pub fn alphabetical(key: &str, ascending: bool) -> Result<Self, SortRuleError> {
        Ok(SortRule::Alphabetical {
            key: require_key(key)?,
            ascending,
        })
    }

    /// Build a timestamp rule. `layout` uses strftime syntax.
    pub fn timestamp(
        key: &str,
        ascending: bool,
        layout: &str,
        location: &str,
    ) -> Result<Self, SortRuleError> {
        let key = require_key(key)?;
        if layout.is_empty() {
            return Err(SortRuleError::EmptyLayout);
        }
        if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
            return Err(SortRuleError::InvalidLayout(layout.to_string()));
        }
        Ok(SortRule::Timestamp {
            key,
            ascending,
            layout: layout.to_string(),
            zone: Zone::resolve(location)?,
        })
    }

    /// Compile a rule from its configuration form.
    pub fn from_spec(spec: &SortSpec) -> Result<Self, ConfigError> {
        let sort_type: SortType = spec
            .sort_type
            .parse()
            .map_err(|_| ConfigError::UnknownSortType(spec.sort_type.clone()))?;

        let rule = match sort_type {
            SortType::Numeric => SortRule::numeric(&spec.regex_key, spec.ascending),
            SortType::Alphabetical => SortRule::alphabetical(&spec.regex_key, spec.ascending),
            SortType::Timestamp => SortRule::timestamp(
                &spec.regex_key,
                spec.ascending,
                &spec.layout,
                &spec.location,
            ),
        };
        rule.map_err(|source| ConfigError::Sort { sort_type, source })
    }

    pub fn sort_type(&self) -> SortType {
        match self {
            SortRule::Numeric { .. } => SortType::Numeric,
            SortRule::Alphabetical { .. } => SortType::Alphabetical,
            SortRule::Timestamp { .. } => SortType::Timestamp,
        }
    }

    /// Capture group this rule reads.
    pub fn key(&self) -> &str {
        match self {
            SortRule::Numeric { key, .. }
            | SortRule::Alphabetical { key, .. }
            | SortRule::Timestamp { key, .. } => key,
        }
    }

    pub fn is_ascending(&self) -> bool {
        match self {
            SortRule::Numeric { ascending, .. }
            | SortRule::Alphabetical { ascending, .. }
            | SortRule::Timestamp { ascending, .. } => *ascending,
        }
    }

    /// Read and parse this rule's key for one file.
    pub fn sort_key(&self, path: &Path, captures: &Captures) -> Result<SortKey, MatchError> {
        let key = self.key();
        let value = captures.get(key).ok_or_else(|| MatchError::MissingKey {
            path: path.to_path_buf(),
            key: key.to_string(),
        })?;

        let parsed = match self {
            SortRule::Numeric { .. } => value
                .parse::<i64>()
                .map(SortKey::Number)
                .map_err(|e| e.to_string()),
            SortRule::Alphabetical { .. } => Ok(SortKey::Text(value.to_string())),
            SortRule::Timestamp { layout, zone, .. } => {
                parse_instant(value, layout, zone).map(SortKey::Instant)
            }
        };

        parsed.map_err(|message| MatchError::ParseKey {
            path: path.to_path_buf(),
            key: key.to_string(),
            value: value.to_string(),
            sort_type: self.sort_type(),
            message,
        })
    }

    /// Compare two keys produced by this rule.
    pub fn compare(&self, a: &SortKey, b: &SortKey) -> Ordering {
        let ordering = a.cmp(b);
        if self.is_ascending() {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

/// Parse `value` with a strftime `layout` into an absolute instant.
///
/// Missing hour and minute fields default to zero and a missing day of month
/// defaults to the first. An offset parsed from the value takes precedence
/// over `zone`; epoch seconds (`%s`) are absolute and ignore it.
fn parse_instant(value: &str, layout: &str, zone: &Zone) -> Result<DateTime<Utc>, String> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, value, StrftimeItems::new(layout)).map_err(|e| e.to_string())?;

    let is_epoch = StrftimeItems::new(layout)
        .any(|item| matches!(item, Item::Numeric(Numeric::Timestamp, _)));
    if is_epoch {
        return parsed
            .to_datetime_with_timezone(&Utc)
            .map_err(|e| e.to_string());
    }

    // set_* refuses to overwrite a field that was already parsed
    let _ = parsed.set_hour(0);
    let _ = parsed.set_minute(0);

    if parsed.to_naive_date().is_err() {
        let mut first_day = parsed.clone();
        if first_day.set_day(1).is_ok() && first_day.to_naive_date().is_ok() {
            parsed = first_day;
        }
    }

    if parsed.to_fixed_offset().is_ok() {
        return parsed
            .to_datetime()
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| e.to_string());
    }

    let date = parsed.to_naive_date().map_err(|e| e.to_string())?;
    let time = parsed.to_naive_time().map_err(|e| e.to_string())?;
    let naive = NaiveDateTime::new(date, time);
    zone.instant(&naive)
        .ok_or_else(|| format!("local time {naive} does not exist in this location"))
}
