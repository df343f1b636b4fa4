//! Configuration shape for file selection.
//!
//! These types mirror the nested option groups a log agent reads from its
//! config file. They are plain data: nothing is validated here. Validation
//! and compilation happen once, in [`Matcher::new`](crate::Matcher::new).
//!
//! ```toml
//! include = ["/var/log/app/*.log"]
//! exclude = ["/var/log/app/*.debug.log"]
//!
//! [ordering_criteria]
//! regex = 'app\.(?P<seq>\d+)\.log$'
//! top_n = 2
//!
//! [[ordering_criteria.sort_by]]
//! sort_type = "numeric"
//! regex_key = "seq"
//! ascending = false
//! ```

use serde::{Deserialize, Serialize};

/// Which files to consider and how to rank them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    /// Glob patterns to expand (required, non-empty)
    pub include: Vec<String>,
    /// Glob patterns whose matches are removed from the include set
    pub exclude: Vec<String>,
    /// Optional ranking; empty `sort_by` means no ranking
    pub ordering_criteria: OrderingCriteria,
}

impl Criteria {
    /// Create empty criteria. At least one include pattern must be added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add an include pattern
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    /// Builder: add an exclude pattern
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Builder: add multiple include patterns
    pub fn include_many<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.include
            .extend(patterns.iter().map(|p| p.as_ref().to_string()));
        self
    }

    /// Builder: add multiple exclude patterns
    pub fn exclude_many<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.exclude
            .extend(patterns.iter().map(|p| p.as_ref().to_string()));
        self
    }

    /// Builder: set ordering criteria
    pub fn ordering(mut self, ordering: OrderingCriteria) -> Self {
        self.ordering_criteria = ordering;
        self
    }
}

/// Ranking configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingCriteria {
    /// Regex applied to each path to capture sort keys
    pub regex: String,
    /// How many ranked files to keep; 0 means the default of 1
    pub top_n: i64,
    /// Sort rules, first one is the primary key
    pub sort_by: Vec<SortSpec>,
}

impl OrderingCriteria {
    /// Create ordering criteria with the given key regex.
    pub fn new(regex: impl Into<String>) -> Self {
        Self {
            regex: regex.into(),
            ..Self::default()
        }
    }

    /// Builder: set top N
    pub fn top_n(mut self, top_n: i64) -> Self {
        self.top_n = top_n;
        self
    }

    /// Builder: append a sort rule (lower precedence than those already added)
    pub fn sort_by(mut self, spec: SortSpec) -> Self {
        self.sort_by.push(spec);
        self
    }
}

/// One sort rule as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSpec {
    /// `numeric`, `alphabetical` or `timestamp`
    pub sort_type: String,
    /// Capture group name (or 1-based index) holding the key
    pub regex_key: String,
    pub ascending: bool,

    // Timestamp only
    /// strftime-style layout, e.g. `%Y%m%d%H`
    pub layout: String,
    /// IANA timezone name, `Local`, or empty for UTC
    pub location: String,
}

impl SortSpec {
    fn with_type(sort_type: &str, regex_key: impl Into<String>) -> Self {
        Self {
            sort_type: sort_type.to_string(),
            regex_key: regex_key.into(),
            ascending: true,
            ..Self::default()
        }
    }

    /// Ascending numeric sort on a capture group
    pub fn numeric(regex_key: impl Into<String>) -> Self {
        Self::with_type("numeric", regex_key)
    }

    /// Ascending lexical sort on a capture group
    pub fn alphabetical(regex_key: impl Into<String>) -> Self {
        Self::with_type("alphabetical", regex_key)
    }

    /// Ascending timestamp sort on a capture group
    pub fn timestamp(regex_key: impl Into<String>, layout: impl Into<String>) -> Self {
        Self {
            layout: layout.into(),
            ..Self::with_type("timestamp", regex_key)
        }
    }

    /// Builder: set timezone location (timestamp only)
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder: sort ascending
    pub fn ascending(mut self) -> Self {
        self.ascending = true;
        self
    }

    /// Builder: sort descending
    pub fn descending(mut self) -> Self {
        self.ascending = false;
        self
    }
}
