//! Error types for logpicklib
//!
//! Construction failures ([`ConfigError`]) are fatal: no [`Matcher`](crate::Matcher)
//! is built. Call-time failures ([`MatchError`]) never abort a scan; they are
//! collected into an [`Errors`] value that travels alongside whatever files
//! were selected.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::query::SortType;

/// Invalid glob pattern
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid glob pattern '{pattern}': {message}")]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}

/// Errors raised while building a single sort rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortRuleError {
    #[error("'regex_key' must be specified")]
    EmptyKey,

    #[error("'layout' must be specified")]
    EmptyLayout,

    #[error("invalid layout '{0}'")]
    InvalidLayout(String),

    #[error("unknown location '{0}'")]
    UnknownLocation(String),
}

/// Errors that prevent a matcher from being constructed
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("'include' must be specified")]
    MissingInclude,

    #[error("include: {0}")]
    Include(#[source] PatternError),

    #[error("exclude: {0}")]
    Exclude(#[source] PatternError),

    #[error("'regex' must be specified when 'sort_by' is specified")]
    MissingRegex,

    #[error("'sort_by' must be specified when 'regex' is specified")]
    MissingSortBy,

    #[error("'top_n' must be a positive integer, got {0}")]
    NegativeTopN(i64),

    #[error("compile regex: {0}")]
    Regex(#[from] regex::Error),

    #[error("unknown sort_type '{0}'")]
    UnknownSortType(String),

    #[error("{sort_type} sort: {source}")]
    Sort {
        sort_type: SortType,
        #[source]
        source: SortRuleError,
    },
}

/// A single non-fatal cause encountered while matching files
#[derive(Error, Debug)]
pub enum MatchError {
    /// Nothing survived discovery or ranking
    #[error("no files match the configured criteria")]
    NoMatch,

    /// Filesystem failure while expanding an include pattern
    #[error("scan '{pattern}' at '{path}': {source}")]
    Scan {
        pattern: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ordering regex does not match the path
    #[error("'{path}' does not match regex")]
    NoRegexMatch { path: PathBuf },

    /// The regex matched but the sort key group did not participate
    #[error("'{path}': key '{key}' not found in captures")]
    MissingKey { path: PathBuf, key: String },

    /// The captured key could not be parsed for its sort type
    #[error("'{path}': parse {sort_type} key '{key}' from '{value}': {message}")]
    ParseKey {
        path: PathBuf,
        key: String,
        value: String,
        sort_type: SortType,
        message: String,
    },
}

impl MatchError {
    /// Nothing matched the configured criteria.
    pub fn is_no_match(&self) -> bool {
        matches!(self, MatchError::NoMatch)
    }

    /// A filesystem failure during discovery.
    pub fn is_scan(&self) -> bool {
        matches!(self, MatchError::Scan { .. })
    }

    /// A per-file key extraction or parse failure during ranking.
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            MatchError::NoRegexMatch { .. }
                | MatchError::MissingKey { .. }
                | MatchError::ParseKey { .. }
        )
    }

    /// The path this cause refers to, if it is about a single file.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            MatchError::NoMatch => None,
            MatchError::Scan { path, .. }
            | MatchError::NoRegexMatch { path }
            | MatchError::MissingKey { path, .. }
            | MatchError::ParseKey { path, .. } => Some(path),
        }
    }
}

/// Aggregate of every non-fatal cause from one `match_files` call.
///
/// Joining is associative and the empty value is the identity, so each stage
/// folds its own causes in without caring whether earlier stages failed.
#[derive(Debug, Default)]
pub struct Errors {
    causes: Vec<MatchError>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine two aggregates, keeping `self`'s causes first.
    pub fn join(mut self, other: Errors) -> Self {
        self.causes.extend(other.causes);
        self
    }

    pub fn push(&mut self, cause: MatchError) {
        self.causes.push(cause);
    }

    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.causes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchError> {
        self.causes.iter()
    }

    /// True when one of the causes is [`MatchError::NoMatch`].
    pub fn has_no_match(&self) -> bool {
        self.causes.iter().any(MatchError::is_no_match)
    }

    /// `Ok(())` when there is nothing to report.
    pub fn into_result(self) -> std::result::Result<(), Errors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cause) in self.causes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Errors {}

impl From<MatchError> for Errors {
    fn from(cause: MatchError) -> Self {
        Self {
            causes: vec![cause],
        }
    }
}

impl FromIterator<MatchError> for Errors {
    fn from_iter<I: IntoIterator<Item = MatchError>>(iter: I) -> Self {
        Self {
            causes: iter.into_iter().collect(),
        }
    }
}

impl Extend<MatchError> for Errors {
    fn extend<I: IntoIterator<Item = MatchError>>(&mut self, iter: I) {
        self.causes.extend(iter);
    }
}

impl IntoIterator for Errors {
    type Item = MatchError;
    type IntoIter = std::vec::IntoIter<MatchError>;

    fn into_iter(self) -> Self::IntoIter {
        self.causes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a MatchError;
    type IntoIter = std::slice::Iter<'a, MatchError>;

    fn into_iter(self) -> Self::IntoIter {
        self.causes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_regex(path: &str) -> MatchError {
        MatchError::NoRegexMatch {
            path: PathBuf::from(path),
        }
    }

    fn paths(errors: &Errors) -> Vec<String> {
        errors
            .iter()
            .filter_map(|e| e.path())
            .map(|p| p.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_empty_is_identity() {
        let joined = Errors::new().join(Errors::from(no_regex("a")));
        assert_eq!(paths(&joined), vec!["a"]);

        let joined = Errors::from(no_regex("a")).join(Errors::new());
        assert_eq!(paths(&joined), vec!["a"]);

        assert!(Errors::new().join(Errors::new()).is_empty());
    }

    #[test]
    fn test_join_is_associative() {
        let left = Errors::from(no_regex("a"))
            .join(Errors::from(no_regex("b")))
            .join(Errors::from(no_regex("c")));
        let right = Errors::from(no_regex("a"))
            .join(Errors::from(no_regex("b")).join(Errors::from(no_regex("c"))));

        assert_eq!(paths(&left), paths(&right));
        assert_eq!(paths(&left), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_display_one_cause_per_line() {
        let errors: Errors = vec![MatchError::NoMatch, no_regex("/logs/x.log")]
            .into_iter()
            .collect();

        assert_eq!(
            errors.to_string(),
            "no files match the configured criteria\n'/logs/x.log' does not match regex"
        );
    }

    #[test]
    fn test_classification() {
        let scan = MatchError::Scan {
            pattern: "/logs/*".to_string(),
            path: PathBuf::from("/logs/private"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(scan.is_scan());
        assert!(!scan.is_extraction());

        let missing = MatchError::MissingKey {
            path: PathBuf::from("a.log"),
            key: "n".to_string(),
        };
        assert!(missing.is_extraction());
        assert!(!missing.is_no_match());

        let mut errors = Errors::from(scan);
        assert!(!errors.has_no_match());
        errors.push(MatchError::NoMatch);
        assert!(errors.has_no_match());
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_into_result() {
        assert!(Errors::new().into_result().is_ok());
        assert!(Errors::from(MatchError::NoMatch).into_result().is_err());
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::Include(PatternError {
            pattern: "[bad".to_string(),
            message: "invalid range pattern".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "include: invalid glob pattern '[bad': invalid range pattern"
        );

        let err = ConfigError::Sort {
            sort_type: SortType::Timestamp,
            source: SortRuleError::UnknownLocation("Mars/Base".to_string()),
        };
        assert_eq!(err.to_string(), "timestamp sort: unknown location 'Mars/Base'");
    }
}
