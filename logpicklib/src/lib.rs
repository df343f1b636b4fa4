//! # logpicklib
//!
//! Decide which log files an agent should be tailing right now.
//!
//! ## Overview
//!
//! A log shipper is configured with glob patterns, not file names. Rotation,
//! dated file names, and numbered archives mean the set of files behind those
//! patterns keeps changing. This library turns the configuration into a
//! [`Matcher`] once, then answers "which files?" on every poll:
//!
//! - **Discovery**: expand include globs, subtract exclude globs, deduplicate
//! - **Key extraction**: a regex with capture groups applied to each path
//! - **Ranking**: numeric, alphabetical, and timestamp rules as a stable
//!   multi-key sort, each with its own direction
//! - **Top-N**: keep only the best-ranked files
//!
//! Partial failures (an unreadable directory, a file whose name does not fit
//! the regex, an unparseable timestamp) never abort a call. Every cause is
//! collected into [`Errors`] and returned next to the files that did qualify.
//!
//! ## Example
//!
//! ```rust
//! use logpicklib::{Criteria, Matcher, OrderingCriteria, SortSpec};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! for name in ["app.3.log", "app.1.log", "app.10.log", "notes.txt"] {
//!     fs::write(dir.path().join(name), "").unwrap();
//! }
//!
//! let criteria = Criteria::new()
//!     .include(format!("{}/*.log", dir.path().display()))
//!     .ordering(
//!         OrderingCriteria::new(r"app\.(?P<n>\d+)\.log$")
//!             .top_n(2)
//!             .sort_by(SortSpec::numeric("n").descending()),
//!     );
//!
//! let matcher = Matcher::new(&criteria).unwrap();
//! let selection = matcher.match_files();
//!
//! assert!(selection.errors.is_empty());
//! assert!(selection.files[0].ends_with("app.10.log"));
//! assert!(selection.files[1].ends_with("app.3.log"));
//! ```

pub mod error;
pub mod matcher;
pub mod options;
pub mod query;
pub mod source;

pub use error::{ConfigError, Errors, MatchError, PatternError, SortRuleError};
pub use matcher::{Matcher, Selection, DEFAULT_TOP_N};
pub use options::{Criteria, OrderingCriteria, SortSpec};
pub use query::{Captures, SortKey, SortRule, SortType};
pub use source::FileFinder;

/// Result type for matcher construction
pub type Result<T> = std::result::Result<T, ConfigError>;
