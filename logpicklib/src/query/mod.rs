//! Query processing: extract keys and rank files.
//!
//! This module handles the second stage of the pipeline - ordering the files
//! found by [`source`](crate::source). It provides:
//!
//! - **Extraction**: capture groups from a regex applied to each path
//! - **Sort rules**: numeric, alphabetical and timestamp comparators
//! - **Ranking**: stable multi-key sort over the files whose keys parse
//!
//! ## Example
//!
//! ```rust,ignore
//! use logpicklib::query::{rank, SortRule};
//! use regex::Regex;
//!
//! let regex = Regex::new(r"app\.(?P<n>\d+)\.log$")?;
//! let rules = [SortRule::numeric("n", false)?];
//! let (ranked, errors) = rank(files, &regex, &rules);
//! ```

pub mod extract;
pub mod rank;
pub mod sort;

pub use extract::{extract, Captures};
pub use rank::rank;
pub use sort::{SortKey, SortRule, SortType, Zone};
