//! Source discovery: find candidate files.
//!
//! This module handles the first stage of the pipeline - turning include and
//! exclude glob patterns into a deduplicated list of files on disk.
//!
//! ## Example
//!
//! ```rust,ignore
//! use logpicklib::source::FileFinder;
//!
//! let finder = FileFinder::new(&["/var/log/app/*.log"], &["/var/log/app/*.gz"])?;
//! let (files, errors) = finder.find();
//! ```

pub mod finder;

pub use finder::{find_files, validate, FileFinder, FinderError};
