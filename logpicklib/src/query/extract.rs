//! Capture-group key extraction.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;

use crate::error::MatchError;

/// Capture groups taken from one path, keyed by group name and by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    values: HashMap<String, String>,
}

impl Captures {
    /// Captured text for a group name or 1-based index.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Apply `regex` to the full path and collect its first match.
///
/// Groups that did not participate in the match are absent. Named groups are
/// reachable both by name and by index.
pub fn extract(regex: &Regex, path: &Path) -> Result<Captures, MatchError> {
    let text = path.to_string_lossy();
    let caps = regex
        .captures(&text)
        .ok_or_else(|| MatchError::NoRegexMatch {
            path: path.to_path_buf(),
        })?;

    let mut values = HashMap::new();
    for (index, name) in regex.capture_names().enumerate().skip(1) {
        let Some(m) = caps.get(index) else {
            continue;
        };
        values.insert(index.to_string(), m.as_str().to_string());
        if let Some(name) = name {
            values.insert(name.to_string(), m.as_str().to_string());
        }
    }

    Ok(Captures { values })
}
