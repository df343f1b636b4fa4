//! Multi-key ranking of candidate files.
//!
//! Each file is matched against the key regex once and its sort keys are
//! parsed once, up front. Files that fail either step are dropped and the
//! cause is reported. The survivors are stable-sorted by the rule chain:
//! the first rule decides, later rules break ties, and files equal under
//! every rule keep their input order.

use std::cmp::Ordering;
use std::path::PathBuf;

use regex::Regex;
use tracing::debug;

use super::extract::extract;
use super::sort::{SortKey, SortRule};
use crate::error::{Errors, MatchError};

/// A file with its parsed keys, one per rule.
struct Ranked {
    path: PathBuf,
    keys: Vec<SortKey>,
}

fn prepare(path: PathBuf, regex: &Regex, rules: &[SortRule]) -> Result<Ranked, MatchError> {
    let captures = extract(regex, &path)?;
    let keys = rules
        .iter()
        .map(|rule| rule.sort_key(&path, &captures))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Ranked { path, keys })
}

fn compare(rules: &[SortRule], a: &Ranked, b: &Ranked) -> Ordering {
    rules
        .iter()
        .zip(a.keys.iter().zip(&b.keys))
        .map(|(rule, (ka, kb))| rule.compare(ka, kb))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Rank `files` by `rules`, dropping files whose keys cannot be read.
///
/// Returns every placeable file in rank order together with one error per
/// dropped file.
pub fn rank(files: Vec<PathBuf>, regex: &Regex, rules: &[SortRule]) -> (Vec<PathBuf>, Errors) {
    let mut errors = Errors::new();
    let mut ranked = Vec::with_capacity(files.len());

    for path in files {
        match prepare(path, regex, rules) {
            Ok(item) => ranked.push(item),
            Err(e) => {
                debug!(error = %e, "dropped from ranking");
                errors.push(e);
            }
        }
    }

    // sort_by is stable
    ranked.sort_by(|a, b| compare(rules, a, b));

    (ranked.into_iter().map(|r| r.path).collect(), errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_numeric_ascending() {
        let regex = Regex::new(r"(\d+)\.log$").unwrap();
        let rules = [SortRule::numeric("1", true).unwrap()];

        let (result, errors) = rank(
            paths(&["app.3.log", "app.1.log", "app.10.log"]),
            &regex,
            &rules,
        );

        assert!(errors.is_empty());
        assert_eq!(names(&result), vec!["app.1.log", "app.3.log", "app.10.log"]);
    }

    #[test]
    fn test_direction_is_per_rule() {
        let regex = Regex::new(r"(?P<host>[a-z]+)-(?P<n>\d+)\.log$").unwrap();
        let rules = [
            SortRule::alphabetical("host", true).unwrap(),
            SortRule::numeric("n", false).unwrap(),
        ];

        let (result, _) = rank(
            paths(&["web-1.log", "db-1.log", "web-2.log", "db-3.log"]),
            &regex,
            &rules,
        );

        assert_eq!(
            names(&result),
            vec!["db-3.log", "db-1.log", "web-2.log", "web-1.log"]
        );
    }

    #[test]
    fn test_second_rule_breaks_ties() {
        let regex = Regex::new(r"(?P<day>\d{8})-(?P<seq>\d+)\.log$").unwrap();
        let rules = [
            SortRule::timestamp("day", false, "%Y%m%d", "").unwrap(),
            SortRule::numeric("seq", true).unwrap(),
        ];

        let (result, errors) = rank(
            paths(&[
                "20230101-2.log",
                "20230102-9.log",
                "20230102-1.log",
                "20230101-1.log",
            ]),
            &regex,
            &rules,
        );

        assert!(errors.is_empty());
        assert_eq!(
            names(&result),
            vec![
                "20230102-1.log",
                "20230102-9.log",
                "20230101-1.log",
                "20230101-2.log"
            ]
        );
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let regex = Regex::new(r"(?P<n>\d+)-(?P<tag>\w+)\.log$").unwrap();
        let rules = [SortRule::numeric("n", true).unwrap()];
        let input = paths(&["2-c.log", "1-z.log", "2-a.log", "1-b.log", "2-b.log"]);

        let (first, _) = rank(input.clone(), &regex, &rules);
        let (second, _) = rank(input, &regex, &rules);

        assert_eq!(
            names(&first),
            vec!["1-z.log", "1-b.log", "2-c.log", "2-a.log", "2-b.log"]
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_failures_drop_only_the_failing_files() {
        let regex = Regex::new(r"app\.(?P<n>\w+)\.log$").unwrap();
        let rules = [SortRule::numeric("n", true).unwrap()];

        let (result, errors) = rank(
            paths(&["app.2.log", "other.log", "app.x.log", "app.1.log"]),
            &regex,
            &rules,
        );

        assert_eq!(names(&result), vec!["app.1.log", "app.2.log"]);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.is_extraction()));
        let failed: Vec<PathBuf> = errors
            .iter()
            .filter_map(|e| e.path())
            .map(|p| p.to_path_buf())
            .collect();
        assert_eq!(failed, vec![PathBuf::from("other.log"), PathBuf::from("app.x.log")]);
    }

    #[test]
    fn test_secondary_parse_failure_drops_file() {
        let regex = Regex::new(r"(?P<n>\d+)\.(?P<ts>\w+)\.log$").unwrap();
        let rules = [
            SortRule::numeric("n", true).unwrap(),
            SortRule::timestamp("ts", true, "%Y%m%d", "").unwrap(),
        ];

        let (result, errors) = rank(
            paths(&["1.20230101.log", "2.garbage.log"]),
            &regex,
            &rules,
        );

        assert_eq!(names(&result), vec!["1.20230101.log"]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let regex = Regex::new(r".*").unwrap();
        let rules = [SortRule::alphabetical("0", true).unwrap()];

        let (result, errors) = rank(Vec::new(), &regex, &rules);

        assert!(result.is_empty());
        assert!(errors.is_empty());
    }
}
