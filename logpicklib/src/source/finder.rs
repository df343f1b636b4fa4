//! File discovery with glob pattern support.
//!
//! Include patterns are expanded against the filesystem with the `glob`
//! crate. Exclude patterns are compiled with the same dialect and matched
//! against every found path, so a file selected by both is always dropped.
//! `.` segments are ignored on both sides, since the glob crate does not
//! always keep them in the paths it yields.
//!
//! Dialect: `*` and `?` stay within one path segment, `**` as a whole segment
//! recurses into any depth, `[abc]` / `[!abc]` are character classes, and
//! matching is case-sensitive.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, trace};

use crate::error::{Errors, MatchError, PatternError};

/// Match options shared by expansion and exclusion.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn compile(pattern: &str) -> Result<Pattern, PatternError> {
    Pattern::new(pattern).map_err(|e| PatternError {
        pattern: pattern.to_string(),
        message: e.msg.to_string(),
    })
}

/// Drop `.` segments so an exclude lines up with normalized paths.
fn strip_cur_dir(pattern: &str) -> String {
    pattern
        .split('/')
        .filter(|segment| *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Check that every pattern is valid glob syntax.
pub fn validate<S: AsRef<str>>(patterns: &[S]) -> Result<(), PatternError> {
    for pattern in patterns {
        compile(pattern.as_ref())?;
    }
    Ok(())
}

/// Validated include/exclude patterns.
#[derive(Debug, Clone)]
pub struct FileFinder {
    include: Vec<String>,
    exclude: Vec<String>,
    exclude_patterns: Vec<Pattern>,
}

impl FileFinder {
    /// Validate both pattern lists, reporting which list failed.
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, FinderError> {
        validate(include).map_err(FinderError::Include)?;
        validate(exclude).map_err(FinderError::Exclude)?;
        let exclude_patterns = exclude
            .iter()
            .map(|p| compile(&strip_cur_dir(p.as_ref())))
            .collect::<Result<Vec<_>, _>>()
            .map_err(FinderError::Exclude)?;

        Ok(Self {
            include: include.iter().map(|p| p.as_ref().to_string()).collect(),
            exclude: exclude.iter().map(|p| p.as_ref().to_string()).collect(),
            exclude_patterns,
        })
    }

    /// Include patterns as configured.
    pub fn include(&self) -> &[String] {
        &self.include
    }

    /// Exclude patterns as configured.
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Check if a path is removed by an exclude pattern.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path = normalize(path);
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path_with(&path, MATCH_OPTIONS))
    }

    /// Expand include patterns, drop excluded paths, and deduplicate.
    ///
    /// Filesystem errors are collected and returned next to the paths found
    /// so far. Only regular files (following symlinks) are returned; a
    /// dangling symlink is skipped without a cause. Order is
    /// include-pattern order then the glob crate's sorted directory order;
    /// callers should not rely on it.
    pub fn find(&self) -> (Vec<PathBuf>, Errors) {
        let mut files = Vec::new();
        let mut seen = HashSet::new();
        let mut errors = Errors::new();

        for pattern in &self.include {
            let paths = match glob::glob_with(pattern, MATCH_OPTIONS) {
                Ok(paths) => paths,
                // Unreachable once validated, but keep the batch alive.
                Err(e) => {
                    errors.push(MatchError::Scan {
                        pattern: pattern.clone(),
                        path: PathBuf::from(pattern),
                        source: io::Error::new(io::ErrorKind::InvalidInput, e.msg),
                    });
                    continue;
                }
            };

            let mut matched = 0usize;
            for entry in paths {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        let path = e.path().to_path_buf();
                        errors.push(MatchError::Scan {
                            pattern: pattern.clone(),
                            path,
                            source: e.into(),
                        });
                        continue;
                    }
                };

                if self.is_excluded(&path) {
                    trace!(path = %path.display(), "excluded");
                    continue;
                }
                match fs::metadata(&path) {
                    Ok(meta) if meta.is_file() => {}
                    Ok(_) => continue,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        trace!(path = %path.display(), "dangling link");
                        continue;
                    }
                    Err(e) => {
                        errors.push(MatchError::Scan {
                            pattern: pattern.clone(),
                            path,
                            source: e,
                        });
                        continue;
                    }
                }
                if seen.insert(normalize(&path)) {
                    matched += 1;
                    files.push(path);
                }
            }
            debug!(pattern = %pattern, matched, "expanded include pattern");
        }

        (files, errors)
    }
}

/// Which pattern list failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinderError {
    Include(PatternError),
    Exclude(PatternError),
}

/// Lexical canonical form used as the dedup key: `.` segments removed.
/// Symlinks are not resolved.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Find files matching `include` minus `exclude`.
pub fn find_files<S: AsRef<str>>(
    include: &[S],
    exclude: &[S],
) -> Result<(Vec<PathBuf>, Errors), FinderError> {
    Ok(FileFinder::new(include, exclude)?.find())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn create_test_files(dir: &Path) {
        fs::create_dir_all(dir.join("app")).unwrap();
        fs::create_dir_all(dir.join("app/archive")).unwrap();
        fs::create_dir_all(dir.join("sys")).unwrap();
        fs::create_dir_all(dir.join("dir.log")).unwrap();

        fs::write(dir.join("app/a.log"), "a").unwrap();
        fs::write(dir.join("app/b.log"), "b").unwrap();
        fs::write(dir.join("app/c.txt"), "c").unwrap();
        fs::write(dir.join("app/.hidden.log"), "h").unwrap();
        fs::write(dir.join("app/archive/old.log"), "o").unwrap();
        fs::write(dir.join("sys/kern.log"), "k").unwrap();
    }

    fn pat(dir: &Path, rest: &str) -> String {
        format!("{}/{}", dir.display(), rest)
    }

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        let mut names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_validate_accepts_valid_patterns() {
        assert!(validate(&["*.log", "/var/log/**/*.log", "app.[0-9].log"]).is_ok());
        assert!(validate::<&str>(&[]).is_ok());
    }

    #[test]
    fn test_validate_rejects_invalid_pattern() {
        let err = validate(&["ok.log", "[invalid"]).unwrap_err();
        assert_eq!(err.pattern, "[invalid");
    }

    #[test]
    fn test_new_tags_failing_list() {
        let err = FileFinder::new(&["[bad"], &[]).unwrap_err();
        assert!(matches!(err, FinderError::Include(_)));

        let err = FileFinder::new(&["*.log"], &["a/***"]).unwrap_err();
        assert!(matches!(err, FinderError::Exclude(_)));
    }

    #[test]
    fn test_star_stays_in_segment() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let (files, errors) = find_files(&[pat(temp.path(), "app/*.log")], &[]).unwrap();

        assert!(errors.is_empty());
        assert_eq!(
            names(&files, temp.path()),
            vec!["app/.hidden.log", "app/a.log", "app/b.log"]
        );
    }

    #[test]
    fn test_recursive_pattern() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let (files, _) = find_files(&[pat(temp.path(), "**/*.log")], &[]).unwrap();
        let names = names(&files, temp.path());

        assert!(names.contains(&"app/archive/old.log".to_string()));
        assert!(names.contains(&"sys/kern.log".to_string()));
        // directories never count as files
        assert!(!names.contains(&"dir.log".to_string()));
    }

    #[test]
    fn test_exclude_is_subtractive() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let (files, _) = find_files(
            &[pat(temp.path(), "app/*.log"), pat(temp.path(), "sys/*.log")],
            &[pat(temp.path(), "app/b.log"), pat(temp.path(), "**/.*")],
        )
        .unwrap();

        assert_eq!(
            names(&files, temp.path()),
            vec!["app/a.log", "sys/kern.log"]
        );
    }

    #[test]
    fn test_overlapping_includes_are_deduplicated() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let (files, _) = find_files(
            &[
                pat(temp.path(), "app/*.log"),
                pat(temp.path(), "app/a.*"),
                pat(temp.path(), "app/?.log"),
            ],
            &[],
        )
        .unwrap();

        let a_count = files.iter().filter(|p| p.ends_with("a.log")).count();
        assert_eq!(a_count, 1);
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_no_match_is_not_an_error_here() {
        let temp = tempdir().unwrap();

        let (files, errors) = find_files(&[pat(temp.path(), "*.log")], &[]).unwrap();

        assert!(files.is_empty());
        assert!(errors.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_collected() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());
        let looped = temp.path().join("app/loop.log");
        std::os::unix::fs::symlink(&looped, &looped).unwrap();

        let (files, errors) = find_files(&[pat(temp.path(), "app/*.log")], &[]).unwrap();

        assert_eq!(
            names(&files, temp.path()),
            vec!["app/.hidden.log", "app/a.log", "app/b.log"]
        );
        assert_eq!(errors.len(), 1);
        assert!(errors.iter().all(MatchError::is_scan));
        assert_eq!(errors.iter().next().and_then(|e| e.path()), Some(looped.as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());
        std::os::unix::fs::symlink(temp.path().join("gone"), temp.path().join("app/old.log"))
            .unwrap();

        let (files, errors) = find_files(&[pat(temp.path(), "app/*.log")], &[]).unwrap();

        assert_eq!(files.len(), 3);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_cur_dir_prefixes_on_exclude() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());
        let finder = FileFinder::new(&["./app/*.log"], &["./app/a.log", "././app/.*"]).unwrap();

        assert!(finder.is_excluded(Path::new("app/a.log")));
        assert!(finder.is_excluded(Path::new("./app/a.log")));
        assert!(finder.is_excluded(Path::new("app/.hidden.log")));
        assert!(!finder.is_excluded(Path::new("app/b.log")));
        assert_eq!(finder.exclude(), ["./app/a.log", "././app/.*"]);
    }

    #[test]
    fn test_exclude_with_inner_cur_dir() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let (files, errors) = find_files(
            &[pat(temp.path(), "./app/*.log")],
            &[pat(temp.path(), "./app/a.log"), pat(temp.path(), "app/./.*")],
        )
        .unwrap();

        assert!(errors.is_empty());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app/b.log"));
    }

    #[test]
    fn test_strip_cur_dir() {
        assert_eq!(strip_cur_dir("./logs/*.log"), "logs/*.log");
        assert_eq!(strip_cur_dir("/var/./log/*.log"), "/var/log/*.log");
        assert_eq!(strip_cur_dir("**/.*"), "**/.*");
    }

    #[test]
    fn test_normalize_drops_cur_dir() {
        assert_eq!(normalize(Path::new("./a/./b.log")), PathBuf::from("a/b.log"));
        assert_eq!(normalize(Path::new("/x/y.log")), PathBuf::from("/x/y.log"));
    }
}
