//! The matcher: validated criteria compiled once, run on every poll.

use std::path::PathBuf;

use regex::Regex;
use tracing::debug;

use crate::error::{ConfigError, Errors, MatchError};
use crate::options::Criteria;
use crate::query::{rank, SortRule};
use crate::source::{FileFinder, FinderError};

/// Number of ranked files kept when `top_n` is unset or zero.
pub const DEFAULT_TOP_N: usize = 1;

/// Compiled ordering: key regex, rule chain, and how many files to keep.
#[derive(Debug, Clone)]
struct Ranking {
    regex: Regex,
    rules: Vec<SortRule>,
    top_n: usize,
}

/// File selector built from [`Criteria`].
///
/// Construction validates everything; [`match_files`](Matcher::match_files)
/// only re-scans the filesystem. A matcher holds no mutable state and can be
/// shared between threads.
#[derive(Debug, Clone)]
pub struct Matcher {
    finder: FileFinder,
    ranking: Option<Ranking>,
}

/// Outcome of one [`Matcher::match_files`] call.
///
/// `errors` carries every non-fatal cause, even when `files` is non-empty.
#[derive(Debug, Default)]
pub struct Selection {
    pub files: Vec<PathBuf>,
    pub errors: Errors,
}

impl Selection {
    /// Nothing was selected.
    pub fn is_no_match(&self) -> bool {
        self.errors.has_no_match()
    }

    pub fn into_parts(self) -> (Vec<PathBuf>, Errors) {
        (self.files, self.errors)
    }
}

impl Matcher {
    /// Validate and compile `criteria`.
    pub fn new(criteria: &Criteria) -> Result<Self, ConfigError> {
        if criteria.include.is_empty() {
            return Err(ConfigError::MissingInclude);
        }

        let finder =
            FileFinder::new(criteria.include.as_slice(), criteria.exclude.as_slice()).map_err(
                |e| match e {
                    FinderError::Include(e) => ConfigError::Include(e),
                    FinderError::Exclude(e) => ConfigError::Exclude(e),
                },
            )?;

        let ordering = &criteria.ordering_criteria;
        if ordering.top_n < 0 {
            return Err(ConfigError::NegativeTopN(ordering.top_n));
        }
        if ordering.sort_by.is_empty() {
            if !ordering.regex.is_empty() {
                return Err(ConfigError::MissingSortBy);
            }
            return Ok(Self {
                finder,
                ranking: None,
            });
        }

        if ordering.regex.is_empty() {
            return Err(ConfigError::MissingRegex);
        }
        let top_n = match usize::try_from(ordering.top_n) {
            Ok(0) => DEFAULT_TOP_N,
            Ok(n) => n,
            Err(_) => usize::MAX,
        };

        let regex = Regex::new(&ordering.regex)?;
        let rules = ordering
            .sort_by
            .iter()
            .map(SortRule::from_spec)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            finder,
            ranking: Some(Ranking {
                regex,
                rules,
                top_n,
            }),
        })
    }

    pub fn include(&self) -> &[String] {
        self.finder.include()
    }

    pub fn exclude(&self) -> &[String] {
        self.finder.exclude()
    }

    /// Whether ordering criteria were configured.
    pub fn is_ranked(&self) -> bool {
        self.ranking.is_some()
    }

    /// Files kept after ranking; `None` when unranked (all files are kept).
    pub fn top_n(&self) -> Option<usize> {
        self.ranking.as_ref().map(|r| r.top_n)
    }

    /// The compiled rule chain, primary rule first.
    pub fn rules(&self) -> &[SortRule] {
        match &self.ranking {
            Some(ranking) => &ranking.rules,
            None => &[],
        }
    }

    /// Scan the filesystem and select files to tail.
    ///
    /// Without ordering criteria every found file is returned in discovery
    /// order. With ordering, files are ranked and the first `top_n` are kept;
    /// the discarded tail is not an error.
    pub fn match_files(&self) -> Selection {
        let (files, errors) = self.finder.find();
        if files.is_empty() {
            return Selection {
                files,
                errors: Errors::from(MatchError::NoMatch).join(errors),
            };
        }

        let Some(ranking) = &self.ranking else {
            debug!(found = files.len(), "matched files");
            return Selection { files, errors };
        };

        let found = files.len();
        let (mut ranked, rank_errors) = rank(files, &ranking.regex, &ranking.rules);
        let mut errors = rank_errors.join(errors);
        if ranked.is_empty() {
            errors = Errors::from(MatchError::NoMatch).join(errors);
        }
        let placed = ranked.len();
        ranked.truncate(ranking.top_n);

        debug!(
            found,
            ranked = placed,
            returned = ranked.len(),
            "matched files"
        );
        Selection {
            files: ranked,
            errors,
        }
    }
}
