//! Criteria loading: config file first, then command-line flags on top.

use std::path::Path;

use anyhow::{anyhow, bail, Context};
use clap::ArgMatches;
use logpicklib::{Criteria, SortSpec};

/// Load criteria from a TOML or JSON file (chosen by extension).
pub fn load_criteria(path: &Path) -> Result<Criteria, anyhow::Error> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config '{}'", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse JSON config '{}'", path.display()))
    } else {
        toml::from_str(&text)
            .with_context(|| format!("failed to parse TOML config '{}'", path.display()))
    }
}

/// Parse a `TYPE:KEY[:asc|desc]` sort flag.
///
/// `layout` and `location` apply to timestamp sorts only.
pub fn parse_sort(
    value: &str,
    layout: Option<&str>,
    location: Option<&str>,
) -> Result<SortSpec, anyhow::Error> {
    let parts: Vec<&str> = value.split(':').collect();
    let (sort_type, key, direction) = match parts.as_slice() {
        [sort_type, key] => (*sort_type, *key, "asc"),
        [sort_type, key, direction] => (*sort_type, *key, *direction),
        _ => bail!("Invalid sort '{value}'. Use TYPE:KEY or TYPE:KEY:asc|desc"),
    };

    let ascending = match direction.to_lowercase().as_str() {
        "asc" | "ascending" => true,
        "desc" | "descending" => false,
        other => return Err(anyhow!("Invalid sort direction '{other}' in '{value}'")),
    };

    Ok(SortSpec {
        sort_type: sort_type.to_string(),
        regex_key: key.to_string(),
        ascending,
        layout: layout.unwrap_or_default().to_string(),
        location: location.unwrap_or_default().to_string(),
    })
}

/// Build criteria from an optional `--config` file plus flags.
///
/// Include/exclude/sort flags extend the file's lists; `--regex` and
/// `--top-n` replace the file's values.
pub fn build_criteria(matches: &ArgMatches) -> Result<Criteria, anyhow::Error> {
    let mut criteria = match matches.get_one::<String>("config") {
        Some(path) => load_criteria(Path::new(path))?,
        None => Criteria::new(),
    };

    if let Some(includes) = matches.get_many::<String>("include") {
        criteria = criteria.include_many(&includes.collect::<Vec<_>>());
    }

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        criteria = criteria.exclude_many(&excludes.collect::<Vec<_>>());
    }

    let ordering = &mut criteria.ordering_criteria;
    if let Some(regex) = matches.get_one::<String>("regex") {
        ordering.regex = regex.clone();
    }
    if let Some(top_n) = matches.get_one::<i64>("top-n") {
        ordering.top_n = *top_n;
    }

    let layout = matches.get_one::<String>("layout").map(String::as_str);
    let location = matches.get_one::<String>("location").map(String::as_str);
    if let Some(sorts) = matches.get_many::<String>("sort") {
        for sort in sorts {
            ordering.sort_by.push(parse_sort(sort, layout, location)?);
        }
    }

    Ok(criteria)
}
