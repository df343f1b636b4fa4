//! # logpick
//!
//! A CLI that picks which log files to tail.
//!
//! ## Overview
//!
//! logpick is built on top of logpicklib. It reads selection criteria from a
//! config file and/or flags, runs one selection (or polls on an interval),
//! and prints the chosen paths. Partial failures are printed as warnings on
//! stderr; they never hide the files that did qualify.
//!
//! ## Usage
//!
//! ```bash
//! # Every .log file under /var/log/app, minus compressed archives
//! logpick -i '/var/log/app/**/*.log' -e '**/*.gz.log'
//!
//! # The two most recent dated files
//! logpick -i '/var/log/app/*.log' \
//!     -r 'app-(?P<day>\d{8})\.log$' \
//!     -s timestamp:day:desc --layout %Y%m%d --location Europe/Paris -n 2
//!
//! # Criteria from a file, re-evaluated every 5 seconds
//! logpick --config criteria.toml --watch 5
//! ```
//!
//! Exit codes: 0 when files were selected, 1 for configuration errors, 2 when
//! nothing matched.

mod config;
mod render;

use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use console::Style;
use logpicklib::Matcher;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use render::OutputFormat;

const DEFAULT_LOG_FILTER: &str = "logpick=warn,logpicklib=warn";
const VERBOSE_LOG_FILTER: &str = "logpick=debug,logpicklib=debug";
const LOG_ENV_VAR: &str = "LOGPICK_LOG";

const EXIT_CONFIG: u8 = 1;
const EXIT_NO_MATCH: u8 = 2;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("logpick")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Pick which log files to tail from glob patterns and filename ranking")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Criteria file (TOML, or JSON with a .json extension)"),
        )
        .arg(
            Arg::new("include")
                .short('i')
                .long("include")
                .action(ArgAction::Append)
                .help("Include files matching glob pattern"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Exclude files matching glob pattern"),
        )
        .arg(
            Arg::new("regex")
                .short('r')
                .long("regex")
                .help("Regex applied to each path to capture sort keys"),
        )
        .arg(
            Arg::new("sort")
                .short('s')
                .long("sort")
                .action(ArgAction::Append)
                .help("Sort rule TYPE:KEY[:asc|desc], TYPE is numeric, alphabetical or timestamp (repeat for tie-breaks)"),
        )
        .arg(
            Arg::new("layout")
                .long("layout")
                .help("strftime layout for timestamp sorts (e.g. %Y%m%d%H)"),
        )
        .arg(
            Arg::new("location")
                .long("location")
                .help("Timezone for timestamp sorts (IANA name or Local, default UTC)"),
        )
        .arg(
            Arg::new("top-n")
                .short('n')
                .long("top-n")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .help("Keep only the N best-ranked files (default 1)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .default_value("plain")
                .value_parser(["plain", "json"])
                .help("Output format"),
        )
        .arg(
            Arg::new("watch")
                .short('w')
                .long("watch")
                .value_parser(value_parser!(u64).range(1..))
                .help("Re-run selection every N seconds"),
        )
        .arg(
            Arg::new("polls")
                .long("polls")
                .requires("watch")
                .value_parser(value_parser!(u64).range(1..))
                .help("Stop watching after N polls"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log discovery and ranking details to stderr"),
        )
}

/// Initialize tracing with stderr output.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run one selection and print it. Returns whether anything was selected.
fn poll(matcher: &Matcher, format: OutputFormat) -> Result<bool, anyhow::Error> {
    let selection = matcher.match_files();

    let warnings = render::render_warnings(&selection.errors);
    if !warnings.is_empty() {
        eprint!("{}", warnings);
    }

    let output = render::render(&selection, format)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(!selection.files.is_empty())
}

fn run(matches: &ArgMatches) -> Result<ExitCode, anyhow::Error> {
    let criteria = config::build_criteria(matches)?;
    let matcher = match Matcher::new(&criteria) {
        Ok(matcher) => matcher,
        Err(e) => {
            eprintln!("{} {e}", Style::new().red().bold().apply_to("Error:"));
            return Ok(ExitCode::from(EXIT_CONFIG));
        }
    };
    debug!(
        include = ?matcher.include(),
        exclude = ?matcher.exclude(),
        top_n = ?matcher.top_n(),
        "matcher ready"
    );

    let format: OutputFormat = matches
        .get_one::<String>("output")
        .map(|s| s.parse::<OutputFormat>())
        .transpose()
        .map_err(anyhow::Error::msg)?
        .unwrap_or_default();

    let Some(interval) = matches.get_one::<u64>("watch") else {
        let selected = poll(&matcher, format)?;
        return Ok(if selected {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(EXIT_NO_MATCH)
        });
    };

    let polls = matches.get_one::<u64>("polls").copied();
    let mut count = 0u64;
    loop {
        poll(&matcher, format)?;
        count += 1;
        if polls.is_some_and(|limit| count >= limit) {
            info!(polls = count, "watch finished");
            return Ok(ExitCode::SUCCESS);
        }
        std::thread::sleep(Duration::from_secs(*interval));
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", Style::new().red().bold().apply_to("Error:"));
            ExitCode::from(EXIT_CONFIG)
        }
    }
}
