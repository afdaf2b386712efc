//! CLI entry point for finfo

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, SystemTime};

use clap::{Parser, ValueEnum};
use finfo::logging::init_logging;
use finfo::output::separator;
use finfo::resolve::{absolute_path, find_library, is_bare_name, resolve_command};
use finfo::{
    DetailFormatter, DiffFormatter, Entry, ExtractorConfig, FinfoError, MetadataExtractor,
    OutputConfig, Report, TreeFormatter, View, Walker, WalkerConfig, compare_files, inspect,
    print_json,
};
use tracing::debug;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "finfo")]
#[command(about = "Show detailed information about files and directory trees")]
#[command(version)]
struct Args {
    /// Files, directories or command names to inspect
    #[arg(required_unless_present = "lib")]
    paths: Vec<PathBuf>,

    /// Descend only N levels deep
    #[arg(short = 'L', long = "level")]
    level: Option<usize>,

    /// List directories only
    #[arg(short = 'd', long = "dirs-only")]
    dirs_only: bool,

    /// Ignore entries matching pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore")]
    ignore: Vec<String>,

    /// Only show files modified more recently than DURATION ago (e.g. 30m, 2d)
    #[arg(long = "newer", value_name = "DURATION")]
    newer: Option<String>,

    /// Only show files modified longer than DURATION ago
    #[arg(long = "older", value_name = "DURATION")]
    older: Option<String>,

    /// Do not descend into symlinked directories
    #[arg(long = "no-follow")]
    no_follow: bool,

    /// Omit the directory and file count after a tree
    #[arg(long = "no-report")]
    no_report: bool,

    /// Calculate MD5, SHA256, SHA512 and BLAKE3 checksums of regular files
    #[arg(long = "hash")]
    hash: bool,

    /// Output in JSON format
    #[arg(long = "json", conflicts_with = "diff")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Disable colored output (same as --color never)
    #[arg(long = "no-color")]
    no_color: bool,

    /// Compare two files
    #[arg(long = "diff")]
    diff: bool,

    /// Search the library directories for NAME
    #[arg(long = "lib", value_name = "NAME", conflicts_with_all = ["diff", "json"])]
    lib: Option<String>,

    /// Show only the full list of linked libraries
    #[arg(
        long = "ll",
        visible_alias = "linked-libs",
        conflicts_with_all = ["diff", "json", "lib"]
    )]
    linked_libs: bool,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Parse a duration string like "1h", "7d", "2w" into a Duration.
fn parse_duration_string(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim()).map_err(|e| e.to_string())
}

/// Turn `--newer`/`--older` into a cutoff time.
fn cutoff(flag: &str, value: Option<&String>) -> Result<Option<SystemTime>, FinfoError> {
    let Some(s) = value else {
        return Ok(None);
    };
    let duration = parse_duration_string(s).map_err(|e| {
        FinfoError::InvalidArgument(format!("invalid {} duration '{}': {}", flag, s, e))
    })?;
    Ok(SystemTime::now().checked_sub(duration))
}

/// Turn a command-line argument into the path to inspect.
///
/// Bare names that do not exist in the working directory are looked up in `PATH`.
fn locate(input: &Path) -> Result<PathBuf, FinfoError> {
    let path = if input.symlink_metadata().is_err() && is_bare_name(input) {
        let name = input.to_string_lossy();
        match resolve_command(&name) {
            Ok(found) => {
                debug!(command = %name, path = %found.display(), "resolved through PATH");
                found
            }
            Err(_) => return Err(FinfoError::NotFound(input.to_path_buf())),
        }
    } else {
        input.to_path_buf()
    };

    absolute_path(&path)
}

fn write_error(path: &Path, err: io::Error) -> FinfoError {
    FinfoError::Io {
        path: path.to_path_buf(),
        source: err,
    }
}

/// Resolve one command-line argument and inspect it.
fn load_report(input: &Path, walker: &Walker, args: &Args) -> Result<(PathBuf, Report), FinfoError> {
    let path = locate(input)?;
    let report = inspect(&path, walker, args.hash)?;
    Ok((path, report))
}

/// Print a report, preceded by the separator when another one came before.
fn print_report(
    path: &Path,
    report: &Report,
    output_config: &OutputConfig,
    after_another: bool,
) -> Result<(), FinfoError> {
    if after_another {
        println!("{}", separator());
    }

    let printed = match (report.view, report.entries.first()) {
        (View::Detail, Some(Entry::Record(record))) => {
            DetailFormatter::new(output_config.clone()).print(record)
        }
        _ => TreeFormatter::new(output_config.clone()).print(&report.entries),
    };
    printed.map_err(|e| write_error(path, e))
}

/// Report every path; with `--json` all entries go into one array.
///
/// Returns false if any path failed.
fn report_paths(
    inputs: &[PathBuf],
    walker: &Walker,
    args: &Args,
    output_config: &OutputConfig,
) -> bool {
    let mut ok = true;
    let mut printed_any = false;
    let mut json_entries = Vec::new();

    for input in inputs {
        let result = load_report(input, walker, args).and_then(|(path, report)| {
            if args.json {
                json_entries.extend(report.entries);
                Ok(())
            } else {
                print_report(&path, &report, output_config, printed_any)
            }
        });
        match result {
            Ok(()) => printed_any = true,
            Err(e) => {
                eprintln!("finfo: {}", e);
                ok = false;
            }
        }
    }

    if args.json && printed_any {
        if let Err(e) = print_json(&json_entries) {
            eprintln!("finfo: {}", e);
            ok = false;
        }
    }
    ok
}

fn run_diff(args: &Args, output_config: &OutputConfig) -> Result<(), FinfoError> {
    let [left, right] = args.paths.as_slice() else {
        return Err(FinfoError::InvalidArgument(
            "--diff requires exactly 2 file arguments".to_string(),
        ));
    };
    let left = locate(left)?;
    let right = locate(right)?;
    let comparison = compare_files(&left, &right)?;
    DiffFormatter::new(output_config.clone())
        .print(&comparison)
        .map_err(|e| write_error(&left, e))
}

/// List every library matching `name`, each with its detail report.
fn run_lib(
    name: &str,
    walker: &Walker,
    args: &Args,
    output_config: &OutputConfig,
) -> Result<bool, FinfoError> {
    let libraries = find_library(name)?;
    println!("Found {} library file(s) for '{}':\n", libraries.len(), name);
    Ok(report_paths(&libraries, walker, args, output_config))
}

/// Print only the linked libraries of each path, untruncated.
fn run_linked_libs(args: &Args, output_config: &OutputConfig) -> bool {
    let extractor = MetadataExtractor::new(ExtractorConfig::full(false));
    let formatter = DetailFormatter::new(output_config.clone());
    let mut ok = true;

    for (i, input) in args.paths.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let result = locate(input)
            .and_then(|path| extractor.extract(&path, 0))
            .and_then(|record| {
                formatter
                    .print_linked_libraries(&record)
                    .map_err(|e| write_error(record.path(), e))
            });
        if let Err(e) = result {
            eprintln!("finfo: {}", e);
            ok = false;
        }
    }
    ok
}

fn main() {
    let args = Args::try_parse().unwrap_or_else(|e| {
        if e.use_stderr() {
            let _ = e.print();
            process::exit(1);
        }
        // --help and --version
        e.exit()
    });
    init_logging(args.verbose);

    let use_color = if args.no_color {
        false
    } else {
        should_use_color(args.color)
    };
    let output_config = OutputConfig {
        use_color,
        show_report: !args.no_report,
    };

    if args.diff {
        if let Err(e) = run_diff(&args, &output_config) {
            eprintln!("finfo: {}", e);
            process::exit(1);
        }
        return;
    }

    if args.linked_libs {
        if !run_linked_libs(&args, &output_config) {
            process::exit(1);
        }
        return;
    }

    let walker_config = match (
        cutoff("--newer", args.newer.as_ref()),
        cutoff("--older", args.older.as_ref()),
    ) {
        (Ok(newer_than), Ok(older_than)) => WalkerConfig {
            max_depth: args.level,
            dirs_only: args.dirs_only,
            ignore_patterns: args.ignore.clone(),
            follow_symlinks: !args.no_follow,
            newer_than,
            older_than,
        },
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("finfo: {}", e);
            process::exit(1);
        }
    };
    let walker = Walker::new(walker_config);

    let mut ok = true;
    if let Some(name) = &args.lib {
        match run_lib(name, &walker, &args, &output_config) {
            Ok(found_ok) => ok = found_ok,
            Err(e) => {
                eprintln!("finfo: {}", e);
                process::exit(1);
            }
        }
        if !args.paths.is_empty() {
            println!("{}", separator());
        }
    }

    if !report_paths(&args.paths, &walker, &args, &output_config) {
        ok = false;
    }
    if !ok {
        process::exit(1);
    }
}
