#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the command-line front end of `ot-commit`. It parses arguments
//! with [`clap`], configures diagnostics, runs
//! [`engine::commit_preview`], and prints the resulting manifest.
//!
//! # Design
//!
//! [`run`] takes the argument list and handles for standard output and
//! error, which keeps the whole front end testable in-process. The binary
//! only forwards `std::env::args_os()` and the locked standard streams and
//! converts the returned status with [`exit_code_from`].
//!
//! Tree sources come from repeated `--tree=KIND=VALUE` options. When none is
//! given, the positional `PATH` (or the current directory if that is also
//! absent) is committed as a single `dir=` source.
//!
//! # Exit codes
//!
//! | code | meaning |
//! |------|---------|
//! | `0`  | manifest written |
//! | `1`  | usage error, invalid owner override, or unreadable/malformed directive file |
//! | `2`  | a tree source could not be walked |
//! | `3`  | `--strict` was given and some directives never matched |
//!
//! # Examples
//!
//! ```
//! let tree = tempfile::tempdir().unwrap();
//! std::fs::write(tree.path().join("motd"), b"").unwrap();
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::run(
//!     [std::ffi::OsString::from("ot-commit"), tree.path().into()],
//!     &mut stdout,
//!     &mut stderr,
//! );
//!
//! assert_eq!(status, 0);
//! assert!(String::from_utf8(stdout).unwrap().ends_with(" file /motd\n"));
//! ```

use std::env;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use clap::builder::OsStringValueParser;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command, value_parser};
use engine::{
    CONFIG_EXIT_CODE, CommitOptions, CommitReport, EngineError, LEFTOVER_EXIT_CODE, TreeSpec,
    commit_preview,
};
use filters::{Leftovers, ModeSyntax};
use logging::{DiagnosticEvent, InfoFlag, VerbosityConfig, drain_events, info_gte};

/// Name used in usage text and diagnostics.
pub const PROGRAM_NAME: &str = "ot-commit";

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

#[derive(Debug, Default)]
struct ParsedArgs {
    path: Option<OsString>,
    trees: Vec<String>,
    statoverride: Option<PathBuf>,
    skip_list: Option<PathBuf>,
    owner_uid: i64,
    owner_gid: i64,
    lenient_mode_bits: bool,
    json: bool,
    strict: bool,
    verbose: u8,
    info: Vec<String>,
    debug: Vec<String>,
}

fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Preview the entries, ownership and modes a commit of a tree would record.")
        .arg(
            Arg::new("path")
                .value_name("PATH")
                .help("Directory to commit when no --tree is given (default: current directory).")
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("tree")
                .long("tree")
                .value_name("KIND=VALUE")
                .help("Overlay a tree source: dir=PATH, tar=FILE, layer=FILE or ref=COMMIT.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("statoverride")
                .long("statoverride")
                .value_name("FILE")
                .help("Add mode bits to paths listed as '<mode-bits> <path>' lines.")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("skip-list")
                .long("skip-list")
                .value_name("FILE")
                .help("Leave out the paths listed in FILE, one per line.")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("owner-uid")
                .long("owner-uid")
                .value_name("UID")
                .help("Set the uid of every entry (-1 keeps the original).")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .default_value("-1"),
        )
        .arg(
            Arg::new("owner-gid")
                .long("owner-gid")
                .value_name("GID")
                .help("Set the gid of every entry (-1 keeps the original).")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .default_value("-1"),
        )
        .arg(
            Arg::new("lenient-mode-bits")
                .long("lenient-mode-bits")
                .help("Accept floating-point mode bits such as '2.0' in statoverride files.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Write the manifest as JSON.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Exit with status 3 when a directive matches no entry.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output; repeat for more.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .value_name("FLAGS")
                .help("Set info flags: leftover, name, skip, stats (e.g. skip2,stats).")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .help("Set debug flags: filter, own, perms, walk (e.g. perms,walk2).")
                .action(ArgAction::Append),
        )
}

fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    Ok(ParsedArgs {
        path: matches.remove_one::<OsString>("path"),
        trees: matches
            .remove_many::<String>("tree")
            .map(Iterator::collect)
            .unwrap_or_default(),
        statoverride: matches.remove_one::<PathBuf>("statoverride"),
        skip_list: matches.remove_one::<PathBuf>("skip-list"),
        owner_uid: matches.remove_one::<i64>("owner-uid").unwrap_or(-1),
        owner_gid: matches.remove_one::<i64>("owner-gid").unwrap_or(-1),
        lenient_mode_bits: matches.get_flag("lenient-mode-bits"),
        json: matches.get_flag("json"),
        strict: matches.get_flag("strict"),
        verbose: matches.get_count("verbose"),
        info: matches
            .remove_many::<String>("info")
            .map(Iterator::collect)
            .unwrap_or_default(),
        debug: matches
            .remove_many::<String>("debug")
            .map(Iterator::collect)
            .unwrap_or_default(),
    })
}

/// Runs the front end and returns the process exit status.
///
/// Nothing is written to `stdout` unless the preview succeeds. Diagnostics,
/// leftover warnings and errors go to `stderr`.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout, stderr),
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = write!(stdout, "{error}");
                0
            }
            _ => {
                let _ = write!(stderr, "{error}");
                CONFIG_EXIT_CODE
            }
        },
    }
}

fn execute<Out, Err>(parsed: ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    let config = match verbosity(&parsed) {
        Ok(config) => config,
        Err(message) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {message}");
            return CONFIG_EXIT_CODE;
        }
    };
    logging::init_tracing_with_env(config);
    drain_events();

    let options = match build_options(&parsed, stderr) {
        Ok(options) => options,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            return error.exit_code();
        }
    };

    let result = commit_preview(&options);
    flush_diagnostics(stderr);
    let report = match result {
        Ok(report) => report,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            return error.exit_code();
        }
    };

    let written = if parsed.json {
        report.write_json(stdout)
    } else {
        report.write_text(stdout)
    };
    if let Err(error) = written.and_then(|()| stdout.flush()) {
        let _ = writeln!(stderr, "{PROGRAM_NAME}: failed to write manifest: {error}");
        return CONFIG_EXIT_CODE;
    }

    if info_gte(InfoFlag::Stats, 1) {
        write_stats(&report, stderr);
    }
    if info_gte(InfoFlag::Leftover, 1) {
        warn_leftovers(&report.leftovers, stderr);
    }

    if parsed.strict && !report.leftovers.is_empty() {
        LEFTOVER_EXIT_CODE
    } else {
        0
    }
}

fn verbosity(parsed: &ParsedArgs) -> Result<VerbosityConfig, String> {
    let mut config = VerbosityConfig::from_verbose_level(parsed.verbose);
    for list in &parsed.info {
        config.apply_info_list(list)?;
    }
    for list in &parsed.debug {
        config.apply_debug_list(list)?;
    }
    Ok(config)
}

fn build_options<Err: Write>(
    parsed: &ParsedArgs,
    stderr: &mut Err,
) -> Result<CommitOptions, EngineError> {
    let trees = if parsed.trees.is_empty() {
        let root = match &parsed.path {
            Some(path) => PathBuf::from(path),
            None => env::current_dir().map_err(EngineError::CurrentDir)?,
        };
        vec![TreeSpec::dir(root)]
    } else {
        if let Some(path) = &parsed.path {
            let _ = writeln!(
                stderr,
                "warning: ignoring PATH '{}' because --tree was given",
                PathBuf::from(path).display()
            );
        }
        parsed
            .trees
            .iter()
            .map(|tree| tree.parse::<TreeSpec>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let syntax = if parsed.lenient_mode_bits {
        ModeSyntax::Lenient
    } else {
        ModeSyntax::Integer
    };

    Ok(CommitOptions::new()
        .trees(trees)
        .statoverride(parsed.statoverride.clone())
        .skip_list(parsed.skip_list.clone())
        .owner_uid(parsed.owner_uid)
        .owner_gid(parsed.owner_gid)
        .mode_syntax(syntax))
}

fn flush_diagnostics<Err: Write>(stderr: &mut Err) {
    for event in drain_events() {
        let _ = match &event {
            DiagnosticEvent::Info { .. } => writeln!(stderr, "{}", event.message()),
            DiagnosticEvent::Debug { flag, .. } => {
                writeln!(stderr, "[{}] {}", flag.name(), event.message())
            }
        };
    }
}

fn write_stats<Err: Write>(report: &CommitReport, stderr: &mut Err) {
    let stats = report.stats;
    let _ = writeln!(
        stderr,
        "entries: {}, committed: {}, skipped: {}, owner rewrites: {}, mode additions: {}",
        stats.entries,
        stats.allowed(),
        stats.skipped,
        stats.owner_rewrites,
        stats.mode_additions
    );
}

fn warn_leftovers<Err: Write>(leftovers: &Leftovers, stderr: &mut Err) {
    for (path, _) in &leftovers.mode_overrides {
        let _ = writeln!(
            stderr,
            "warning: statoverride directive for '{}' never matched",
            String::from_utf8_lossy(path)
        );
    }
    for path in &leftovers.skips {
        let _ = writeln!(
            stderr,
            "warning: skip-list entry '{}' never matched",
            String::from_utf8_lossy(path)
        );
    }
}

/// Converts a status returned by [`run`] into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}
