//! Command-line driver for test programs
//!
//! `test_main!()` expands to a `main` that calls [`main`] here: it reads
//! `unitrun.toml`, the environment and the command line, runs the
//! registered tests and exits with the number of failed tests.

use crate::error::RunResult;
use crate::registry::{self, lock_global};
use crate::reporter::{ConsoleReporter, JsonReporter, Reporter, TraceReporter, XmlReporter};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use unitrun_config::{Config, ConfigLoader, ReportFormat};

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "UNITRUN_LOG";

/// Run the unit tests compiled into this program
///
/// ENVIRONMENT VARIABLES:
///     UNITRUN_SUITE         Run only this suite
///     UNITRUN_MAX_TIME_MS   Global per-test time budget
///     UNITRUN_FORMAT        console, xml, json or trace
///     UNITRUN_OUTPUT        Write the report to this file
///     UNITRUN_TRACE         Set to '1' to print start/finish lines
///     UNITRUN_LOG           Log filter (e.g. 'unitrun=debug')
///     NO_COLOR              Set to disable colored output
#[derive(Parser, Debug, Clone, Default)]
#[command(version)]
pub struct DriverArgs {
    /// Run only this suite (runs it even when disabled)
    #[arg(long, short = 's', env = "UNITRUN_SUITE")]
    pub suite: Option<String>,

    /// Fail tests that run longer than this many milliseconds (0 disables)
    #[arg(long = "max-time", value_name = "MS")]
    pub max_time_ms: Option<u64>,

    /// Report format: console, xml, json or trace
    #[arg(long, short = 'f')]
    pub format: Option<ReportFormat>,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Print suite and test start/finish lines
    #[arg(long)]
    pub trace: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Skip a suite during a full run (repeatable)
    #[arg(long = "disable", value_name = "SUITE")]
    pub disabled: Vec<String>,

    /// List suites and tests without running them
    #[arg(long)]
    pub list: bool,
}

/// Effective run settings after layering config, environment and flags
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub max_time_ms: u64,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub trace: bool,
    pub color: bool,
    pub disabled: Vec<String>,
}

impl Settings {
    /// Command-line flags override the loaded configuration
    pub fn resolve(config: &Config, args: &DriverArgs) -> Self {
        let mut disabled = config.disabled_suites().to_vec();
        disabled.extend(args.disabled.iter().cloned());

        Self {
            max_time_ms: args.max_time_ms.unwrap_or_else(|| config.max_time_ms()),
            format: args.format.unwrap_or_else(|| config.format()),
            output: args.output.clone().or_else(|| config.output()),
            trace: args.trace || config.trace(),
            color: !args.no_color && config.color(),
            disabled,
        }
    }
}

pub fn main() -> ExitCode {
    let args = DriverArgs::parse();
    match run(&args) {
        Ok(failed) => exit_code(failed),
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

/// Failed-test count as a process exit code, saturating at 255
pub fn exit_code(failed: u32) -> ExitCode {
    ExitCode::from(u8::try_from(failed).unwrap_or(u8::MAX))
}

/// Run the registered tests as described by `args`
pub fn run(args: &DriverArgs) -> RunResult<u32> {
    let cwd = std::env::current_dir()?;
    let config = ConfigLoader::new().load_from_directory(&cwd)?;
    let settings = Settings::resolve(&config, args);
    init_logging(settings.format);
    tracing::debug!(?settings, project_root = ?config.project_root(), "driver settings");

    for name in &settings.disabled {
        registry::disable_suite(name)?;
    }

    if args.list {
        list_tests(&mut io::stdout().lock())?;
        return Ok(0);
    }

    let mut reporter = make_reporter(&settings)?;
    match &args.suite {
        Some(name) => registry::run_suite_with(name, reporter.as_mut(), settings.max_time_ms),
        None => registry::run_all_tests_with(reporter.as_mut(), settings.max_time_ms),
    }
}

/// Build the reporter selected by `settings`
pub fn make_reporter(settings: &Settings) -> RunResult<Box<dyn Reporter>> {
    let to_terminal = settings.output.is_none() && io::stdout().is_terminal();
    let out: Box<dyn Write> = match &settings.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };

    let mut reporter: Box<dyn Reporter> = match settings.format {
        ReportFormat::Console => {
            Box::new(ConsoleReporter::new(out).with_color(settings.color && to_terminal))
        }
        ReportFormat::Xml => Box::new(XmlReporter::new(out)),
        ReportFormat::Json => Box::new(JsonReporter::new(out)),
        ReportFormat::Trace => Box::new(TraceReporter::new()),
    };
    reporter.set_trace(settings.trace);
    Ok(reporter)
}

/// Print every registered suite and test with its location
pub fn list_tests<W: Write>(out: &mut W) -> RunResult<()> {
    let registry = lock_global()?;
    for suite in registry.suites() {
        let state = if suite.is_enabled() { "" } else { " (disabled)" };
        writeln!(out, "{}{}", suite.name(), state)?;
        for test in suite.tests() {
            writeln!(out, "  {}  {}:{}", test.name, test.file, test.line)?;
        }
    }
    writeln!(
        out,
        "{} tests in {} suites",
        registry.test_count(),
        registry.suites().len()
    )?;
    Ok(())
}

/// Install the stderr log subscriber; later calls are no-ops
pub fn init_logging(format: ReportFormat) {
    let default = if format == ReportFormat::Trace {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .try_init();
}
