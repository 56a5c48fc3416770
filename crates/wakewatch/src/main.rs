//! wakewatch - Display power request monitor.
//!
//! Periodically runs `powercfg /requests`, and prints the processes,
//! services and drivers that keep the display from turning off whenever
//! that list changes.
//!
//! Usage:
//!   wakewatch                       # poll every 2 seconds
//!   wakewatch 10                    # poll every 10 seconds
//!   wakewatch --once --json         # print one snapshot as JSON and exit
//!   wakewatch --input report.txt    # watch a saved report instead
//!   wakewatch --command my-tool --arg /requests

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(not(windows))]
use wakewatch_core::collector::MockRunner;
use wakewatch_core::collector::{Collector, CommandRunner, FileRunner, PowercfgRunner};
use wakewatch_core::fmt::{format_ms, render_snapshot};
use wakewatch_core::gate::{EdgeFingerprint, Fingerprint, PollGate, Xxh3Fingerprint};
use wakewatch_core::provider::{LiveProvider, ProviderError, SnapshotProvider};
use wakewatch_core::storage::{BlockingEntity, Snapshot};

/// Fingerprint strategy used to detect unchanged reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FingerprintKind {
    /// 64-bit xxh3 hash of the whole report.
    Xxh3,
    /// Length plus first and last character (fast, collides easily).
    Edge,
}

impl FingerprintKind {
    fn build(self) -> Box<dyn Fingerprint> {
        match self {
            FingerprintKind::Xxh3 => Box::new(Xxh3Fingerprint),
            FingerprintKind::Edge => Box::new(EdgeFingerprint),
        }
    }
}

/// Display power request monitor.
#[derive(Parser, Debug)]
#[command(name = "wakewatch", about = "Display power request monitor", version)]
struct Args {
    /// Poll interval in seconds.
    #[arg(value_name = "INTERVAL", default_value = "2")]
    interval: u64,

    /// Minimum time between two runs of the diagnostic command, in milliseconds.
    /// Polls arriving sooner are skipped.
    #[arg(long, default_value = "1000")]
    min_interval_ms: u64,

    /// How unchanged reports are detected.
    #[arg(long, value_enum, default_value_t = FingerprintKind::Xxh3)]
    fingerprint: FingerprintKind,

    /// Diagnostic program to run instead of `powercfg /requests`.
    #[arg(long, env = "WAKEWATCH_COMMAND", value_name = "PROGRAM")]
    command: Option<String>,

    /// Argument passed to --command (repeatable).
    #[arg(
        long = "arg",
        value_name = "ARG",
        requires = "command",
        allow_hyphen_values = true
    )]
    command_args: Vec<String>,

    /// Read the report from a file on every poll instead of running a command.
    #[arg(long, value_name = "FILE", conflicts_with = "command")]
    input: Option<PathBuf>,

    /// Print one snapshot and exit.
    #[arg(long)]
    once: bool,

    /// Print snapshots as JSON lines.
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// One JSON output line.
#[derive(Serialize)]
struct SnapshotLine<'a> {
    timestamp: i64,
    count: usize,
    entities: &'a [BlockingEntity],
}

impl<'a> From<&'a Snapshot> for SnapshotLine<'a> {
    fn from(snapshot: &'a Snapshot) -> Self {
        Self {
            timestamp: snapshot.timestamp,
            count: snapshot.count(),
            entities: &snapshot.entities,
        }
    }
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["wakewatch", "wakewatch_core"] {
        match format!("{}={}", target, level).parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("Invalid log directive for {}: {}", target, e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Picks the report source from the arguments.
fn build_runner(args: &Args) -> Box<dyn CommandRunner> {
    if let Some(ref path) = args.input {
        return Box::new(FileRunner::new(path));
    }
    if let Some(ref program) = args.command {
        return Box::new(PowercfgRunner::with_command(
            program.clone(),
            args.command_args.iter().cloned(),
        ));
    }
    default_runner()
}

#[cfg(windows)]
fn default_runner() -> Box<dyn CommandRunner> {
    Box::new(PowercfgRunner::new())
}

#[cfg(not(windows))]
fn default_runner() -> Box<dyn CommandRunner> {
    warn!("powercfg is only available on Windows; showing a sample report");
    Box::new(MockRunner::typical())
}

/// Formats a snapshot for stdout.
fn format_snapshot(snapshot: &Snapshot, json: bool) -> Result<String, serde_json::Error> {
    if json {
        serde_json::to_string(&SnapshotLine::from(snapshot))
    } else {
        Ok(render_snapshot(snapshot).trim_end().to_string())
    }
}

fn emit(snapshot: &Snapshot, json: bool) {
    match format_snapshot(snapshot, json) {
        Ok(text) => println!("{}", text),
        Err(e) => error!("Failed to serialize snapshot: {}", e),
    }
}

/// Prints a colored fetch failure with a hint when elevation is the cause.
fn print_fetch_warning(error: &ProviderError) {
    // ANSI colors: red for error, yellow for hints, reset after
    const RED: &str = "\x1b[1;31m";
    const YELLOW: &str = "\x1b[33m";
    const RESET: &str = "\x1b[0m";

    eprintln!("{RED}{error}{RESET}");
    if let ProviderError::PermissionDenied(_) = error {
        eprintln!();
        eprintln!("{YELLOW}  powercfg /requests must run from an elevated prompt.");
        eprintln!("  Restart wakewatch with \"Run as administrator\".{RESET}");
    }
}

/// Remembers `error` as the last reported failure.
///
/// Returns `true` when it differs from the previous one, i.e. when it
/// should be reported.
fn note_failure(last: &mut Option<ProviderError>, error: &ProviderError) -> bool {
    if last.as_ref() == Some(error) {
        return false;
    }
    *last = Some(error.clone());
    true
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    info!(
        "wakewatch {} ({}) starting",
        env!("CARGO_PKG_VERSION"),
        wakewatch_core::GIT_SHA
    );

    let runner = build_runner(&args);
    info!(
        "Config: interval={}s, min_interval={}ms, fingerprint={:?}, source={}",
        args.interval,
        args.min_interval_ms,
        args.fingerprint,
        runner.describe()
    );

    let gate = PollGate::with_fingerprint(args.fingerprint.build())
        .with_min_interval(Duration::from_millis(args.min_interval_ms));
    let mut collector = Collector::with_gate(runner, gate);

    if args.once {
        match collector.collect_snapshot() {
            Ok(snapshot) => emit(&snapshot, args.json),
            Err(e) => {
                print_fetch_warning(&ProviderError::from(e));
                std::process::exit(1);
            }
        }
        return;
    }

    let mut provider = LiveProvider::new(collector);
    let interval = Duration::from_secs(args.interval);

    // Setup graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let mut snapshot_count: u64 = 0;
    let mut last_warning: Option<ProviderError> = None;

    info!("Starting poll loop");

    while running.load(Ordering::SeqCst) {
        match provider.advance().cloned() {
            Some(snapshot) => {
                snapshot_count += 1;
                last_warning = None;
                debug!("Snapshot #{}: {} entities", snapshot_count, snapshot.count());
                emit(&snapshot, args.json);
            }
            None => {
                if let Some(err) = provider.last_error() {
                    if note_failure(&mut last_warning, err) {
                        error!("{}", err);
                        print_fetch_warning(err);
                    } else {
                        debug!("Still failing: {}", err);
                    }
                }
            }
        }

        if let Some(timing) = provider.collector_timing() {
            debug!(
                "Poll timing: total={}, fetch={}, parse={}",
                format_ms(timing.total.as_secs_f64() * 1000.0),
                format_ms(timing.fetch.as_secs_f64() * 1000.0),
                format_ms(timing.parse.as_secs_f64() * 1000.0)
            );
        }

        // Sleep with periodic checks for shutdown signal
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    info!("Shutdown complete ({} snapshots printed)", snapshot_count);
}
