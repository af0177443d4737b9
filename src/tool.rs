//! `duplicates`: report files whose contents duplicate an earlier file.

use chain_table::scan::{ScanOptions, Scanner};
use chain_table::Table;
use clap::{ArgAction, Parser};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    prelude::*,
    registry::Registry,
};

use tracing::{debug, error, info};

/// Find files with identical contents
#[derive(Parser, Debug)]
#[command(name = "duplicates")]
#[command(about = "Find files with identical contents")]
struct ToolArgs {
    /// Only display the total number of duplicates
    #[arg(short, long)]
    count: bool,

    /// Do not write anything; exit with 0 if a duplicate is found, 1 otherwise
    #[arg(short, long)]
    quiet: bool,

    /// Turn on diagnostic logging. Supply -v multiple times to increase verbosity.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Files and directories to check
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

impl ToolArgs {
    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            count: self.count,
            quiet: self.quiet,
        }
    }
}

fn init_tracing(quiet: bool, verbose: u8) -> io::Result<()> {
    let level_filter = if quiet {
        LevelFilter::OFF
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    // Library code logs through the `log` facade
    tracing_log::LogTracer::init().map_err(io::Error::other)?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("DUPLICATES_LOG")
        .from_env_lossy();

    let subscriber = Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact(),
    );

    tracing::subscriber::set_global_default(subscriber).map_err(io::Error::other)
}

fn run(args: &ToolArgs) -> io::Result<ExitCode> {
    let table = Table::new(0).map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
    let stdout = io::stdout().lock();
    let mut scanner = Scanner::new(table, args.scan_options(), stdout);

    for path in &args.paths {
        let found = scanner.check_path(path)?;
        debug!("{}: {found} duplicate(s)", path.display());
        if scanner.stopped() {
            break;
        }
    }

    let duplicates = scanner.duplicates();
    let (table, mut out) = scanner.into_parts();
    info!("{} distinct file contents, {duplicates} duplicate(s)", table.len());
    table.destroy();

    if args.quiet {
        return Ok(if duplicates > 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    if args.count {
        writeln!(out, "{duplicates}")?;
    }
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = ToolArgs::parse();

    if let Err(e) = init_tracing(args.quiet, args.verbose) {
        eprintln!("cannot initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
