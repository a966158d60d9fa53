//! CLI entry point.
//!
//! Subcommands:
//! - `search`: full chunked sweep of [0, y_max), halting on the first hit.
//! - `interval`: scan a single [lo, hi) range.
//! - `check`: run the divisor-pairing test for one y.
//!
//! Diagnostics go to stderr via tracing (`LOG_FORMAT=json` switches to
//! structured output); the final witness or exhaustion notice is the only
//! thing printed to stdout.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use nearfermat::{driver, interval, Checker, PairingChecker, Progress, RhoFactorizer, SearchConfig};

#[derive(Parser)]
#[command(name = "nearfermat", about = "Hunt for integer solutions to x^4 + y^4 + 1 = z^2")]
struct Cli {
    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Set macOS QoS class to user-initiated for rayon threads (P-core scheduling on Apple Silicon)
    #[arg(long)]
    qos: bool,

    /// Print the result as a JSON object instead of prose
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep y in [0, y-max) in chunks, stopping at the first solution
    Search {
        /// Exclusive upper bound on y
        #[arg(long, default_value_t = driver::DEFAULT_Y_MAX)]
        y_max: u128,
        /// Width of each sequentially processed chunk
        #[arg(long, default_value_t = driver::DEFAULT_CHUNK_SIZE)]
        chunk_size: u128,
    },
    /// Scan a single interval [lo, hi) of candidate y values
    Interval {
        /// Inclusive lower bound on y
        #[arg(long)]
        lo: u128,
        /// Exclusive upper bound on y
        #[arg(long)]
        hi: u128,
    },
    /// Test a single y for a solution
    Check {
        /// The candidate y
        #[arg(long)]
        y: u128,
    },
}

fn main() -> Result<()> {
    // LOG_FORMAT=json for machine-readable diagnostics, human-readable otherwise
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let args = Cli::parse();
    cli::configure_rayon(args.threads, args.qos);

    let checker = PairingChecker::new(RhoFactorizer);
    let progress = Progress::new();

    let outcome = match args.command {
        Commands::Search { y_max, chunk_size } => {
            let config = SearchConfig { y_max, chunk_size };
            let _reporter = progress.start_reporter();
            let outcome = driver::run(&config, &checker, &progress);
            progress.stop();
            progress.print_status();
            outcome?
        }
        Commands::Interval { lo, hi } => {
            // Same startup range check as the full sweep.
            SearchConfig {
                y_max: hi,
                chunk_size: driver::DEFAULT_CHUNK_SIZE,
            }
            .validate()?;
            interval::search(lo, hi, &checker, &progress)?
        }
        Commands::Check { y } => {
            anyhow::ensure!(
                y <= driver::MAX_Y,
                "y {} exceeds the supported bound {}",
                y,
                driver::MAX_Y
            );
            checker.check(y)?
        }
    };

    cli::report_outcome(outcome, args.json)
}
