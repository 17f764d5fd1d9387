// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap (prompting for missing pages)
// 2. Set up logging to stderr
// 3. Run the race: validate, resolve the end page, search
// 4. Print the JSON result and the elapsed time
// 5. Exit with proper code (0 = path found, 1 = no path / invalid pages,
//    2 = error, 130 = interrupted)
//
// Rust concepts:
// - async/await: Page fetches are network I/O
// - tokio::select!: Race the search against Ctrl-C
// - Result<T, E>: For error handling
// =============================================================================

mod cli;
mod race;
mod report;
mod wiki;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use race::RaceError;
use wiki::WikiClient;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    // Ask for missing pages before Ctrl-C handling is installed, so an
    // interrupt at the prompt still kills the process the normal way
    let (start, end) = match cli.addresses() {
        Ok(addresses) => addresses,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };

    let started = Instant::now();
    let exit_code = tokio::select! {
        result = run(&cli, &start, &end) => match result {
            Ok(code) => code,
            Err(e) => {
                // If an unexpected error occurred, print it and exit with code 2
                eprintln!("Error: {:#}", e);
                2
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            130
        }
    };

    println!("Time: {}", report::format_elapsed(started.elapsed()));
    std::process::exit(exit_code);
}

// Logs go to stderr so stdout only carries the result
fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("warn,wiki_racer={level}")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// This is the main application logic
// Returns:
//   Ok(0) = path found
//   Ok(1) = no path exists, or the pages failed validation
//   Err = unexpected error
async fn run(cli: &Cli, start: &str, end: &str) -> Result<i32> {
    let client = WikiClient::new(&cli.client_config()).context("failed to build HTTP client")?;
    let options = cli.search_options();

    eprintln!("🏁 Racing from {} to {}", start, end);

    let outcome = match race::run_race(&client, start, end, &options).await {
        Ok(outcome) => outcome,
        Err(RaceError::Rejected(rejection)) => {
            // Validation failures are an answer, not a crash
            println!("{}", rejection);
            println!("Invalid start or end URL. Please check the URLs and try again.");
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };

    if outcome.target != outcome.end {
        eprintln!("🔀 End page resolves to {}", outcome.target);
    }

    let stats = &outcome.report.stats;
    eprintln!(
        "📊 Expanded {} page(s) over {} layer(s), {} skipped",
        stats.pages_expanded, stats.layers, stats.pages_degraded
    );

    let json = report::format_result(&outcome.start, &outcome.end, &outcome.report.result)?;
    println!("{}", json);

    if outcome.report.result.is_found() {
        Ok(0)
    } else {
        Ok(1)
    }
}
