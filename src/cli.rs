// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The start and end pages can be given as arguments. If either is missing
// we ask for it interactively.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// - Option<T>: For arguments that may be left out
// =============================================================================

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};

use crate::race::{FailurePolicy, SearchOptions};
use crate::wiki::ClientConfig;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "wiki-racer",
    version,
    about = "Find the shortest chain of links between two pages of a wiki",
    long_about = "wiki-racer follows the links in the prose of wiki pages, breadth-first, \
                  until it reaches the end page. The result is printed as JSON."
)]
pub struct Cli {
    /// Start page URL (e.g., https://qb.fandom.com/wiki/Tossup)
    ///
    /// Prompted for when left out
    pub start: Option<String>,

    /// End page URL
    ///
    /// Prompted for when left out
    pub end: Option<String>,

    /// Number of pages fetched at the same time within one BFS layer
    ///
    /// The path found is the same for any value; only the speed changes
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Timeout for a single page request, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Give up the search after this many seconds
    ///
    /// Counts from the start of the search. Checking the two pages beforehand
    /// is bounded only by --timeout per request
    #[arg(long)]
    pub deadline: Option<u64>,

    /// Maximum number of links to follow
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Stop on the first page that can't be fetched instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout),
            ..ClientConfig::default()
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            concurrency: self.concurrency.max(1),
            deadline: self.deadline.map(Duration::from_secs),
            max_depth: self.max_depth,
            failure_policy: if self.strict {
                FailurePolicy::Abort
            } else {
                FailurePolicy::Degrade
            },
        }
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    // Returns (start, end), prompting on stdin for whichever is missing
    pub fn addresses(&self) -> Result<(String, String)> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();

        let start = match &self.start {
            Some(start) => start.clone(),
            None => prompt(&mut input, &mut output, "Enter the start URL (QBWiki page): ")?,
        };
        let end = match &self.end {
            Some(end) => end.clone(),
            None => prompt(&mut input, &mut output, "Enter the end URL (QBWiki page): ")?,
        };
        Ok((start, end))
    }
}

// Prints a question and reads one trimmed line of answer
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read from stdin")?;
    if read == 0 {
        bail!("no input given for: {}", question.trim_end());
    }
    Ok(line.trim().to_string())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is prompt() generic over BufRead and Write?
//    - In the program it gets stdin and stdout
//    - In tests it gets a byte slice and a Vec<u8>, no terminal needed
//
// 2. What is ArgAction::Count?
//    - Counts how many times a flag was given
//    - -v = 1, -vv = 2, -vvv = 3
//
// 3. Why Option<String> for start and end?
//    - clap treats Option fields as optional positional arguments
//    - None means "ask the user"
// -----------------------------------------------------------------------------
