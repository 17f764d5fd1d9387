// src/report.rs
// =============================================================================
// Turns a finished race into the text we print.
//
// - format_result: the JSON object with start, end and path
// - format_elapsed: the "Time: 1m 2.345s" line
//
// Rust concepts:
// - serde: Derive Serialize to produce JSON
// - #[serde(untagged)]: Serialize an enum as just its content, so the path
//   becomes either a JSON array or a plain string
// =============================================================================

use std::time::Duration;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::race::PathResult;

// What "path" says when the search came back empty-handed
pub const NO_PATH: &str = "No path found!";

#[derive(Serialize)]
struct RaceSummary<'a> {
    start: &'a str,
    end: &'a str,
    path: PathField<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum PathField<'a> {
    Pages(&'a [String]),
    Missing(&'static str),
}

// Formats the race result as JSON indented with 4 spaces
//
// Example:
//   {
//       "start": "https://qb.fandom.com/wiki/Tossup",
//       "end": "https://qb.fandom.com/wiki/Bonus",
//       "path": [ ... ]
//   }
pub fn format_result(start: &str, end: &str, result: &PathResult) -> serde_json::Result<String> {
    let path = match result.path() {
        Some(pages) => PathField::Pages(pages),
        None => PathField::Missing(NO_PATH),
    };
    let summary = RaceSummary { start, end, path };

    // serde_json's to_string_pretty always indents with 2 spaces
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    summary.serialize(&mut serializer)?;

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

// Formats elapsed wall-clock time as whole minutes plus seconds
pub fn format_elapsed(elapsed: Duration) -> String {
    let minutes = elapsed.as_secs() / 60;
    let seconds = elapsed.as_secs_f64() - (minutes * 60) as f64;
    format!("{minutes}m {seconds:.3}s")
}
