//! JSON output formatting

use std::io::{self, Write};

use crate::metadata::Entry;

/// Serialize entries as a pretty-printed JSON array.
pub fn to_json(entries: &[Entry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}

/// Print entries as pretty-printed JSON to stdout.
pub fn print_json(entries: &[Entry]) -> io::Result<()> {
    let json = to_json(entries).map_err(io::Error::other)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)
}
