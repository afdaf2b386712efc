//! Report formatting and display
//!
//! This module provides formatters for the different ways a report is shown:
//! - Detail view for a single file
//! - Tree view for directories
//! - Comparison of two files
//! - JSON output
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `utils` - Shared helpers (styles, connectors, size and permission text)
//! - `detail` - Labeled detail block
//! - `tree` - Tree formatter
//! - `diff` - Two-file comparison formatter
//! - `json` - JSON output

mod config;
mod detail;
mod diff;
mod json;
mod tree;
mod utils;

use std::io;

use termcolor::{ColorChoice, NoColor, StandardStream};

// Re-export public types and functions
pub use config::OutputConfig;
pub use detail::DetailFormatter;
pub use diff::DiffFormatter;
pub use json::{print_json, to_json};
pub use tree::TreeFormatter;
pub use utils::{TIME_FORMAT, format_size, permission_breakdown, size_breakdown};

/// Line printed between the reports of consecutive paths.
pub fn separator() -> String {
    "─".repeat(80)
}

/// How a walk result is presented. Chosen by [`crate::inspect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Labeled block for a single non-directory entry
    Detail,
    Tree,
}

/// Run a writer against an uncolored buffer and return the text.
fn render_plain<F>(write: F) -> String
where
    F: FnOnce(&mut NoColor<Vec<u8>>) -> io::Result<()>,
{
    let mut buffer = NoColor::new(Vec::new());
    // Writes into a Vec cannot fail
    let _ = write(&mut buffer);
    String::from_utf8_lossy(&buffer.into_inner()).into_owned()
}

fn stdout_stream(use_color: bool) -> StandardStream {
    let choice = if use_color {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}
