//! Shared utility functions for output formatting

use std::io::{self, Write};

use chrono::{DateTime, Local};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::metadata::Entry;

/// Timestamp layout used everywhere a modification time is shown.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Width the detail-view labels are padded to.
pub const LABEL_WIDTH: usize = 12;

/// Roles a piece of output can play; each maps to one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Label,
    Value,
    Tree,
    Path,
    Directory,
    Size,
    Permissions,
    Symlink,
    Executable,
    Warning,
    Muted,
}

impl Style {
    pub fn spec(&self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        match self {
            Style::Label => spec.set_fg(Some(Color::Cyan)).set_bold(true),
            Style::Value => spec.set_fg(Some(Color::White)),
            Style::Tree => spec.set_fg(Some(Color::Blue)),
            Style::Path => spec.set_fg(Some(Color::Green)),
            Style::Directory => spec.set_fg(Some(Color::Blue)).set_bold(true),
            Style::Size => spec.set_fg(Some(Color::Magenta)),
            Style::Permissions => spec.set_fg(Some(Color::Yellow)),
            Style::Symlink => spec.set_fg(Some(Color::Cyan)),
            Style::Executable => spec.set_fg(Some(Color::Green)),
            Style::Warning => spec.set_fg(Some(Color::Red)),
            Style::Muted => spec.set_fg(Some(Color::Black)).set_intense(true),
        };
        spec
    }
}

/// Write `text` in the given style, then reset.
pub fn write_styled<W: WriteColor>(out: &mut W, style: Style, text: &str) -> io::Result<()> {
    out.set_color(&style.spec())?;
    write!(out, "{}", text)?;
    out.reset()
}

/// Write a padded `Label : ` prefix.
pub fn write_label<W: WriteColor>(out: &mut W, label: &str) -> io::Result<()> {
    write_styled(out, Style::Label, &format!("{:<width$}: ", label, width = LABEL_WIDTH))
}

/// Connector drawn before an entry's name.
pub fn connector(is_last: bool) -> &'static str {
    if is_last { "└── " } else { "├── " }
}

/// Calculate the continuation prefix for the children of an entry.
pub fn continuation_prefix(prefix: &str, is_last: bool) -> String {
    if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    }
}

/// For each entry of a pre-order sequence, whether it is the last of its siblings.
///
/// Scans backwards: an entry is last when no later entry shares its depth
/// before the sequence climbs back above it.
pub fn last_sibling_flags(entries: &[Entry]) -> Vec<bool> {
    let mut flags = vec![false; entries.len()];
    let mut sibling_follows: Vec<bool> = Vec::new();

    for (i, entry) in entries.iter().enumerate().rev() {
        let depth = entry.depth();
        if sibling_follows.len() <= depth {
            sibling_follows.resize(depth + 1, false);
        }
        flags[i] = !sibling_follows[depth];
        sibling_follows[depth] = true;
        // Deeper entries seen so far belong to this entry's subtree.
        sibling_follows.truncate(depth + 1);
    }

    flags
}

/// Format a size in bytes to a compact human-readable form.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// Size expressed in every unit that is meaningful for it, largest first.
///
/// GB from 100 MB up, MB from 1 MB, KB from 1 KB below 1000 MB, and always
/// the exact byte count last.
pub fn size_breakdown(bytes: u64) -> Vec<String> {
    let kb = bytes as f64 / 1024.0;
    let mb = kb / 1024.0;
    let gb = mb / 1024.0;

    let mut lines = Vec::new();
    if gb >= 0.1 {
        lines.push(format!("{:.2} GB", gb));
    }
    if mb >= 1.0 {
        lines.push(format!("{:.0} MB", mb));
    }
    if kb >= 1.0 && mb < 1000.0 {
        lines.push(format!("{:.0} KB", kb));
    }
    lines.push(format!("{} bytes", bytes));
    lines
}

/// Describe one `rwx` triplet, e.g. `rw (read, write)`.
pub fn describe_permission_triplet(triplet: &str) -> String {
    let chars: Vec<char> = triplet.chars().collect();
    if chars.len() != 3 {
        return "--- (no permissions)".to_string();
    }

    let mut short = String::new();
    let mut long = Vec::new();
    if chars[0] == 'r' {
        short.push('r');
        long.push("read");
    }
    if chars[1] == 'w' {
        short.push('w');
        long.push("write");
    }
    if matches!(chars[2], 'x' | 's' | 't') {
        short.push('x');
        long.push("execute");
    }

    if long.is_empty() {
        "--- (no permissions)".to_string()
    } else {
        format!("{} ({})", short, long.join(", "))
    }
}

/// Split a symbolic mode string into owner, group and others descriptions.
pub fn permission_breakdown(symbolic: &str) -> Option<[String; 3]> {
    if symbolic.chars().count() < 10 {
        return None;
    }
    let chars: Vec<char> = symbolic.chars().collect();
    let triplet = |start: usize| chars[start..start + 3].iter().collect::<String>();
    Some([
        describe_permission_triplet(&triplet(1)),
        describe_permission_triplet(&triplet(4)),
        describe_permission_triplet(&triplet(7)),
    ])
}

pub fn format_time(time: Option<&DateTime<Local>>) -> String {
    time.map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
