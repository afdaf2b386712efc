//! Tree formatter for directory listings
//!
//! This module provides `TreeFormatter` which draws a pre-order sequence of
//! entries as a tree, one line per entry.

use std::io::{self, Write};

use termcolor::WriteColor;

use crate::metadata::{Entry, EntryKind, FailedEntry, FileRecord};

use super::config::OutputConfig;
use super::utils::{
    Style, connector, continuation_prefix, format_size, format_time, last_sibling_flags,
    write_styled,
};
use super::{render_plain, stdout_stream};

/// Characters of the SHA-256 digest shown inline in tree listings.
const SHORT_CHECKSUM_LEN: usize = 12;

/// Formatter for tree output.
pub struct TreeFormatter {
    config: OutputConfig,
}

impl TreeFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Render to plain text, without colors.
    pub fn format(&self, entries: &[Entry]) -> String {
        render_plain(|out| self.write(out, entries))
    }

    pub fn print(&self, entries: &[Entry]) -> io::Result<()> {
        let mut stdout = stdout_stream(self.config.use_color);
        self.write(&mut stdout, entries)
    }

    /// Write one line per entry, then the summary line if enabled.
    pub fn write<W: WriteColor>(&self, out: &mut W, entries: &[Entry]) -> io::Result<()> {
        let last_flags = last_sibling_flags(entries);
        // child_prefixes[d] is the prefix drawn before children of the entry at depth d.
        let mut child_prefixes: Vec<String> = Vec::new();
        let mut dir_count = 0;
        let mut file_count = 0;

        for (entry, &is_last) in entries.iter().zip(&last_flags) {
            let depth = entry.depth();

            if depth == 0 {
                self.write_root(out, entry)?;
                child_prefixes.clear();
                child_prefixes.push(String::new());
                continue;
            }

            let prefix = child_prefixes.get(depth - 1).cloned().unwrap_or_default();
            write_styled(out, Style::Tree, &format!("{}{}", prefix, connector(is_last)))?;
            self.write_entry(out, entry)?;

            child_prefixes.resize(depth, String::new());
            child_prefixes.push(continuation_prefix(&prefix, is_last));

            if entry.is_dir() {
                dir_count += 1;
            } else {
                file_count += 1;
            }
        }

        if self.config.show_report {
            writeln!(out)?;
            writeln!(out, "{} directories, {} files", dir_count, file_count)?;
        }
        Ok(())
    }

    fn write_root<W: WriteColor>(&self, out: &mut W, entry: &Entry) -> io::Result<()> {
        let shown = entry.path().display().to_string();
        match entry {
            Entry::Record(record) => {
                let style = name_style(record.kind());
                write_styled(out, style, &shown)?;
                self.write_record_details(out, record)
            }
            Entry::Failed(failed) => {
                write_styled(out, Style::Value, &shown)?;
                write_failure(out, failed)
            }
        }
    }

    fn write_entry<W: WriteColor>(&self, out: &mut W, entry: &Entry) -> io::Result<()> {
        match entry {
            Entry::Record(record) => {
                write_styled(out, name_style(record.kind()), record.name())?;
                self.write_record_details(out, record)
            }
            Entry::Failed(failed) => {
                write_styled(out, Style::Value, &failed.name)?;
                write_failure(out, failed)
            }
        }
    }

    /// Everything after the name: link target, mode, size, time, warnings.
    fn write_record_details<W: WriteColor>(
        &self,
        out: &mut W,
        record: &FileRecord,
    ) -> io::Result<()> {
        if let Some(target) = record.symlink_target() {
            write!(out, " -> ")?;
            write_styled(out, Style::Symlink, &target.display().to_string())?;
        }

        write!(out, "  [")?;
        write_styled(out, Style::Permissions, record.permissions())?;
        write!(out, " ")?;
        write_styled(out, Style::Size, &format_size(record.size()))?;
        write!(out, " ")?;
        write_styled(out, Style::Muted, &format_time(record.modified_at()))?;
        if let Some(sums) = record.checksums() {
            let short: String = sums.sha256.chars().take(SHORT_CHECKSUM_LEN).collect();
            write!(out, " ")?;
            write_styled(out, Style::Muted, &short)?;
        }
        write!(out, "]")?;

        if record.is_cycle() {
            write!(out, "  ")?;
            write_styled(out, Style::Warning, "[recursive, not followed]")?;
        }
        if let Some(error) = record.list_error() {
            write!(out, "  ")?;
            write_styled(out, Style::Warning, &format!("[error opening dir: {}]", error))?;
        }
        writeln!(out)
    }
}

fn name_style(kind: EntryKind) -> Style {
    match kind {
        EntryKind::Directory => Style::Directory,
        EntryKind::Symlink => Style::Symlink,
        EntryKind::File | EntryKind::Other => Style::Value,
    }
}

fn write_failure<W: WriteColor>(out: &mut W, failed: &FailedEntry) -> io::Result<()> {
    write!(out, "  ")?;
    write_styled(out, Style::Warning, &format!("[error: {}]", failed.error))?;
    writeln!(out)
}
