//! Formatter for two-file comparisons

use std::io::{self, Write};

use termcolor::WriteColor;

use crate::compare::{Comparison, Verdict};

use super::config::OutputConfig;
use super::utils::{Style, format_time, write_styled};
use super::{render_plain, stdout_stream};

const MATCH: &str = "✓";
const MISMATCH: &str = "✗";

/// Renders a [`Comparison`] section by section, ending with a verdict.
pub struct DiffFormatter {
    config: OutputConfig,
}

impl DiffFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, cmp: &Comparison) -> String {
        render_plain(|out| self.write(out, cmp))
    }

    pub fn print(&self, cmp: &Comparison) -> io::Result<()> {
        let mut stdout = stdout_stream(self.config.use_color);
        self.write(&mut stdout, cmp)
    }

    pub fn write<W: WriteColor>(&self, out: &mut W, cmp: &Comparison) -> io::Result<()> {
        let (left, right) = (&cmp.left, &cmp.right);

        write_styled(
            out,
            Style::Label,
            &format!("diff {} {}", left.name(), right.name()),
        )?;
        writeln!(out)?;
        write_styled(out, Style::Warning, "---")?;
        writeln!(out, " {}", left.path().display())?;
        write_styled(out, Style::Path, "+++")?;
        writeln!(out, " {}", right.path().display())?;

        section(out, "Size")?;
        if cmp.same_size() {
            matched(out, &format!("Both files are {} bytes", left.size()))?;
        } else {
            mismatched(out, "File 1", &format!("{} bytes", left.size()))?;
            mismatched(out, "File 2", &format!("{} bytes", right.size()))?;
            let delta = cmp.size_delta();
            let (larger, by) = if delta > 0 { (1, delta) } else { (2, -delta) };
            write!(out, "  ")?;
            write_styled(
                out,
                Style::Warning,
                &format!("Δ File {} is {} bytes larger", larger, by),
            )?;
            writeln!(out)?;
        }

        section(out, "Permissions")?;
        if cmp.same_permissions() {
            matched(out, &format!("Both files have {}", left.permissions()))?;
        } else {
            mismatched(out, "File 1", left.permissions())?;
            mismatched(out, "File 2", right.permissions())?;
        }

        section(out, "Modified")?;
        if cmp.same_modified() {
            matched(out, &format!("Both at {}", format_time(left.modified_at())))?;
        } else {
            mismatched(out, "File 1", &format_time(left.modified_at()))?;
            mismatched(out, "File 2", &format_time(right.modified_at()))?;
        }

        section(out, "Checksums")?;
        let rows = cmp.checksum_rows();
        if rows.is_empty() {
            write!(out, "  ")?;
            write_styled(out, Style::Muted, "unavailable")?;
            writeln!(out)?;
        }
        for (label, a, b) in rows {
            if a == b {
                matched(out, &format!("{}: {}", label, a))?;
            } else {
                mismatched(out, &format!("{} File 1", label), a)?;
                mismatched(out, &format!("{} File 2", label), b)?;
            }
        }

        section(out, "Verdict")?;
        write!(out, "  ")?;
        match cmp.verdict() {
            Verdict::Identical => {
                write_styled(out, Style::Path, "✓ Files are IDENTICAL (same content)")?
            }
            Verdict::SameSizeDifferentContent => write_styled(
                out,
                Style::Warning,
                "✗ Files are DIFFERENT (same size, different content)",
            )?,
            Verdict::Different => write_styled(out, Style::Warning, "✗ Files are DIFFERENT")?,
            Verdict::Unknown => {
                write_styled(out, Style::Muted, "? Content could not be compared")?
            }
        }
        writeln!(out)
    }
}

fn section<W: WriteColor>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    write_styled(out, Style::Label, &format!("{}:", title))?;
    writeln!(out)
}

fn matched<W: WriteColor>(out: &mut W, text: &str) -> io::Result<()> {
    write!(out, "  ")?;
    write_styled(out, Style::Path, MATCH)?;
    write!(out, " ")?;
    write_styled(out, Style::Value, text)?;
    writeln!(out)
}

fn mismatched<W: WriteColor>(out: &mut W, label: &str, value: &str) -> io::Result<()> {
    write!(out, "  ")?;
    write_styled(out, Style::Warning, MISMATCH)?;
    write!(out, " {}: ", label)?;
    write_styled(out, Style::Value, value)?;
    writeln!(out)
}
