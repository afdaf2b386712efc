//! Detail formatter for a single file
//!
//! Prints a flat block of aligned `Label       : value` lines, with small
//! `├─`/`╰─` breakdowns under size, permissions and privileges.

use std::io::{self, Write};

use termcolor::WriteColor;

use crate::binary::{BinaryInfo, linked_libraries_preview};
use crate::metadata::FileRecord;

use super::config::OutputConfig;
use super::utils::{
    LABEL_WIDTH, Style, format_time, permission_breakdown, size_breakdown, write_label,
    write_styled,
};
use super::{render_plain, stdout_stream};

/// Formatter for the single-file detail view.
pub struct DetailFormatter {
    config: OutputConfig,
}

impl DetailFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, record: &FileRecord) -> String {
        render_plain(|out| self.write(out, record))
    }

    pub fn print(&self, record: &FileRecord) -> io::Result<()> {
        let mut stdout = stdout_stream(self.config.use_color);
        self.write(&mut stdout, record)
    }

    /// Only the complete linked-library list, as shown by `--ll`.
    pub fn format_linked_libraries(&self, record: &FileRecord) -> String {
        render_plain(|out| self.write_linked_libraries(out, record))
    }

    pub fn print_linked_libraries(&self, record: &FileRecord) -> io::Result<()> {
        let mut stdout = stdout_stream(self.config.use_color);
        self.write_linked_libraries(&mut stdout, record)
    }

    pub fn write_linked_libraries<W: WriteColor>(
        &self,
        out: &mut W,
        record: &FileRecord,
    ) -> io::Result<()> {
        match record.binary().filter(|b| !b.linked_libraries.is_empty()) {
            Some(binary) => write_libraries(out, binary, true),
            None => writeln!(out, "No linked libraries found for {}", record.path().display()),
        }
    }

    pub fn write<W: WriteColor>(&self, out: &mut W, record: &FileRecord) -> io::Result<()> {
        write_label(out, "Path")?;
        write_styled(out, Style::Path, &record.path().display().to_string())?;
        writeln!(out)?;

        self.write_size(out, record.size())?;
        line(out, "Kind", Style::Value, record.kind().label())?;
        line(out, "Modified", Style::Value, &format_time(record.modified_at()))?;
        line(out, "Arch", Style::Value, std::env::consts::ARCH)?;
        line(out, "OS", Style::Value, os_label(std::env::consts::OS))?;

        let permissions = format!("{} ({})", record.permissions(), record.octal_mode());
        line(out, "Permissions", Style::Permissions, &permissions)?;
        if let Some([owner, group, others]) = permission_breakdown(record.permissions()) {
            branch(out, false, "Owner  :", Style::Value, &owner)?;
            branch(out, false, "Group  :", Style::Value, &group)?;
            branch(out, true, "Others :", Style::Value, &others)?;
        }

        if let Some(info) = record.file_type() {
            line(out, "File Type", Style::Value, &info.format)?;
            if !info.mime_type.is_empty() {
                line(out, "MIME Type", Style::Value, &info.mime_type)?;
            }
            if let Some(interpreter) = info.interpreter.as_deref().filter(|_| info.is_script) {
                line(out, "Interpreter", Style::Value, interpreter)?;
            }
            if let Some(encoding) = info.encoding.as_deref().filter(|_| info.is_text) {
                line(out, "Encoding", Style::Value, encoding)?;
            }
            if let Some(arch) = info.arch.as_deref() {
                line(out, "Binary Arch", Style::Value, arch)?;
            }
        }

        if let Some(binary) = record.binary().filter(|b| !b.is_empty()) {
            if binary.is_executable {
                write_label(out, "Binary Type")?;
                write_styled(out, Style::Executable, "Executable")?;
                if binary.is_stripped {
                    write_styled(out, Style::Value, " (stripped)")?;
                }
                writeln!(out)?;
            }
            if let Some(signature) = binary.signature.as_deref() {
                write_styled(out, Style::Label, "Code Signature: ")?;
                write_styled(out, Style::Value, signature)?;
                writeln!(out)?;
            }
            if !binary.linked_libraries.is_empty() {
                write_libraries(out, binary, false)?;
            }
        }

        if let Some(ownership) = record.ownership() {
            write_styled(out, Style::Label, "Privileges:")?;
            writeln!(out)?;
            let group_label = format!("{} ({})", ownership.owner, ownership.group);
            branch(out, false, "Owner        :", Style::Value, &group_label)?;
            let (writable, style) = if record.is_world_writable() {
                ("all users".to_string(), Style::Warning)
            } else {
                (format!("{} only", ownership.owner), Style::Value)
            };
            branch(out, false, "Writable by  :", style, &writable)?;
            let (sudo, style) = if ownership.requires_sudo {
                ("yes", Style::Warning)
            } else {
                ("no", Style::Value)
            };
            branch(out, true, "Requires sudo:", style, sudo)?;
        }

        if let Some(sums) = record.checksums() {
            write_styled(out, Style::Label, "Checksums:")?;
            writeln!(out)?;
            let rows = sums.labeled();
            for (i, (algorithm, digest)) in rows.iter().enumerate() {
                let label = format!("{:<7}:", algorithm);
                branch(out, i + 1 == rows.len(), &label, Style::Size, digest)?;
            }
        }

        let chain = record.symlink_chain();
        if !chain.is_empty() {
            write_styled(out, Style::Label, "Symlink chain:")?;
            writeln!(out)?;
            for (i, hop) in chain.iter().enumerate() {
                let is_last = i + 1 == chain.len();
                write!(out, "  ")?;
                write_styled(out, Style::Tree, if is_last { "╰──" } else { "├──" })?;
                write!(out, " ")?;
                write_styled(out, Style::Path, &hop.from.display().to_string())?;
                write_styled(out, Style::Size, &format!(" → {}", hop.to.display()))?;
                writeln!(out)?;
            }
        }

        Ok(())
    }

    /// Largest unit on the label line, smaller units hanging below it.
    fn write_size<W: WriteColor>(&self, out: &mut W, size: u64) -> io::Result<()> {
        let units = size_breakdown(size);
        write_label(out, "Size")?;
        for (i, unit) in units.iter().enumerate() {
            if i > 0 {
                let glyph = if i + 1 == units.len() { "╰─" } else { "├─" };
                write!(out, "{:width$}", "", width = LABEL_WIDTH + 2)?;
                write_styled(out, Style::Tree, glyph)?;
                write!(out, " ")?;
            }
            write_styled(out, Style::Size, unit)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Platform names as `uname -s` prints them.
fn os_label(os: &str) -> &str {
    match os {
        "linux" => "Linux",
        "macos" => "Darwin",
        "freebsd" => "FreeBSD",
        "netbsd" => "NetBSD",
        "openbsd" => "OpenBSD",
        "windows" => "Windows",
        other => other,
    }
}

/// `Linked Libraries:` with one `├──` line per library, truncated unless `full`.
fn write_libraries<W: WriteColor>(out: &mut W, binary: &BinaryInfo, full: bool) -> io::Result<()> {
    let (shown, hidden) = linked_libraries_preview(binary, full);
    write_styled(out, Style::Label, "Linked Libraries:")?;
    writeln!(out)?;
    for (i, lib) in shown.iter().enumerate() {
        let is_last = hidden == 0 && i + 1 == shown.len();
        write!(out, "  ")?;
        write_styled(out, Style::Tree, if is_last { "╰──" } else { "├──" })?;
        write!(out, " ")?;
        write_styled(out, Style::Value, lib)?;
        writeln!(out)?;
    }
    if hidden > 0 {
        write!(out, "  ")?;
        write_styled(out, Style::Tree, "╰──")?;
        write!(out, " ")?;
        write_styled(
            out,
            Style::Value,
            &format!("... and {} more (use --ll for full list)", hidden),
        )?;
        writeln!(out)?;
    }
    Ok(())
}

fn line<W: WriteColor>(out: &mut W, label: &str, style: Style, value: &str) -> io::Result<()> {
    write_label(out, label)?;
    write_styled(out, style, value)?;
    writeln!(out)
}

fn branch<W: WriteColor>(
    out: &mut W,
    is_last: bool,
    label: &str,
    style: Style,
    value: &str,
) -> io::Result<()> {
    write!(out, "  ")?;
    write_styled(out, Style::Tree, if is_last { "╰─" } else { "├─" })?;
    write!(out, " ")?;
    write_styled(out, Style::Tree, label)?;
    write!(out, " ")?;
    write_styled(out, style, value)?;
    writeln!(out)
}
