//! Per-entry metadata extraction
//!
//! Turns walked paths into [`FileRecord`]s. Failures are kept per entry as
//! [`Entry::Failed`] so one unreadable file never aborts a directory walk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use crate::binary::{BinaryInfo, analyze_binary};
use crate::checksum::{Checksums, hash_file};
use crate::error::{FinfoError, Result};
use crate::filetype::{FileTypeInfo, detect_file_type};
use crate::ownership::{Ownership, lookup_ownership};
use crate::tree::WalkEntry;

/// Longest symlink chain followed before giving up (matches the usual ELOOP limit).
const MAX_SYMLINK_HOPS: usize = 40;

/// What kind of filesystem object an entry is. Symlinks are not followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

impl EntryKind {
    pub fn from_file_type(ft: fs::FileType) -> Self {
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::File => "regular file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink => "symbolic link",
            EntryKind::Other => "special file",
        }
    }

    /// Leading character of the symbolic mode string.
    fn type_char(&self, file_type_bits: u32) -> char {
        match self {
            EntryKind::File => '-',
            EntryKind::Directory => 'd',
            EntryKind::Symlink => 'l',
            EntryKind::Other => match file_type_bits & 0o170000 {
                0o140000 => 's',
                0o060000 => 'b',
                0o020000 => 'c',
                0o010000 => 'p',
                _ => '?',
            },
        }
    }
}

/// Render permission bits in `ls -l` style, e.g. `-rwxr-xr-x`.
///
/// `mode` is the raw `st_mode`; the file type bits only matter for
/// [`EntryKind::Other`].
pub fn symbolic_mode(kind: EntryKind, mode: u32) -> String {
    let mut out = String::with_capacity(10);
    out.push(kind.type_char(mode));

    let specials = [(0o4000, 's'), (0o2000, 's'), (0o1000, 't')];
    for (i, shift) in [6u32, 3, 0].into_iter().enumerate() {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });

        let (special_bit, special_char) = specials[i];
        let exec = bits & 0o1 != 0;
        out.push(match (mode & special_bit != 0, exec) {
            (true, true) => special_char,
            (true, false) => special_char.to_ascii_uppercase(),
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    out
}

/// One hop in a chain of symlinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymlinkHop {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Uniform metadata for one filesystem entry. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    path: PathBuf,
    name: String,
    kind: EntryKind,
    size: u64,
    mode: u32,
    permissions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified_at: Option<DateTime<Local>>,
    depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    symlink_target: Option<PathBuf>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    is_cycle: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    list_error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    symlink_chain: Vec<SymlinkHop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ownership: Option<Ownership>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_type: Option<FileTypeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binary: Option<BinaryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksums: Option<Checksums>,
}

impl FileRecord {
    /// Build a record from its core fields.
    ///
    /// `raw_mode` is the full `st_mode`; only the permission bits are stored.
    pub fn new(
        path: PathBuf,
        kind: EntryKind,
        size: u64,
        raw_mode: u32,
        modified_at: Option<DateTime<Local>>,
        depth: usize,
    ) -> Self {
        Self {
            name: entry_name(&path),
            permissions: symbolic_mode(kind, raw_mode),
            path,
            kind,
            size,
            mode: raw_mode & 0o7777,
            modified_at,
            depth,
            symlink_target: None,
            is_cycle: false,
            list_error: None,
            symlink_chain: Vec::new(),
            ownership: None,
            file_type: None,
            binary: None,
            checksums: None,
        }
    }

    pub fn with_symlink_target(mut self, target: PathBuf) -> Self {
        self.symlink_target = Some(target);
        self
    }

    pub fn with_cycle(mut self, is_cycle: bool) -> Self {
        self.is_cycle = is_cycle;
        self
    }

    /// Record why a directory's listing could not be read.
    pub fn with_list_error(mut self, error: Option<String>) -> Self {
        self.list_error = error;
        self
    }

    pub fn with_symlink_chain(mut self, chain: Vec<SymlinkHop>) -> Self {
        self.symlink_chain = chain;
        self
    }

    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = Some(ownership);
        self
    }

    pub fn with_file_type(mut self, file_type: FileTypeInfo) -> Self {
        self.file_type = Some(file_type);
        self
    }

    pub fn with_binary(mut self, binary: BinaryInfo) -> Self {
        self.binary = Some(binary);
        self
    }

    pub fn with_checksums(mut self, checksums: Checksums) -> Self {
        self.checksums = Some(checksums);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Permission bits including setuid, setgid and sticky.
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Symbolic permissions, e.g. `drwxr-xr-x`.
    pub fn permissions(&self) -> &str {
        &self.permissions
    }

    pub fn octal_mode(&self) -> String {
        format!("{:04o}", self.mode)
    }

    pub fn is_world_writable(&self) -> bool {
        self.mode & 0o002 != 0
    }

    pub fn modified_at(&self) -> Option<&DateTime<Local>> {
        self.modified_at.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn symlink_target(&self) -> Option<&Path> {
        self.symlink_target.as_deref()
    }

    pub fn is_cycle(&self) -> bool {
        self.is_cycle
    }

    pub fn list_error(&self) -> Option<&str> {
        self.list_error.as_deref()
    }

    pub fn symlink_chain(&self) -> &[SymlinkHop] {
        &self.symlink_chain
    }

    pub fn ownership(&self) -> Option<&Ownership> {
        self.ownership.as_ref()
    }

    pub fn file_type(&self) -> Option<&FileTypeInfo> {
        self.file_type.as_ref()
    }

    pub fn binary(&self) -> Option<&BinaryInfo> {
        self.binary.as_ref()
    }

    pub fn checksums(&self) -> Option<&Checksums> {
        self.checksums.as_ref()
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// An entry whose metadata could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEntry {
    pub path: PathBuf,
    pub name: String,
    pub depth: usize,
    pub error: String,
}

/// What the renderer receives for each walked path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Record(FileRecord),
    Failed(FailedEntry),
}

impl Entry {
    pub fn failed(path: PathBuf, depth: usize, err: &FinfoError) -> Self {
        Entry::Failed(FailedEntry {
            name: entry_name(&path),
            path,
            depth,
            error: err.reason(),
        })
    }

    pub fn path(&self) -> &Path {
        match self {
            Entry::Record(r) => r.path(),
            Entry::Failed(f) => &f.path,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entry::Record(r) => r.name(),
            Entry::Failed(f) => &f.name,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Entry::Record(r) => r.depth(),
            Entry::Failed(f) => f.depth,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Record(r) if r.is_dir())
    }

    pub fn record(&self) -> Option<&FileRecord> {
        match self {
            Entry::Record(r) => Some(r),
            Entry::Failed(_) => None,
        }
    }
}

/// Which optional facts the extractor gathers beyond the core fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractorConfig {
    /// Sniff content type (magic numbers, shebang, text heuristic)
    pub detect_content: bool,
    /// Resolve owner and group names
    pub ownership: bool,
    /// Follow the whole symlink chain, not just the first hop
    pub symlink_chain: bool,
    /// Hash regular files (MD5, SHA-256, SHA-512, BLAKE3)
    pub checksums: bool,
}

impl ExtractorConfig {
    /// Core fields only, as shown in tree listings.
    pub fn basic(checksums: bool) -> Self {
        Self {
            checksums,
            ..Default::default()
        }
    }

    /// Everything the detail view can show.
    pub fn full(checksums: bool) -> Self {
        Self {
            detect_content: true,
            ownership: true,
            symlink_chain: true,
            checksums,
        }
    }
}

/// Reads filesystem metadata into [`FileRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor {
    config: ExtractorConfig,
}

impl MetadataExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Read the metadata of `path` itself (symlinks are not followed).
    pub fn extract(&self, path: &Path, depth: usize) -> Result<FileRecord> {
        let meta = path
            .symlink_metadata()
            .map_err(|e| FinfoError::from_io(path, e))?;
        let kind = EntryKind::from_file_type(meta.file_type());

        let size = match kind {
            EntryKind::Directory => 0,
            _ => meta.len(),
        };
        let modified_at = meta.modified().ok().map(DateTime::<Local>::from);

        let mut record = FileRecord::new(
            path.to_path_buf(),
            kind,
            size,
            raw_mode(&meta),
            modified_at,
            depth,
        );

        if kind == EntryKind::Symlink {
            if let Ok(target) = fs::read_link(path) {
                record = record.with_symlink_target(target);
            }
            if self.config.symlink_chain {
                record = record.with_symlink_chain(resolve_symlink_chain(path));
            }
        }

        if self.config.ownership {
            if let Some(ownership) = lookup_ownership(&meta) {
                record = record.with_ownership(ownership);
            }
        }

        // Content sniffing and hashing follow the link to the real file.
        let is_file = path.is_file();
        if self.config.detect_content && is_file {
            match detect_file_type(path) {
                Ok(info) => {
                    match analyze_binary(path, &info) {
                        Ok(Some(binary)) => record = record.with_binary(binary),
                        Ok(None) => {}
                        Err(err) => {
                            debug!(path = %path.display(), error = %err, "binary analysis failed")
                        }
                    }
                    record = record.with_file_type(info);
                }
                Err(err) => debug!(path = %path.display(), error = %err, "content detection failed"),
            }
        }
        if self.config.checksums && is_file {
            match hash_file(path) {
                Ok(sums) => record = record.with_checksums(sums),
                Err(err) => debug!(path = %path.display(), error = %err, "checksum failed"),
            }
        }

        Ok(record)
    }

    /// Extract a walked entry, turning failures into placeholder entries.
    pub fn extract_entry(&self, walked: WalkEntry) -> Entry {
        match self.extract(&walked.path, walked.depth) {
            Ok(record) => Entry::Record(
                record
                    .with_cycle(walked.is_cycle)
                    .with_list_error(walked.list_error),
            ),
            Err(err) => {
                debug!(path = %walked.path.display(), error = %err, "metadata unreadable");
                Entry::failed(walked.path, walked.depth, &err)
            }
        }
    }
}

/// Extract core metadata for a single path.
pub fn extract(path: &Path, depth: usize) -> Result<FileRecord> {
    MetadataExtractor::default().extract(path, depth)
}

/// Follow a chain of symlinks starting at `path`, one hop per element.
pub fn resolve_symlink_chain(path: &Path) -> Vec<SymlinkHop> {
    let mut chain = Vec::new();
    let mut current = path.to_path_buf();

    while chain.len() < MAX_SYMLINK_HOPS {
        let is_link = current
            .symlink_metadata()
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        if !is_link {
            break;
        }
        let Ok(target) = fs::read_link(&current) else {
            break;
        };
        let target = if target.is_absolute() {
            target
        } else {
            current
                .parent()
                .map(|p| p.join(&target))
                .unwrap_or(target)
        };
        chain.push(SymlinkHop {
            from: current,
            to: target.clone(),
        });
        current = target;
    }

    chain
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(unix)]
fn raw_mode(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode()
}

#[cfg(not(unix))]
fn raw_mode(meta: &fs::Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}
