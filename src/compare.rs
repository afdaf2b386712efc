//! Side-by-side comparison of two files

use std::path::{Path, PathBuf};

use crate::error::{FinfoError, Result};
use crate::metadata::{ExtractorConfig, FileRecord, MetadataExtractor};

/// Overall outcome of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Identical,
    /// Same size, different content
    SameSizeDifferentContent,
    Different,
    /// Content could not be hashed for at least one side
    Unknown,
}

/// Metadata of two files, checksummed, ready for display.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub left: FileRecord,
    pub right: FileRecord,
}

impl Comparison {
    pub fn same_size(&self) -> bool {
        self.left.size() == self.right.size()
    }

    pub fn same_permissions(&self) -> bool {
        self.left.permissions() == self.right.permissions()
    }

    pub fn same_modified(&self) -> bool {
        self.left.modified_at() == self.right.modified_at()
    }

    /// Signed size difference, left minus right.
    pub fn size_delta(&self) -> i128 {
        self.left.size() as i128 - self.right.size() as i128
    }

    /// Whether the SHA-256 digests agree. `None` if either side is unhashed.
    pub fn same_checksum(&self) -> Option<bool> {
        match (self.left.checksums(), self.right.checksums()) {
            (Some(a), Some(b)) => Some(a.sha256 == b.sha256),
            _ => None,
        }
    }

    /// Digests side by side as `(label, left, right)`, one row per algorithm.
    pub fn checksum_rows(&self) -> Vec<(&'static str, &str, &str)> {
        match (self.left.checksums(), self.right.checksums()) {
            (Some(a), Some(b)) => a
                .labeled()
                .into_iter()
                .zip(b.labeled())
                .map(|((label, left), (_, right))| (label, left, right))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self.same_checksum() {
            None => Verdict::Unknown,
            Some(true) if self.same_size() => Verdict::Identical,
            Some(false) if self.same_size() => Verdict::SameSizeDifferentContent,
            Some(_) => Verdict::Different,
        }
    }
}

/// Compare two regular files by metadata and checksum.
pub fn compare_files(left: &Path, right: &Path) -> Result<Comparison> {
    let extractor = MetadataExtractor::new(ExtractorConfig::basic(true));
    Ok(Comparison {
        left: file_record(&extractor, left)?,
        right: file_record(&extractor, right)?,
    })
}

fn file_record(extractor: &MetadataExtractor, path: &Path) -> Result<FileRecord> {
    // Compare what the path points at, like `cmp` does.
    let resolved = if path.is_symlink() {
        path.canonicalize()
            .map_err(|e| FinfoError::from_io(path, e))?
    } else {
        PathBuf::from(path)
    };

    let record = extractor.extract(&resolved, 0)?;
    if record.is_dir() {
        return Err(FinfoError::InvalidArgument(format!(
            "'{}' is a directory",
            path.display()
        )));
    }
    Ok(record)
}
