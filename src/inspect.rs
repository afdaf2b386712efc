//! Walk, extract and choose a view for one root path

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::metadata::{Entry, ExtractorConfig, MetadataExtractor};
use crate::output::View;
use crate::tree::{WalkEntry, Walker};

/// Everything needed to render one root path.
#[derive(Debug, Clone)]
pub struct Report {
    pub entries: Vec<Entry>,
    pub view: View,
}

/// Walk `root` and extract every entry.
///
/// Fails only when the root itself cannot be read; anything below it that
/// fails becomes an [`Entry::Failed`] placeholder.
pub fn inspect(root: &Path, walker: &Walker, checksums: bool) -> Result<Report> {
    let walked: Vec<WalkEntry> = walker.walk(root)?.collect();
    let report = build_report(walked, checksums)?;
    debug!(path = %root.display(), entries = report.entries.len(), view = ?report.view, "inspected");
    Ok(report)
}

/// Choose the view and extract the walked entries for it.
fn build_report(walked: Vec<WalkEntry>, checksums: bool) -> Result<Report> {
    // `is_dir` follows a symlinked root, so a link to a directory stays a tree.
    let view = match walked.as_slice() {
        [only] if !only.path.is_dir() => View::Detail,
        _ => View::Tree,
    };

    let entries = match view {
        View::Detail => {
            // The root is all there is to show, so its failure is the path's failure.
            let extractor = MetadataExtractor::new(ExtractorConfig::full(checksums));
            walked
                .iter()
                .map(|w| extractor.extract(&w.path, w.depth).map(Entry::Record))
                .collect::<Result<Vec<Entry>>>()?
        }
        View::Tree => {
            let extractor = MetadataExtractor::new(ExtractorConfig::basic(checksums));
            let entries: Vec<Entry> = walked
                .into_iter()
                .map(|w| extractor.extract_entry(w))
                .collect();
            if let Some(Entry::Failed(failed)) = entries.first() {
                debug!(path = %failed.path.display(), error = %failed.error, "root unreadable");
            }
            entries
        }
    };

    Ok(Report { entries, view })
}
