//! finfo - inspect files and directory trees: metadata, content type, ownership

pub mod binary;
pub mod checksum;
pub mod compare;
pub mod error;
pub mod filetype;
pub mod inspect;
pub mod logging;
pub mod metadata;
pub mod output;
pub mod ownership;
pub mod resolve;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use compare::{Comparison, Verdict, compare_files};
pub use error::{FinfoError, Result};
pub use inspect::{Report, inspect};
pub use metadata::{Entry, EntryKind, ExtractorConfig, FileRecord, MetadataExtractor, extract};
pub use output::{DetailFormatter, DiffFormatter, OutputConfig, TreeFormatter, View, print_json};
pub use tree::{Walk, WalkEntry, Walker, WalkerConfig, walk};
