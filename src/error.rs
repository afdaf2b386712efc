//! Error types for finfo

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while walking, inspecting or rendering a path.
#[derive(Debug, Error)]
pub enum FinfoError {
    #[error("cannot access '{}': No such file or directory", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read '{}': Permission denied", .0.display())]
    PermissionDenied(PathBuf),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("'{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FinfoError {
    /// Classify an I/O error raised for `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FinfoError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FinfoError::PermissionDenied(path.to_path_buf()),
            _ => FinfoError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// Short reason used for placeholder rows in tree output.
    pub fn reason(&self) -> String {
        match self {
            FinfoError::NotFound(_) => "no such file or directory".to_string(),
            FinfoError::PermissionDenied(_) => "permission denied".to_string(),
            FinfoError::InvalidArgument(msg) => msg.clone(),
            FinfoError::Io { source, .. } => source.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinfoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_maps_kinds() {
        let path = Path::new("/tmp/missing");
        let err = FinfoError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, FinfoError::NotFound(_)));

        let err = FinfoError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, FinfoError::PermissionDenied(_)));
        assert_eq!(err.reason(), "permission denied");

        let err = FinfoError::from_io(path, io::Error::other("boom"));
        assert!(matches!(err, FinfoError::Io { .. }));
        assert_eq!(err.reason(), "boom");
    }

    #[test]
    fn test_not_found_message_names_path() {
        let err = FinfoError::NotFound(PathBuf::from("nope.txt"));
        assert_eq!(
            err.to_string(),
            "cannot access 'nope.txt': No such file or directory"
        );
    }
}
