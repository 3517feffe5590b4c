//! Storage errors
//!
//! I/O failures are classified by what was being attempted and why it
//! failed, so callers can tell a full disk from a permissions problem and
//! offer the user something to do about it.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Filesystem operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Read,
    Write,
    Remove,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IoOp::Read => "read",
            IoOp::Write => "write",
            IoOp::Remove => "remove",
        })
    }
}

/// Errors from key-value storage
#[derive(Error, Debug)]
pub enum StorageError {
    /// Storage directory could not be created
    #[error("Cannot create storage directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied for {path:?}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No space left to write {path:?}")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure
    #[error("Failed to {op} {path:?}: {source}")]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Stored value does not decode to the expected type
    #[error("Value under '{key}' is invalid: {details}")]
    InvalidFormat { key: String, details: String },

    /// Temp file was written but could not replace the target
    #[error("Could not move {from:?} into place at {to:?}: {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Classify an I/O error raised while doing `op` on `path`
    pub fn io(op: IoOp, error: io::Error, path: PathBuf) -> Self {
        if error.kind() == io::ErrorKind::PermissionDenied {
            return StorageError::PermissionDenied {
                path,
                source: error,
            };
        }
        if op == IoOp::Write && is_out_of_space(&error) {
            return StorageError::DiskFull {
                path,
                source: error,
            };
        }
        StorageError::Io {
            op,
            path,
            source: error,
        }
    }

    /// What the user can do about this error, if anything
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } => Some("Free up disk space and try again."),
            StorageError::PermissionDenied { .. } | StorageError::CreateDir { .. } => {
                Some("Check that data_dir is writable, or point it elsewhere with `quotebook config set data_dir <path>`.")
            }
            StorageError::InvalidFormat { .. } => {
                Some("Import a valid quotes file to overwrite the stored value.")
            }
            _ => None,
        }
    }
}

/// ENOSPC, or a platform message saying the same
fn is_out_of_space(error: &io::Error) -> bool {
    if error.raw_os_error() == Some(28) {
        return true;
    }
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left") || msg.contains("not enough space")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_on_any_op() {
        for op in [IoOp::Read, IoOp::Write, IoOp::Remove] {
            let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
            let err = StorageError::io(op, io_err, PathBuf::from("/data/quotes"));

            assert!(matches!(err, StorageError::PermissionDenied { .. }));
            assert!(err.recovery_suggestion().is_some());
        }
    }

    #[test]
    fn test_out_of_space_only_on_write() {
        let write = StorageError::io(
            IoOp::Write,
            io::Error::new(io::ErrorKind::Other, "No space left on device"),
            PathBuf::from("/full/quotes"),
        );
        assert!(matches!(write, StorageError::DiskFull { .. }));

        let read = StorageError::io(
            IoOp::Read,
            io::Error::new(io::ErrorKind::Other, "No space left on device"),
            PathBuf::from("/full/quotes"),
        );
        assert!(matches!(read, StorageError::Io { op: IoOp::Read, .. }));
    }

    #[test]
    fn test_enospc_code() {
        let err = StorageError::io(
            IoOp::Write,
            io::Error::from_raw_os_error(28),
            PathBuf::from("/full/quotes"),
        );
        assert!(matches!(err, StorageError::DiskFull { .. }));
    }

    #[test]
    fn test_io_display_names_op_and_path() {
        let err = StorageError::io(
            IoOp::Remove,
            io::Error::new(io::ErrorKind::Other, "busy"),
            PathBuf::from("/data/lastViewedQuote"),
        );

        let msg = err.to_string();
        assert!(msg.starts_with("Failed to remove"));
        assert!(msg.contains("lastViewedQuote"));
        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_invalid_format_display() {
        let err = StorageError::InvalidFormat {
            key: "quotes".to_string(),
            details: "expected an array".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Value under 'quotes' is invalid: expected an array"
        );
    }
}
