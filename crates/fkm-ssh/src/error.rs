// ABOUTME: Error types for authorized_keys operations using thiserror.
// ABOUTME: Provides typed errors for directory setup, file I/O, validation, and key parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or editing an authorized_keys file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create the SSH directory.
    #[error("failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set permissions on a directory or file.
    #[error("failed to set permissions on {path}: {source}")]
    SetPermissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the authorized_keys file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the authorized_keys file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key material rejected before anything was written.
    #[error("invalid SSH key format")]
    InvalidKey,

    /// Label rejected before anything was written.
    #[error("invalid key label: {0}")]
    InvalidLabel(String),

    /// Positional removal past the end of the listed keys.
    #[error("no key at index {index} (store has {len} keys)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Failed to decode public key material.
    #[error("failed to parse SSH public key: {0}")]
    ParseKey(#[source] ssh_key::Error),
}

impl StoreError {
    /// True for errors raised by input validation rather than the filesystem.
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::InvalidKey | StoreError::InvalidLabel(_))
    }

    /// The underlying I/O error kind, if this error came from the filesystem.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            StoreError::CreateDirectory { source, .. }
            | StoreError::SetPermissions { source, .. }
            | StoreError::Read { source, .. }
            | StoreError::Write { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// Result type alias using StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_read_error_display() {
        let err = StoreError::Read {
            path: PathBuf::from("/home/alice/.ssh/authorized_keys"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let display = format!("{}", err);
        assert!(display.contains("failed to read"));
        assert!(display.contains("/home/alice/.ssh/authorized_keys"));
    }

    #[test]
    fn test_invalid_key_display() {
        assert_eq!(StoreError::InvalidKey.to_string(), "invalid SSH key format");
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = StoreError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "no key at index 4 (store has 2 keys)");
    }

    #[test]
    fn test_is_validation() {
        assert!(StoreError::InvalidKey.is_validation());
        assert!(StoreError::InvalidLabel("x".to_string()).is_validation());
        assert!(!StoreError::IndexOutOfRange { index: 0, len: 0 }.is_validation());
    }

    #[test]
    fn test_io_kind() {
        let err = StoreError::Write {
            path: PathBuf::from("/tmp/x"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.io_kind(), Some(io::ErrorKind::NotFound));
        assert_eq!(StoreError::InvalidKey.io_kind(), None);
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let err = StoreError::CreateDirectory {
            path: PathBuf::from("/root/.ssh"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
        };
        let source = err.source().expect("should have source");
        assert!(source.to_string().contains("access denied"));
    }
}
