// ABOUTME: Top-level error type for fkm workflows.
// ABOUTME: Aggregates store and remote errors with configuration failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FkmError {
    #[error(transparent)]
    Store(#[from] fkm_ssh::StoreError),

    #[error(transparent)]
    Remote(#[from] fkm_remote::RemoteError),

    #[error("failed to load config from {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("could not determine home directory")]
    NoHomeDirectory,

    #[error("comment cannot be empty")]
    EmptyComment,
}

pub type Result<T> = std::result::Result<T, FkmError>;
