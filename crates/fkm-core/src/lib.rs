// ABOUTME: fkm core library: settings and authorized_keys workflows.
// ABOUTME: Combines the fkm-ssh store with fkm-remote fetchers behind KeyManager.

pub mod config;
pub mod error;
pub mod manager;

pub use config::{Settings, SSH_DIR_ENV};
pub use error::{FkmError, Result};
pub use manager::{label_for, ImportReport, KeyManager};

pub use fkm_remote::{HttpKeyFetcher, KeyFetcher, Platform, RemoteError, RemoteKey};
pub use fkm_ssh::{AuthorizedKey, AuthorizedKeysStore, KeyEntry, StoreError};
