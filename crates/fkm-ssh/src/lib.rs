// ABOUTME: authorized_keys management for fkm.
// ABOUTME: Re-exports the file store, line model, fingerprinting and error types.

pub mod entry;
pub mod error;
pub mod fingerprint;
pub mod store;

pub use entry::{AuthorizedKey, KeyEntry};
pub use error::{Result, StoreError};
pub use fingerprint::compute_fingerprint;
pub use store::{ensure_directory, AuthorizedKeysStore, AUTHORIZED_KEYS_FILE};
