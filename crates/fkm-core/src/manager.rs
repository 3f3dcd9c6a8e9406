// ABOUTME: Key-management workflows tying settings, the authorized_keys store and remote fetchers.
// ABOUTME: Manual adds, removal by value or position, and batch import from GitHub/GitLab.

use crate::config::Settings;
use crate::error::{FkmError, Result};
use fkm_remote::{HttpKeyFetcher, KeyFetcher, Platform};
use fkm_ssh::{ensure_directory, AuthorizedKey, AuthorizedKeysStore, StoreError};
use tracing::{info, warn};

/// Label given to an imported key: `{slug}-{username}-key-{id}`.
pub fn label_for(platform: &Platform, username: &str, id: u64) -> String {
    format!("{}-{}-key-{}", platform.slug, username, id)
}

/// Outcome of importing one user's keys.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Labels of keys written to the store, in fetch order.
    pub added: Vec<String>,
    /// Remote ids of keys already present in the store.
    pub skipped: Vec<u64>,
    /// Remote ids of keys the store rejected, with the reason.
    pub failed: Vec<(u64, StoreError)>,
}

impl ImportReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.skipped.is_empty() && self.failed.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Entry point for managing one user's authorized_keys.
pub struct KeyManager {
    settings: Settings,
    store: AuthorizedKeysStore,
}

impl KeyManager {
    /// Resolve the store path and make sure the SSH directory exists (0700).
    pub fn new(settings: Settings) -> Result<Self> {
        let ssh_dir = settings.resolve_ssh_dir()?;
        ensure_directory(&ssh_dir)?;
        let store = AuthorizedKeysStore::new(ssh_dir.join(&settings.authorized_keys_file));

        Ok(Self { settings, store })
    }

    /// [`new`](Self::new) with [`Settings::load`].
    pub fn from_env() -> Result<Self> {
        Self::new(Settings::load()?)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &AuthorizedKeysStore {
        &self.store
    }

    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self.store.list()?)
    }

    pub fn keys(&self) -> Result<Vec<AuthorizedKey>> {
        Ok(self.store.keys()?)
    }

    /// Add a pasted key under a user-chosen comment.
    pub fn add_manual(&self, key: &str, comment: &str) -> Result<()> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(FkmError::EmptyComment);
        }
        Ok(self.store.append(key.trim(), comment)?)
    }

    pub fn remove(&self, line: &str) -> Result<usize> {
        Ok(self.store.remove(line)?)
    }

    /// Remove the `index`-th entry of [`list`](Self::list).
    pub fn remove_at(&self, index: usize) -> Result<String> {
        Ok(self.store.remove_at(index)?)
    }

    pub fn import_github(&self, username: &str) -> Result<ImportReport> {
        let fetcher =
            HttpKeyFetcher::with_user_agent(Platform::github(), &self.settings.user_agent)?;
        self.import_from(&fetcher, username)
    }

    pub fn import_gitlab(&self, username: &str) -> Result<ImportReport> {
        let fetcher =
            HttpKeyFetcher::with_user_agent(Platform::gitlab(), &self.settings.user_agent)?;
        self.import_from(&fetcher, username)
    }

    /// Fetch `username`'s keys and append each under a synthesized label.
    ///
    /// A failed fetch is returned as an error. Once keys are fetched, a key
    /// the store rejects is recorded in the report and the rest still go in.
    pub fn import_from(&self, fetcher: &dyn KeyFetcher, username: &str) -> Result<ImportReport> {
        let username = username.trim();
        let platform = fetcher.platform();
        let remote_keys = fetcher.user_keys(username)?;

        let mut present = if self.settings.skip_duplicates {
            self.store.keys()?
        } else {
            Vec::new()
        };

        let mut report = ImportReport::default();
        for remote in remote_keys {
            let parsed = AuthorizedKey::parse(&remote.key);
            if let Some(parsed) = &parsed {
                if self.settings.skip_duplicates && present.iter().any(|k| k.same_key(parsed)) {
                    info!(platform = %platform.name, id = remote.id, "key already present");
                    report.skipped.push(remote.id);
                    continue;
                }
            }

            let label = label_for(platform, username, remote.id);
            match self.store.append(&remote.key, &label) {
                Ok(()) => {
                    report.added.push(label);
                    present.extend(parsed);
                }
                Err(e) => {
                    warn!(
                        platform = %platform.name,
                        id = remote.id,
                        error = %e,
                        "failed to add key"
                    );
                    report.failed.push((remote.id, e));
                }
            }
        }

        info!(
            platform = %platform.name,
            username,
            added = report.added.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "import finished"
        );
        Ok(report)
    }
}
