// ABOUTME: Settings loading for fkm.
// ABOUTME: TOML file under the XDG config dir, FKM_SSH_DIR override, sensible defaults.

use crate::error::{FkmError, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the SSH directory.
pub const SSH_DIR_ENV: &str = "FKM_SSH_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding authorized_keys (defaults to ~/.ssh)
    pub ssh_dir: Option<PathBuf>,
    /// File name inside `ssh_dir`
    pub authorized_keys_file: String,
    /// User-Agent sent to GitHub/GitLab
    pub user_agent: String,
    /// Skip imported keys whose material is already present
    pub skip_duplicates: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ssh_dir: None,
            authorized_keys_file: fkm_ssh::AUTHORIZED_KEYS_FILE.to_string(),
            user_agent: fkm_remote::DEFAULT_USER_AGENT.to_string(),
            skip_duplicates: true,
        }
    }
}

impl Settings {
    /// XDG-style config directory (~/.config/fkm).
    ///
    /// Uses `XDG_CONFIG_HOME` if set, otherwise falls back to `~/.config`.
    pub fn config_dir() -> Option<PathBuf> {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|p| p.join("fkm"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load from the default config file, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let settings = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        Ok(settings.with_ssh_dir_override(std::env::var_os(SSH_DIR_ENV)))
    }

    /// Load from `path`. A missing file gives the defaults.
    ///
    /// # Errors
    /// `FkmError::Config` if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(FkmError::Config {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        toml::from_str(&content).map_err(|e| FkmError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Replace `ssh_dir` with `value` when it is set and non-empty.
    pub fn with_ssh_dir_override(mut self, value: Option<OsString>) -> Self {
        if let Some(dir) = value.filter(|v| !v.is_empty()) {
            self.ssh_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// The configured SSH directory, or `~/.ssh`.
    pub fn resolve_ssh_dir(&self) -> Result<PathBuf> {
        match &self.ssh_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::home_dir()
                .map(|h| h.join(".ssh"))
                .ok_or(FkmError::NoHomeDirectory),
        }
    }

    pub fn authorized_keys_path(&self) -> Result<PathBuf> {
        Ok(self.resolve_ssh_dir()?.join(&self.authorized_keys_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.ssh_dir, None);
        assert_eq!(settings.authorized_keys_file, "authorized_keys");
        assert!(settings.user_agent.starts_with("fkm/"));
        assert!(settings.skip_duplicates);
    }

    #[test]
    fn test_load_from_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "ssh_dir = \"/srv/deploy/.ssh\"\nskip_duplicates = false\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.ssh_dir, Some(PathBuf::from("/srv/deploy/.ssh")));
        assert!(!settings.skip_duplicates);
        assert_eq!(settings.authorized_keys_file, "authorized_keys");
    }

    #[test]
    fn test_load_from_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "ssh_dir = [not valid").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, FkmError::Config { .. }));
    }

    #[test]
    fn test_ssh_dir_override() {
        let settings = Settings::default().with_ssh_dir_override(Some("/tmp/keys".into()));
        assert_eq!(settings.ssh_dir, Some(PathBuf::from("/tmp/keys")));

        let settings = settings.with_ssh_dir_override(Some(OsString::new()));
        assert_eq!(settings.ssh_dir, Some(PathBuf::from("/tmp/keys")));

        let settings = settings.with_ssh_dir_override(None);
        assert_eq!(settings.ssh_dir, Some(PathBuf::from("/tmp/keys")));
    }

    #[test]
    fn test_authorized_keys_path() {
        let settings = Settings {
            ssh_dir: Some(PathBuf::from("/home/alice/.ssh")),
            authorized_keys_file: "authorized_keys2".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            settings.authorized_keys_path().unwrap(),
            PathBuf::from("/home/alice/.ssh/authorized_keys2")
        );
    }

    #[test]
    fn test_default_ssh_dir_is_under_home() {
        if let Some(home) = dirs::home_dir() {
            let dir = Settings::default().resolve_ssh_dir().unwrap();
            assert_eq!(dir, home.join(".ssh"));
        }
    }
}
