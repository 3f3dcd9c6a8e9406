// ABOUTME: File-backed authorized_keys store.
// ABOUTME: Lists, appends and removes credential lines while preserving comments and blank lines.

use crate::entry::{AuthorizedKey, KeyEntry};
use crate::error::{Result, StoreError};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name sshd reads by default inside the SSH directory.
pub const AUTHORIZED_KEYS_FILE: &str = "authorized_keys";

/// Every accepted key line must start with this prefix.
const KEY_PREFIX: &str = "ssh-";

/// Create `dir` (and missing parents) with owner-only permissions (0700).
///
/// Directories that already exist are left untouched, including their mode.
///
/// # Errors
/// Returns `StoreError::CreateDirectory` or `StoreError::SetPermissions`.
pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    debug!(path = %dir.display(), "creating SSH directory");
    std::fs::create_dir_all(dir).map_err(|e| StoreError::CreateDirectory {
        path: dir.to_path_buf(),
        source: e,
    })?;

    // Set restrictive permissions on Unix (0700 = rwx------)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700)).map_err(|e| {
            StoreError::SetPermissions {
                path: dir.to_path_buf(),
                source: e,
            }
        })?;
    }

    Ok(())
}

/// An authorized_keys file bound to a resolved path.
///
/// Holds no cached state: every operation reads the file again, so edits
/// made by other processes between calls are always visible. No locking is
/// done; a rewrite racing with another process's append can drop that line.
#[derive(Debug, Clone)]
pub struct AuthorizedKeysStore {
    path: PathBuf,
}

impl AuthorizedKeysStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `<dir>/authorized_keys`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(AUTHORIZED_KEYS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory containing the file, owner-only, if it is missing.
    pub fn ensure_directory(&self) -> Result<()> {
        ensure_directory(self.parent_dir())
    }

    /// Every line of the file, blank and comment lines included.
    ///
    /// A missing file yields an empty list.
    pub fn entries(&self) -> Result<Vec<KeyEntry>> {
        Ok(self
            .read_if_exists()?
            .map(|content| content.lines().map(KeyEntry::parse).collect())
            .unwrap_or_default())
    }

    /// Trimmed credential lines in file order.
    ///
    /// Blank and `#` lines are skipped here but stay in the file. A missing
    /// file yields an empty list. Lines returned here are valid targets for
    /// [`remove`](Self::remove).
    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self
            .entries()?
            .iter()
            .filter_map(|entry| entry.key_line().map(str::to_string))
            .collect())
    }

    /// Parsed credential lines in [`list`](Self::list) order.
    ///
    /// Lines with fewer than two fields are skipped.
    pub fn keys(&self) -> Result<Vec<AuthorizedKey>> {
        Ok(self
            .list()?
            .iter()
            .filter_map(|line| AuthorizedKey::parse(line))
            .collect())
    }

    /// Append `"<material> <label>"` as a new line.
    ///
    /// The material is trimmed and must start with `ssh-`. The file is
    /// created with mode 0600 if absent. If the last record lacks a line
    /// terminator one is added first, so the previous line is never extended.
    ///
    /// # Errors
    /// `StoreError::InvalidKey` / `StoreError::InvalidLabel` before any I/O;
    /// `StoreError::Write` if the file cannot be opened or written.
    pub fn append(&self, material: &str, label: &str) -> Result<()> {
        let material = material.trim();
        if !material.starts_with(KEY_PREFIX) || contains_line_break(material) {
            return Err(StoreError::InvalidKey);
        }
        if contains_line_break(label) {
            return Err(StoreError::InvalidLabel(
                "label must not contain line breaks".to_string(),
            ));
        }

        let write_err = |e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        };

        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(write_err)?;

        let mut record = String::new();
        let len = file.metadata().map_err(write_err)?.len();
        if len > 0 && !ends_with_newline(&self.path).map_err(write_err)? {
            record.push('\n');
        }
        record.push_str(&format!("{} {}\n", material, label));

        file.write_all(record.as_bytes()).map_err(write_err)?;

        info!(path = %self.path.display(), label, "appended key");
        Ok(())
    }

    /// Remove every credential line equal to `exact_line` (both sides trimmed).
    ///
    /// Blank and comment lines are always kept. Returns how many lines were
    /// removed; when nothing matches the file is not rewritten at all.
    ///
    /// # Errors
    /// `StoreError::Read` if the file does not exist or cannot be read;
    /// `StoreError::Write` if the rewrite fails.
    pub fn remove(&self, exact_line: &str) -> Result<usize> {
        let content = self.read()?;
        let target = exact_line.trim();

        let (kept, removed): (Vec<&str>, Vec<&str>) = content
            .split_inclusive('\n')
            .partition(|raw| KeyEntry::parse(raw).key_line() != Some(target));

        if removed.is_empty() {
            debug!(path = %self.path.display(), "no matching key, file left unchanged");
            return Ok(0);
        }

        self.rewrite(&kept)?;
        info!(path = %self.path.display(), removed = removed.len(), "removed key");
        Ok(removed.len())
    }

    /// Remove the `index`-th line of [`list`](Self::list) (0-based).
    ///
    /// Unlike [`remove`](Self::remove), only that one line goes, even when
    /// identical copies exist elsewhere in the file. Returns the removed line.
    ///
    /// # Errors
    /// `StoreError::IndexOutOfRange` if there is no such key, plus the I/O
    /// errors of [`remove`](Self::remove).
    pub fn remove_at(&self, index: usize) -> Result<String> {
        let content = self.read()?;
        let lines: Vec<&str> = content.split_inclusive('\n').collect();

        let key_positions: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, raw)| KeyEntry::parse(raw).is_key())
            .map(|(pos, _)| pos)
            .collect();

        let target = *key_positions
            .get(index)
            .ok_or(StoreError::IndexOutOfRange {
                index,
                len: key_positions.len(),
            })?;

        let removed = lines[target].trim().to_string();
        let kept: Vec<&str> = lines
            .iter()
            .enumerate()
            .filter(|(pos, _)| *pos != target)
            .map(|(_, raw)| *raw)
            .collect();

        self.rewrite(&kept)?;
        info!(path = %self.path.display(), index, "removed key");
        Ok(removed)
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn read(&self) -> Result<String> {
        debug!(path = %self.path.display(), "reading authorized keys");
        std::fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            source: e,
        })
    }

    fn read_if_exists(&self) -> Result<Option<String>> {
        match self.read() {
            Ok(content) => Ok(Some(content)),
            Err(StoreError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the file with `lines`, each newline-terminated.
    ///
    /// Lines keep the terminator they were read with (`\n` or `\r\n`); only
    /// an unterminated final line gets a `\n`. Written to a temporary file in
    /// the same directory (0600) and renamed over the target, so readers never
    /// observe a truncated file.
    fn rewrite(&self, lines: &[&str]) -> Result<()> {
        let write_err = |e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        };

        let mut content = lines.concat();
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }

        let mut tmp = tempfile::NamedTempFile::new_in(self.parent_dir()).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        Ok(())
    }
}

fn contains_line_break(s: &str) -> bool {
    s.contains(['\n', '\r'])
}

/// Inspect the last byte through a separate read-only handle.
///
/// A file we may append to but not read is assumed to be terminated.
fn ends_with_newline(path: &Path) -> std::io::Result<bool> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => return Ok(true),
        Err(e) => return Err(e),
    };
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
