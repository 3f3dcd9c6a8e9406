// ABOUTME: Line model for authorized_keys files.
// ABOUTME: Classifies raw lines and parses credential lines into algorithm, material and label.

use crate::error::Result;
use crate::fingerprint::compute_fingerprint;

/// Number of material characters shown by [`AuthorizedKey::summary`].
const SUMMARY_MATERIAL_CHARS: usize = 20;

/// A single physical line of an authorized_keys file.
///
/// The raw text is kept as read (minus the line terminator) so that blank
/// and comment lines can be written back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEntry {
    /// Empty or whitespace-only line.
    Blank(String),
    /// Line whose first non-whitespace character is `#`.
    Comment(String),
    /// Anything else: a credential line.
    Key(String),
}

impl KeyEntry {
    /// Classify a raw line.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            KeyEntry::Blank(raw.to_string())
        } else if trimmed.starts_with('#') {
            KeyEntry::Comment(raw.to_string())
        } else {
            KeyEntry::Key(raw.to_string())
        }
    }

    /// The line exactly as it appeared in the file.
    pub fn raw(&self) -> &str {
        match self {
            KeyEntry::Blank(s) | KeyEntry::Comment(s) | KeyEntry::Key(s) => s,
        }
    }

    pub fn is_key(&self) -> bool {
        matches!(self, KeyEntry::Key(_))
    }

    /// The trimmed credential line, or `None` for blank and comment lines.
    pub fn key_line(&self) -> Option<&str> {
        match self {
            KeyEntry::Key(s) => Some(s.trim()),
            _ => None,
        }
    }
}

/// Parsed view of a credential line: `algorithm material [label]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedKey {
    /// Key type token, e.g. `ssh-ed25519`.
    pub algorithm: String,
    /// Base64 key blob.
    pub material: String,
    /// Free-text label; internal whitespace collapsed to single spaces.
    pub label: Option<String>,
}

impl AuthorizedKey {
    /// Parse a credential line. Returns `None` if it has fewer than two fields.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let algorithm = fields.next()?.to_string();
        let material = fields.next()?.to_string();
        let rest: Vec<&str> = fields.collect();
        let label = if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        };

        Some(Self {
            algorithm,
            material,
            label,
        })
    }

    /// Render back to a single line.
    pub fn line(&self) -> String {
        match &self.label {
            Some(label) => format!("{} {} {}", self.algorithm, self.material, label),
            None => format!("{} {}", self.algorithm, self.material),
        }
    }

    /// Short human-readable form: `ssh-ed25519 AAAAC3NzaC1lZDI1NTE5... (label)`.
    pub fn summary(&self) -> String {
        let mut material: String = self.material.chars().take(SUMMARY_MATERIAL_CHARS).collect();
        if self.material.chars().count() > SUMMARY_MATERIAL_CHARS {
            material.push_str("...");
        }

        match &self.label {
            Some(label) => format!("{} {} ({})", self.algorithm, material, label),
            None => format!("{} {}", self.algorithm, material),
        }
    }

    /// True if both lines carry the same algorithm and key material,
    /// regardless of label.
    pub fn same_key(&self, other: &AuthorizedKey) -> bool {
        self.algorithm == other.algorithm && self.material == other.material
    }

    /// OpenSSH-style `SHA256:...` fingerprint of this key.
    pub fn fingerprint(&self) -> Result<String> {
        compute_fingerprint(&format!("{} {}", self.algorithm, self.material))
    }
}
