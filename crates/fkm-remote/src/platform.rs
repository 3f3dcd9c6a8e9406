// ABOUTME: Per-platform configuration for key fetching.
// ABOUTME: Fixed GitHub and GitLab endpoints plus custom instances.

use serde::Deserialize;

/// A public key published on a developer-platform profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteKey {
    pub id: u64,
    pub key: String,
}

/// Where and how to reach one developer platform's API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Display name used in error messages, e.g. `GitHub`.
    pub name: String,
    /// Lowercase identifier used in synthesized key labels, e.g. `github`.
    pub slug: String,
    /// API root without trailing slash; keys live at `{base_url}/users/{username}/keys`.
    pub base_url: String,
}

impl Platform {
    pub fn github() -> Self {
        Self::custom("GitHub", "github", "https://api.github.com")
    }

    pub fn gitlab() -> Self {
        Self::custom("GitLab", "gitlab", "https://gitlab.com/api/v4")
    }

    /// Any API serving the same `/users/{username}/keys` shape, such as a
    /// self-hosted GitLab.
    pub fn custom(
        name: impl Into<String>,
        slug: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            name: name.into(),
            slug: slug.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_platforms() {
        let github = Platform::github();
        assert_eq!(github.name, "GitHub");
        assert_eq!(github.slug, "github");
        assert_eq!(github.base_url, "https://api.github.com");

        let gitlab = Platform::gitlab();
        assert_eq!(gitlab.name, "GitLab");
        assert_eq!(gitlab.slug, "gitlab");
        assert_eq!(gitlab.base_url, "https://gitlab.com/api/v4");
    }

    #[test]
    fn test_custom_strips_trailing_slash() {
        let platform = Platform::custom("Forge", "forge", "https://git.example.com/api/v4/");
        assert_eq!(platform.base_url, "https://git.example.com/api/v4");
    }

    #[test]
    fn test_remote_key_ignores_extra_fields() {
        let body = r#"[{"id": 42, "key": "ssh-ed25519 AAAA", "title": "laptop", "created_at": "2024-01-01"}]"#;
        let keys: Vec<RemoteKey> = serde_json::from_str(body).expect("should decode");
        assert_eq!(
            keys,
            vec![RemoteKey {
                id: 42,
                key: "ssh-ed25519 AAAA".to_string()
            }]
        );
    }
}
