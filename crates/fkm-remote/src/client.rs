// ABOUTME: Blocking HTTP client for `/users/{username}/keys` endpoints.
// ABOUTME: One implementation serves every platform; the Platform value carries the differences.

use crate::error::{RemoteError, Result};
use crate::platform::{Platform, RemoteKey};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::StatusCode;
use tracing::debug;

/// User-Agent sent when none is configured. GitHub rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = concat!("fkm/", env!("CARGO_PKG_VERSION"));

/// Characters escaped when placing a username in a URL path segment.
///
/// `\` is included because URL parsing treats it as `/` in http(s) paths.
/// Escaping cannot neutralise `.` and `..` (`%2E%2E` is still a dot
/// segment), so those are rejected before a URL is built.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'\\')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Source of a user's published public keys.
pub trait KeyFetcher {
    fn platform(&self) -> &Platform;

    /// All public keys published by `username`. An empty list is not an error.
    fn user_keys(&self, username: &str) -> Result<Vec<RemoteKey>>;
}

/// [`KeyFetcher`] over plain unauthenticated HTTP GETs.
///
/// No retries and no timeout beyond the client defaults.
pub struct HttpKeyFetcher {
    platform: Platform,
    client: reqwest::blocking::Client,
}

impl HttpKeyFetcher {
    pub fn new(platform: Platform) -> Result<Self> {
        Self::with_user_agent(platform, DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(platform: Platform, user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(RemoteError::Client)?;

        Ok(Self { platform, client })
    }

    pub fn github() -> Result<Self> {
        Self::new(Platform::github())
    }

    pub fn gitlab() -> Result<Self> {
        Self::new(Platform::gitlab())
    }

    fn keys_url(&self, username: &str) -> String {
        format!(
            "{}/users/{}/keys",
            self.platform.base_url,
            utf8_percent_encode(username, PATH_SEGMENT)
        )
    }
}

impl KeyFetcher for HttpKeyFetcher {
    fn platform(&self) -> &Platform {
        &self.platform
    }

    fn user_keys(&self, username: &str) -> Result<Vec<RemoteKey>> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RemoteError::InvalidUsername("cannot be empty"));
        }
        if username == "." || username == ".." {
            return Err(RemoteError::InvalidUsername("cannot be a dot segment"));
        }

        let url = self.keys_url(username);
        debug!(platform = %self.platform.name, %url, "fetching public keys");

        let network_err = |e| RemoteError::Network {
            platform: self.platform.name.clone(),
            source: e,
        };

        let resp = self.client.get(&url).send().map_err(network_err)?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(RemoteError::Status {
                platform: self.platform.name.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(network_err)?;
        let keys: Vec<RemoteKey> =
            serde_json::from_str(&body).map_err(|e| RemoteError::Parse {
                platform: self.platform.name.clone(),
                source: e,
            })?;

        debug!(platform = %self.platform.name, count = keys.len(), "fetched public keys");
        Ok(keys)
    }
}
