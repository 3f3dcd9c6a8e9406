// ABOUTME: Fetches public SSH keys published on developer-platform profiles.
// ABOUTME: GitHub and GitLab share one client; per-platform settings live in Platform.

pub mod client;
pub mod error;
pub mod platform;

pub use client::{HttpKeyFetcher, KeyFetcher, DEFAULT_USER_AGENT};
pub use error::{RemoteError, Result};
pub use platform::{Platform, RemoteKey};
