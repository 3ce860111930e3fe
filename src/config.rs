//! Client configuration parsed from environment variables.

use std::path::PathBuf;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://be.naars.knileshh.com/api";
pub const BASE_URL_ENV: &str = "REPAIRDESK_BASE_URL";
pub const SESSION_FILE_ENV: &str = "REPAIRDESK_SESSION_FILE";

const SESSION_DIR: &str = ".repairdesk";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend API root, without a trailing slash.
    pub base_url: String,
    /// Where the persisted session (token + user) lives.
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `REPAIRDESK_BASE_URL`: default `https://be.naars.knileshh.com/api`
    /// - `REPAIRDESK_SESSION_FILE`: default `$HOME/.repairdesk/session.json`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the base URL is not http(s).
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the base URL is not http(s).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let base_url = lookup(BASE_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let base_url = normalize_base_url(&base_url)?;

        let session_file = lookup(SESSION_FILE_ENV)
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| default_session_file(lookup("HOME")), PathBuf::from);

        Ok(Self { base_url, session_file })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            session_file: default_session_file(std::env::var("HOME").ok()),
        }
    }
}

/// Trim whitespace and trailing slashes, and require an http(s) scheme.
///
/// # Errors
///
/// Returns [`ApiError::Config`] for any other scheme.
pub fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::Config(format!(
            "invalid {BASE_URL_ENV} '{raw}' (expected http:// or https://)"
        )));
    }
    Ok(trimmed.to_owned())
}

fn default_session_file(home: Option<String>) -> PathBuf {
    let root = home.filter(|h| !h.is_empty()).map_or_else(PathBuf::new, PathBuf::from);
    root.join(SESSION_DIR).join(SESSION_FILE)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
