// SPDX-License-Identifier: PMPL-1.0-or-later

//! Connection settings for an AtoM session.
//!
//! A [`ClientConfig`] can be assembled in code with the `with_*` methods or
//! read from `ATOM_*` environment variables via [`ClientConfig::from_env`].

use std::fmt;
use std::time::Duration;

use crate::auth::Auth;
use crate::error::{AtomError, Result};
use crate::types::Protocol;

/// Environment variable naming the AtoM host (required by `from_env`).
pub const ENV_SERVER: &str = "ATOM_SERVER";
/// Environment variable selecting `http` or `https`.
pub const ENV_PROTOCOL: &str = "ATOM_PROTOCOL";
/// Environment variable with the Basic-auth username.
pub const ENV_USERNAME: &str = "ATOM_USERNAME";
/// Environment variable with the Basic-auth password.
pub const ENV_PASSWORD: &str = "ATOM_PASSWORD";
/// Environment variable with the REST API key.
pub const ENV_API_KEY: &str = "ATOM_API_KEY";
/// Environment variable with a request timeout in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "ATOM_TIMEOUT_SECS";

/// Settings used by [`AtomClient::connect`](crate::client::AtomClient::connect).
#[derive(Clone, Default)]
pub struct ClientConfig {
    /// Host name of the AtoM server, optionally with `:port` and a path prefix.
    pub server: String,
    /// URL scheme.
    pub protocol: Protocol,
    /// Username for Basic authentication.
    pub username: Option<String>,
    /// Password for Basic authentication.
    pub password: Option<String>,
    /// REST API key, used when no complete username/password pair is set.
    pub api_key: Option<String>,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Anonymous HTTPS settings for `server`.
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Default::default()
        }
    }

    /// Read settings from the `ATOM_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`AtomError::Validation`] if `ATOM_SERVER` is unset or if
    /// `ATOM_PROTOCOL` / `ATOM_TIMEOUT_SECS` cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let server = non_empty(ENV_SERVER)
            .ok_or_else(|| AtomError::Validation(format!("{ENV_SERVER} is not set")))?;

        let protocol = match non_empty(ENV_PROTOCOL) {
            Some(value) => value.parse()?,
            None => Protocol::default(),
        };

        let timeout = match non_empty(ENV_TIMEOUT_SECS) {
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|_| {
                    AtomError::Validation(format!(
                        "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{value}'"
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            server,
            protocol,
            username: non_empty(ENV_USERNAME),
            password: non_empty(ENV_PASSWORD),
            api_key: non_empty(ENV_API_KEY),
            timeout,
        })
    }

    /// Set the URL scheme.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set Basic-auth credentials.
    pub fn with_basic(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the REST API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The authentication mode these settings select.
    pub fn auth(&self) -> Auth {
        Auth::select(
            self.username.as_deref(),
            self.password.as_deref(),
            self.api_key.as_deref(),
        )
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("ClientConfig")
            .field("server", &self.server)
            .field("protocol", &self.protocol)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("api_key", &redact(&self.api_key))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_env_requires_server() {
        let err = ClientConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AtomError::Validation(_)));
    }

    #[test]
    fn test_from_env_reads_all_fields() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_SERVER, "archives.example.org"),
            (ENV_PROTOCOL, "http"),
            (ENV_USERNAME, "archivist"),
            (ENV_PASSWORD, "secret"),
            (ENV_API_KEY, "key"),
            (ENV_TIMEOUT_SECS, "15"),
        ]))
        .unwrap();

        assert_eq!(config.server, "archives.example.org");
        assert_eq!(config.protocol, Protocol::Http);
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.auth().scheme(), "basic");
    }

    #[test]
    fn test_from_env_treats_blank_as_unset() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_SERVER, "archives.example.org"),
            (ENV_USERNAME, ""),
            (ENV_API_KEY, "key"),
        ]))
        .unwrap();

        assert_eq!(config.protocol, Protocol::Https);
        assert_eq!(config.username, None);
        assert_eq!(config.auth(), Auth::ApiKey("key".into()));
    }

    #[test]
    fn test_from_env_rejects_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup_from(&[
            (ENV_SERVER, "archives.example.org"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AtomError::Validation(_)));
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = ClientConfig::new("archives.example.org")
            .with_basic("archivist", "hunter2")
            .with_api_key("tok-123");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("archivist"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("tok-123"));
    }
}
