// SPDX-License-Identifier: PMPL-1.0-or-later

//! Authentication modes for an AtoM session.
//!
//! AtoM accepts either HTTP Basic credentials for a user account or a REST API
//! key sent in the [`API_KEY_HEADER`] header. The mode is chosen once, when the
//! client is built, and never changes afterwards.

use std::fmt;

/// Header carrying the API key in [`Auth::ApiKey`] mode.
pub const API_KEY_HEADER: &str = "REST-API-Key";

/// Authentication method for an AtoM session.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Auth {
    /// Anonymous access.
    #[default]
    None,
    /// API key passed via the `REST-API-Key` header.
    ApiKey(String),
    /// HTTP Basic authentication.
    Basic {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
}

impl Auth {
    /// Pick the authentication mode from optional credentials.
    ///
    /// A complete username/password pair wins over an API key; a lone
    /// username or password is ignored.
    pub fn select(
        username: Option<&str>,
        password: Option<&str>,
        api_key: Option<&str>,
    ) -> Self {
        match (username, password, api_key) {
            (Some(username), Some(password), _) => Auth::Basic {
                username: username.to_owned(),
                password: password.to_owned(),
            },
            (_, _, Some(key)) => Auth::ApiKey(key.to_owned()),
            _ => Auth::None,
        }
    }

    /// Short name of the mode, safe to log.
    pub fn scheme(&self) -> &'static str {
        match self {
            Auth::None => "none",
            Auth::ApiKey(_) => "api-key",
            Auth::Basic { .. } => "basic",
        }
    }
}

// Credentials never reach logs or panic messages.
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::ApiKey(_) => f.debug_tuple("ApiKey").field(&"<redacted>").finish(),
            Auth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}
