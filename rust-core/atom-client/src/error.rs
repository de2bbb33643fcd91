// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the AtoM client.
//!
//! All fallible operations in this crate return [`Result<T>`], an alias for
//! `std::result::Result<T, AtomError>`. Session setup collapses every failure
//! into [`AtomError::NotAuthenticated`]; the `try_*` query methods report the
//! status-derived variants, which the plain query methods fold into `None`.

use thiserror::Error;

/// Error type for AtoM client operations.
#[derive(Error, Debug)]
pub enum AtomError {
    /// The probe request made while opening the session did not return
    /// `200 OK`, or could not be sent at all.
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    /// The requested information object does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected the credentials for this request (HTTP 401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-200 status returned by the server.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, or `HTTP <status>` when the body was empty.
        message: String,
    },

    /// An underlying HTTP / network transport error from `reqwest`.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The body decoded, but not into the shape the operation needs
    /// (e.g. a slug lookup that returned an array).
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Client-side validation failed before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AtomError {
    /// Whether this error came from a non-200 status code, as opposed to a
    /// transport, decode, or validation failure.
    ///
    /// These are the errors the compatibility query methods report as `None`.
    pub fn is_status(&self) -> bool {
        matches!(
            self,
            AtomError::NotFound(_) | AtomError::Unauthorized(_) | AtomError::Server { .. }
        )
    }
}

/// Crate-level result alias using [`AtomError`].
pub type Result<T> = std::result::Result<T, AtomError>;
