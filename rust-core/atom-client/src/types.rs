// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core data types shared by the client and its callers.
//!
//! AtoM does not publish a fixed schema for information objects, so records
//! are kept as untyped JSON objects. The server decides which ISAD(G) fields
//! appear and in which translation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AtomError;

/// One information object's ISAD(G) metadata as returned by AtoM.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Key set on every record fetched by slug.
pub const SLUG_KEY: &str = "slug";

/// Key holding the slug of a record's parent description.
pub const PARENT_KEY: &str = "parent";

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// URL scheme used to reach the AtoM server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Plain HTTP. Only sensible for local development.
    Http,
    /// HTTPS.
    #[default]
    Https,
}

impl Protocol {
    /// The scheme string as it appears in a URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = AtomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(AtomError::Validation(format!(
                "Unknown protocol '{other}'. Valid protocols: http, https"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_default_is_https() {
        assert_eq!(Protocol::default(), Protocol::Https);
    }

    #[test]
    fn test_protocol_parse_is_case_insensitive() {
        assert_eq!("HTTP".parse::<Protocol>().unwrap(), Protocol::Http);
        assert_eq!(" https ".parse::<Protocol>().unwrap(), Protocol::Https);
    }

    #[test]
    fn test_protocol_parse_rejects_unknown() {
        let err = "ftp".parse::<Protocol>().unwrap_err();
        assert!(matches!(err, AtomError::Validation(_)));
    }
}
