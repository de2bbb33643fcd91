// SPDX-License-Identifier: PMPL-1.0-or-later

//! # AtoM client
//!
//! A blocking client for the REST API of AtoM (Access to Memory), the
//! archival description platform. It opens an authenticated session and reads
//! ISAD(G) information objects: by slug, by catalogue identifier, by parent,
//! or as a search over the collection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atom_client::{AtomClient, Protocol};
//!
//! fn main() -> atom_client::Result<()> {
//!     let client = AtomClient::new(
//!         Some("archivist"),
//!         Some("secret"),
//!         None,
//!         "archives.example.org",
//!         Protocol::Https,
//!     )?;
//!
//!     if let Some(parent) = client.get_parent("series-1-letters", None)? {
//!         println!("parent: {}", parent["slug"]);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`client`]: Session setup, authentication probe, and HTTP transport.
//! - [`information_objects`]: `search`, `get`, `get_by_identifier`, `get_parent`.
//! - [`query`]: Structured search parameters (`sqN`, `sfN`, `soN`, `sort`).
//! - [`auth`]: Basic / API key / anonymous authentication modes.
//! - [`config`]: Connection settings and `ATOM_*` environment loading.
//! - [`types`]: `Record` and `Protocol`.
//! - [`error`]: Error types and the crate-level `Result` alias.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod information_objects;
pub mod query;
pub mod types;

pub use auth::Auth;
pub use client::AtomClient;
pub use config::ClientConfig;
pub use error::{AtomError, Result};
pub use query::SearchQuery;
pub use types::{Protocol, Record};
