// SPDX-License-Identifier: PMPL-1.0-or-later

//! AtoM session setup, authentication, and HTTP transport.
//!
//! [`AtomClient`] owns the base URL, the authentication mode and a blocking
//! `reqwest` client that is reused for every request. Opening a client sends
//! one probe request; the information-object operations live in
//! [`crate::information_objects`] as further `impl AtomClient` blocks.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::auth::{Auth, API_KEY_HEADER};
use crate::config::ClientConfig;
use crate::error::{AtomError, Result};
use crate::types::Protocol;

/// Crate version, embedded in the `User-Agent` header.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Path segments of the information-object collection below the base URL.
pub const INFORMATION_OBJECTS_PATH: [&str; 2] = ["api", "informationobjects"];

/// `User-Agent` sent with every request: crate name, version and platform.
pub fn user_agent() -> String {
    format!(
        "atom-client/{VERSION} ({}/{}/{})",
        std::env::consts::OS,
        std::env::consts::FAMILY,
        std::env::consts::ARCH
    )
}

// ---------------------------------------------------------------------------
// AtomClient
// ---------------------------------------------------------------------------

/// An authenticated session against one AtoM server.
///
/// All calls block until the full response has arrived. No timeout applies
/// unless one was set in [`ClientConfig::timeout`].
///
/// # Examples
///
/// ```rust,no_run
/// use atom_client::{AtomClient, ClientConfig};
///
/// # fn main() -> atom_client::Result<()> {
/// let config = ClientConfig::new("archives.example.org").with_api_key("secret-key");
/// let client = AtomClient::connect(&config)?;
/// if let Some(record) = client.get("fonds-smith-family", Some("en"))? {
///     println!("{}", record["title"]);
/// }
/// # Ok(())
/// # }
/// ```
pub struct AtomClient {
    /// `{protocol}://{server}`, e.g. `https://archives.example.org`.
    base_url: Url,
    protocol: Protocol,
    /// Blocking HTTP client carrying the default headers.
    http: Client,
    auth: Auth,
}

impl AtomClient {
    // -- Constructors -------------------------------------------------------

    /// Open a session from loose credentials.
    ///
    /// A complete `username`/`password` pair selects Basic authentication;
    /// otherwise `api_key`, if given, is sent in the `REST-API-Key` header;
    /// otherwise the session is anonymous.
    ///
    /// # Errors
    ///
    /// See [`AtomClient::connect`].
    pub fn new(
        username: Option<&str>,
        password: Option<&str>,
        api_key: Option<&str>,
        server: &str,
        protocol: Protocol,
    ) -> Result<Self> {
        let config = ClientConfig {
            server: server.to_owned(),
            protocol,
            username: username.map(str::to_owned),
            password: password.map(str::to_owned),
            api_key: api_key.map(str::to_owned),
            timeout: None,
        };
        Self::connect(&config)
    }

    /// Open a session and validate it with a probe of the collection endpoint.
    ///
    /// # Errors
    ///
    /// - [`AtomError::Validation`] if the server name cannot form a URL or
    ///   the API key is not a legal header value. Nothing is sent.
    /// - [`AtomError::NotAuthenticated`] if the probe fails to send or returns
    ///   anything but `200 OK`. Redirects are not followed and count as
    ///   failures.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let base_url = base_url(config.protocol, &config.server)?;
        let auth = config.auth();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Auth::ApiKey(key) = &auth {
            let name = HeaderName::from_bytes(API_KEY_HEADER.as_bytes())
                .map_err(|e| AtomError::Validation(format!("Invalid header name: {e}")))?;
            let mut value = HeaderValue::from_str(key).map_err(|_| {
                AtomError::Validation("API key contains characters not allowed in a header".into())
            })?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        // reqwest is built without a bundled crypto provider. Ignore the error
        // when one is already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = Client::builder()
            .user_agent(user_agent())
            .default_headers(headers)
            .redirect(Policy::none())
            .timeout(config.timeout)
            .build()
            .map_err(AtomError::Network)?;

        let client = Self {
            base_url,
            protocol: config.protocol,
            http,
            auth,
        };
        client.probe()?;

        info!(
            base_url = %client.base_url,
            auth = client.auth.scheme(),
            "AtoM session established"
        );
        Ok(client)
    }

    /// Send the probe request. Every failure collapses to `NotAuthenticated`.
    fn probe(&self) -> Result<()> {
        let url = self.collection_url(&[])?;
        let response = self.apply_auth(self.http.get(url.clone())).send().map_err(|e| {
            warn!(url = %url, error = %e, "AtoM probe request failed");
            AtomError::NotAuthenticated(format!("probe of {url} failed: {e}"))
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(url = %url, status = status.as_u16(), "AtoM probe rejected");
            return Err(AtomError::NotAuthenticated(format!(
                "probe of {url} returned HTTP {}",
                status.as_u16()
            )));
        }
        Ok(())
    }

    // -- Accessors ----------------------------------------------------------

    /// Base URL of the server, without the API path.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Name of the authentication mode in use (`none`, `api-key`, `basic`).
    pub fn auth_scheme(&self) -> &'static str {
        self.auth.scheme()
    }

    // -- Internal HTTP helpers ----------------------------------------------

    /// URL of the information-object collection with `pairs` as the query.
    pub(crate) fn collection_url(&self, pairs: &[(String, String)]) -> Result<Url> {
        self.endpoint(None, pairs)
    }

    /// URL of a single information object. `slug` is encoded as one segment.
    pub(crate) fn object_url(&self, slug: &str, pairs: &[(String, String)]) -> Result<Url> {
        self.endpoint(Some(slug), pairs)
    }

    fn endpoint(&self, slug: Option<&str>, pairs: &[(String, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                AtomError::Validation(format!("{} cannot be used as a base URL", self.base_url))
            })?;
            segments.pop_if_empty().extend(INFORMATION_OBJECTS_PATH);
            if let Some(slug) = slug {
                segments.push(slug);
            }
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// Attach per-request credentials. The API key travels as a default
    /// header, so only Basic needs handling here.
    fn apply_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::Basic { username, password } => builder.basic_auth(username, Some(password)),
            Auth::ApiKey(_) | Auth::None => builder,
        }
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// Only `200 OK` counts as success; every other status becomes one of the
    /// status variants of [`AtomError`].
    pub(crate) fn fetch(&self, url: Url) -> Result<Value> {
        debug!(url = %url, "GET");
        let response = self.apply_auth(self.http.get(url.clone())).send()?;
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Response received");

        if status != StatusCode::OK {
            return Err(status_error(response));
        }

        let body = response.bytes()?;
        serde_json::from_slice(&body).map_err(AtomError::Serialization)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build `{protocol}://{server}`, rejecting inputs that would not name a host.
fn base_url(protocol: Protocol, server: &str) -> Result<Url> {
    let server = server.trim();
    if server.is_empty() {
        return Err(AtomError::Validation("Server must not be empty".into()));
    }
    if server.contains("://") {
        return Err(AtomError::Validation(format!(
            "Server '{server}' must not include a scheme; set the protocol instead"
        )));
    }

    let url = Url::parse(&format!("{protocol}://{server}"))
        .map_err(|e| AtomError::Validation(format!("Invalid server '{server}': {e}")))?;
    if url.host_str().is_none() {
        return Err(AtomError::Validation(format!("Server '{server}' has no host")));
    }
    Ok(url)
}

/// Error body shape some AtoM endpoints return.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

/// Turn a non-200 response into the matching [`AtomError`] variant.
fn status_error(response: Response) -> AtomError {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();

    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) if !body.trim().is_empty() => body.trim().to_owned(),
        Err(_) => format!("HTTP {status}"),
    };

    match status {
        404 => AtomError::NotFound(message),
        401 | 403 => AtomError::Unauthorized(message),
        _ => AtomError::Server { status, message },
    }
}

/// Fold status errors into `None`, keeping transport and decode errors.
pub(crate) fn absent_on_status<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_status() => {
            debug!(error = %err, "Non-200 response, returning no result");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
