// SPDX-License-Identifier: PMPL-1.0-or-later

//! Read operations on AtoM information objects.
//!
//! Each operation exists in two forms. The plain form (`get`, `search`, ...)
//! returns `Ok(None)` whenever the server answers with anything other than
//! `200 OK`. The `try_` form reports that status as [`AtomError::NotFound`],
//! [`AtomError::Unauthorized`] or [`AtomError::Server`]. Transport failures
//! and undecodable bodies are errors in both forms.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::{absent_on_status, AtomClient};
use crate::error::{AtomError, Result};
use crate::query::{culture_pair, SearchQuery};
use crate::types::{Record, PARENT_KEY, SLUG_KEY};

impl AtomClient {
    // -- Collection ---------------------------------------------------------

    /// Fetch the information-object collection in `culture`.
    ///
    /// `query` is accepted but not sent: the server returns the unfiltered,
    /// paged collection. Use [`AtomClient::search_query`] to filter.
    pub fn search(&self, query: &str, culture: Option<&str>) -> Result<Option<Value>> {
        absent_on_status(self.try_search(query, culture))
    }

    /// Strict form of [`AtomClient::search`].
    #[instrument(skip(self), level = "debug")]
    pub fn try_search(&self, query: &str, culture: Option<&str>) -> Result<Value> {
        debug!(query, "Search text is not forwarded");
        let pairs: Vec<_> = culture_pair(culture).into_iter().collect();
        self.fetch(self.collection_url(&pairs)?)
    }

    /// Run a structured search. Every criterion, the sort order and the
    /// culture of `query` are sent.
    pub fn search_query(&self, query: &SearchQuery) -> Result<Option<Value>> {
        absent_on_status(self.try_search_query(query))
    }

    /// Strict form of [`AtomClient::search_query`].
    #[instrument(skip(self), level = "debug")]
    pub fn try_search_query(&self, query: &SearchQuery) -> Result<Value> {
        self.fetch(self.collection_url(&query.to_pairs())?)
    }

    /// Look up information objects by catalogue identifier (not slug).
    ///
    /// Sends an exact-phrase match on the `identifier` field, sorted by
    /// identifier. The result is the server's search response, not a single
    /// record.
    pub fn get_by_identifier(&self, identifier: &str, culture: Option<&str>) -> Result<Option<Value>> {
        absent_on_status(self.try_get_by_identifier(identifier, culture))
    }

    /// Strict form of [`AtomClient::get_by_identifier`].
    pub fn try_get_by_identifier(&self, identifier: &str, culture: Option<&str>) -> Result<Value> {
        self.try_search_query(&SearchQuery::identifier(identifier).with_culture(culture))
    }

    // -- Single objects -----------------------------------------------------

    /// Fetch one information object by slug.
    ///
    /// The returned record always has `slug` set to the slug requested,
    /// replacing any value the server sent.
    ///
    /// # Errors
    ///
    /// [`AtomError::Validation`] for an empty slug and
    /// [`AtomError::UnexpectedResponse`] if the body is not a JSON object.
    pub fn get(&self, slug: &str, culture: Option<&str>) -> Result<Option<Record>> {
        absent_on_status(self.try_get(slug, culture))
    }

    /// Strict form of [`AtomClient::get`].
    #[instrument(skip(self), level = "debug")]
    pub fn try_get(&self, slug: &str, culture: Option<&str>) -> Result<Record> {
        if slug.is_empty() {
            return Err(AtomError::Validation("Slug must not be empty".into()));
        }

        let pairs: Vec<_> = culture_pair(culture).into_iter().collect();
        let Value::Object(mut record) = self.fetch(self.object_url(slug, &pairs)?)? else {
            return Err(AtomError::UnexpectedResponse(format!(
                "expected a JSON object for slug '{slug}'"
            )));
        };

        record.insert(SLUG_KEY.to_owned(), Value::String(slug.to_owned()));
        Ok(record)
    }

    /// Fetch the parent description of the object at `slug`.
    ///
    /// Returns `None` when the child cannot be fetched or carries no
    /// `parent` field. The parent is fetched in the server's default
    /// culture; `culture` applies to the child lookup only.
    pub fn get_parent(&self, slug: &str, culture: Option<&str>) -> Result<Option<Record>> {
        let Some(child) = self.get(slug, culture)? else {
            return Ok(None);
        };
        match parent_slug(&child)? {
            Some(parent) => self.get(&parent, None),
            None => Ok(None),
        }
    }

    /// Strict form of [`AtomClient::get_parent`].
    ///
    /// Errors from either lookup are returned; `Ok(None)` means the child
    /// exists but has no parent.
    #[instrument(skip(self), level = "debug")]
    pub fn try_get_parent(&self, slug: &str, culture: Option<&str>) -> Result<Option<Record>> {
        let child = self.try_get(slug, culture)?;
        match parent_slug(&child)? {
            Some(parent) => self.try_get(&parent, None).map(Some),
            None => Ok(None),
        }
    }
}

/// The `parent` slug of `record`. A missing, `null` or empty field means no
/// parent.
fn parent_slug(record: &Record) -> Result<Option<String>> {
    match record.get(PARENT_KEY) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(parent)) if parent.is_empty() => Ok(None),
        Some(Value::String(parent)) => Ok(Some(parent.clone())),
        Some(other) => Err(AtomError::UnexpectedResponse(format!(
            "parent field should be a slug string, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_parent_slug_present() {
        let child = record(json!({"slug": "child", "parent": "root"}));
        assert_eq!(parent_slug(&child).unwrap(), Some("root".to_string()));
    }

    #[test]
    fn test_parent_slug_absent_or_null() {
        assert_eq!(parent_slug(&record(json!({"slug": "orphan"}))).unwrap(), None);
        assert_eq!(parent_slug(&record(json!({"parent": null}))).unwrap(), None);
    }

    #[test]
    fn test_parent_slug_empty_string_is_none() {
        assert_eq!(parent_slug(&record(json!({"parent": ""}))).unwrap(), None);
    }

    #[test]
    fn test_parent_slug_rejects_non_string() {
        let err = parent_slug(&record(json!({"parent": 42}))).unwrap_err();
        assert!(matches!(err, AtomError::UnexpectedResponse(_)));
    }
}
