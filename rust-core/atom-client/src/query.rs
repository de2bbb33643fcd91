// SPDX-License-Identifier: PMPL-1.0-or-later

//! Query parameters for the information-object collection endpoint.
//!
//! AtoM's browse endpoint takes numbered criteria: `sq0` holds the search
//! text, `sf0` restricts it to a field and `so0` joins it to the previous
//! criterion (`and`, `or`, `not`). `sort` orders the results and `sf_culture`
//! selects the translation returned.

use std::fmt;

/// Query parameter selecting the translation of returned metadata.
pub const CULTURE_PARAM: &str = "sf_culture";

/// Field name used for catalogue identifier lookups.
pub const IDENTIFIER_FIELD: &str = "identifier";

/// How a criterion combines with the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `sqN` / `sfN` / `soN` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    /// Search text.
    pub query: String,
    /// Field the text is matched against; `None` searches all fields.
    pub field: Option<String>,
    /// Operator joining this criterion to the previous one.
    pub operator: Option<Operator>,
}

/// Parameters for a search against the information-object collection.
///
/// # Examples
///
/// ```
/// use atom_client::query::SearchQuery;
///
/// let query = SearchQuery::identifier("AB-123").with_culture(Some("fr"));
/// let pairs = query.to_pairs();
/// assert_eq!(pairs[0], ("sq0".to_string(), "\"AB-123\"".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    criteria: Vec<Criterion>,
    sort: Option<String>,
    culture: Option<String>,
}

impl SearchQuery {
    /// An empty query: the unfiltered collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match lookup on the catalogue identifier, sorted by identifier.
    ///
    /// The value is wrapped in literal double quotes so the search index
    /// treats it as a phrase.
    pub fn identifier(identifier: &str) -> Self {
        Self::new()
            .criterion(format!("\"{identifier}\""), Some(IDENTIFIER_FIELD))
            .sorted_by(IDENTIFIER_FIELD)
    }

    /// Append a criterion matching `query`, optionally restricted to `field`.
    pub fn criterion(mut self, query: impl Into<String>, field: Option<&str>) -> Self {
        self.criteria.push(Criterion {
            query: query.into(),
            field: field.map(str::to_owned),
            operator: None,
        });
        self
    }

    /// Append a criterion joined to the previous ones with `operator`.
    pub fn criterion_with(
        mut self,
        operator: Operator,
        query: impl Into<String>,
        field: Option<&str>,
    ) -> Self {
        self.criteria.push(Criterion {
            query: query.into(),
            field: field.map(str::to_owned),
            operator: Some(operator),
        });
        self
    }

    /// Sort results by `sort` (e.g. `identifier`, `alphabetic`, `lastUpdated`).
    pub fn sorted_by(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Request metadata in `culture`. `None` leaves the server default.
    pub fn with_culture(mut self, culture: Option<&str>) -> Self {
        self.culture = culture.map(str::to_owned);
        self
    }

    /// Criteria in the order they will be numbered.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn culture(&self) -> Option<&str> {
        self.culture.as_deref()
    }

    /// Flatten into query-string pairs, in criterion order, then `sort`, then
    /// `sf_culture`. Unset values are omitted.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.criteria.len() * 3 + 2);
        for (index, criterion) in self.criteria.iter().enumerate() {
            pairs.push((format!("sq{index}"), criterion.query.clone()));
            if let Some(field) = &criterion.field {
                pairs.push((format!("sf{index}"), field.clone()));
            }
            if let Some(operator) = criterion.operator {
                pairs.push((format!("so{index}"), operator.to_string()));
            }
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_owned(), sort.clone()));
        }
        pairs.extend(culture_pair(self.culture.as_deref()));
        pairs
    }
}

/// The `sf_culture` pair, or nothing when no culture was requested.
pub(crate) fn culture_pair(culture: Option<&str>) -> Option<(String, String)> {
    culture.map(|c| (CULTURE_PARAM.to_owned(), c.to_owned()))
}
