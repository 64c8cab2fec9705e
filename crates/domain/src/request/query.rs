//! Query parameter types

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A query parameter key-value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// The parameter key
    pub key: String,
    /// The parameter value
    pub value: String,
}

impl QueryParam {
    /// Creates a new query parameter.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An ordered collection of query parameters.
///
/// Parameters are serialized in insertion order, so the resulting query
/// string is deterministic for ordered inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    items: Vec<QueryParam>,
}

impl QueryParams {
    /// Creates an empty query parameter collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Builds a validated collection from key/value pairs.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyQuery`] when `pairs` yields nothing and
    /// [`DomainError::EmptyQueryValue`] for the first parameter with an empty value.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            let param = QueryParam::new(key, value);
            if param.value.is_empty() {
                return Err(DomainError::EmptyQueryValue(param.key));
            }
            params.add(param);
        }

        if params.is_empty() {
            return Err(DomainError::EmptyQuery);
        }
        Ok(params)
    }

    /// Adds a query parameter to the collection.
    pub fn add(&mut self, param: QueryParam) {
        self.items.push(param);
    }

    /// Returns all parameters.
    #[must_use]
    pub fn all(&self) -> &[QueryParam] {
        &self.items
    }

    /// Returns the number of parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serializes the parameters as `k=v&k=v`, form-urlencoding keys and values.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidQuery`] if the encoder rejects the input.
    pub fn to_query_string(&self) -> DomainResult<String> {
        let pairs: Vec<(&str, &str)> = self
            .items
            .iter()
            .map(|p| (p.key.as_str(), p.value.as_str()))
            .collect();
        serde_urlencoded::to_string(pairs).map_err(|e| DomainError::InvalidQuery(e.to_string()))
    }

    /// Returns `url` with the parameters appended.
    ///
    /// The separator is `?`, or `&` when `url` already carries a query.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidQuery`] if the parameters cannot be encoded.
    pub fn append_to(&self, url: &str) -> DomainResult<String> {
        let query = self.to_query_string()?;
        if query.is_empty() {
            return Ok(url.to_string());
        }

        let separator = match url.find('?') {
            Some(pos) if pos + 1 == url.len() || url.ends_with('&') => "",
            Some(_) => "&",
            None => "?",
        };
        Ok(format!("{url}{separator}{query}"))
    }
}

impl FromIterator<QueryParam> for QueryParams {
    fn from_iter<T: IntoIterator<Item = QueryParam>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
