//! HTTP Header types

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Content type sent with every request unless overridden.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// A single HTTP header with name and value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The header name (e.g., "Content-Type")
    pub name: String,
    /// The header value (e.g., "application/json")
    pub value: String,
}

impl Header {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A collection of HTTP headers.
///
/// Names are compared case-insensitively: inserting a header whose name
/// already exists replaces the stored value and keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    items: Vec<Header>,
}

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates the collection every request starts with:
    /// `Content-Type: application/json`.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut headers = Self::new();
        headers.insert(Header::new("Content-Type", DEFAULT_CONTENT_TYPE));
        headers
    }

    /// Builds a validated collection from name/value pairs.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyHeaders`] when `pairs` yields nothing and
    /// [`DomainError::EmptyHeaderValue`] for the first header with an empty value.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut headers = Self::new();
        for (name, value) in pairs {
            let header = Header::new(name, value);
            if header.value.is_empty() {
                return Err(DomainError::EmptyHeaderValue(header.name));
            }
            headers.insert(header);
        }

        if headers.is_empty() {
            return Err(DomainError::EmptyHeaders);
        }
        Ok(headers)
    }

    /// Inserts a header, replacing any header with the same name.
    pub fn insert(&mut self, header: Header) {
        match self
            .items
            .iter_mut()
            .find(|h| h.name.eq_ignore_ascii_case(&header.name))
        {
            Some(existing) => existing.value = header.value,
            None => self.items.push(header),
        }
    }

    /// Adds a header after the existing ones, keeping any with the same name.
    ///
    /// Used for received headers, where a name may legitimately repeat.
    pub fn append(&mut self, header: Header) {
        self.items.push(header);
    }

    /// Merges every header of `other` into this collection.
    pub fn merge(&mut self, other: Self) {
        for header in other.items {
            self.insert(header);
        }
    }

    /// Returns the value of the header with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Returns every value stored under the given name, in order.
    pub fn get_all<'h>(&'h self, name: &'h str) -> impl Iterator<Item = &'h str> {
        self.items
            .iter()
            .filter(move |h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Returns an iterator over the headers.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.items.iter()
    }

    /// Returns the number of headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len is not const in stable
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty is not const in stable
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<T: IntoIterator<Item = Header>>(iter: T) -> Self {
        let mut headers = Self::new();
        for header in iter {
            headers.insert(header);
        }
        headers
    }
}
