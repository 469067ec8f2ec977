// ── URL query binder ──
//
// Query parameters are the durable half of the selection state. Writing
// one parameter must leave every other parameter, and their order, alone.

use std::fmt;

use indexmap::IndexMap;
use url::form_urlencoded;

/// Query parameter holding the selected server uri.
pub const SERVER_PARAM: &str = "s";
/// Query parameter holding the selected replica-set uuid.
pub const REPLICASET_PARAM: &str = "r";

/// Ordered query-string parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    params: IndexMap<String, String>,
}

impl SearchParams {
    /// Parse a query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            params: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Set or, with `None`, remove one parameter.
    pub fn set(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.params.insert(key.to_owned(), value.to_owned());
            }
            None => {
                self.params.shift_remove(key);
            }
        }
    }

    /// Copy with one parameter changed.
    #[must_use]
    pub fn with(&self, key: &str, value: Option<&str>) -> Self {
        let mut next = self.clone();
        next.set(key, value);
        next
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.params)
            .finish();
        f.write_str(&encoded)
    }
}

/// Path plus query, as seen by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    pub search: SearchParams,
}

impl Location {
    /// Parse `/path?query`. A missing path defaults to `/`.
    pub fn parse(raw: &str) -> Self {
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        Self {
            pathname: if path.is_empty() { "/".into() } else { path.into() },
            search: SearchParams::parse(query),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.search.get(key)
    }

    /// Same path with one query parameter changed.
    #[must_use]
    pub fn with_param(&self, key: &str, value: Option<&str>) -> Self {
        Self {
            pathname: self.pathname.clone(),
            search: self.search.with(key, value),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pathname)?;
        if !self.search.is_empty() {
            write!(f, "?{}", self.search)?;
        }
        Ok(())
    }
}
