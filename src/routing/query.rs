//! Ordered query parameters for rewritten routes.

use serde::Serialize;

/// Immutable, ordered list of query parameters.
///
/// Built by chaining [`RouteQuery::with`] and serialized once when the
/// request URI is rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteQuery {
    params: Vec<(String, String)>,
}

impl RouteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `key=value` appended.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Append `key=value` only when `value` is present.
    #[must_use]
    pub fn with_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// Append every parameter of `other`, keeping order.
    #[must_use]
    pub fn chain(mut self, other: RouteQuery) -> Self {
        self.params.extend(other.params);
        self
    }

    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Serialize as `application/x-www-form-urlencoded`.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_in_order() {
        let q = RouteQuery::new()
            .with("id", 42)
            .with_opt("year", Some(2024))
            .with_opt::<u32>("month", None)
            .with("startpage", true);

        assert_eq!(q.to_query_string(), "id=42&year=2024&startpage=true");
        assert_eq!(q.get("year"), Some("2024"));
        assert_eq!(q.get("month"), None);
    }

    #[test]
    fn test_chain_and_encoding() {
        let base = RouteQuery::new().with("id", "a b");
        let q = base.chain(RouteQuery::new().with("tag", "x&y"));
        assert_eq!(q.params().len(), 2);
        assert_eq!(q.to_query_string(), "id=a+b&tag=x%26y");
        assert!(RouteQuery::new().is_empty());
    }
}
