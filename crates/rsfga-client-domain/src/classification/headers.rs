//! Case-insensitive response header access.

use std::collections::BTreeMap;

/// Header names the service uses for context fields, in lookup order.
pub mod header_names {
    /// Request id assigned by the service.
    pub const REQUEST_ID: &[&str] = &["fga-request-id", "x-request-id"];
    /// Store the call was executed against.
    pub const STORE_ID: &[&str] = &["store_id", "fga-store-id"];
    /// Authorization model the call was evaluated with.
    pub const AUTHORIZATION_MODEL_ID: &[&str] = &[
        "openfga_authorization_model_id",
        "openfga-authorization-model-id",
    ];
}

/// Response headers with lowercased names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: BTreeMap<String, String>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing any previous value for the same name.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the first non-empty value among `names`.
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.get(name))
            .find(|value| !value.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ResponseHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = ResponseHeaders::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let headers = ResponseHeaders::new().with("FGA-Request-Id", "req-1");
        assert_eq!(headers.get("fga-request-id"), Some("req-1"));
        assert_eq!(headers.get("FGA-REQUEST-ID"), Some("req-1"));
    }

    #[test]
    fn test_first_of_skips_missing_and_blank_values() {
        let headers: ResponseHeaders = [("fga-request-id", "  "), ("x-request-id", "req-2")]
            .into_iter()
            .collect();
        assert_eq!(headers.first_of(header_names::REQUEST_ID), Some("req-2"));
        assert_eq!(headers.first_of(header_names::STORE_ID), None);
    }
}
