//! Per-client settings.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::codec::KeyCasing;
use crate::http::Headers;

/// Behavior that is fixed for every call made through one `Client`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Key rewriting applied to request and response bodies.
    pub key_casing: KeyCasing,
    /// Sent with every request; caller headers override them by name.
    #[serde(deserialize_with = "deserialize_headers")]
    pub default_headers: Headers,
    /// Add `Content-Type: application/json` to requests with a body when no
    /// content type was set.
    pub json_content_type: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            key_casing: KeyCasing::Identity,
            default_headers: Headers::new(),
            json_content_type: true,
        }
    }
}

impl ClientConfig {
    /// Load settings from a JSON document, e.g.
    /// `{"key_casing":"snake_case","default_headers":{"Accept":"application/json"}}`.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn with_key_casing(mut self, casing: KeyCasing) -> Self {
        self.key_casing = casing;
        self
    }

    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    pub fn with_json_content_type(mut self, enabled: bool) -> Self {
        self.json_content_type = enabled;
        self
    }
}

fn deserialize_headers<'de, D>(deserializer: D) -> Result<Headers, D::Error>
where
    D: serde::Deserializer<'de>,
{
    BTreeMap::<String, String>::deserialize(deserializer).map(|map| map.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_injects_json_content_type() {
        let config = ClientConfig::default();
        assert!(config.json_content_type);
        assert_eq!(config.key_casing, KeyCasing::Identity);
        assert!(config.default_headers.is_empty());
    }

    #[test]
    fn builder_methods() {
        let config = ClientConfig::default()
            .with_key_casing(KeyCasing::SnakeCase)
            .with_default_header("Accept", "application/json")
            .with_json_content_type(false);
        assert_eq!(config.key_casing, KeyCasing::SnakeCase);
        assert_eq!(config.default_headers.get("accept"), Some("application/json"));
        assert!(!config.json_content_type);
    }

    #[test]
    fn loads_from_json() {
        let config = ClientConfig::from_json(
            r#"{"key_casing":"snake_case","default_headers":{"Accept":"application/json"}}"#,
        )
        .unwrap();
        assert_eq!(config.key_casing, KeyCasing::SnakeCase);
        assert_eq!(config.default_headers.get("Accept"), Some("application/json"));
        assert!(config.json_content_type);
    }

    #[test]
    fn rejects_unknown_casing() {
        assert!(ClientConfig::from_json(r#"{"key_casing":"kebab"}"#).is_err());
    }
}
