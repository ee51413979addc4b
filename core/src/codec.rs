//! JSON encoding and decoding with optional key rewriting.
//!
//! # Design
//! Payloads go through `serde_json::Value` only when a casing transform is
//! active; `KeyCasing::Identity` serializes straight to and from bytes.
//! `SnakeCase` rewrites object keys, never string values, and recurses into
//! nested objects and arrays.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// How object keys are rewritten between the wire and serde field names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCasing {
    /// Keys are sent and read exactly as serde names them.
    #[default]
    Identity,
    /// camelCase field names travel as snake_case keys on the wire.
    ///
    /// Acronyms do not survive the round trip: `baseURL` is sent as
    /// `base_url`, which reads back as `baseUrl`.
    SnakeCase,
}

/// Serialize `value` to JSON bytes.
pub fn encode<T: Serialize + ?Sized>(value: &T, casing: KeyCasing) -> Result<Vec<u8>, ApiError> {
    let bytes = match casing {
        KeyCasing::Identity => serde_json::to_vec(value),
        KeyCasing::SnakeCase => serde_json::to_value(value)
            .and_then(|v| serde_json::to_vec(&rewrite_keys(v, &to_snake_case))),
    };
    bytes.map_err(|e| ApiError::EncodeError(e.to_string()))
}

/// Deserialize JSON bytes into `T`.
///
/// Either the whole value is produced or a `DecodeError` is returned.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], casing: KeyCasing) -> Result<T, ApiError> {
    let result = match casing {
        KeyCasing::Identity => serde_json::from_slice(bytes),
        KeyCasing::SnakeCase => serde_json::from_slice::<Value>(bytes)
            .and_then(|v| serde_json::from_value(rewrite_keys(v, &to_camel_case))),
    };
    result.map_err(|e| {
        warn!(
            "failed to decode response: {e}; raw body: {}",
            String::from_utf8_lossy(bytes)
        );
        ApiError::DecodeError(e.to_string())
    })
}

fn rewrite_keys(value: Value, convert: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (convert(&k), rewrite_keys(v, convert)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| rewrite_keys(v, convert)).collect())
        }
        other => other,
    }
}

/// `userId` → `user_id`, `myURLValue` → `my_url_value`.
///
/// A run of capitals is treated as one word; the last capital of the run
/// starts the next word when a lowercase letter follows it.
pub fn to_snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `user_id` → `userId`.
///
/// Leading and trailing underscores are kept; keys without an inner
/// underscore are returned unchanged.
pub fn to_camel_case(key: &str) -> String {
    let trimmed = key.trim_matches('_');
    if trimmed.is_empty() || !trimmed.contains('_') {
        return key.to_string();
    }
    let leading = &key[..key.len() - key.trim_start_matches('_').len()];
    let trailing = &key[key.trim_end_matches('_').len()..];

    let mut out = String::with_capacity(key.len());
    out.push_str(leading);
    for (i, word) in trimmed.split('_').filter(|w| !w.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out.push_str(trailing);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Profile {
        user_id: u64,
        display_name: String,
        tags: Vec<String>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Wrapper {
        primary_profile: Profile,
        linked_profiles: Vec<Profile>,
    }

    fn profile() -> Profile {
        Profile {
            user_id: 7,
            display_name: "Ana".to_string(),
            tags: vec!["someValue".to_string()],
        }
    }

    #[test]
    fn identity_roundtrip_yields_equal_value() {
        let original = profile();
        let bytes = encode(&original, KeyCasing::Identity).unwrap();
        let back: Profile = decode(&bytes, KeyCasing::Identity).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn identity_keeps_serde_names() {
        let bytes = encode(&profile(), KeyCasing::Identity).unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["userId"], 7);
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn snake_case_encodes_user_id() {
        let bytes = encode(&profile(), KeyCasing::SnakeCase).unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["user_id"], 7);
        assert_eq!(json["display_name"], "Ana");
        // values are left alone
        assert_eq!(json["tags"][0], "someValue");
    }

    #[test]
    fn snake_case_decodes_into_camel_fields() {
        let body = br#"{"user_id":1,"display_name":"Ana","tags":[]}"#;
        let decoded: Profile = decode(body, KeyCasing::SnakeCase).unwrap();
        assert_eq!(decoded.user_id, 1);
        assert_eq!(decoded.display_name, "Ana");
    }

    #[test]
    fn snake_case_recurses_into_nested_values() {
        let wrapper = Wrapper {
            primary_profile: profile(),
            linked_profiles: vec![profile()],
        };
        let bytes = encode(&wrapper, KeyCasing::SnakeCase).unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["primary_profile"]["user_id"], 7);
        assert_eq!(json["linked_profiles"][0]["display_name"], "Ana");

        let back: Wrapper = decode(&bytes, KeyCasing::SnakeCase).unwrap();
        assert_eq!(back, wrapper);
    }

    #[test]
    fn identity_rejects_snake_case_wire_keys() {
        let body = br#"{"user_id":1,"display_name":"Ana","tags":[]}"#;
        let err = decode::<Profile>(body, KeyCasing::Identity).unwrap_err();
        assert!(matches!(err, ApiError::DecodeError(_)));
    }

    #[test]
    fn decode_fails_on_malformed_json() {
        let err = decode::<Profile>(b"{user_id: 1", KeyCasing::SnakeCase).unwrap_err();
        assert!(matches!(err, ApiError::DecodeError(_)));
    }

    #[test]
    fn decode_fails_on_shape_mismatch() {
        let err = decode::<Profile>(br#"{"userId":"seven"}"#, KeyCasing::Identity).unwrap_err();
        assert!(matches!(err, ApiError::DecodeError(_)));
    }

    #[test]
    fn encode_failure_is_reported() {
        use std::collections::HashMap;
        // JSON object keys must be strings.
        let map = HashMap::from([((1, 2), "tuple key")]);
        let err = encode(&map, KeyCasing::Identity).unwrap_err();
        assert!(matches!(err, ApiError::EncodeError(_)));
    }

    #[test]
    fn snake_case_loses_acronym_casing() {
        #[derive(Debug, Serialize, Deserialize)]
        struct Endpoint {
            #[serde(rename = "baseURL")]
            base_url: String,
        }

        let bytes = encode(
            &Endpoint {
                base_url: "x".to_string(),
            },
            KeyCasing::SnakeCase,
        )
        .unwrap();
        assert_eq!(bytes, br#"{"base_url":"x"}"#);

        let err = decode::<Endpoint>(&bytes, KeyCasing::SnakeCase).unwrap_err();
        assert!(matches!(err, ApiError::DecodeError(_)));
        assert_eq!(to_camel_case("base_url"), "baseUrl");
    }

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("userId"), "user_id");
        assert_eq!(to_snake_case("id"), "id");
        assert_eq!(to_snake_case("myURLValue"), "my_url_value");
        assert_eq!(to_snake_case("baseURL"), "base_url");
        assert_eq!(to_snake_case("version2Name"), "version2_name");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn camel_case_conversion() {
        assert_eq!(to_camel_case("user_id"), "userId");
        assert_eq!(to_camel_case("id"), "id");
        assert_eq!(to_camel_case("my_url_value"), "myUrlValue");
        assert_eq!(to_camel_case("_private_field_"), "_privateField_");
        assert_eq!(to_camel_case("double__gap"), "doubleGap");
        assert_eq!(to_camel_case("__"), "__");
    }

    #[test]
    fn key_casing_deserializes_from_config_names() {
        let casing: KeyCasing = serde_json::from_str(r#""snake_case""#).unwrap();
        assert_eq!(casing, KeyCasing::SnakeCase);
        assert_eq!(KeyCasing::default(), KeyCasing::Identity);
    }
}
