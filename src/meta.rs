//! Wire metadata carried by every encoded payload
//!
//! Payloads are JSON objects with two reserved top-level members:
//!
//! ```json
//! { "apiVersion": "v1beta1", "kind": "Pod", "id": "web-1", ... }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SchemeError};

pub const API_VERSION_FIELD: &str = "apiVersion";
pub const KIND_FIELD: &str = "kind";

/// Version and kind-name of an encoded object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeMeta {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
}

/// Lenient shape used to read metadata without touching the body
#[derive(Deserialize)]
struct PartialMeta {
    #[serde(rename = "apiVersion", default)]
    api_version: Option<Value>,
    #[serde(default)]
    kind: Option<Value>,
}

impl TypeMeta {
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    /// Read the metadata of a payload without resolving or parsing its body
    pub fn peek(data: &[u8]) -> Result<Self> {
        let partial: PartialMeta = serde_json::from_slice(data)
            .map_err(|e| SchemeError::Decode(format!("malformed payload: {e}")))?;
        Self::from_parts(partial.api_version.as_ref(), partial.kind.as_ref())
    }

    /// Drop the metadata members from a body already checked by [`TypeMeta::peek`]
    pub(crate) fn strip_from(map: &mut Map<String, Value>) {
        map.remove(API_VERSION_FIELD);
        map.remove(KIND_FIELD);
    }

    /// Whether an encoded body already uses a reserved member
    pub(crate) fn is_reserved_in(map: &Map<String, Value>) -> bool {
        map.contains_key(API_VERSION_FIELD) || map.contains_key(KIND_FIELD)
    }

    /// Inline the metadata members into an encoded JSON object
    ///
    /// Callers check [`TypeMeta::is_reserved_in`] first; existing members are replaced.
    pub(crate) fn write_into(&self, map: &mut Map<String, Value>) {
        map.insert(API_VERSION_FIELD.to_string(), Value::String(self.api_version.clone()));
        map.insert(KIND_FIELD.to_string(), Value::String(self.kind.clone()));
    }

    fn from_parts(api_version: Option<&Value>, kind: Option<&Value>) -> Result<Self> {
        Ok(Self {
            api_version: required_string(API_VERSION_FIELD, api_version)?,
            kind: required_string(KIND_FIELD, kind)?,
        })
    }
}

fn required_string(field: &str, value: Option<&Value>) -> Result<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) | None | Some(Value::Null) => {
            Err(SchemeError::Decode(format!("missing {field} metadata")))
        }
        Some(other) => Err(SchemeError::Decode(format!(
            "{field} metadata must be a string, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_reads_metadata_only() {
        let meta = TypeMeta::peek(br#"{"kind":"Node","apiVersion":"v1beta1","body":{"x":[1,2]}}"#).unwrap();
        assert_eq!(meta, TypeMeta::new("v1beta1", "Node"));
    }

    #[test]
    fn test_peek_missing_metadata() {
        let err = TypeMeta::peek(br#"{"kind":"Pod"}"#).unwrap_err();
        assert!(matches!(err, SchemeError::Decode(msg) if msg.contains("apiVersion")));

        let err = TypeMeta::peek(br#"{"apiVersion":"v1beta1","kind":""}"#).unwrap_err();
        assert!(matches!(err, SchemeError::Decode(msg) if msg.contains("kind")));
    }

    #[test]
    fn test_peek_rejects_non_string_metadata() {
        let err = TypeMeta::peek(br#"{"apiVersion":1,"kind":"Pod"}"#).unwrap_err();
        assert!(matches!(err, SchemeError::Decode(_)));
    }

    #[test]
    fn test_peek_rejects_duplicate_metadata() {
        let err = TypeMeta::peek(br#"{"apiVersion":"v1beta1","kind":"Pod","kind":"Node"}"#).unwrap_err();
        assert!(matches!(err, SchemeError::Decode(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_peek_malformed() {
        assert!(matches!(TypeMeta::peek(b"{not json"), Err(SchemeError::Decode(_))));
        assert!(matches!(TypeMeta::peek(b"[1,2,3]"), Err(SchemeError::Decode(_))));
    }

    #[test]
    fn test_write_and_strip() {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from("web"));
        assert!(!TypeMeta::is_reserved_in(&map));

        TypeMeta::new("v1", "Pod").write_into(&mut map);
        assert!(TypeMeta::is_reserved_in(&map));
        assert_eq!(map[KIND_FIELD], "Pod");

        TypeMeta::strip_from(&mut map);
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("id"));
    }
}
