//! Version-bound codec
//!
//! A [`Codec`] encodes objects into the wire form of one version and decodes
//! payloads of that version back into concrete types, resolving kind-names
//! through a shared [`Scheme`].
//!
//! Version policy is strict: a payload declaring any other `apiVersion` is
//! rejected with [`SchemeError::VersionMismatch`].

use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::error::{Result, SchemeError};
use crate::meta::{TypeMeta, API_VERSION_FIELD, KIND_FIELD};
use crate::object::{ApiObject, Object};
use crate::scheme::Scheme;
use crate::version::ApiVersion;

/// Encoder/decoder bound to one scheme and one version
#[derive(Debug, Clone)]
pub struct Codec {
    scheme: Arc<Scheme>,
    version: ApiVersion,
    pretty: bool,
}

/// Build a codec for `version`, validating the identifier
pub fn codec_for(scheme: &Arc<Scheme>, version: &str) -> Result<Codec> {
    Ok(Codec::new(Arc::clone(scheme), ApiVersion::parse(version)?))
}

impl Codec {
    pub fn new(scheme: Arc<Scheme>, version: ApiVersion) -> Self {
        Self {
            scheme,
            version,
            pretty: false,
        }
    }

    /// Emit indented JSON from `encode`
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn version(&self) -> &ApiVersion {
        &self.version
    }

    pub fn scheme(&self) -> &Arc<Scheme> {
        &self.scheme
    }

    /// Encode an object under its canonical kind-name
    pub fn encode(&self, obj: &dyn Object) -> Result<Vec<u8>> {
        let version = self.version.as_str();
        let kind = self
            .scheme
            .kind_for_object(version, obj)
            .map_err(|_| SchemeError::UnregisteredKind {
                kind: obj.type_name().to_string(),
                version: version.to_string(),
                suggestion: None,
            })?;
        let known = self.scheme.type_for(version, kind)?;

        let mut map = match known.encode(obj)? {
            Value::Object(map) => map,
            other => {
                return Err(SchemeError::Encode(format!(
                    "{} must serialize to a JSON object, got {}",
                    obj.type_name(),
                    json_type(&other)
                )))
            }
        };
        if TypeMeta::is_reserved_in(&map) {
            return Err(SchemeError::Encode(format!(
                "{} reserves the top-level {API_VERSION_FIELD}/{KIND_FIELD} members",
                obj.type_name()
            )));
        }
        TypeMeta::new(version, kind).write_into(&mut map);
        trace!(version, kind, "encoded object");

        let value = Value::Object(map);
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&value)?
        } else {
            serde_json::to_vec(&value)?
        };
        Ok(bytes)
    }

    pub fn encode_to_string(&self, obj: &dyn Object) -> Result<String> {
        let bytes = self.encode(obj)?;
        String::from_utf8(bytes).map_err(|e| SchemeError::Encode(e.to_string()))
    }

    /// Decode a payload into a new instance of the type its kind resolves to
    ///
    /// Metadata is read and resolved before the body is parsed.
    pub fn decode(&self, data: &[u8]) -> Result<Box<dyn Object>> {
        let meta = TypeMeta::peek(data)?;
        let version = self.version.as_str();
        if meta.api_version != version {
            return Err(SchemeError::VersionMismatch {
                expected: version.to_string(),
                actual: meta.api_version,
            });
        }

        let known = self
            .scheme
            .type_for(version, &meta.kind)
            .map_err(|_| SchemeError::UnregisteredKind {
                suggestion: self.scheme.suggest_kind(version, &meta.kind).map(str::to_string),
                kind: meta.kind.clone(),
                version: version.to_string(),
            })?;
        trace!(version, kind = %meta.kind, type_name = known.type_name(), "decoding object");

        let value: Value = serde_json::from_slice(data)
            .map_err(|e| SchemeError::Decode(format!("malformed payload: {e}")))?;
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(SchemeError::Decode(format!(
                    "payload must be a JSON object, got {}",
                    json_type(&other)
                )))
            }
        };
        TypeMeta::strip_from(&mut map);

        known.decode(Value::Object(map))
    }

    /// Decode a payload that must resolve to `T`
    pub fn decode_into<T: ApiObject>(&self, data: &[u8]) -> Result<T> {
        let obj = self.decode(data)?;
        let actual = obj.type_name();
        obj.downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| SchemeError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                actual,
            })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
