//! Type Registry
//!
//! Maps (version, kind-name) to concrete Rust types and back. A `Scheme` is
//! built once during startup through `&mut self` registration calls, then
//! frozen by moving it behind an `Arc` and shared with every [`Codec`].
//!
//! Duplicate policy: registering an identical (version, kind, type) binding
//! again is a no-op. Binding a kind-name to a second, different type within a
//! version fails with [`SchemeError::KindConflict`].
//!
//! [`Codec`]: crate::Codec

use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SchemeError};
use crate::manifest::{KindEntry, SchemeManifest, VersionEntry};
use crate::object::{ApiObject, Kind, Object};
use crate::version::ApiVersion;

type EncodeFn = fn(&dyn Object) -> Result<Value>;
type DecodeFn = fn(Value) -> Result<Box<dyn Object>>;

/// Registration descriptor for one concrete type
///
/// Built with [`KnownType::of`], whose bounds are what keeps unmarked types
/// out of the registry:
///
/// ```compile_fail
/// use api_scheme::KnownType;
///
/// #[derive(Debug, serde::Serialize, serde::Deserialize)]
/// struct Helper;
///
/// let _ = KnownType::of::<Helper>();
/// ```
#[derive(Clone, Copy)]
pub struct KnownType {
    type_id: TypeId,
    type_name: &'static str,
    default_kind: &'static str,
    encode: EncodeFn,
    decode: DecodeFn,
}

impl KnownType {
    pub fn of<T: Kind + Serialize + DeserializeOwned>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            default_kind: T::KIND,
            encode: encode_as::<T>,
            decode: decode_as::<T>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rust type name, for diagnostics
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Kind-name declared by the type itself
    pub fn default_kind(&self) -> &'static str {
        self.default_kind
    }

    pub fn is<T: ApiObject>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub(crate) fn encode(&self, obj: &dyn Object) -> Result<Value> {
        (self.encode)(obj)
    }

    pub(crate) fn decode(&self, value: Value) -> Result<Box<dyn Object>> {
        (self.decode)(value)
    }
}

impl fmt::Debug for KnownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnownType")
            .field("type_name", &self.type_name)
            .field("default_kind", &self.default_kind)
            .finish()
    }
}

fn encode_as<T: ApiObject + Serialize>(obj: &dyn Object) -> Result<Value> {
    let typed = obj
        .downcast_ref::<T>()
        .ok_or_else(|| SchemeError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            actual: obj.type_name(),
        })?;
    serde_json::to_value(typed).map_err(|e| SchemeError::Encode(e.to_string()))
}

fn decode_as<T: ApiObject + DeserializeOwned>(value: Value) -> Result<Box<dyn Object>> {
    let typed: T = serde_json::from_value(value).map_err(|e| {
        SchemeError::Decode(format!("{}: {e}", std::any::type_name::<T>()))
    })?;
    Ok(Box::new(typed))
}

fn kind_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").expect("valid kind regex"))
}

/// Canonical name of a type within one version
#[derive(Debug, Clone)]
struct CanonicalKind {
    kind: String,
    /// Set by `add_known_types`; an alias-only name is replaced by a primary one
    primary: bool,
}

#[derive(Debug, Default)]
struct VersionTypes {
    kind_to_type: HashMap<String, KnownType>,
    type_to_kind: HashMap<TypeId, CanonicalKind>,
}

/// Version-scoped registry of kind-names and types
#[derive(Debug, Default)]
pub struct Scheme {
    versions: HashMap<ApiVersion, VersionTypes>,
}

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register each type under its declared kind-name as the canonical name
    ///
    /// The whole batch is checked before anything is bound: on error the
    /// scheme is left exactly as it was.
    pub fn add_known_types(
        &mut self,
        version: &str,
        types: impl IntoIterator<Item = KnownType>,
    ) -> Result<()> {
        let version = ApiVersion::parse(version)?;
        let types: Vec<KnownType> = types.into_iter().collect();

        let mut batch: HashMap<&str, &KnownType> = HashMap::with_capacity(types.len());
        for known in &types {
            self.check(&version, known.default_kind, known)?;
            if let Some(earlier) = batch.insert(known.default_kind, known) {
                if earlier.type_id != known.type_id {
                    return Err(SchemeError::KindConflict {
                        version: version.to_string(),
                        kind: known.default_kind.to_string(),
                        existing: earlier.type_name,
                        attempted: known.type_name,
                    });
                }
            }
        }

        for known in types {
            self.bind(&version, known.default_kind, known, true)?;
        }
        Ok(())
    }

    /// Register a single type under its declared kind-name
    pub fn add_known_type<T: Kind + Serialize + DeserializeOwned>(&mut self, version: &str) -> Result<()> {
        self.add_known_types(version, [KnownType::of::<T>()])
    }

    /// Register an additional kind-name for a type
    ///
    /// The name resolves to the type on decode but is never used to encode it
    /// once the type has a name registered through [`Scheme::add_known_types`].
    pub fn add_known_type_with_name(
        &mut self,
        version: &str,
        kind: &str,
        known: KnownType,
    ) -> Result<()> {
        let version = ApiVersion::parse(version)?;
        self.bind(&version, kind, known, false)
    }

    /// Fail if `kind` is malformed or already bound to another type
    fn check(&self, version: &ApiVersion, kind: &str, known: &KnownType) -> Result<()> {
        if !kind_pattern().is_match(kind) {
            return Err(SchemeError::InvalidKindName(kind.to_string()));
        }
        let existing = self
            .versions
            .get(version)
            .and_then(|types| types.kind_to_type.get(kind));
        match existing {
            Some(existing) if existing.type_id != known.type_id => Err(SchemeError::KindConflict {
                version: version.to_string(),
                kind: kind.to_string(),
                existing: existing.type_name,
                attempted: known.type_name,
            }),
            _ => Ok(()),
        }
    }

    fn bind(&mut self, version: &ApiVersion, kind: &str, known: KnownType, primary: bool) -> Result<()> {
        self.check(version, kind, &known)?;
        let types = self.versions.entry(version.clone()).or_default();

        match types.kind_to_type.entry(kind.to_string()) {
            Entry::Occupied(_) => {
                debug!(%version, kind, type_name = known.type_name, "binding already registered");
            }
            Entry::Vacant(slot) => {
                slot.insert(known);
                debug!(%version, kind, type_name = known.type_name, primary, "registered kind");
            }
        }

        match types.type_to_kind.entry(known.type_id) {
            Entry::Vacant(slot) => {
                slot.insert(CanonicalKind {
                    kind: kind.to_string(),
                    primary,
                });
            }
            Entry::Occupied(mut slot) => {
                if primary && !slot.get().primary {
                    slot.insert(CanonicalKind {
                        kind: kind.to_string(),
                        primary,
                    });
                }
            }
        }

        Ok(())
    }

    /// Resolve a kind-name (canonical or alias) to its registered type
    pub fn type_for(&self, version: &str, kind: &str) -> Result<&KnownType> {
        self.versions
            .get(version)
            .and_then(|types| types.kind_to_type.get(kind))
            .ok_or_else(|| SchemeError::NotFound {
                what: format!("kind {kind:?}"),
                version: version.to_string(),
            })
    }

    /// Canonical kind-name of a type; aliases are never returned
    pub fn kind_for(&self, version: &str, type_id: TypeId) -> Result<&str> {
        self.kind_for_id(version, type_id, || format!("type {type_id:?}"))
    }

    pub fn kind_for_type<T: ApiObject>(&self, version: &str) -> Result<&str> {
        self.kind_for_id(version, TypeId::of::<T>(), || {
            format!("type {}", std::any::type_name::<T>())
        })
    }

    pub fn kind_for_object(&self, version: &str, obj: &dyn Object) -> Result<&str> {
        self.kind_for_id(version, obj.concrete_type_id(), || {
            format!("type {}", obj.type_name())
        })
    }

    fn kind_for_id(&self, version: &str, type_id: TypeId, what: impl FnOnce() -> String) -> Result<&str> {
        self.versions
            .get(version)
            .and_then(|types| types.type_to_kind.get(&type_id))
            .map(|canonical| canonical.kind.as_str())
            .ok_or_else(|| SchemeError::NotFound {
                what: what(),
                version: version.to_string(),
            })
    }

    /// Whether `kind` is bound in `version`
    pub fn recognizes(&self, version: &str, kind: &str) -> bool {
        self.type_for(version, kind).is_ok()
    }

    /// All versions with at least one binding, oldest first
    pub fn versions(&self) -> Vec<&ApiVersion> {
        let mut versions: Vec<_> = self.versions.keys().collect();
        versions.sort();
        versions
    }

    /// All kind-names bound in `version`, aliases included, sorted
    pub fn known_kinds(&self, version: &str) -> Vec<&str> {
        let mut kinds: Vec<&str> = self
            .versions
            .get(version)
            .map(|types| types.kind_to_type.keys().map(String::as_str).collect())
            .unwrap_or_default();
        kinds.sort_unstable();
        kinds
    }

    /// Non-canonical names bound to `T` in `version`, sorted
    pub fn aliases_for<T: ApiObject>(&self, version: &str) -> Vec<&str> {
        let Some(types) = self.versions.get(version) else {
            return Vec::new();
        };
        let canonical = types.type_to_kind.get(&TypeId::of::<T>()).map(|c| c.kind.as_str());
        let mut aliases: Vec<&str> = types
            .kind_to_type
            .iter()
            .filter(|(kind, known)| known.is::<T>() && Some(kind.as_str()) != canonical)
            .map(|(kind, _)| kind.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    /// Closest registered kind-name to an unknown one, for error messages
    pub fn suggest_kind(&self, version: &str, kind: &str) -> Option<&str> {
        let types = self.versions.get(version)?;
        if let Some(exact) = types
            .kind_to_type
            .keys()
            .find(|known| known.eq_ignore_ascii_case(kind))
        {
            return Some(exact.as_str());
        }

        let matcher = SkimMatcherV2::default();
        types
            .kind_to_type
            .keys()
            .filter_map(|known| matcher.fuzzy_match(known, kind).map(|score| (score, known)))
            .max_by(|(a_score, a), (b_score, b)| {
                // ties go to the shorter, then alphabetically first, name
                a_score
                    .cmp(b_score)
                    .then_with(|| b.len().cmp(&a.len()))
                    .then_with(|| b.cmp(a))
            })
            .map(|(_, known)| known.as_str())
    }

    /// Snapshot of every binding, suitable for export
    pub fn manifest(&self) -> SchemeManifest {
        let versions = self
            .versions()
            .into_iter()
            .map(|version| {
                let types = &self.versions[version];
                let kinds = self
                    .known_kinds(version.as_str())
                    .into_iter()
                    .map(|kind| {
                        let known = &types.kind_to_type[kind];
                        let canonical = types
                            .type_to_kind
                            .get(&known.type_id)
                            .is_some_and(|c| c.kind == kind);
                        KindEntry {
                            kind: kind.to_string(),
                            type_name: known.type_name.to_string(),
                            canonical,
                        }
                    })
                    .collect();
                VersionEntry {
                    version: version.clone(),
                    kinds,
                }
            })
            .collect();
        SchemeManifest::new(versions)
    }
}
