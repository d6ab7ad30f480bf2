//! Scheme manifest
//!
//! A serializable snapshot of every (version, kind, type) binding in a
//! [`Scheme`](crate::Scheme), checksummed so that two builds can be compared
//! for registry drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::version::ApiVersion;

/// One kind-name bound in a version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindEntry {
    pub kind: String,
    /// Rust type the kind resolves to
    pub type_name: String,
    /// Whether this is the name used when encoding the type
    pub canonical: bool,
}

/// All kinds bound in one version, sorted by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: ApiVersion,
    pub kinds: Vec<KindEntry>,
}

impl VersionEntry {
    pub fn canonical_kinds(&self) -> impl Iterator<Item = &KindEntry> {
        self.kinds.iter().filter(|k| k.canonical)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &KindEntry> {
        self.kinds.iter().filter(|k| !k.canonical)
    }
}

/// Manifest of a scheme, versions sorted oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeManifest {
    pub generated_at: DateTime<Utc>,
    pub versions: Vec<VersionEntry>,
    /// Checksum over `versions`; absent when disabled in configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<Checksum>,
    pub stats: ManifestStats,
}

/// Statistics about a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestStats {
    pub total_versions: usize,
    pub total_kinds: usize,
    pub aliases: usize,
}

impl SchemeManifest {
    pub(crate) fn new(versions: Vec<VersionEntry>) -> Self {
        let stats = ManifestStats {
            total_versions: versions.len(),
            total_kinds: versions.iter().map(|v| v.kinds.len()).sum(),
            aliases: versions.iter().map(|v| v.aliases().count()).sum(),
        };
        let checksum = Checksum::from_json(&versions).ok();

        Self {
            generated_at: Utc::now(),
            versions,
            checksum,
            stats,
        }
    }

    /// Drop the checksum, for exports that do not track drift
    pub fn without_checksum(mut self) -> Self {
        self.checksum = None;
        self
    }

    /// Recompute the checksum over the bindings and compare
    ///
    /// A manifest without a checksum never verifies.
    pub fn verify(&self) -> bool {
        self.checksum
            .as_ref()
            .is_some_and(|checksum| checksum.verify_json(&self.versions))
    }

    pub fn version(&self, version: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.version.as_str() == version)
    }
}
