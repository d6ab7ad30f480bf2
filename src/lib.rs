//! API Scheme
//!
//! A versioned object scheme and codec: one set of Rust types is encoded to
//! and decoded from independently evolving wire versions, and kinds can be
//! renamed without breaking older clients.
//!
//! ## Features
//!
//! - **Compile-time gating**: only types marked [`ApiObject`] can be registered
//! - **Version-scoped kinds**: each version owns its kind-name ↔ type table
//! - **Aliases**: old or future kind-names resolve to existing types on decode
//! - **Strict codecs**: payloads are checked against the codec's version
//! - **Manifests**: checksummed snapshots of every binding for drift checks
//!
//! ## Lifecycle
//!
//! ```text
//! startup:  Scheme::new() ── add_known_types / add_known_type_with_name ──┐
//!                                                                          │
//! serving:  Arc<Scheme> ── Codec(v1beta1) ── encode / decode  <────────────┘
//! ```
//!
//! ```
//! use std::sync::Arc;
//! use api_scheme::api::v1beta1::{self, Minion};
//! use api_scheme::Scheme;
//!
//! let mut scheme = Scheme::new();
//! v1beta1::add_to_scheme(&mut scheme)?;
//! let codec = v1beta1::codec(&Arc::new(scheme));
//!
//! let minion: Minion = codec.decode_into(br#"{"apiVersion":"v1beta1","kind":"Node","id":"n1"}"#)?;
//! assert_eq!(minion.meta.id, "n1");
//! # Ok::<(), api_scheme::SchemeError>(())
//! ```

pub mod api;
pub mod checksum;
pub mod codec;
pub mod config;
pub mod error;
pub mod manifest;
pub mod meta;
pub mod object;
pub mod scheme;
pub mod version;

pub use checksum::Checksum;
pub use codec::{codec_for, Codec};
pub use config::SchemeConfig;
pub use error::{Result, SchemeError};
pub use manifest::{KindEntry, SchemeManifest, VersionEntry};
pub use meta::TypeMeta;
pub use object::{ApiObject, Kind, Object};
pub use scheme::{KnownType, Scheme};
pub use version::{ApiVersion, Stability};
