//! Versioned API object families
//!
//! Each submodule owns one wire version and exposes `add_to_scheme`, called
//! once during startup before the scheme is shared.

pub mod v1beta1;

use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::scheme::Scheme;

/// Build the scheme with every known version registered, frozen for sharing
///
/// A registration error here means the build itself is inconsistent; callers
/// are expected to abort startup on `Err`.
pub fn build_scheme() -> Result<Arc<Scheme>> {
    let mut scheme = Scheme::new();
    v1beta1::add_to_scheme(&mut scheme)?;

    info!(
        versions = scheme.versions().len(),
        kinds = scheme.known_kinds(v1beta1::VERSION).len(),
        "scheme initialized"
    );
    Ok(Arc::new(scheme))
}
