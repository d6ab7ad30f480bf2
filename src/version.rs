//! API version identifiers

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{Result, SchemeError};

/// Stability level encoded in a version identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stability {
    Alpha,
    Beta,
    Stable,
}

/// A wire schema version such as `v1`, `v1beta1` or `v2alpha3`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiVersion(String);

// Numbers are capped at nine digits so they always fit a u32
fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^v([1-9][0-9]{0,8})(?:(alpha|beta)([1-9][0-9]{0,8}))?$").expect("valid version regex")
    })
}

impl ApiVersion {
    /// Parse and validate a version identifier
    pub fn parse(version: &str) -> Result<Self> {
        if version_pattern().is_match(version) {
            Ok(Self(version.to_string()))
        } else {
            Err(SchemeError::InvalidVersion(version.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Major version number (the `1` in `v1beta1`)
    pub fn major(&self) -> u32 {
        self.captures().0
    }

    pub fn stability(&self) -> Stability {
        self.captures().1
    }

    /// Whether this is a pre-release (alpha or beta) version
    pub fn is_prerelease(&self) -> bool {
        self.stability() != Stability::Stable
    }

    fn captures(&self) -> (u32, Stability, u32) {
        let caps = version_pattern()
            .captures(&self.0)
            .expect("ApiVersion is validated on construction");
        let major = caps[1].parse().unwrap_or(0);
        let stability = match caps.get(2).map(|m| m.as_str()) {
            Some("alpha") => Stability::Alpha,
            Some("beta") => Stability::Beta,
            _ => Stability::Stable,
        };
        let level = caps.get(3).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
        (major, stability, level)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ApiVersion {
    type Err = SchemeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = SchemeError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl TryFrom<&str> for ApiVersion {
    type Error = SchemeError;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<ApiVersion> for String {
    fn from(v: ApiVersion) -> Self {
        v.0
    }
}

impl Borrow<str> for ApiVersion {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ApiVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Orders versions by major number, then alpha < beta < stable, then level.
impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.captures().cmp(&other.captures())
    }
}
