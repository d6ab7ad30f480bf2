//! Configuration for the scheme tooling
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (scheme.toml)
//! - Environment variables (SCHEME__*)
//!
//! ## Example config file (scheme.toml):
//! ```toml
//! [codec]
//! version = "v1beta1"
//! pretty = true
//!
//! [manifest]
//! include_checksum = true
//! output = "scheme-manifest.json"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::version::ApiVersion;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemeConfig {
    #[serde(default)]
    pub codec: CodecConfig,

    #[serde(default)]
    pub manifest: ManifestConfig,
}

/// Codec settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Wire version payloads are encoded to and decoded from
    #[serde(default = "default_version")]
    pub version: String,

    /// Indent encoded JSON
    #[serde(default)]
    pub pretty: bool,
}

/// Manifest export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    #[serde(default = "default_true")]
    pub include_checksum: bool,

    /// Default output file; stdout when unset
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_version() -> String {
    crate::api::v1beta1::VERSION.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            pretty: false,
        }
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            include_checksum: true,
            output: None,
        }
    }
}

impl SchemeConfig {
    /// Load configuration from default locations
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the defaults
    pub fn load_from(config_path: Option<&str>) -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "scheme.toml",
            ".scheme.toml",
            "config/scheme.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "api-scheme", "scheme") {
            let xdg_config = config_dir.config_dir().join("scheme.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCHEME")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// The configured codec version, validated
    pub fn codec_version(&self) -> Result<ApiVersion> {
        ApiVersion::parse(&self.codec.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = SchemeConfig::default();
        assert_eq!(config.codec.version, "v1beta1");
        assert!(!config.codec.pretty);
        assert!(config.manifest.include_checksum);
        assert_eq!(config.codec_version().unwrap().as_str(), "v1beta1");
    }

    #[test]
    fn test_serialize_config() {
        let config = SchemeConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[codec]"));
        assert!(toml_str.contains("[manifest]"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[codec]\nversion = \"v1beta3\"\npretty = true\n\n[manifest]\ninclude_checksum = false\n",
        )
        .unwrap();

        let config = SchemeConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.codec.version, "v1beta3");
        assert!(config.codec.pretty);
        assert!(!config.manifest.include_checksum);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = SchemeConfig::default();
        config.codec.version = "v2".to_string();
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = SchemeConfig::load_from(path.to_str()).unwrap();
        assert_eq!(loaded.codec.version, "v2");
    }

    #[test]
    fn test_invalid_version_rejected() {
        let mut config = SchemeConfig::default();
        config.codec.version = "beta".to_string();
        assert!(config.codec_version().is_err());
    }
}
