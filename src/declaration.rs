//! The TOML declaration surface.
//!
//! A declaration names one managed Hipache instance: package name, version,
//! config path, per-option values (flattened at the top level), and an
//! optional `[config]` table that overrides every structured option. A
//! missing declaration file yields all defaults.
//!
//! ```toml
//! version = "0.3.1"
//! config_path = "/etc/hipache/hipache.json"
//! https_port = 8443
//! https_bind = "0.0.0.0"
//! ```

use crate::error::{Error, Result};
use crate::settings::{ProxySettings, Version};
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default location of the declaration file.
pub const DEFAULT_DECLARATION: &str = "/etc/hipachectl.toml";

/// A declared Hipache instance, as read from TOML and CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Declaration {
    /// Package and service name
    #[serde(default = "default_name")]
    pub name: String,

    /// Requested package version, `latest` or `x.y.z`
    #[serde(default = "default_version")]
    pub version: String,

    /// Where the generated JSON config is written
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,

    /// Opaque full-config override; supersedes all structured options
    #[serde(default)]
    pub config: Option<toml::Table>,

    /// Structured per-option values, keyed by schema key
    #[serde(flatten)]
    pub options: BTreeMap<String, toml::Value>,
}

impl Default for Declaration {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            config_path: default_config_path(),
            config: None,
            options: BTreeMap::new(),
        }
    }
}

fn default_name() -> String {
    "hipache".to_string()
}

fn default_version() -> String {
    "latest".to_string()
}

fn default_config_path() -> PathBuf {
    PathBuf::from("/etc/hipache.json")
}

impl Declaration {
    /// Load a declaration from a TOML file, or defaults if it is missing.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read declaration file: {}", path.display()))?;
        let declaration: Self = toml::from_str(&content)
            .with_context(|| format!("invalid TOML in {}", path.display()))?;
        Ok(declaration)
    }

    /// The validated package version.
    pub fn version(&self) -> Result<Version> {
        self.version.parse()
    }

    /// The directory holding the config file.
    pub fn config_dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .map_or_else(|| PathBuf::from("/"), Path::to_path_buf)
    }

    /// Build validated settings from this declaration.
    ///
    /// The override, when present, is installed first so that any
    /// structured option alongside it fails with
    /// `ConflictingConfiguration`. All schema validation and coercion
    /// happens here, before any reconciliation step runs.
    pub fn settings(&self) -> Result<ProxySettings> {
        let mut settings = ProxySettings::new();
        if let Some(config) = &self.config {
            let value = serde_json::to_value(config)?;
            match value {
                serde_json::Value::Object(map) => settings.set_override(map),
                other => {
                    return Err(Error::InvalidType {
                        key: "config".to_string(),
                        expected: "table",
                        actual: format!("{other}"),
                    });
                }
            }
        }
        for (key, value) in &self.options {
            settings.set(key, serde_json::to_value(value)?)?;
        }
        Ok(settings)
    }

    /// Validate everything that can fail without touching the system.
    pub fn validate(&self) -> Result<()> {
        self.version()?;
        self.settings()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(toml_text: &str) -> Declaration {
        toml::from_str(toml_text).unwrap()
    }

    #[test]
    fn empty_declaration_uses_defaults() {
        let declaration = parse("");
        assert_eq!(declaration.name, "hipache");
        assert_eq!(declaration.version().unwrap(), Version::Latest);
        assert_eq!(declaration.config_path, PathBuf::from("/etc/hipache.json"));
        assert_eq!(declaration.config_dir(), PathBuf::from("/etc"));
    }

    #[test]
    fn flattened_options_reach_settings() {
        let declaration = parse("https_port = 42\nhttps_bind = \"1.2.3.4\"\n");
        let settings = declaration.settings().unwrap();
        assert_eq!(settings.raw("https_port"), Some(&json!(42)));
        assert_eq!(settings.raw("https_bind"), Some(&json!("1.2.3.4")));
    }

    #[test]
    fn unknown_option_fails_validation() {
        let declaration = parse("shoes = 2\n");
        assert!(matches!(
            declaration.validate(),
            Err(Error::UnknownOption(_))
        ));
    }

    #[test]
    fn bad_version_fails_validation() {
        let declaration = parse("version = \"1.2\"\n");
        assert!(matches!(
            declaration.validate(),
            Err(Error::InvalidVersion(_))
        ));
    }

    #[test]
    fn config_table_becomes_the_override() {
        let declaration = parse("[config]\ndriver = \"redis://10.1.1.1:6379\"\n");
        let settings = declaration.settings().unwrap();
        let generated = crate::confgen::generate(&settings);
        assert_eq!(generated, json!({"driver": "redis://10.1.1.1:6379"}));
    }

    #[test]
    fn config_table_conflicts_with_structured_options() {
        let declaration = parse("workers = 3\n\n[config]\ndriver = \"x\"\n");
        assert!(matches!(
            declaration.settings(),
            Err(Error::ConflictingConfiguration(_))
        ));
    }

    #[test]
    fn load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let declaration = Declaration::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(declaration.name, "hipache");
    }

    #[test]
    fn load_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hipache.toml");
        std::fs::write(&path, "version = \"1.2.3\"\nworkers = 4\n").unwrap();
        let declaration = Declaration::load(&path).unwrap();
        assert_eq!(
            declaration.version().unwrap(),
            Version::Pinned("1.2.3".into())
        );
        assert_eq!(
            declaration.settings().unwrap().raw("workers"),
            Some(&json!(4))
        );
    }
}
