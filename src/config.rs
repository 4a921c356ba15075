//! Optional configuration file
//!
//! Read from `$XDG_CONFIG_HOME/catalogscope/config.toml` (or the platform
//! equivalent) unless a path is given on the command line:
//!
//! ```toml
//! catalog = "catalog-info.json"
//! initial_kind = "system"
//! allowed_kinds = ["component", "api", "system"]
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings read from the config file; every field is optional
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Catalog file to open when none is given on the command line
    pub catalog: Option<PathBuf>,

    /// Kind selected when the location does not name one
    pub initial_kind: Option<String>,

    /// Kinds offered in the kind dropdown
    pub allowed_kinds: Option<Vec<String>>,
}

impl FileConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("catalogscope").join("config.toml"))
    }

    /// Load an explicit config file, or the default one if it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_path(path),
            None => match Self::default_path() {
                Some(path) => match Self::load_path(&path) {
                    Err(ConfigError::Read { source, .. })
                        if source.kind() == ErrorKind::NotFound =>
                    {
                        Ok(Self::default())
                    }
                    result => result,
                },
                None => Ok(Self::default()),
            },
        }
    }

    fn load_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: FileConfig = toml::from_str(
            r#"
            catalog = "catalog.json"
            initial_kind = "System"
            allowed_kinds = ["component", "api"]
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog, Some(PathBuf::from("catalog.json")));
        assert_eq!(config.initial_kind.as_deref(), Some("System"));
        assert_eq!(
            config.allowed_kinds,
            Some(vec!["component".to_string(), "api".to_string()])
        );
    }

    #[test]
    fn test_empty_config() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(toml::from_str::<FileConfig>("initial_filter = \"api\"").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("catalogscope-missing-config.toml");
        assert!(matches!(
            FileConfig::load(Some(&path)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_load_explicit_file() {
        let path = std::env::temp_dir().join(format!(
            "catalogscope-config-test-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "initial_kind = \"api\"\n").unwrap();

        let config = FileConfig::load(Some(&path)).unwrap();
        assert_eq!(config.initial_kind.as_deref(), Some("api"));

        fs::write(&path, "initial_kind = [").unwrap();
        assert!(matches!(
            FileConfig::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));

        fs::remove_file(&path).unwrap();
    }
}
