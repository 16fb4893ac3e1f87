//! Configuration manager for the storefront.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum age required at registration when the form carries a birth date.
pub const DEFAULT_MIN_AGE: u32 = 18;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Instance name.
    pub name: String,
    #[serde(default)]
    version: String,
    #[serde(skip)]
    path: PathBuf,
    /// Minimum registration age; the check is skipped when no birth date is
    /// provided.
    #[serde(default = "default_min_age")]
    pub minimum_age: u32,
    /// Related to durable key-value storage.
    #[serde(skip_serializing)]
    pub storage: Option<Storage>,
}

/// Durable storage configuration.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Storage {
    /// File holding the JSON key-value map.
    pub path: String,
}

fn default_min_age() -> u32 {
    DEFAULT_MIN_AGE
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            name: env!("CARGO_CRATE_NAME").to_owned(),
            version: VERSION.to_owned(),
            path: PathBuf::default(),
            minimum_age: DEFAULT_MIN_AGE,
            storage: None,
        }
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location.
    pub fn read(self) -> Arc<Self> {
        let file_path = if self.path.is_file() {
            &self.path
        } else {
            &Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        match File::open(file_path) {
            Ok(file) => {
                let mut config: Configuration =
                    match serde_yaml::from_reader(file) {
                        Ok(config) => config,
                        Err(err) => {
                            return Arc::new(self.error(err));
                        },
                    };

                // set app version.
                config.version = VERSION.to_owned();

                Arc::new(config)
            },
            Err(err) => Arc::new(self.error(err)),
        }
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::warn!(error = %err, "`config.yaml` not readable, using defaults");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Configuration::default()
            .path(PathBuf::from("does-not-exist.yaml"))
            .read();

        assert_eq!(config.minimum_age, DEFAULT_MIN_AGE);
        assert_eq!(config.name, env!("CARGO_CRATE_NAME"));
        assert!(config.storage.is_none());
    }

    #[test]
    fn test_read_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "name: pasteleria\nminimum_age: 21\nstorage:\n  path: datos.json"
        )
        .unwrap();

        let config = Configuration::default()
            .path(file.path().to_path_buf())
            .read();

        assert_eq!(config.name, "pasteleria");
        assert_eq!(config.minimum_age, 21);
        assert_eq!(config.storage.as_ref().unwrap().path, "datos.json");
    }
}
