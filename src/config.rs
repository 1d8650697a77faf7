//! Runtime configuration.
//!
//! Deserialized from TOML; every field has a default:
//!
//! ```toml
//! [storage]
//! path = "santa.db"
//!
//! [credentials]
//! pepper = "server-side-pepper"
//! memory_kib = 19456
//! iterations = 2
//! parallelism = 1
//! issued_secret_bytes = 16
//! ```
//!
//! `SANTA_DB_PATH` and `SANTA_PEPPER` override the file values.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SantaConfig {
    pub storage: StorageConfig,
    pub credentials: CredentialConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory of the sled database.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("santa.db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CredentialConfig {
    pub pepper: Option<String>,
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    /// Length in bytes of server-issued secrets before hex encoding.
    pub issued_secret_bytes: usize,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        // OWASP recommended argon2id: m=19456 (19 MiB), t=2, p=1
        Self {
            pepper: None,
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
            issued_secret_bytes: 16,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl SantaConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("SANTA_DB_PATH") {
            self.storage.path = PathBuf::from(path);
        }
        if let Some(pepper) = lookup("SANTA_PEPPER") {
            self.credentials.pepper = Some(pepper);
        }
    }
}
