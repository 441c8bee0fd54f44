// findash-core/src/settings.rs
use crate::{ConfigStore, LayoutStore, StorageError, validate_key};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Data directory not found")]
    NoDataDir,
    #[error("Invalid storage settings: {0}")]
    Storage(#[from] StorageError),
    #[error("layout_key and config_key must differ (both are {0:?})")]
    SharedKey(String),
}

/// Application settings read from `findash.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory for persisted blobs; defaults to `<data_dir>/findash`
    pub dir: Option<PathBuf>,
    pub layout_key: String,
    pub config_key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: None,
            layout_key: LayoutStore::DEFAULT_KEY.to_string(),
            config_key: ConfigStore::DEFAULT_KEY.to_string(),
        }
    }
}

impl StorageSettings {
    /// Both keys must be usable by every storage backend and must not collide
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_key(&self.layout_key)?;
        validate_key(&self.config_key)?;
        if self.layout_key == self.config_key {
            return Err(SettingsError::SharedKey(self.layout_key.clone()));
        }
        Ok(())
    }

    pub fn resolve_dir(&self) -> Result<PathBuf, SettingsError> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|d| d.join("findash"))
                .ok_or(SettingsError::NoDataDir),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directives used when `FINDASH_LOG` is unset
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, SettingsError> {
        // Priority: ./findash.toml -> ~/.config/findash/findash.toml -> default
        let mut paths = vec![std::env::current_dir()?.join("findash.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("findash/findash.toml"));
        }

        for path in paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading settings");
                let content = std::fs::read_to_string(path)?;
                return Self::from_toml_str(&content);
            }
        }

        Ok(Self::default())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        settings.storage.validate()?;
        Ok(settings)
    }
}
