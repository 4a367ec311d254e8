use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_API_URL;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No Notion token configured. Use --token or set NOTION_TOKEN")]
    MissingToken,

    #[error(
        "No root page configured. Use --root-page, set ROOT_PAGE_ID, or run: taskhub config set root_page <id>"
    )]
    MissingRootPage,

    #[error("Cannot determine home directory")]
    NoHomeDir,

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown config key: {0}. Valid keys: root_page, api_url")]
    UnknownKey(String),
}

/// Settings stored per profile. The token is never written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl ProfileConfig {
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "root_page" => self.root_page = Some(value.to_string()),
            "api_url" => self.api_url = Some(value.to_string()),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

pub type ConfigFile = BTreeMap<String, ProfileConfig>;

/// The profile file, `~/.taskhub/config.toml` unless pointed elsewhere.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn default_location() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::at(home.join(".taskhub").join("config.toml")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_all(&self) -> Result<ConfigFile, ConfigError> {
        if !self.path.exists() {
            return Ok(ConfigFile::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    pub fn load_profile(&self, profile: &str) -> Result<ProfileConfig, ConfigError> {
        Ok(self.load_all()?.remove(profile).unwrap_or_default())
    }

    pub fn save_profile(&self, profile: &str, config: &ProfileConfig) -> Result<(), ConfigError> {
        let mut all = self.load_all()?;
        all.insert(profile.to_string(), config.clone());
        let content = toml::to_string_pretty(&all)?;

        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        fs::write(&self.path, content).map_err(write_err)
    }
}

/// Loads `profile` from `store`, or an empty profile when there is no store.
pub fn load_profile_or_default(
    store: Option<&ConfigStore>,
    profile: &str,
) -> Result<ProfileConfig, ConfigError> {
    match store {
        Some(store) => store.load_profile(profile),
        None => {
            tracing::debug!(profile, "No config file location, using an empty profile");
            Ok(ProfileConfig::default())
        }
    }
}

/// Connection settings after merging flags, environment and profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub token: String,
    pub root_page: String,
    pub api_url: String,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Resolves connection settings.
///
/// Order: flag or environment variable, then the profile file, then an
/// error (token, root page) or the default (API URL). Empty values count as
/// unset.
pub fn resolve(
    token: Option<&str>,
    root_page: Option<&str>,
    api_url: Option<&str>,
    profile: &ProfileConfig,
) -> Result<Settings, ConfigError> {
    let token = non_empty(token).ok_or(ConfigError::MissingToken)?;
    let root_page = non_empty(root_page)
        .or_else(|| non_empty(profile.root_page.as_deref()))
        .ok_or(ConfigError::MissingRootPage)?;
    let api_url = non_empty(api_url)
        .or_else(|| non_empty(profile.api_url.as_deref()))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    Ok(Settings {
        token,
        root_page,
        api_url,
    })
}
