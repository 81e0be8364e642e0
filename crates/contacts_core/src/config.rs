use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use shared::domain::{Permission, PermissionState};
use thiserror::Error;

use crate::permissions::ConfiguredPermissions;

pub const DEFAULT_CONFIG_FILE: &str = "contacts.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_url: String,
    pub log_filter: String,
    pub permissions: PermissionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: storage::DEFAULT_DATABASE_URL.into(),
            log_filter: "info".into(),
            permissions: PermissionSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSettings {
    pub read_contacts: PermissionState,
    pub write_contacts: PermissionState,
    pub call_phone: PermissionState,
    pub send_sms: PermissionState,
}

impl PermissionSettings {
    pub fn to_gate(&self) -> ConfiguredPermissions {
        ConfiguredPermissions::new([
            (Permission::ReadContacts, self.read_contacts),
            (Permission::WriteContacts, self.write_contacts),
            (Permission::CallPhone, self.call_phone),
            (Permission::SendSms, self.send_sms),
        ])
    }
}

/// Config file location: `CONTACTS_CONFIG` if set, else `contacts.toml` in
/// the working directory.
pub fn config_path() -> PathBuf {
    std::env::var("CONTACTS_CONFIG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&config_path(), |name| std::env::var(name).ok())
}

/// Reads `path` (a missing file means defaults) and applies environment
/// overrides looked up through `env`.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => Settings::default(),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if let Some(v) = env("CONTACTS_DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = env("CONTACTS_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
