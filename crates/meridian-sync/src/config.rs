//! Remote connection configuration.
//!
//! The config is entered once, verified by a trial connection, then cached
//! as a TOML file in the platform config directory so later launches skip
//! the setup screen. The clinic id lives next to it and is generated on
//! first use.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{SyncError, SyncResult};

const CONFIG_FILE: &str = "remote.toml";
const CLINIC_ID_FILE: &str = "clinic_id";

/// Connection settings for the hosted document backend.
///
/// Aliases accept the camelCase key names used by the web console's
/// exported config blob, so either shape pastes in cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(alias = "apiKey")]
    pub api_key: String,
    #[serde(alias = "projectId")]
    pub project_id: String,
    #[serde(alias = "databaseUrl", alias = "databaseURL")]
    pub database_url: String,
    #[serde(alias = "authDomain")]
    pub auth_domain: String,
    #[serde(alias = "storageBucket")]
    pub storage_bucket: String,
}

impl RemoteConfig {
    /// Parses a pasted JSON config blob.
    pub fn from_json(raw: &str) -> SyncResult<Self> {
        let config: RemoteConfig = serde_json::from_str(raw)
            .map_err(|e| SyncError::InvalidConfig(format!("not a valid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field is present and the database URL is http(s).
    pub fn validate(&self) -> SyncResult<()> {
        let required: [(&'static str, &str); 5] = [
            ("apiKey", &self.api_key),
            ("projectId", &self.project_id),
            ("databaseUrl", &self.database_url),
            ("authDomain", &self.auth_domain),
            ("storageBucket", &self.storage_bucket),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(SyncError::MissingField { field });
            }
        }
        if !self.database_url.starts_with("http://")
            && !self.database_url.starts_with("https://")
        {
            return Err(SyncError::InvalidConfig(
                "databaseUrl must be an http(s) URL".into(),
            ));
        }
        Ok(())
    }
}

/// On-disk cache for the verified config and the clinic id.
#[derive(Debug, Clone)]
pub struct ConfigCache {
    dir: PathBuf,
}

impl ConfigCache {
    /// Cache in the platform config directory.
    pub fn new() -> SyncResult<Self> {
        let dirs = ProjectDirs::from("com", "meridian", "console").ok_or_else(|| {
            SyncError::ConfigLoadFailed("no home directory available".into())
        })?;
        Ok(ConfigCache {
            dir: dirs.config_dir().to_path_buf(),
        })
    }

    /// Cache in an explicit directory. Tests use this.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        ConfigCache { dir: dir.into() }
    }

    /// Loads the cached config, `None` if setup has never completed.
    pub fn load(&self) -> SyncResult<Option<RemoteConfig>> {
        let path = self.dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .map_err(|e| SyncError::ConfigLoadFailed(e.to_string()))?;
        let config: RemoteConfig =
            toml::from_str(&raw).map_err(|e| SyncError::ConfigLoadFailed(e.to_string()))?;
        debug!(path = %path.display(), "loaded cached remote config");
        Ok(Some(config))
    }

    /// Persists a verified config.
    pub fn save(&self, config: &RemoteConfig) -> SyncResult<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        let raw = toml::to_string_pretty(config)
            .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        fs::write(self.dir.join(CONFIG_FILE), raw)
            .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        info!("cached remote config");
        Ok(())
    }

    /// Removes the cached config, forcing setup on next launch.
    pub fn clear(&self) -> SyncResult<()> {
        let path = self.dir.join(CONFIG_FILE);
        if path.exists() {
            fs::remove_file(path).map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        }
        Ok(())
    }

    /// Returns this installation's clinic id, generating and persisting one
    /// on first call.
    pub fn clinic_id(&self) -> SyncResult<String> {
        let path = self.dir.join(CLINIC_ID_FILE);
        if path.exists() {
            let id = fs::read_to_string(&path)
                .map_err(|e| SyncError::ConfigLoadFailed(e.to_string()))?;
            return Ok(id.trim().to_string());
        }
        let id = format!("clinic_{}", meridian_store::repository::generate_id());
        fs::create_dir_all(&self.dir)
            .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        fs::write(&path, &id).map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        info!(clinic_id = %id, "generated clinic id");
        Ok(id)
    }
}
