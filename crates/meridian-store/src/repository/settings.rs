//! Shop settings, a single document rather than a list.

use meridian_core::Settings;

use crate::error::StoreResult;
use crate::kv::{keys, JsonStore};

/// Partial update for settings. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub shop_name: Option<String>,
    pub address: Option<Option<String>>,
    pub contact: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub gst_number: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub logo: Option<Option<String>>,
    pub signature: Option<Option<String>>,
    pub default_low_stock_threshold: Option<i64>,
    pub gst_rate_bps: Option<u32>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SettingsRepo {
    kv: JsonStore,
}

impl SettingsRepo {
    pub fn new(kv: JsonStore) -> Self {
        SettingsRepo { kv }
    }

    /// Current settings, falling back to defaults if never written.
    pub fn get(&self) -> StoreResult<Settings> {
        Ok(self.kv.read(keys::SETTINGS)?.unwrap_or_default())
    }

    pub fn update(&self, patch: SettingsPatch) -> StoreResult<Settings> {
        let mut s = self.get()?;
        if let Some(v) = patch.shop_name {
            s.shop_name = v;
        }
        if let Some(v) = patch.address {
            s.address = v;
        }
        if let Some(v) = patch.contact {
            s.contact = v;
        }
        if let Some(v) = patch.email {
            s.email = v;
        }
        if let Some(v) = patch.gst_number {
            s.gst_number = v;
        }
        if let Some(v) = patch.website {
            s.website = v;
        }
        if let Some(v) = patch.logo {
            s.logo = v;
        }
        if let Some(v) = patch.signature {
            s.signature = v;
        }
        if let Some(v) = patch.default_low_stock_threshold {
            s.default_low_stock_threshold = v;
        }
        if let Some(v) = patch.gst_rate_bps {
            s.gst_rate_bps = v;
        }
        if let Some(v) = patch.username {
            s.username = v;
        }
        if let Some(v) = patch.password {
            s.password = v;
        }
        self.kv.write(keys::SETTINGS, &s)?;
        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn unwritten_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let repo = SettingsRepo::new(JsonStore::open(dir.path()).unwrap());
        let s = repo.get().unwrap();
        assert_eq!(s.gst_rate_bps, 1800);
        assert_eq!(s.username, "admin");
    }

    #[test]
    fn update_patches_and_persists() {
        let dir = tempdir().unwrap();
        let repo = SettingsRepo::new(JsonStore::open(dir.path()).unwrap());

        repo.update(SettingsPatch {
            shop_name: Some("City Clinic".into()),
            gst_rate_bps: Some(1200),
            ..Default::default()
        })
        .unwrap();

        let s = repo.get().unwrap();
        assert_eq!(s.shop_name, "City Clinic");
        assert_eq!(s.gst_rate_bps, 1200);
        assert_eq!(s.default_low_stock_threshold, 10);
    }
}
