//! The Store facade.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Store                             │
//! │                                                          │
//! │   inventory() ──▶ InventoryRepo ──┐                      │
//! │   customers() ──▶ CustomerRepo ───┤                      │
//! │   invoices()  ──▶ InvoiceRepo ────┼──▶ JsonStore ──▶ fs  │
//! │   visits()    ──▶ VisitRepo ──────┤                      │
//! │   settings()  ──▶ SettingsRepo ───┤                      │
//! │   catalog()   ──▶ CatalogRepo ────┘                      │
//! │                                                          │
//! │   open() seeds categories, units and settings on a       │
//! │   fresh data directory so the console is usable          │
//! │   immediately.                                           │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use tracing::info;

use meridian_core::Settings;

use crate::error::StoreResult;
use crate::kv::{keys, JsonStore};
use crate::repository::catalog::{DEFAULT_CATEGORIES, DEFAULT_UNITS};
use crate::repository::{
    CatalogRepo, CustomerRepo, InventoryRepo, InvoiceRepo, SettingsRepo, VisitRepo,
};

/// Handle to one shop's data directory. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Store {
    kv: JsonStore,
}

impl Store {
    /// Opens the store at `dir`, seeding defaults on first use.
    ///
    /// Seeding only fills keys that are absent, so reopening an existing
    /// store never touches user data.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let kv = JsonStore::open(dir)?;
        let store = Store { kv };
        store.seed_defaults()?;
        Ok(store)
    }

    fn seed_defaults(&self) -> StoreResult<()> {
        if !self.kv.contains(keys::CATEGORIES) {
            let cats: Vec<&str> = DEFAULT_CATEGORIES.to_vec();
            self.kv.write(keys::CATEGORIES, &cats)?;
        }
        if !self.kv.contains(keys::UNITS) {
            let units: Vec<&str> = DEFAULT_UNITS.to_vec();
            self.kv.write(keys::UNITS, &units)?;
        }
        if !self.kv.contains(keys::SETTINGS) {
            self.kv.write(keys::SETTINGS, &Settings::default())?;
            info!("seeded default settings");
        }
        Ok(())
    }

    pub fn inventory(&self) -> InventoryRepo {
        InventoryRepo::new(self.kv.clone())
    }

    pub fn customers(&self) -> CustomerRepo {
        CustomerRepo::new(self.kv.clone())
    }

    pub fn invoices(&self) -> InvoiceRepo {
        InvoiceRepo::new(self.kv.clone())
    }

    pub fn visits(&self) -> VisitRepo {
        VisitRepo::new(self.kv.clone())
    }

    pub fn settings(&self) -> SettingsRepo {
        SettingsRepo::new(self.kv.clone())
    }

    pub fn catalog(&self) -> CatalogRepo {
        CatalogRepo::new(self.kv.clone())
    }

    /// Raw document access, for export and sync.
    pub(crate) fn kv(&self) -> &JsonStore {
        &self.kv
    }

    /// Reads one collection as untyped JSON. Sync payloads use this.
    pub fn collection_value(&self, key: &str) -> StoreResult<Option<serde_json::Value>> {
        self.kv.read_value(key)
    }

    /// Overwrites one collection with untyped JSON.
    pub fn set_collection_value(
        &self,
        key: &str,
        value: &serde_json::Value,
    ) -> StoreResult<()> {
        self.kv.write_value(key, value)
    }

    /// Erases every collection and reseeds defaults.
    pub fn clear_all(&self) -> StoreResult<()> {
        for key in keys::ALL {
            self.kv.remove(key)?;
        }
        self.seed_defaults()?;
        info!("cleared all shop data");
        Ok(())
    }
}
