//! JSON document store.
//!
//! One file per namespaced key under a data directory. Collections are
//! whole-document reads and writes: small enough for a single shop's data,
//! and trivially portable as export or sync payloads.
//!
//! Writes go through a temp file and rename so a crash mid-write never
//! leaves a truncated document behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::StoreResult;

/// Namespaced keys for every stored collection.
pub mod keys {
    pub const INVENTORY: &str = "shop_inventory";
    pub const CUSTOMERS: &str = "shop_customers";
    pub const INVOICES: &str = "shop_invoices";
    pub const VISITS: &str = "shop_visits";
    pub const SETTINGS: &str = "shop_settings";
    pub const CATEGORIES: &str = "shop_categories";
    pub const UNITS: &str = "shop_units";

    /// Every key, in the order sync and export walk them.
    pub const ALL: [&str; 7] = [
        INVENTORY, CUSTOMERS, INVOICES, VISITS, SETTINGS, CATEGORIES, UNITS,
    ];
}

/// A directory of JSON documents addressed by key.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let root = dir.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "opened json store");
        Ok(JsonStore { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Reads and decodes a document. `None` if the key has never been
    /// written.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Encodes and writes a document, replacing any previous value.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string_pretty(value)?;
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{key}.json.tmp"));
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &path)?;
        debug!(key, "wrote document");
        Ok(())
    }

    /// Reads a document as untyped JSON, for export and sync payloads.
    pub fn read_value(&self, key: &str) -> StoreResult<Option<Value>> {
        self.read(key)
    }

    /// Writes an untyped JSON document.
    pub fn write_value(&self, key: &str, value: &Value) -> StoreResult<()> {
        self.write(key, value)
    }

    /// Deletes a document. Missing keys are a no-op.
    pub fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// True when a document exists for the key.
    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }
}
