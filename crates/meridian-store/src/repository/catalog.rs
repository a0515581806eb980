//! Category and unit catalogs: flat string lists editable from settings.

use crate::error::StoreResult;
use crate::kv::{keys, JsonStore};

/// Categories seeded on first open.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Medicine", "Equipment", "Supplies", "Consumables"];

/// Units seeded on first open.
pub const DEFAULT_UNITS: [&str; 9] = [
    "Pieces", "Bottles", "Boxes", "Strips", "Tablets", "Capsules", "ML", "Grams", "KG",
];

#[derive(Debug, Clone)]
pub struct CatalogRepo {
    kv: JsonStore,
}

impl CatalogRepo {
    pub fn new(kv: JsonStore) -> Self {
        CatalogRepo { kv }
    }

    pub fn categories(&self) -> StoreResult<Vec<String>> {
        self.list(keys::CATEGORIES)
    }

    /// Adds a category. Duplicates (case-insensitive) are a no-op.
    pub fn add_category(&self, name: &str) -> StoreResult<Vec<String>> {
        self.add(keys::CATEGORIES, name)
    }

    pub fn remove_category(&self, name: &str) -> StoreResult<Vec<String>> {
        self.remove(keys::CATEGORIES, name)
    }

    pub fn units(&self) -> StoreResult<Vec<String>> {
        self.list(keys::UNITS)
    }

    pub fn add_unit(&self, name: &str) -> StoreResult<Vec<String>> {
        self.add(keys::UNITS, name)
    }

    pub fn remove_unit(&self, name: &str) -> StoreResult<Vec<String>> {
        self.remove(keys::UNITS, name)
    }

    fn list(&self, key: &str) -> StoreResult<Vec<String>> {
        Ok(self.kv.read(key)?.unwrap_or_default())
    }

    fn add(&self, key: &str, name: &str) -> StoreResult<Vec<String>> {
        let trimmed = name.trim();
        let mut entries = self.list(key)?;
        if !trimmed.is_empty()
            && !entries.iter().any(|e| e.eq_ignore_ascii_case(trimmed))
        {
            entries.push(trimmed.to_string());
            self.kv.write(key, &entries)?;
        }
        Ok(entries)
    }

    fn remove(&self, key: &str, name: &str) -> StoreResult<Vec<String>> {
        let mut entries = self.list(key)?;
        let before = entries.len();
        entries.retain(|e| !e.eq_ignore_ascii_case(name.trim()));
        if entries.len() != before {
            self.kv.write(key, &entries)?;
        }
        Ok(entries)
    }
}
