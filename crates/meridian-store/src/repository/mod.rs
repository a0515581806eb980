//! Typed repositories over the JSON store.
//!
//! Each repository owns one collection key and exposes domain operations
//! instead of raw document access. Shared list plumbing lives in
//! [`Collection`]; id generation in [`generate_id`].

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::kv::JsonStore;

pub mod catalog;
pub mod customer;
pub mod inventory;
pub mod invoice;
pub mod settings;
pub mod visit;

pub use catalog::CatalogRepo;
pub use customer::{CustomerFilter, CustomerPatch, CustomerRepo, NewCustomer};
pub use inventory::{InventoryFilter, InventoryRepo, ItemPatch, NewItem};
pub use invoice::{InvoiceFilter, InvoiceRepo};
pub use settings::{SettingsPatch, SettingsRepo};
pub use visit::{NewVisit, VisitRepo};

/// Generates a collision-resistant record id: the current millisecond
/// timestamp in base 36 plus a random suffix. Sorts roughly by creation
/// time, which keeps raw document dumps readable.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", to_base36(millis), &suffix[..8])
}

fn to_base36(mut n: i64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n <= 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// A record that lives in a list collection.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    const NAME: &'static str;

    fn id(&self) -> &str;

    /// Stamps the record's update time. Records without one ignore this.
    fn touch(&mut self, _now: DateTime<Utc>) {}
}

/// List-of-records plumbing shared by every repository.
#[derive(Debug, Clone)]
pub struct Collection<T: Entity> {
    kv: JsonStore,
    key: &'static str,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Entity> Collection<T> {
    pub fn new(kv: JsonStore, key: &'static str) -> Self {
        Collection {
            kv,
            key,
            _marker: std::marker::PhantomData,
        }
    }

    /// Loads every record. An unwritten collection reads as empty.
    pub fn all(&self) -> StoreResult<Vec<T>> {
        Ok(self.kv.read(self.key)?.unwrap_or_default())
    }

    /// Replaces the whole collection.
    pub fn replace_all(&self, records: &[T]) -> StoreResult<()> {
        self.kv.write(self.key, &records)
    }

    /// Finds one record by id.
    pub fn find(&self, id: &str) -> StoreResult<Option<T>> {
        Ok(self.all()?.into_iter().find(|r| r.id() == id))
    }

    /// Finds one record by id or fails with a typed not-found error.
    pub fn get(&self, id: &str) -> StoreResult<T> {
        self.find(id)?
            .ok_or_else(|| StoreError::not_found(T::NAME, id))
    }

    /// Appends a record.
    pub fn insert(&self, record: T) -> StoreResult<()> {
        let mut records = self.all()?;
        records.push(record);
        self.replace_all(&records)
    }

    /// Applies `patch` to the record with the given id, stamping its update
    /// time, and returns the updated record.
    pub fn update_with<F>(&self, id: &str, patch: F) -> StoreResult<T>
    where
        F: FnOnce(&mut T) -> StoreResult<()>,
    {
        let mut records = self.all()?;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(T::NAME, id))?;
        patch(record)?;
        record.touch(Utc::now());
        let updated = record.clone();
        self.replace_all(&records)?;
        Ok(updated)
    }

    /// Deletes the record with the given id. Deleting an absent record is
    /// a no-op.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let mut records = self.all()?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() != before {
            self.replace_all(&records)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_ordered_prefix() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(a.len() > 8);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_296), "100");
    }
}
