//! Full-store export and import.
//!
//! The export envelope carries every collection plus a format version and
//! timestamp. Import rejects unversioned payloads before writing anything,
//! and only overwrites the collections the payload actually carries, so a
//! partial backup restores partially instead of wiping data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use meridian_core::EXPORT_FORMAT_VERSION;

use crate::error::{StoreError, StoreResult};
use crate::kv::keys;
use crate::store::Store;

/// Serialized shape of a full data export.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customers: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoices: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visits: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Value>,
    pub export_date: DateTime<Utc>,
    #[serde(default)]
    pub version: Option<String>,
}

impl Store {
    /// Serializes the whole store to a single JSON document.
    pub fn export_all(&self) -> StoreResult<String> {
        let kv = self.kv();
        let envelope = ExportEnvelope {
            inventory: kv.read_value(keys::INVENTORY)?,
            customers: kv.read_value(keys::CUSTOMERS)?,
            invoices: kv.read_value(keys::INVOICES)?,
            visits: kv.read_value(keys::VISITS)?,
            settings: kv.read_value(keys::SETTINGS)?,
            categories: kv.read_value(keys::CATEGORIES)?,
            units: kv.read_value(keys::UNITS)?,
            export_date: Utc::now(),
            version: Some(EXPORT_FORMAT_VERSION.to_string()),
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    /// Restores from an export payload. Collections absent from the
    /// payload are left untouched.
    pub fn import_all(&self, raw: &str) -> StoreResult<()> {
        let envelope: ExportEnvelope = serde_json::from_str(raw)
            .map_err(|e| StoreError::ImportRejected(format!("not a valid export: {e}")))?;
        if envelope.version.is_none() {
            return Err(StoreError::ImportRejected(
                "payload has no version marker".into(),
            ));
        }

        let kv = self.kv();
        let pairs = [
            (keys::INVENTORY, envelope.inventory),
            (keys::CUSTOMERS, envelope.customers),
            (keys::INVOICES, envelope.invoices),
            (keys::VISITS, envelope.visits),
            (keys::SETTINGS, envelope.settings),
            (keys::CATEGORIES, envelope.categories),
            (keys::UNITS, envelope.units),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                kv.write_value(key, &value)?;
            }
        }
        info!("imported data export");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::NewCustomer;
    use meridian_core::CustomerType;
    use tempfile::tempdir;

    fn customer(name: &str) -> NewCustomer {
        NewCustomer {
            name: name.into(),
            mobile: "9876543210".into(),
            email: None,
            address: None,
            medical_summary: None,
            customer_type: CustomerType::Regular,
        }
    }

    #[test]
    fn export_then_import_restores_data() {
        let src_dir = tempdir().unwrap();
        let src = Store::open(src_dir.path()).unwrap();
        src.customers().add(customer("Asha Verma")).unwrap();
        let payload = src.export_all().unwrap();

        let dst_dir = tempdir().unwrap();
        let dst = Store::open(dst_dir.path()).unwrap();
        dst.import_all(&payload).unwrap();

        let customers = dst.customers().all().unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name, "Asha Verma");
    }

    #[test]
    fn import_rejects_unversioned_payload() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.customers().add(customer("Asha")).unwrap();

        let bad = r#"{"customers": [], "exportDate": "2025-06-01T00:00:00Z"}"#;
        let err = store.import_all(bad).unwrap_err();
        assert!(matches!(err, StoreError::ImportRejected(_)));
        // rejected import wrote nothing
        assert_eq!(store.customers().all().unwrap().len(), 1);
    }

    #[test]
    fn import_rejects_garbage() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert!(matches!(
            store.import_all("not json").unwrap_err(),
            StoreError::ImportRejected(_)
        ));
    }

    #[test]
    fn partial_payload_leaves_other_collections_alone() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.customers().add(customer("Asha")).unwrap();

        let partial = format!(
            r#"{{"categories": ["Only"], "exportDate": "2025-06-01T00:00:00Z", "version": "{EXPORT_FORMAT_VERSION}"}}"#
        );
        store.import_all(&partial).unwrap();

        assert_eq!(store.catalog().categories().unwrap(), vec!["Only"]);
        assert_eq!(store.customers().all().unwrap().len(), 1);
    }
}
