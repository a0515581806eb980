//! Sync adapter: wires the local store to a remote document backend.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         SyncAdapter                              │
//! │                                                                  │
//! │   test_config ── validate, trial-connect, cache on success only  │
//! │   check_subscription ── fetch + evaluate, distinct errors        │
//! │   push ── every local collection overwrites the remote copy      │
//! │   pull ── every remote collection overwrites the local copy      │
//! │                                                                  │
//! │   Push and pull are whole-collection, last writer wins. There    │
//! │   is no per-record merging.                                      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use meridian_store::kv::keys;
use meridian_store::Store;

use crate::config::{ConfigCache, RemoteConfig};
use crate::error::SyncResult;
use crate::remote::{DocumentStore, SubscriptionRecord};
use crate::subscription;

/// Connects one local store to one clinic's remote data.
#[derive(Clone)]
pub struct SyncAdapter {
    store: Store,
    remote: Arc<dyn DocumentStore>,
    clinic_id: String,
}

impl SyncAdapter {
    pub fn new(store: Store, remote: Arc<dyn DocumentStore>, clinic_id: String) -> Self {
        SyncAdapter {
            store,
            remote,
            clinic_id,
        }
    }

    pub fn clinic_id(&self) -> &str {
        &self.clinic_id
    }

    /// Fetches this clinic's subscription and returns the record when it
    /// permits connected mode.
    pub async fn check_subscription(&self) -> SyncResult<SubscriptionRecord> {
        let record = self
            .remote
            .fetch_subscription(&self.clinic_id)
            .await?
            .ok_or_else(|| {
                crate::error::SyncError::SubscriptionNotFound(self.clinic_id.clone())
            })?;
        subscription::evaluate(&record, Utc::now())?;
        info!(clinic_id = %self.clinic_id, plan = ?record.plan, "subscription verified");
        Ok(record)
    }

    /// Pushes every local collection to the remote, overwriting.
    pub async fn push(&self) -> SyncResult<usize> {
        let mut pushed = 0;
        for key in keys::ALL {
            // unwritten collections push as empty arrays so a pull on a
            // second device sees a consistent snapshot
            let value = self
                .store
                .collection_value(key)?
                .unwrap_or_else(|| Value::Array(Vec::new()));
            self.remote
                .write_collection(&self.clinic_id, key, &value)
                .await?;
            pushed += 1;
        }
        info!(clinic_id = %self.clinic_id, collections = pushed, "push complete");
        Ok(pushed)
    }

    /// Pulls every remote collection into the local store, overwriting.
    /// Collections never pushed are skipped rather than cleared.
    pub async fn pull(&self) -> SyncResult<usize> {
        let mut pulled = 0;
        for key in keys::ALL {
            match self.remote.read_collection(&self.clinic_id, key).await? {
                Some(value) => {
                    self.store.set_collection_value(key, &value)?;
                    pulled += 1;
                }
                None => {
                    warn!(collection = key, "remote has no copy, keeping local");
                }
            }
        }
        info!(clinic_id = %self.clinic_id, collections = pulled, "pull complete");
        Ok(pulled)
    }
}

/// Validates a pasted config by connecting, and caches it only when the
/// trial connection succeeds.
pub async fn test_and_cache_config(
    config: &RemoteConfig,
    remote: &dyn DocumentStore,
    cache: &ConfigCache,
) -> SyncResult<()> {
    config.validate()?;
    remote.ping().await?;
    cache.save(config)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::remote::SubscriptionRecord;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use meridian_store::repository::NewCustomer;
    use meridian_core::CustomerType;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// In-memory stand-in for the hosted backend.
    #[derive(Default)]
    struct MockRemote {
        subscription: Option<SubscriptionRecord>,
        collections: Mutex<HashMap<String, Value>>,
        reachable: bool,
    }

    impl MockRemote {
        fn reachable() -> Self {
            MockRemote {
                reachable: true,
                ..Default::default()
            }
        }

        fn with_subscription(active: bool, days_left: i64) -> Self {
            let now = Utc::now();
            MockRemote {
                subscription: Some(SubscriptionRecord {
                    name: "City Clinic".into(),
                    email: None,
                    subscription_active: active,
                    plan: Some("annual".into()),
                    start_date: now - Duration::days(30),
                    end_date: now + Duration::days(days_left),
                }),
                reachable: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl DocumentStore for MockRemote {
        async fn ping(&self) -> SyncResult<()> {
            if self.reachable {
                Ok(())
            } else {
                Err(SyncError::ConnectionFailed("unreachable".into()))
            }
        }

        async fn fetch_subscription(
            &self,
            _clinic_id: &str,
        ) -> SyncResult<Option<SubscriptionRecord>> {
            Ok(self.subscription.clone())
        }

        async fn read_collection(
            &self,
            _clinic_id: &str,
            name: &str,
        ) -> SyncResult<Option<Value>> {
            Ok(self.collections.lock().unwrap().get(name).cloned())
        }

        async fn write_collection(
            &self,
            _clinic_id: &str,
            name: &str,
            value: &Value,
        ) -> SyncResult<()> {
            self.collections
                .lock()
                .unwrap()
                .insert(name.to_string(), value.clone());
            Ok(())
        }
    }

    fn config() -> RemoteConfig {
        RemoteConfig {
            api_key: "k".into(),
            project_id: "p".into(),
            database_url: "https://db.example.com".into(),
            auth_domain: "a".into(),
            storage_bucket: "b".into(),
        }
    }

    fn adapter(store: Store, remote: MockRemote) -> SyncAdapter {
        SyncAdapter::new(store, Arc::new(remote), "clinic_test".into())
    }

    #[tokio::test]
    async fn subscription_failures_are_distinct() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();

        let missing = adapter(store.clone(), MockRemote::reachable());
        assert!(matches!(
            missing.check_subscription().await.unwrap_err(),
            SyncError::SubscriptionNotFound(_)
        ));

        let inactive = adapter(store.clone(), MockRemote::with_subscription(false, 30));
        assert!(matches!(
            inactive.check_subscription().await.unwrap_err(),
            SyncError::SubscriptionInactive
        ));

        let expired = adapter(store.clone(), MockRemote::with_subscription(true, -1));
        assert!(matches!(
            expired.check_subscription().await.unwrap_err(),
            SyncError::SubscriptionExpired { .. }
        ));

        let valid = adapter(store, MockRemote::with_subscription(true, 30));
        assert!(valid.check_subscription().await.is_ok());
    }

    #[tokio::test]
    async fn push_then_pull_round_trips_all_collections() {
        let src_dir = tempdir().unwrap();
        let src = Store::open(src_dir.path()).unwrap();
        src.customers()
            .add(NewCustomer {
                name: "Asha Verma".into(),
                mobile: "9876543210".into(),
                email: None,
                address: None,
                medical_summary: None,
                customer_type: CustomerType::Regular,
            })
            .unwrap();

        let remote = Arc::new(MockRemote::reachable());
        let up = SyncAdapter::new(src, remote.clone(), "clinic_test".into());
        assert_eq!(up.push().await.unwrap(), keys::ALL.len());

        let dst_dir = tempdir().unwrap();
        let dst = Store::open(dst_dir.path()).unwrap();
        let down = SyncAdapter::new(dst.clone(), remote, "clinic_test".into());
        assert_eq!(down.pull().await.unwrap(), keys::ALL.len());

        let customers = dst.customers().all().unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name, "Asha Verma");
    }

    #[tokio::test]
    async fn pull_skips_collections_absent_remotely() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store
            .customers()
            .add(NewCustomer {
                name: "Asha".into(),
                mobile: "9876543210".into(),
                email: None,
                address: None,
                medical_summary: None,
                customer_type: CustomerType::New,
            })
            .unwrap();

        let down = adapter(store.clone(), MockRemote::reachable());
        assert_eq!(down.pull().await.unwrap(), 0);
        // nothing remote, local data untouched
        assert_eq!(store.customers().all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn config_is_cached_only_after_successful_connection() {
        let dir = tempdir().unwrap();
        let cache = ConfigCache::with_dir(dir.path());

        let unreachable = MockRemote::default();
        let err = test_and_cache_config(&config(), &unreachable, &cache)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::ConnectionFailed(_)));
        assert!(cache.load().unwrap().is_none());

        let reachable = MockRemote::reachable();
        test_and_cache_config(&config(), &reachable, &cache)
            .await
            .unwrap();
        assert_eq!(cache.load().unwrap(), Some(config()));
    }

    #[tokio::test]
    async fn invalid_config_never_touches_the_network() {
        let dir = tempdir().unwrap();
        let cache = ConfigCache::with_dir(dir.path());
        let mut bad = config();
        bad.api_key = "".into();

        // unreachable remote would fail the ping; the validation error
        // firing instead proves we never got that far
        let err = test_and_cache_config(&bad, &MockRemote::default(), &cache)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::MissingField { field: "apiKey" }));
    }
}
