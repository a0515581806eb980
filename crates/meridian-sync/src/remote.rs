//! Remote document backend.
//!
//! [`DocumentStore`] is the seam between sync logic and the wire: the
//! adapter and subscription checks work against the trait, production uses
//! [`HttpDocumentStore`], tests use an in-memory mock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::RemoteConfig;
use crate::error::{SyncError, SyncResult};

/// A clinic's subscription document as stored on the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub subscription_active: bool,
    #[serde(default)]
    pub plan: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Minimal surface the sync layer needs from the hosted backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Cheap reachability probe.
    async fn ping(&self) -> SyncResult<()>;

    /// The clinic's subscription document, `None` if it does not exist.
    async fn fetch_subscription(&self, clinic_id: &str)
        -> SyncResult<Option<SubscriptionRecord>>;

    /// One synced collection, `None` if never pushed.
    async fn read_collection(&self, clinic_id: &str, name: &str) -> SyncResult<Option<Value>>;

    /// Overwrites one synced collection.
    async fn write_collection(
        &self,
        clinic_id: &str,
        name: &str,
        value: &Value,
    ) -> SyncResult<()>;
}

/// REST client for a hosted JSON document backend.
///
/// Layout: `{base}/clinics/{id}.json` holds the subscription document and
/// `{base}/clinics/{id}/data/{collection}.json` one document per synced
/// collection.
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpDocumentStore {
    pub fn new(config: &RemoteConfig) -> Self {
        HttpDocumentStore {
            client: Client::new(),
            base_url: config.database_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn subscription_url(&self, clinic_id: &str) -> String {
        format!("{}/clinics/{}.json?auth={}", self.base_url, clinic_id, self.api_key)
    }

    fn collection_url(&self, clinic_id: &str, name: &str) -> String {
        format!(
            "{}/clinics/{}/data/{}.json?auth={}",
            self.base_url, clinic_id, name, self.api_key
        )
    }

    async fn get_json(&self, url: &str) -> SyncResult<Option<Value>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::RemoteStatus {
                status: status.as_u16(),
            });
        }
        let value: Value = response.json().await?;
        // the backend answers null for paths that were never written
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn ping(&self) -> SyncResult<()> {
        let url = format!("{}/.json?shallow=true&auth={}", self.base_url, self.api_key);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::RemoteStatus {
                status: status.as_u16(),
            });
        }
        debug!("remote reachable");
        Ok(())
    }

    async fn fetch_subscription(
        &self,
        clinic_id: &str,
    ) -> SyncResult<Option<SubscriptionRecord>> {
        let url = self.subscription_url(clinic_id);
        match self.get_json(&url).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn read_collection(&self, clinic_id: &str, name: &str) -> SyncResult<Option<Value>> {
        self.get_json(&self.collection_url(clinic_id, name)).await
    }

    async fn write_collection(
        &self,
        clinic_id: &str,
        name: &str,
        value: &Value,
    ) -> SyncResult<()> {
        let url = self.collection_url(clinic_id, name);
        let response = self.client.put(&url).json(value).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::RemoteStatus {
                status: status.as_u16(),
            });
        }
        debug!(collection = name, "pushed collection");
        Ok(())
    }
}
