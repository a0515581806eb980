//! Sync error taxonomy.
//!
//! Subscription failures are split into distinct variants so the console
//! can tell "renew your plan" apart from "no such clinic" and from plain
//! connectivity trouble.

use chrono::{DateTime, Utc};
use thiserror::Error;

use meridian_store::StoreError;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The connection configuration failed validation.
    #[error("invalid remote config: {0}")]
    InvalidConfig(String),

    /// A required configuration field is empty.
    #[error("remote config is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// The remote could not be reached at all.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The remote answered with a non-success status.
    #[error("remote returned status {status}")]
    RemoteStatus { status: u16 },

    /// No subscription document exists for this clinic.
    #[error("no subscription found for clinic '{0}'")]
    SubscriptionNotFound(String),

    /// The subscription exists but has been deactivated.
    #[error("subscription is inactive")]
    SubscriptionInactive,

    /// The subscription lapsed.
    #[error("subscription expired on {end_date}")]
    SubscriptionExpired { end_date: DateTime<Utc> },

    /// The cached config file could not be read.
    #[error("failed to load cached config: {0}")]
    ConfigLoadFailed(String),

    /// The cached config file could not be written.
    #[error("failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// A sync payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The local store failed underneath a sync operation.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl SyncError {
    /// True for errors fixable by editing the connection settings.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::MissingField { .. }
                | SyncError::ConfigLoadFailed(_)
        )
    }

    /// True for errors that must block the console from starting in
    /// connected mode.
    pub fn is_subscription_error(&self) -> bool {
        matches!(
            self,
            SyncError::SubscriptionNotFound(_)
                | SyncError::SubscriptionInactive
                | SyncError::SubscriptionExpired { .. }
        )
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            SyncError::RemoteStatus {
                status: status.as_u16(),
            }
        } else {
            SyncError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}
