//! # Meridian Sync
//!
//! Remote backup and subscription gating for the Meridian console.
//!
//! The local store stays authoritative; sync is explicit bulk push and
//! pull against a hosted JSON document backend, guarded by a per-clinic
//! subscription check. Connection settings are verified once and cached
//! as TOML in the platform config directory.

pub mod adapter;
pub mod config;
pub mod error;
pub mod remote;
pub mod subscription;

pub use adapter::{test_and_cache_config, SyncAdapter};
pub use config::{ConfigCache, RemoteConfig};
pub use error::{SyncError, SyncResult};
pub use remote::{DocumentStore, HttpDocumentStore, SubscriptionRecord};
