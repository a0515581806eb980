//! # Meridian Store
//!
//! Persistence and orchestration for the Meridian console: a JSON document
//! store, typed repositories over it, the invoice commit path, full-store
//! export and import, and the report generators.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     meridian-store                        │
//! │                                                           │
//! │   billing ── InvoiceBuilder, returns                      │
//! │   analytics ── dashboard, sales, inventory, customers,    │
//! │                pnl, visits, insights                      │
//! │   repository ── typed access per collection               │
//! │   backup ── versioned export / import                     │
//! │   store ── facade + first-open seeding                    │
//! │   kv ── one JSON document per namespaced key              │
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod analytics;
pub mod backup;
pub mod billing;
pub mod error;
pub mod kv;
pub mod repository;
pub mod store;

pub use analytics::{Analytics, DashboardStats};
pub use backup::ExportEnvelope;
pub use billing::{InvoiceBuilder, ReturnLine, ReturnSummary};
pub use error::{StoreError, StoreResult};
pub use kv::JsonStore;
pub use store::Store;
