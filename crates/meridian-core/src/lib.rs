//! # Meridian Core
//!
//! Pure business logic for the Meridian retail and clinic console.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      meridian-core                          │
//! │                                                             │
//! │   money ─── integer-paise arithmetic, GST rounding          │
//! │   types ─── items, customers, invoices, visits, settings    │
//! │   draft ─── in-progress invoice state machine               │
//! │   validation ── field checks run before any write           │
//! │   error ─── business-rule error taxonomy                    │
//! │                                                             │
//! │   Golden Rule: NO I/O. Persistence lives in meridian-store, │
//! │   remote access in meridian-sync. Everything here is        │
//! │   deterministic and unit-testable without a filesystem.     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod draft;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use draft::{CustomerRef, Discount, InvoiceDraft, Totals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::{
    Customer, CustomerType, GstRate, InventoryItem, Invoice, InvoiceLine, PaymentMethod,
    PaymentStatus, Settings, StockStatus, Visit,
};

/// Default GST rate applied to new installations, in basis points.
pub const DEFAULT_GST_RATE_BPS: u32 = 1800;

/// Default low-stock alert threshold for new items.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Items expiring within this many days are flagged as near expiry.
pub const NEAR_EXPIRY_WINDOW_DAYS: i64 = 30;

/// Version stamped into data exports.
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

/// Display name used on invoices with no attached customer.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";
