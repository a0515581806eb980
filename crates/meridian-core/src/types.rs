//! Core domain types shared across the workspace.
//!
//! Every persisted struct serializes with camelCase field names so the JSON
//! on disk and the documents pushed to the remote read the same way. Money
//! fields are stored as integer paise (see [`crate::money`]).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::NEAR_EXPIRY_WINDOW_DAYS;

// =============================================================================
// GST Rate
// =============================================================================

/// A GST rate in basis points (1 bps = 0.01%).
///
/// ## Why Basis Points?
/// Rates like 12.5% are exact as 1250 bps but not as an f64 percentage.
/// Keeping the rate integral keeps every tax computation integral.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GstRate(u32);

impl GstRate {
    /// Creates a rate from basis points. 1800 bps = 18%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        GstRate(bps)
    }

    /// Creates a rate from a percentage. 18.0% = 1800 bps.
    #[inline]
    pub fn from_percentage(pct: f64) -> Self {
        GstRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero-rated.
    #[inline]
    pub const fn zero() -> Self {
        GstRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for GstRate {
    fn default() -> Self {
        GstRate(crate::DEFAULT_GST_RATE_BPS)
    }
}

// =============================================================================
// Enumerations
// =============================================================================

/// Customer segment used by analytics and search filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Regular,
    Vip,
    New,
}

impl Default for CustomerType {
    fn default() -> Self {
        CustomerType::New
    }
}

/// Whether an invoice has been settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

/// How a settled invoice was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
}

/// Derived stock condition for an inventory item, worst condition wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Expired,
    NearExpiry,
    LowStock,
    InStock,
}

// =============================================================================
// Inventory
// =============================================================================

/// A stocked product or supply item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub buy_price_paise: i64,
    pub sell_price_paise: i64,
    pub stock: i64,
    pub unit: String,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub batch_no: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub mfg_date: Option<NaiveDate>,
    #[serde(default)]
    pub exp_date: Option<NaiveDate>,
    pub low_stock_threshold: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Purchase cost per unit.
    #[inline]
    pub fn buy_price(&self) -> Money {
        Money::from_paise(self.buy_price_paise)
    }

    /// Selling price per unit.
    #[inline]
    pub fn sell_price(&self) -> Money {
        Money::from_paise(self.sell_price_paise)
    }

    /// True when stock is at or below this item's threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }

    /// True when the expiry date has passed as of `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        matches!(self.exp_date, Some(exp) if exp < today)
    }

    /// True when expiry falls within the alert window (inclusive) and the
    /// item is not already expired.
    pub fn is_near_expiry(&self, today: NaiveDate) -> bool {
        match self.exp_date {
            Some(exp) => {
                let days = (exp - today).num_days();
                (0..=NEAR_EXPIRY_WINDOW_DAYS).contains(&days)
            }
            None => false,
        }
    }

    /// Worst applicable condition: expired > near expiry > low stock > ok.
    pub fn stock_status(&self, today: NaiveDate) -> StockStatus {
        if self.is_expired(today) {
            StockStatus::Expired
        } else if self.is_near_expiry(today) {
            StockStatus::NearExpiry
        } else if self.is_low_stock() {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

// =============================================================================
// Customers and Visits
// =============================================================================

/// A customer record with derived activity counters.
///
/// `total_visits` and `total_spent_paise` are maintained incrementally by the
/// visit and invoice flows rather than recomputed on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub medical_summary: Option<String>,
    #[serde(default)]
    pub customer_type: CustomerType,
    #[serde(default)]
    pub last_visit: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_visit: Option<NaiveDate>,
    #[serde(default)]
    pub total_visits: i64,
    #[serde(default)]
    pub total_spent_paise: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    #[inline]
    pub fn total_spent(&self) -> Money {
        Money::from_paise(self.total_spent_paise)
    }
}

/// One recorded customer visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: String,
    pub customer_id: String,
    pub date: DateTime<Utc>,
    pub visit_type: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub next_visit_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Invoices
// =============================================================================

/// A line on an invoice. Item details are snapshotted at sale time so the
/// invoice stays accurate even if the catalog changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub price_paise: i64,
    pub quantity: i64,
    pub unit: String,
    #[serde(default)]
    pub batch_no: Option<String>,
    pub total_paise: i64,
}

impl InvoiceLine {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }
}

/// A committed invoice. Immutable after generation except payment status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub lines: Vec<InvoiceLine>,
    pub subtotal_paise: i64,
    pub discount_paise: i64,
    pub gst_rate_bps: u32,
    pub gst_paise: i64,
    pub total_paise: i64,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_paise(self.subtotal_paise)
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_paise(self.discount_paise)
    }

    #[inline]
    pub fn gst_amount(&self) -> Money {
        Money::from_paise(self.gst_paise)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Shop-wide configuration stored as a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub shop_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    pub default_low_stock_threshold: i64,
    pub gst_rate_bps: u32,
    pub username: String,
    pub password: String,
}

impl Settings {
    #[inline]
    pub fn gst_rate(&self) -> GstRate {
        GstRate::from_bps(self.gst_rate_bps)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            shop_name: "My Shop".into(),
            address: None,
            contact: None,
            email: None,
            gst_number: None,
            website: None,
            logo: None,
            signature: None,
            default_low_stock_threshold: crate::DEFAULT_LOW_STOCK_THRESHOLD,
            gst_rate_bps: crate::DEFAULT_GST_RATE_BPS,
            username: "admin".into(),
            password: "0000".into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
