//! Error types for domain logic.
//!
//! Pure business-rule errors only. Storage and remote failures live in the
//! store and sync crates and wrap these where a rule is violated.

use thiserror::Error;

/// Result alias for domain operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors from business rules: drafting invoices, stock checks, discounts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Requested quantity exceeds what is on hand.
    #[error("insufficient stock for '{name}': {available} available, {requested} requested")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// The draft has no line for the given item.
    #[error("no line for item '{0}' in the current draft")]
    LineNotFound(String),

    /// An invoice cannot be committed without at least one line.
    #[error("cannot generate an invoice with no items")]
    EmptyInvoice,

    /// Discount is out of range for the current draft.
    #[error("invalid discount: {reason}")]
    InvalidDiscount { reason: String },

    /// A field failed input validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Field-level validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("{field} must be greater than zero")]
    MustBePositive { field: &'static str },

    #[error("{field} is invalid: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}
