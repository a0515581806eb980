//! In-progress invoice state.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  DRAFT LIFECYCLE                                                    │
//! │                                                                     │
//! │  add_line ──┐                                                       │
//! │  set_qty ───┼──▶ InvoiceDraft ──▶ commit (store layer) ──▶ Invoice  │
//! │  discount ──┘         │                                             │
//! │                       └──▶ reset ──▶ empty draft                    │
//! │                                                                     │
//! │  Every mutation either fully applies or leaves the draft untouched. │
//! │  Stock checks here use the item snapshot the caller passes in; the  │
//! │  commit path re-validates against live stock before writing.       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{GstRate, InventoryItem, InvoiceLine};
use crate::validation::validate_quantity;

/// A discount as entered by the operator.
///
/// Percentages are resolved to a flat amount against the subtotal at the
/// moment they are applied; later line edits do not re-derive them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discount {
    /// A fixed amount off the subtotal.
    Flat(Money),
    /// A fraction of the subtotal in basis points (1800 = 18%).
    Percent(u32),
}

/// Reference to the customer a draft is being billed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
}

/// Computed totals for a draft or committed invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Money,
    pub discount: Money,
    pub gst: Money,
    pub total: Money,
}

/// An invoice being assembled, before it is committed to the journal.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    customer: Option<CustomerRef>,
    lines: Vec<InvoiceLine>,
    discount: Money,
    gst_rate: GstRate,
}

impl InvoiceDraft {
    /// Creates an empty draft billing at the given GST rate.
    pub fn new(gst_rate: GstRate) -> Self {
        InvoiceDraft {
            customer: None,
            lines: Vec::new(),
            discount: Money::zero(),
            gst_rate,
        }
    }

    pub fn customer(&self) -> Option<&CustomerRef> {
        self.customer.as_ref()
    }

    pub fn set_customer(&mut self, customer: Option<CustomerRef>) {
        self.customer = customer;
    }

    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    pub fn gst_rate(&self) -> GstRate {
        self.gst_rate
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds `quantity` of an item, merging into an existing line for the
    /// same item.
    ///
    /// The merged quantity is checked against `item.stock`. On failure the
    /// draft is unchanged.
    pub fn add_line(&mut self, item: &InventoryItem, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let existing = self
            .lines
            .iter()
            .position(|l| l.item_id == item.id)
            .map(|idx| (idx, self.lines[idx].quantity));
        let combined = quantity + existing.map_or(0, |(_, q)| q);

        if combined > item.stock {
            return Err(CoreError::InsufficientStock {
                name: item.name.clone(),
                available: item.stock,
                requested: combined,
            });
        }

        match existing {
            Some((idx, _)) => {
                let line = &mut self.lines[idx];
                line.quantity = combined;
                line.total_paise = line.price_paise * combined;
            }
            None => self.lines.push(InvoiceLine {
                item_id: item.id.clone(),
                name: item.name.clone(),
                category: item.category.clone(),
                price_paise: item.sell_price_paise,
                quantity,
                unit: item.unit.clone(),
                batch_no: item.batch_no.clone(),
                total_paise: item.sell_price_paise * quantity,
            }),
        }
        Ok(())
    }

    /// Removes the line for an item. Removing an absent line is a no-op.
    pub fn remove_line(&mut self, item_id: &str) {
        self.lines.retain(|l| l.item_id != item_id);
    }

    /// Sets the exact quantity on an existing line.
    ///
    /// Zero or negative removes the line. Raising beyond `item.stock` fails
    /// and leaves the line unchanged.
    pub fn set_quantity(&mut self, item: &InventoryItem, quantity: i64) -> CoreResult<()> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.item_id == item.id)
            .ok_or_else(|| CoreError::LineNotFound(item.id.clone()))?;

        if quantity <= 0 {
            self.lines.remove(idx);
            return Ok(());
        }
        if quantity > item.stock {
            return Err(CoreError::InsufficientStock {
                name: item.name.clone(),
                available: item.stock,
                requested: quantity,
            });
        }

        let line = &mut self.lines[idx];
        line.quantity = quantity;
        line.total_paise = line.price_paise * quantity;
        Ok(())
    }

    /// Applies a discount, resolving percentages against the current
    /// subtotal.
    pub fn set_discount(&mut self, discount: Discount) -> CoreResult<()> {
        let subtotal = self.subtotal();
        let flat = match discount {
            Discount::Percent(bps) => {
                if bps > 10_000 {
                    return Err(CoreError::InvalidDiscount {
                        reason: format!("{}% exceeds 100%", bps as f64 / 100.0),
                    });
                }
                subtotal.percent_of(bps)
            }
            Discount::Flat(amount) => {
                if amount.is_negative() {
                    return Err(CoreError::InvalidDiscount {
                        reason: "discount cannot be negative".into(),
                    });
                }
                if amount > subtotal {
                    return Err(CoreError::InvalidDiscount {
                        reason: format!(
                            "discount {} exceeds subtotal {}",
                            amount, subtotal
                        ),
                    });
                }
                amount
            }
        };
        self.discount = flat;
        Ok(())
    }

    /// The resolved flat discount currently applied.
    pub fn discount(&self) -> Money {
        self.discount
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(InvoiceLine::total).sum()
    }

    /// GST on the discounted subtotal.
    pub fn gst_amount(&self) -> Money {
        self.taxable().gst(self.gst_rate)
    }

    /// Final payable amount.
    pub fn total(&self) -> Money {
        let taxable = self.taxable();
        taxable + taxable.gst(self.gst_rate)
    }

    /// All totals at once, computed consistently.
    pub fn totals(&self) -> Totals {
        let subtotal = self.subtotal();
        let taxable = self.taxable();
        let gst = taxable.gst(self.gst_rate);
        Totals {
            subtotal,
            discount: self.discount,
            gst,
            total: taxable + gst,
        }
    }

    // Line removals after a flat discount was set can push the subtotal
    // below the discount. The taxable base never goes negative.
    fn taxable(&self) -> Money {
        let taxable = self.subtotal() - self.discount;
        if taxable.is_negative() {
            Money::zero()
        } else {
            taxable
        }
    }

    /// Clears lines, discount and customer for the next sale. The GST rate
    /// is retained.
    pub fn reset(&mut self) {
        self.customer = None;
        self.lines.clear();
        self.discount = Money::zero();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
