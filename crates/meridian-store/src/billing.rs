//! Invoice commit path.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  COMMIT SEQUENCE                                                   │
//! │                                                                    │
//! │  1. Refuse an empty draft                                          │
//! │  2. Re-validate EVERY line against live stock                      │
//! │  3. Allocate the next invoice number                               │
//! │  4. Append the invoice to the journal                              │
//! │  5. Decrement stock per line                                       │
//! │  6. Roll the total into the customer's spend counter               │
//! │  7. Reset the draft                                                │
//! │                                                                    │
//! │  Step 2 runs against live data, not the snapshots the draft was    │
//! │  built from. If anything sold out since the operator started, the  │
//! │  whole commit fails before a single write.                         │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};

use meridian_core::{
    CoreError, CustomerRef, Discount, Invoice, InvoiceDraft, Money, PaymentMethod,
    PaymentStatus, WALK_IN_CUSTOMER,
};

use crate::error::{StoreError, StoreResult};
use crate::repository::generate_id;
use crate::repository::invoice::local_day;
use crate::store::Store;

/// Drives one sale from an empty draft to a committed invoice.
#[derive(Debug)]
pub struct InvoiceBuilder {
    store: Store,
    draft: InvoiceDraft,
}

impl InvoiceBuilder {
    /// Starts a draft billing at the GST rate from settings.
    pub fn new(store: Store) -> StoreResult<Self> {
        let rate = store.settings().get()?.gst_rate();
        Ok(InvoiceBuilder {
            store,
            draft: InvoiceDraft::new(rate),
        })
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    /// Attaches a customer by id, snapshotting their current name.
    pub fn set_customer(&mut self, customer_id: &str) -> StoreResult<()> {
        let customer = self.store.customers().get(customer_id)?;
        self.draft.set_customer(Some(CustomerRef {
            id: customer.id,
            name: customer.name,
        }));
        Ok(())
    }

    pub fn clear_customer(&mut self) {
        self.draft.set_customer(None);
    }

    /// Adds a quantity of an item, checked against live stock.
    pub fn add_line(&mut self, item_id: &str, quantity: i64) -> StoreResult<()> {
        let item = self.store.inventory().get(item_id)?;
        self.draft.add_line(&item, quantity)?;
        Ok(())
    }

    pub fn remove_line(&mut self, item_id: &str) {
        self.draft.remove_line(item_id);
    }

    /// Sets an exact line quantity, checked against live stock.
    pub fn set_quantity(&mut self, item_id: &str, quantity: i64) -> StoreResult<()> {
        let item = self.store.inventory().get(item_id)?;
        self.draft.set_quantity(&item, quantity)?;
        Ok(())
    }

    pub fn set_discount(&mut self, discount: Discount) -> StoreResult<()> {
        self.draft.set_discount(discount)?;
        Ok(())
    }

    /// Commits the draft as an invoice. See the module docs for ordering.
    pub fn commit(
        &mut self,
        method: PaymentMethod,
        status: PaymentStatus,
        notes: Option<String>,
    ) -> StoreResult<Invoice> {
        if self.draft.is_empty() {
            return Err(StoreError::Core(CoreError::EmptyInvoice));
        }

        let inventory = self.store.inventory();
        for line in self.draft.lines() {
            let item = inventory.get(&line.item_id)?;
            if line.quantity > item.stock {
                warn!(
                    item = %item.name,
                    requested = line.quantity,
                    available = item.stock,
                    "commit aborted on stale stock"
                );
                return Err(StoreError::Core(CoreError::InsufficientStock {
                    name: item.name,
                    available: item.stock,
                    requested: line.quantity,
                }));
            }
        }

        let now = Utc::now();
        let number = self.store.invoices().next_invoice_number(local_day(now))?;
        let totals = self.draft.totals();
        let (customer_id, customer_name) = match self.draft.customer() {
            Some(c) => (Some(c.id.clone()), c.name.clone()),
            None => (None, WALK_IN_CUSTOMER.to_string()),
        };

        let invoice = Invoice {
            id: generate_id(),
            invoice_number: number,
            customer_id: customer_id.clone(),
            customer_name,
            lines: self.draft.lines().to_vec(),
            subtotal_paise: totals.subtotal.paise(),
            discount_paise: totals.discount.paise(),
            gst_rate_bps: self.draft.gst_rate().bps(),
            gst_paise: totals.gst.paise(),
            total_paise: totals.total.paise(),
            payment_status: status,
            payment_method: method,
            notes,
            created_at: now,
        };

        self.store.invoices().append(invoice.clone())?;
        for line in &invoice.lines {
            inventory.adjust_stock(&line.item_id, -line.quantity)?;
        }
        if let Some(id) = &customer_id {
            self.store.customers().add_spend(id, totals.total)?;
        }
        self.draft.reset();

        info!(number = %invoice.invoice_number, total = %totals.total, "invoice committed");
        Ok(invoice)
    }
}

// =============================================================================
// Returns
// =============================================================================

/// One item being returned against an invoice.
#[derive(Debug, Clone)]
pub struct ReturnLine {
    pub item_id: String,
    pub quantity: i64,
}

/// Outcome of a processed return.
#[derive(Debug, Clone)]
pub struct ReturnSummary {
    pub invoice_id: String,
    /// Refund at sold line prices plus GST at the invoice's rate.
    /// Flat discounts are not prorated back.
    pub refund: Money,
    pub restocked: Vec<ReturnLine>,
}

impl Store {
    /// Validates a return against what the invoice actually sold, then
    /// restocks the returned quantities.
    pub fn process_return(
        &self,
        invoice_id: &str,
        returns: &[ReturnLine],
    ) -> StoreResult<ReturnSummary> {
        let invoice = self.invoices().get(invoice_id)?;

        let mut refund_base = Money::zero();
        for ret in returns {
            meridian_core::validation::validate_quantity(ret.quantity)
                .map_err(CoreError::from)?;
            let sold = invoice
                .lines
                .iter()
                .find(|l| l.item_id == ret.item_id)
                .ok_or_else(|| StoreError::not_found("invoice line", &ret.item_id))?;
            if ret.quantity > sold.quantity {
                return Err(StoreError::Core(CoreError::InsufficientStock {
                    name: sold.name.clone(),
                    available: sold.quantity,
                    requested: ret.quantity,
                }));
            }
            refund_base += sold.price() * ret.quantity;
        }

        let mut restocked = Vec::with_capacity(returns.len());
        for ret in returns {
            match self.inventory().adjust_stock(&ret.item_id, ret.quantity) {
                Ok(_) => restocked.push(ret.clone()),
                // item removed from the catalog since the sale
                Err(StoreError::NotFound { .. }) => {
                    debug!(item_id = %ret.item_id, "returned item no longer in catalog");
                }
                Err(e) => return Err(e),
            }
        }

        let refund = refund_base
            + refund_base.percent_of(invoice.gst_rate_bps);
        info!(invoice = %invoice.invoice_number, refund = %refund, "processed return");
        Ok(ReturnSummary {
            invoice_id: invoice.id,
            refund,
            restocked,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
