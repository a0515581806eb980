//! Invoice journal.
//!
//! Invoices are append-only. After commit the only mutable field is the
//! payment status; corrections go through returns, never edits.

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use tracing::debug;

use meridian_core::{Invoice, PaymentStatus};

use crate::error::StoreResult;
use crate::kv::{keys, JsonStore};
use crate::repository::{Collection, Entity};

impl Entity for Invoice {
    const NAME: &'static str = "invoice";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Search filter for [`InvoiceRepo::search`].
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub payment_status: Option<PaymentStatus>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InvoiceRepo {
    invoices: Collection<Invoice>,
}

impl InvoiceRepo {
    pub fn new(kv: JsonStore) -> Self {
        InvoiceRepo {
            invoices: Collection::new(kv, keys::INVOICES),
        }
    }

    pub fn all(&self) -> StoreResult<Vec<Invoice>> {
        self.invoices.all()
    }

    pub fn get(&self, id: &str) -> StoreResult<Invoice> {
        self.invoices.get(id)
    }

    /// Appends a committed invoice to the journal.
    pub fn append(&self, invoice: Invoice) -> StoreResult<()> {
        debug!(
            id = %invoice.id,
            number = %invoice.invoice_number,
            total = invoice.total_paise,
            "recorded invoice"
        );
        self.invoices.insert(invoice)
    }

    /// Flips payment status, the one permitted post-commit edit.
    pub fn set_payment_status(&self, id: &str, status: PaymentStatus) -> StoreResult<Invoice> {
        self.invoices.update_with(id, |inv| {
            inv.payment_status = status;
            Ok(())
        })
    }

    /// Next display number for an invoice dated `date`:
    /// `INV` + 2-digit year + 2-digit month + 4-digit monthly sequence.
    /// The sequence restarts every month by counting existing numbers with
    /// the same prefix.
    pub fn next_invoice_number(&self, date: NaiveDate) -> StoreResult<String> {
        let prefix = format!("INV{:02}{:02}", date.year() % 100, date.month());
        let seq = self
            .all()?
            .iter()
            .filter(|inv| inv.invoice_number.starts_with(&prefix))
            .count()
            + 1;
        Ok(format!("{prefix}{seq:04}"))
    }

    /// Searches by invoice number, customer name, or the name of any line
    /// with optional filters. The end date is inclusive through its whole
    /// day.
    pub fn search(&self, query: &str, filter: &InvoiceFilter) -> StoreResult<Vec<Invoice>> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .all()?
            .into_iter()
            .filter(|inv| {
                let hit = needle.is_empty()
                    || inv.invoice_number.to_lowercase().contains(&needle)
                    || inv.customer_name.to_lowercase().contains(&needle)
                    || inv
                        .lines
                        .iter()
                        .any(|l| l.name.to_lowercase().contains(&needle));
                hit && in_range(inv.created_at, filter.start, filter.end)
                    && filter.payment_status.is_none_or(|s| inv.payment_status == s)
                    && filter
                        .customer_id
                        .as_deref()
                        .is_none_or(|c| inv.customer_id.as_deref() == Some(c))
            })
            .collect())
    }
}

/// The operator's calendar day for a stored timestamp. All date bucketing
/// works in local time; a sale rung up this evening belongs to today even
/// when UTC has already rolled over.
pub(crate) fn local_day(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

pub(crate) fn in_range(
    at: DateTime<Utc>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> bool {
    let day = local_day(at);
    start.is_none_or(|s| day >= s) && end.is_none_or(|e| day <= e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::PaymentMethod;
    use tempfile::tempdir;

    fn repo(dir: &std::path::Path) -> InvoiceRepo {
        InvoiceRepo::new(JsonStore::open(dir).unwrap())
    }

    fn invoice(id: &str, number: &str, total: i64) -> Invoice {
        Invoice {
            id: id.into(),
            invoice_number: number.into(),
            customer_id: None,
            customer_name: "Walk-in Customer".into(),
            lines: vec![],
            subtotal_paise: total,
            discount_paise: 0,
            gst_rate_bps: 0,
            gst_paise: 0,
            total_paise: total,
            payment_status: PaymentStatus::Paid,
            payment_method: PaymentMethod::Cash,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn number_format_and_monthly_sequence() {
        let dir = tempdir().unwrap();
        let repo = repo(dir.path());
        let june = d(2025, 6, 15);

        assert_eq!(repo.next_invoice_number(june).unwrap(), "INV25060001");
        repo.append(invoice("a", "INV25060001", 100)).unwrap();
        repo.append(invoice("b", "INV25060002", 100)).unwrap();
        assert_eq!(repo.next_invoice_number(june).unwrap(), "INV25060003");
    }

    #[test]
    fn sequence_restarts_each_month() {
        let dir = tempdir().unwrap();
        let repo = repo(dir.path());

        repo.append(invoice("a", "INV25060001", 100)).unwrap();
        repo.append(invoice("b", "INV25060002", 100)).unwrap();

        assert_eq!(
            repo.next_invoice_number(d(2025, 7, 1)).unwrap(),
            "INV25070001"
        );
    }

    #[test]
    fn set_payment_status_is_the_only_edit() {
        let dir = tempdir().unwrap();
        let repo = repo(dir.path());
        repo.append(invoice("a", "INV25060001", 500)).unwrap();

        let updated = repo.set_payment_status("a", PaymentStatus::Unpaid).unwrap();
        assert_eq!(updated.payment_status, PaymentStatus::Unpaid);
        assert_eq!(updated.total_paise, 500);
    }

    #[test]
    fn search_filters_status_and_number() {
        let dir = tempdir().unwrap();
        let repo = repo(dir.path());
        repo.append(invoice("a", "INV25060001", 100)).unwrap();
        let mut unpaid = invoice("b", "INV25060002", 200);
        unpaid.payment_status = PaymentStatus::Unpaid;
        repo.append(unpaid).unwrap();

        let all = repo.search("inv2506", &InvoiceFilter::default()).unwrap();
        assert_eq!(all.len(), 2);

        let f = InvoiceFilter {
            payment_status: Some(PaymentStatus::Unpaid),
            ..Default::default()
        };
        let hits = repo.search("", &f).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");
    }

    #[test]
    fn date_range_end_is_inclusive() {
        let today = Utc::now();
        let day = local_day(today);
        assert!(in_range(today, Some(day), Some(day)));
        assert!(!in_range(today, None, day.pred_opt()));
    }

    #[test]
    fn range_days_are_local_calendar_days() {
        // a timestamp taken right now falls in the local "today" range
        // whatever zone the process runs in
        let now = Utc::now();
        assert_eq!(local_day(now), Local::now().date_naive());
        let today = Local::now().date_naive();
        assert!(in_range(now, Some(today), Some(today)));
    }
}
