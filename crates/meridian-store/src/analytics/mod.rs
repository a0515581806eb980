//! Report generators over the store.
//!
//! Reports are computed on demand from the stored collections; nothing here
//! writes. Date-sensitive reports take an explicit `today` in their `*_on`
//! form, with a convenience wrapper using the local calendar date.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::error::StoreResult;
use crate::repository::invoice::local_day;
use crate::store::Store;

pub mod customers;
pub mod insights;
pub mod inventory;
pub mod pnl;
pub mod sales;
pub mod visits;

pub use customers::CustomerReport;
pub use insights::{Insight, Severity};
pub use inventory::InventoryReport;
pub use pnl::PnlReport;
pub use sales::SalesReport;
pub use visits::VisitReport;

/// Entry point for every report. Cheap to construct.
#[derive(Debug, Clone)]
pub struct Analytics {
    store: Store,
}

/// The landing-page summary card numbers.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_items: usize,
    pub low_stock_items: usize,
    pub expired_items: usize,
    pub near_expiry_items: usize,
    pub todays_sales_paise: i64,
    pub todays_invoices: usize,
    pub total_invoices: usize,
    pub total_customers: usize,
    pub todays_visits: usize,
    pub upcoming_visits: usize,
    pub total_visits: usize,
}

impl Analytics {
    pub fn new(store: Store) -> Self {
        Analytics { store }
    }

    pub(crate) fn store(&self) -> &Store {
        &self.store
    }

    /// Dashboard numbers for the local calendar date.
    pub fn dashboard_stats(&self) -> StoreResult<DashboardStats> {
        self.dashboard_stats_on(Local::now().date_naive())
    }

    /// Dashboard numbers as of an explicit date.
    pub fn dashboard_stats_on(&self, today: NaiveDate) -> StoreResult<DashboardStats> {
        let items = self.store.inventory().all()?;
        let invoices = self.store.invoices().all()?;
        let customers = self.store.customers().all()?;
        let visits = self.store.visits().all()?;

        let todays: Vec<_> = invoices
            .iter()
            .filter(|i| local_day(i.created_at) == today)
            .collect();

        Ok(DashboardStats {
            total_items: items.len(),
            low_stock_items: items
                .iter()
                .filter(|i| i.is_low_stock() && !i.is_expired(today))
                .count(),
            expired_items: items.iter().filter(|i| i.is_expired(today)).count(),
            near_expiry_items: items.iter().filter(|i| i.is_near_expiry(today)).count(),
            todays_sales_paise: todays.iter().map(|i| i.total_paise).sum(),
            todays_invoices: todays.len(),
            total_invoices: invoices.len(),
            total_customers: customers.len(),
            todays_visits: visits
                .iter()
                .filter(|v| local_day(v.date) == today)
                .count(),
            upcoming_visits: visits
                .iter()
                .filter(|v| v.next_visit_date.is_some_and(|d| d >= today))
                .count(),
            total_visits: visits.len(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::*;
    use super::*;
    use chrono::Duration;
    use tempfile::tempdir;

    #[test]
    fn dashboard_counts_todays_activity() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let analytics = Analytics::new(store.clone());

        let it = store.inventory().add(item("Tablet", 100, 200, 50), 10).unwrap();
        store
            .customers()
            .add(customer("Asha", "9876543210", meridian_core::CustomerType::Regular))
            .unwrap();
        sell(&store, &it.id, 2);

        let today = Local::now().date_naive();
        let stats = analytics.dashboard_stats_on(today).unwrap();
        assert_eq!(stats.total_items, 1);
        assert_eq!(stats.total_customers, 1);
        assert_eq!(stats.todays_invoices, 1);
        assert_eq!(stats.todays_sales_paise, 472); // 400 + 18% GST
        assert_eq!(stats.low_stock_items, 0);
    }

    #[test]
    fn dashboard_low_stock_excludes_expired() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let analytics = Analytics::new(store.clone());
        let today = d(2025, 6, 1);

        let mut expired = item("Old Syrup", 100, 200, 2);
        expired.exp_date = Some(d(2025, 1, 1));
        store.inventory().add(expired, 10).unwrap();
        store.inventory().add(item("Gauze", 100, 200, 3), 10).unwrap();

        let stats = analytics.dashboard_stats_on(today).unwrap();
        assert_eq!(stats.expired_items, 1);
        assert_eq!(stats.low_stock_items, 1);
    }

    #[test]
    fn upcoming_visits_counts_each_scheduled_visit() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let analytics = Analytics::new(store.clone());
        let today = Local::now().date_naive();

        let c = store
            .customers()
            .add(customer("Asha", "9876543210", meridian_core::CustomerType::Regular))
            .unwrap();
        for days in [7, 14] {
            store
                .visits()
                .record(crate::repository::NewVisit {
                    customer_id: c.id.clone(),
                    visit_type: "checkup".into(),
                    notes: None,
                    next_visit_date: Some(today + Duration::days(days)),
                })
                .unwrap();
        }

        // two future appointments for the same customer are two upcoming
        // visits, not one
        let stats = analytics.dashboard_stats_on(today).unwrap();
        assert_eq!(stats.upcoming_visits, 2);
        assert_eq!(stats.total_visits, 2);
    }

    #[test]
    fn todays_numbers_follow_the_local_calendar() {
        // a sale rung up right now counts as today's no matter the zone
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let analytics = Analytics::new(store.clone());

        let it = store.inventory().add(item("Tablet", 100, 200, 50), 10).unwrap();
        sell(&store, &it.id, 1);

        let stats = analytics.dashboard_stats().unwrap();
        assert_eq!(stats.todays_invoices, 1);
        assert_eq!(stats.todays_sales_paise, 236); // 200 + 18% GST
    }
}
