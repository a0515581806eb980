//! Rule-based business insights for the dashboard.

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;

use crate::analytics::Analytics;
use crate::error::StoreResult;
use crate::repository::invoice::{in_range, local_day};

/// How urgently an insight needs attention. Ordering is most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub action: String,
}

/// Sales in the last 30 days must move at least this much against the prior
/// 30 before a trend insight fires.
const TREND_THRESHOLD_PCT: i64 = 10;

/// Customers with no visit for this long are flagged as inactive.
const INACTIVE_DAYS: i64 = 90;

impl Analytics {
    /// Insights as of the local calendar date.
    pub fn business_insights(&self) -> StoreResult<Vec<Insight>> {
        self.business_insights_on(Local::now().date_naive())
    }

    pub fn business_insights_on(&self, today: NaiveDate) -> StoreResult<Vec<Insight>> {
        let mut insights = Vec::new();

        let items = self.store().inventory().all()?;
        let expired = items.iter().filter(|i| i.is_expired(today)).count();
        if expired > 0 {
            insights.push(Insight {
                severity: Severity::Critical,
                title: "Expired stock on shelf".into(),
                message: format!("{expired} item(s) are past their expiry date"),
                action: "Remove expired items from inventory".into(),
            });
        }

        let low = items
            .iter()
            .filter(|i| i.is_low_stock() && !i.is_expired(today))
            .count();
        if low > 0 {
            insights.push(Insight {
                severity: Severity::High,
                title: "Low stock".into(),
                message: format!("{low} item(s) are at or below their reorder threshold"),
                action: "Reorder before they sell out".into(),
            });
        }

        self.sales_trend(today, &mut insights)?;
        self.inactive_customers(today, &mut insights)?;

        insights.sort_by_key(|i| i.severity);
        Ok(insights)
    }

    fn sales_trend(&self, today: NaiveDate, out: &mut Vec<Insight>) -> StoreResult<()> {
        let invoices = self.store().invoices().all()?;
        let recent_start = today - Duration::days(29);
        let prior_start = today - Duration::days(59);
        let prior_end = today - Duration::days(30);

        let sum = |start: NaiveDate, end: NaiveDate| -> i64 {
            invoices
                .iter()
                .filter(|i| in_range(i.created_at, Some(start), Some(end)))
                .map(|i| i.total_paise)
                .sum()
        };
        let recent = sum(recent_start, today);
        let prior = sum(prior_start, prior_end);
        if prior == 0 {
            return Ok(());
        }

        let change_pct = (recent - prior) * 100 / prior;
        if change_pct <= -TREND_THRESHOLD_PCT {
            out.push(Insight {
                severity: Severity::High,
                title: "Sales declining".into(),
                message: format!(
                    "Sales are down {}% versus the previous 30 days",
                    -change_pct
                ),
                action: "Review pricing and run a promotion".into(),
            });
        } else if change_pct >= TREND_THRESHOLD_PCT {
            out.push(Insight {
                severity: Severity::Low,
                title: "Sales growing".into(),
                message: format!(
                    "Sales are up {change_pct}% versus the previous 30 days"
                ),
                action: "Keep popular items well stocked".into(),
            });
        }
        Ok(())
    }

    fn inactive_customers(&self, today: NaiveDate, out: &mut Vec<Insight>) -> StoreResult<()> {
        let cutoff = today - Duration::days(INACTIVE_DAYS);
        let inactive = self
            .store()
            .customers()
            .all()?
            .iter()
            .filter(|c| c.last_visit.is_some_and(|v| local_day(v) < cutoff))
            .count();
        if inactive > 0 {
            out.push(Insight {
                severity: Severity::Medium,
                title: "Inactive customers".into(),
                message: format!("{inactive} customer(s) have not visited in 3 months"),
                action: "Reach out with a follow-up reminder".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::*;
    use crate::store::Store;
    use tempfile::tempdir;

    #[test]
    fn expired_and_low_stock_fire_in_severity_order() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let analytics = Analytics::new(store.clone());
        let today = d(2025, 6, 1);

        store.inventory().add(item("Gauze", 100, 200, 3), 10).unwrap();
        let mut old = item("Old Syrup", 100, 200, 50);
        old.exp_date = Some(d(2025, 1, 1));
        store.inventory().add(old, 10).unwrap();

        let insights = analytics.business_insights_on(today).unwrap();
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].severity, Severity::Critical);
        assert_eq!(insights[0].title, "Expired stock on shelf");
        assert_eq!(insights[1].severity, Severity::High);
    }

    #[test]
    fn healthy_store_has_no_insights() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let analytics = Analytics::new(store.clone());

        store.inventory().add(item("Tablet", 100, 200, 50), 10).unwrap();
        let insights = analytics.business_insights_on(d(2025, 6, 1)).unwrap();
        assert!(insights.is_empty());
    }

    #[test]
    fn trend_needs_a_prior_period() {
        // sales this month but none before must not report a trend
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let analytics = Analytics::new(store.clone());

        let it = store.inventory().add(item("A", 100, 1000, 50), 10).unwrap();
        sell(&store, &it.id, 1);

        let today = Local::now().date_naive();
        let insights = analytics.business_insights_on(today).unwrap();
        assert!(insights.iter().all(|i| !i.title.starts_with("Sales")));
    }
}
