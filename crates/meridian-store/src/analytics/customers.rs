//! Customer base report.

use std::collections::BTreeMap;

use serde::Serialize;

use meridian_core::Customer;

use crate::analytics::Analytics;
use crate::error::StoreResult;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeBreakdown {
    pub customer_type: String,
    pub count: usize,
    pub total_spent_paise: i64,
    pub average_spent_paise: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerReport {
    pub total_customers: usize,
    pub total_spent_paise: i64,
    pub average_spent_paise: i64,
    pub total_visits: i64,
    pub average_visits: f64,
    pub by_type: Vec<TypeBreakdown>,
    /// Top ten spenders, descending.
    pub top_spenders: Vec<Customer>,
}

impl Analytics {
    pub fn customer_report(&self) -> StoreResult<CustomerReport> {
        let customers = self.store().customers().all()?;

        let total_spent: i64 = customers.iter().map(|c| c.total_spent_paise).sum();
        let total_visits: i64 = customers.iter().map(|c| c.total_visits).sum();
        let count = customers.len();

        let mut by_type: BTreeMap<String, (usize, i64)> = BTreeMap::new();
        for c in &customers {
            let key = match serde_json::to_value(c.customer_type) {
                Ok(serde_json::Value::String(s)) => s,
                _ => "unknown".into(),
            };
            let entry = by_type.entry(key).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += c.total_spent_paise;
        }
        let by_type = by_type
            .into_iter()
            .map(|(customer_type, (n, spent))| TypeBreakdown {
                customer_type,
                count: n,
                total_spent_paise: spent,
                average_spent_paise: if n == 0 { 0 } else { spent / n as i64 },
            })
            .collect();

        let mut top_spenders = customers;
        top_spenders.sort_by_key(|c| std::cmp::Reverse(c.total_spent_paise));
        top_spenders.truncate(10);

        Ok(CustomerReport {
            total_customers: count,
            total_spent_paise: total_spent,
            average_spent_paise: if count == 0 { 0 } else { total_spent / count as i64 },
            total_visits,
            average_visits: if count == 0 {
                0.0
            } else {
                total_visits as f64 / count as f64
            },
            by_type,
            top_spenders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::*;
    use crate::store::Store;
    use meridian_core::{CustomerType, Money};
    use tempfile::tempdir;

    #[test]
    fn breakdown_by_type_and_top_spenders() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let analytics = Analytics::new(store.clone());

        let a = store
            .customers()
            .add(customer("Asha", "9876543210", CustomerType::Vip))
            .unwrap();
        let b = store
            .customers()
            .add(customer("Ravi", "9123456780", CustomerType::Regular))
            .unwrap();
        store
            .customers()
            .add_spend(&a.id, Money::from_rupees(500))
            .unwrap();
        store
            .customers()
            .add_spend(&b.id, Money::from_rupees(100))
            .unwrap();

        let report = analytics.customer_report().unwrap();
        assert_eq!(report.total_customers, 2);
        assert_eq!(report.total_spent_paise, 60_000);
        assert_eq!(report.average_spent_paise, 30_000);

        let vip = report
            .by_type
            .iter()
            .find(|t| t.customer_type == "vip")
            .unwrap();
        assert_eq!(vip.count, 1);
        assert_eq!(vip.total_spent_paise, 50_000);

        assert_eq!(report.top_spenders[0].name, "Asha");
    }

    #[test]
    fn empty_base_yields_zeroes() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let report = Analytics::new(store).customer_report().unwrap();
        assert_eq!(report.total_customers, 0);
        assert_eq!(report.average_spent_paise, 0);
        assert_eq!(report.average_visits, 0.0);
    }
}
