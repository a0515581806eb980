//! Visit activity report.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::Analytics;
use crate::error::StoreResult;
use crate::repository::invoice::{in_range, local_day};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    pub visit_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyVisits {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrequentVisitor {
    pub customer_id: String,
    pub customer_name: String,
    pub visit_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_visits: usize,
    pub unique_customers: usize,
    pub by_type: Vec<TypeCount>,
    pub daily: Vec<DailyVisits>,
    /// Top ten most frequent visitors in the period, descending.
    pub frequent_visitors: Vec<FrequentVisitor>,
}

impl Analytics {
    pub fn visit_report(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<VisitReport> {
        let visits: Vec<_> = self
            .store()
            .visits()
            .all()?
            .into_iter()
            .filter(|v| in_range(v.date, Some(start), Some(end)))
            .collect();

        let names: HashMap<String, String> = self
            .store()
            .customers()
            .all()?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let unique: HashSet<&str> = visits.iter().map(|v| v.customer_id.as_str()).collect();

        let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        let mut by_customer: BTreeMap<String, usize> = BTreeMap::new();
        for v in &visits {
            *by_type.entry(v.visit_type.clone()).or_default() += 1;
            *by_day.entry(local_day(v.date)).or_default() += 1;
            *by_customer.entry(v.customer_id.clone()).or_default() += 1;
        }

        let mut frequent_visitors: Vec<FrequentVisitor> = by_customer
            .into_iter()
            .map(|(customer_id, visit_count)| FrequentVisitor {
                customer_name: names
                    .get(&customer_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".into()),
                customer_id,
                visit_count,
            })
            .collect();
        frequent_visitors.sort_by_key(|f| std::cmp::Reverse(f.visit_count));
        frequent_visitors.truncate(10);

        Ok(VisitReport {
            start,
            end,
            total_visits: visits.len(),
            unique_customers: unique.len(),
            by_type: by_type
                .into_iter()
                .map(|(visit_type, count)| TypeCount { visit_type, count })
                .collect(),
            daily: by_day
                .into_iter()
                .map(|(date, count)| DailyVisits { date, count })
                .collect(),
            frequent_visitors,
        })
    }
}
