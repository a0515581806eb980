//! Inventory valuation and alert report.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use meridian_core::InventoryItem;

use crate::analytics::Analytics;
use crate::error::StoreResult;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_items: usize,
    pub total_stock_units: i64,
    /// Value of stock at purchase cost.
    pub buy_value_paise: i64,
    /// Value of stock at selling price.
    pub sell_value_paise: i64,
    pub potential_profit_paise: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRollup {
    pub category: String,
    pub item_count: usize,
    pub stock_units: i64,
    /// Stock in this category valued at purchase cost.
    pub stock_value_paise: i64,
    pub low_stock_count: usize,
    pub expired_count: usize,
    pub near_expiry_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub summary: InventorySummary,
    pub by_category: Vec<CategoryRollup>,
    pub low_stock: Vec<InventoryItem>,
    pub expired: Vec<InventoryItem>,
    pub near_expiry: Vec<InventoryItem>,
    /// Top ten items by stock sell value, descending.
    pub top_by_value: Vec<InventoryItem>,
}

impl Analytics {
    /// Valuation as of the local calendar date.
    pub fn inventory_report(&self) -> StoreResult<InventoryReport> {
        self.inventory_report_on(Local::now().date_naive())
    }

    pub fn inventory_report_on(&self, today: NaiveDate) -> StoreResult<InventoryReport> {
        let items = self.store().inventory().all()?;

        let buy_value: i64 = items.iter().map(|i| i.buy_price_paise * i.stock).sum();
        let sell_value: i64 = items.iter().map(|i| i.sell_price_paise * i.stock).sum();
        let summary = InventorySummary {
            total_items: items.len(),
            total_stock_units: items.iter().map(|i| i.stock).sum(),
            buy_value_paise: buy_value,
            sell_value_paise: sell_value,
            potential_profit_paise: sell_value - buy_value,
        };

        let mut by_category: BTreeMap<String, CategoryRollup> = BTreeMap::new();
        for item in &items {
            let entry = by_category
                .entry(item.category.clone())
                .or_insert_with(|| CategoryRollup {
                    category: item.category.clone(),
                    item_count: 0,
                    stock_units: 0,
                    stock_value_paise: 0,
                    low_stock_count: 0,
                    expired_count: 0,
                    near_expiry_count: 0,
                });
            entry.item_count += 1;
            entry.stock_units += item.stock;
            entry.stock_value_paise += item.buy_price_paise * item.stock;
            if item.is_expired(today) {
                entry.expired_count += 1;
            } else if item.is_low_stock() {
                entry.low_stock_count += 1;
            }
            if item.is_near_expiry(today) {
                entry.near_expiry_count += 1;
            }
        }

        let low_stock = items
            .iter()
            .filter(|i| i.is_low_stock() && !i.is_expired(today))
            .cloned()
            .collect();
        let expired = items.iter().filter(|i| i.is_expired(today)).cloned().collect();
        let near_expiry = items
            .iter()
            .filter(|i| i.is_near_expiry(today))
            .cloned()
            .collect();

        let mut top_by_value = items;
        top_by_value
            .sort_by_key(|i| std::cmp::Reverse(i.sell_price_paise * i.stock));
        top_by_value.truncate(10);

        Ok(InventoryReport {
            summary,
            by_category: by_category.into_values().collect(),
            low_stock,
            expired,
            near_expiry,
            top_by_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::*;
    use crate::store::Store;
    use tempfile::tempdir;

    #[test]
    fn valuation_and_category_rollups() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let analytics = Analytics::new(store.clone());

        store.inventory().add(item("A", 100, 150, 10), 10).unwrap();
        let mut eq = item("Monitor", 50_000, 80_000, 2);
        eq.category = "Equipment".into();
        store.inventory().add(eq, 10).unwrap();

        let report = analytics.inventory_report_on(d(2025, 6, 1)).unwrap();
        assert_eq!(report.summary.total_items, 2);
        assert_eq!(report.summary.total_stock_units, 12);
        assert_eq!(report.summary.buy_value_paise, 1000 + 100_000);
        assert_eq!(report.summary.sell_value_paise, 1500 + 160_000);
        assert_eq!(report.summary.potential_profit_paise, 500 + 60_000);

        assert_eq!(report.by_category.len(), 2);
        let equipment = report
            .by_category
            .iter()
            .find(|c| c.category == "Equipment")
            .unwrap();
        assert_eq!(equipment.stock_value_paise, 100_000);

        assert_eq!(report.top_by_value[0].name, "Monitor");
    }

    #[test]
    fn alert_lists_are_disjoint_for_expired() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let analytics = Analytics::new(store.clone());
        let today = d(2025, 6, 1);

        let mut expired = item("Old", 100, 150, 2);
        expired.exp_date = Some(d(2025, 5, 1));
        store.inventory().add(expired, 10).unwrap();

        let mut soon = item("Soon", 100, 150, 50);
        soon.exp_date = Some(d(2025, 6, 20));
        store.inventory().add(soon, 10).unwrap();

        let report = analytics.inventory_report_on(today).unwrap();
        assert_eq!(report.expired.len(), 1);
        assert_eq!(report.near_expiry.len(), 1);
        assert_eq!(report.near_expiry[0].name, "Soon");
        // expired item is low on stock but reported only as expired
        assert!(report.low_stock.is_empty());

        let med = report
            .by_category
            .iter()
            .find(|c| c.category == "Medicine")
            .unwrap();
        assert_eq!(med.expired_count, 1);
        assert_eq!(med.low_stock_count, 0);
        assert_eq!(med.near_expiry_count, 1);
    }
}
