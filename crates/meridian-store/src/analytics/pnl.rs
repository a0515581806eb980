//! Profit and loss report.
//!
//! Cost of goods sold is valued at each item's current buy price, not the
//! price at sale time. Items deleted since the sale contribute zero cost.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::Analytics;
use crate::error::StoreResult;
use crate::repository::invoice::in_range;

/// Manually tracked expense heads, zero until an operator fills them in.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperatingExpenses {
    pub rent_paise: i64,
    pub utilities_paise: i64,
    pub salaries_paise: i64,
    pub marketing_paise: i64,
    pub other_paise: i64,
}

impl OperatingExpenses {
    pub fn total_paise(&self) -> i64 {
        self.rent_paise
            + self.utilities_paise
            + self.salaries_paise
            + self.marketing_paise
            + self.other_paise
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemProfit {
    pub item_id: String,
    pub name: String,
    pub quantity: i64,
    pub revenue_paise: i64,
    pub cost_paise: i64,
    pub profit_paise: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PnlReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub gross_revenue_paise: i64,
    pub total_discount_paise: i64,
    pub net_revenue_paise: i64,
    pub cogs_paise: i64,
    pub gross_profit_paise: i64,
    pub expenses: OperatingExpenses,
    pub net_profit_paise: i64,
    /// Top ten items by profit, descending.
    pub item_profits: Vec<ItemProfit>,
}

impl Analytics {
    pub fn pnl_report(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<PnlReport> {
        let invoices: Vec<_> = self
            .store()
            .invoices()
            .all()?
            .into_iter()
            .filter(|i| in_range(i.created_at, Some(start), Some(end)))
            .collect();

        let buy_prices: HashMap<String, i64> = self
            .store()
            .inventory()
            .all()?
            .into_iter()
            .map(|i| (i.id, i.buy_price_paise))
            .collect();

        let gross_revenue: i64 = invoices.iter().map(|i| i.subtotal_paise).sum();
        let total_discount: i64 = invoices.iter().map(|i| i.discount_paise).sum();
        let net_revenue = gross_revenue - total_discount;

        let mut by_item: BTreeMap<String, ItemProfit> = BTreeMap::new();
        for invoice in &invoices {
            for line in &invoice.lines {
                let unit_cost = buy_prices.get(&line.item_id).copied().unwrap_or(0);
                let entry = by_item
                    .entry(line.item_id.clone())
                    .or_insert_with(|| ItemProfit {
                        item_id: line.item_id.clone(),
                        name: line.name.clone(),
                        quantity: 0,
                        revenue_paise: 0,
                        cost_paise: 0,
                        profit_paise: 0,
                    });
                entry.quantity += line.quantity;
                entry.revenue_paise += line.total_paise;
                entry.cost_paise += unit_cost * line.quantity;
            }
        }
        let mut item_profits: Vec<ItemProfit> = by_item
            .into_values()
            .map(|mut p| {
                p.profit_paise = p.revenue_paise - p.cost_paise;
                p
            })
            .collect();
        let cogs: i64 = item_profits.iter().map(|p| p.cost_paise).sum();
        item_profits.sort_by_key(|p| std::cmp::Reverse(p.profit_paise));
        item_profits.truncate(10);

        let gross_profit = net_revenue - cogs;
        let expenses = OperatingExpenses::default();
        Ok(PnlReport {
            start,
            end,
            gross_revenue_paise: gross_revenue,
            total_discount_paise: total_discount,
            net_revenue_paise: net_revenue,
            cogs_paise: cogs,
            gross_profit_paise: gross_profit,
            net_profit_paise: gross_profit - expenses.total_paise(),
            expenses,
            item_profits,
        })
    }
}
