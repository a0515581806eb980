//! Sales report over a date range.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use meridian_core::PaymentStatus;

use crate::analytics::Analytics;
use crate::error::StoreResult;
use crate::repository::invoice::{in_range, local_day};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales_paise: i64,
    pub invoice_count: usize,
    pub total_discount_paise: i64,
    pub total_gst_paise: i64,
    pub average_invoice_paise: i64,
    pub paid_amount_paise: i64,
    pub unpaid_amount_paise: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemSales {
    pub item_id: String,
    pub name: String,
    pub quantity: i64,
    pub revenue_paise: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub date: NaiveDate,
    pub invoice_count: usize,
    pub total_paise: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub summary: SalesSummary,
    /// Top ten items by revenue, descending.
    pub top_items: Vec<ItemSales>,
    /// One entry per day that had sales, chronological.
    pub daily: Vec<DailySales>,
}

impl Analytics {
    /// Sales between `start` and `end`, both inclusive through the whole
    /// day.
    pub fn sales_report(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<SalesReport> {
        let invoices: Vec<_> = self
            .store()
            .invoices()
            .all()?
            .into_iter()
            .filter(|i| in_range(i.created_at, Some(start), Some(end)))
            .collect();

        let total: i64 = invoices.iter().map(|i| i.total_paise).sum();
        let summary = SalesSummary {
            total_sales_paise: total,
            invoice_count: invoices.len(),
            total_discount_paise: invoices.iter().map(|i| i.discount_paise).sum(),
            total_gst_paise: invoices.iter().map(|i| i.gst_paise).sum(),
            average_invoice_paise: if invoices.is_empty() {
                0
            } else {
                total / invoices.len() as i64
            },
            paid_amount_paise: invoices
                .iter()
                .filter(|i| i.payment_status == PaymentStatus::Paid)
                .map(|i| i.total_paise)
                .sum(),
            unpaid_amount_paise: invoices
                .iter()
                .filter(|i| i.payment_status == PaymentStatus::Unpaid)
                .map(|i| i.total_paise)
                .sum(),
        };

        // (quantity, revenue) per item across all lines
        let mut by_item: BTreeMap<String, ItemSales> = BTreeMap::new();
        for invoice in &invoices {
            for line in &invoice.lines {
                let entry = by_item
                    .entry(line.item_id.clone())
                    .or_insert_with(|| ItemSales {
                        item_id: line.item_id.clone(),
                        name: line.name.clone(),
                        quantity: 0,
                        revenue_paise: 0,
                    });
                entry.quantity += line.quantity;
                entry.revenue_paise += line.total_paise;
            }
        }
        let mut top_items: Vec<ItemSales> = by_item.into_values().collect();
        top_items.sort_by(|a, b| b.revenue_paise.cmp(&a.revenue_paise));
        top_items.truncate(10);

        let mut by_day: BTreeMap<NaiveDate, DailySales> = BTreeMap::new();
        for invoice in &invoices {
            let day = local_day(invoice.created_at);
            let entry = by_day.entry(day).or_insert_with(|| DailySales {
                date: day,
                invoice_count: 0,
                total_paise: 0,
            });
            entry.invoice_count += 1;
            entry.total_paise += invoice.total_paise;
        }

        Ok(SalesReport {
            start,
            end,
            summary,
            top_items,
            daily: by_day.into_values().collect(),
        })
    }
}
