//! Inventory repository.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use meridian_core::error::CoreError;
use meridian_core::validation::{
    validate_name, validate_price_paise, validate_stock,
};
use meridian_core::InventoryItem;

use crate::error::{StoreError, StoreResult};
use crate::kv::{keys, JsonStore};
use crate::repository::{generate_id, Collection, Entity};

impl Entity for InventoryItem {
    const NAME: &'static str = "inventory item";

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Fields for a new inventory item. Id and timestamps are assigned on add.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub buy_price_paise: i64,
    pub sell_price_paise: i64,
    pub stock: i64,
    pub unit: String,
    pub supplier: Option<String>,
    pub batch_no: Option<String>,
    pub note: Option<String>,
    pub mfg_date: Option<NaiveDate>,
    pub exp_date: Option<NaiveDate>,
    pub low_stock_threshold: Option<i64>,
}

/// Partial update for an item. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub buy_price_paise: Option<i64>,
    pub sell_price_paise: Option<i64>,
    pub stock: Option<i64>,
    pub unit: Option<String>,
    pub supplier: Option<Option<String>>,
    pub batch_no: Option<Option<String>>,
    pub note: Option<Option<String>>,
    pub mfg_date: Option<Option<NaiveDate>>,
    pub exp_date: Option<Option<NaiveDate>>,
    pub low_stock_threshold: Option<i64>,
}

/// Search filter for [`InventoryRepo::search`].
#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    pub category: Option<String>,
    /// Only items expiring within this many days of `today` (unexpired).
    pub expiring_within_days: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct InventoryRepo {
    items: Collection<InventoryItem>,
}

impl InventoryRepo {
    pub fn new(kv: JsonStore) -> Self {
        InventoryRepo {
            items: Collection::new(kv, keys::INVENTORY),
        }
    }

    pub fn all(&self) -> StoreResult<Vec<InventoryItem>> {
        self.items.all()
    }

    pub fn get(&self, id: &str) -> StoreResult<InventoryItem> {
        self.items.get(id)
    }

    /// Validates and adds a new item, returning it with its assigned id.
    pub fn add(&self, new: NewItem, default_threshold: i64) -> StoreResult<InventoryItem> {
        validate_name("name", &new.name).map_err(CoreError::from)?;
        validate_price_paise("buyPrice", new.buy_price_paise).map_err(CoreError::from)?;
        validate_price_paise("sellPrice", new.sell_price_paise).map_err(CoreError::from)?;
        validate_stock(new.stock).map_err(CoreError::from)?;

        let now = Utc::now();
        let item = InventoryItem {
            id: generate_id(),
            name: new.name.trim().to_string(),
            category: new.category,
            buy_price_paise: new.buy_price_paise,
            sell_price_paise: new.sell_price_paise,
            stock: new.stock,
            unit: new.unit,
            supplier: new.supplier,
            batch_no: new.batch_no,
            note: new.note,
            mfg_date: new.mfg_date,
            exp_date: new.exp_date,
            low_stock_threshold: new.low_stock_threshold.unwrap_or(default_threshold),
            created_at: now,
            updated_at: now,
        };
        self.items.insert(item.clone())?;
        debug!(id = %item.id, name = %item.name, "added inventory item");
        Ok(item)
    }

    /// Applies a partial update.
    pub fn update(&self, id: &str, patch: ItemPatch) -> StoreResult<InventoryItem> {
        self.items.update_with(id, |item| {
            if let Some(name) = patch.name {
                validate_name("name", &name).map_err(CoreError::from)?;
                item.name = name.trim().to_string();
            }
            if let Some(category) = patch.category {
                item.category = category;
            }
            if let Some(p) = patch.buy_price_paise {
                validate_price_paise("buyPrice", p).map_err(CoreError::from)?;
                item.buy_price_paise = p;
            }
            if let Some(p) = patch.sell_price_paise {
                validate_price_paise("sellPrice", p).map_err(CoreError::from)?;
                item.sell_price_paise = p;
            }
            if let Some(stock) = patch.stock {
                validate_stock(stock).map_err(CoreError::from)?;
                item.stock = stock;
            }
            if let Some(unit) = patch.unit {
                item.unit = unit;
            }
            if let Some(supplier) = patch.supplier {
                item.supplier = supplier;
            }
            if let Some(batch_no) = patch.batch_no {
                item.batch_no = batch_no;
            }
            if let Some(note) = patch.note {
                item.note = note;
            }
            if let Some(mfg) = patch.mfg_date {
                item.mfg_date = mfg;
            }
            if let Some(exp) = patch.exp_date {
                item.exp_date = exp;
            }
            if let Some(t) = patch.low_stock_threshold {
                item.low_stock_threshold = t;
            }
            Ok(())
        })
    }

    /// Adjusts stock by a signed delta. A decrement past zero fails with an
    /// insufficient-stock error and writes nothing; stock is never clamped.
    pub fn adjust_stock(&self, id: &str, delta: i64) -> StoreResult<InventoryItem> {
        let updated = self.items.update_with(id, |item| {
            let next = item.stock + delta;
            if next < 0 {
                return Err(StoreError::Core(CoreError::InsufficientStock {
                    name: item.name.clone(),
                    available: item.stock,
                    requested: -delta,
                }));
            }
            item.stock = next;
            Ok(())
        })?;
        debug!(id, delta, stock = updated.stock, "adjusted stock");
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> StoreResult<()> {
        self.items.delete(id)
    }

    /// Case-insensitive search over name, category, supplier and batch
    /// number, with optional filters.
    pub fn search(
        &self,
        query: &str,
        filter: &InventoryFilter,
        today: NaiveDate,
    ) -> StoreResult<Vec<InventoryItem>> {
        let needle = query.trim().to_lowercase();
        let matches_query = |item: &InventoryItem| {
            needle.is_empty()
                || item.name.to_lowercase().contains(&needle)
                || item.category.to_lowercase().contains(&needle)
                || item
                    .supplier
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
                || item
                    .batch_no
                    .as_deref()
                    .is_some_and(|b| b.to_lowercase().contains(&needle))
        };

        Ok(self
            .all()?
            .into_iter()
            .filter(|item| {
                matches_query(item)
                    && filter
                        .category
                        .as_deref()
                        .is_none_or(|c| item.category.eq_ignore_ascii_case(c))
                    && filter.expiring_within_days.is_none_or(|days| {
                        item.exp_date
                            .is_some_and(|exp| {
                                let d = (exp - today).num_days();
                                (0..=days).contains(&d)
                            })
                    })
            })
            .collect())
    }
}
