//! Customer repository.

use chrono::{DateTime, Utc};
use tracing::debug;

use meridian_core::error::CoreError;
use meridian_core::validation::{validate_mobile, validate_name};
use meridian_core::{Customer, CustomerType, Money};

use crate::error::StoreResult;
use crate::kv::{keys, JsonStore};
use crate::repository::{generate_id, Collection, Entity};

impl Entity for Customer {
    const NAME: &'static str = "customer";

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub medical_summary: Option<String>,
    pub customer_type: CustomerType,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub medical_summary: Option<Option<String>>,
    pub customer_type: Option<CustomerType>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    pub customer_type: Option<CustomerType>,
}

#[derive(Debug, Clone)]
pub struct CustomerRepo {
    customers: Collection<Customer>,
}

impl CustomerRepo {
    pub fn new(kv: JsonStore) -> Self {
        CustomerRepo {
            customers: Collection::new(kv, keys::CUSTOMERS),
        }
    }

    pub fn all(&self) -> StoreResult<Vec<Customer>> {
        self.customers.all()
    }

    pub fn get(&self, id: &str) -> StoreResult<Customer> {
        self.customers.get(id)
    }

    pub fn add(&self, new: NewCustomer) -> StoreResult<Customer> {
        validate_name("name", &new.name).map_err(CoreError::from)?;
        validate_mobile(&new.mobile).map_err(CoreError::from)?;

        let now = Utc::now();
        let customer = Customer {
            id: generate_id(),
            name: new.name.trim().to_string(),
            mobile: new.mobile.trim().to_string(),
            email: new.email,
            address: new.address,
            medical_summary: new.medical_summary,
            customer_type: new.customer_type,
            last_visit: None,
            next_visit: None,
            total_visits: 0,
            total_spent_paise: 0,
            created_at: now,
            updated_at: now,
        };
        self.customers.insert(customer.clone())?;
        debug!(id = %customer.id, name = %customer.name, "added customer");
        Ok(customer)
    }

    pub fn update(&self, id: &str, patch: CustomerPatch) -> StoreResult<Customer> {
        self.customers.update_with(id, |c| {
            if let Some(name) = patch.name {
                validate_name("name", &name).map_err(CoreError::from)?;
                c.name = name.trim().to_string();
            }
            if let Some(mobile) = patch.mobile {
                validate_mobile(&mobile).map_err(CoreError::from)?;
                c.mobile = mobile.trim().to_string();
            }
            if let Some(email) = patch.email {
                c.email = email;
            }
            if let Some(address) = patch.address {
                c.address = address;
            }
            if let Some(summary) = patch.medical_summary {
                c.medical_summary = summary;
            }
            if let Some(t) = patch.customer_type {
                c.customer_type = t;
            }
            Ok(())
        })
    }

    /// Unvalidated patch used by flows that maintain derived counters.
    pub(crate) fn update_raw<F>(&self, id: &str, f: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Customer),
    {
        self.customers.update_with(id, |c| {
            f(c);
            Ok(())
        })?;
        Ok(())
    }

    /// Adds a completed sale to the customer's running spend total.
    pub fn add_spend(&self, id: &str, amount: Money) -> StoreResult<Customer> {
        self.customers.update_with(id, |c| {
            c.total_spent_paise += amount.paise();
            Ok(())
        })
    }

    /// Deletes a customer. Their invoices and visits are kept; history
    /// stays queryable by the snapshotted name.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        self.customers.delete(id)
    }

    /// Case-insensitive search over name, mobile and email.
    pub fn search(&self, query: &str, filter: &CustomerFilter) -> StoreResult<Vec<Customer>> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .all()?
            .into_iter()
            .filter(|c| {
                let hit = needle.is_empty()
                    || c.name.to_lowercase().contains(&needle)
                    || c.mobile.contains(&needle)
                    || c.email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&needle));
                hit && filter
                    .customer_type
                    .is_none_or(|t| c.customer_type == t)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn repo(dir: &std::path::Path) -> CustomerRepo {
        CustomerRepo::new(JsonStore::open(dir).unwrap())
    }

    fn new_customer(name: &str, mobile: &str) -> NewCustomer {
        NewCustomer {
            name: name.into(),
            mobile: mobile.into(),
            email: None,
            address: None,
            medical_summary: None,
            customer_type: CustomerType::New,
        }
    }

    #[test]
    fn add_starts_counters_at_zero() {
        let dir = tempdir().unwrap();
        let repo = repo(dir.path());
        let c = repo.add(new_customer("Asha Verma", "9876543210")).unwrap();
        assert_eq!(c.total_visits, 0);
        assert_eq!(c.total_spent_paise, 0);
        assert!(c.last_visit.is_none());
    }

    #[test]
    fn add_rejects_bad_mobile() {
        let dir = tempdir().unwrap();
        let repo = repo(dir.path());
        assert!(repo.add(new_customer("Asha", "12")).is_err());
        assert!(repo.all().unwrap().is_empty());
    }

    #[test]
    fn add_spend_accumulates() {
        let dir = tempdir().unwrap();
        let repo = repo(dir.path());
        let c = repo.add(new_customer("Asha", "9876543210")).unwrap();

        repo.add_spend(&c.id, Money::from_rupees(500)).unwrap();
        repo.add_spend(&c.id, Money::from_paise(2550)).unwrap();

        assert_eq!(repo.get(&c.id).unwrap().total_spent_paise, 52_550);
    }

    #[test]
    fn search_by_name_mobile_and_type() {
        let dir = tempdir().unwrap();
        let repo = repo(dir.path());

        repo.add(new_customer("Asha Verma", "9876543210")).unwrap();
        let mut vip = new_customer("Ravi Kumar", "9123456780");
        vip.customer_type = CustomerType::Vip;
        vip.email = Some("ravi@example.com".into());
        repo.add(vip).unwrap();

        assert_eq!(repo.search("asha", &CustomerFilter::default()).unwrap().len(), 1);
        assert_eq!(repo.search("9123", &CustomerFilter::default()).unwrap().len(), 1);
        assert_eq!(repo.search("example.com", &CustomerFilter::default()).unwrap().len(), 1);

        let vips = CustomerFilter {
            customer_type: Some(CustomerType::Vip),
        };
        let hits = repo.search("", &vips).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ravi Kumar");
    }
}
