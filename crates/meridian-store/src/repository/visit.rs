//! Visit log.
//!
//! Recording a visit also patches the customer's derived fields: last
//! visit, scheduled next visit, and the running visit count.

use chrono::{NaiveDate, Utc};
use tracing::debug;

use meridian_core::Visit;

use crate::error::StoreResult;
use crate::kv::{keys, JsonStore};
use crate::repository::customer::CustomerRepo;
use crate::repository::{generate_id, Collection, Entity};

impl Entity for Visit {
    const NAME: &'static str = "visit";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone)]
pub struct NewVisit {
    pub customer_id: String,
    pub visit_type: String,
    pub notes: Option<String>,
    pub next_visit_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct VisitRepo {
    visits: Collection<Visit>,
    customers: CustomerRepo,
}

impl VisitRepo {
    pub fn new(kv: JsonStore) -> Self {
        VisitRepo {
            customers: CustomerRepo::new(kv.clone()),
            visits: Collection::new(kv, keys::VISITS),
        }
    }

    pub fn all(&self) -> StoreResult<Vec<Visit>> {
        self.visits.all()
    }

    /// Records a visit for an existing customer and updates that customer's
    /// visit counters. Fails without writing if the customer is unknown.
    pub fn record(&self, new: NewVisit) -> StoreResult<Visit> {
        // check the customer exists before appending the visit
        self.customers.get(&new.customer_id)?;

        let now = Utc::now();
        let visit = Visit {
            id: generate_id(),
            customer_id: new.customer_id.clone(),
            date: now,
            visit_type: new.visit_type,
            notes: new.notes,
            next_visit_date: new.next_visit_date,
            created_at: now,
        };
        self.visits.insert(visit.clone())?;

        let total = self
            .visits
            .all()?
            .iter()
            .filter(|v| v.customer_id == new.customer_id)
            .count() as i64;
        self.customers.update_raw(&new.customer_id, |c| {
            c.last_visit = Some(now);
            c.next_visit = new.next_visit_date;
            c.total_visits = total;
        })?;

        debug!(customer_id = %visit.customer_id, visit_type = %visit.visit_type, "recorded visit");
        Ok(visit)
    }

    /// All visits for one customer, newest first.
    pub fn for_customer(&self, customer_id: &str) -> StoreResult<Vec<Visit>> {
        let mut visits: Vec<Visit> = self
            .all()?
            .into_iter()
            .filter(|v| v.customer_id == customer_id)
            .collect();
        visits.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(visits)
    }
}
