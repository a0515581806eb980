//! Subscription gating.
//!
//! A clinic may use connected mode only while its subscription document
//! says active and the end date has not passed. The three failure modes
//! map to distinct errors so the console can tell the operator exactly
//! what to fix.

use chrono::{DateTime, Utc};

use crate::error::{SyncError, SyncResult};
use crate::remote::SubscriptionRecord;

/// Evaluates a fetched subscription record against `now`.
pub fn evaluate(record: &SubscriptionRecord, now: DateTime<Utc>) -> SyncResult<()> {
    if !record.subscription_active {
        return Err(SyncError::SubscriptionInactive);
    }
    if now > record.end_date {
        return Err(SyncError::SubscriptionExpired {
            end_date: record.end_date,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(active: bool, end: DateTime<Utc>) -> SubscriptionRecord {
        SubscriptionRecord {
            name: "City Clinic".into(),
            email: None,
            subscription_active: active,
            plan: Some("annual".into()),
            start_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            end_date: end,
        }
    }

    #[test]
    fn active_and_in_date_passes() {
        let end = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert!(evaluate(&record(true, end), now).is_ok());
    }

    #[test]
    fn end_date_itself_is_still_valid() {
        let end = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(evaluate(&record(true, end), end).is_ok());
    }

    #[test]
    fn inactive_wins_over_expiry() {
        let end = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            evaluate(&record(false, end), now).unwrap_err(),
            SyncError::SubscriptionInactive
        ));
    }

    #[test]
    fn past_end_date_is_expired() {
        let end = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            evaluate(&record(true, end), now).unwrap_err(),
            SyncError::SubscriptionExpired { .. }
        ));
    }
}
