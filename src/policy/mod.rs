pub mod location;
pub mod time;

use std::sync::{Arc, RwLock};

use std::collections::BTreeMap;

use chrono::NaiveDate;

pub use location::{GeoPoint, LocationPolicy};
pub use time::TimePolicy;

/// Shared handle to the process-wide time policy. Readers take a cheap `Arc`
/// clone; reloads replace the whole policy atomically instead of mutating one
/// that requests may still be reading.
#[derive(Clone)]
pub struct PolicyHandle {
    inner: Arc<RwLock<Arc<TimePolicy>>>,
}

impl PolicyHandle {
    pub fn new(policy: TimePolicy) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(policy))),
        }
    }

    pub fn current(&self) -> Arc<TimePolicy> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn replace(&self, policy: TimePolicy) {
        let next = Arc::new(policy);
        match self.inner.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Swap in a fresh holiday calendar, keeping the rest of the policy.
    /// Used after holiday administration changes.
    pub fn replace_holidays(&self, holidays: BTreeMap<NaiveDate, String>) {
        let base = self.current();
        self.replace(base.with_holidays(holidays));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn replace_holidays_keeps_base_policy() {
        let handle = PolicyHandle::new(TimePolicy::for_tests());
        let before = handle.current();

        let date = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
        let mut holidays = BTreeMap::new();
        holidays.insert(date, "Christmas Day".to_string());
        handle.replace_holidays(holidays);

        let after = handle.current();
        assert_eq!(after.holiday_title(date), Some("Christmas Day"));
        assert_eq!(after.official_start, before.official_start);
        assert_eq!(after.tz, before.tz);
        // The old Arc is untouched by the swap.
        assert_eq!(before.holiday_title(date), None);
    }
}
