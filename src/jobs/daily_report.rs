//! Daily reporting: one notification per active non-administrative employee
//! with that day's resolved status; a missing record reads as absent.

use tracing::warn;

use crate::core::clock::Clock;
use crate::jobs::JobSummary;
use crate::model::attendance::AttendanceStatus;
use crate::notify::Notifier;
use crate::policy::TimePolicy;
use crate::store::Store;

pub async fn run<S: Store, C: Clock, N: Notifier>(
    store: &S,
    clock: &C,
    policy: &TimePolicy,
    notifier: &N,
) -> JobSummary {
    let today = policy.civil_date(clock.now());

    let employees = match store.active_employees().await {
        Ok(list) => list,
        Err(e) => {
            warn!(error = %e, "daily report could not list employees");
            return JobSummary::default();
        }
    };

    let mut summary = JobSummary {
        scanned: employees.len(),
        ..JobSummary::default()
    };

    for employee in employees {
        let status = match store.attendance_for_day(employee.id, today).await {
            Ok(Some(record)) => record.status,
            Ok(None) => AttendanceStatus::Absent,
            Err(e) => {
                warn!(
                    error = %e,
                    employee_id = employee.id,
                    "daily report skipped one employee, continuing"
                );
                summary.failed += 1;
                continue;
            }
        };

        let body = format!(
            "{}, your status for {today} is: {}",
            employee.full_name(),
            status.label()
        );
        match notifier.send(&employee, "Daily attendance", &body).await {
            Ok(()) => summary.applied += 1,
            Err(e) => {
                warn!(
                    error = %e,
                    employee_id = employee.id,
                    "daily report delivery failed for one employee, continuing"
                );
                summary.failed += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::fixtures::{employee, record};
    use crate::notify::memory::MemoryNotifier;
    use crate::store::memory::MemoryStore;
    use chrono::TimeZone;

    fn clock() -> FixedClock {
        FixedClock(
            chrono_tz::Asia::Kolkata
                .with_ymd_and_hms(2026, 3, 2, 20, 0, 0)
                .unwrap()
                .with_timezone(&chrono::Utc),
        )
    }

    #[tokio::test]
    async fn reports_every_non_admin_employee_once() {
        // Employee 4 is an admin and must not be reported on.
        let store = MemoryStore::with_employees(vec![
            employee(1, 3),
            employee(2, 3),
            employee(3, 2),
            employee(4, 1),
        ]);
        store.push_attendance(record(1, "2026-03-02", AttendanceStatus::Present));

        let notifier = MemoryNotifier::default();
        let policy = crate::policy::TimePolicy::for_tests();

        let summary = run(&store, &clock(), &policy, &notifier).await;
        assert_eq!(summary.scanned, 3);
        assert_eq!(summary.applied, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(notifier.sent_to(), vec![1, 2, 3]);

        let sent = notifier.sent.lock().unwrap();
        let for_one = sent.iter().find(|(id, _, _)| *id == 1).unwrap();
        assert!(for_one.2.contains("Present"));
        // Addressed to the employee by name.
        assert!(for_one.2.starts_with(&employee(1, 3).full_name()));
        // No record for employee 2 reads as absent.
        let for_two = sent.iter().find(|(id, _, _)| *id == 2).unwrap();
        assert!(for_two.2.contains("Absent"));
    }

    #[tokio::test]
    async fn one_failed_delivery_does_not_abort_the_batch() {
        let store = MemoryStore::with_employees(vec![
            employee(1, 3),
            employee(2, 3),
            employee(3, 3),
        ]);
        let notifier = MemoryNotifier::default();
        notifier.fail_for(2);
        let policy = crate::policy::TimePolicy::for_tests();

        let summary = run(&store, &clock(), &policy, &notifier).await;
        assert_eq!(summary.scanned, 3);
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(notifier.sent_to(), vec![1, 3]);
    }
}
