//! End-of-day forced checkout: closes every record that still has a check-in
//! but no check-out at the firing instant. Idempotent under re-run; the open
//! query and the guarded update both skip already-closed rows.

use tracing::warn;

use crate::core::clock::Clock;
use crate::core::resolver;
use crate::jobs::JobSummary;
use crate::policy::TimePolicy;
use crate::store::{Store, StoreError};

pub async fn run<S: Store, C: Clock>(store: &S, clock: &C, policy: &TimePolicy) -> JobSummary {
    let now = clock.now();
    let today = policy.civil_date(now);

    let open = match store.open_attendance_on(today).await {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, %today, "forced checkout could not list open records");
            return JobSummary::default();
        }
    };

    let mut summary = JobSummary {
        scanned: open.len(),
        ..JobSummary::default()
    };

    for record in open {
        // The open query already filters on check_in, but the row may have
        // changed since; skip instead of failing the batch.
        let Some(check_in) = record.check_in else {
            continue;
        };

        let total = resolver::worked_duration(check_in, now);
        match store.close_attendance(record.id, now, &total).await {
            Ok(_) => summary.applied += 1,
            // Closed by the employee (or a concurrent run) in the meantime.
            Err(StoreError::RowNotFound) => {}
            Err(e) => {
                warn!(
                    error = %e,
                    employee_id = record.employee_id,
                    record_id = record.id,
                    "forced checkout failed for one record, continuing"
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
    use crate::core::fixtures::record;
    use crate::model::attendance::AttendanceStatus;
    use crate::store::memory::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};

    fn local(h: u32, min: u32) -> DateTime<Utc> {
        chrono_tz::Asia::Kolkata
            .with_ymd_and_hms(2026, 3, 2, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();

        let mut open = record(1, "2026-03-02", AttendanceStatus::Present);
        open.id = 1;
        open.check_in = Some(local(9, 30));
        store.push_attendance(open);

        let mut closed = record(2, "2026-03-02", AttendanceStatus::Late);
        closed.id = 2;
        closed.check_in = Some(local(10, 30));
        closed.check_out = Some(local(17, 0));
        closed.total_worked = Some("6h 30m".to_string());
        store.push_attendance(closed);

        // Weekly-off record: no check-in, nothing to close.
        let mut off = record(3, "2026-03-02", AttendanceStatus::WeeklyOff);
        off.id = 3;
        store.push_attendance(off);

        store
    }

    #[tokio::test]
    async fn closes_open_records_and_leaves_the_rest_alone() {
        let store = seeded_store();
        let clock = FixedClock(local(23, 55));
        let policy = crate::policy::TimePolicy::for_tests();

        let summary = run(&store, &clock, &policy).await;
        assert_eq!(summary.scanned, 1);
        assert_eq!(summary.applied, 1);
        assert_eq!(summary.failed, 0);

        let records = store.attendance_snapshot();
        let forced = records.iter().find(|r| r.id == 1).unwrap();
        assert_eq!(forced.check_out, Some(local(23, 55)));
        assert_eq!(forced.total_worked.as_deref(), Some("14h 25m"));
        // Status is untouched by the forced close.
        assert_eq!(forced.status, AttendanceStatus::Present);

        let untouched = records.iter().find(|r| r.id == 2).unwrap();
        assert_eq!(untouched.check_out, Some(local(17, 0)));
        assert_eq!(untouched.total_worked.as_deref(), Some("6h 30m"));
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let store = seeded_store();
        let clock = FixedClock(local(23, 55));
        let policy = crate::policy::TimePolicy::for_tests();

        let first = run(&store, &clock, &policy).await;
        assert_eq!(first.applied, 1);
        let snapshot = store.attendance_snapshot();

        let second = run(&store, &clock, &policy).await;
        assert_eq!(second.scanned, 0);
        assert_eq!(second.applied, 0);
        assert_eq!(store.attendance_snapshot(), snapshot);
    }

    #[tokio::test]
    async fn one_failing_record_does_not_abort_the_run() {
        let store = seeded_store();
        store.set_fail_writes(true);
        let clock = FixedClock(local(23, 55));
        let policy = crate::policy::TimePolicy::for_tests();

        let summary = run(&store, &clock, &policy).await;
        assert_eq!(summary.scanned, 1);
        assert_eq!(summary.applied, 0);
        assert_eq!(summary.failed, 1);
    }
}
