//! Orchestration around the pure resolver: fetch inputs, apply precedence,
//! persist the outcome. One store call per step, no cross-request state.

use serde::Serialize;
use tracing::info;

use chrono::NaiveDate;

use crate::core::calendar;
use crate::core::clock::Clock;
use crate::core::resolver::{self, CheckInPlan};
use crate::error::CoreError;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::calendar::CalendarEvent;
use crate::model::leave::LeaveRequest;
use crate::policy::{GeoPoint, LocationPolicy, PolicyHandle};
use crate::store::{Store, StoreError};

/// Tagged result of a check-in attempt; expected branches are values, not
/// errors.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CheckInOutcome {
    Created { record: AttendanceRecord },
    AlreadyMarked { record: AttendanceRecord },
    OnLeave { leave: LeaveRequest },
    WeeklyOff { record: AttendanceRecord },
}

pub struct AttendanceService<S, C> {
    store: S,
    clock: C,
    policy: PolicyHandle,
    location: LocationPolicy,
}

impl<S: Store, C: Clock> AttendanceService<S, C> {
    pub fn new(store: S, clock: C, policy: PolicyHandle, location: LocationPolicy) -> Self {
        Self {
            store,
            clock,
            policy,
            location,
        }
    }

    pub fn policy(&self) -> &PolicyHandle {
        &self.policy
    }

    pub async fn check_in(
        &self,
        employee_id: u64,
        position: Option<GeoPoint>,
    ) -> Result<CheckInOutcome, CoreError> {
        // Fails closed before any record is touched.
        self.location.check(position)?;

        let policy = self.policy.current();
        let now = self.clock.now();
        let date = policy.civil_date(now);

        let existing = self.store.attendance_for_day(employee_id, date).await?;
        let leave = self.store.approved_leave_covering(employee_id, date).await?;

        let plan = resolver::resolve_check_in(employee_id, now, &policy, existing, leave, position);

        match plan {
            CheckInPlan::AlreadyMarked(record) => Ok(CheckInOutcome::AlreadyMarked { record }),
            CheckInPlan::OnLeave(leave) => Ok(CheckInOutcome::OnLeave { leave }),
            CheckInPlan::Insert(new) => {
                let weekly_off = new.status == AttendanceStatus::WeeklyOff;
                match self.store.insert_attendance(new).await {
                    Ok(record) => {
                        info!(employee_id, %date, status = %record.status, "check-in recorded");
                        if weekly_off {
                            Ok(CheckInOutcome::WeeklyOff { record })
                        } else {
                            Ok(CheckInOutcome::Created { record })
                        }
                    }
                    // Lost a simultaneous check-in race; the unique key kept a
                    // single record alive, return that one.
                    Err(StoreError::Duplicate) => {
                        let record = self
                            .store
                            .attendance_for_day(employee_id, date)
                            .await?
                            .ok_or_else(|| {
                                CoreError::Conflict("Check-in raced and no record survived".into())
                            })?;
                        Ok(CheckInOutcome::AlreadyMarked { record })
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    pub async fn check_out(&self, employee_id: u64) -> Result<AttendanceRecord, CoreError> {
        let policy = self.policy.current();
        let now = self.clock.now();
        let date = policy.civil_date(now);

        let record = self
            .store
            .attendance_for_day(employee_id, date)
            .await?
            .ok_or_else(|| CoreError::NotFound("No check-in record found for today".into()))?;

        if record.is_closed() {
            return Err(CoreError::Conflict("You have already checked out today".into()));
        }

        let check_in = record.check_in.ok_or_else(|| {
            CoreError::NotFound("No check-in recorded for today".into())
        })?;

        let total = resolver::worked_duration(check_in, now);
        let closed = match self.store.close_attendance(record.id, now, &total).await {
            Ok(rec) => rec,
            // Another check-out landed between our read and the update.
            Err(StoreError::RowNotFound) => {
                return Err(CoreError::Conflict("You have already checked out today".into()));
            }
            Err(e) => return Err(e.into()),
        };

        info!(employee_id, %date, total_worked = %total, "check-out recorded");
        Ok(closed)
    }

    /// Merged per-day timeline for `[from, to]`, one event per date.
    pub async fn timeline(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, CoreError> {
        if from > to {
            return Err(CoreError::Validation(
                "Window start must not be after window end".into(),
            ));
        }

        let policy = self.policy.current();
        let records = self.store.attendance_in_window(employee_id, from, to).await?;
        let leaves = self.store.leaves_overlapping(employee_id, from, to).await?;

        Ok(calendar::merge_window(&policy, from, to, &records, &leaves))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::fixtures::{approved_leave, date, record};
    use crate::policy::TimePolicy;
    use chrono::TimeZone;
    use chrono::{DateTime, Utc};

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        chrono_tz::Asia::Kolkata
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn service_at(
        now: DateTime<Utc>,
    ) -> AttendanceService<crate::store::memory::MemoryStore, FixedClock> {
        AttendanceService::new(
            crate::store::memory::MemoryStore::new(),
            FixedClock(now),
            PolicyHandle::new(TimePolicy::for_tests()),
            open_location(),
        )
    }

    #[tokio::test]
    async fn late_check_in_scenario_ten_oh_five() {
        let svc = service_at(local(2026, 3, 2, 10, 5));
        let outcome = svc.check_in(1, None).await.unwrap();
        match outcome {
            CheckInOutcome::Created { record } => {
                assert_eq!(record.status, AttendanceStatus::Late);
                assert_eq!(record.late_time, "0h 5m");
            }
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn second_check_in_returns_first_record_unchanged() {
        let svc = service_at(local(2026, 3, 2, 9, 30));
        let first = match svc.check_in(1, None).await.unwrap() {
            CheckInOutcome::Created { record } => record,
            other => panic!("expected Created, got {other:?}"),
        };
        match svc.check_in(1, None).await.unwrap() {
            CheckInOutcome::AlreadyMarked { record } => {
                assert_eq!(record.id, first.id);
                assert_eq!(record.check_in, first.check_in);
                assert_eq!(record.status, first.status);
            }
            other => panic!("expected AlreadyMarked, got {other:?}"),
        }
    }

    fn open_location() -> LocationPolicy {
        LocationPolicy {
            office: GeoPoint {
                latitude: 23.8103,
                longitude: 90.4125,
            },
            radius_m: 1_000.0,
            enabled: false,
        }
    }

    #[tokio::test]
    async fn check_in_on_approved_leave_creates_no_record() {
        let store = crate::store::memory::MemoryStore::new();
        store.push_leave(approved_leave(1, "2026-03-01", "2026-03-03"));
        let svc = AttendanceService::new(
            store,
            FixedClock(local(2026, 3, 2, 9, 30)),
            PolicyHandle::new(TimePolicy::for_tests()),
            open_location(),
        );

        match svc.check_in(1, None).await.unwrap() {
            CheckInOutcome::OnLeave { leave } => assert_eq!(leave.employee_id, 1),
            other => panic!("expected OnLeave, got {other:?}"),
        }
        assert!(svc.store.attendance_snapshot().is_empty());
    }

    #[tokio::test]
    async fn check_out_without_check_in_is_not_found() {
        let svc = service_at(local(2026, 3, 2, 18, 0));
        assert!(matches!(
            svc.check_out(1).await,
            Err(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn double_check_out_is_a_conflict() {
        let store = crate::store::memory::MemoryStore::new();
        let mut rec = record(1, "2026-03-02", AttendanceStatus::Late);
        rec.id = 1;
        rec.check_in = Some(local(2026, 3, 2, 10, 5));
        store.push_attendance(rec);
        let svc = AttendanceService::new(
            store,
            FixedClock(local(2026, 3, 2, 18, 30)),
            PolicyHandle::new(TimePolicy::for_tests()),
            open_location(),
        );

        let closed = svc.check_out(1).await.unwrap();
        assert_eq!(closed.total_worked.as_deref(), Some("8h 25m"));

        assert!(matches!(
            svc.check_out(1).await,
            Err(CoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn check_in_requires_location_when_gate_enabled() {
        let store = crate::store::memory::MemoryStore::new();
        let location = LocationPolicy {
            office: GeoPoint {
                latitude: 23.8103,
                longitude: 90.4125,
            },
            radius_m: 1_000.0,
            enabled: true,
        };
        let svc = AttendanceService::new(
            store,
            FixedClock(local(2026, 3, 2, 9, 30)),
            PolicyHandle::new(TimePolicy::for_tests()),
            location,
        );

        assert!(matches!(
            svc.check_in(1, None).await,
            Err(CoreError::Validation(_))
        ));
        // Nothing persisted by the rejected attempt.
        assert!(svc.store.attendance_snapshot().is_empty());

        let far = GeoPoint {
            latitude: 24.9,
            longitude: 91.9,
        };
        assert!(matches!(
            svc.check_in(1, Some(far)).await,
            Err(CoreError::Policy(_))
        ));
    }

    #[tokio::test]
    async fn march_timeline_shows_three_on_leave_days() {
        let store = crate::store::memory::MemoryStore::new();
        store.push_leave(approved_leave(1, "2026-03-01", "2026-03-03"));
        // A stray attendance record inside the leave window must not surface.
        let mut stray = record(1, "2026-03-02", AttendanceStatus::Present);
        stray.id = 9;
        store.push_attendance(stray);

        let svc = AttendanceService::new(
            store,
            FixedClock(local(2026, 3, 20, 12, 0)),
            PolicyHandle::new(TimePolicy::for_tests()),
            open_location(),
        );

        let events = svc
            .timeline(1, date("2026-03-01"), date("2026-03-31"))
            .await
            .unwrap();

        assert_eq!(events.len(), 31);
        let on_leave: Vec<_> = events
            .iter()
            .filter(|e| e.status == AttendanceStatus::OnLeave)
            .collect();
        assert_eq!(on_leave.len(), 3);
        assert!(
            !events
                .iter()
                .any(|e| e.status == AttendanceStatus::Present),
            "stray attendance must be overridden by the approved leave"
        );
    }

    #[tokio::test]
    async fn inverted_window_is_a_validation_error() {
        let svc = service_at(local(2026, 3, 2, 9, 0));
        assert!(matches!(
            svc.timeline(1, date("2026-03-31"), date("2026-03-01")).await,
            Err(CoreError::Validation(_))
        ));
    }
}
