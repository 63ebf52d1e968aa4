//! Pure attendance status resolution. No I/O here: the service layer fetches
//! the day's record and leave, calls into these functions, and persists the
//! returned plan.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::model::attendance::{AttendanceRecord, AttendanceStatus, NewAttendance};
use crate::model::leave::LeaveRequest;
use crate::policy::{GeoPoint, TimePolicy};

/// Whole minutes as "{h}h {m}m".
pub fn format_minutes(minutes: i64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// What a check-in attempt should do, decided before any write.
#[derive(Debug)]
pub enum CheckInPlan {
    /// A record already exists for today; return it unchanged.
    AlreadyMarked(AttendanceRecord),
    /// An approved leave covers today; leave is the source of truth for the
    /// day and no attendance record is created.
    OnLeave(LeaveRequest),
    /// Persist a new record (weekly-off, present or late).
    Insert(NewAttendance),
}

/// Check-in precedence, first match wins:
/// 1. existing record for today (idempotent),
/// 2. approved leave covering today,
/// 3. weekly-off day,
/// 4. present / late against the official start instant.
pub fn resolve_check_in(
    employee_id: u64,
    now: DateTime<Utc>,
    policy: &TimePolicy,
    existing: Option<AttendanceRecord>,
    approved_leave: Option<LeaveRequest>,
    position: Option<GeoPoint>,
) -> CheckInPlan {
    if let Some(record) = existing {
        return CheckInPlan::AlreadyMarked(record);
    }

    if let Some(leave) = approved_leave {
        return CheckInPlan::OnLeave(leave);
    }

    let date = policy.civil_date(now);
    let (latitude, longitude) = match position {
        Some(p) => (Some(p.latitude), Some(p.longitude)),
        None => (None, None),
    };

    if policy.is_weekly_off(date) {
        return CheckInPlan::Insert(NewAttendance {
            employee_id,
            date,
            check_in: None,
            status: AttendanceStatus::WeeklyOff,
            late_time: format_minutes(0),
            latitude,
            longitude,
        });
    }

    let official_start = policy.official_start_on(date);
    let (status, late_minutes) = if now <= official_start {
        (AttendanceStatus::Present, 0)
    } else {
        (
            AttendanceStatus::Late,
            (now - official_start).num_minutes(),
        )
    };

    CheckInPlan::Insert(NewAttendance {
        employee_id,
        date,
        check_in: Some(now),
        status,
        late_time: format_minutes(late_minutes),
        latitude,
        longitude,
    })
}

/// Worked duration between check-in and check-out in whole minutes, clamped to
/// zero when the clock ran backwards. The clamp is logged so skewed records
/// can be audited.
pub fn worked_duration(
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
) -> String {
    let minutes = (check_out - check_in).num_minutes();
    if minutes < 0 {
        warn!(
            %check_in,
            %check_out,
            "check-out precedes check-in, clamping worked duration to zero"
        );
        return format_minutes(0);
    }
    format_minutes(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn policy() -> TimePolicy {
        TimePolicy::for_tests()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        policy()
            .tz
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn existing_record() -> AttendanceRecord {
        AttendanceRecord {
            id: 7,
            employee_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            check_in: Some(local(2026, 3, 2, 9, 45)),
            check_out: None,
            status: AttendanceStatus::Present,
            late_time: "0h 0m".to_string(),
            total_worked: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn existing_record_wins_over_everything() {
        let leave = crate::core::fixtures::approved_leave(1, "2026-03-02", "2026-03-02");
        let plan = resolve_check_in(
            1,
            local(2026, 3, 2, 11, 0),
            &policy(),
            Some(existing_record()),
            Some(leave),
            None,
        );
        match plan {
            CheckInPlan::AlreadyMarked(rec) => assert_eq!(rec.id, 7),
            other => panic!("expected AlreadyMarked, got {other:?}"),
        }
    }

    #[test]
    fn approved_leave_short_circuits_record_creation() {
        let leave = crate::core::fixtures::approved_leave(1, "2026-03-02", "2026-03-04");
        let plan = resolve_check_in(1, local(2026, 3, 2, 9, 0), &policy(), None, Some(leave), None);
        assert!(matches!(plan, CheckInPlan::OnLeave(_)));
    }

    #[test]
    fn weekly_off_creates_record_without_check_in() {
        // 2026-03-01 is a Sunday.
        let plan = resolve_check_in(1, local(2026, 3, 1, 9, 0), &policy(), None, None, None);
        match plan {
            CheckInPlan::Insert(new) => {
                assert_eq!(new.status, AttendanceStatus::WeeklyOff);
                assert!(new.check_in.is_none());
            }
            other => panic!("expected Insert, got {other:?}"),
        }
    }

    #[test]
    fn exactly_on_time_is_present_not_late() {
        let plan = resolve_check_in(1, local(2026, 3, 2, 10, 0), &policy(), None, None, None);
        match plan {
            CheckInPlan::Insert(new) => {
                assert_eq!(new.status, AttendanceStatus::Present);
                assert_eq!(new.late_time, "0h 0m");
                assert_eq!(new.check_in, Some(local(2026, 3, 2, 10, 0)));
            }
            other => panic!("expected Insert, got {other:?}"),
        }
    }

    #[test]
    fn one_minute_after_start_is_late_by_one_minute() {
        let plan = resolve_check_in(1, local(2026, 3, 2, 10, 1), &policy(), None, None, None);
        match plan {
            CheckInPlan::Insert(new) => {
                assert_eq!(new.status, AttendanceStatus::Late);
                assert_eq!(new.late_time, "0h 1m");
            }
            other => panic!("expected Insert, got {other:?}"),
        }
    }

    #[test]
    fn late_minutes_roll_into_hours() {
        let plan = resolve_check_in(1, local(2026, 3, 2, 11, 35), &policy(), None, None, None);
        match plan {
            CheckInPlan::Insert(new) => assert_eq!(new.late_time, "1h 35m"),
            other => panic!("expected Insert, got {other:?}"),
        }
    }

    #[test]
    fn position_is_carried_onto_the_record() {
        let pos = GeoPoint {
            latitude: 23.8,
            longitude: 90.4,
        };
        let plan = resolve_check_in(1, local(2026, 3, 2, 9, 0), &policy(), None, None, Some(pos));
        match plan {
            CheckInPlan::Insert(new) => {
                assert_eq!(new.latitude, Some(23.8));
                assert_eq!(new.longitude, Some(90.4));
            }
            other => panic!("expected Insert, got {other:?}"),
        }
    }

    #[test]
    fn worked_duration_floors_to_whole_minutes() {
        let check_in = local(2026, 3, 2, 10, 5);
        let check_out = local(2026, 3, 2, 18, 30) + chrono::Duration::seconds(59);
        assert_eq!(worked_duration(check_in, check_out), "8h 25m");
    }

    #[test]
    fn backwards_clock_clamps_to_zero() {
        let check_in = local(2026, 3, 2, 10, 0);
        let check_out = local(2026, 3, 2, 9, 30);
        assert_eq!(worked_duration(check_in, check_out), "0h 0m");
    }

    #[test]
    fn format_minutes_splits_hours_and_minutes() {
        assert_eq!(format_minutes(0), "0h 0m");
        assert_eq!(format_minutes(5), "0h 5m");
        assert_eq!(format_minutes(505), "8h 25m");
    }
}
