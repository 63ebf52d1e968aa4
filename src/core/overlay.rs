//! Leave overlay: expands a leave request into per-day entries inside a query
//! window so the calendar aggregator can merge them with attendance.

use chrono::NaiveDate;

use crate::model::attendance::AttendanceStatus;
use crate::model::leave::{LeaveRequest, LeaveStatus};

/// Day status derived from the request status.
pub fn derived_status(status: LeaveStatus) -> AttendanceStatus {
    match status {
        LeaveStatus::Approved => AttendanceStatus::OnLeave,
        LeaveStatus::Pending => AttendanceStatus::PendingLeave,
        LeaveStatus::Rejected => AttendanceStatus::LeaveRejected,
    }
}

/// One entry per calendar day of the leave clipped to `[window_start,
/// window_end]`, both ranges inclusive. Empty when the clipped range is empty.
pub fn expand_to_daily(
    leave: &LeaveRequest,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<(NaiveDate, AttendanceStatus)> {
    let start = leave.start_date.max(window_start);
    let end = leave.end_date.min(window_end);
    if start > end {
        return Vec::new();
    }

    let status = derived_status(leave.status);
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| (d, status))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::{date, leave};

    #[test]
    fn expands_one_entry_per_day_inclusive() {
        let l = leave(1, "2026-03-01", "2026-03-03", LeaveStatus::Approved);
        let days = expand_to_daily(&l, date("2026-03-01"), date("2026-03-31"));
        assert_eq!(
            days,
            vec![
                (date("2026-03-01"), AttendanceStatus::OnLeave),
                (date("2026-03-02"), AttendanceStatus::OnLeave),
                (date("2026-03-03"), AttendanceStatus::OnLeave),
            ]
        );
    }

    #[test]
    fn clips_to_the_window_on_both_ends() {
        let l = leave(1, "2026-02-27", "2026-03-02", LeaveStatus::Pending);
        let days = expand_to_daily(&l, date("2026-03-01"), date("2026-03-31"));
        assert_eq!(
            days,
            vec![
                (date("2026-03-01"), AttendanceStatus::PendingLeave),
                (date("2026-03-02"), AttendanceStatus::PendingLeave),
            ]
        );

        let tail = expand_to_daily(&l, date("2026-02-01"), date("2026-02-28"));
        assert_eq!(
            tail,
            vec![
                (date("2026-02-27"), AttendanceStatus::PendingLeave),
                (date("2026-02-28"), AttendanceStatus::PendingLeave),
            ]
        );
    }

    #[test]
    fn disjoint_leave_yields_nothing() {
        let l = leave(1, "2026-01-05", "2026-01-06", LeaveStatus::Rejected);
        assert!(expand_to_daily(&l, date("2026-03-01"), date("2026-03-31")).is_empty());
    }

    #[test]
    fn single_day_leave_is_one_entry() {
        let l = leave(1, "2026-03-10", "2026-03-10", LeaveStatus::Rejected);
        let days = expand_to_daily(&l, date("2026-03-01"), date("2026-03-31"));
        assert_eq!(days, vec![(date("2026-03-10"), AttendanceStatus::LeaveRejected)]);
    }
}
