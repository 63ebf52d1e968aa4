//! Calendar aggregator: merges attendance records, the leave overlay, the
//! weekly-off set and the holiday calendar into one gap-free, ascending
//! per-day timeline.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::core::overlay;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::calendar::CalendarEvent;
use crate::model::leave::{LeaveRequest, LeaveStatus};
use crate::policy::TimePolicy;

fn record_event(record: &AttendanceRecord) -> CalendarEvent {
    let title = match record.status {
        AttendanceStatus::Late => format!("Late ({})", record.late_time),
        other => other.label().to_string(),
    };
    CalendarEvent {
        date: record.date,
        title,
        status: record.status,
    }
}

/// Pure merge over already-fetched rows. Postcondition: exactly one event per
/// date in `[from, to]`, ascending.
///
/// Precedence per date: approved leave > attendance record > pending/rejected
/// leave (only where no record exists) > weekly-off > holiday > absent.
pub fn merge_window(
    policy: &TimePolicy,
    from: NaiveDate,
    to: NaiveDate,
    records: &[AttendanceRecord],
    leaves: &[LeaveRequest],
) -> Vec<CalendarEvent> {
    if from > to {
        return Vec::new();
    }

    let by_date: HashMap<NaiveDate, &AttendanceRecord> =
        records.iter().map(|r| (r.date, r)).collect();

    let mut events: BTreeMap<NaiveDate, CalendarEvent> = BTreeMap::new();

    // Approved leaves first so they win over pending/rejected ones covering
    // the same date. A leave day is emitted when no attendance record exists
    // for it, or unconditionally when the leave is approved.
    let mut ordered: Vec<&LeaveRequest> = leaves.iter().collect();
    ordered.sort_by_key(|l| (l.status != LeaveStatus::Approved, l.start_date));

    for leave in ordered {
        for (date, status) in overlay::expand_to_daily(leave, from, to) {
            if events.contains_key(&date) {
                continue;
            }
            if leave.status == LeaveStatus::Approved || !by_date.contains_key(&date) {
                events.insert(
                    date,
                    CalendarEvent {
                        date,
                        title: status.label().to_string(),
                        status,
                    },
                );
            }
        }
    }

    for record in records {
        if record.date < from || record.date > to {
            continue;
        }
        events
            .entry(record.date)
            .or_insert_with(|| record_event(record));
    }

    for date in from.iter_days().take_while(|d| *d <= to) {
        if events.contains_key(&date) {
            continue;
        }
        let event = if policy.is_weekly_off(date) {
            CalendarEvent {
                date,
                title: AttendanceStatus::WeeklyOff.label().to_string(),
                status: AttendanceStatus::WeeklyOff,
            }
        } else if let Some(title) = policy.holiday_title(date) {
            CalendarEvent {
                date,
                title: title.to_string(),
                status: AttendanceStatus::Holiday,
            }
        } else {
            CalendarEvent {
                date,
                title: AttendanceStatus::Absent.label().to_string(),
                status: AttendanceStatus::Absent,
            }
        };
        events.insert(date, event);
    }

    events.into_values().collect()
}
