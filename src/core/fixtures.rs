//! Shared builders for unit tests.

use chrono::NaiveDate;

use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::employee::Employee;
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType};

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn leave(
    employee_id: u64,
    start: &str,
    end: &str,
    status: LeaveStatus,
) -> LeaveRequest {
    LeaveRequest {
        id: 1,
        employee_id,
        leave_type: LeaveType::Sick,
        start_date: date(start),
        end_date: date(end),
        reason: None,
        status,
        level1_status: status,
        level2_status: status,
        rejection_reason: None,
        created_at: None,
    }
}

pub fn approved_leave(employee_id: u64, start: &str, end: &str) -> LeaveRequest {
    leave(employee_id, start, end, LeaveStatus::Approved)
}

pub fn record(employee_id: u64, day: &str, status: AttendanceStatus) -> AttendanceRecord {
    AttendanceRecord {
        id: 0,
        employee_id,
        date: date(day),
        check_in: None,
        check_out: None,
        status,
        late_time: "0h 0m".to_string(),
        total_worked: None,
        latitude: None,
        longitude: None,
    }
}

pub fn employee(id: u64, role_id: u8) -> Employee {
    Employee {
        id,
        employee_code: format!("WT-{id:04}"),
        first_name: "Test".to_string(),
        last_name: format!("Employee{id}"),
        email: format!("employee{id}@company.com"),
        role_id,
        hire_date: date("2024-01-01"),
        status: "active".to_string(),
    }
}
