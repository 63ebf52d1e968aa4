use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

use crate::api::attendance::CheckInRequest;
use crate::api::employee::{CreateEmployee, UpdateStatus};
use crate::api::holiday::CreateHoliday;
use crate::api::leave::{CreateLeave, LeaveFilter, LeaveListResponse, RejectLeave};
use crate::auth::LoginRequest;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::calendar::CalendarEvent;
use crate::model::employee::Employee;
use crate::model::holiday::{Holiday, HolidayKind};
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::notification::Notification;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Worktrack API",
        version = "1.0.0",
        description = r#"
Attendance tracking service: daily check-in/check-out with an optional
office-location gate, leave requests with approval workflow, holiday
administration and a merged per-day attendance calendar.

Most endpoints are protected with JWT Bearer authentication; HR/Admin roles
gate the administrative operations.
"#,
    ),
    paths(
        crate::auth::login,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::calendar,
        crate::api::attendance::today,

        crate::api::leave::create_leave,
        crate::api::leave::approve_leave,
        crate::api::leave::reject_leave,
        crate::api::leave::get_leave,
        crate::api::leave::leave_list,
        crate::api::leave::my_leaves,

        crate::api::holiday::list_holidays,
        crate::api::holiday::create_holiday,
        crate::api::holiday::delete_holiday,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_status,

        crate::api::dashboard::analytics,
        crate::api::notification::my_notifications,
    ),
    components(
        schemas(
            LoginRequest,
            CheckInRequest,
            AttendanceRecord,
            AttendanceStatus,
            CalendarEvent,
            CreateLeave,
            RejectLeave,
            LeaveFilter,
            LeaveListResponse,
            LeaveRequest,
            LeaveStatus,
            LeaveType,
            CreateHoliday,
            Holiday,
            HolidayKind,
            CreateEmployee,
            UpdateStatus,
            Employee,
            Notification
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication"),
        (name = "Attendance", description = "Check-in, check-out and the merged calendar"),
        (name = "Leave", description = "Leave requests and approval workflow"),
        (name = "Holiday", description = "Holiday calendar administration"),
        (name = "Employee", description = "Employee administration"),
        (name = "Dashboard", description = "Aggregate analytics"),
        (name = "Notification", description = "Per-employee notification inbox"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
