pub mod attendance;
pub mod dashboard;
pub mod employee;
pub mod holiday;
pub mod leave;
pub mod notification;

use crate::core::clock::SystemClock;
use crate::core::service::AttendanceService;
use crate::store::MySqlStore;

/// Concrete service type wired into the actix app data.
pub type AppService = AttendanceService<MySqlStore, SystemClock>;
