pub mod attendance;
pub mod calendar;
pub mod employee;
pub mod holiday;
pub mod leave;
pub mod notification;
