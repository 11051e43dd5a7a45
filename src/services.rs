pub mod attendance;
pub mod attendance_service;
pub mod auth;
