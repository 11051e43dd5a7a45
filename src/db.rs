pub mod attendance_repo;
pub use attendance_repo::{AttendanceRepository, AttendanceStore};
pub mod rbac_repo;
pub use rbac_repo::{AccessControl, RbacRepository};
pub mod user_repo;
pub use user_repo::{UserDirectory, UserRepository};
