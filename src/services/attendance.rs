// src/services/attendance.rs

// Regras puras do ponto; o serviço em `attendance_service` as orquestra.
pub mod period;
pub mod range;
pub mod sequence;
pub mod summary;
