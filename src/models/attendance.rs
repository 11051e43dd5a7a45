// src/models/attendance.rs

use std::fmt;
use std::num::NonZeroU32;

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "attendance_event_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceEventType {
    In,
    BreakStart,
    BreakEnd,
    Out,
}

impl AttendanceEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceEventType::In => "IN",
            AttendanceEventType::BreakStart => "BREAK_START",
            AttendanceEventType::BreakEnd => "BREAK_END",
            AttendanceEventType::Out => "OUT",
        }
    }
}

impl fmt::Display for AttendanceEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "attendance_summary_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Absent,
    Present,
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "attendance_week_start", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeekStart {
    Monday,
    #[default]
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Tuesday => Weekday::Tue,
            WeekStart::Wednesday => Weekday::Wed,
            WeekStart::Thursday => Weekday::Thu,
            WeekStart::Friday => Weekday::Fri,
            WeekStart::Saturday => Weekday::Sat,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}

pub const DEFAULT_PERIOD_DAYS: i32 = 7;

// --- Linhas do banco ---

/// Uma batida de ponto. Imutável depois de criada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "person_123")]
    pub person_id: String,
    pub event_type: AttendanceEventType,
    #[schema(example = "2025-01-01T08:30:00Z")]
    pub event_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSettings {
    #[schema(example = "ORG-0")]
    pub org_id: String,
    #[schema(example = 7)]
    pub period_days: i32,
    pub week_start: WeekStart,
    #[schema(example = "user_123")]
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceSettings {
    pub fn period_length(&self) -> Result<NonZeroU32, AppError> {
        u32::try_from(self.period_days)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "periodDays must be positive (got {}) for org {}",
                    self.period_days, self.org_id
                ))
            })
    }
}

/// Resumo derivado de um período. Nunca é editado diretamente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePeriodicSummary {
    pub id: Uuid,
    #[schema(example = "person_123")]
    pub person_id: String,
    #[schema(example = "ORG-0")]
    pub org_id: String,
    #[schema(example = "2025-01-07")]
    pub period_start: NaiveDate,
    #[schema(example = "2025-01-13")]
    pub period_end: NaiveDate,
    #[schema(example = 7)]
    pub period_days: i32,
    #[schema(example = 2100)]
    pub total_minutes: i32,
    pub first_in: Option<DateTime<Utc>>,
    pub last_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Entradas para o store ---

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsUpsert {
    pub org_id: String,
    pub period_days: i32,
    pub week_start: WeekStart,
    pub updated_by: Option<String>,
}

impl SettingsUpsert {
    pub fn defaults(org_id: &str) -> Self {
        Self {
            org_id: org_id.to_string(),
            period_days: DEFAULT_PERIOD_DAYS,
            week_start: WeekStart::default(),
            updated_by: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryUpsert {
    pub person_id: String,
    pub org_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub period_days: i32,
    pub total_minutes: i32,
    pub first_in: Option<DateTime<Utc>>,
    pub last_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PunchPayload {
    pub event_type: AttendanceEventType,

    /// Quando omitido, vale o instante do recebimento.
    #[schema(example = "2025-01-01T08:30:00Z")]
    pub event_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceRangeQuery {
    #[validate(length(min = 1, message = "required"))]
    #[param(example = "2025-01-01")]
    pub start_date: String,

    #[validate(length(min = 1, message = "required"))]
    #[param(example = "2025-01-07")]
    pub end_date: String,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceSummaryQuery {
    #[validate(length(min = 1, message = "required"))]
    #[param(example = "2025-01-01")]
    pub start_date: String,

    #[validate(length(min = 1, message = "required"))]
    #[param(example = "2025-01-31")]
    pub end_date: String,

    /// Pessoa alvo; sem ele vale a pessoa do próprio usuário.
    #[param(example = "person_123")]
    pub person_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceSettingsPayload {
    #[validate(range(min = 1, max = 365, message = "periodDays must be between 1 and 365"))]
    #[schema(example = 7)]
    pub period_days: i32,

    pub week_start: WeekStart,
}

// --- Respostas ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PunchResponse {
    pub event: AttendanceEvent,
    pub summary: AttendancePeriodicSummary,
}
