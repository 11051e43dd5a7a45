// src/db/attendance_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::attendance::{
        AttendanceEvent, AttendanceEventType, AttendancePeriodicSummary, AttendanceSettings,
        SettingsUpsert, SummaryUpsert,
    },
};

/// Operações de persistência que o serviço de ponto consome.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Última batida da pessoa (pela hora do evento, não pela inserção).
    async fn latest_event(&self, person_id: &str) -> Result<Option<AttendanceEvent>, AppError>;

    async fn insert_event(
        &self,
        person_id: &str,
        event_type: AttendanceEventType,
        event_at: DateTime<Utc>,
    ) -> Result<AttendanceEvent, AppError>;

    /// Batidas com `event_at` em `[start, end]`, em ordem crescente.
    async fn list_events(
        &self,
        person_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AttendanceEvent>, AppError>;

    async fn get_settings(&self, org_id: &str) -> Result<Option<AttendanceSettings>, AppError>;

    /// Cria a linha se ainda não existir e devolve a linha atual; nunca sobrescreve.
    async fn insert_settings_if_absent(
        &self,
        input: SettingsUpsert,
    ) -> Result<AttendanceSettings, AppError>;

    async fn upsert_settings(&self, input: SettingsUpsert) -> Result<AttendanceSettings, AppError>;

    /// Insert-or-update pela chave (person_id, org_id, period_start).
    async fn upsert_summary(
        &self,
        input: SummaryUpsert,
    ) -> Result<AttendancePeriodicSummary, AppError>;

    async fn list_summaries(
        &self,
        person_id: &str,
        org_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendancePeriodicSummary>, AppError>;

    async fn list_summaries_for_people(
        &self,
        person_ids: &[String],
        org_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendancePeriodicSummary>, AppError>;

    async fn list_direct_report_ids(
        &self,
        manager_person_id: &str,
        org_id: &str,
    ) -> Result<Vec<String>, AppError>;
}

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const EVENT_COLUMNS: &str = "id, person_id, event_type, event_at, created_at";

const SETTINGS_COLUMNS: &str =
    "org_id, period_days, week_start, updated_by, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "id, person_id, org_id, period_start, period_end, period_days, \
     total_minutes, first_in, last_out, status, created_at, updated_at";

#[async_trait]
impl AttendanceStore for AttendanceRepository {
    async fn latest_event(&self, person_id: &str) -> Result<Option<AttendanceEvent>, AppError> {
        let event = sqlx::query_as::<_, AttendanceEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM attendance_events
             WHERE person_id = $1
             ORDER BY event_at DESC, created_at DESC
             LIMIT 1"
        ))
        .bind(person_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn insert_event(
        &self,
        person_id: &str,
        event_type: AttendanceEventType,
        event_at: DateTime<Utc>,
    ) -> Result<AttendanceEvent, AppError> {
        let event = sqlx::query_as::<_, AttendanceEvent>(&format!(
            "INSERT INTO attendance_events (id, person_id, event_type, event_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(person_id)
        .bind(event_type)
        .bind(event_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    async fn list_events(
        &self,
        person_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AttendanceEvent>, AppError> {
        let events = sqlx::query_as::<_, AttendanceEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM attendance_events
             WHERE person_id = $1 AND event_at >= $2 AND event_at <= $3
             ORDER BY event_at ASC"
        ))
        .bind(person_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn get_settings(&self, org_id: &str) -> Result<Option<AttendanceSettings>, AppError> {
        let settings = sqlx::query_as::<_, AttendanceSettings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM attendance_settings WHERE org_id = $1"
        ))
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn insert_settings_if_absent(
        &self,
        input: SettingsUpsert,
    ) -> Result<AttendanceSettings, AppError> {
        // ON CONFLICT DO NOTHING não devolve linha quando já existe, então relemos.
        sqlx::query(
            "INSERT INTO attendance_settings (org_id, period_days, week_start, updated_by)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (org_id) DO NOTHING",
        )
        .bind(&input.org_id)
        .bind(input.period_days)
        .bind(input.week_start)
        .bind(&input.updated_by)
        .execute(&self.pool)
        .await?;

        self.get_settings(&input.org_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Attendance settings for org {} not found", input.org_id))
        })
    }

    async fn upsert_settings(&self, input: SettingsUpsert) -> Result<AttendanceSettings, AppError> {
        let settings = sqlx::query_as::<_, AttendanceSettings>(&format!(
            "INSERT INTO attendance_settings (org_id, period_days, week_start, updated_by)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (org_id)
             DO UPDATE SET
                 period_days = EXCLUDED.period_days,
                 week_start = EXCLUDED.week_start,
                 updated_by = EXCLUDED.updated_by,
                 updated_at = NOW()
             RETURNING {SETTINGS_COLUMNS}"
        ))
        .bind(&input.org_id)
        .bind(input.period_days)
        .bind(input.week_start)
        .bind(&input.updated_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn upsert_summary(
        &self,
        input: SummaryUpsert,
    ) -> Result<AttendancePeriodicSummary, AppError> {
        let summary = sqlx::query_as::<_, AttendancePeriodicSummary>(&format!(
            "INSERT INTO attendance_periodic_summaries (
                 id, person_id, org_id, period_start, period_end, period_days,
                 total_minutes, first_in, last_out, status
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (person_id, org_id, period_start)
             DO UPDATE SET
                 period_end = EXCLUDED.period_end,
                 period_days = EXCLUDED.period_days,
                 total_minutes = EXCLUDED.total_minutes,
                 first_in = EXCLUDED.first_in,
                 last_out = EXCLUDED.last_out,
                 status = EXCLUDED.status,
                 updated_at = NOW()
             RETURNING {SUMMARY_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&input.person_id)
        .bind(&input.org_id)
        .bind(input.period_start)
        .bind(input.period_end)
        .bind(input.period_days)
        .bind(input.total_minutes)
        .bind(input.first_in)
        .bind(input.last_out)
        .bind(input.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    async fn list_summaries(
        &self,
        person_id: &str,
        org_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendancePeriodicSummary>, AppError> {
        let summaries = sqlx::query_as::<_, AttendancePeriodicSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM attendance_periodic_summaries
             WHERE person_id = $1 AND org_id = $2
               AND period_start >= $3 AND period_start <= $4
             ORDER BY period_start ASC"
        ))
        .bind(person_id)
        .bind(org_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    async fn list_summaries_for_people(
        &self,
        person_ids: &[String],
        org_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendancePeriodicSummary>, AppError> {
        if person_ids.is_empty() {
            return Ok(Vec::new());
        }

        // O SQLx lida bem com arrays usando ANY
        let summaries = sqlx::query_as::<_, AttendancePeriodicSummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM attendance_periodic_summaries
             WHERE org_id = $1
               AND period_start >= $2 AND period_start <= $3
               AND person_id = ANY($4)
             ORDER BY period_start ASC, person_id ASC"
        ))
        .bind(org_id)
        .bind(start)
        .bind(end)
        .bind(person_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    async fn list_direct_report_ids(
        &self,
        manager_person_id: &str,
        org_id: &str,
    ) -> Result<Vec<String>, AppError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT person_id FROM employee_org_assignments
             WHERE manager_id = $1 AND org_id = $2",
        )
        .bind(manager_person_id)
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
