// src/services/attendance_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    common::{error::AppError, timezone::AppTimeZone},
    db::{AccessControl, AttendanceStore},
    models::{
        attendance::{
            AttendanceEvent, AttendancePeriodicSummary, AttendanceRangeQuery, AttendanceSettings,
            AttendanceSummaryQuery, PunchPayload, PunchResponse, SettingsUpsert, SummaryUpsert,
            UpdateAttendanceSettingsPayload,
        },
        auth::User,
        rbac::Role,
    },
    services::attendance::{
        period::resolve_period,
        range::{parse_date_range, parse_event_at, parse_instant_range},
        sequence::validate_sequence,
        summary::{build_summary, classify_status},
    },
};

const INSUFFICIENT_PRIVILEGES: &str = "Insufficient privileges";

/// Orquestra batidas, resumos e configurações de ponto de um org.
#[derive(Clone)]
pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
    access: Arc<dyn AccessControl>,
    timezone: AppTimeZone,
    elevated_roles: Vec<Role>,
}

impl AttendanceService {
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        access: Arc<dyn AccessControl>,
        timezone: AppTimeZone,
        elevated_roles: Vec<Role>,
    ) -> Self {
        Self {
            store,
            access,
            timezone,
            elevated_roles,
        }
    }

    // --- PUNCH ---
    pub async fn punch(
        &self,
        actor: &User,
        person_id: &str,
        org_id: &str,
        payload: PunchPayload,
    ) -> Result<PunchResponse, AppError> {
        self.ensure_access(actor, person_id, org_id, false).await?;

        let event_at = parse_event_at(payload.event_at.as_deref())?;

        let last = self.store.latest_event(person_id).await?;
        if let Err(violation) = validate_sequence(last.map(|e| e.event_type), payload.event_type) {
            tracing::warn!(
                person_id,
                event_type = %payload.event_type,
                "Batida rejeitada: {}",
                violation
            );
            return Err(violation.into());
        }

        let event = self
            .store
            .insert_event(person_id, payload.event_type, event_at)
            .await?;

        tracing::info!(
            person_id,
            org_id,
            event_type = %event.event_type,
            event_at = %event.event_at,
            "Batida registrada"
        );

        // A batida já foi gravada; se o resumo falhar ela continua valendo.
        let summary = self
            .refresh_summary(person_id, org_id, event.event_at)
            .await
            .inspect_err(|e| {
                tracing::error!(person_id, org_id, "Falha ao recalcular o resumo: {}", e);
            })?;

        Ok(PunchResponse { event, summary })
    }

    /// Recalcula e grava o resumo do período que contém `instant`.
    pub async fn refresh_summary(
        &self,
        person_id: &str,
        org_id: &str,
        instant: DateTime<Utc>,
    ) -> Result<AttendancePeriodicSummary, AppError> {
        let (settings, _) = self.get_or_create_settings(org_id).await?;
        let period_days = settings.period_length()?;

        let day = self.timezone.local_date(instant);
        let period = resolve_period(day, period_days, settings.week_start)
            .ok_or_else(|| AppError::InvalidInput(format!("No period contains {}", day)))?;

        let (start, end) = self.timezone.day_bounds(period.start, period.end);
        let events = self.store.list_events(person_id, start, end).await?;

        let totals = build_summary(&events);
        let status = classify_status(totals.total_minutes, totals.first_in, totals.last_out);

        self.store
            .upsert_summary(SummaryUpsert {
                person_id: person_id.to_string(),
                org_id: org_id.to_string(),
                period_start: period.start,
                period_end: period.end,
                period_days: settings.period_days,
                total_minutes: totals.total_minutes,
                first_in: totals.first_in,
                last_out: totals.last_out,
                status,
            })
            .await
    }

    // --- LEITURAS ---
    pub async fn list_events(
        &self,
        actor: &User,
        person_id: &str,
        org_id: &str,
        range: &AttendanceRangeQuery,
    ) -> Result<Vec<AttendanceEvent>, AppError> {
        self.ensure_access(actor, person_id, org_id, true).await?;

        let (start, end) = parse_instant_range(&self.timezone, &range.start_date, &range.end_date)?;
        self.store.list_events(person_id, start, end).await
    }

    pub async fn list_summaries(
        &self,
        actor: &User,
        query: &AttendanceSummaryQuery,
        org_id: &str,
    ) -> Result<Vec<AttendancePeriodicSummary>, AppError> {
        let target = query
            .person_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .or(actor.person_id.as_deref())
            .ok_or_else(|| AppError::InvalidInput("personId is required".to_string()))?;

        self.ensure_access(actor, target, org_id, true).await?;

        let (start, end) = parse_date_range(&self.timezone, &query.start_date, &query.end_date)?;
        self.store.list_summaries(target, org_id, start, end).await
    }

    pub async fn list_team_summaries(
        &self,
        actor: &User,
        range: &AttendanceRangeQuery,
        org_id: &str,
    ) -> Result<Vec<AttendancePeriodicSummary>, AppError> {
        let manager_id = actor
            .person_id
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("User is not linked to a person".to_string()))?;

        if !self.is_elevated(actor, org_id).await? {
            return Err(AppError::Unauthorized(INSUFFICIENT_PRIVILEGES.to_string()));
        }

        let (start, end) = parse_date_range(&self.timezone, &range.start_date, &range.end_date)?;

        let reports = self.store.list_direct_report_ids(manager_id, org_id).await?;
        if reports.is_empty() {
            return Ok(Vec::new());
        }

        self.store
            .list_summaries_for_people(&reports, org_id, start, end)
            .await
    }

    // --- CONFIGURAÇÕES ---
    pub async fn get_settings(&self, org_id: &str) -> Result<AttendanceSettings, AppError> {
        let (settings, _) = self.get_or_create_settings(org_id).await?;
        Ok(settings)
    }

    /// Lê as configurações do org, criando as padrão na primeira leitura.
    /// O booleano indica se a linha acabou de ser criada.
    pub async fn get_or_create_settings(
        &self,
        org_id: &str,
    ) -> Result<(AttendanceSettings, bool), AppError> {
        if let Some(settings) = self.store.get_settings(org_id).await? {
            return Ok((settings, false));
        }

        let settings = self
            .store
            .insert_settings_if_absent(SettingsUpsert::defaults(org_id))
            .await?;
        tracing::info!(org_id, "Configurações de ponto padrão criadas");

        Ok((settings, true))
    }

    pub async fn update_settings(
        &self,
        actor: &User,
        org_id: &str,
        payload: UpdateAttendanceSettingsPayload,
    ) -> Result<AttendanceSettings, AppError> {
        payload.validate()?;

        let allowed = self
            .access
            .has_any_role(&actor.id, org_id, &[Role::SuperAdmin])
            .await?;
        if !allowed {
            return Err(AppError::Unauthorized(INSUFFICIENT_PRIVILEGES.to_string()));
        }

        let settings = self
            .store
            .upsert_settings(SettingsUpsert {
                org_id: org_id.to_string(),
                period_days: payload.period_days,
                week_start: payload.week_start,
                updated_by: Some(actor.id.clone()),
            })
            .await?;

        tracing::info!(
            org_id,
            period_days = settings.period_days,
            week_start = ?settings.week_start,
            updated_by = %actor.id,
            "Configurações de ponto atualizadas"
        );

        Ok(settings)
    }

    // --- ACESSO ---
    async fn is_elevated(&self, actor: &User, org_id: &str) -> Result<bool, AppError> {
        self.access
            .has_any_role(&actor.id, org_id, &self.elevated_roles)
            .await
    }

    /// Libera a própria pessoa e os papéis elevados; com `include_reports`,
    /// também o gestor direto do alvo.
    pub async fn ensure_access(
        &self,
        actor: &User,
        target_person_id: &str,
        org_id: &str,
        include_reports: bool,
    ) -> Result<(), AppError> {
        if actor.person_id.as_deref() == Some(target_person_id) {
            return Ok(());
        }

        if self.is_elevated(actor, org_id).await? {
            return Ok(());
        }

        if let (true, Some(manager_id)) = (include_reports, actor.person_id.as_deref()) {
            let reports = self.store.list_direct_report_ids(manager_id, org_id).await?;
            if reports.iter().any(|id| id == target_person_id) {
                return Ok(());
            }
        }

        Err(AppError::Unauthorized(INSUFFICIENT_PRIVILEGES.to_string()))
    }
}
