// src/handlers/attendance.rs

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, org::OrgContext},
    models::attendance::{
        AttendanceEvent, AttendancePeriodicSummary, AttendanceRangeQuery, AttendanceSettings,
        AttendanceSummaryQuery, PunchPayload, PunchResponse, UpdateAttendanceSettingsPayload,
    },
};

// ---
// Handler: punch
// ---
#[utoipa::path(
    post,
    path = "/attendance/punch/{person_id}",
    tag = "Attendance",
    request_body = PunchPayload,
    responses(
        (status = 201, description = "Batida registrada e resumo do período recalculado", body = PunchResponse),
        (status = 400, description = "Sequência inválida ou dados inválidos"),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Sem permissão sobre a pessoa")
    ),
    params(
        ("person_id" = String, Path, description = "ID da pessoa"),
        ("x-org-id" = String, Header, description = "ID do org")
    ),
    security(("api_jwt" = []))
)]
pub async fn punch(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    org: OrgContext,
    Path(person_id): Path<String>,
    payload: Result<Json<PunchPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) =
        payload.map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .attendance_service
        .punch(&user.0, &person_id, &org.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(response)))
}

// ---
// Handler: list_events
// ---
#[utoipa::path(
    get,
    path = "/attendance/events/{person_id}",
    tag = "Attendance",
    responses(
        (status = 200, description = "Batidas no intervalo, em ordem cronológica", body = Vec<AttendanceEvent>),
        (status = 400, description = "Intervalo inválido"),
        (status = 403, description = "Sem permissão sobre a pessoa")
    ),
    params(
        ("person_id" = String, Path, description = "ID da pessoa"),
        ("x-org-id" = String, Header, description = "ID do org"),
        AttendanceRangeQuery
    ),
    security(("api_jwt" = []))
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    org: OrgContext,
    Path(person_id): Path<String>,
    range: Result<Query<AttendanceRangeQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(range) =
        range.map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    range
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let events = app_state
        .attendance_service
        .list_events(&user.0, &person_id, &org.0, &range)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(events)))
}

// ---
// Handler: list_summaries
// ---
#[utoipa::path(
    get,
    path = "/attendance/summaries",
    tag = "Attendance",
    responses(
        (status = 200, description = "Resumos com início de período no intervalo", body = Vec<AttendancePeriodicSummary>),
        (status = 400, description = "Intervalo inválido ou pessoa ausente"),
        (status = 403, description = "Sem permissão sobre a pessoa")
    ),
    params(
        ("x-org-id" = String, Header, description = "ID do org"),
        AttendanceSummaryQuery
    ),
    security(("api_jwt" = []))
)]
pub async fn list_summaries(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    org: OrgContext,
    query: Result<Query<AttendanceSummaryQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) =
        query.map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let summaries = app_state
        .attendance_service
        .list_summaries(&user.0, &query, &org.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summaries)))
}

// ---
// Handler: list_team_summaries
// ---
#[utoipa::path(
    get,
    path = "/attendance/team-summaries",
    tag = "Attendance",
    responses(
        (status = 200, description = "Resumos dos subordinados diretos", body = Vec<AttendancePeriodicSummary>),
        (status = 403, description = "Requer papel elevado")
    ),
    params(
        ("x-org-id" = String, Header, description = "ID do org"),
        AttendanceRangeQuery
    ),
    security(("api_jwt" = []))
)]
pub async fn list_team_summaries(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    org: OrgContext,
    range: Result<Query<AttendanceRangeQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(range) =
        range.map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    range
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let summaries = app_state
        .attendance_service
        .list_team_summaries(&user.0, &range, &org.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summaries)))
}

// ---
// Handler: get_settings
// ---
#[utoipa::path(
    get,
    path = "/attendance/settings",
    tag = "Attendance",
    responses(
        (status = 200, description = "Configurações de ponto do org (criadas com o padrão se ausentes)", body = AttendanceSettings)
    ),
    params(
        ("x-org-id" = String, Header, description = "ID do org")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    org: OrgContext,
) -> Result<impl IntoResponse, ApiError> {
    let settings = app_state
        .attendance_service
        .get_settings(&org.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(settings)))
}

// ---
// Handler: update_settings
// ---
#[utoipa::path(
    patch,
    path = "/attendance/settings",
    tag = "Attendance",
    request_body = UpdateAttendanceSettingsPayload,
    responses(
        (status = 200, description = "Configurações atualizadas", body = AttendanceSettings),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Requer SUPER_ADMIN")
    ),
    params(
        ("x-org-id" = String, Header, description = "ID do org")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    org: OrgContext,
    payload: Result<Json<UpdateAttendanceSettingsPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) =
        payload.map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    let settings = app_state
        .attendance_service
        .update_settings(&user.0, &org.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(settings)))
}
