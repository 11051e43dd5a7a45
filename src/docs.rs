// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Attendance ---
        handlers::attendance::punch,
        handlers::attendance::list_events,
        handlers::attendance::list_summaries,
        handlers::attendance::list_team_summaries,
        handlers::attendance::get_settings,
        handlers::attendance::update_settings,
    ),
    components(
        schemas(
            models::attendance::AttendanceEventType,
            models::attendance::AttendanceStatus,
            models::attendance::WeekStart,
            models::attendance::AttendanceEvent,
            models::attendance::AttendanceSettings,
            models::attendance::AttendancePeriodicSummary,

            // --- Payloads ---
            models::attendance::PunchPayload,
            models::attendance::UpdateAttendanceSettingsPayload,
            models::attendance::PunchResponse,
        )
    ),
    tags(
        (name = "Attendance", description = "Batidas de ponto, resumos por período e configurações")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
