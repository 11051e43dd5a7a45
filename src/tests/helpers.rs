// src/tests/helpers.rs

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use crate::{
    common::{error::AppError, timezone::AppTimeZone},
    config::{AppState, Config},
    db::{AccessControl, AttendanceStore, UserDirectory},
    models::{
        attendance::{
            AttendanceEvent, AttendanceEventType, AttendancePeriodicSummary, AttendanceSettings,
            PunchPayload, SettingsUpsert, SummaryUpsert,
        },
        auth::{Claims, User},
        rbac::{Role, GLOBAL_SCOPE_ID},
    },
    services::attendance_service::AttendanceService,
};

pub const JWT_SECRET: &str = "test-secret";
pub const ORG: &str = "ORG-0";

pub fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn user(id: &str, person_id: Option<&str>) -> User {
    User {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        email_verified: true,
        person_id: person_id.map(str::to_string),
    }
}

pub fn punch_at(event_type: AttendanceEventType, event_at: &str) -> PunchPayload {
    PunchPayload {
        event_type,
        event_at: Some(event_at.to_string()),
    }
}

// --- Store em memória ---

#[derive(Default)]
struct StoreData {
    events: Vec<AttendanceEvent>,
    settings: HashMap<String, AttendanceSettings>,
    summaries: Vec<AttendancePeriodicSummary>,
    // (manager_id, org_id, person_id)
    reports: Vec<(String, String, String)>,
}

#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<StoreData>,
    fail_summary_upsert: AtomicBool,
    people_queries: AtomicUsize,
}

impl MemoryStore {
    pub fn events(&self) -> Vec<AttendanceEvent> {
        self.data.lock().unwrap().events.clone()
    }

    pub fn summaries(&self) -> Vec<AttendancePeriodicSummary> {
        self.data.lock().unwrap().summaries.clone()
    }

    pub fn settings_count(&self) -> usize {
        self.data.lock().unwrap().settings.len()
    }

    pub fn add_report(&self, manager_id: &str, org_id: &str, person_id: &str) {
        self.data.lock().unwrap().reports.push((
            manager_id.to_string(),
            org_id.to_string(),
            person_id.to_string(),
        ));
    }

    pub fn fail_summary_upserts(&self) {
        self.fail_summary_upsert.store(true, Ordering::SeqCst);
    }

    pub fn people_queries(&self) -> usize {
        self.people_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn latest_event(&self, person_id: &str) -> Result<Option<AttendanceEvent>, AppError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .events
            .iter()
            .filter(|e| e.person_id == person_id)
            .max_by_key(|e| (e.event_at, e.created_at))
            .cloned())
    }

    async fn insert_event(
        &self,
        person_id: &str,
        event_type: AttendanceEventType,
        event_at: DateTime<Utc>,
    ) -> Result<AttendanceEvent, AppError> {
        let event = AttendanceEvent {
            id: Uuid::new_v4(),
            person_id: person_id.to_string(),
            event_type,
            event_at,
            created_at: Utc::now(),
        };
        self.data.lock().unwrap().events.push(event.clone());
        Ok(event)
    }

    async fn list_events(
        &self,
        person_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AttendanceEvent>, AppError> {
        let data = self.data.lock().unwrap();
        let mut events: Vec<_> = data
            .events
            .iter()
            .filter(|e| e.person_id == person_id && e.event_at >= start && e.event_at <= end)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.event_at);
        Ok(events)
    }

    async fn get_settings(&self, org_id: &str) -> Result<Option<AttendanceSettings>, AppError> {
        Ok(self.data.lock().unwrap().settings.get(org_id).cloned())
    }

    async fn insert_settings_if_absent(
        &self,
        input: SettingsUpsert,
    ) -> Result<AttendanceSettings, AppError> {
        let mut data = self.data.lock().unwrap();
        let now = Utc::now();
        let settings = data
            .settings
            .entry(input.org_id.clone())
            .or_insert_with(|| AttendanceSettings {
                org_id: input.org_id,
                period_days: input.period_days,
                week_start: input.week_start,
                updated_by: input.updated_by,
                created_at: now,
                updated_at: now,
            });
        Ok(settings.clone())
    }

    async fn upsert_settings(&self, input: SettingsUpsert) -> Result<AttendanceSettings, AppError> {
        let mut data = self.data.lock().unwrap();
        let now = Utc::now();
        let created_at = data
            .settings
            .get(&input.org_id)
            .map(|s| s.created_at)
            .unwrap_or(now);
        let settings = AttendanceSettings {
            org_id: input.org_id.clone(),
            period_days: input.period_days,
            week_start: input.week_start,
            updated_by: input.updated_by,
            created_at,
            updated_at: now,
        };
        data.settings.insert(input.org_id, settings.clone());
        Ok(settings)
    }

    async fn upsert_summary(
        &self,
        input: SummaryUpsert,
    ) -> Result<AttendancePeriodicSummary, AppError> {
        if self.fail_summary_upsert.load(Ordering::SeqCst) {
            return Err(AppError::InternalServerError(anyhow::anyhow!("summary store offline")));
        }

        let mut data = self.data.lock().unwrap();
        let now = Utc::now();
        let existing = data.summaries.iter_mut().find(|s| {
            s.person_id == input.person_id
                && s.org_id == input.org_id
                && s.period_start == input.period_start
        });

        let summary = match existing {
            Some(row) => {
                row.period_end = input.period_end;
                row.period_days = input.period_days;
                row.total_minutes = input.total_minutes;
                row.first_in = input.first_in;
                row.last_out = input.last_out;
                row.status = input.status;
                row.updated_at = now;
                row.clone()
            }
            None => {
                let row = AttendancePeriodicSummary {
                    id: Uuid::new_v4(),
                    person_id: input.person_id,
                    org_id: input.org_id,
                    period_start: input.period_start,
                    period_end: input.period_end,
                    period_days: input.period_days,
                    total_minutes: input.total_minutes,
                    first_in: input.first_in,
                    last_out: input.last_out,
                    status: input.status,
                    created_at: now,
                    updated_at: now,
                };
                data.summaries.push(row.clone());
                row
            }
        };
        Ok(summary)
    }

    async fn list_summaries(
        &self,
        person_id: &str,
        org_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendancePeriodicSummary>, AppError> {
        self.list_summaries_for_people(&[person_id.to_string()], org_id, start, end)
            .await
    }

    async fn list_summaries_for_people(
        &self,
        person_ids: &[String],
        org_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendancePeriodicSummary>, AppError> {
        self.people_queries.fetch_add(1, Ordering::SeqCst);
        let data = self.data.lock().unwrap();
        let mut rows: Vec<_> = data
            .summaries
            .iter()
            .filter(|s| {
                person_ids.contains(&s.person_id)
                    && s.org_id == org_id
                    && s.period_start >= start
                    && s.period_start <= end
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (a.period_start, &a.person_id).cmp(&(b.period_start, &b.person_id))
        });
        Ok(rows)
    }

    async fn list_direct_report_ids(
        &self,
        manager_person_id: &str,
        org_id: &str,
    ) -> Result<Vec<String>, AppError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .reports
            .iter()
            .filter(|(manager, org, _)| manager == manager_person_id && org == org_id)
            .map(|(_, _, person)| person.clone())
            .collect())
    }
}

// --- Papéis em memória ---

#[derive(Default)]
pub struct MemoryAccess {
    // (user_id, role, scope_id)
    assignments: Mutex<Vec<(String, Role, String)>>,
}

impl MemoryAccess {
    pub fn grant(&self, user_id: &str, role: Role, scope_id: &str) {
        self.assignments
            .lock()
            .unwrap()
            .push((user_id.to_string(), role, scope_id.to_string()));
    }
}

#[async_trait]
impl AccessControl for MemoryAccess {
    async fn has_any_role(
        &self,
        user_id: &str,
        scope_id: &str,
        roles: &[Role],
    ) -> Result<bool, AppError> {
        let assignments = self.assignments.lock().unwrap();
        Ok(assignments.iter().any(|(user, role, scope)| {
            user == user_id
                && (scope == scope_id || scope == GLOBAL_SCOPE_ID)
                && roles.contains(role)
        }))
    }
}

// --- Diretório de usuários em memória ---

#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryUsers {
    pub fn add(&self, user: User) {
        self.users.lock().unwrap().insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserDirectory for MemoryUsers {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }
}

// --- Montagem ---

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub access: Arc<MemoryAccess>,
    pub users: Arc<MemoryUsers>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            access: Arc::new(MemoryAccess::default()),
            users: Arc::new(MemoryUsers::default()),
        }
    }

    pub fn service(&self) -> AttendanceService {
        self.service_in(AppTimeZone::default())
    }

    pub fn service_in(&self, timezone: AppTimeZone) -> AttendanceService {
        AttendanceService::new(
            self.store.clone(),
            self.access.clone(),
            timezone,
            Role::DEFAULT_ELEVATED.to_vec(),
        )
    }

    pub fn app_state(&self) -> AppState {
        let config = Config::from_vars(|key: &str| match key {
            "DATABASE_URL" => Some("postgres://localhost/attendance_test".to_string()),
            "JWT_SECRET" => Some(JWT_SECRET.to_string()),
            _ => None,
        })
        .unwrap();

        AppState::new(
            config,
            self.store.clone(),
            self.access.clone(),
            self.users.clone(),
        )
    }
}

pub fn token_for(user_id: &str) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + chrono::Duration::hours(1)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_ref()),
    )
    .unwrap()
}
