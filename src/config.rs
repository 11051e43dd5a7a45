// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::{anyhow, Context};

use crate::{
    common::{i18n::I18nStore, timezone::AppTimeZone},
    db::{AccessControl, AttendanceStore, UserDirectory},
    models::rbac::Role,
    services::{attendance_service::AttendanceService, auth::AuthService},
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub timezone: AppTimeZone,
    pub elevated_roles: Vec<Role>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de uma função de busca, para testes sem tocar no ambiente.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            var(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| anyhow!("{} deve ser definida", key))
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse::<u16>().context("PORT inválida")?,
            None => 3000,
        };

        let db_max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse::<u32>().context("DB_MAX_CONNECTIONS inválida")?,
            None => 5,
        };

        let db_acquire_timeout = match var("DB_ACQUIRE_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim().parse::<u64>().context("DB_ACQUIRE_TIMEOUT_SECS inválida")?,
            ),
            None => Duration::from_secs(3),
        };

        let timezone = match var("APP_TIMEZONE") {
            Some(raw) => AppTimeZone::parse(&raw).map_err(|e| anyhow!(e))?,
            None => AppTimeZone::default(),
        };

        let elevated_roles = match var("HRMS_ALLOWED_ROLES") {
            Some(raw) => parse_roles(&raw)?,
            None => Role::DEFAULT_ELEVATED.to_vec(),
        };

        Ok(Self {
            database_url,
            jwt_secret,
            port,
            db_max_connections,
            db_acquire_timeout,
            timezone,
            elevated_roles,
        })
    }
}

// "SUPER_ADMIN, ADMIN" -> [SuperAdmin, Admin]; lista vazia volta ao padrão.
fn parse_roles(raw: &str) -> anyhow::Result<Vec<Role>> {
    let roles = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.parse::<Role>().map_err(|e| anyhow!(e)))
        .collect::<anyhow::Result<Vec<_>>>()
        .context("HRMS_ALLOWED_ROLES inválida")?;

    if roles.is_empty() {
        return Ok(Role::DEFAULT_ELEVATED.to_vec());
    }
    Ok(roles)
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub attendance_service: AttendanceService,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    // --- Monta o gráfico de dependências ---
    pub fn new(
        config: Config,
        store: Arc<dyn AttendanceStore>,
        access: Arc<dyn AccessControl>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        let auth_service = AuthService::new(users, config.jwt_secret.clone());
        let attendance_service = AttendanceService::new(
            store,
            access,
            config.timezone,
            config.elevated_roles.clone(),
        );

        Self {
            config: Arc::new(config),
            auth_service,
            attendance_service,
            i18n_store: Arc::new(I18nStore::default()),
        }
    }
}
