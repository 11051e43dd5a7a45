//src/main.rs

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

#[cfg(test)]
mod tests;

use crate::config::{AppState, Config};
use crate::db::{AttendanceRepository, RbacRepository, UserRepository};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

/// Monta o router completo sobre um `AppState` já pronto.
pub fn build_router(app_state: AppState) -> Router {
    let attendance_routes = Router::new()
        .route("/punch/{person_id}", post(handlers::attendance::punch))
        .route("/events/{person_id}", get(handlers::attendance::list_events))
        .route("/summaries", get(handlers::attendance::list_summaries))
        .route("/team-summaries", get(handlers::attendance::list_team_summaries))
        .route(
            "/settings",
            get(handlers::attendance::get_settings).patch(handlers::attendance::update_settings),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/attendance", attendance_routes)
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Falha ao carregar a configuração")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_acquire_timeout)
        .connect(&config.database_url)
        .await
        .context("Falha ao conectar ao banco de dados")?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app_state = AppState::new(
        config,
        Arc::new(AttendanceRepository::new(db_pool.clone())),
        Arc::new(RbacRepository::new(db_pool.clone())),
        Arc::new(UserRepository::new(db_pool)),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], app_state.config.port));
    let app = build_router(app_state);

    let listener = TcpListener::bind(addr)
        .await
        .context("Falha ao iniciar o listener TCP")?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}
