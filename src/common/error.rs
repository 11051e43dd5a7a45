use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    services::attendance::sequence::SequenceViolation,
};

// Erro de domínio/infra usado por repositórios, serviços e middlewares.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    InvalidSequence(#[from] SequenceViolation),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // `anyhow::Error` guarda o contexto de falhas inesperadas.
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

/// Resposta de erro entregue ao cliente HTTP.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        error: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            error: error.into(),
            code,
            message: message.into(),
            details: None,
        }
    }
}

impl AppError {
    /// Código estável do tipo de erro (vai no campo `code` da resposta).
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated | AppError::JwtError(_) => "UNAUTHENTICATED",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::InvalidSequence(_) => "INVALID_SEQUENCE",
            AppError::InvalidInput(_) | AppError::ValidationError(_) => "INVALID_INPUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized(_) => StatusCode::FORBIDDEN,
            AppError::InvalidSequence(_)
            | AppError::InvalidInput(_)
            | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converte o erro numa resposta localizada. O título segue o idioma do
    /// cliente; o `message` é o motivo estável em inglês.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let code = self.code();
        let title = i18n.translate(&locale.0, code);

        match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(wire_name(&field), json!(messages));
                }
                ApiError {
                    details: Some(Value::Object(details)),
                    ..ApiError::new(self.status(), code, title, "One or more fields are invalid")
                }
            }
            AppError::JwtError(e) => {
                tracing::debug!("Token rejeitado: {}", e);
                ApiError::new(self.status(), code, title, "Invalid or missing authentication token")
            }
            // O detalhe fica só no log.
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                tracing::error!("Erro Interno do Servidor: {}", self);
                ApiError::new(self.status(), code, title, "An unexpected error occurred")
            }
            other => ApiError::new(other.status(), code, title, other.to_string()),
        }
    }
}

// Corpo ou query que não desserializa (enum desconhecido, tipo errado, campo ausente).
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

// Os payloads usam camelCase no JSON; o validator reporta o nome do campo Rust.
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::default())
            .into_response()
    }
}
