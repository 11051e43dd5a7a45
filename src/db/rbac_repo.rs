// src/db/rbac_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::error::AppError;
use crate::models::rbac::{Role, GLOBAL_SCOPE_ID};

/// Pergunta "o usuário tem algum destes papéis neste escopo?".
#[async_trait]
pub trait AccessControl: Send + Sync {
    async fn has_any_role(
        &self,
        user_id: &str,
        scope_id: &str,
        roles: &[Role],
    ) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessControl for RbacRepository {
    // Atribuições no escopo GLOBAL valem para qualquer org.
    async fn has_any_role(
        &self,
        user_id: &str,
        scope_id: &str,
        roles: &[Role],
    ) -> Result<bool, AppError> {
        if roles.is_empty() {
            return Ok(false);
        }

        let role_names: Vec<&str> = roles.iter().map(Role::as_str).collect();
        let scopes = [scope_id, GLOBAL_SCOPE_ID];

        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM role_assignments
                WHERE user_id = $1
                  AND scope_id = ANY($2)
                  AND role = ANY($3)
            )
            "#,
        )
        .bind(user_id)
        .bind(&scopes[..])
        .bind(&role_names[..])
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
