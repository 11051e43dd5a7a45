// src/services/auth.rs

use std::sync::Arc;

use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::{
    common::error::AppError,
    db::UserDirectory,
    models::auth::{Claims, User},
};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserDirectory>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserDirectory>, jwt_secret: String) -> Self {
        Self { users, jwt_secret }
    }

    /// Valida o JWT (HS256, `exp` conferido) e carrega o usuário do `sub`.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )?;

        self.users
            .find_by_id(&token_data.claims.sub)
            .await?
            .ok_or(AppError::Unauthenticated)
    }
}
