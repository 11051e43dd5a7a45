// src/models/auth.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Usuário autenticado, como o diretório de identidade o devolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub email_verified: bool,

    // Pessoa (aluno/funcionário) que esta conta representa, se houver
    pub person_id: Option<String>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (ID do usuário)
    pub exp: usize,  // Expiration time
    pub iat: usize,  // Issued At
}
