// src/models/rbac.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Escopo que vale para todos os orgs.
pub const GLOBAL_SCOPE_ID: &str = "GLOBAL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Staff,
    Teacher,
    Student,
    Parent,
    Pending,
}

impl Role {
    /// Papéis com acesso além do próprio registro, quando nada é configurado.
    pub const DEFAULT_ELEVATED: [Role; 2] = [Role::SuperAdmin, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Staff => "STAFF",
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
            Role::Parent => "PARENT",
            Role::Pending => "PENDING",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "ADMIN" => Ok(Role::Admin),
            "STAFF" => Ok(Role::Staff),
            "TEACHER" => Ok(Role::Teacher),
            "STUDENT" => Ok(Role::Student),
            "PARENT" => Ok(Role::Parent),
            "PENDING" => Ok(Role::Pending),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}
