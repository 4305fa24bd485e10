//! Modelo de User
//!
//! Este módulo contiene los structs de usuario del sistema: el documento
//! persistido y el perfil de la identidad actuante que inyecta el
//! middleware de autenticación.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rol del usuario - modelo de dos roles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Manager,
    Staff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Manager => "manager",
            UserRole::Staff => "staff",
        }
    }
}

/// Documento de usuario persistido en la colección `users`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    /// Hash bcrypt; nunca se expone en respuestas de la API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

/// Identidad actuante resuelta por el middleware de autenticación
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    pub email: String,
}

impl From<&UserDocument> for UserProfile {
    fn from(doc: &UserDocument) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.name.clone(),
            role: doc.role,
            email: doc.email.clone(),
        }
    }
}

/// Respuesta de usuario para la API (sin credenciales)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<UserDocument> for UserResponse {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            email: doc.email,
            role: doc.role,
            created_at: doc.created_at,
        }
    }
}
