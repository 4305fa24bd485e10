//! DTOs de autenticación y usuarios

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::{UserResponse, UserRole};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Alta del primer administrador (bootstrap de primer arranque)
#[derive(Debug, Deserialize, Validate)]
pub struct BootstrapRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

/// Alta de usuario iniciada por un manager
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    pub role: UserRole,
}
