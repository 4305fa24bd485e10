//! Rutas de autenticación y administración de usuarios
//!
//! Las rutas de login y bootstrap son públicas; `/me` y `/logout` resuelven
//! el token directamente del header. La administración de usuarios va
//! detrás del middleware de autenticación.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{delete, get, post},
    Extension, Json, Router,
};

use crate::controllers::user_controller::UserController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::user_dto::{BootstrapRequest, CreateUserRequest, LoginRequest, LoginResponse};
use crate::models::user::{UserProfile, UserResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/bootstrap", post(bootstrap))
        .route("/exists", get(system_has_users))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

pub fn create_user_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/:id", delete(delete_user))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = UserController::new(state);
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let token = bearer_token(&headers)?;
    let controller = UserController::new(state);
    controller.logout(token).await;
    Ok(Json(serde_json::json!({ "success": true })))
}

async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let token = bearer_token(&headers)?;
    let profile = state.auth.current_identity(token).await?;
    Ok(Json(serde_json::json!({
        "id": profile.id,
        "name": profile.name,
        "role": profile.role,
        "email": profile.email,
    })))
}

async fn system_has_users(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let exists = state.auth.system_has_users().await?;
    Ok(Json(serde_json::json!({ "hasUsers": exists })))
}

async fn bootstrap(
    State(state): State<AppState>,
    Json(request): Json<BootstrapRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state);
    let response = controller.bootstrap(request).await?;
    Ok(Json(response))
}

async fn list_users(
    State(state): State<AppState>,
    Extension(profile): Extension<UserProfile>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let controller = UserController::new(state);
    let response = controller.list_users(&profile).await?;
    Ok(Json(response))
}

async fn create_user(
    State(state): State<AppState>,
    Extension(profile): Extension<UserProfile>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state);
    let response = controller.create_user(&profile, request).await?;
    Ok(Json(response))
}

async fn delete_user(
    State(state): State<AppState>,
    Extension(profile): Extension<UserProfile>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = UserController::new(state);
    controller.delete_user(&profile, &id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "User deleted"
    })))
}
