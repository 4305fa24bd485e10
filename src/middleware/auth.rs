//! Middleware de autenticación
//!
//! Extrae el token Bearer del header Authorization, lo verifica contra el
//! servicio de identidad y deja el perfil del usuario actuante disponible
//! en las extensions de la request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::models::user::UserProfile;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Middleware de autenticación Bearer
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    // La identidad y su rol se resuelven contra el almacén en cada request
    let profile: UserProfile = state.auth.current_identity(token).await?;
    request.extensions_mut().insert(profile);

    Ok(next.run(request).await)
}
