//! Rutas de registros de mantenimiento

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::maintenance_dto::CreateMaintenanceRequest;
use crate::models::maintenance::MaintenanceRecord;
use crate::models::user::UserProfile;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_record))
        .route("/item/:id", get(list_for_item))
        .route("/report/:kind/:id", get(item_report))
}

async fn add_record(
    State(state): State<AppState>,
    Extension(profile): Extension<UserProfile>,
    Json(request): Json<CreateMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceRecord>>, AppError> {
    let controller = MaintenanceController::new(state);
    let response = controller.add(&profile, request).await?;
    Ok(Json(response))
}

async fn list_for_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MaintenanceRecord>>, AppError> {
    let controller = MaintenanceController::new(state);
    let response = controller.list_for_item(&id).await?;
    Ok(Json(response))
}

async fn item_report(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let controller = MaintenanceController::new(state);
    let body = controller.export_item_report(&kind, &id).await?;
    Ok((
        [(axum::http::header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    ))
}
