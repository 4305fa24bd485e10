//! Rutas de activos de flota

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};

use crate::controllers::fleet_controller::FleetController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::fleet_dto::{
    FleetItemRequest, FleetItemResponse, FleetListQuery, ImportResult, StatusHistoryResponse,
};
use crate::models::user::UserProfile;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fleet_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_item))
        .route("/", get(list_items))
        .route("/", delete(clear_fleet))
        .route("/export", get(export_fleet))
        .route("/import", post(import_fleet))
        .route("/history/:id", get(item_history))
        .route("/:kind/:id", get(get_item))
        .route("/:kind/:id", put(update_item))
        .route("/:kind/:id", delete(delete_item))
}

async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<FleetItemRequest>,
) -> Result<Json<ApiResponse<FleetItemResponse>>, AppError> {
    let controller = FleetController::new(state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<FleetListQuery>,
) -> Result<Json<Vec<FleetItemResponse>>, AppError> {
    let controller = FleetController::new(state);
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn get_item(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<FleetItemResponse>, AppError> {
    let controller = FleetController::new(state);
    let response = controller.get(&kind, &id).await?;
    Ok(Json(response))
}

async fn update_item(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    Json(request): Json<FleetItemRequest>,
) -> Result<Json<ApiResponse<FleetItemResponse>>, AppError> {
    let controller = FleetController::new(state);
    let response = controller.update(&kind, &id, request).await?;
    Ok(Json(response))
}

async fn delete_item(
    State(state): State<AppState>,
    Extension(profile): Extension<UserProfile>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = FleetController::new(state);
    controller.delete(&profile, &kind, &id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Fleet item deleted"
    })))
}

async fn item_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<StatusHistoryResponse>>, AppError> {
    let controller = FleetController::new(state);
    let response = controller.history(&id).await?;
    Ok(Json(response))
}

async fn export_fleet(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let controller = FleetController::new(state);
    let body = controller.export().await?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body))
}

async fn import_fleet(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ApiResponse<ImportResult>>, AppError> {
    let controller = FleetController::new(state);
    let response = controller.import(&body).await?;
    Ok(Json(response))
}

async fn clear_fleet(
    State(state): State<AppState>,
    Extension(profile): Extension<UserProfile>,
) -> Result<Json<ApiResponse<usize>>, AppError> {
    let controller = FleetController::new(state);
    let response = controller.clear(&profile).await?;
    Ok(Json(response))
}
