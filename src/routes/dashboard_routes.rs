//! Rutas del dashboard y catálogos

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::controllers::fleet_controller::parse_item_type;
use crate::models::settings::MAINTENANCE_CHECKLIST;
use crate::services::fleet_directory::{CascadeOptions, CascadeSelection, DashboardStats};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(dashboard_stats))
        .route("/dashboard/filters", get(cascade_options))
        .route("/settings", get(get_settings))
}

async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(state.directory.dashboard_stats().await))
}

#[derive(Debug, Default, Deserialize)]
struct CascadeQuery {
    #[serde(rename = "type")]
    item_type: Option<String>,
    make: Option<String>,
    model: Option<String>,
}

/// Opciones de los filtros en cascada acotadas por la selección actual
async fn cascade_options(
    State(state): State<AppState>,
    Query(query): Query<CascadeQuery>,
) -> Result<Json<CascadeOptions>, AppError> {
    let item_type = match &query.item_type {
        Some(raw) if !raw.eq_ignore_ascii_case("ALL") => Some(parse_item_type(raw)?),
        _ => None,
    };
    let mut selection = CascadeSelection::default();
    selection.select_make(query.make.filter(|m| !m.eq_ignore_ascii_case("ALL")));
    if selection.make.is_some() {
        selection.select_model(query.model.filter(|m| !m.eq_ignore_ascii_case("ALL")));
    }
    Ok(Json(state.directory.cascade_options(item_type, &selection).await))
}

async fn get_settings(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "categories": state.settings.categories,
        "locations": state.settings.locations,
        "jobTypes": state.settings.job_types,
        "maintenanceChecklist": &*MAINTENANCE_CHECKLIST,
        "demoMode": state.demo_mode,
    }))
}
