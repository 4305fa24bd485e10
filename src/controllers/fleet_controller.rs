//! Controller de activos de flota

use chrono::Utc;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::fleet_dto::{
    FleetItemRequest, FleetItemResponse, FleetListQuery, ImportResult, StatusHistoryResponse,
};
use crate::models::fleet_item::FleetType;
use crate::models::user::UserProfile;
use crate::services::fleet_service::FleetService;
use crate::services::status_session_service::StatusSessionService;
use crate::state::AppState;
use crate::utils::csv;
use crate::utils::errors::{AppError, AppResult};

pub struct FleetController {
    state: AppState,
    service: FleetService,
    sessions: StatusSessionService,
}

/// Parsea el segmento de tipo de activo de la ruta
pub fn parse_item_type(raw: &str) -> AppResult<FleetType> {
    match raw.to_uppercase().as_str() {
        "VEHICLE" | "VEHICLES" => Ok(FleetType::Vehicle),
        "EQUIPMENT" => Ok(FleetType::Equipment),
        other => Err(AppError::BadRequest(format!(
            "Unknown fleet item type '{}'",
            other
        ))),
    }
}

impl FleetController {
    pub fn new(state: AppState) -> Self {
        let service = FleetService::new(state.store.clone());
        let sessions = StatusSessionService::new(state.store.clone());
        Self {
            state,
            service,
            sessions,
        }
    }

    pub async fn create(
        &self,
        request: FleetItemRequest,
    ) -> AppResult<ApiResponse<FleetItemResponse>> {
        request.validate()?;
        let created = self.service.add_item(request.into_new_item(), Utc::now()).await?;
        let today = Utc::now().date_naive();
        Ok(ApiResponse::success_with_message(
            FleetItemResponse::from_item(created, today),
            "Fleet item created".to_string(),
        ))
    }

    pub async fn get(&self, kind: &str, id: &str) -> AppResult<FleetItemResponse> {
        let item_type = parse_item_type(kind)?;
        let item = self.service.get_item(item_type, id).await?;
        Ok(FleetItemResponse::from_item(item, Utc::now().date_naive()))
    }

    pub async fn update(
        &self,
        kind: &str,
        id: &str,
        request: FleetItemRequest,
    ) -> AppResult<ApiResponse<FleetItemResponse>> {
        request.validate()?;
        let item_type = parse_item_type(kind)?;
        let existing = self.service.get_item(item_type, id).await?;
        let updated = self
            .service
            .update_item(request.apply_to(&existing), Utc::now())
            .await?;
        Ok(ApiResponse::success_with_message(
            FleetItemResponse::from_item(updated, Utc::now().date_naive()),
            "Fleet item updated".to_string(),
        ))
    }

    pub async fn delete(&self, acting: &UserProfile, kind: &str, id: &str) -> AppResult<()> {
        let item_type = parse_item_type(kind)?;
        self.service.delete_item(acting, item_type, id).await
    }

    /// Listado desde el directorio en memoria con búsqueda y filtros
    pub async fn list(&self, query: FleetListQuery) -> AppResult<Vec<FleetItemResponse>> {
        let filter = query.to_filter();
        let today = Utc::now().date_naive();
        Ok(self
            .state
            .directory
            .list(&filter)
            .await
            .into_iter()
            .map(|item| FleetItemResponse::from_item(item, today))
            .collect())
    }

    /// Historial de sesiones de estado, la más reciente primero
    pub async fn history(&self, id: &str) -> AppResult<Vec<StatusHistoryResponse>> {
        let records = self.sessions.history_for_item(id).await?;
        Ok(records.into_iter().map(StatusHistoryResponse::from).collect())
    }

    /// Exportación CSV de toda la flota
    pub async fn export(&self) -> AppResult<String> {
        let items = self.state.directory.all().await;
        Ok(csv::export_fleet(&items))
    }

    /// Importación CSV: las filas inválidas se descartan en silencio
    pub async fn import(&self, csv_body: &str) -> AppResult<ApiResponse<ImportResult>> {
        let items = csv::parse_fleet(csv_body);
        let imported = self.service.import_items(&items).await?;
        Ok(ApiResponse::success_with_message(
            ImportResult { imported },
            format!("{} fleet items imported", imported),
        ))
    }

    /// Reset completo de la flota (solo manager)
    pub async fn clear(&self, acting: &UserProfile) -> AppResult<ApiResponse<usize>> {
        let removed = self.service.clear_fleet(acting).await?;
        Ok(ApiResponse::success_with_message(
            removed,
            format!("{} fleet items removed", removed),
        ))
    }
}
