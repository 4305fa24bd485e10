//! Controller de registros de mantenimiento

use validator::Validate;

use crate::controllers::fleet_controller::parse_item_type;
use crate::dto::common_dto::ApiResponse;
use crate::dto::maintenance_dto::CreateMaintenanceRequest;
use crate::models::maintenance::MaintenanceRecord;
use crate::models::user::UserProfile;
use crate::services::fleet_service::FleetService;
use crate::services::maintenance_service::MaintenanceService;
use crate::state::AppState;
use crate::utils::csv;
use crate::utils::errors::AppResult;

pub struct MaintenanceController {
    service: MaintenanceService,
    fleet: FleetService,
}

impl MaintenanceController {
    pub fn new(state: AppState) -> Self {
        Self {
            service: MaintenanceService::new(state.store.clone()),
            fleet: FleetService::new(state.store.clone()),
        }
    }

    pub async fn add(
        &self,
        acting: &UserProfile,
        request: CreateMaintenanceRequest,
    ) -> AppResult<ApiResponse<MaintenanceRecord>> {
        request.validate()?;
        let (draft, item_type) = request.into_draft()?;
        let saved = self.service.add_record(draft, item_type, &acting.name).await?;
        Ok(ApiResponse::success_with_message(
            saved,
            "Maintenance record stored".to_string(),
        ))
    }

    pub async fn list_for_item(&self, fleet_item_id: &str) -> AppResult<Vec<MaintenanceRecord>> {
        self.service.list_for_item(fleet_item_id).await
    }

    /// Reporte CSV del historial de un activo: detalle del activo más la
    /// tabla de trabajos
    pub async fn export_item_report(&self, kind: &str, id: &str) -> AppResult<String> {
        let item_type = parse_item_type(kind)?;
        let item = self.fleet.get_item(item_type, id).await?;
        let records = self.service.list_for_item(id).await?;
        Ok(csv::export_item_history(&item, &records, "Full History"))
    }
}
