//! DTOs de registros de mantenimiento

use serde::Deserialize;
use validator::Validate;

use crate::models::fleet_item::FleetType;
use crate::models::maintenance::{MaintenanceRecord, MaintenanceType};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_date;

/// Request para registrar un trabajo de mantenimiento o reparación.
///
/// `totalCost` no se acepta del cliente: lo calcula siempre el servicio.
/// `createdBy` tampoco: se toma de la identidad actuante.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceRequest {
    #[validate(length(min = 1))]
    pub fleet_item_id: String,

    /// Tipo del activo dueño del registro (resuelve la colección)
    pub item_type: FleetType,

    /// Fecha del trabajo, formato YYYY-MM-DD
    #[validate(length(min = 1))]
    pub date: String,

    #[validate(range(min = 0.0))]
    pub meter_reading: f64,

    #[serde(rename = "type")]
    pub record_type: MaintenanceType,

    #[validate(length(min = 1, max = 500))]
    pub description: String,

    pub complaint: Option<String>,

    #[serde(default)]
    pub parts: String,

    #[serde(default)]
    pub maintenance_items: Vec<String>,

    #[validate(range(min = 0.0))]
    pub labor_cost: f64,

    #[validate(range(min = 0.0))]
    pub parts_cost: f64,

    pub technician: Option<String>,

    #[serde(default)]
    pub attachments: Vec<String>,
}

impl CreateMaintenanceRequest {
    /// Materializa el borrador del registro; los campos calculados quedan a
    /// cargo del servicio
    pub fn into_draft(self) -> AppResult<(MaintenanceRecord, FleetType)> {
        let date = validate_date(&self.date)
            .map_err(|_| AppError::BadRequest(format!("Invalid date '{}'", self.date)))?;

        let record = MaintenanceRecord {
            id: String::new(),
            fleet_item_id: self.fleet_item_id,
            date,
            meter_reading: self.meter_reading,
            record_type: self.record_type,
            description: self.description,
            complaint: self.complaint.filter(|c| !c.trim().is_empty()),
            parts: self.parts,
            maintenance_items: self.maintenance_items,
            labor_cost: self.labor_cost,
            parts_cost: self.parts_cost,
            total_cost: 0.0,
            next_due_meter: None,
            next_due_date: None,
            technician: self.technician.filter(|t| !t.trim().is_empty()),
            created_by: None,
            attachments: self.attachments,
        };
        Ok((record, self.item_type))
    }
}
