//! Libro de registros de mantenimiento
//!
//! Agrega eventos de servicio/reparación y propaga su efecto sobre el
//! activo: lectura del contador, fecha del último servicio y proyecciones
//! de próximo vencimiento. El alta del registro y la actualización del
//! activo se tratan como un solo efecto lógico; si la actualización falla
//! después del alta, el registro queda y la caché del activo queda
//! desactualizada (PartialWrite, sin rollback).

use std::sync::Arc;

use serde_json::json;

use crate::models::fleet_item::{FleetItem, FleetType};
use crate::models::maintenance::{
    next_due_date_after, next_due_meter_increment, MaintenanceRecord,
};
use crate::repositories::fleet_repository::FleetRepository;
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::storage::DocumentStore;
use crate::utils::errors::{AppError, AppResult};

pub struct MaintenanceService {
    records: MaintenanceRepository,
    fleet: FleetRepository,
}

impl MaintenanceService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            records: MaintenanceRepository::new(Arc::clone(&store)),
            fleet: FleetRepository::new(store),
        }
    }

    /// Agrega un registro de mantenimiento y actualiza el activo.
    ///
    /// - `total_cost` se recalcula siempre; el valor del llamador se descarta.
    /// - Los registros que no son reparación reciben próximos vencimientos
    ///   (contador +10000 km en vehículos, +500 hrs en equipos; fecha +1 año).
    /// - `complaint` solo se persiste en reparaciones.
    /// - `created_by` es el nombre del usuario actuante, nunca el campo
    ///   `technician` editable.
    pub async fn add_record(
        &self,
        mut record: MaintenanceRecord,
        item_type: FleetType,
        acting_user_name: &str,
    ) -> AppResult<MaintenanceRecord> {
        record.total_cost = record.labor_cost + record.parts_cost;
        record.created_by = Some(acting_user_name.to_string());

        if record.record_type.is_repair() {
            record.next_due_meter = None;
            record.next_due_date = None;
        } else {
            record.complaint = None;
            record.next_due_meter =
                Some(record.meter_reading + next_due_meter_increment(item_type));
            record.next_due_date = Some(next_due_date_after(record.date));
        }

        let record_id = self.records.append(&record).await?;
        record.id = record_id;

        // La lectura del registro pasa a ser el contador actual del activo,
        // aun si retrocede respecto del valor vigente.
        let mut updates = serde_json::Map::new();
        updates.insert("currentMeter".to_string(), json!(record.meter_reading));
        if !record.record_type.is_repair() {
            updates.insert("lastServiceDate".to_string(), json!(record.date));
            updates.insert("nextServiceDate".to_string(), json!(record.next_due_date));
            updates.insert("nextServiceMeter".to_string(), json!(record.next_due_meter));
        }

        self.fleet
            .update_fields(
                item_type,
                &record.fleet_item_id,
                serde_json::Value::Object(updates),
            )
            .await
            .map_err(|e| {
                AppError::PartialWrite(format!(
                    "Maintenance record '{}' stored but fleet item '{}' was not updated: {}",
                    record.id, record.fleet_item_id, e
                ))
            })?;

        Ok(record)
    }

    /// Historial de mantenimiento de un activo, el más reciente primero
    pub async fn list_for_item(&self, fleet_item_id: &str) -> AppResult<Vec<MaintenanceRecord>> {
        self.records.list_by_item(fleet_item_id).await
    }
}

/// Estado de vencimiento de servicio derivado de la caché del activo
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceDueStatus {
    Ok,
    DueSoon,
    Overdue,
}

/// Deriva el estado de vencimiento desde los campos de caché del activo.
/// La caché nunca es autoritativa: ante sospecha de datos viejos se debe
/// recalcular desde el libro de mantenimiento.
pub fn service_due_status(item: &FleetItem, today: chrono::NaiveDate) -> ServiceDueStatus {
    let meter_margin = match item.item_type {
        FleetType::Vehicle => 500.0,
        FleetType::Equipment => 50.0,
    };

    if let Some(next_meter) = item.next_service_meter {
        if item.current_meter >= next_meter {
            return ServiceDueStatus::Overdue;
        }
        if item.current_meter >= next_meter - meter_margin {
            return ServiceDueStatus::DueSoon;
        }
    }
    if let Some(next_date) = item.next_service_date {
        if today > next_date {
            return ServiceDueStatus::Overdue;
        }
        if today + chrono::Days::new(14) >= next_date {
            return ServiceDueStatus::DueSoon;
        }
    }
    ServiceDueStatus::Ok
}
