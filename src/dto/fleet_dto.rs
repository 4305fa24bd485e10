//! DTOs de activos de flota

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::fleet_item::{FleetItem, FleetStatus, FleetType, TechnicalDetails};
use crate::models::status_history::{format_duration, StatusHistoryRecord};
use crate::services::fleet_directory::{CascadeSelection, FleetFilter};
use crate::services::maintenance_service::ServiceDueStatus;

/// Request para crear o editar un activo
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FleetItemRequest {
    #[serde(rename = "type")]
    pub item_type: FleetType,

    #[validate(length(min = 1, max = 100))]
    pub make: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    #[validate(length(min = 1, max = 50))]
    pub plate_or_serial: String,

    #[validate(range(min = 0.0))]
    pub current_meter: f64,

    pub status: FleetStatus,

    #[validate(length(min = 1, max = 100))]
    pub category: String,

    #[validate(length(min = 1, max = 100))]
    pub location: String,

    pub assigned_to: Option<String>,
    pub technical_details: Option<TechnicalDetails>,
}

impl FleetItemRequest {
    /// Materializa un activo nuevo a partir del request
    pub fn into_new_item(self) -> FleetItem {
        FleetItem {
            id: String::new(),
            item_type: self.item_type,
            make: self.make,
            model: self.model,
            year: self.year,
            plate_or_serial: self.plate_or_serial,
            current_meter: self.current_meter,
            status: self.status,
            category: self.category,
            location: self.location,
            assigned_to: self.assigned_to.filter(|s| !s.trim().is_empty()),
            technical_details: self.technical_details,
            last_service_date: None,
            next_service_date: None,
            next_service_meter: None,
            current_status_session_id: None,
        }
    }

    /// Aplica la edición sobre un activo existente, preservando la caché de
    /// servicio y el puntero de sesión
    pub fn apply_to(self, existing: &FleetItem) -> FleetItem {
        FleetItem {
            id: existing.id.clone(),
            item_type: existing.item_type,
            make: self.make,
            model: self.model,
            year: self.year,
            plate_or_serial: self.plate_or_serial,
            current_meter: self.current_meter,
            status: self.status,
            category: self.category,
            location: self.location,
            assigned_to: self.assigned_to.filter(|s| !s.trim().is_empty()),
            technical_details: self.technical_details,
            last_service_date: existing.last_service_date,
            next_service_date: existing.next_service_date,
            next_service_meter: existing.next_service_meter,
            current_status_session_id: existing.current_status_session_id.clone(),
        }
    }
}

/// Response de un activo con su estado de vencimiento derivado
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetItemResponse {
    #[serde(flatten)]
    pub item: FleetItem,
    pub meter_unit: &'static str,
    pub service_due: ServiceDueStatus,
}

impl FleetItemResponse {
    pub fn from_item(item: FleetItem, today: chrono::NaiveDate) -> Self {
        let meter_unit = item.meter_unit();
        let service_due = crate::services::maintenance_service::service_due_status(&item, today);
        Self {
            item,
            meter_unit,
            service_due,
        }
    }
}

/// Parámetros de listado: búsqueda, chip de estado y filtros en cascada.
/// El valor "ALL" (en cualquier caja) equivale a no filtrar.
#[derive(Debug, Default, Deserialize)]
pub struct FleetListQuery {
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
}

fn normalize(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("ALL"))
}

fn parse_status(value: &str) -> Option<FleetStatus> {
    match value.to_uppercase().as_str() {
        "ACTIVE" => Some(FleetStatus::Active),
        "WORKSHOP" => Some(FleetStatus::Workshop),
        "STANDBY" => Some(FleetStatus::Standby),
        "OUT_OF_SERVICE" => Some(FleetStatus::OutOfService),
        _ => None,
    }
}

fn parse_type(value: &str) -> Option<FleetType> {
    match value.to_uppercase().as_str() {
        "VEHICLE" => Some(FleetType::Vehicle),
        "EQUIPMENT" => Some(FleetType::Equipment),
        _ => None,
    }
}

impl FleetListQuery {
    pub fn to_filter(&self) -> FleetFilter {
        let mut cascade = CascadeSelection::default();
        cascade.select_make(normalize(&self.make));
        // Los niveles inferiores solo aplican con el superior elegido
        if cascade.make.is_some() {
            cascade.select_model(normalize(&self.model));
        }
        if cascade.model.is_some() {
            cascade.select_year(normalize(&self.year).and_then(|y| y.parse().ok()));
        }

        FleetFilter {
            item_type: normalize(&self.item_type).and_then(|t| parse_type(&t)),
            search: normalize(&self.search),
            status: normalize(&self.status).and_then(|s| parse_status(&s)),
            cascade,
        }
    }
}

/// Response de una sesión del historial con su duración para mostrar
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryResponse {
    #[serde(flatten)]
    pub record: StatusHistoryRecord,
    pub duration_display: String,
}

impl From<StatusHistoryRecord> for StatusHistoryResponse {
    fn from(record: StatusHistoryRecord) -> Self {
        let duration_display = format_duration(record.duration_hours);
        Self {
            record,
            duration_display,
        }
    }
}

/// Resultado de una importación CSV
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub imported: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keyword_clears_filters() {
        let query = FleetListQuery {
            item_type: Some("ALL".into()),
            search: Some("".into()),
            status: Some("all".into()),
            make: Some("Toyota".into()),
            model: Some("ALL".into()),
            year: Some("2022".into()),
            ..Default::default()
        };
        let filter = query.to_filter();
        assert_eq!(filter.item_type, None);
        assert_eq!(filter.search, None);
        assert_eq!(filter.status, None);
        assert_eq!(filter.cascade.make.as_deref(), Some("Toyota"));
        assert_eq!(filter.cascade.model, None);
        // Sin modelo elegido, el año no aplica
        assert_eq!(filter.cascade.year, None);
    }

    #[test]
    fn test_model_requires_make() {
        let query = FleetListQuery {
            model: Some("Hilux".into()),
            year: Some("2022".into()),
            ..Default::default()
        };
        let filter = query.to_filter();
        assert_eq!(filter.cascade.model, None);
        assert_eq!(filter.cascade.year, None);
    }
}
