//! Modelo de FleetItem
//!
//! Este módulo contiene el struct FleetItem (vehículos y equipos) y sus
//! enums de tipo y estado operacional. Los documentos se serializan en
//! camelCase para el almacén de documentos.

use serde::{Deserialize, Serialize};

/// Tipo de activo de la flota
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FleetType {
    Vehicle,
    Equipment,
}

impl FleetType {
    /// Nombre de la colección del almacén para este tipo
    pub fn collection_name(&self) -> &'static str {
        match self {
            FleetType::Vehicle => "vehicles",
            FleetType::Equipment => "equipment",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FleetType::Vehicle => "VEHICLE",
            FleetType::Equipment => "EQUIPMENT",
        }
    }
}

/// Estado operacional del activo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FleetStatus {
    Active,
    Workshop,
    Standby,
    OutOfService,
}

impl FleetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FleetStatus::Active => "ACTIVE",
            FleetStatus::Workshop => "WORKSHOP",
            FleetStatus::Standby => "STANDBY",
            FleetStatus::OutOfService => "OUT_OF_SERVICE",
        }
    }

    pub fn all() -> [FleetStatus; 4] {
        [
            FleetStatus::Active,
            FleetStatus::Workshop,
            FleetStatus::Standby,
            FleetStatus::OutOfService,
        ]
    }
}

/// Detalles técnicos opcionales del activo
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tire_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
}

/// FleetItem principal - un vehículo o equipo de la flota
///
/// `current_meter` es un contador monotónico (km para vehículos, horas para
/// equipos). Los campos `last_service_date` / `next_service_*` son caché
/// denormalizada del último registro de mantenimiento no correctivo; nunca
/// son autoritativos. `current_status_session_id` es una referencia débil al
/// registro de historial abierto: puede estar ausente o apuntar a un
/// registro inexistente y los consumidores deben tolerarlo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FleetItem {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: FleetType,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub plate_or_serial: String,
    pub current_meter: f64,
    pub status: FleetStatus,
    pub category: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_details: Option<TechnicalDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_service_date: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_service_date: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_service_meter: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_status_session_id: Option<String>,
}

impl FleetItem {
    /// Unidad del contador según el tipo de activo
    pub fn meter_unit(&self) -> &'static str {
        match self.item_type {
            FleetType::Vehicle => "km",
            FleetType::Equipment => "hrs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_value(FleetStatus::OutOfService).unwrap(),
            serde_json::json!("OUT_OF_SERVICE")
        );
        assert_eq!(
            serde_json::to_value(FleetStatus::Workshop).unwrap(),
            serde_json::json!("WORKSHOP")
        );
    }

    #[test]
    fn test_collection_name_by_type() {
        assert_eq!(FleetType::Vehicle.collection_name(), "vehicles");
        assert_eq!(FleetType::Equipment.collection_name(), "equipment");
    }
}
