//! Modelo de MaintenanceRecord
//!
//! Un registro de mantenimiento es un evento de servicio o reparación ya
//! completado. Los registros son append-only: nunca se editan ni se borran
//! en el flujo normal.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Tipo de trabajo realizado. Inspection se trata como Service para el
/// cálculo de próximos vencimientos.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceType {
    Service,
    Repair,
    Inspection,
}

impl MaintenanceType {
    pub fn is_repair(&self) -> bool {
        matches!(self, MaintenanceType::Repair)
    }

    /// Colección del almacén donde se archiva este tipo de registro.
    /// Las reparaciones se llevan en un libro separado del mantenimiento
    /// rutinario.
    pub fn collection_name(&self) -> &'static str {
        if self.is_repair() {
            "breakdowns_repairs"
        } else {
            "routine_maintenance"
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceType::Service => "SERVICE",
            MaintenanceType::Repair => "REPAIR",
            MaintenanceType::Inspection => "INSPECTION",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    #[serde(default)]
    pub id: String,
    pub fleet_item_id: String,
    pub date: NaiveDate,
    /// Lectura del contador en el momento del trabajo, no necesariamente la
    /// lectura actual del activo al momento de registrar.
    pub meter_reading: f64,
    #[serde(rename = "type")]
    pub record_type: MaintenanceType,
    pub description: String,
    /// Falla reportada; solo se persiste en reparaciones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complaint: Option<String>,
    pub parts: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maintenance_items: Vec<String>,
    pub labor_cost: f64,
    pub parts_cost: f64,
    /// Siempre labor_cost + parts_cost; cualquier valor entrante se descarta
    pub total_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_meter: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<NaiveDate>,
    /// Mecánico que realizó el trabajo (editable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician: Option<String>,
    /// Usuario del sistema que capturó el registro (no editable por el cliente)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

/// Incremento del contador para el próximo servicio según tipo de activo
pub fn next_due_meter_increment(item_type: crate::models::fleet_item::FleetType) -> f64 {
    match item_type {
        crate::models::fleet_item::FleetType::Vehicle => 10_000.0,
        crate::models::fleet_item::FleetType::Equipment => 500.0,
    }
}

/// Fecha del próximo servicio: un año después de la fecha del trabajo.
/// El 29 de febrero cae en 1 de marzo del año siguiente.
pub fn next_due_date_after(date: NaiveDate) -> NaiveDate {
    date.with_year(date.year() + 1)
        .unwrap_or_else(|| date + chrono::Days::new(366))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repair_goes_to_separate_ledger() {
        assert_eq!(
            MaintenanceType::Repair.collection_name(),
            "breakdowns_repairs"
        );
        assert_eq!(
            MaintenanceType::Service.collection_name(),
            "routine_maintenance"
        );
        assert_eq!(
            MaintenanceType::Inspection.collection_name(),
            "routine_maintenance"
        );
    }

    #[test]
    fn test_next_due_date_adds_one_year() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(
            next_due_date_after(date),
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
        );
    }

    #[test]
    fn test_next_due_date_leap_day() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            next_due_date_after(date),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
    }
}
