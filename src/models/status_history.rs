//! Modelo de StatusHistoryRecord
//!
//! Un registro del historial representa un intervalo contiguo durante el
//! cual un activo mantuvo un único estado. La ausencia de `end_time`
//! significa "sesión abierta"; `duration_hours` solo existe cuando la
//! sesión fue cerrada y ambos campos se escriben juntos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::fleet_item::FleetStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryRecord {
    #[serde(default)]
    pub id: String,
    pub fleet_item_id: String,
    pub status: FleetStatus,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StatusHistoryRecord {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Horas transcurridas de una sesión abierta, calculadas bajo demanda.
    /// Para sesiones cerradas el valor almacenado es el autoritativo.
    pub fn elapsed_hours(&self, now: DateTime<Utc>) -> f64 {
        match self.duration_hours {
            Some(h) => h,
            None => hours_between(self.start_time, now),
        }
    }
}

/// Horas (fraccionarias) entre dos instantes
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / (1000.0 * 60.0 * 60.0)
}

/// Redondea una duración a un decimal, como se persiste al cerrar sesión
pub fn round_duration(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

/// Formato de duración para presentación:
/// menos de 24h -> "5.0 hrs", 24h o más -> "2d 3h", sesión abierta -> "Ongoing"
pub fn format_duration(duration_hours: Option<f64>) -> String {
    match duration_hours {
        None => "Ongoing".to_string(),
        Some(hours) if hours < 24.0 => format!("{:.1} hrs", hours),
        Some(hours) => {
            let days = (hours / 24.0).floor() as i64;
            let rem_hours = (hours % 24.0).floor() as i64;
            format!("{}d {}h", days, rem_hours)
        }
    }
}
