//! Catálogos de configuración de la aplicación
//!
//! Listas estáticas que consume la capa de presentación: categorías,
//! ubicaciones, tipos de trabajo y el checklist de mantenimiento.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub categories: Vec<String>,
    pub locations: Vec<String>,
    pub job_types: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            categories: vec![
                "Sedan".to_string(),
                "Pickup Truck".to_string(),
                "Excavator".to_string(),
                "Forklift".to_string(),
                "Generator".to_string(),
            ],
            locations: vec![
                "Main HQ".to_string(),
                "North Site".to_string(),
                "South Depot".to_string(),
            ],
            job_types: vec![
                "Routine Service".to_string(),
                "Breakdown".to_string(),
                "Tire Change".to_string(),
                "Oil Change".to_string(),
            ],
        }
    }
}

lazy_static! {
    /// Checklist de puntos de mantenimiento seleccionables en registros de
    /// tipo SERVICE
    pub static ref MAINTENANCE_CHECKLIST: Vec<&'static str> = vec![
        "Engine Oil",
        "Engine Oil Filter",
        "Fuel Filter (Primary)",
        "Fuel Filter (Secondary)",
        "Air Filter (Primary)",
        "Air Filter (Secondary)",
        "Transmission Oil",
        "Transmission Filter",
        "Differential Oil (Front)",
        "Differential Oil (Rear)",
        "Final Drive Oil (Left)",
        "Final Drive Oil (Right)",
        "Hydraulic Oil",
        "Hydraulic Filter",
        "Hydraulic Return/Suction Filter",
        "Coolant",
        "Brake Pads/Shoes",
        "Greasing / Lubrication",
        "Belts (Fan/Alt/AC)",
        "Battery Check",
        "Tire Pressure/Condition",
        "Lights & Electrical",
        "Undercarriage Inspection",
    ];
}
