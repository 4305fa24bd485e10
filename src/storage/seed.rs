//! Datos de demostración para el modo local
//!
//! Cuando el backend de documentos no está disponible la aplicación arranca
//! en modo local con una flota de ejemplo y un par de usuarios, para que la
//! interfaz siga siendo operable.

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::storage::document_store::DocumentStore;
use crate::storage::local_store::LocalStore;
use crate::utils::errors::AppResult;

pub const DEMO_MANAGER_EMAIL: &str = "admin@garage.com";
pub const DEMO_STAFF_EMAIL: &str = "john@garage.com";
pub const DEMO_PASSWORD: &str = "1234";

/// Siembra la flota y los usuarios de demostración en un almacén local
pub async fn seed_demo_data(store: &LocalStore) -> AppResult<()> {
    let now = Utc::now();
    let password_hash = bcrypt::hash(DEMO_PASSWORD, bcrypt::DEFAULT_COST)
        .map_err(|e| crate::utils::errors::AppError::Hash(e.to_string()))?;

    store
        .create_document(
            "users",
            json!({
                "name": "Demo Manager",
                "email": DEMO_MANAGER_EMAIL,
                "role": "manager",
                "createdAt": now,
                "passwordHash": password_hash,
            }),
        )
        .await?;
    store
        .create_document(
            "users",
            json!({
                "name": "John Mechanic",
                "email": DEMO_STAFF_EMAIL,
                "role": "staff",
                "createdAt": now,
                "passwordHash": password_hash,
            }),
        )
        .await?;

    store
        .create_document(
            "vehicles",
            json!({
                "type": "VEHICLE",
                "make": "Toyota",
                "model": "Hilux",
                "year": 2022,
                "plateOrSerial": "DXB-10293",
                "currentMeter": 45000.0,
                "status": "ACTIVE",
                "category": "Pickup Truck",
                "location": "Main HQ",
                "assignedTo": "John Doe",
                "technicalDetails": { "vin": "JTE12345678", "fuelType": "Diesel" },
                "nextServiceMeter": 50000.0,
            }),
        )
        .await?;
    store
        .create_document(
            "vehicles",
            json!({
                "type": "VEHICLE",
                "make": "Ford",
                "model": "F-150",
                "year": 2023,
                "plateOrSerial": "ABD-5544",
                "currentMeter": 12000.0,
                "status": "ACTIVE",
                "category": "Pickup Truck",
                "location": "South Depot",
                "assignedTo": "Jane Smith",
                "nextServiceMeter": 15000.0,
            }),
        )
        .await?;
    store
        .create_document(
            "equipment",
            json!({
                "type": "EQUIPMENT",
                "make": "CAT",
                "model": "320 GC",
                "year": 2020,
                "plateOrSerial": "CAT-EX-99",
                "currentMeter": 3200.0,
                "status": "WORKSHOP",
                "category": "Excavator",
                "location": "North Site",
                "assignedTo": "Site A Team",
                "nextServiceDate": "2023-12-01",
            }),
        )
        .await?;

    info!("🧪 Modo local: flota y usuarios de demostración sembrados");
    Ok(())
}
