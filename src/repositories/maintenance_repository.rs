//! Repositorio de registros de mantenimiento
//!
//! Las reparaciones se archivan en `breakdowns_repairs` y el mantenimiento
//! rutinario (servicios e inspecciones) en `routine_maintenance`. Los
//! registros nunca se editan ni se borran.

use std::sync::Arc;

use serde_json::json;

use crate::models::maintenance::MaintenanceRecord;
use crate::storage::{CollectionQuery, DocumentStore};
use crate::utils::errors::AppResult;

const ROUTINE_LEDGER: &str = "routine_maintenance";
const REPAIRS_LEDGER: &str = "breakdowns_repairs";

pub struct MaintenanceRepository {
    store: Arc<dyn DocumentStore>,
}

impl MaintenanceRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn append(&self, record: &MaintenanceRecord) -> AppResult<String> {
        let data = crate::storage::document_store::to_document_data(record)?;
        self.store
            .create_document(record.record_type.collection_name(), data)
            .await
    }

    /// Historial de mantenimiento de un activo, fusionando ambos libros,
    /// el trabajo más reciente primero
    pub async fn list_by_item(&self, fleet_item_id: &str) -> AppResult<Vec<MaintenanceRecord>> {
        let (routine, repairs) = futures::try_join!(
            self.store.query_collection(
                ROUTINE_LEDGER,
                CollectionQuery::field_eq("fleetItemId", json!(fleet_item_id)),
            ),
            self.store.query_collection(
                REPAIRS_LEDGER,
                CollectionQuery::field_eq("fleetItemId", json!(fleet_item_id)),
            ),
        )?;

        let mut records: Vec<MaintenanceRecord> = Vec::new();
        for doc in routine.iter().chain(repairs.iter()) {
            records.push(doc.to_model()?);
        }
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }
}
