//! Repositorio del historial de estados
//!
//! Libro append-only de sesiones de estado en la colección
//! `status_history`. Las únicas mutaciones permitidas son el alta de una
//! sesión abierta y el cierre único de una sesión existente; no hay update
//! general ni delete.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::models::status_history::StatusHistoryRecord;
use crate::storage::{CollectionQuery, DocumentStore};
use crate::utils::errors::AppResult;

const COLLECTION: &str = "status_history";

pub struct StatusHistoryRepository {
    store: Arc<dyn DocumentStore>,
}

impl StatusHistoryRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn append(&self, record: &StatusHistoryRecord) -> AppResult<String> {
        let data = crate::storage::document_store::to_document_data(record)?;
        self.store.create_document(COLLECTION, data).await
    }

    /// Cierre único de una sesión: fija `endTime` y `durationHours` juntos.
    /// Una sesión cerrada no vuelve a mutarse.
    pub async fn close(
        &self,
        id: &str,
        end_time: DateTime<Utc>,
        duration_hours: f64,
    ) -> AppResult<()> {
        self.store
            .update_document(
                COLLECTION,
                id,
                json!({
                    "endTime": end_time,
                    "durationHours": duration_hours,
                }),
            )
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<StatusHistoryRecord>> {
        let document = self.store.get_document(COLLECTION, id).await?;
        match document {
            Some(doc) => Ok(Some(doc.to_model()?)),
            None => Ok(None),
        }
    }

    /// Sesiones de un activo, la más reciente primero
    pub async fn list_by_item(&self, fleet_item_id: &str) -> AppResult<Vec<StatusHistoryRecord>> {
        let documents = self
            .store
            .query_collection(
                COLLECTION,
                CollectionQuery::field_eq("fleetItemId", json!(fleet_item_id)),
            )
            .await?;
        let mut records: Vec<StatusHistoryRecord> = documents
            .iter()
            .map(|doc| doc.to_model())
            .collect::<AppResult<_>>()?;
        records.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(records)
    }

    /// Sesiones abiertas de un activo. El invariante dice que hay a lo sumo
    /// una, pero las lecturas no lo asumen.
    pub async fn open_sessions(&self, fleet_item_id: &str) -> AppResult<Vec<StatusHistoryRecord>> {
        let mut records = self.list_by_item(fleet_item_id).await?;
        records.retain(|r| r.is_open());
        Ok(records)
    }
}
