//! Repositorio de activos de la flota
//!
//! Acceso a las colecciones `vehicles` y `equipment` del almacén de
//! documentos. La partición por tipo de activo se resuelve con
//! `FleetType::collection_name`.

use std::sync::Arc;

use serde_json::Value;

use crate::models::fleet_item::{FleetItem, FleetType};
use crate::storage::{BatchOp, CollectionQuery, DocumentStore};
use crate::utils::errors::{not_found_error, AppResult};

pub struct FleetRepository {
    store: Arc<dyn DocumentStore>,
}

impl FleetRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, item: &FleetItem) -> AppResult<String> {
        let data = crate::storage::document_store::to_document_data(item)?;
        self.store
            .create_document(item.item_type.collection_name(), data)
            .await
    }

    pub async fn find_by_id(
        &self,
        item_type: FleetType,
        id: &str,
    ) -> AppResult<Option<FleetItem>> {
        let document = self
            .store
            .get_document(item_type.collection_name(), id)
            .await?;
        match document {
            Some(doc) => Ok(Some(doc.to_model()?)),
            None => Ok(None),
        }
    }

    pub async fn get(&self, item_type: FleetType, id: &str) -> AppResult<FleetItem> {
        self.find_by_id(item_type, id)
            .await?
            .ok_or_else(|| not_found_error("Fleet item", id))
    }

    pub async fn list(&self, item_type: FleetType) -> AppResult<Vec<FleetItem>> {
        let documents = self
            .store
            .query_collection(item_type.collection_name(), CollectionQuery::all())
            .await?;
        documents.iter().map(|doc| doc.to_model()).collect()
    }

    /// Actualización parcial de campos del documento del activo
    pub async fn update_fields(
        &self,
        item_type: FleetType,
        id: &str,
        partial: Value,
    ) -> AppResult<()> {
        self.store
            .update_document(item_type.collection_name(), id, partial)
            .await
    }

    /// Reemplazo completo del contenido del activo
    pub async fn save(&self, item: &FleetItem) -> AppResult<()> {
        let data = crate::storage::document_store::to_document_data(item)?;
        self.store
            .update_document(item.item_type.collection_name(), &item.id, data)
            .await
    }

    /// Borra el documento del activo. Las entradas de historial quedan como
    /// historia huérfana: el borrado no es en cascada.
    pub async fn delete(&self, item_type: FleetType, id: &str) -> AppResult<()> {
        self.store
            .delete_document(item_type.collection_name(), id)
            .await
    }

    /// Alta masiva (importación CSV)
    pub async fn import_batch(&self, items: &[FleetItem]) -> AppResult<()> {
        let mut ops = Vec::with_capacity(items.len());
        for item in items {
            ops.push(BatchOp::Create {
                collection: item.item_type.collection_name().to_string(),
                data: crate::storage::document_store::to_document_data(item)?,
            });
        }
        self.store.apply_batch(ops).await
    }

    /// Borrado masivo de ambos tipos de activo (reset de la aplicación)
    pub async fn delete_batch(&self, items: &[FleetItem]) -> AppResult<()> {
        let ops = items
            .iter()
            .map(|item| BatchOp::Delete {
                collection: item.item_type.collection_name().to_string(),
                id: item.id.clone(),
            })
            .collect();
        self.store.apply_batch(ops).await
    }
}
