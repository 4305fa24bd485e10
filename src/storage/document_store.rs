//! Contrato del almacén de documentos
//!
//! Este módulo define el trait que el núcleo requiere del colaborador de
//! persistencia: primitivas create/update/delete/get/query por colección,
//! escrituras en lote y suscripción push que entrega el conjunto completo
//! de la colección en cada cambio.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::utils::errors::{AppError, AppResult};

/// Un documento almacenado: id asignado por el almacén más su contenido JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Deserializa el contenido inyectando el id del documento en el campo
    /// `id` del modelo destino
    pub fn to_model<T: DeserializeOwned>(&self) -> AppResult<T> {
        let mut data = self.data.clone();
        if let Value::Object(ref mut map) = data {
            map.insert("id".to_string(), Value::String(self.id.clone()));
        }
        serde_json::from_value(data)
            .map_err(|e| AppError::Internal(format!("Error deserializing document: {}", e)))
    }
}

/// Serializa un modelo a contenido de documento, descartando el campo `id`
/// (el id vive fuera del contenido, lo asigna el almacén)
pub fn to_document_data<T: Serialize>(model: &T) -> AppResult<Value> {
    let mut value = serde_json::to_value(model)
        .map_err(|e| AppError::Internal(format!("Error serializing document: {}", e)))?;
    if let Value::Object(ref mut map) = value {
        map.remove("id");
    }
    Ok(value)
}

/// Consulta puntual sobre una colección (lectura point-in-time)
#[derive(Debug, Clone, Default)]
pub struct CollectionQuery {
    /// Igualdad exacta campo == valor
    pub field_equals: Option<(String, Value)>,
    pub limit: Option<usize>,
}

impl CollectionQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn field_eq(field: impl Into<String>, value: Value) -> Self {
        Self {
            field_equals: Some((field.into(), value)),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Operación individual de una escritura en lote
#[derive(Debug, Clone)]
pub enum BatchOp {
    Create {
        collection: String,
        data: Value,
    },
    Update {
        collection: String,
        id: String,
        data: Value,
    },
    Delete {
        collection: String,
        id: String,
    },
}

/// Snapshot completo de una colección, entregado en cada cambio
#[derive(Debug, Clone)]
pub struct CollectionSnapshot {
    pub collection: String,
    pub documents: Vec<Document>,
}

/// Capacidades que el núcleo requiere del backend de persistencia.
///
/// Ninguna operación multi-documento es transaccional: el llamador trata
/// `apply_batch` como todo-o-nada pero el colaborador subyacente puede no
/// garantizarlo.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(&self, collection: &str, data: Value) -> AppResult<String>;

    /// Merge superficial de claves sobre el documento existente.
    /// Falla con NotFound si el id no existe.
    async fn update_document(&self, collection: &str, id: &str, partial: Value) -> AppResult<()>;

    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()>;

    async fn get_document(&self, collection: &str, id: &str) -> AppResult<Option<Document>>;

    async fn query_collection(
        &self,
        collection: &str,
        query: CollectionQuery,
    ) -> AppResult<Vec<Document>>;

    async fn apply_batch(&self, ops: Vec<BatchOp>) -> AppResult<()>;

    /// Modelo push: el receptor recibe el conjunto completo actual de la
    /// colección en cada cambio
    async fn subscribe_collection(
        &self,
        collection: &str,
    ) -> broadcast::Receiver<CollectionSnapshot>;
}
