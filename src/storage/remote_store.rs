//! Cliente del almacén de documentos remoto
//!
//! Implementación del contrato de persistencia contra la API REST de
//! documentos. Las suscripciones se materializan con una tarea de sondeo
//! por colección que difunde el snapshot completo en cada ciclo con
//! cambios.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use crate::storage::document_store::{
    BatchOp, CollectionQuery, CollectionSnapshot, Document, DocumentStore,
};
use crate::utils::errors::{AppError, AppResult};

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: String,
}

pub struct RemoteStore {
    client: Client,
    base_url: String,
    poll_interval: Duration,
    publishers: RwLock<HashMap<String, broadcast::Sender<CollectionSnapshot>>>,
}

impl RemoteStore {
    /// Conecta con el backend y verifica que responde antes de usarlo.
    /// Un backend inalcanzable se reporta como BackendUnavailable para que
    /// el llamador active el modo local.
    pub async fn connect(base_url: &str, poll_interval: Duration) -> AppResult<Arc<Self>> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Error building HTTP client: {}", e)))?;

        let store = Arc::new(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_interval,
            publishers: RwLock::new(HashMap::new()),
        });

        store.ping().await?;
        info!("✅ Document store conectado en {}", store.base_url);
        Ok(store)
    }

    async fn ping(&self) -> AppResult<()> {
        let url = format!("{}/health", self.base_url);
        self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(format!("Store unreachable: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::BackendUnavailable(format!("Store unhealthy: {}", e)))?;
        Ok(())
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }

    async fn fetch_collection(&self, collection: &str) -> AppResult<Vec<Document>> {
        let response = self
            .client
            .get(self.collection_url(collection))
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(format!("Store unreachable: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::Internal(format!("Error listing '{}': {}", collection, e)))?;

        response
            .json::<Vec<Document>>()
            .await
            .map_err(|e| AppError::Internal(format!("Invalid store response: {}", e)))
    }

    /// Tarea de sondeo de una colección: difunde el snapshot cuando cambia
    fn spawn_poller(&self, collection: String, sender: broadcast::Sender<CollectionSnapshot>) {
        let client = self.client.clone();
        let url = self.collection_url(&collection);
        let poll_interval = self.poll_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            let mut last: Option<Vec<Document>> = None;
            loop {
                ticker.tick().await;
                if sender.receiver_count() == 0 {
                    continue;
                }
                let fetched = async {
                    client
                        .get(&url)
                        .send()
                        .await?
                        .error_for_status()?
                        .json::<Vec<Document>>()
                        .await
                }
                .await;
                match fetched {
                    Ok(documents) => {
                        if last.as_ref() != Some(&documents) {
                            last = Some(documents.clone());
                            let _ = sender.send(CollectionSnapshot {
                                collection: collection.clone(),
                                documents,
                            });
                        }
                    }
                    Err(e) => {
                        warn!("⚠️ Sondeo de '{}' falló: {}", collection, e);
                    }
                }
            }
        });
    }
}

#[async_trait]
impl DocumentStore for RemoteStore {
    async fn create_document(&self, collection: &str, data: Value) -> AppResult<String> {
        let response = self
            .client
            .post(self.collection_url(collection))
            .json(&data)
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(format!("Store unreachable: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::Internal(format!("Error creating document: {}", e)))?;

        let created: CreatedResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Invalid store response: {}", e)))?;
        Ok(created.id)
    }

    async fn update_document(&self, collection: &str, id: &str, partial: Value) -> AppResult<()> {
        let response = self
            .client
            .patch(self.document_url(collection, id))
            .json(&partial)
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(format!("Store unreachable: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "Document '{}/{}' not found",
                collection, id
            )));
        }
        response
            .error_for_status()
            .map_err(|e| AppError::Internal(format!("Error updating document: {}", e)))?;
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()> {
        self.client
            .delete(self.document_url(collection, id))
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(format!("Store unreachable: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::Internal(format!("Error deleting document: {}", e)))?;
        Ok(())
    }

    async fn get_document(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let response = self
            .client
            .get(self.document_url(collection, id))
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(format!("Store unreachable: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let document = response
            .error_for_status()
            .map_err(|e| AppError::Internal(format!("Error fetching document: {}", e)))?
            .json::<Document>()
            .await
            .map_err(|e| AppError::Internal(format!("Invalid store response: {}", e)))?;
        Ok(Some(document))
    }

    async fn query_collection(
        &self,
        collection: &str,
        query: CollectionQuery,
    ) -> AppResult<Vec<Document>> {
        // La API de documentos no expone filtros; se filtra del lado cliente
        let mut documents = self.fetch_collection(collection).await?;
        if let Some((field, value)) = &query.field_equals {
            documents.retain(|doc| doc.data.get(field) == Some(value));
        }
        if let Some(limit) = query.limit {
            documents.truncate(limit);
        }
        Ok(documents)
    }

    async fn apply_batch(&self, ops: Vec<BatchOp>) -> AppResult<()> {
        let payload: Vec<Value> = ops
            .into_iter()
            .map(|op| match op {
                BatchOp::Create { collection, data } => serde_json::json!({
                    "op": "create", "collection": collection, "data": data
                }),
                BatchOp::Update {
                    collection,
                    id,
                    data,
                } => serde_json::json!({
                    "op": "update", "collection": collection, "id": id, "data": data
                }),
                BatchOp::Delete { collection, id } => serde_json::json!({
                    "op": "delete", "collection": collection, "id": id
                }),
            })
            .collect();

        self.client
            .post(format!("{}/batch", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(format!("Store unreachable: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::Internal(format!("Error applying batch: {}", e)))?;
        Ok(())
    }

    async fn subscribe_collection(
        &self,
        collection: &str,
    ) -> broadcast::Receiver<CollectionSnapshot> {
        let mut publishers = self.publishers.write().await;
        if let Some(sender) = publishers.get(collection) {
            return sender.subscribe();
        }
        let (sender, receiver) = broadcast::channel(CHANNEL_CAPACITY);
        publishers.insert(collection.to_string(), sender.clone());
        drop(publishers);

        self.spawn_poller(collection.to_string(), sender);
        receiver
    }
}
