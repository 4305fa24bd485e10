//! Almacén de documentos en memoria
//!
//! Implementación local del contrato de persistencia. Es el modo de
//! operación de respaldo cuando el backend remoto no está disponible y el
//! backend de todos los tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::storage::document_store::{
    BatchOp, CollectionQuery, CollectionSnapshot, Document, DocumentStore,
};
use crate::utils::errors::{AppError, AppResult};

const CHANNEL_CAPACITY: usize = 64;

type Collections = HashMap<String, HashMap<String, Value>>;

pub struct LocalStore {
    collections: RwLock<Collections>,
    publishers: RwLock<HashMap<String, broadcast::Sender<CollectionSnapshot>>>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            publishers: RwLock::new(HashMap::new()),
        }
    }

    async fn snapshot(&self, collection: &str) -> Vec<Document> {
        let collections = self.collections.read().await;
        let mut documents: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default();
        documents.sort_by(|a, b| a.id.cmp(&b.id));
        documents
    }

    /// Publica el snapshot completo a los suscriptores de la colección
    async fn publish(&self, collection: &str) {
        let sender = {
            let publishers = self.publishers.read().await;
            publishers.get(collection).cloned()
        };
        if let Some(sender) = sender {
            let snapshot = CollectionSnapshot {
                collection: collection.to_string(),
                documents: self.snapshot(collection).await,
            };
            // Sin suscriptores activos el envío falla y no importa
            let _ = sender.send(snapshot);
        }
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for LocalStore {
    async fn create_document(&self, collection: &str, data: Value) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        {
            let mut collections = self.collections.write().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), data);
        }
        log::debug!("📄 Documento '{}' creado en '{}'", id, collection);
        self.publish(collection).await;
        Ok(id)
    }

    async fn update_document(&self, collection: &str, id: &str, partial: Value) -> AppResult<()> {
        {
            let mut collections = self.collections.write().await;
            let docs = collections
                .get_mut(collection)
                .ok_or_else(|| AppError::NotFound(format!("Collection '{}' is empty", collection)))?;
            let existing = docs.get_mut(id).ok_or_else(|| {
                AppError::NotFound(format!("Document '{}/{}' not found", collection, id))
            })?;

            match (existing, partial) {
                (Value::Object(target), Value::Object(changes)) => {
                    for (key, value) in changes {
                        if value.is_null() {
                            target.remove(&key);
                        } else {
                            target.insert(key, value);
                        }
                    }
                }
                (existing, partial) => *existing = partial,
            }
        }
        self.publish(collection).await;
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()> {
        {
            let mut collections = self.collections.write().await;
            if let Some(docs) = collections.get_mut(collection) {
                docs.remove(id);
            }
        }
        self.publish(collection).await;
        Ok(())
    }

    async fn get_document(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn query_collection(
        &self,
        collection: &str,
        query: CollectionQuery,
    ) -> AppResult<Vec<Document>> {
        let mut documents = self.snapshot(collection).await;
        if let Some((field, value)) = &query.field_equals {
            documents.retain(|doc| doc.data.get(field) == Some(value));
        }
        if let Some(limit) = query.limit {
            documents.truncate(limit);
        }
        Ok(documents)
    }

    async fn apply_batch(&self, ops: Vec<BatchOp>) -> AppResult<()> {
        let mut touched: Vec<String> = Vec::new();
        {
            let mut collections = self.collections.write().await;
            for op in ops {
                match op {
                    BatchOp::Create { collection, data } => {
                        let id = Uuid::new_v4().to_string();
                        collections
                            .entry(collection.clone())
                            .or_default()
                            .insert(id, data);
                        touched.push(collection);
                    }
                    BatchOp::Update {
                        collection,
                        id,
                        data,
                    } => {
                        if let Some(existing) = collections
                            .get_mut(&collection)
                            .and_then(|docs| docs.get_mut(&id))
                        {
                            if let (Value::Object(target), Value::Object(changes)) =
                                (existing, data)
                            {
                                for (key, value) in changes {
                                    target.insert(key, value);
                                }
                            }
                        }
                        touched.push(collection);
                    }
                    BatchOp::Delete { collection, id } => {
                        if let Some(docs) = collections.get_mut(&collection) {
                            docs.remove(&id);
                        }
                        touched.push(collection);
                    }
                }
            }
        }
        touched.sort();
        touched.dedup();
        for collection in touched {
            self.publish(&collection).await;
        }
        Ok(())
    }

    async fn subscribe_collection(
        &self,
        collection: &str,
    ) -> broadcast::Receiver<CollectionSnapshot> {
        let mut publishers = self.publishers.write().await;
        let sender = publishers
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_get_document() {
        let store = LocalStore::new();
        let id = store
            .create_document("vehicles", json!({"make": "Toyota"}))
            .await
            .unwrap();
        let doc = store.get_document("vehicles", &id).await.unwrap().unwrap();
        assert_eq!(doc.data["make"], "Toyota");
    }

    #[tokio::test]
    async fn test_update_merges_keys_and_removes_nulls() {
        let store = LocalStore::new();
        let id = store
            .create_document("vehicles", json!({"make": "Toyota", "status": "ACTIVE"}))
            .await
            .unwrap();
        store
            .update_document("vehicles", &id, json!({"status": "WORKSHOP", "make": null}))
            .await
            .unwrap();
        let doc = store.get_document("vehicles", &id).await.unwrap().unwrap();
        assert_eq!(doc.data["status"], "WORKSHOP");
        assert!(doc.data.get("make").is_none());
    }

    #[tokio::test]
    async fn test_update_missing_document_is_not_found() {
        let store = LocalStore::new();
        let result = store
            .update_document("vehicles", "missing", json!({"a": 1}))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_query_with_field_filter_and_limit() {
        let store = LocalStore::new();
        for status in ["ACTIVE", "ACTIVE", "WORKSHOP"] {
            store
                .create_document("vehicles", json!({ "status": status }))
                .await
                .unwrap();
        }
        let active = store
            .query_collection("vehicles", CollectionQuery::field_eq("status", json!("ACTIVE")))
            .await
            .unwrap();
        assert_eq!(active.len(), 2);

        let limited = store
            .query_collection("vehicles", CollectionQuery::all().with_limit(1))
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_subscription_receives_full_snapshot_on_change() {
        let store = LocalStore::new();
        let mut rx = store.subscribe_collection("vehicles").await;
        store
            .create_document("vehicles", json!({"make": "Ford"}))
            .await
            .unwrap();
        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.collection, "vehicles");
        assert_eq!(snapshot.documents.len(), 1);

        store
            .create_document("vehicles", json!({"make": "CAT"}))
            .await
            .unwrap();
        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.documents.len(), 2);
    }
}
