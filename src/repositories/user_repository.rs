//! Repositorio de usuarios
//!
//! Acceso a la colección `users` del almacén de documentos.

use std::sync::Arc;

use serde_json::json;

use crate::models::user::UserDocument;
use crate::storage::{CollectionQuery, DocumentStore};
use crate::utils::errors::AppResult;

const COLLECTION: &str = "users";

pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, user: &UserDocument) -> AppResult<String> {
        let data = crate::storage::document_store::to_document_data(user)?;
        self.store.create_document(COLLECTION, data).await
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<UserDocument>> {
        let document = self.store.get_document(COLLECTION, id).await?;
        match document {
            Some(doc) => Ok(Some(doc.to_model()?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<UserDocument>> {
        let documents = self
            .store
            .query_collection(
                COLLECTION,
                CollectionQuery::field_eq("email", json!(email)).with_limit(1),
            )
            .await?;
        match documents.first() {
            Some(doc) => Ok(Some(doc.to_model()?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<UserDocument>> {
        let documents = self
            .store
            .query_collection(COLLECTION, CollectionQuery::all())
            .await?;
        documents.iter().map(|doc| doc.to_model()).collect()
    }

    /// Chequeo de existencia para el bootstrap del primer administrador
    pub async fn any_exists(&self) -> AppResult<bool> {
        let documents = self
            .store
            .query_collection(COLLECTION, CollectionQuery::all().with_limit(1))
            .await?;
        Ok(!documents.is_empty())
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete_document(COLLECTION, id).await
    }
}
