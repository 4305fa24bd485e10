pub mod document_store;
pub mod local_store;
pub mod remote_store;
pub mod seed;

pub use document_store::{BatchOp, CollectionQuery, CollectionSnapshot, Document, DocumentStore};
pub use local_store::LocalStore;
pub use remote_store::RemoteStore;
