pub mod document_store;

pub use document_store::{next_id, Document, DocumentStore};
