//! Firestore-like document store abstraction.
//!
//! The import pipeline only needs get/list/set/merge/add/delete over
//! collections of JSON documents, so that is the whole seam. Production
//! runs on Postgres JSONB; tests run on the in-memory implementation.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use serde_json::{Map, Value};

/// One stored document: its id plus the JSON object body.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Document {
    /// String field accessor; missing and non-string both read as `None`.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(Value::as_str)
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Fetch every document in a collection. Reference collections are
    /// small (tens to low thousands of rows), so full scans are fine here.
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Create or replace the document at `id`.
    async fn set(&self, collection: &str, id: &str, data: Map<String, Value>) -> Result<()>;

    /// Create or shallow-merge into the document at `id`: top-level keys
    /// present in `data` overwrite, keys absent are left untouched.
    async fn set_merge(&self, collection: &str, id: &str, data: Map<String, Value>) -> Result<()>;

    /// Insert a new document under a generated id; returns the id.
    async fn add(&self, collection: &str, data: Map<String, Value>) -> Result<String>;

    /// Remove a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}

const DOC_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const DOC_ID_LEN: usize = 20;

/// Generate a random 20-character alphanumeric document id.
pub fn generate_doc_id() -> String {
    let mut rng = rand::thread_rng();
    (0..DOC_ID_LEN)
        .map(|_| DOC_ID_ALPHABET[rng.gen_range(0..DOC_ID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_well_formed() {
        let id = generate_doc_id();
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(generate_doc_id(), generate_doc_id());
    }

    #[test]
    fn test_str_field_reads_only_strings() {
        let mut data = Map::new();
        data.insert("name".into(), Value::String("Acme".into()));
        data.insert("year".into(), Value::from(2001));
        let doc = Document { id: "x".into(), data };
        assert_eq!(doc.str_field("name"), Some("Acme"));
        assert_eq!(doc.str_field("year"), None);
        assert_eq!(doc.str_field("missing"), None);
    }
}
