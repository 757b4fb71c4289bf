//! Postgres-backed document store: one JSONB row per document.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;

use super::{generate_doc_id, Document, DocumentStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_document(id: String, data: Value) -> Document {
    let data = match data {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Document { id, data }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let row: Option<(Value,)> = sqlx::query_as(
            "SELECT data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(data,)| into_document(id.to_string(), data)))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let rows: Vec<(String, Value)> = sqlx::query_as(
            "SELECT id, data FROM documents WHERE collection = $1 ORDER BY id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, data)| into_document(id, data))
            .collect())
    }

    async fn set(&self, collection: &str, id: &str, data: Map<String, Value>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE
                SET data = EXCLUDED.data,
                    updated_at = now()
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_merge(&self, collection: &str, id: &str, data: Map<String, Value>) -> Result<()> {
        // JSONB || is a shallow merge: keys in the new data win, the rest stay.
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE
                SET data = documents.data || EXCLUDED.data,
                    updated_at = now()
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn add(&self, collection: &str, data: Map<String, Value>) -> Result<String> {
        let id = generate_doc_id();
        self.set(collection, &id, data).await?;
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
