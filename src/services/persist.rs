//! Create-or-update persistence for validated import records.

use anyhow::{anyhow, Result};
use chrono::Utc;
use serde_json::{Map, Value};

use crate::store::DocumentStore;
use crate::types::{BulkEntity, ImportRecord, PersistOutcome};

/// Lowercased, alphanumeric runs joined with `-`. "STEM Foundation" → "stem-foundation".
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Natural key for a record: the explicit id when the CSV carried one,
/// otherwise a slug of the display name. Empty when neither yields a
/// usable key (the caller then creates under a generated id).
pub fn natural_key(record: &ImportRecord) -> String {
    match record.explicit_id() {
        Some(id) => id.to_string(),
        None => slugify(record.display_name()),
    }
}

fn record_data(record: &ImportRecord) -> Result<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("record serialized to non-object value: {other}")),
    }
}

/// Upsert one validated record into the entity's collection.
///
/// Existing document at the natural key → shallow merge (absent optional
/// fields were skipped at serialization, so they never clobber stored
/// values) and `Updated`. Missing → create with `createdAt` and `Created`.
/// Every write refreshes `updatedAt`.
pub async fn persist_record(
    entity: BulkEntity,
    store: &dyn DocumentStore,
    record: &ImportRecord,
) -> Result<PersistOutcome> {
    let collection = entity.collection();
    let now = Utc::now().to_rfc3339();

    let mut data = record_data(record)?;
    data.insert("updatedAt".to_string(), Value::String(now.clone()));

    let key = natural_key(record);
    if key.is_empty() {
        data.insert("createdAt".to_string(), Value::String(now));
        store.add(collection, data).await?;
        return Ok(PersistOutcome::Created);
    }

    match store.get(collection, &key).await? {
        Some(_) => {
            store.set_merge(collection, &key, data).await?;
            Ok(PersistOutcome::Updated)
        }
        None => {
            data.insert("createdAt".to_string(), Value::String(now));
            store.set(collection, &key, data).await?;
            Ok(PersistOutcome::Created)
        }
    }
}
