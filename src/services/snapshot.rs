//! Per-batch reference data snapshot.
//!
//! Master-data collections are small, so each preview/commit call loads
//! its dependencies in full and resolves foreign-key-like cells against
//! in-memory lookup tables. Nothing here is cached across requests;
//! staleness is bounded to a single batch.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::store::{Document, DocumentStore};
use crate::types::BulkEntity;

/// Home segment keys that exist even on an empty deployment; documents in
/// the `homeSegments` collection overlay these.
const FALLBACK_SEGMENT_KEYS: &[&str] = &["featured", "trending", "scholarships", "competitions"];

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// One reference collection indexed by id and by normalized name.
#[derive(Debug, Default)]
pub struct RefTable {
    by_id: HashMap<String, Document>,
    by_name: HashMap<String, Document>,
}

impl RefTable {
    pub fn build(docs: Vec<Document>, name_field: &str) -> Self {
        let mut table = Self::default();
        for doc in docs {
            if let Some(name) = doc.str_field(name_field) {
                let key = normalize(name);
                if !key.is_empty() {
                    table.by_name.insert(key, doc.clone());
                }
            }
            table.by_id.insert(doc.id.clone(), doc);
        }
        table
    }

    /// Resolve a cell value: direct id match first, then a
    /// case/whitespace-insensitive name match.
    pub fn resolve(&self, reference: &str) -> Option<&Document> {
        let reference = reference.trim();
        self.by_id
            .get(reference)
            .or_else(|| self.by_name.get(&normalize(reference)))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Read-only lookup tables for one import batch. Only the tables the
/// entity type depends on are populated; the rest stay empty.
#[derive(Debug, Default)]
pub struct ReferenceSnapshot {
    pub categories: RefTable,
    pub organizers: RefTable,
    pub segments: RefTable,
    pub countries: RefTable,
    pub states: RefTable,
    pub cities: RefTable,
}

impl ReferenceSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fetch and index every reference collection the entity depends on.
    ///
    /// A failed fetch fails the whole build — validating against a partial
    /// snapshot would mislabel every reference in the batch as invalid.
    pub async fn build(entity: BulkEntity, store: &dyn DocumentStore) -> Result<Self> {
        let mut snapshot = Self::empty();

        match entity {
            BulkEntity::Opportunities => {
                let (categories, organizers, segments) = tokio::try_join!(
                    store.list("categories"),
                    store.list("organizers"),
                    store.list("homeSegments"),
                )
                .context("fetching opportunity reference collections")?;

                snapshot.categories = RefTable::build(categories, "name");
                snapshot.organizers = RefTable::build(organizers, "name");
                snapshot.segments = RefTable::build(with_fallback_segments(segments), "segmentKey");
            }
            BulkEntity::Schools => {
                let (countries, states, cities) = tokio::try_join!(
                    store.list("countries"),
                    store.list("states"),
                    store.list("cities"),
                )
                .context("fetching geography reference collections")?;

                snapshot.countries = RefTable::build(countries, "name");
                snapshot.states = RefTable::build(states, "name");
                snapshot.cities = RefTable::build(cities, "name");
            }
            BulkEntity::Organizers => {}
        }

        Ok(snapshot)
    }
}

fn with_fallback_segments(mut docs: Vec<Document>) -> Vec<Document> {
    let mut seeded: Vec<Document> = FALLBACK_SEGMENT_KEYS
        .iter()
        .map(|key| {
            let mut data = Map::new();
            data.insert("segmentKey".to_string(), Value::String((*key).to_string()));
            Document { id: (*key).to_string(), data }
        })
        .collect();
    seeded.append(&mut docs);
    seeded
}
