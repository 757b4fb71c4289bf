//! Bulk import DTOs shared by the preview and commit pipeline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{OpportunityRecord, OrganizerRecord, SchoolRecord};

/// One parsed CSV data row: cells keyed by header plus the 1-based line
/// the record started on (header line is 1, so the first data row is
/// usually 2). The index is the identifier threaded through every
/// validation and commit failure report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRow {
    pub index: u32,
    pub raw: HashMap<String, String>,
}

/// Normalized record, tagged by entity type at the Rust level but
/// serialized as the bare record on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportRecord {
    Opportunity(OpportunityRecord),
    School(SchoolRecord),
    Organizer(OrganizerRecord),
}

impl ImportRecord {
    /// Explicit document id supplied in the CSV, if any.
    pub fn explicit_id(&self) -> Option<&str> {
        match self {
            Self::Opportunity(r) => r.id.as_deref(),
            Self::School(r) => r.id.as_deref(),
            Self::Organizer(r) => r.id.as_deref(),
        }
    }

    /// Human-facing name used to derive a natural key when no id is given.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Opportunity(r) => &r.title,
            Self::School(r) => &r.name,
            Self::Organizer(r) => &r.name,
        }
    }
}

/// Outcome of validating one row. `data` is `Some` iff `errors` is empty.
#[derive(Debug, Clone)]
pub struct RowValidation {
    pub data: Option<ImportRecord>,
    pub errors: Vec<String>,
}

impl RowValidation {
    pub fn ok(data: ImportRecord) -> Self {
        Self { data: Some(data), errors: Vec::new() }
    }

    pub fn failed(errors: Vec<String>) -> Self {
        Self { data: None, errors }
    }
}

/// Whether a persisted row created a new document or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistOutcome {
    Created,
    Updated,
}

// =============================================================================
// PREVIEW
// =============================================================================

/// One row of the preview report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    pub index: u32,
    pub raw: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ImportRecord>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewTotals {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

/// Full per-row validation report, returned without writing anything
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewReport {
    pub headers: Vec<String>,
    pub rows: Vec<PreviewRow>,
    pub totals: PreviewTotals,
}

// =============================================================================
// COMMIT
// =============================================================================

/// One row failure in the commit report. `index` is `None` for payload
/// entries so malformed that their source row could not be identified.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitFailure {
    pub index: Option<u32>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Outcome report of a commit call: aggregate counts plus the complete
/// failure list, so partial success is explicit and actionable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitReport {
    pub summary: CommitSummary,
    pub failed: Vec<CommitFailure>,
}

// =============================================================================
// HANDLER PAYLOADS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    pub entity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub entity: String,
    pub file_content: String,
}

/// Commit accepts the exact row shape preview returned, as loose JSON so
/// malformed entries can be detected and reported instead of failing the
/// whole request at deserialization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub entity: String,
    pub rows: Vec<serde_json::Value>,
}
