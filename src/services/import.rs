//! Preview and commit orchestration for CSV bulk imports.
//!
//! Preview parses, snapshots and validates without writing anything;
//! commit re-validates from raw input against a fresh snapshot and
//! persists row by row. Reference data or row content may have changed
//! between the two calls, so client-held validation results are never
//! trusted.

use serde_json::Value;
use tracing::info;

use crate::services::csv::parse_records;
use crate::services::persist::persist_record;
use crate::services::snapshot::ReferenceSnapshot;
use crate::services::validate::validate_row;
use crate::store::DocumentStore;
use crate::types::{
    BulkEntity, CommitFailure, CommitReport, CommitSummary, PersistOutcome, PreviewReport,
    PreviewRow, PreviewTotals, RawRow,
};

/// Ceiling on rows per batch; guards against pathological uploads.
pub const MAX_IMPORT_ROWS: usize = 500;

/// Batch-level structural failures. Per-row problems never surface here —
/// they are recovered into the report structures instead.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("The uploaded file is empty")]
    EmptyFile,
    #[error("No header row detected in CSV")]
    NoHeader,
    #[error("No data rows found in the CSV. Add at least one row below the header")]
    NoDataRows,
    #[error(
        "The uploaded file contains {0} rows. The maximum supported per import is {max}. Please split the file and try again",
        max = MAX_IMPORT_ROWS
    )]
    RowLimitExceeded(usize),
    #[error("No valid rows supplied for import")]
    NoValidRows,
    #[error("Failed to parse CSV: {0}")]
    Parse(String),
    #[error("Failed to load reference data: {0}")]
    Snapshot(String),
}

impl ImportError {
    /// Stable wire code for the error response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyFile => "EMPTY_FILE",
            Self::NoHeader => "NO_HEADER_ROW",
            Self::NoDataRows => "NO_DATA_ROWS",
            Self::RowLimitExceeded(_) => "ROW_LIMIT_EXCEEDED",
            Self::NoValidRows => "NO_VALID_ROWS",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Snapshot(_) => "SNAPSHOT_ERROR",
        }
    }
}

/// Validate an uploaded file end to end without touching the store.
pub async fn preview_batch(
    entity: BulkEntity,
    file_text: &str,
    store: &dyn DocumentStore,
) -> Result<PreviewReport, ImportError> {
    if file_text.trim().is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let parsed = parse_records(file_text).map_err(|e| ImportError::Parse(e.to_string()))?;
    if parsed.headers.is_empty() {
        return Err(ImportError::NoHeader);
    }
    if parsed.rows.len() > MAX_IMPORT_ROWS {
        return Err(ImportError::RowLimitExceeded(parsed.rows.len()));
    }
    if parsed.rows.is_empty() {
        return Err(ImportError::NoDataRows);
    }

    let snapshot = ReferenceSnapshot::build(entity, store)
        .await
        .map_err(|e| ImportError::Snapshot(e.to_string()))?;

    let rows: Vec<PreviewRow> = parsed
        .rows
        .into_iter()
        .map(|row| {
            let validation = validate_row(entity, &row.raw, &snapshot);
            PreviewRow {
                index: row.index,
                raw: row.raw,
                data: validation.data,
                errors: validation.errors,
            }
        })
        .collect();

    let valid = rows.iter().filter(|row| row.errors.is_empty()).count();
    let totals = PreviewTotals {
        total: rows.len(),
        valid,
        invalid: rows.len() - valid,
    };

    info!(
        entity = %entity,
        total = totals.total,
        valid = totals.valid,
        "import preview complete"
    );

    Ok(PreviewReport { headers: parsed.headers, rows, totals })
}

/// Interpret one commit payload entry. Entries without an object `raw`
/// are malformed; well-formed entries get their cell values stringified
/// and, when `index` is missing, a positional fallback matching how
/// preview would have numbered them.
fn normalize_commit_row(entry: &Value, position: usize) -> Option<RawRow> {
    let obj = entry.as_object()?;
    let raw_obj = obj.get("raw")?.as_object()?;

    let index = obj
        .get("index")
        .and_then(Value::as_u64)
        .map(|i| i as u32)
        .unwrap_or((position + 2) as u32);

    let raw = raw_obj
        .iter()
        .map(|(key, value)| {
            let cell = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key.clone(), cell)
        })
        .collect();

    Some(RawRow { index, raw })
}

/// Re-validate and persist the submitted rows, one at a time, in order.
///
/// A row failing validation or persistence lands in `failed` and the batch
/// moves on; one bad row never poisons the rest. Malformed payload entries
/// (index `None`) are appended after the row-ordered failures.
pub async fn commit_batch(
    entity: BulkEntity,
    rows: &[Value],
    store: &dyn DocumentStore,
) -> Result<CommitReport, ImportError> {
    let mut well_formed: Vec<RawRow> = Vec::new();
    let mut malformed: Vec<CommitFailure> = Vec::new();

    for (position, entry) in rows.iter().enumerate() {
        match normalize_commit_row(entry, position) {
            Some(row) => well_formed.push(row),
            None => malformed.push(CommitFailure {
                index: None,
                errors: vec!["Row payload is malformed".to_string()],
            }),
        }
    }

    if well_formed.is_empty() {
        return Err(ImportError::NoValidRows);
    }
    if well_formed.len() > MAX_IMPORT_ROWS {
        return Err(ImportError::RowLimitExceeded(well_formed.len()));
    }

    let snapshot = ReferenceSnapshot::build(entity, store)
        .await
        .map_err(|e| ImportError::Snapshot(e.to_string()))?;

    let total = well_formed.len() + malformed.len();
    let mut created = 0usize;
    let mut updated = 0usize;
    let mut failed: Vec<CommitFailure> = Vec::new();

    for row in &well_formed {
        let validation = validate_row(entity, &row.raw, &snapshot);
        if !validation.errors.is_empty() {
            failed.push(CommitFailure { index: Some(row.index), errors: validation.errors });
            continue;
        }

        let record = match validation.data {
            Some(record) => record,
            None => {
                failed.push(CommitFailure {
                    index: Some(row.index),
                    errors: vec!["Row failed validation".to_string()],
                });
                continue;
            }
        };

        match persist_record(entity, store, &record).await {
            Ok(PersistOutcome::Created) => created += 1,
            Ok(PersistOutcome::Updated) => updated += 1,
            Err(e) => failed.push(CommitFailure {
                index: Some(row.index),
                errors: vec![format!("Failed to persist record: {e}")],
            }),
        }
    }

    failed.extend(malformed);

    info!(
        entity = %entity,
        total,
        created,
        updated,
        failed = failed.len(),
        "import commit complete"
    );

    Ok(CommitReport {
        summary: CommitSummary { total, created, updated, failed: failed.len() },
        failed,
    })
}
