//! CSV parsing and rendering for bulk imports.

use std::collections::HashMap;

use anyhow::Result;

use crate::types::RawRow;

/// Parsed upload: trimmed headers plus header-keyed data rows.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Parse an uploaded CSV body into header-keyed records.
///
/// The first non-empty record is the header row. Data rows are zipped
/// against the headers by position: short rows read as empty cells, cells
/// beyond the header count are dropped. Rows whose cells are all empty
/// after trimming are skipped entirely.
///
/// Each row's `index` is the physical line the record starts on (header
/// line is 1), taken from the reader position — so blank lines and quoted
/// multi-line fields never shift the numbering of later rows, and the
/// number matches what a user sees in their editor.
///
/// An empty input yields empty `headers`, which callers must treat as a
/// distinct "no header row" condition rather than a valid empty file.
pub fn parse_records(text: &str) -> Result<ParsedCsv, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut headers: Vec<String> = Vec::new();
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line() as u32).unwrap_or(0);

        if headers.is_empty() {
            let candidate: Vec<String> = record.iter().map(|h| h.trim().to_string()).collect();
            if candidate.iter().all(|h| h.is_empty()) {
                continue;
            }
            headers = candidate;
            continue;
        }

        let mut raw = HashMap::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            let cell = record.get(i).unwrap_or("");
            raw.insert(header.clone(), cell.trim().to_string());
        }

        if raw.values().all(|v| v.is_empty()) {
            continue;
        }

        rows.push(RawRow { index: line, raw });
    }

    Ok(ParsedCsv { headers, rows })
}

/// Render headers plus rows as CRLF-terminated CSV. Short rows are padded
/// to the header width; quoting and quote-doubling are the writer's job.
pub fn write_csv(headers: &[&str], rows: &[Vec<&str>]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        let mut padded: Vec<&str> = row.clone();
        padded.resize(headers.len(), "");
        writer.write_record(&padded)?;
    }

    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(String::from_utf8(bytes)?)
}
