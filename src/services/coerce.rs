//! Field coercion helpers shared by the entity validators.
//!
//! Every validator is a thin composition of these primitives, so lenient
//! parsing behaves identically across entity types.

use std::collections::HashMap;

use chrono::NaiveDate;

/// Trimmed cell value; missing key reads as the empty string.
pub fn cell<'a>(raw: &'a HashMap<String, String>, key: &str) -> &'a str {
    raw.get(key).map(|v| v.trim()).unwrap_or("")
}

/// Non-empty trimmed cell value, `None` otherwise.
pub fn opt_string(raw: &HashMap<String, String>, key: &str) -> Option<String> {
    let value = cell(raw, key);
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Truthy tokens accepted case-insensitively; anything else is false.
pub fn parse_boolish(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "y")
}

/// Lenient numeric parse: finite numbers only, anything else is absent.
pub fn parse_finite_number(value: &str) -> Option<f64> {
    let parsed: f64 = value.trim().parse().ok()?;
    if parsed.is_finite() {
        Some(parsed)
    } else {
        None
    }
}

/// Split a list cell on `;`, `,` or `|`; entries trimmed, empties dropped.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split([';', ',', '|'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strict ISO date (the format the templates advertise).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
