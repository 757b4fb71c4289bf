//! Per-entity row validators.
//!
//! Each validator is pure and total: it takes one raw record plus the
//! batch snapshot and returns either a normalized record or the full list
//! of problems with that row. Errors accumulate — a user fixing a CSV
//! should see every problem in one round-trip, not one at a time.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::services::coerce::{cell, opt_string, parse_boolish, parse_finite_number, split_list};
use crate::services::snapshot::{RefTable, ReferenceSnapshot};
use crate::types::{
    parse_opportunity_mode, parse_opportunity_status, parse_organizer_type, parse_visibility,
    BulkEntity, ImportRecord, OpportunityRecord, OrganizerRecord, RowValidation, SchoolRecord,
    ALLOWED_OPPORTUNITY_MODES, ALLOWED_OPPORTUNITY_STATUSES, ALLOWED_ORGANIZER_TYPES,
};

/// Validate one raw row for the given entity type.
pub fn validate_row(
    entity: BulkEntity,
    raw: &HashMap<String, String>,
    snapshot: &ReferenceSnapshot,
) -> RowValidation {
    match entity {
        BulkEntity::Opportunities => validate_opportunity_row(raw, snapshot),
        BulkEntity::Schools => validate_school_row(raw, snapshot),
        BulkEntity::Organizers => validate_organizer_row(raw),
    }
}

/// Resolve an id-or-name reference pair against one reference table.
///
/// The id cell is tried first, then the name cell; each candidate gets a
/// direct id match before the normalized-name fallback. An unresolved
/// candidate becomes a row error naming the field and the offending value.
fn resolve_reference(
    table: &RefTable,
    candidates: &[Option<String>],
    label: &str,
    errors: &mut Vec<String>,
) -> (Option<String>, Option<String>) {
    let mut unresolved = None;
    for candidate in candidates.iter().flatten() {
        match table.resolve(candidate) {
            Some(doc) => {
                let name = doc.str_field("name").map(str::to_string);
                return (Some(doc.id.clone()), name);
            }
            None => unresolved = Some(candidate.clone()),
        }
    }
    if let Some(value) = unresolved {
        errors.push(format!("{label} \"{value}\" was not found"));
    }
    (None, None)
}

fn date_field(
    raw: &HashMap<String, String>,
    key: &str,
    label: &str,
    errors: &mut Vec<String>,
) -> Option<NaiveDate> {
    let value = cell(raw, key);
    if value.is_empty() {
        return None;
    }
    match crate::services::coerce::parse_date(value) {
        Some(date) => Some(date),
        None => {
            errors.push(format!("{label} must be a valid date (use YYYY-MM-DD)"));
            None
        }
    }
}

fn validate_opportunity_row(
    raw: &HashMap<String, String>,
    snapshot: &ReferenceSnapshot,
) -> RowValidation {
    let mut errors = Vec::new();

    let title = cell(raw, "title").to_string();
    if title.is_empty() {
        errors.push("Title is required".to_string());
    }

    let mode_raw = cell(raw, "mode");
    let mode = if mode_raw.is_empty() {
        Default::default()
    } else {
        match parse_opportunity_mode(mode_raw) {
            Some(mode) => mode,
            None => {
                errors.push(format!("Mode must be one of: {ALLOWED_OPPORTUNITY_MODES}"));
                Default::default()
            }
        }
    };

    let status_raw = cell(raw, "status");
    let status = if status_raw.is_empty() {
        Default::default()
    } else {
        match parse_opportunity_status(status_raw) {
            Some(status) => status,
            None => {
                errors.push(format!("Status must be one of: {ALLOWED_OPPORTUNITY_STATUSES}"));
                Default::default()
            }
        }
    };

    let category = [opt_string(raw, "categoryId"), opt_string(raw, "categoryName")];
    let (category_id, category_name) =
        resolve_reference(&snapshot.categories, &category, "Category", &mut errors);

    let organizer = [opt_string(raw, "organizerId"), opt_string(raw, "organizerName")];
    let (organizer_id, organizer_name) =
        resolve_reference(&snapshot.organizers, &organizer, "Organizer", &mut errors);

    let registration_deadline =
        date_field(raw, "registrationDeadline", "Registration deadline", &mut errors);
    let start_date = date_field(raw, "startDate", "Start date", &mut errors);
    let end_date = date_field(raw, "endDate", "End date", &mut errors);

    let mut segments: Vec<String> = Vec::new();
    for segment in split_list(cell(raw, "segments")) {
        match snapshot.segments.resolve(&segment) {
            Some(doc) => {
                let canonical = doc
                    .str_field("segmentKey")
                    .unwrap_or(doc.id.as_str())
                    .to_string();
                if !segments.contains(&canonical) {
                    segments.push(canonical);
                }
            }
            None => errors.push(format!("Segment \"{segment}\" is not recognised")),
        }
    }

    let contact_email = opt_string(raw, "contactEmail");
    if let Some(ref email) = contact_email {
        if !email.contains('@') {
            errors.push("Contact email appears to be invalid".to_string());
        }
    }

    if !errors.is_empty() {
        return RowValidation::failed(errors);
    }

    RowValidation::ok(ImportRecord::Opportunity(OpportunityRecord {
        id: opt_string(raw, "id"),
        title,
        organizer_id,
        organizer_name,
        organizer_logo: opt_string(raw, "organizerLogo"),
        category_id,
        category_name,
        mode,
        status,
        grade_eligibility: opt_string(raw, "gradeEligibility"),
        registration_deadline,
        start_date,
        end_date,
        fee: opt_string(raw, "fee"),
        state: opt_string(raw, "state"),
        currency: opt_string(raw, "currency").map(|c| c.to_uppercase()),
        segments,
        description: opt_string(raw, "description"),
        eligibility: split_list(cell(raw, "eligibility")),
        benefits: split_list(cell(raw, "benefits")),
        registration_process: split_list(cell(raw, "registrationProcess")),
        image: opt_string(raw, "image"),
        contact_email,
        contact_phone: opt_string(raw, "contactPhone"),
        contact_website: opt_string(raw, "contactWebsite"),
    }))
}

fn validate_school_row(
    raw: &HashMap<String, String>,
    snapshot: &ReferenceSnapshot,
) -> RowValidation {
    let mut errors = Vec::new();

    let name = cell(raw, "name").to_string();
    if name.is_empty() {
        errors.push("Name is required".to_string());
    }

    let (country_id, country) = resolve_reference(
        &snapshot.countries,
        &[opt_string(raw, "country")],
        "Country",
        &mut errors,
    );
    let (state_id, state) = resolve_reference(
        &snapshot.states,
        &[opt_string(raw, "state")],
        "State",
        &mut errors,
    );
    let (city_id, city) = resolve_reference(
        &snapshot.cities,
        &[opt_string(raw, "city")],
        "City",
        &mut errors,
    );

    if !errors.is_empty() {
        return RowValidation::failed(errors);
    }

    RowValidation::ok(ImportRecord::School(SchoolRecord {
        id: opt_string(raw, "id"),
        name,
        city_id,
        city,
        state_id,
        state,
        country_id,
        country,
        is_verified: parse_boolish(cell(raw, "isVerified")),
    }))
}

fn validate_organizer_row(raw: &HashMap<String, String>) -> RowValidation {
    let mut errors = Vec::new();

    let name = cell(raw, "name").to_string();
    if name.is_empty() {
        errors.push("Name is required".to_string());
    }

    let type_raw = cell(raw, "type");
    let organizer_type = if type_raw.is_empty() {
        Default::default()
    } else {
        match parse_organizer_type(type_raw) {
            Some(t) => t,
            None => {
                errors.push(format!("Type must be one of: {ALLOWED_ORGANIZER_TYPES}"));
                Default::default()
            }
        }
    };

    let visibility_raw = cell(raw, "visibility");
    let visibility = if visibility_raw.is_empty() {
        Default::default()
    } else {
        match parse_visibility(visibility_raw) {
            Some(v) => v,
            None => {
                errors.push("Visibility must be either public or private".to_string());
                Default::default()
            }
        }
    };

    // Lenient numeric: a non-numeric year reads as absent, never an error.
    let foundation_year =
        parse_finite_number(cell(raw, "foundationYear")).map(|year| year as i64);

    if !errors.is_empty() {
        return RowValidation::failed(errors);
    }

    RowValidation::ok(ImportRecord::Organizer(OrganizerRecord {
        id: opt_string(raw, "id"),
        name,
        address: opt_string(raw, "address"),
        website: opt_string(raw, "website"),
        foundation_year,
        organizer_type,
        visibility,
        is_verified: parse_boolish(cell(raw, "isVerified")),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Document;
    use crate::types::{OpportunityMode, OpportunityStatus, OrganizerType, Visibility};
    use serde_json::json;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn doc(id: &str, data: serde_json::Value) -> Document {
        Document {
            id: id.to_string(),
            data: data.as_object().cloned().unwrap_or_default(),
        }
    }

    fn opportunity_snapshot() -> ReferenceSnapshot {
        let mut snapshot = ReferenceSnapshot::empty();
        snapshot.categories = RefTable::build(
            vec![doc("cat-science", json!({"name": "Science & STEM"}))],
            "name",
        );
        snapshot.organizers = RefTable::build(
            vec![doc("org-acme", json!({"name": "Acme Foundation"}))],
            "name",
        );
        snapshot.segments = RefTable::build(
            vec![doc("seg-1", json!({"segmentKey": "featured"}))],
            "segmentKey",
        );
        snapshot
    }

    fn school_snapshot() -> ReferenceSnapshot {
        let mut snapshot = ReferenceSnapshot::empty();
        snapshot.countries =
            RefTable::build(vec![doc("in", json!({"name": "India"}))], "name");
        snapshot.states =
            RefTable::build(vec![doc("ka", json!({"name": "Karnataka"}))], "name");
        snapshot.cities =
            RefTable::build(vec![doc("blr", json!({"name": "Bengaluru"}))], "name");
        snapshot
    }

    // ---- organizers ----

    #[test]
    fn test_organizer_valid_row() {
        let raw = row(&[
            ("name", "Acme Foundation"),
            ("type", "private"),
            ("visibility", "public"),
            ("foundationYear", "2001"),
            ("isVerified", "yes"),
        ]);
        let result = validate_organizer_row(&raw);

        assert!(result.errors.is_empty());
        match result.data.unwrap() {
            ImportRecord::Organizer(record) => {
                assert_eq!(record.name, "Acme Foundation");
                assert_eq!(record.organizer_type, OrganizerType::Private);
                assert_eq!(record.visibility, Visibility::Public);
                assert_eq!(record.foundation_year, Some(2001));
                assert!(record.is_verified);
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn test_organizer_missing_name() {
        let raw = row(&[("name", "  "), ("type", "private")]);
        let result = validate_organizer_row(&raw);

        assert!(result.data.is_none());
        assert_eq!(result.errors, vec!["Name is required"]);
    }

    #[test]
    fn test_organizer_bad_enum_names_allowed_values() {
        let raw = row(&[("name", "Beta Inc"), ("type", "unknown-type")]);
        let result = validate_organizer_row(&raw);

        assert_eq!(
            result.errors,
            vec!["Type must be one of: government, private, ngo, international, other"]
        );
    }

    #[test]
    fn test_organizer_accumulates_all_errors() {
        let raw = row(&[("name", ""), ("type", "syndicate"), ("visibility", "hidden")]);
        let result = validate_organizer_row(&raw);

        assert_eq!(result.errors.len(), 3);
        assert!(result.errors.contains(&"Name is required".to_string()));
        assert!(result
            .errors
            .contains(&"Type must be one of: government, private, ngo, international, other".to_string()));
        assert!(result
            .errors
            .contains(&"Visibility must be either public or private".to_string()));
        assert!(result.data.is_none());
    }

    #[test]
    fn test_organizer_empty_enums_take_defaults() {
        let raw = row(&[("name", "Acme")]);
        let result = validate_organizer_row(&raw);

        assert!(result.errors.is_empty());
        match result.data.unwrap() {
            ImportRecord::Organizer(record) => {
                assert_eq!(record.organizer_type, OrganizerType::Other);
                assert_eq!(record.visibility, Visibility::Public);
                assert!(!record.is_verified);
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn test_organizer_nonnumeric_year_reads_as_absent() {
        let raw = row(&[("name", "Acme"), ("foundationYear", "circa 1990")]);
        let result = validate_organizer_row(&raw);

        assert!(result.errors.is_empty());
        match result.data.unwrap() {
            ImportRecord::Organizer(record) => assert_eq!(record.foundation_year, None),
            other => panic!("unexpected record: {other:?}"),
        }
    }

    // ---- opportunities ----

    #[test]
    fn test_opportunity_resolves_category_and_organizer_by_name() {
        let raw = row(&[
            ("title", "National Science Olympiad"),
            ("categoryName", "  science & stem "),
            ("organizerName", "ACME FOUNDATION"),
            ("mode", "online"),
            ("status", "published"),
        ]);
        let result = validate_opportunity_row(&raw, &opportunity_snapshot());

        assert!(result.errors.is_empty(), "{:?}", result.errors);
        match result.data.unwrap() {
            ImportRecord::Opportunity(record) => {
                assert_eq!(record.category_id.as_deref(), Some("cat-science"));
                assert_eq!(record.category_name.as_deref(), Some("Science & STEM"));
                assert_eq!(record.organizer_id.as_deref(), Some("org-acme"));
                assert_eq!(record.mode, OpportunityMode::Online);
                assert_eq!(record.status, OpportunityStatus::Published);
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn test_opportunity_unresolved_category_is_row_error() {
        let raw = row(&[("title", "Quiz"), ("categoryName", "Astrology")]);
        let result = validate_opportunity_row(&raw, &opportunity_snapshot());

        assert_eq!(result.errors, vec!["Category \"Astrology\" was not found"]);
        assert!(result.data.is_none());
    }

    #[test]
    fn test_opportunity_id_match_preferred_over_name() {
        let raw = row(&[("title", "Quiz"), ("categoryId", "cat-science")]);
        let result = validate_opportunity_row(&raw, &opportunity_snapshot());

        assert!(result.errors.is_empty());
        match result.data.unwrap() {
            ImportRecord::Opportunity(record) => {
                assert_eq!(record.category_id.as_deref(), Some("cat-science"));
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn test_opportunity_bad_date_and_bad_mode_accumulate() {
        let raw = row(&[
            ("title", "Quiz"),
            ("mode", "in-person"),
            ("startDate", "02/01/2025"),
        ]);
        let result = validate_opportunity_row(&raw, &opportunity_snapshot());

        assert_eq!(result.errors.len(), 2);
        assert!(result
            .errors
            .contains(&"Mode must be one of: online, offline, hybrid".to_string()));
        assert!(result
            .errors
            .contains(&"Start date must be a valid date (use YYYY-MM-DD)".to_string()));
    }

    #[test]
    fn test_opportunity_segments_resolve_dedup_and_report_unknown() {
        let raw = row(&[
            ("title", "Quiz"),
            ("segments", "Featured; featured; mystery"),
        ]);
        let result = validate_opportunity_row(&raw, &opportunity_snapshot());

        assert_eq!(result.errors, vec!["Segment \"mystery\" is not recognised"]);

        let raw = row(&[("title", "Quiz"), ("segments", "Featured; featured")]);
        let result = validate_opportunity_row(&raw, &opportunity_snapshot());
        assert!(result.errors.is_empty());
        match result.data.unwrap() {
            ImportRecord::Opportunity(record) => {
                assert_eq!(record.segments, vec!["featured"]);
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn test_opportunity_lists_and_currency_normalization() {
        let raw = row(&[
            ("title", "Quiz"),
            ("eligibility", "Grade 6;Grade 7"),
            ("benefits", ""),
            ("currency", "inr"),
            ("contactEmail", "contact@example.org"),
        ]);
        let result = validate_opportunity_row(&raw, &opportunity_snapshot());

        assert!(result.errors.is_empty());
        match result.data.unwrap() {
            ImportRecord::Opportunity(record) => {
                assert_eq!(record.eligibility, vec!["Grade 6", "Grade 7"]);
                assert!(record.benefits.is_empty());
                assert_eq!(record.currency.as_deref(), Some("INR"));
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn test_opportunity_email_without_at_is_flagged() {
        let raw = row(&[("title", "Quiz"), ("contactEmail", "not-an-email")]);
        let result = validate_opportunity_row(&raw, &opportunity_snapshot());

        assert_eq!(result.errors, vec!["Contact email appears to be invalid"]);
    }

    // ---- schools ----

    #[test]
    fn test_school_resolves_geography() {
        let raw = row(&[
            ("name", "Springfield High School"),
            ("city", "bengaluru"),
            ("state", "Karnataka"),
            ("country", "INDIA"),
            ("isVerified", "true"),
        ]);
        let result = validate_school_row(&raw, &school_snapshot());

        assert!(result.errors.is_empty(), "{:?}", result.errors);
        match result.data.unwrap() {
            ImportRecord::School(record) => {
                assert_eq!(record.city_id.as_deref(), Some("blr"));
                assert_eq!(record.state_id.as_deref(), Some("ka"));
                assert_eq!(record.country_id.as_deref(), Some("in"));
                assert_eq!(record.country.as_deref(), Some("India"));
                assert!(record.is_verified);
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn test_school_unknown_geography_accumulates_errors() {
        let raw = row(&[("name", ""), ("country", "Atlantis"), ("city", "Nowhere")]);
        let result = validate_school_row(&raw, &school_snapshot());

        assert_eq!(result.errors.len(), 3);
        assert!(result.errors.contains(&"Name is required".to_string()));
        assert!(result.errors.contains(&"Country \"Atlantis\" was not found".to_string()));
        assert!(result.errors.contains(&"City \"Nowhere\" was not found".to_string()));
    }

    #[test]
    fn test_school_absent_geography_is_fine() {
        let raw = row(&[("name", "Homeschool Collective")]);
        let result = validate_school_row(&raw, &school_snapshot());

        assert!(result.errors.is_empty());
        match result.data.unwrap() {
            ImportRecord::School(record) => {
                assert!(record.city_id.is_none());
                assert!(record.country.is_none());
                assert!(!record.is_verified);
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    // ---- dispatch ----

    #[test]
    fn test_dispatch_routes_by_entity() {
        let raw = row(&[("name", "Acme")]);
        let result = validate_row(BulkEntity::Organizers, &raw, &ReferenceSnapshot::empty());
        assert!(matches!(result.data, Some(ImportRecord::Organizer(_))));

        let result = validate_row(BulkEntity::Schools, &raw, &ReferenceSnapshot::empty());
        assert!(matches!(result.data, Some(ImportRecord::School(_))));
    }
}
