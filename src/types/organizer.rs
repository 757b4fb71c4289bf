//! Organizer import record and its field enums.

use serde::{Deserialize, Serialize};

/// Kind of organization behind an opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizerType {
    Government,
    Private,
    Ngo,
    International,
    Other,
}

pub const ALLOWED_ORGANIZER_TYPES: &str = "government, private, ngo, international, other";

pub fn parse_organizer_type(s: &str) -> Option<OrganizerType> {
    match s.to_lowercase().as_str() {
        "government" => Some(OrganizerType::Government),
        "private" => Some(OrganizerType::Private),
        "ngo" => Some(OrganizerType::Ngo),
        "international" => Some(OrganizerType::International),
        "other" => Some(OrganizerType::Other),
        _ => None,
    }
}

impl Default for OrganizerType {
    fn default() -> Self {
        Self::Other
    }
}

/// Listing visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

pub fn parse_visibility(s: &str) -> Option<Visibility> {
    match s.to_lowercase().as_str() {
        "public" => Some(Visibility::Public),
        "private" => Some(Visibility::Private),
        _ => None,
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Public
    }
}

/// Normalized organizer row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerRecord {
    #[serde(skip)]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foundation_year: Option<i64>,
    #[serde(rename = "type")]
    pub organizer_type: OrganizerType,
    pub visibility: Visibility,
    pub is_verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_organizer_type() {
        assert_eq!(parse_organizer_type("Government"), Some(OrganizerType::Government));
        assert_eq!(parse_organizer_type("NGO"), Some(OrganizerType::Ngo));
        assert_eq!(parse_organizer_type("charity"), None);
    }

    #[test]
    fn test_parse_visibility() {
        assert_eq!(parse_visibility("PUBLIC"), Some(Visibility::Public));
        assert_eq!(parse_visibility("hidden"), None);
    }

    #[test]
    fn test_type_serializes_with_wire_name() {
        let record = OrganizerRecord {
            id: None,
            name: "Acme Foundation".into(),
            address: None,
            website: None,
            foundation_year: Some(2001),
            organizer_type: OrganizerType::Private,
            visibility: Visibility::Public,
            is_verified: true,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "private");
        assert_eq!(value["visibility"], "public");
        assert_eq!(value["foundationYear"], 2001);
        assert!(value.get("address").is_none());
    }
}
