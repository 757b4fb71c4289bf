//! Opportunity import record and its field enums.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Delivery mode of an opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityMode {
    Online,
    Offline,
    Hybrid,
}

pub const ALLOWED_OPPORTUNITY_MODES: &str = "online, offline, hybrid";

pub fn parse_opportunity_mode(s: &str) -> Option<OpportunityMode> {
    match s.to_lowercase().as_str() {
        "online" => Some(OpportunityMode::Online),
        "offline" => Some(OpportunityMode::Offline),
        "hybrid" => Some(OpportunityMode::Hybrid),
        _ => None,
    }
}

impl Default for OpportunityMode {
    fn default() -> Self {
        Self::Online
    }
}

/// Publication status of an opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityStatus {
    Draft,
    Approved,
    Published,
}

pub const ALLOWED_OPPORTUNITY_STATUSES: &str = "draft, approved, published";

pub fn parse_opportunity_status(s: &str) -> Option<OpportunityStatus> {
    match s.to_lowercase().as_str() {
        "draft" => Some(OpportunityStatus::Draft),
        "approved" => Some(OpportunityStatus::Approved),
        "published" => Some(OpportunityStatus::Published),
        _ => None,
    }
}

impl Default for OpportunityStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// Normalized opportunity row, safe to persist once validation passed.
///
/// `id` is the natural key, not document data — it is skipped during
/// serialization so it never lands inside the stored document body.
/// Optional fields are skipped when absent so an update merge never
/// clobbers existing values with nulls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityRecord {
    #[serde(skip)]
    pub id: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer_logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub mode: OpportunityMode,
    pub status: OpportunityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_eligibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub segments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub eligibility: Vec<String>,
    pub benefits: Vec<String>,
    pub registration_process: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_website: Option<String>,
}
