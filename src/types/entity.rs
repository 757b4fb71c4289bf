//! The closed set of bulk-importable entity types.

use serde::{Deserialize, Serialize};

/// Entity kinds supported by the bulk import pipeline.
///
/// Adding a new kind means adding a validator, a snapshot dependency
/// declaration and a template definition — nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkEntity {
    Opportunities,
    Schools,
    Organizers,
}

impl BulkEntity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "opportunities" => Some(Self::Opportunities),
            "schools" => Some(Self::Schools),
            "organizers" => Some(Self::Organizers),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opportunities => "opportunities",
            Self::Schools => "schools",
            Self::Organizers => "organizers",
        }
    }

    /// Store collection the entity's documents live in.
    pub fn collection(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for BulkEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
