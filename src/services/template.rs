//! Example CSV templates, one per entity type, used to seed user uploads.

use std::collections::HashMap;

use anyhow::Result;
use once_cell::sync::Lazy;

use crate::services::csv::write_csv;
use crate::types::BulkEntity;

struct TemplateDefinition {
    headers: &'static [&'static str],
    sample: &'static [&'static str],
}

static TEMPLATES: Lazy<HashMap<BulkEntity, TemplateDefinition>> = Lazy::new(|| {
    let mut templates = HashMap::new();

    templates.insert(
        BulkEntity::Opportunities,
        TemplateDefinition {
            headers: &[
                "id",
                "title",
                "organizerId",
                "organizerName",
                "organizerLogo",
                "categoryId",
                "categoryName",
                "mode",
                "status",
                "gradeEligibility",
                "registrationDeadline",
                "startDate",
                "endDate",
                "fee",
                "state",
                "currency",
                "segments",
                "description",
                "eligibility",
                "benefits",
                "registrationProcess",
                "image",
                "contactEmail",
                "contactPhone",
                "contactWebsite",
            ],
            sample: &[
                "",
                "National Science Olympiad",
                "",
                "Science Foundation",
                "https://example.org/logo.png",
                "",
                "Science & STEM",
                "online",
                "published",
                "Grades 6-10",
                "2025-01-15",
                "2025-02-01",
                "2025-02-05",
                "50",
                "Karnataka",
                "INR",
                "featured;scholarships",
                "Explore science concepts and compete nationwide.",
                "Grade 6;Grade 7;Grade 8",
                "Cash awards;Certificates",
                "Register online;Prepare documents",
                "https://example.org/hero.png",
                "contact@example.org",
                "+1-555-1234",
                "https://example.org",
            ],
        },
    );

    templates.insert(
        BulkEntity::Schools,
        TemplateDefinition {
            headers: &["id", "name", "city", "state", "country", "isVerified"],
            sample: &["", "Springfield High School", "Springfield", "Illinois", "USA", "true"],
        },
    );

    templates.insert(
        BulkEntity::Organizers,
        TemplateDefinition {
            headers: &[
                "id",
                "name",
                "address",
                "website",
                "foundationYear",
                "type",
                "visibility",
                "isVerified",
            ],
            sample: &[
                "",
                "STEM Foundation",
                "123 Main Street, Springfield",
                "https://stem.org",
                "2001",
                "private",
                "public",
                "true",
            ],
        },
    );

    templates
});

/// Render the template CSV (header line plus one illustrative sample row).
pub fn template_csv(entity: BulkEntity) -> Result<String> {
    let definition = TEMPLATES
        .get(&entity)
        .ok_or_else(|| anyhow::anyhow!("no template registered for {entity}"))?;
    write_csv(definition.headers, &[definition.sample.to_vec()])
}

pub fn template_filename(entity: BulkEntity) -> String {
    format!("{}_template.csv", entity.as_str())
}
