//! Content normalization — the first pipeline stage.
//!
//! Produces a cleaned copy of the raw document: validated contact fields,
//! deduplicated bullets and skills, collapsed whitespace. Idempotent by
//! construction (`normalize_document(normalize_document(x)) ==
//! normalize_document(x)`), which the renderers rely on and tests assert.

pub mod bullets;
pub mod contact;
pub mod text;

use crate::models::{EducationEntry, ResumeDocContent};

pub use bullets::{bullets_near_duplicate, dedupe_bullets, normalize_bullets, sanitize_experience};
pub use contact::{clean_contact, ensure_http_url, format_phone_for_header, HEADER_PIPE};
pub use text::{collapse_ws, is_placeholder, normalized_key, split_paragraphs};

/// Normalizes the whole document. Never fails; invalid fields are dropped.
pub fn normalize_document(doc: &ResumeDocContent) -> ResumeDocContent {
    let mut out = doc.clone();

    out.contact = clean_contact(&doc.contact);
    out.summary = split_paragraphs(&doc.summary).join("\n");
    out.skills.technical = dedupe_strings(&doc.skills.technical);
    out.skills.soft = dedupe_strings(&doc.skills.soft);
    out.experience = sanitize_experience(&doc.experience);
    out.education = doc
        .education
        .iter()
        .map(|e| EducationEntry {
            school: collapse_ws(&e.school),
            degree: collapse_ws(&e.degree),
            field: collapse_ws(&e.field),
            year: collapse_ws(&e.year),
        })
        .filter(|e| {
            !(e.school.is_empty() && e.degree.is_empty() && e.field.is_empty() && e.year.is_empty())
        })
        .collect();
    out.certifications = dedupe_strings(&doc.certifications);

    out
}

/// Whitespace-collapses, drops empties/placeholders, and deduplicates by
/// normalized key, keeping the first occurrence.
fn dedupe_strings(items: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for raw in items {
        let v = collapse_ws(raw);
        if v.is_empty() || is_placeholder(&v) {
            continue;
        }
        let key = normalized_key(&v);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        out.push(v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contact, ExperienceEntry, Skills};

    fn make_doc() -> ResumeDocContent {
        ResumeDocContent {
            contact: Contact {
                full_name: "R a v i  Y e l u r u".to_string(),
                phone: "512-555-0147".to_string(),
                email: "bad-email".to_string(),
                linkedin_url: "linkedin.com/in/ravi".to_string(),
                github_url: String::new(),
                location: "Austin,   TX".to_string(),
            },
            summary: "Seasoned   engineer.\n\nShips reliable systems.".to_string(),
            skills: Skills {
                technical: vec![
                    "Python".to_string(),
                    "python".to_string(),
                    "SQL".to_string(),
                    "n/a".to_string(),
                ],
                soft: vec!["Mentoring".to_string()],
            },
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                start: "2020".to_string(),
                end: "2023".to_string(),
                location: "Remote".to_string(),
                bullets: vec![
                    "Led team".to_string(),
                    "led   team".to_string(),
                    "Led Team.".to_string(),
                ],
            }],
            education: vec![EducationEntry {
                school: "State  University".to_string(),
                degree: "BS".to_string(),
                field: "CS".to_string(),
                year: "2016".to_string(),
            }],
            certifications: vec!["AWS SAA".to_string(), "aws saa".to_string()],
        }
    }

    #[test]
    fn test_normalize_document_cleans_everything() {
        let out = normalize_document(&make_doc());
        assert_eq!(out.contact.full_name, "Ravi Yeluru");
        assert_eq!(out.contact.email, "");
        assert_eq!(out.contact.location, "Austin, TX");
        assert_eq!(out.summary, "Seasoned engineer.\nShips reliable systems.");
        assert_eq!(out.skills.technical, vec!["Python", "SQL"]);
        assert_eq!(out.experience[0].bullets, vec!["Led team"]);
        assert_eq!(out.certifications, vec!["AWS SAA"]);
        assert_eq!(out.education[0].school, "State University");
    }

    #[test]
    fn test_normalize_document_is_idempotent() {
        let once = normalize_document(&make_doc());
        let twice = normalize_document(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_empty_document_stays_empty() {
        let empty = ResumeDocContent::default();
        assert_eq!(normalize_document(&empty), empty);
    }
}
