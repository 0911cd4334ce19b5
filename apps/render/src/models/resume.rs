use serde::{Deserialize, Serialize};

/// Contact block of a resume document.
///
/// Fields are plain strings as delivered by the editor/tailoring service; the
/// normalizer is responsible for every validity check. Empty string means
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub location: String,
}

/// Technical and soft skill lists, as flat strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
}

/// One experience entry. Bullet order is display-significant; duplicates are
/// collapsed during normalization, first occurrence kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub year: String,
}

/// The full resume document handed to the render pipeline.
///
/// Every field defaults, so `{}` (or a missing body) deserializes to an empty
/// document and still renders a valid output file — malformed input is never
/// rejected, only degraded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDocContent {
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub certifications: Vec<String>,
}
