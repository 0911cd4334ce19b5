//! Leadership-group suppression heuristic.
//!
//! Soft/leadership skills are appended as a trailing group only when the
//! target role plausibly values them. Titles that read junior or pure
//! individual-contributor suppress the group, as does a thin soft-skill list.
//! The keyword lists are tuned against observed job titles; treat them as
//! data, not logic.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LEADERSHIP_MIN_SOFT_SKILLS;
use crate::skills::taxonomy::{normalize_skill_items, SkillGroup};

/// Title of the trailing soft-skill group.
pub const LEADERSHIP_GROUP_TITLE: &str = "Professional Strengths";

static JUNIOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(junior|jr\.?|entry|intern|associate)\b").unwrap());
static IC_ROLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(data scientist|data analyst|analyst|engineer|developer)\b").unwrap());
static LEADERSHIP_ROLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(lead|manager|director|principal|staff|head)\b").unwrap());

/// Returns true when the target title looks junior or IC-only: it names a
/// junior level, or names an IC role without any leadership qualifier.
/// An empty title is not junior (no signal either way).
pub fn looks_junior_or_non_leadership_title(title: &str) -> bool {
    let s = title.trim().to_lowercase();
    if s.is_empty() {
        return false;
    }
    JUNIOR_RE.is_match(&s) || (IC_ROLE_RE.is_match(&s) && !LEADERSHIP_ROLE_RE.is_match(&s))
}

/// Builds the trailing leadership group from the soft-skill list, or `None`
/// when suppressed: junior/IC target title, or fewer than
/// [`LEADERSHIP_MIN_SOFT_SKILLS`] soft skills after dedup.
pub fn leadership_group(soft: &[String], target_title: &str, limit: usize) -> Option<SkillGroup> {
    let items = normalize_skill_items(soft, limit);
    if items.len() < LEADERSHIP_MIN_SOFT_SKILLS {
        return None;
    }
    if looks_junior_or_non_leadership_title(target_title) {
        return None;
    }
    Some(SkillGroup {
        title: LEADERSHIP_GROUP_TITLE.to_string(),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_soft() -> Vec<String> {
        ["Mentoring", "Stakeholder Management", "Roadmapping", "Hiring", "Communication"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_junior_titles_detected() {
        assert!(looks_junior_or_non_leadership_title("Junior Developer"));
        assert!(looks_junior_or_non_leadership_title("Jr. Engineer"));
        assert!(looks_junior_or_non_leadership_title("Software Engineering Intern"));
        assert!(looks_junior_or_non_leadership_title("Associate Consultant"));
    }

    #[test]
    fn test_ic_title_without_leadership_detected() {
        assert!(looks_junior_or_non_leadership_title("Senior Data Analyst"));
        assert!(looks_junior_or_non_leadership_title("Software Engineer"));
    }

    #[test]
    fn test_leadership_qualified_titles_pass() {
        assert!(!looks_junior_or_non_leadership_title("Director of Engineering"));
        assert!(!looks_junior_or_non_leadership_title("Staff Engineer"));
        assert!(!looks_junior_or_non_leadership_title("Engineering Manager"));
        assert!(!looks_junior_or_non_leadership_title("Principal Data Scientist"));
    }

    #[test]
    fn test_empty_title_is_not_junior() {
        assert!(!looks_junior_or_non_leadership_title(""));
        assert!(!looks_junior_or_non_leadership_title("   "));
    }

    #[test]
    fn test_suppressed_for_analyst_title() {
        // spec property: "Senior Data Analyst" + 5 soft skills → omitted
        assert!(leadership_group(&five_soft(), "Senior Data Analyst", 40).is_none());
    }

    #[test]
    fn test_present_for_director_title() {
        // spec property: "Director of Engineering" + 5 soft skills → present
        let g = leadership_group(&five_soft(), "Director of Engineering", 40)
            .expect("leadership group expected");
        assert_eq!(g.title, LEADERSHIP_GROUP_TITLE);
        assert_eq!(g.items.len(), 5);
    }

    #[test]
    fn test_suppressed_when_fewer_than_four_soft_skills() {
        let thin = vec!["Mentoring".to_string(), "mentoring".to_string(), "Hiring".to_string()];
        // dedup leaves 2 → below threshold even for a leadership title
        assert!(leadership_group(&thin, "Director of Engineering", 40).is_none());
    }
}
