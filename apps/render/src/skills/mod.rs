//! Skill taxonomy classification and leadership-group suppression.

pub mod leadership;
pub mod taxonomy;

pub use leadership::{leadership_group, looks_junior_or_non_leadership_title};
pub use taxonomy::{classify, normalize_skill_items, SkillCategory, SkillGroup};
