//! Shared layout tree — the single intermediate representation both painters
//! consume.
//!
//! `build_layout_tree` runs normalization, classification, and skill-line
//! wrapping exactly once; the PDF and word-processor painters walk the same
//! tree. Any behavioral divergence between the two output formats is
//! therefore a painter bug, not acceptable variation — the cross-format
//! parity test compares section titles from both walks.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RenderOptions;
use crate::layout::flow::{wrap_tokens, WrapCaps};
use crate::models::ResumeDocContent;
use crate::normalize::contact::{ensure_http_url, format_phone_for_header};
use crate::normalize::normalize_document;
use crate::skills::{classify, leadership_group};

/// Section titles, in emission order.
pub const SECTION_SUMMARY: &str = "Professional Summary";
pub const SECTION_SKILLS: &str = "Core Technical Skills";
pub const SECTION_EXPERIENCE: &str = "Professional Experience";
pub const SECTION_CERTIFICATIONS: &str = "Certifications";
pub const SECTION_EDUCATION: &str = "Education";

/// One item on the header contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactItem {
    Text(String),
    Link { label: String, url: String },
}

/// Document header: name line plus the single-line contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    /// Target role, uppercased, shown top-right when present.
    pub role_title: Option<String>,
    pub contact: Vec<ContactItem>,
}

/// One block inside a section. Painters decide the visual treatment; the
/// tree only carries semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionBlock {
    /// Free paragraph (summary blocks).
    Paragraph(String),
    /// A titled skill group with pre-wrapped lines.
    SkillGroup { title: String, lines: Vec<String> },
    /// One experience entry.
    Experience {
        role_line: String,
        meta_line: String,
        bullets: Vec<String>,
    },
    /// A single bulleted item (certifications).
    Bullet(String),
    /// One education entry; painters format the row.
    Education {
        school: String,
        degree: String,
        field: String,
        year: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<SectionBlock>,
}

/// The full, format-independent document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTree {
    pub header: Header,
    pub sections: Vec<Section>,
}

impl LayoutTree {
    /// Ordered section titles — the cross-format parity surface.
    pub fn section_titles(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.title.as_str()).collect()
    }
}

/// Builds the shared layout tree from raw content.
///
/// Normalization runs here (idempotent, so pre-normalized input is fine);
/// empty sections are omitted entirely — no empty headings are ever emitted.
pub fn build_layout_tree(content: &ResumeDocContent, options: &RenderOptions) -> LayoutTree {
    let doc = normalize_document(content);
    let skill_caps = WrapCaps::new(options.skill_items_per_line, options.skill_chars_per_line);

    let header = build_header(&doc, options);
    let mut sections = Vec::new();

    if !doc.summary.is_empty() {
        sections.push(Section {
            title: SECTION_SUMMARY.to_string(),
            blocks: doc
                .summary
                .split('\n')
                .filter(|p| !p.is_empty())
                .map(|p| SectionBlock::Paragraph(p.to_string()))
                .collect(),
        });
    }

    let mut skill_blocks: Vec<SectionBlock> = Vec::new();
    for group in classify(&doc.skills.technical, 200)
        .into_iter()
        .take(options.max_skill_groups)
    {
        let items: Vec<String> = group
            .items
            .into_iter()
            .take(options.max_technical_skills)
            .collect();
        skill_blocks.push(SectionBlock::SkillGroup {
            title: group.title,
            lines: wrap_tokens(&items, skill_caps),
        });
    }
    if let Some(group) = leadership_group(
        &doc.skills.soft,
        &options.target_title,
        options.max_soft_skills,
    ) {
        skill_blocks.push(SectionBlock::SkillGroup {
            title: group.title,
            lines: wrap_tokens(&group.items, skill_caps),
        });
    } else if !doc.skills.soft.is_empty() {
        debug!("leadership group suppressed for title {:?}", options.target_title);
    }
    if !skill_blocks.is_empty() {
        sections.push(Section {
            title: SECTION_SKILLS.to_string(),
            blocks: skill_blocks,
        });
    }

    if !doc.experience.is_empty() {
        let blocks = doc
            .experience
            .iter()
            .map(|e| {
                let role_line = join_nonempty(&[&e.title, &e.company], " — ");
                let dates = join_nonempty(&[&e.start, &e.end], " - ");
                let meta_line = join_nonempty(&[&dates, &e.location], " • ");
                SectionBlock::Experience {
                    role_line,
                    meta_line,
                    bullets: e.bullets.clone(),
                }
            })
            .collect();
        sections.push(Section {
            title: SECTION_EXPERIENCE.to_string(),
            blocks,
        });
    }

    if !doc.certifications.is_empty() {
        sections.push(Section {
            title: SECTION_CERTIFICATIONS.to_string(),
            blocks: doc
                .certifications
                .iter()
                .map(|c| SectionBlock::Bullet(c.clone()))
                .collect(),
        });
    }

    if !doc.education.is_empty() {
        sections.push(Section {
            title: SECTION_EDUCATION.to_string(),
            blocks: doc
                .education
                .iter()
                .map(|e| SectionBlock::Education {
                    school: e.school.clone(),
                    degree: e.degree.clone(),
                    field: e.field.clone(),
                    year: e.year.clone(),
                })
                .collect(),
        });
    }

    LayoutTree { header, sections }
}

fn build_header(doc: &ResumeDocContent, options: &RenderOptions) -> Header {
    let c = &doc.contact;
    let name = if c.full_name.is_empty() {
        "Resume".to_string()
    } else {
        c.full_name.clone()
    };
    let title = options.target_title.trim();
    let role_title = if title.is_empty() {
        None
    } else {
        Some(title.to_uppercase())
    };

    let mut contact = Vec::new();
    if !c.phone.is_empty() {
        contact.push(ContactItem::Text(format_phone_for_header(&c.phone)));
    }
    if !c.email.is_empty() {
        contact.push(ContactItem::Text(c.email.clone()));
    }
    if !c.linkedin_url.is_empty() {
        contact.push(ContactItem::Link {
            label: "LinkedIn".to_string(),
            url: ensure_http_url(&c.linkedin_url),
        });
    }
    if !c.github_url.is_empty() {
        contact.push(ContactItem::Link {
            label: "GitHub".to_string(),
            url: ensure_http_url(&c.github_url),
        });
    }

    Header {
        name,
        role_title,
        contact,
    }
}

fn join_nonempty(parts: &[&String], sep: &str) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contact, EducationEntry, ExperienceEntry, Skills};

    fn make_full_doc() -> ResumeDocContent {
        ResumeDocContent {
            contact: Contact {
                full_name: "Ravi Yeluru".to_string(),
                phone: "5125550147".to_string(),
                email: "ravi@example.com".to_string(),
                linkedin_url: "linkedin.com/in/ravi".to_string(),
                github_url: "github.com/ravi".to_string(),
                location: "Austin, TX".to_string(),
            },
            summary: "Engineer with a decade of shipping.\nComfortable across the stack."
                .to_string(),
            skills: Skills {
                technical: vec![
                    "Python".to_string(),
                    "SQL".to_string(),
                    "Spark".to_string(),
                    "Tableau".to_string(),
                ],
                soft: vec![
                    "Mentoring".to_string(),
                    "Hiring".to_string(),
                    "Roadmapping".to_string(),
                    "Communication".to_string(),
                    "Stakeholder Management".to_string(),
                ],
            },
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                start: "2020".to_string(),
                end: "2023".to_string(),
                location: "Remote".to_string(),
                bullets: vec!["Built the ingestion pipeline".to_string()],
            }],
            education: vec![EducationEntry {
                school: "State University".to_string(),
                degree: "BS".to_string(),
                field: "CS".to_string(),
                year: "2016".to_string(),
            }],
            certifications: vec!["AWS SAA".to_string()],
        }
    }

    #[test]
    fn test_section_order_full_document() {
        let tree = build_layout_tree(&make_full_doc(), &RenderOptions::for_title("Director of Engineering"));
        assert_eq!(
            tree.section_titles(),
            vec![
                SECTION_SUMMARY,
                SECTION_SKILLS,
                SECTION_EXPERIENCE,
                SECTION_CERTIFICATIONS,
                SECTION_EDUCATION
            ]
        );
    }

    #[test]
    fn test_empty_sections_omitted() {
        let mut doc = make_full_doc();
        doc.summary = String::new();
        doc.certifications = vec![];
        let tree = build_layout_tree(&doc, &RenderOptions::default());
        assert_eq!(
            tree.section_titles(),
            vec![SECTION_SKILLS, SECTION_EXPERIENCE, SECTION_EDUCATION]
        );
    }

    #[test]
    fn test_empty_document_renders_skeleton() {
        let tree = build_layout_tree(&ResumeDocContent::default(), &RenderOptions::default());
        assert_eq!(tree.header.name, "Resume");
        assert!(tree.sections.is_empty());
        assert!(tree.header.contact.is_empty());
    }

    #[test]
    fn test_header_contact_order_and_links() {
        let tree = build_layout_tree(&make_full_doc(), &RenderOptions::default());
        let labels: Vec<String> = tree
            .header
            .contact
            .iter()
            .map(|i| match i {
                ContactItem::Text(t) => t.clone(),
                ContactItem::Link { label, .. } => label.clone(),
            })
            .collect();
        assert_eq!(labels, vec!["(512) 555-0147", "ravi@example.com", "LinkedIn", "GitHub"]);
        match &tree.header.contact[2] {
            ContactItem::Link { url, .. } => assert_eq!(url, "https://linkedin.com/in/ravi"),
            other => panic!("expected link, got {other:?}"),
        }
    }

    #[test]
    fn test_role_title_uppercased() {
        let tree = build_layout_tree(&make_full_doc(), &RenderOptions::for_title("Director of Engineering"));
        assert_eq!(tree.header.role_title.as_deref(), Some("DIRECTOR OF ENGINEERING"));
    }

    #[test]
    fn test_leadership_group_suppressed_for_ic_title() {
        let tree = build_layout_tree(&make_full_doc(), &RenderOptions::for_title("Senior Data Analyst"));
        let skills = tree
            .sections
            .iter()
            .find(|s| s.title == SECTION_SKILLS)
            .expect("skills section");
        assert!(skills.blocks.iter().all(|b| !matches!(
            b,
            SectionBlock::SkillGroup { title, .. } if title == "Professional Strengths"
        )));
    }

    #[test]
    fn test_leadership_group_present_for_director_title() {
        let tree =
            build_layout_tree(&make_full_doc(), &RenderOptions::for_title("Director of Engineering"));
        let skills = tree
            .sections
            .iter()
            .find(|s| s.title == SECTION_SKILLS)
            .expect("skills section");
        let last = skills.blocks.last().expect("at least one group");
        match last {
            SectionBlock::SkillGroup { title, .. } => assert_eq!(title, "Professional Strengths"),
            other => panic!("expected trailing leadership group, got {other:?}"),
        }
    }

    #[test]
    fn test_experience_lines_joined() {
        let tree = build_layout_tree(&make_full_doc(), &RenderOptions::default());
        let exp = tree
            .sections
            .iter()
            .find(|s| s.title == SECTION_EXPERIENCE)
            .expect("experience section");
        match &exp.blocks[0] {
            SectionBlock::Experience { role_line, meta_line, bullets } => {
                assert_eq!(role_line, "Engineer — Acme");
                assert_eq!(meta_line, "2020 - 2023 • Remote");
                assert_eq!(bullets.len(), 1);
            }
            other => panic!("expected experience block, got {other:?}"),
        }
    }
}
