//! Skill taxonomy classification — groups a flat technical-skill list into
//! named categories with a fixed, ordered, mutually-exclusive rule set.
//!
//! Recruiters and ATS scanners expect domain-clustered skill sections rather
//! than one undifferentiated blob, and the fixed rule order makes the output
//! reproducible for identical input. Classification is an explicit ownership
//! pass: first compute each skill's category by first matching rule, then
//! group in rule order — no shared mutable "used" set.

use serde::{Deserialize, Serialize};

use crate::normalize::text::collapse_ws;

/// One named group of skills, in classification-rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub title: String,
    pub items: Vec<String>,
}

/// The category a single skill resolves to. Every skill resolves to exactly
/// one category; `Other` is the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Languages,
    DataManipulation,
    MachineLearning,
    DataEngineering,
    CloudPlatforms,
    Visualization,
    Governance,
    DevOps,
    Other,
}

/// How a rule's keywords match against the normalized skill string.
enum Matcher {
    /// Token match: the keyword equals the whole string or appears as a
    /// space-delimited word. Used for short language names ("r", "sql")
    /// that would false-positive as substrings.
    AnyWord(&'static [&'static str]),
    /// Plain substring containment.
    AnySubstring(&'static [&'static str]),
}

struct CategoryRule {
    category: SkillCategory,
    title: &'static str,
    matcher: Matcher,
}

/// The ordered rule table. First matching rule wins; order is the emission
/// order of the groups.
const RULES: &[CategoryRule] = &[
    CategoryRule {
        category: SkillCategory::Languages,
        title: "Languages",
        matcher: Matcher::AnyWord(&[
            "python",
            "r",
            "sql",
            "scala",
            "java",
            "c++",
            "c#",
            "javascript",
            "typescript",
        ]),
    },
    CategoryRule {
        category: SkillCategory::DataManipulation,
        title: "Data Manipulation",
        matcher: Matcher::AnySubstring(&[
            "pandas",
            "numpy",
            "data cleaning",
            "preprocess",
            "data manipulation",
        ]),
    },
    CategoryRule {
        category: SkillCategory::MachineLearning,
        title: "Machine Learning & Statistics",
        matcher: Matcher::AnySubstring(&[
            "machine learning",
            "ml",
            "predictive",
            "model",
            "hypothesis",
            "statistical",
            "scikit",
            "sklearn",
            "tensorflow",
            "pytorch",
            "xgboost",
            "lightgbm",
        ]),
    },
    CategoryRule {
        category: SkillCategory::DataEngineering,
        title: "Data Engineering",
        matcher: Matcher::AnySubstring(&[
            "etl",
            "data pipeline",
            "data pipelines",
            "data processing",
            "spark",
            "hadoop",
            "kafka",
            "airflow",
            "dbt",
            "warehouse",
            "lake",
        ]),
    },
    CategoryRule {
        category: SkillCategory::CloudPlatforms,
        title: "Cloud & Platforms",
        matcher: Matcher::AnySubstring(&[
            "aws",
            "azure",
            "gcp",
            "lambda",
            "s3",
            "emr",
            "iam",
            "cloudwatch",
            "step functions",
            "secrets manager",
            "serverless",
        ]),
    },
    CategoryRule {
        category: SkillCategory::Visualization,
        title: "Visualization & BI",
        matcher: Matcher::AnySubstring(&[
            "dashboard",
            "visual",
            "power bi",
            "tableau",
            "matplotlib",
            "seaborn",
            "plotly",
        ]),
    },
    CategoryRule {
        category: SkillCategory::Governance,
        title: "Governance, Security & Compliance",
        matcher: Matcher::AnySubstring(&[
            "governance",
            "compliance",
            "data integrity",
            "data security",
            "privacy",
            "risk",
        ]),
    },
    CategoryRule {
        category: SkillCategory::DevOps,
        title: "DevOps / MLOps",
        matcher: Matcher::AnySubstring(&[
            "mlops",
            "ci/cd",
            "ci cd",
            "git",
            "docker",
            "kubernetes",
        ]),
    },
];

const OTHER_TITLE: &str = "Other";

/// Normalized matching form of a skill string: lowercased, characters outside
/// `[a-z0-9+.#/ -]` replaced by spaces, whitespace collapsed. Keeps the
/// symbols that distinguish "c++", "c#", ".net", and "ci/cd".
pub fn normalize_skill(s: &str) -> String {
    let lower = s.to_lowercase();
    let mapped: String = lower
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '#' | '/' | '-' | ' ') {
                c
            } else {
                ' '
            }
        })
        .collect();
    collapse_ws(&mapped)
}

/// Whitespace-collapses, drops empties, and case-insensitively deduplicates a
/// skill list, keeping first-seen order, capped at `limit` items.
pub fn normalize_skill_items(items: &[String], limit: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for raw in items {
        let s = collapse_ws(raw);
        if s.is_empty() {
            continue;
        }
        if !seen.insert(s.to_lowercase()) {
            continue;
        }
        out.push(s);
        if out.len() >= limit {
            break;
        }
    }
    out
}

/// Splits a skill list into core skills and `(exposure)`-tagged skills, with
/// the tag stripped from the latter.
pub fn split_exposure_skills(items: &[String]) -> (Vec<String>, Vec<String>) {
    let mut core = Vec::new();
    let mut exposure = Vec::new();
    for raw in items {
        let s = collapse_ws(raw);
        if s.is_empty() {
            continue;
        }
        const TAG: &str = "(exposure)";
        let trimmed = s.trim_end();
        let tagged = trimmed.len() >= TAG.len()
            && trimmed.is_char_boundary(trimmed.len() - TAG.len())
            && trimmed[trimmed.len() - TAG.len()..].eq_ignore_ascii_case(TAG);
        if tagged {
            let keep = trimmed[..trimmed.len() - TAG.len()].trim().to_string();
            if !keep.is_empty() {
                exposure.push(keep);
            }
        } else {
            core.push(s);
        }
    }
    (core, exposure)
}

fn matches_rule(normalized: &str, matcher: &Matcher) -> bool {
    match matcher {
        Matcher::AnyWord(keywords) => keywords.iter().any(|k| {
            normalized == *k
                || normalized.starts_with(&format!("{k} "))
                || normalized.ends_with(&format!(" {k}"))
                || normalized.contains(&format!(" {k} "))
        }),
        Matcher::AnySubstring(keywords) => keywords.iter().any(|k| normalized.contains(k)),
    }
}

/// Resolves the category of a single skill by first matching rule.
pub fn category_of(skill: &str) -> SkillCategory {
    let n = normalize_skill(skill);
    for rule in RULES {
        if matches_rule(&n, &rule.matcher) {
            return rule.category;
        }
    }
    SkillCategory::Other
}

/// Classifies a technical skill list into ordered groups.
///
/// Partition property: every cleaned input skill lands in exactly one group
/// (the matching rule's group, or the trailing "Other"). Empty groups are not
/// emitted. Ordering is rule order, not input order.
pub fn classify(technical: &[String], limit: usize) -> Vec<SkillGroup> {
    let cleaned = normalize_skill_items(technical, limit);

    // Ownership pass: category per skill, computed once.
    let categorized: Vec<(&String, SkillCategory)> =
        cleaned.iter().map(|s| (s, category_of(s))).collect();

    let mut groups = Vec::new();
    for rule in RULES {
        let items: Vec<String> = categorized
            .iter()
            .filter(|(_, c)| *c == rule.category)
            .map(|(s, _)| (*s).clone())
            .collect();
        if !items.is_empty() {
            groups.push(SkillGroup {
                title: rule.title.to_string(),
                items,
            });
        }
    }

    let other: Vec<String> = categorized
        .iter()
        .filter(|(_, c)| *c == SkillCategory::Other)
        .map(|(s, _)| (*s).clone())
        .collect();
    if !other.is_empty() {
        groups.push(SkillGroup {
            title: OTHER_TITLE.to_string(),
            items: other,
        });
    }

    groups
}
