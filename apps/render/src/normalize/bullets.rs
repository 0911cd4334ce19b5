//! Bullet list cleanup: label stripping, mega-bullet splitting, duplicate
//! collapse, and experience-entry sanitization.
//!
//! Parsed resumes arrive with glued-together bullets, "Responsibilities:"
//! labels, and whole sections leaked into title/company fields. Everything
//! here degrades: a bullet that cannot be salvaged is dropped, never fatal.

use std::collections::HashSet;

use tracing::debug;

use crate::models::ExperienceEntry;
use crate::normalize::text::{collapse_ws, normalized_key};

/// Minimum fragment length for a line to survive an embedded-bullet split.
const SPLIT_MIN_LINE_LEN: usize = 24;
/// Paragraph length above which a bullet is split into sentences.
const SENTENCE_SPLIT_THRESHOLD: usize = 240;
/// Minimum sentence length kept by the paragraph split.
const SENTENCE_MIN_LEN: usize = 30;
/// Maximum sentences produced from one mega-bullet.
const SENTENCE_SPLIT_CAP: usize = 12;

/// Field length caps applied by [`sanitize_experience`].
const FIELD_CAP_TITLE: usize = 120;
const FIELD_CAP_DATE: usize = 40;
const FIELD_CAP_LOCATION: usize = 80;

// ────────────────────────────────────────────────────────────────────────────
// Bullet normalization
// ────────────────────────────────────────────────────────────────────────────

/// Cleans a raw bullet list into display-ready items.
///
/// - drops empty and label-only (`Responsibilities:`) lines
/// - strips a leading `Responsibilities:` label
/// - explodes bullet glyphs glued mid-string into separate items when at
///   least two fragments of [`SPLIT_MIN_LINE_LEN`]+ chars result
/// - splits paragraphs longer than [`SENTENCE_SPLIT_THRESHOLD`] chars into
///   sentence items of [`SENTENCE_MIN_LEN`]+ chars
/// - whitespace-collapses every emitted item, so a second pass is a no-op
pub fn normalize_bullets(bullets: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |s: &str| {
        let v = collapse_ws(s);
        if v.is_empty() {
            return;
        }
        if is_label_only(&v) {
            return;
        }
        out.push(v);
    };

    for raw in bullets {
        let mut b = raw.trim().to_string();
        if b.is_empty() {
            continue;
        }
        b = strip_label_prefix(&b);
        // Re-break on bullet glyphs glued into the middle of the string.
        let b = b.replace(['\u{2022}', '•'], "\n• ");

        let lines: Vec<String> = b
            .split('\n')
            .map(|l| strip_leading_markers(l))
            .filter(|l| !l.is_empty())
            .collect();
        let long_lines: Vec<&String> =
            lines.iter().filter(|l| l.len() >= SPLIT_MIN_LINE_LEN).collect();
        if long_lines.len() >= 2 {
            for l in long_lines {
                push(l);
            }
            continue;
        }

        let collapsed = collapse_ws(&lines.join(" "));
        if collapsed.len() > SENTENCE_SPLIT_THRESHOLD {
            let parts: Vec<String> = split_sentences(&collapsed)
                .into_iter()
                .filter(|p| p.len() >= SENTENCE_MIN_LEN)
                .collect();
            if parts.len() >= 2 {
                for p in parts.into_iter().take(SENTENCE_SPLIT_CAP) {
                    push(p.trim_end_matches('.'));
                }
                continue;
            }
        }

        push(&collapsed);
    }

    out
}

fn is_label_only(s: &str) -> bool {
    let n = s.trim_end_matches(':').trim().to_lowercase();
    n == "responsibilities"
}

fn strip_label_prefix(s: &str) -> String {
    const LABEL: &str = "responsibilities";
    if s.len() >= LABEL.len()
        && s.is_char_boundary(LABEL.len())
        && s[..LABEL.len()].eq_ignore_ascii_case(LABEL)
    {
        let rest = s[LABEL.len()..].trim_start();
        if let Some(tail) = rest.strip_prefix(':') {
            return tail.trim().to_string();
        }
    }
    s.to_string()
}

fn strip_leading_markers(line: &str) -> String {
    line.trim_start_matches(|c: char| matches!(c, '•' | '\u{2022}' | '-' | '*' | ' '))
        .trim()
        .to_string()
}

/// Splits prose into sentence-like fragments at `.`/`!`/`?` followed by
/// whitespace.
fn split_sentences(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut cur = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        cur.push(c);
        if matches!(c, '.' | '!' | '?') {
            if chars.peek().map(|n| n.is_whitespace()).unwrap_or(true) {
                let trimmed = cur.trim().to_string();
                if !trimmed.is_empty() {
                    parts.push(trimmed);
                }
                cur.clear();
            }
        }
    }
    let trimmed = cur.trim().to_string();
    if !trimmed.is_empty() {
        parts.push(trimmed);
    }
    parts
}

// ────────────────────────────────────────────────────────────────────────────
// Duplicate detection
// ────────────────────────────────────────────────────────────────────────────

/// Returns true when two bullets say the same thing.
///
/// Checks, in order of cost: normalized-key equality; containment for keys of
/// 40+ chars (same bullet with a few extra words); word-set Jaccard >= 0.66
/// when both have 5+ words; character-trigram Jaccard >= 0.86 when both keys
/// have 12+ chars (catches minor tokenization differences such as
/// "microservices" vs "micro services").
pub fn bullets_near_duplicate(a: &str, b: &str) -> bool {
    let na = normalized_key(a);
    let nb = normalized_key(b);
    if na.is_empty() || nb.is_empty() {
        return false;
    }
    if na == nb {
        return true;
    }
    if na.len() >= 40 && nb.len() >= 40 && (na.contains(&nb) || nb.contains(&na)) {
        return true;
    }

    let ta: HashSet<&str> = na.split(' ').filter(|w| !w.is_empty()).collect();
    let tb: HashSet<&str> = nb.split(' ').filter(|w| !w.is_empty()).collect();
    if ta.len() < 5 || tb.len() < 5 {
        return false;
    }
    let word_j = jaccard(&ta, &tb);
    let tri_j = jaccard(&trigrams(&na), &trigrams(&nb));
    word_j >= 0.66 || tri_j >= 0.86
}

/// Character trigrams over the compacted (space-free) key. Keys shorter than
/// 12 chars produce an empty set, which scores 0 against anything.
fn trigrams(key: &str) -> HashSet<String> {
    let mut out = HashSet::new();
    if key.len() < 12 {
        return out;
    }
    let compact: Vec<char> = key.chars().filter(|c| !c.is_whitespace()).collect();
    for w in compact.windows(3) {
        out.insert(w.iter().collect());
    }
    out
}

fn jaccard<T: std::hash::Hash + Eq>(a: &HashSet<T>, b: &HashSet<T>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let inter = a.iter().filter(|x| b.contains(x)).count();
    inter as f32 / (a.len() + b.len() - inter) as f32
}

/// Normalizes a bullet list and collapses duplicates, keeping the first
/// occurrence in original order.
pub fn dedupe_bullets(bullets: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for b in normalize_bullets(bullets) {
        if out.iter().any(|kept| bullets_near_duplicate(kept, &b)) {
            debug!("dropping near-duplicate bullet: {b:?}");
            continue;
        }
        out.push(b);
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Experience sanitization
// ────────────────────────────────────────────────────────────────────────────

/// Phrases indicating that a whole section blob leaked into a field.
fn looks_like_section_leak(s: &str) -> bool {
    let n = s.to_lowercase();
    n.contains("professional experience")
        || n.contains("core technical skills")
        || n.contains("professional summary")
        || n.contains("education")
        || n.contains("certifications")
        || n.contains("responsibilities:")
}

/// Single-line field cleanup: whitespace and bullet glyphs collapsed, capped.
fn clean_field(v: &str, max: usize) -> String {
    let collapsed = collapse_ws(&v.replace(['•', '\u{2022}'], " "));
    collapsed.chars().take(max).collect()
}

/// Cleans experience entries for rendering.
///
/// Drops rows that are section leakage, deduplicates whole entries by
/// `title|company|start|end` key, deduplicates each entry's bullets, and
/// drops entries with nothing left to show.
pub fn sanitize_experience(entries: &[ExperienceEntry]) -> Vec<ExperienceEntry> {
    let mut out: Vec<ExperienceEntry> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for e in entries {
        let title = clean_field(&e.title, FIELD_CAP_TITLE);
        let company = clean_field(&e.company, FIELD_CAP_TITLE);
        let start = clean_field(&e.start, FIELD_CAP_DATE);
        let end = clean_field(&e.end, FIELD_CAP_DATE);
        let location = clean_field(&e.location, FIELD_CAP_LOCATION);

        // Rows where a section blob landed in the header fields.
        let header_blob = collapse_ws(&format!("{} {}", e.title, e.company));
        let too_long =
            e.title.len() > 140 || e.company.len() > 140 || header_blob.len() > 220;
        if too_long && looks_like_section_leak(&header_blob) {
            debug!("dropping leaked section row: {header_blob:?}");
            continue;
        }

        let bullets: Vec<String> = dedupe_bullets(&e.bullets)
            .into_iter()
            .filter(|b| !(looks_like_section_leak(b) && b.len() > 80))
            .collect();

        if title.is_empty() && company.is_empty() && bullets.is_empty() {
            continue;
        }

        let key = format!(
            "{}|{}|{}|{}",
            title.to_lowercase(),
            company.to_lowercase(),
            start.to_lowercase(),
            end.to_lowercase()
        );
        if !seen.insert(key) {
            debug!("dropping duplicate experience entry: {title:?} at {company:?}");
            continue;
        }

        out.push(ExperienceEntry {
            title,
            company,
            start,
            end,
            location,
            bullets,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ── normalize_bullets ───────────────────────────────────────────────────

    #[test]
    fn test_normalize_drops_label_lines() {
        let out = normalize_bullets(&strs(&["Responsibilities:", "Built the pipeline"]));
        assert_eq!(out, vec!["Built the pipeline"]);
    }

    #[test]
    fn test_normalize_strips_label_prefix() {
        let out = normalize_bullets(&strs(&["Responsibilities: Led the migration effort"]));
        assert_eq!(out, vec!["Led the migration effort"]);
    }

    #[test]
    fn test_normalize_splits_glued_bullets() {
        let glued = "Designed the ingestion layer for clickstream data • Maintained the \
                     nightly warehouse load with on-call rotation";
        let out = normalize_bullets(&strs(&[glued]));
        assert_eq!(out.len(), 2);
        assert!(out[0].starts_with("Designed"));
        assert!(out[1].starts_with("Maintained"));
    }

    #[test]
    fn test_normalize_splits_mega_paragraph_into_sentences() {
        let mega = "Owned the customer analytics platform end to end across four product lines. \
                    Migrated the reporting stack from nightly batch jobs to streaming ingestion. \
                    Reduced the cost of the warehouse by renegotiating reserved capacity and tiering storage. \
                    Mentored four junior analysts through their first production launches.";
        assert!(mega.len() > 240);
        let out = normalize_bullets(&strs(&[mega]));
        assert!(out.len() >= 3, "expected sentence split, got {out:?}");
        // trailing periods trimmed
        assert!(out.iter().all(|b| !b.ends_with('.')));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = strs(&[
            "Responsibilities: Led team",
            "Did A • Did B with twenty-four-plus characters here",
            "Short one",
        ]);
        let once = normalize_bullets(&input);
        let twice = normalize_bullets(&once);
        assert_eq!(once, twice);
    }

    // ── duplicates ──────────────────────────────────────────────────────────

    #[test]
    fn test_dedupe_keeps_first_of_normalized_equals() {
        let out = dedupe_bullets(&strs(&["Led team", "led   team", "Led Team."]));
        assert_eq!(out, vec!["Led team"]);
    }

    #[test]
    fn test_near_duplicate_containment() {
        let a = "Built a streaming ETL pipeline processing ten million events per day";
        let b = "Built a streaming ETL pipeline processing ten million events per day for the ads team";
        assert!(bullets_near_duplicate(a, b));
    }

    #[test]
    fn test_near_duplicate_tokenization_difference() {
        let a = "Deployed microservices architecture for the checkout and billing flows";
        let b = "Deployed micro services architecture for the checkout and billing flows";
        assert!(bullets_near_duplicate(a, b));
    }

    #[test]
    fn test_distinct_bullets_not_duplicates() {
        let a = "Led migration of the data warehouse to a lakehouse design";
        let b = "Implemented anomaly detection for fraud screening models";
        assert!(!bullets_near_duplicate(a, b));
    }

    // ── sanitize_experience ─────────────────────────────────────────────────

    fn make_entry(title: &str, company: &str, bullets: &[&str]) -> ExperienceEntry {
        ExperienceEntry {
            title: title.to_string(),
            company: company.to_string(),
            start: "2020".to_string(),
            end: "2023".to_string(),
            location: "Remote".to_string(),
            bullets: strs(bullets),
        }
    }

    #[test]
    fn test_sanitize_dedupes_entries_by_key() {
        let e = make_entry("Data Engineer", "Acme", &["Built pipelines for ingest"]);
        let out = sanitize_experience(&[e.clone(), e]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_sanitize_drops_section_leak_rows() {
        let mut leak = make_entry("x", "y", &[]);
        leak.title = format!(
            "PROFESSIONAL EXPERIENCE {} CORE TECHNICAL SKILLS {}",
            "lorem ipsum dolor sit amet ".repeat(4),
            "consectetur adipiscing elit ".repeat(4)
        );
        let out = sanitize_experience(&[leak]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_sanitize_drops_empty_entries() {
        let empty = ExperienceEntry::default();
        let out = sanitize_experience(&[empty]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_sanitize_collapses_field_glyphs() {
        let mut e = make_entry("Data • Engineer", "Acme\nCorp", &["Built pipelines for ingest"]);
        e.location = "  Remote  ".to_string();
        let out = sanitize_experience(&[e]);
        assert_eq!(out[0].title, "Data Engineer");
        assert_eq!(out[0].company, "Acme Corp");
        assert_eq!(out[0].location, "Remote");
    }
}
