//! Text canonicalization primitives shared by the normalizer and classifier.
//!
//! The normalized key (lowercase, non-alphanumeric collapsed to single
//! spaces, trimmed) is the identity used for every duplicate check in the
//! pipeline.

use crate::config::{NAME_COLLAPSE_MIN_TOKENS, NAME_COLLAPSE_SINGLE_LETTER_RATIO};

/// Collapses all internal whitespace (including newlines) to single spaces
/// and trims. Used on every field destined for single-line display.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical duplicate-detection key: lowercased, every non-alphanumeric run
/// replaced by a single space, trimmed.
pub fn normalized_key(s: &str) -> String {
    let lower = s.to_lowercase();
    let mapped: String = lower
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    collapse_ws(&mapped)
}

/// Returns true when a field value should be treated as absent: trimmed-empty,
/// a literal placeholder, or parser output like "Email not found".
pub fn is_placeholder(v: &str) -> bool {
    let s = v.trim();
    if s.is_empty() {
        return true;
    }
    let n = s.to_lowercase();
    n == "n/a" || n == "na" || n == "unknown" || n.contains("not found")
}

/// Splits multi-line free text (the summary) into paragraph blocks on runs of
/// newlines, whitespace-collapsing each block.
pub fn split_paragraphs(s: &str) -> Vec<String> {
    s.split('\n')
        .map(collapse_ws)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Collapses letter-spaced names produced by OCR/parsing artifacts.
///
/// A name counts as letter-spaced when it has at least
/// [`NAME_COLLAPSE_MIN_TOKENS`] whitespace-separated tokens and at least
/// [`NAME_COLLAPSE_SINGLE_LETTER_RATIO`] of them are single ASCII letters.
/// Runs of two or more spaces mark genuine word boundaries and survive as a
/// single space: `"R a v i  Y e l u r u"` → `"Ravi Yeluru"`. Anything else
/// passes through with whitespace collapsed.
pub fn collapse_letter_spaced_name(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return String::new();
    }

    let parts: Vec<&str> = s.split_whitespace().collect();
    let single_letters = parts
        .iter()
        .filter(|p| p.len() == 1 && p.chars().all(|c| c.is_ascii_alphabetic()))
        .count();
    let looks_letter_spaced = parts.len() >= NAME_COLLAPSE_MIN_TOKENS
        && single_letters as f32 / parts.len() as f32 >= NAME_COLLAPSE_SINGLE_LETTER_RATIO;
    if !looks_letter_spaced {
        return collapse_ws(s);
    }

    // Word boundaries are runs of >= 2 whitespace chars; within a word, drop
    // the spaces between adjacent letters.
    let spaced: String = s
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    let words: Vec<String> = split_on_space_runs(&spaced)
        .into_iter()
        .map(|w| w.split_whitespace().collect::<String>())
        .filter(|w| !w.is_empty())
        .collect();
    collapse_ws(&words.join(" "))
}

/// Splits on runs of two or more consecutive spaces.
fn split_on_space_runs(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut space_run = 0usize;
    for c in s.chars() {
        if c == ' ' {
            space_run += 1;
            if space_run >= 2 {
                if space_run == 2 {
                    // the first space of the run already went into `cur`
                    cur.pop();
                    out.push(std::mem::take(&mut cur));
                }
                continue;
            }
            cur.push(c);
        } else {
            space_run = 0;
            cur.push(c);
        }
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_ws_newlines_and_runs() {
        assert_eq!(collapse_ws("a \n b\t\tc"), "a b c");
        assert_eq!(collapse_ws("  "), "");
    }

    #[test]
    fn test_normalized_key_strips_punctuation_and_case() {
        assert_eq!(normalized_key("Led Team."), "led team");
        assert_eq!(normalized_key("led   team"), "led team");
        assert_eq!(normalized_key("Led team"), "led team");
    }

    #[test]
    fn test_is_placeholder_variants() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("   "));
        assert!(is_placeholder("N/A"));
        assert!(is_placeholder("na"));
        assert!(is_placeholder("Unknown"));
        assert!(is_placeholder("Email not found"));
        assert!(!is_placeholder("Austin, TX"));
    }

    #[test]
    fn test_split_paragraphs() {
        let blocks = split_paragraphs("First  block.\n\nSecond\nthird");
        assert_eq!(blocks, vec!["First block.", "Second", "third"]);
    }

    #[test]
    fn test_name_collapse_letter_spaced() {
        // single spaces between letters, double space between words
        assert_eq!(
            collapse_letter_spaced_name("R a v i  Y e l u r u"),
            "Ravi Yeluru"
        );
    }

    #[test]
    fn test_name_collapse_already_normal_unchanged() {
        assert_eq!(collapse_letter_spaced_name("Ravi Yeluru"), "Ravi Yeluru");
        // idempotent: a collapsed name never re-triggers the detector
        let once = collapse_letter_spaced_name("R a v i  Y e l u r u");
        assert_eq!(collapse_letter_spaced_name(&once), once);
    }

    #[test]
    fn test_name_collapse_short_initials_untouched() {
        // 3 tokens: below the minimum token count, so "J R R" stays as-is
        assert_eq!(collapse_letter_spaced_name("J R R"), "J R R");
    }

    #[test]
    fn test_name_collapse_mixed_tokens_untouched() {
        // under 90% single letters
        assert_eq!(
            collapse_letter_spaced_name("Jean Claude van Damme Jr Esq"),
            "Jean Claude van Damme Jr Esq"
        );
    }
}
