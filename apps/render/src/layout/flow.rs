//! Text flow engine — greedy line wrapping under two kinds of constraint.
//!
//! Token/char-count mode packs short tokens (skills) into lines under an
//! item-count cap and a character cap; measured-width mode wraps prose
//! against real glyph metrics. Same greedy strategy, different fit
//! predicates, never backtracking. A single item/word that exceeds the
//! constraint on its own sits alone on its line — an atomic token is never
//! split or truncated.

use crate::layout::font_metrics::{FontMetrics, FontRole};

/// Separator between skill items on a wrapped line. Three characters, all of
/// which count toward the character budget.
pub const ITEM_SEPARATOR: &str = " • ";

/// Constraints for token/char-count wrapping.
///
/// `max_items` is clamped to 3..=14 and `max_chars` to 40..=140 — outside
/// those ranges the output stops looking like a skills block. `max_lines`
/// bounds the block height; items past it are dropped.
#[derive(Debug, Clone, Copy)]
pub struct WrapCaps {
    pub max_items: usize,
    pub max_chars: usize,
    pub max_lines: usize,
}

impl Default for WrapCaps {
    fn default() -> Self {
        WrapCaps {
            max_items: 8,
            max_chars: 88,
            max_lines: 6,
        }
    }
}

impl WrapCaps {
    pub fn new(max_items: usize, max_chars: usize) -> Self {
        WrapCaps {
            max_items: max_items.clamp(3, 14),
            max_chars: max_chars.clamp(40, 140),
            ..Default::default()
        }
    }
}

/// Wraps tokens into separator-joined lines under `caps`.
///
/// Before adding a token, if either cap would be exceeded and the current
/// line is non-empty, the line is closed. Accumulation stops once
/// `max_lines` lines exist; remaining tokens are dropped to bound block
/// height.
pub fn wrap_tokens(items: &[String], caps: WrapCaps) -> Vec<String> {
    let sep_len = ITEM_SEPARATOR.chars().count();
    let mut lines: Vec<String> = Vec::new();
    let mut cur: Vec<&str> = Vec::new();
    let mut cur_len = 0usize;

    for item in items {
        if lines.len() >= caps.max_lines {
            break;
        }
        let item_len = item.chars().count();
        let add_len = if cur.is_empty() { item_len } else { sep_len + item_len };
        let too_many = cur.len() >= caps.max_items;
        let too_long = cur_len + add_len > caps.max_chars;
        if (too_many || too_long) && !cur.is_empty() {
            lines.push(cur.join(ITEM_SEPARATOR));
            cur.clear();
            cur_len = 0;
        }
        cur_len += if cur.is_empty() { item_len } else { sep_len + item_len };
        cur.push(item);
    }
    if !cur.is_empty() && lines.len() < caps.max_lines {
        lines.push(cur.join(ITEM_SEPARATOR));
    }
    lines
}

/// Wraps prose into lines no wider than `max_width_pt` points, measured with
/// real glyph metrics for `role` at `size_pt`.
///
/// Greedy: words accumulate until the candidate line would exceed the width,
/// then the line closes. A word wider than the whole line stands alone.
pub fn wrap_measured(
    text: &str,
    metrics: &dyn FontMetrics,
    role: FontRole,
    size_pt: f32,
    max_width_pt: f32,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();

    for word in text.split_whitespace() {
        let candidate = if cur.is_empty() {
            word.to_string()
        } else {
            format!("{cur} {word}")
        };
        if metrics.measure_width(&candidate, role, size_pt) <= max_width_pt || cur.is_empty() {
            cur = candidate;
        } else {
            lines.push(std::mem::take(&mut cur));
            cur = word.to_string();
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}
