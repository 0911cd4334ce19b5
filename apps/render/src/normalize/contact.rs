//! Contact block cleaning and header display formatting.
//!
//! Validation is deliberately permissive: a field that fails its check is
//! cleared, never an error. The header renderers only show what survived.

use tracing::debug;

use crate::config::{LOCATION_LEN_RANGE, PHONE_MIN_DIGITS};
use crate::models::Contact;
use crate::normalize::text::{collapse_letter_spaced_name, is_placeholder};

/// Separator between contact items in the header line.
pub const HEADER_PIPE: &str = "   |   ";

/// Returns a cleaned copy of the contact block.
///
/// - `full_name` goes through the letter-spacing collapse
/// - `email` must contain `@`
/// - `phone` must contain at least [`PHONE_MIN_DIGITS`] digits
/// - `linkedin_url` / `github_url` must contain their domain
/// - `location` length must fall inside [`LOCATION_LEN_RANGE`]
///
/// Placeholder values ("n/a", "not found", ...) are cleared everywhere.
pub fn clean_contact(c: &Contact) -> Contact {
    let keep = |field: &str, valid: bool, name: &str| -> String {
        let v = field.trim();
        if valid && !is_placeholder(v) {
            v.to_string()
        } else {
            if !v.is_empty() {
                debug!("dropping invalid contact field {name}: {v:?}");
            }
            String::new()
        }
    };

    let email = c.email.trim();
    let phone_digits = c.phone.chars().filter(|ch| ch.is_ascii_digit()).count();
    let location = c.location.trim();

    Contact {
        full_name: collapse_letter_spaced_name(&c.full_name),
        email: keep(email, email.contains('@'), "email"),
        phone: keep(&c.phone, phone_digits >= PHONE_MIN_DIGITS, "phone"),
        linkedin_url: keep(
            &c.linkedin_url,
            c.linkedin_url.contains("linkedin.com"),
            "linkedin_url",
        ),
        github_url: keep(
            &c.github_url,
            c.github_url.contains("github.com"),
            "github_url",
        ),
        location: keep(
            location,
            location.len() >= LOCATION_LEN_RANGE.0 && location.len() <= LOCATION_LEN_RANGE.1,
            "location",
        ),
    }
}

/// Formats a phone number for header display. US-like numbers (10 digits,
/// optionally with a leading 1) become `(xxx) xxx-xxxx`; everything else is
/// shown raw.
pub fn format_phone_for_header(phone: &str) -> String {
    let raw = phone.trim();
    if raw.is_empty() {
        return String::new();
    }
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let d = if digits.len() == 11 && digits.starts_with('1') {
        &digits[1..]
    } else {
        digits.as_str()
    };
    if d.len() == 10 {
        format!("({}) {}-{}", &d[0..3], &d[3..6], &d[6..])
    } else {
        raw.to_string()
    }
}

/// Ensures a URL has an http(s) scheme so link targets resolve.
pub fn ensure_http_url(url: &str) -> String {
    let u = url.trim();
    if u.is_empty() {
        return String::new();
    }
    let lower = u.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return u.to_string();
    }
    // common: linkedin.com/... or github.com/...
    format!("https://{}", u.trim_start_matches("www."))
}
