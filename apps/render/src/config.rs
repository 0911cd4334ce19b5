use anyhow::{Context, Result};

// ────────────────────────────────────────────────────────────────────────────
// Tuned heuristic constants
// ────────────────────────────────────────────────────────────────────────────
// These thresholds were calibrated against observed bad inputs (OCR artifacts,
// varied job titles). They are named constants so callers can reason about
// them, but their values are empirical — do not re-derive.

/// Minimum whitespace-separated token count before the letter-spaced-name
/// detector may fire ("R a v i  Y e l u r u" has 10).
pub const NAME_COLLAPSE_MIN_TOKENS: usize = 6;

/// Fraction of tokens that must be single letters for a name to count as
/// letter-spaced.
pub const NAME_COLLAPSE_SINGLE_LETTER_RATIO: f32 = 0.9;

/// Minimum digit count for a phone field to be considered valid.
pub const PHONE_MIN_DIGITS: usize = 7;

/// Accepted length range for the location field.
pub const LOCATION_LEN_RANGE: (usize, usize) = (2, 80);

/// Minimum deduplicated soft-skill count below which the leadership group is
/// suppressed.
pub const LEADERSHIP_MIN_SOFT_SKILLS: usize = 4;

// ────────────────────────────────────────────────────────────────────────────
// Render options
// ────────────────────────────────────────────────────────────────────────────

/// Per-render options supplied by the caller.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Target role title. Shown top-right in the header and consulted by the
    /// leadership-suppression heuristic. Empty means no target role.
    pub target_title: String,
    /// Font family name written into the word-processor document. The
    /// consuming viewer substitutes if the family is not installed.
    pub display_font_family: String,
    /// Maximum number of technical skill groups emitted.
    pub max_skill_groups: usize,
    /// Item cap per technical skill group.
    pub max_technical_skills: usize,
    /// Item cap for the leadership/soft group.
    pub max_soft_skills: usize,
    /// Maximum skill items per wrapped line.
    pub skill_items_per_line: usize,
    /// Maximum characters per wrapped skill line (separator included).
    pub skill_chars_per_line: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            target_title: String::new(),
            display_font_family: "Outfit".to_string(),
            max_skill_groups: 8,
            max_technical_skills: 60,
            max_soft_skills: 40,
            skill_items_per_line: 6,
            skill_chars_per_line: 72,
        }
    }
}

impl RenderOptions {
    /// Options for a given target role title, everything else default.
    pub fn for_title(title: impl Into<String>) -> Self {
        RenderOptions {
            target_title: title.into(),
            ..Default::default()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Binary configuration
// ────────────────────────────────────────────────────────────────────────────

/// Configuration for the `render` binary, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the resume document JSON.
    pub input_path: String,
    /// Directory the rendered `resume.pdf` / `resume.docx` are written to.
    pub out_dir: String,
    /// Optional path to the preferred display font (TTF/OTF bytes).
    pub display_font_path: Option<String>,
    /// Optional target role title.
    pub target_title: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            input_path: require_env("RESUME_INPUT")?,
            out_dir: std::env::var("RENDER_OUT_DIR").unwrap_or_else(|_| ".".to_string()),
            display_font_path: std::env::var("DISPLAY_FONT_PATH").ok(),
            target_title: std::env::var("TARGET_TITLE").ok(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
