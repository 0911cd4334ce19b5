//! Font metrics — the measurement capability behind line wrapping.
//!
//! Two sources of glyph widths, one interface:
//! - static AFM width tables for the builtin Helvetica pair (the fallback
//!   fonts every PDF viewer ships), covering ASCII 0x20..=0x7E with an
//!   average-width fallback for anything else;
//! - advances read from the embedded display face via `ttf-parser`,
//!   precomputed at embed time for ASCII, Latin-1, and the common
//!   typographic characters.
//!
//! All widths are in em units (relative to font size); `measure_width`
//! multiplies by the point size. Index into a table = `(char as usize) - 32`.

use std::collections::HashMap;

use bytes::Bytes;
use tracing::warn;

// ────────────────────────────────────────────────────────────────────────────
// Roles and the provider interface
// ────────────────────────────────────────────────────────────────────────────

/// Which face a piece of text is measured/drawn with.
///
/// `Body` is the regular text face (always the builtin Helvetica). `Display`
/// is the headline/bold face: the embedded font when one loaded, otherwise
/// Helvetica-Bold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    Body,
    Display,
}

/// Measurement capability injected into the text-flow engine.
pub trait FontMetrics {
    /// Rendered width of `text` at `size_pt` points, in points.
    fn measure_width(&self, text: &str, role: FontRole, size_pt: f32) -> f32;

    /// True when the display face has a real bold variant. A single-weight
    /// embedded face reports false, which turns on the ink-boost overdraw.
    fn supports_native_bold(&self) -> bool;
}

// ────────────────────────────────────────────────────────────────────────────
// Builtin metric tables
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a builtin font.
///
/// `widths[i]` = width of ASCII character `(i + 32)` in em units, covering
/// 0x20 (space) through 0x7E (~). Values are the standard AFM widths divided
/// by 1000.
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback for characters outside the ASCII range.
    pub average_char_width: f32,
}

impl FontMetricTable {
    /// Width of a string in em units. Non-ASCII characters fall back to
    /// `average_char_width`.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }
}

/// Helvetica (regular) AFM widths.
static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.513,
};

/// Helvetica-Bold AFM widths.
static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.536,
};

// ────────────────────────────────────────────────────────────────────────────
// Embedded face metrics
// ────────────────────────────────────────────────────────────────────────────

/// Characters whose advances are precomputed at embed time, beyond ASCII and
/// Latin-1: the typographic set resume text actually uses.
const TYPOGRAPHIC_CHARS: &[char] = &['•', '–', '—', '‘', '’', '“', '”', '…', '→'];

/// Per-character advances for an embedded display face, in em units.
pub struct EmbeddedFontMetrics {
    advances: HashMap<char, f32>,
    average_char_width: f32,
}

impl EmbeddedFontMetrics {
    /// Parses the face and precomputes advances. Returns `None` when the
    /// bytes do not parse as a font or carry no usable metrics.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let units_per_em = face.units_per_em() as f32;
        if units_per_em <= 0.0 {
            return None;
        }

        let mut advances = HashMap::new();
        let ascii = (0x20u32..=0x7E).filter_map(char::from_u32);
        let latin1 = (0xA0u32..=0xFF).filter_map(char::from_u32);
        for c in ascii.chain(latin1).chain(TYPOGRAPHIC_CHARS.iter().copied()) {
            if let Some(gid) = face.glyph_index(c) {
                if let Some(adv) = face.glyph_hor_advance(gid) {
                    advances.insert(c, adv as f32 / units_per_em);
                }
            }
        }
        if advances.is_empty() {
            return None;
        }

        let average_char_width =
            advances.values().sum::<f32>() / advances.len() as f32;
        Some(EmbeddedFontMetrics {
            advances,
            average_char_width,
        })
    }

    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                self.advances
                    .get(&c)
                    .copied()
                    .unwrap_or(self.average_char_width)
            })
            .sum()
    }

    /// True when the face maps this character to a real glyph.
    pub fn supports_char(&self, c: char) -> bool {
        self.advances.contains_key(&c)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog
// ────────────────────────────────────────────────────────────────────────────

enum DisplayFace {
    /// Preferred embedded face (single weight; bold is simulated).
    Embedded {
        metrics: EmbeddedFontMetrics,
        data: Bytes,
    },
    /// Builtin Helvetica-Bold (native bold, WinAnsi character set).
    Fallback,
}

/// The font-metrics provider handed to both the flow engine and the PDF
/// painter. Constructed once per renderer instantiation.
pub struct FontCatalog {
    display: DisplayFace,
}

impl FontCatalog {
    /// A catalog on builtin fonts only.
    pub fn fallback() -> Self {
        FontCatalog {
            display: DisplayFace::Fallback,
        }
    }

    /// Attempts to embed the preferred display font. On parse failure the
    /// catalog stays on the builtin pair — degraded, never an error.
    pub fn with_display_font(data: Bytes) -> Self {
        match EmbeddedFontMetrics::from_bytes(&data) {
            Some(metrics) => FontCatalog {
                display: DisplayFace::Embedded { metrics, data },
            },
            None => {
                warn!("display font bytes did not parse; falling back to builtin fonts");
                FontCatalog::fallback()
            }
        }
    }

    /// True when no display font is embedded and the builtin pair is in use.
    /// Drives the ASCII glyph-substitution path.
    pub fn is_fallback(&self) -> bool {
        matches!(self.display, DisplayFace::Fallback)
    }

    /// Raw bytes of the embedded display face, for the painter to embed.
    pub fn display_font_bytes(&self) -> Option<&[u8]> {
        match &self.display {
            DisplayFace::Embedded { data, .. } => Some(data),
            DisplayFace::Fallback => None,
        }
    }

    /// True when the embedded face maps the character; builtins report
    /// support for the WinAnsi-safe set handled at encode time.
    pub fn display_supports_char(&self, c: char) -> bool {
        match &self.display {
            DisplayFace::Embedded { metrics, .. } => metrics.supports_char(c),
            DisplayFace::Fallback => (c as u32) < 0x100,
        }
    }
}

impl FontMetrics for FontCatalog {
    fn measure_width(&self, text: &str, role: FontRole, size_pt: f32) -> f32 {
        let em = match (role, &self.display) {
            (FontRole::Body, _) => HELVETICA_TABLE.measure_str(text),
            (FontRole::Display, DisplayFace::Embedded { metrics, .. }) => metrics.measure_str(text),
            (FontRole::Display, DisplayFace::Fallback) => HELVETICA_BOLD_TABLE.measure_str(text),
        };
        em * size_pt
    }

    fn supports_native_bold(&self) -> bool {
        matches!(self.display, DisplayFace::Fallback)
    }
}
