//! Page-description painter — fixed-page layout with explicit pagination.
//!
//! Two stages. `layout_pages` walks the shared layout tree with a page
//! cursor and produces positioned ops (`Text`, `Rule`) per page; this pure
//! stage is where every layout decision lives and where the pagination
//! properties are tested. `write_pdf` serializes the page model with
//! `pdf-writer`: builtin WinAnsi Type1 fonts, plus a CID/Type0 embedding of
//! the display face (Identity-H, /W widths, ToUnicode CMap) when one loaded.
//!
//! `ensure_space` is the sole page-break trigger — no other layout decision
//! spans a page boundary implicitly.

use bytes::Bytes;
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, UnicodeCmap};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use crate::errors::RenderError;
use crate::layout::font_metrics::{FontCatalog, FontMetrics, FontRole};
use crate::layout::tree::{ContactItem, LayoutTree, SectionBlock};
use crate::layout::wrap_measured;
use crate::normalize::HEADER_PIPE;

// ────────────────────────────────────────────────────────────────────────────
// Page geometry and type scale
// ────────────────────────────────────────────────────────────────────────────

/// US Letter in points.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
/// 0.75" margins all around.
pub const MARGIN: f32 = 54.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// Vertical gap between bullets.
const LINE_GAP: f32 = 5.0;
/// Gray level of the section rule.
const RULE_GRAY: f32 = 0.82;

const SIZE_NAME: f32 = 20.0;
const SIZE_ROLE_MAX: f32 = 11.0;
const SIZE_ROLE_MIN: f32 = 8.0;
const SIZE_CONTACT: f32 = 10.0;
const SIZE_HEADING: f32 = 10.5;
const SIZE_SUMMARY: f32 = 10.6;
const SIZE_GROUP_TITLE: f32 = 11.6;
const SIZE_SKILL_LINE: f32 = 10.4;
const SIZE_ROLE_LINE: f32 = 11.9;
const SIZE_META: f32 = 10.8;
const SIZE_BULLET: f32 = 10.4;

// ────────────────────────────────────────────────────────────────────────────
// Page model
// ────────────────────────────────────────────────────────────────────────────

/// One positioned drawing operation. `y` is the text baseline (or rule
/// height) in PDF coordinates, origin bottom-left.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        /// Bold text is drawn with the display face; regular with the body
        /// face.
        bold: bool,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
    },
}

impl PageOp {
    /// Vertical position of the op, for bounds checks.
    pub fn y(&self) -> f32 {
        match self {
            PageOp::Text { y, .. } => *y,
            PageOp::Rule { y, .. } => *y,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub ops: Vec<PageOp>,
}

// ────────────────────────────────────────────────────────────────────────────
// Layout stage
// ────────────────────────────────────────────────────────────────────────────

struct PageCursor<'a> {
    catalog: &'a FontCatalog,
    pages: Vec<PageLayout>,
    y: f32,
}

impl<'a> PageCursor<'a> {
    fn new(catalog: &'a FontCatalog) -> Self {
        PageCursor {
            catalog,
            pages: vec![PageLayout::default()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// The sole page-break trigger: when the current page cannot fit
    /// `needed` more points of height, start a new page at the top margin.
    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed >= MARGIN {
            return;
        }
        self.pages.push(PageLayout::default());
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn push(&mut self, op: PageOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Substitutes characters the active fonts cannot render, before any
    /// measurement, so wrapping math matches what actually draws.
    fn ascii_safe(&self, s: &str) -> String {
        let out = s.replace('→', "->");
        if self.catalog.is_fallback() {
            out.replace(['•', '\u{2022}'], "*")
        } else {
            out
        }
    }

    fn text(&mut self, text: &str, x: f32, size: f32, bold: bool) {
        self.push(PageOp::Text {
            text: text.to_string(),
            x,
            y: self.y,
            size,
            bold,
        });
    }

    fn rule(&mut self) {
        self.ensure_space(14.0);
        self.push(PageOp::Rule {
            x1: MARGIN,
            x2: PAGE_WIDTH - MARGIN,
            y: self.y - 4.0,
            thickness: 0.7,
        });
        self.y -= 14.0;
    }

    /// Wraps and draws a paragraph at the left margin.
    fn paragraph(&mut self, text: &str, size: f32, bold: bool) {
        let safe = self.ascii_safe(text);
        let role = if bold { FontRole::Display } else { FontRole::Body };
        for line in wrap_measured(&safe, self.catalog, role, size, CONTENT_WIDTH) {
            self.ensure_space(size + 4.0);
            self.text(&line, MARGIN, size, bold);
            self.y -= size + 3.0;
        }
    }

    /// Thin rule, uppercase bold heading, and a larger-than-body gap —
    /// consistently before every top-level section.
    fn section_heading(&mut self, title: &str) {
        self.y -= 6.0;
        self.rule();
        self.ensure_space(18.0);
        let upper = self.ascii_safe(&title.to_uppercase());
        self.text(&upper, MARGIN, SIZE_HEADING, true);
        self.y -= 22.0;
    }

    fn measure(&self, text: &str, role: FontRole, size: f32) -> f32 {
        self.catalog.measure_width(text, role, size)
    }
}

/// Lays the tree out onto fixed-size pages. Pure; the only state is the
/// page cursor.
pub fn layout_pages(tree: &LayoutTree, catalog: &FontCatalog) -> Vec<PageLayout> {
    let mut cur = PageCursor::new(catalog);

    // ── Header: name, top-right role, contact row ──
    cur.ensure_space(40.0);
    let name = cur.ascii_safe(&tree.header.name);
    cur.text(&name, MARGIN, SIZE_NAME, true);

    if let Some(role) = &tree.header.role_title {
        let max_width = CONTENT_WIDTH * 0.55;
        let mut size = SIZE_ROLE_MAX;
        let mut text = cur.ascii_safe(role);
        while cur.measure(&text, FontRole::Display, size) > max_width && size > SIZE_ROLE_MIN {
            size -= 0.5;
        }
        if cur.measure(&text, FontRole::Display, size) > max_width {
            while text.chars().count() > 10
                && cur.measure(&format!("{text}..."), FontRole::Display, size) > max_width
            {
                text.pop();
            }
            text = format!("{text}...");
        }
        let w = cur.measure(&text, FontRole::Display, size);
        cur.text(&text, MARGIN + CONTENT_WIDTH - w, size, true);
    }
    cur.y -= 26.0;

    if !tree.header.contact.is_empty() {
        cur.ensure_space(16.0);
        let mut x = MARGIN;
        for (i, item) in tree.header.contact.iter().enumerate() {
            if i > 0 {
                cur.text(HEADER_PIPE, x, SIZE_CONTACT, false);
                x += cur.measure(HEADER_PIPE, FontRole::Body, SIZE_CONTACT);
            }
            match item {
                ContactItem::Text(t) => {
                    let safe = cur.ascii_safe(t);
                    cur.text(&safe, x, SIZE_CONTACT, false);
                    x += cur.measure(&safe, FontRole::Body, SIZE_CONTACT);
                }
                ContactItem::Link { label, .. } => {
                    let safe = cur.ascii_safe(label);
                    let w = cur.measure(&safe, FontRole::Body, SIZE_CONTACT);
                    cur.text(&safe, x, SIZE_CONTACT, false);
                    let y = cur.y;
                    cur.push(PageOp::Rule {
                        x1: x,
                        x2: x + w,
                        y: y - 1.0,
                        thickness: 0.6,
                    });
                    x += w;
                }
            }
        }
        cur.y -= 13.0;
    }

    // ── Sections ──
    for section in &tree.sections {
        cur.section_heading(&section.title);
        for block in &section.blocks {
            match block {
                SectionBlock::Paragraph(text) => {
                    cur.paragraph(text, SIZE_SUMMARY, false);
                    cur.y -= 2.0;
                }
                SectionBlock::SkillGroup { title, lines } => {
                    cur.paragraph(title, SIZE_GROUP_TITLE, true);
                    cur.y -= 2.0;
                    for line in lines {
                        cur.paragraph(line, SIZE_SKILL_LINE, false);
                        cur.y -= 2.0;
                    }
                    cur.y -= 6.0;
                }
                SectionBlock::Experience {
                    role_line,
                    meta_line,
                    bullets,
                } => {
                    if !role_line.is_empty() {
                        cur.paragraph(role_line, SIZE_ROLE_LINE, true);
                        cur.y -= 3.0;
                    }
                    if !meta_line.is_empty() {
                        cur.paragraph(meta_line, SIZE_META, false);
                        cur.y -= 6.0;
                    }
                    for b in bullets {
                        cur.paragraph(&format!("• {b}"), SIZE_BULLET, false);
                        cur.y -= LINE_GAP;
                    }
                    cur.y -= 6.0;
                }
                SectionBlock::Bullet(text) => {
                    cur.paragraph(&format!("• {text}"), SIZE_BULLET, false);
                    cur.y -= LINE_GAP;
                }
                SectionBlock::Education {
                    school,
                    degree,
                    field,
                    year,
                } => {
                    let row: Vec<&str> = [school, degree, field, year]
                        .into_iter()
                        .filter(|s| !s.is_empty())
                        .map(|s| s.as_str())
                        .collect();
                    if !row.is_empty() {
                        cur.paragraph(&format!("• {}", row.join(" • ")), SIZE_BULLET, false);
                        cur.y -= LINE_GAP;
                    }
                }
            }
        }
    }

    cur.pages
}

// ────────────────────────────────────────────────────────────────────────────
// Serialization stage
// ────────────────────────────────────────────────────────────────────────────

const FONT_BODY: Name = Name(b"F1");
const FONT_BOLD: Name = Name(b"F2");
const FONT_DISPLAY: Name = Name(b"F3");

/// Encodes a string as WinAnsi bytes for the builtin fonts. The common
/// typographic characters map to their CP1252 slots; everything else outside
/// Latin-1 degrades to `?`.
fn winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' | '\u{2022}' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            c if (c as u32) < 0x80 => c as u8,
            c if (0xA0..0x100).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Serializes the page model to PDF bytes.
///
/// This is the only stage of the pipeline allowed to fail; everything layout
/// -side has already degraded.
pub fn write_pdf(pages: &[PageLayout], catalog: &FontCatalog) -> Result<Bytes, RenderError> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let body_id = Ref::new(3);
    let bold_id = Ref::new(4);
    let display_id = Ref::new(5);
    let descriptor_id = Ref::new(6);
    let font_file_id = Ref::new(7);
    let cmap_id = Ref::new(8);
    let cid_id = Ref::new(9);
    let page_ref = |i: usize| Ref::new(10 + 2 * i as i32);
    let content_ref = |i: usize| Ref::new(11 + 2 * i as i32);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids((0..pages.len()).map(page_ref))
        .count(pages.len() as i32);

    // Builtin WinAnsi pair. F2 doubles as the display face in fallback mode.
    pdf.type1_font(body_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    // Embedded display face as a Type0/CID font with Identity-H encoding.
    let embedded_face = match catalog.display_font_bytes() {
        Some(data) => match ttf_parser::Face::parse(data, 0) {
            Ok(face) => Some((face, data)),
            Err(e) => {
                return Err(RenderError::Serialize(format!(
                    "embedded display font no longer parses: {e}"
                )))
            }
        },
        None => None,
    };

    if let Some((face, data)) = &embedded_face {
        embed_display_font(
            &mut pdf,
            face,
            data,
            pages,
            display_id,
            cid_id,
            descriptor_id,
            font_file_id,
            cmap_id,
        );
    }

    let display_is_embedded = embedded_face.is_some();
    let boost = !catalog.supports_native_bold();

    for (i, page_layout) in pages.iter().enumerate() {
        let mut content = Content::new();
        for op in &page_layout.ops {
            match op {
                PageOp::Text { text, x, y, size, bold } => {
                    let offsets: &[f32] = if *bold && boost { &[0.0, 0.24, 0.48] } else { &[0.0] };
                    for dx in offsets {
                        content.begin_text();
                        match &embedded_face {
                            Some((face, _)) if *bold => {
                                content.set_font(FONT_DISPLAY, *size);
                                content.next_line(x + dx, *y);
                                content.show(Str(&glyph_bytes(face, text)));
                            }
                            _ => {
                                content.set_font(if *bold { FONT_BOLD } else { FONT_BODY }, *size);
                                content.next_line(x + dx, *y);
                                content.show(Str(&winansi_bytes(text)));
                            }
                        }
                        content.end_text();
                    }
                }
                PageOp::Rule { x1, x2, y, thickness } => {
                    content.set_line_width(*thickness);
                    content.set_stroke_gray(RULE_GRAY);
                    content.move_to(*x1, *y);
                    content.line_to(*x2, *y);
                    content.stroke();
                }
            }
        }
        pdf.stream(content_ref(i), &content.finish());

        let mut page = pdf.page(page_ref(i));
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(page_tree_id);
        page.contents(content_ref(i));
        {
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            fonts.pair(FONT_BODY, body_id);
            fonts.pair(FONT_BOLD, bold_id);
            if display_is_embedded {
                fonts.pair(FONT_DISPLAY, display_id);
            }
        }
        page.finish();
    }

    Ok(Bytes::from(pdf.finish()))
}

/// Two-byte big-endian glyph IDs for Identity-H encoded text. Characters the
/// face does not map draw as glyph 0 (notdef).
fn glyph_bytes(face: &ttf_parser::Face, text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for c in text.chars() {
        let gid = face.glyph_index(c).map(|g| g.0).unwrap_or(0);
        out.extend_from_slice(&gid.to_be_bytes());
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn embed_display_font(
    pdf: &mut Pdf,
    face: &ttf_parser::Face,
    data: &[u8],
    pages: &[PageLayout],
    display_id: Ref,
    cid_id: Ref,
    descriptor_id: Ref,
    font_file_id: Ref,
    cmap_id: Ref,
) {
    const BASE_FONT: Name = Name(b"RSMDSP+Display");
    const SYSTEM_INFO: SystemInfo = SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    };

    let units_per_em = face.units_per_em() as f32;
    let scale = 1000.0 / units_per_em.max(1.0);

    pdf.type0_font(display_id)
        .base_font(BASE_FONT)
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_id)
        .to_unicode(cmap_id);

    let mut cid = pdf.cid_font(cid_id);
    cid.subtype(CidFontType::Type2);
    cid.base_font(BASE_FONT);
    cid.system_info(SYSTEM_INFO);
    cid.font_descriptor(descriptor_id);
    cid.default_width(units_per_em * scale * 0.5);
    cid.cid_to_gid_map_predefined(Name(b"Identity"));
    let advances: Vec<f32> = (0..face.number_of_glyphs())
        .map(|g| {
            face.glyph_hor_advance(ttf_parser::GlyphId(g))
                .map(|a| a as f32 * scale)
                .unwrap_or(0.0)
        })
        .collect();
    cid.widths().consecutive(0, advances.iter().copied());
    cid.finish();

    let bbox = face
        .global_bounding_box();
    let to_pdf = |v: i16| v as f32 * scale;
    let mut descriptor = pdf.font_descriptor(descriptor_id);
    descriptor
        .name(BASE_FONT)
        .flags(FontFlags::NON_SYMBOLIC)
        .bbox(Rect::new(
            to_pdf(bbox.x_min),
            to_pdf(bbox.y_min),
            to_pdf(bbox.x_max),
            to_pdf(bbox.y_max),
        ))
        .italic_angle(0.0)
        .ascent(to_pdf(face.ascender()))
        .descent(to_pdf(face.descender()))
        .cap_height(to_pdf(face.capital_height().unwrap_or(face.ascender())))
        .stem_v(90.0);
    descriptor.font_file2(font_file_id);
    descriptor.finish();

    // ToUnicode CMap over the characters actually drawn with the display face.
    let mut cmap = UnicodeCmap::new(Name(b"Custom"), SYSTEM_INFO);
    let mut seen = std::collections::HashSet::new();
    for page in pages {
        for op in &page.ops {
            if let PageOp::Text { text, bold: true, .. } = op {
                for c in text.chars() {
                    if let Some(gid) = face.glyph_index(c) {
                        if seen.insert(gid.0) {
                            cmap.pair(gid.0, c);
                        }
                    }
                }
            }
        }
    }
    pdf.cmap(cmap_id, &cmap.finish());

    let mut stream = pdf.stream(font_file_id, data);
    stream.pair(Name(b"Length1"), data.len() as i32);
}

/// Full PDF render: layout then serialize.
pub fn render_pdf(tree: &LayoutTree, catalog: &FontCatalog) -> Result<Bytes, RenderError> {
    let pages = layout_pages(tree, catalog);
    write_pdf(&pages, catalog)
}
