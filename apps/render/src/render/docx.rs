//! Word-processor painter — WordprocessingML built by hand, zipped into the
//! standard OOXML container.
//!
//! Walks the same layout tree as the page-description painter, but emits an
//! abstract document (paragraphs, styled runs, spacing, borders) and leaves
//! page breaking to the consuming viewer. Styling constants are tuned to
//! visually match the PDF output at the same nominal point sizes: run sizes
//! in half-points, spacing in twentieths of a point, indents in twips.
//! Section headings carry a top border instead of a drawn rule; bullets carry
//! a list-marker reference and hanging indent instead of a literal glyph.

use std::io::{Cursor, Write};

use bytes::Bytes;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

use crate::config::RenderOptions;
use crate::errors::RenderError;
use crate::layout::tree::{ContactItem, LayoutTree, SectionBlock};
use crate::normalize::HEADER_PIPE;

// ────────────────────────────────────────────────────────────────────────────
// Styling constants
// ────────────────────────────────────────────────────────────────────────────

/// Half-point run sizes (22 = 11 pt).
const SZ_DEFAULT: u32 = 22;
const SZ_NAME: u32 = 36;
const SZ_CONTACT: u32 = 20;
const SZ_ROLE_TOP: u32 = 20;
const SZ_HEADING: u32 = 21;
const SZ_GROUP_TITLE: u32 = 24;
const SZ_SKILL_LINE: u32 = 21;
const SZ_SUMMARY: u32 = 22;
const SZ_ROLE_LINE: u32 = 24;
const SZ_META: u32 = 22;
const SZ_BULLET: u32 = 21;

/// Twentieths-of-a-point spacing. 90 ≈ 4.5 pt — the shared line-gap rhythm
/// between skills lines and bullets.
const LINE_GAP: u32 = 90;
const LINE_SINGLE_TIGHT: u32 = 252;
const LINE_SUMMARY: u32 = 276;

const fn inches_to_twip(inches: f32) -> i32 {
    (inches * 1440.0) as i32
}

const PAGE_MARGIN_TWIPS: i32 = inches_to_twip(0.75);
const BULLET_INDENT_LEFT: i32 = inches_to_twip(0.25);
const BULLET_INDENT_HANGING: i32 = inches_to_twip(0.15);
const ROLE_TAB_STOP: i32 = inches_to_twip(7.0);

// ────────────────────────────────────────────────────────────────────────────
// XML assembly
// ────────────────────────────────────────────────────────────────────────────

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// A styled text run.
fn run(text: &str, sz: u32, bold: bool, underline: bool) -> String {
    let mut props = String::new();
    if bold {
        props.push_str("<w:b/>");
    }
    if underline {
        props.push_str(r#"<w:u w:val="single"/>"#);
    }
    props.push_str(&format!(r#"<w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/>"#));
    props.push_str(r#"<w:color w:val="000000"/>"#);
    format!(
        r#"<w:r><w:rPr>{props}</w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
        escape_xml(text)
    )
}

fn spacing(before: Option<u32>, after: u32, line: Option<u32>) -> String {
    let mut attrs = String::new();
    if let Some(b) = before {
        attrs.push_str(&format!(r#" w:before="{b}""#));
    }
    attrs.push_str(&format!(r#" w:after="{after}""#));
    if let Some(l) = line {
        attrs.push_str(&format!(r#" w:line="{l}" w:lineRule="auto""#));
    }
    format!("<w:spacing{attrs}/>")
}

fn paragraph(ppr: &str, runs: &str) -> String {
    if ppr.is_empty() {
        format!("<w:p>{runs}</w:p>")
    } else {
        format!("<w:p><w:pPr>{ppr}</w:pPr>{runs}</w:p>")
    }
}

/// Builds `word/document.xml` and the list of external hyperlink targets (in
/// relationship-id order, starting at rId3).
pub(crate) fn build_document_xml(tree: &LayoutTree) -> (String, Vec<String>) {
    let mut body = String::new();
    let mut links: Vec<String> = Vec::new();

    // ── Header: name (with optional top-right role on a right tab stop) ──
    // pPr children follow the schema sequence: tabs before spacing.
    let mut name_runs = run(&tree.header.name, SZ_NAME, true, false);
    let mut name_ppr = String::new();
    if let Some(role) = &tree.header.role_title {
        name_runs.push_str("<w:r><w:tab/></w:r>");
        name_runs.push_str(&run(role, SZ_ROLE_TOP, true, false));
        name_ppr.push_str(&format!(
            r#"<w:tabs><w:tab w:val="right" w:pos="{ROLE_TAB_STOP}"/></w:tabs>"#
        ));
    }
    name_ppr.push_str(&spacing(None, 60, None));
    body.push_str(&paragraph(&name_ppr, &name_runs));

    if !tree.header.contact.is_empty() {
        let mut runs = String::new();
        for (i, item) in tree.header.contact.iter().enumerate() {
            if i > 0 {
                runs.push_str(&run(HEADER_PIPE, SZ_CONTACT, false, false));
            }
            match item {
                ContactItem::Text(t) => runs.push_str(&run(t, SZ_CONTACT, false, false)),
                ContactItem::Link { label, url } => {
                    links.push(url.clone());
                    let r_id = format!("rId{}", 2 + links.len());
                    runs.push_str(&format!(
                        r#"<w:hyperlink r:id="{r_id}">{}</w:hyperlink>"#,
                        run(label, SZ_CONTACT, false, true)
                    ));
                }
            }
        }
        body.push_str(&paragraph(&spacing(None, 120, None), &runs));
    }

    // ── Sections ──
    for section in &tree.sections {
        body.push_str(&heading_paragraph(&section.title));
        for block in &section.blocks {
            match block {
                SectionBlock::Paragraph(text) => {
                    body.push_str(&paragraph(
                        &spacing(None, LINE_GAP, Some(LINE_SUMMARY)),
                        &run(text, SZ_SUMMARY, false, false),
                    ));
                }
                SectionBlock::SkillGroup { title, lines } => {
                    body.push_str(&paragraph(
                        &spacing(None, 20, None),
                        &run(title, SZ_GROUP_TITLE, true, false),
                    ));
                    for line in lines {
                        body.push_str(&paragraph(
                            &spacing(None, 30, Some(LINE_SINGLE_TIGHT)),
                            &run(line, SZ_SKILL_LINE, false, false),
                        ));
                    }
                    body.push_str(&paragraph(&spacing(None, 40, None), ""));
                }
                SectionBlock::Experience {
                    role_line,
                    meta_line,
                    bullets,
                } => {
                    if !role_line.is_empty() {
                        body.push_str(&paragraph(
                            &spacing(None, 60, None),
                            &run(role_line, SZ_ROLE_LINE, true, false),
                        ));
                    }
                    if !meta_line.is_empty() {
                        body.push_str(&paragraph(
                            &spacing(None, 120, None),
                            &run(meta_line, SZ_META, false, false),
                        ));
                    }
                    for b in bullets {
                        body.push_str(&bullet_paragraph(b));
                    }
                    body.push_str(&paragraph(&spacing(None, LINE_GAP, None), ""));
                }
                SectionBlock::Bullet(text) => {
                    body.push_str(&bullet_paragraph(text));
                }
                SectionBlock::Education {
                    school,
                    degree,
                    field,
                    year,
                } => {
                    let meta: Vec<&str> = [school, year]
                        .into_iter()
                        .filter(|s| !s.is_empty())
                        .map(|s| s.as_str())
                        .collect();
                    if !meta.is_empty() {
                        body.push_str(&paragraph(
                            &spacing(None, 30, None),
                            &run(&meta.join(" • "), SZ_BULLET, true, false),
                        ));
                    }
                    let line: Vec<&str> = [degree, field]
                        .into_iter()
                        .filter(|s| !s.is_empty())
                        .map(|s| s.as_str())
                        .collect();
                    if !line.is_empty() {
                        body.push_str(&paragraph(
                            &spacing(None, LINE_GAP, None),
                            &run(&line.join(", "), SZ_BULLET, false, false),
                        ));
                    }
                }
            }
        }
    }

    // Page geometry: US letter with 0.75" margins.
    body.push_str(&format!(
        r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}"/></w:sectPr>"#,
        m = PAGE_MARGIN_TWIPS
    ));

    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{body}</w:body></w:document>"#
    );
    (document, links)
}

/// Section heading: uppercase bold text with a thin top border — the
/// word-processor analog of the PDF's drawn rule.
fn heading_paragraph(title: &str) -> String {
    // pBdr precedes spacing in the pPr schema sequence.
    let ppr = format!(
        r#"<w:pBdr><w:top w:val="single" w:sz="6" w:space="1" w:color="E6E6E6"/></w:pBdr>{}"#,
        spacing(Some(180), 120, None)
    );
    paragraph(&ppr, &run(&title.to_uppercase(), SZ_HEADING, true, false))
}

/// Bullet paragraph: list-marker numbering reference and a hanging indent
/// instead of a literal glyph.
fn bullet_paragraph(text: &str) -> String {
    // numPr, then spacing, then ind — schema sequence.
    let ppr = format!(
        r#"<w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr>{}<w:ind w:left="{BULLET_INDENT_LEFT}" w:hanging="{BULLET_INDENT_HANGING}"/>"#,
        spacing(None, LINE_GAP, Some(LINE_SINGLE_TIGHT))
    );
    paragraph(&ppr, &run(text, SZ_BULLET, false, false))
}

fn build_styles_xml(font_family: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{f}" w:hAnsi="{f}" w:cs="{f}"/><w:sz w:val="{SZ_DEFAULT}"/><w:szCs w:val="{SZ_DEFAULT}"/><w:color w:val="000000"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:line="{LINE_SINGLE_TIGHT}" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="character" w:styleId="Hyperlink"><w:name w:val="Hyperlink"/><w:rPr><w:u w:val="single"/><w:color w:val="000000"/></w:rPr></w:style></w:styles>"#,
        f = escape_xml(font_family)
    )
}

fn build_numbering_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="{BULLET_INDENT_LEFT}" w:hanging="{BULLET_INDENT_HANGING}"/></w:pPr></w:lvl></w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#
    )
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

fn build_document_rels_xml(links: &[String]) -> String {
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>"#,
    );
    for (i, url) in links.iter().enumerate() {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="{}" TargetMode="External"/>"#,
            3 + i,
            escape_xml(url)
        ));
    }
    rels.push_str("</Relationships>");
    rels
}

// ────────────────────────────────────────────────────────────────────────────
// Container
// ────────────────────────────────────────────────────────────────────────────

/// Renders the tree to DOCX bytes. Packing the container is the only step
/// here that can fail.
pub fn render_docx(tree: &LayoutTree, options: &RenderOptions) -> Result<Bytes, RenderError> {
    let (document, links) = build_document_xml(tree);
    let styles = build_styles_xml(&options.display_font_family);
    let numbering = build_numbering_xml();
    let document_rels = build_document_rels_xml(&links);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", deflated)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;
    zip.start_file("_rels/.rels", deflated)?;
    zip.write_all(ROOT_RELS_XML.as_bytes())?;
    zip.start_file("word/document.xml", deflated)?;
    zip.write_all(document.as_bytes())?;
    zip.start_file("word/styles.xml", deflated)?;
    zip.write_all(styles.as_bytes())?;
    zip.start_file("word/numbering.xml", deflated)?;
    zip.write_all(numbering.as_bytes())?;
    zip.start_file("word/_rels/document.xml.rels", deflated)?;
    zip.write_all(document_rels.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(Bytes::from(cursor.into_inner()))
}

/// Ordered uppercase section headings present in a document.xml string —
/// the word-processor side of the cross-format parity check.
pub(crate) fn heading_titles_in_xml(document_xml: &str) -> Vec<String> {
    let marker = r#"<w:pBdr>"#;
    let mut out = Vec::new();
    let mut rest = document_xml;
    while let Some(idx) = rest.find(marker) {
        rest = &rest[idx..];
        if let Some(start) = rest.find("preserve\">") {
            let tail = &rest[start + "preserve\">".len()..];
            if let Some(end) = tail.find("</w:t>") {
                out.push(tail[..end].to_string());
            }
            rest = tail;
        } else {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderOptions;
    use crate::layout::build_layout_tree;
    use crate::models::{Contact, EducationEntry, ExperienceEntry, ResumeDocContent, Skills};

    fn make_doc() -> ResumeDocContent {
        ResumeDocContent {
            contact: Contact {
                full_name: "Ravi Yeluru".to_string(),
                email: "ravi@example.com".to_string(),
                phone: "5125550147".to_string(),
                linkedin_url: "linkedin.com/in/ravi".to_string(),
                github_url: "github.com/ravi".to_string(),
                ..Default::default()
            },
            summary: "Engineer focused on data platforms.".to_string(),
            skills: Skills {
                technical: vec!["Python".to_string(), "SQL".to_string()],
                soft: vec![],
            },
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme <Data> & Co".to_string(),
                start: "2020".to_string(),
                end: "2023".to_string(),
                location: "Remote".to_string(),
                bullets: vec!["Shipped the ingestion pipeline".to_string()],
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

    fn document_xml(doc: &ResumeDocContent) -> (String, Vec<String>) {
        let tree = build_layout_tree(doc, &RenderOptions::default());
        build_document_xml(&tree)
    }

    #[test]
    fn test_document_contains_headings_in_order() {
        let (xml, _) = document_xml(&make_doc());
        assert_eq!(
            heading_titles_in_xml(&xml),
            vec![
                "PROFESSIONAL SUMMARY",
                "CORE TECHNICAL SKILLS",
                "PROFESSIONAL EXPERIENCE",
                "CERTIFICATIONS",
                "EDUCATION"
            ]
        );
    }

    #[test]
    fn test_xml_escapes_reserved_characters() {
        let (xml, _) = document_xml(&make_doc());
        assert!(xml.contains("Acme &lt;Data&gt; &amp; Co"));
        assert!(!xml.contains("<Data>"));
    }

    #[test]
    fn test_hyperlink_relationships_collected() {
        let (xml, links) = document_xml(&make_doc());
        assert_eq!(
            links,
            vec![
                "https://linkedin.com/in/ravi".to_string(),
                "https://github.com/ravi".to_string()
            ]
        );
        assert!(xml.contains(r#"<w:hyperlink r:id="rId3">"#));
        assert!(xml.contains(r#"<w:hyperlink r:id="rId4">"#));
        let rels = build_document_rels_xml(&links);
        assert!(rels.contains(r#"Id="rId3""#) && rels.contains("TargetMode=\"External\""));
    }

    #[test]
    fn test_bullets_use_numbering_not_glyph() {
        let (xml, _) = document_xml(&make_doc());
        assert!(xml.contains(r#"<w:numId w:val="1"/>"#));
        // list paragraphs carry the marker property, not a literal glyph
        assert!(!xml.contains("• Shipped the ingestion pipeline"));
    }

    #[test]
    fn test_heading_carries_top_border() {
        let (xml, _) = document_xml(&make_doc());
        assert!(xml.contains(r#"<w:top w:val="single" w:sz="6" w:space="1" w:color="E6E6E6"/>"#));
    }

    #[test]
    fn test_render_docx_produces_zip_bytes() {
        let tree = build_layout_tree(&make_doc(), &RenderOptions::default());
        let bytes = render_docx(&tree, &RenderOptions::default()).expect("render should succeed");
        assert!(bytes.starts_with(b"PK"), "output must be a zip container");
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_empty_document_still_renders() {
        let tree = build_layout_tree(&ResumeDocContent::default(), &RenderOptions::default());
        let bytes = render_docx(&tree, &RenderOptions::default()).expect("render should succeed");
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_styles_carry_display_family() {
        let styles = build_styles_xml("Outfit");
        assert!(styles.contains(r#"w:ascii="Outfit""#));
        assert!(styles.contains(r#"<w:sz w:val="22"/>"#));
    }
}
