//! Rendering pipeline: normalize → classify → wrap → paint.
//!
//! Both painters consume the same layout tree, so the two output formats can
//! only diverge visually, never structurally. The single async step is
//! acquiring the preferred display font at renderer instantiation; it is
//! awaited under a timeout, falls back to builtin fonts, and never retries.

pub mod docx;
pub mod pdf;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::config::RenderOptions;
use crate::errors::RenderError;
use crate::layout::{build_layout_tree, FontCatalog};
use crate::models::ResumeDocContent;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// How long to wait for the preferred display font before falling back.
const FONT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Docx,
}

impl OutputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => MIME_PDF,
            OutputFormat::Docx => MIME_DOCX,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
        }
    }
}

/// An opaque rendered output: byte buffer plus MIME type. Consumers
/// (download-as-file, upload-to-storage) never look inside.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Bytes,
    pub mime_type: &'static str,
}

/// Capability for acquiring the preferred display font bytes. The caller
/// owns where they come from (disk, object storage, HTTP); the core only
/// awaits the result.
#[async_trait]
pub trait FontSource: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<Bytes>;
}

/// A prepared renderer: options plus the resolved font catalog. Renders are
/// pure and synchronous; two renderers may run concurrently since nothing
/// here is mutated per call.
pub struct ResumeRenderer {
    options: RenderOptions,
    catalog: FontCatalog,
}

impl ResumeRenderer {
    /// Resolves the font catalog and returns a ready renderer. Font fetch
    /// failure or timeout degrades to the builtin fonts — never an error.
    pub async fn prepare(options: RenderOptions, font_source: Option<&dyn FontSource>) -> Self {
        let catalog = match font_source {
            Some(source) => {
                match tokio::time::timeout(FONT_FETCH_TIMEOUT, source.fetch()).await {
                    Ok(Ok(bytes)) => FontCatalog::with_display_font(bytes),
                    Ok(Err(e)) => {
                        warn!("display font fetch failed: {e}; using builtin fonts");
                        FontCatalog::fallback()
                    }
                    Err(_) => {
                        warn!("display font fetch timed out; using builtin fonts");
                        FontCatalog::fallback()
                    }
                }
            }
            None => FontCatalog::fallback(),
        };
        ResumeRenderer { options, catalog }
    }

    /// A renderer over an already-built catalog (tests, sync callers).
    pub fn with_catalog(options: RenderOptions, catalog: FontCatalog) -> Self {
        ResumeRenderer { options, catalog }
    }

    /// Renders one document in one format. The only failure mode is the
    /// output serialization itself; everything upstream degrades.
    pub fn render(
        &self,
        content: &ResumeDocContent,
        format: OutputFormat,
    ) -> Result<RenderedDocument, RenderError> {
        let tree = build_layout_tree(content, &self.options);
        debug!(
            sections = tree.sections.len(),
            contact_items = tree.header.contact.len(),
            "layout tree built"
        );
        let bytes = match format {
            OutputFormat::Pdf => pdf::render_pdf(&tree, &self.catalog)?,
            OutputFormat::Docx => docx::render_docx(&tree, &self.options)?,
        };
        Ok(RenderedDocument {
            bytes,
            mime_type: format.mime_type(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tree::SECTION_SKILLS;
    use crate::models::{Contact, ExperienceEntry, Skills};
    use crate::render::pdf::{layout_pages, PageOp};

    fn make_doc() -> ResumeDocContent {
        ResumeDocContent {
            contact: Contact {
                full_name: "Ravi Yeluru".to_string(),
                email: "ravi@example.com".to_string(),
                ..Default::default()
            },
            summary: "Engineer focused on data platforms.".to_string(),
            skills: Skills {
                technical: vec!["Python".to_string(), "Spark".to_string()],
                soft: vec![],
            },
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                start: "2020".to_string(),
                end: "2023".to_string(),
                location: "Remote".to_string(),
                bullets: vec!["Shipped the ingestion pipeline".to_string()],
            }],
            education: vec![],
            certifications: vec!["AWS SAA".to_string()],
        }
    }

    /// Uppercase headings drawn by the page-description painter, in order.
    fn pdf_headings(doc: &ResumeDocContent, options: &RenderOptions) -> Vec<String> {
        let tree = build_layout_tree(doc, options);
        layout_pages(&tree, &FontCatalog::fallback())
            .iter()
            .flat_map(|p| &p.ops)
            .filter_map(|op| match op {
                PageOp::Text { text, size, bold: true, .. } if *size == 10.5 => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_cross_format_section_parity() {
        let doc = make_doc();
        let options = RenderOptions::default();
        let tree = build_layout_tree(&doc, &options);

        let expected: Vec<String> = tree
            .section_titles()
            .iter()
            .map(|t| t.to_uppercase())
            .collect();

        let from_pdf = pdf_headings(&doc, &options);
        let (document_xml, _) = docx::build_document_xml(&tree);
        let from_docx = docx::heading_titles_in_xml(&document_xml);

        assert_eq!(from_pdf, expected, "page-description headings diverge from tree");
        assert_eq!(from_docx, expected, "word-processor headings diverge from tree");
    }

    #[test]
    fn test_parity_holds_with_suppressed_sections() {
        let mut doc = make_doc();
        doc.summary = String::new();
        doc.certifications = vec![];
        let options = RenderOptions::for_title("Senior Data Analyst");
        let tree = build_layout_tree(&doc, &options);

        let expected: Vec<String> = tree
            .section_titles()
            .iter()
            .map(|t| t.to_uppercase())
            .collect();
        assert!(expected.contains(&SECTION_SKILLS.to_uppercase()));

        let (document_xml, _) = docx::build_document_xml(&tree);
        assert_eq!(docx::heading_titles_in_xml(&document_xml), expected);
        assert_eq!(pdf_headings(&doc, &options), expected);
    }

    #[test]
    fn test_render_both_formats_with_mime_types() {
        let renderer =
            ResumeRenderer::with_catalog(RenderOptions::default(), FontCatalog::fallback());
        let doc = make_doc();

        let pdf = renderer.render(&doc, OutputFormat::Pdf).expect("pdf render");
        assert_eq!(pdf.mime_type, MIME_PDF);
        assert!(pdf.bytes.starts_with(b"%PDF-"));

        let word = renderer.render(&doc, OutputFormat::Docx).expect("docx render");
        assert_eq!(word.mime_type, MIME_DOCX);
        assert!(word.bytes.starts_with(b"PK"));
    }

    struct FailingSource;

    #[async_trait]
    impl FontSource for FailingSource {
        async fn fetch(&self) -> anyhow::Result<Bytes> {
            anyhow::bail!("storage unavailable")
        }
    }

    #[tokio::test]
    async fn test_prepare_falls_back_on_font_fetch_failure() {
        let renderer =
            ResumeRenderer::prepare(RenderOptions::default(), Some(&FailingSource)).await;
        let out = renderer
            .render(&make_doc(), OutputFormat::Pdf)
            .expect("render should still succeed on fallback fonts");
        assert!(out.bytes.starts_with(b"%PDF-"));
    }

    struct GarbageSource;

    #[async_trait]
    impl FontSource for GarbageSource {
        async fn fetch(&self) -> anyhow::Result<Bytes> {
            Ok(Bytes::from_static(b"definitely not a font"))
        }
    }

    #[tokio::test]
    async fn test_prepare_falls_back_on_unparseable_font() {
        let renderer =
            ResumeRenderer::prepare(RenderOptions::default(), Some(&GarbageSource)).await;
        let out = renderer
            .render(&make_doc(), OutputFormat::Docx)
            .expect("render should still succeed");
        assert!(out.bytes.starts_with(b"PK"));
    }
}
