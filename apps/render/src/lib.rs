//! Resume render core — a pure pipeline from a normalized resume document to
//! byte-exact PDF and DOCX outputs that stay visually consistent with each
//! other and parse cleanly in applicant-tracking systems.
//!
//! Pipeline: content normalization → skill taxonomy classification → text
//! flow (greedy wrapping) → one of two format painters over a shared layout
//! tree. No network, filesystem, or database access happens inside the core;
//! font bytes arrive through the caller-supplied [`render::FontSource`].

pub mod config;
pub mod errors;
pub mod layout;
pub mod models;
pub mod normalize;
pub mod render;
pub mod skills;

pub use config::RenderOptions;
pub use errors::RenderError;
pub use models::ResumeDocContent;
pub use render::{FontSource, OutputFormat, RenderedDocument, ResumeRenderer};
