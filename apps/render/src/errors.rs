use thiserror::Error;

/// Render pipeline error type.
///
/// Almost nothing in the pipeline is allowed to fail: invalid contact fields,
/// placeholder values, and font embedding problems all degrade silently
/// (logged at `debug`/`warn`). The only hard failures are in the final
/// byte-buffer serialization step, which these variants cover.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error while serializing document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error while packing document container: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Document serialization failed: {0}")]
    Serialize(String),
}
