use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use render::config::{Config, RenderOptions};
use render::models::ResumeDocContent;
use render::render::{FontSource, OutputFormat, ResumeRenderer};

/// Reads the preferred display font from a local path.
struct FileFontSource {
    path: String,
}

#[async_trait]
impl FontSource for FileFontSource {
    async fn fetch(&self) -> Result<Bytes> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("reading display font from {}", self.path))?;
        Ok(Bytes::from(bytes))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume render v{}", env!("CARGO_PKG_VERSION"));

    let raw = tokio::fs::read_to_string(&config.input_path)
        .await
        .with_context(|| format!("reading resume document from {}", config.input_path))?;
    // Malformed or null input degrades to an empty document; the renderer
    // always produces some valid output file.
    let content: ResumeDocContent = match serde_json::from_str(&raw) {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            warn!("input document is null; rendering an empty skeleton");
            ResumeDocContent::default()
        }
        Err(e) => {
            warn!("input document did not parse ({e}); rendering an empty skeleton");
            ResumeDocContent::default()
        }
    };

    let mut options = RenderOptions::default();
    if let Some(title) = &config.target_title {
        options.target_title = title.clone();
    }

    let font_source = config.display_font_path.as_ref().map(|path| FileFontSource {
        path: path.clone(),
    });
    let renderer = ResumeRenderer::prepare(
        options,
        font_source.as_ref().map(|s| s as &dyn FontSource),
    )
    .await;

    tokio::fs::create_dir_all(&config.out_dir)
        .await
        .with_context(|| format!("creating output directory {}", config.out_dir))?;

    for format in [OutputFormat::Pdf, OutputFormat::Docx] {
        let out = renderer.render(&content, format)?;
        let path = Path::new(&config.out_dir).join(format!("resume.{}", format.extension()));
        tokio::fs::write(&path, &out.bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        info!(
            "Wrote {} ({} bytes, {})",
            path.display(),
            out.bytes.len(),
            out.mime_type
        );
    }

    Ok(())
}
