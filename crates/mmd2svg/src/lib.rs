//! mmd2svg - Convert Mermaid diagram sources into SVG
//!
//! A library for batch-converting Mermaid diagram files (`.mmd`, `.mermaid`)
//! into SVG images. Input may be a single file, a glob pattern, or a directory
//! tree; rendering is delegated to a [`DiagramRenderer`].
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use mmd2svg::{render_batch, RenderingConfig};
//!
//! let result = render_batch("docs/", Path::new("out/"), &RenderingConfig::default())?;
//! println!("{} succeeded, {} failed", result.succeeded_count(), result.failed_count());
//! # Ok::<(), mmd2svg::Mmd2svgError>(())
//! ```
//!
//! # Custom Renderers
//!
//! Anything implementing [`DiagramRenderer`] can drive the pipeline:
//!
//! ```rust
//! use mmd2svg::prelude::*;
//!
//! struct Placeholder;
//!
//! impl DiagramRenderer for Placeholder {
//!     fn render(&self, source: &str, _config: &RenderingConfig) -> Result<Vec<u8>> {
//!         Ok(format!("<svg><!-- {} bytes --></svg>", source.len()).into_bytes())
//!     }
//! }
//!
//! let svg = mmd2svg::render_to_string(&Placeholder, "graph TD; A-->B", &RenderingConfig::default()).unwrap();
//! assert!(svg.starts_with("<svg>"));
//! ```

pub mod batch;
pub mod core;
pub mod renderers;

use std::path::{Path, PathBuf};

pub use crate::batch::{BatchItemResult, BatchPipeline, BatchResult};
pub use crate::core::*;
pub use crate::renderers::MmdcRenderer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::batch::{
        find_files, resolve_output_path, BatchItemResult, BatchPipeline, BatchResult, Failed,
        Succeeded,
    };
    pub use crate::core::{
        ConfigLayer, DiagramRenderer, Mmd2svgError, RenderingConfig, Result, SourceExtension,
        SourceFile,
    };
    pub use crate::renderers::MmdcRenderer;
}

/// Render diagram source text and decode the output as UTF-8
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn render_to_string<R: DiagramRenderer + ?Sized>(
    renderer: &R,
    source: &str,
    config: &RenderingConfig,
) -> Result<String> {
    let bytes = renderer.render(source, config)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Convert every diagram named by `input` into `output_root` using `mmdc`
///
/// See [`BatchPipeline::run`] for the failure policy.
pub fn render_batch(
    input: &str,
    output_root: &Path,
    config: &RenderingConfig,
) -> Result<BatchResult> {
    BatchPipeline::new(MmdcRenderer::new()).run(input, output_root, config)
}

/// Convert a single diagram file to `output` using `mmdc`
pub fn render_file(input: &Path, output: &Path, config: &RenderingConfig) -> Result<PathBuf> {
    BatchPipeline::new(MmdcRenderer::new()).convert_file(input, output, config)
}
