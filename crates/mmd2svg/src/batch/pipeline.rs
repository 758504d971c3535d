//! Batch conversion pipeline
//!
//! Discovery → per-file transaction → aggregated result:
//!
//! 1. [`find_files`] resolves the input specifier. Zero candidates fails the
//!    whole run with [`Mmd2svgError::NoFilesFound`].
//! 2. Each file, in discovery order, runs one transaction: resolve the output
//!    path, create its parent directory, honor the overwrite policy, read the
//!    source, render, write.
//! 3. A failing transaction is recorded. Unless `skip_errors` is set, its
//!    error then aborts the run and later files are never attempted.
//!
//! Files are processed strictly one after another.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, span, warn, Level};

use super::finder::find_files;
use super::output::resolve_output_path;
use super::result::{BatchItemResult, BatchResult};
use crate::core::{DiagramRenderer, Mmd2svgError, RenderingConfig, Result, SourceFile};

/// Runs conversions through a [`DiagramRenderer`]
pub struct BatchPipeline<R> {
    renderer: R,
}

impl<R: DiagramRenderer> BatchPipeline<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Convert every diagram source named by `input` into `output_root`
    ///
    /// # Errors
    ///
    /// - [`Mmd2svgError::NotFound`] / [`Mmd2svgError::InvalidPattern`] from discovery
    /// - [`Mmd2svgError::NoFilesFound`] when discovery yields nothing
    /// - the first per-item error when `config.skip_errors()` is false
    pub fn run(
        &self,
        input: &str,
        output_root: &Path,
        config: &RenderingConfig,
    ) -> Result<BatchResult> {
        self.run_with_progress(input, output_root, config, |_| {})
    }

    /// Like [`run`](Self::run), reporting each outcome to `on_item` as soon as it is recorded
    ///
    /// The failing item of an aborting run is reported before the error is
    /// returned, so an observer always sees every attempted file.
    pub fn run_with_progress<F>(
        &self,
        input: &str,
        output_root: &Path,
        config: &RenderingConfig,
        mut on_item: F,
    ) -> Result<BatchResult>
    where
        F: FnMut(&BatchItemResult),
    {
        let run_span = span!(
            Level::INFO,
            "batch_run",
            input,
            output_root = %output_root.display(),
            renderer = self.renderer.name()
        );
        let _enter = run_span.enter();

        let files = find_files(input, config.recursive())?;
        if files.is_empty() {
            warn!("No recognized diagram sources found");
            return Err(Mmd2svgError::no_files_found(input));
        }

        let base_dir = Path::new(input).is_dir().then(|| PathBuf::from(input));
        info!(file_count = files.len(), "Starting batch conversion");

        let mut result = BatchResult::new();
        for file in &files {
            match self.process_file(file, output_root, base_dir.as_deref(), config) {
                Ok(item) => {
                    on_item(&item);
                    result.push(item);
                }
                Err(err) => {
                    debug_assert!(
                        err.is_per_item(),
                        "item transaction produced a run-level error: {err}"
                    );
                    let item = BatchItemResult::failed(file.path(), err.to_string());
                    on_item(&item);
                    result.push(item);

                    if !config.skip_errors() {
                        warn!(
                            file = %file.path().display(),
                            attempted = result.len(),
                            remaining = files.len() - result.len(),
                            "Aborting batch on first error"
                        );
                        return Err(err);
                    }
                }
            }
        }

        info!(
            succeeded = result.succeeded_count(),
            failed = result.failed_count(),
            "Batch conversion finished"
        );
        Ok(result)
    }

    /// Convert a single source file to `output`
    ///
    /// The overwrite policy applies here too: with `config.overwrite()` off, an
    /// existing `output` is left untouched and the renderer is not invoked.
    ///
    /// # Errors
    ///
    /// [`Mmd2svgError::NotFound`] if `input` does not exist,
    /// [`Mmd2svgError::OutputExists`] if `output` exists and overwriting is
    /// disabled, otherwise any read, render, or write error.
    pub fn convert_file(
        &self,
        input: &Path,
        output: &Path,
        config: &RenderingConfig,
    ) -> Result<PathBuf> {
        if !input.exists() {
            return Err(Mmd2svgError::not_found(input));
        }
        if !config.overwrite() && output.exists() {
            return Err(Mmd2svgError::OutputExists {
                path: output.to_path_buf(),
            });
        }

        ensure_parent_dir(output)?;
        self.render_to(input, output, config)?;
        info!(input = %input.display(), output = %output.display(), "Converted diagram");
        Ok(output.to_path_buf())
    }

    /// One item transaction
    ///
    /// `Ok` carries the recorded outcome, including the non-aborting
    /// "already exists" failure; `Err` is a failure subject to `skip_errors`.
    fn process_file(
        &self,
        file: &SourceFile,
        output_root: &Path,
        base_dir: Option<&Path>,
        config: &RenderingConfig,
    ) -> Result<BatchItemResult> {
        let item_span = span!(Level::DEBUG, "batch_item", file = %file.path().display());
        let _enter = item_span.enter();

        let output = resolve_output_path(file.path(), output_root, base_dir);
        ensure_parent_dir(&output)?;

        if !config.overwrite() && output.exists() {
            debug!(output = %output.display(), "Output exists and overwrite is disabled");
            let skipped = Mmd2svgError::OutputExists { path: output };
            return Ok(BatchItemResult::failed(file.path(), skipped.to_string()));
        }

        self.render_to(file.path(), &output, config)?;
        debug!(output = %output.display(), "Item converted");
        Ok(BatchItemResult::succeeded(file.path(), output))
    }

    fn render_to(&self, input: &Path, output: &Path, config: &RenderingConfig) -> Result<()> {
        let source =
            fs::read_to_string(input).map_err(|e| Mmd2svgError::read_error(input, e))?;
        let rendered = self.renderer.render(&source, config)?;
        fs::write(output, rendered).map_err(|e| Mmd2svgError::write_error(output, e))
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| Mmd2svgError::write_error(parent, e))
        }
        _ => Ok(()),
    }
}
