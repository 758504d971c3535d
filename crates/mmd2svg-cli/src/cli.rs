//! Command-line interface for the mmd2svg utility
//!
//! Converts a single Mermaid file, a glob, or a directory of diagrams to SVG.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::report::{should_colorize, Reporter};
use mmd2svg::batch::{is_glob_pattern, with_output_extension};
use mmd2svg::core::config::{find_config_file, load_config_layer};
use mmd2svg::renderers::DEFAULT_MMDC_COMMAND;
use mmd2svg::{BatchPipeline, ConfigLayer, MmdcRenderer, RenderingConfig};

/// Output directory used when the input is not a single file
pub const DEFAULT_BATCH_OUTPUT: &str = "output";

/// mmd2svg - Convert Mermaid diagrams to SVG
#[derive(Parser, Debug)]
#[command(name = "mmd2svg")]
#[command(about = "Convert Mermaid diagram files, globs, and directories to SVG")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    /// Input file, directory, or glob pattern
    pub input: String,

    /// Output file or directory path (default: INPUT.svg, or "output" for batches)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Theme: default, dark, forest, neutral
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Background color (transparent, white, or hex)
    #[arg(short, long)]
    pub background: Option<String>,

    /// Output width in pixels
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Output height in pixels
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Process directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Renderer timeout in milliseconds (default: 30000)
    #[arg(long, value_name = "MILLISECONDS")]
    pub timeout: Option<u64>,

    /// Continue processing even if errors occur
    #[arg(long)]
    pub skip_errors: bool,

    /// Leave existing output files untouched
    #[arg(long)]
    pub no_overwrite: bool,

    /// Config file path (default: .mmd2svg.yml in the working directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Mermaid CLI executable to render with
    #[arg(long, value_name = "PATH", default_value = DEFAULT_MMDC_COMMAND)]
    pub mmdc: PathBuf,

    /// When to use colors in output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// `--log-level`, or `info` when only `--verbose` is given
    pub fn effective_log_level(&self) -> Option<&'static str> {
        match self.log_level {
            Some(level) => Some(level.as_str()),
            None if self.verbose => Some(LogLevel::Info.as_str()),
            None => None,
        }
    }

    /// Override layer built only from flags that were actually given
    pub fn overrides(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::new();
        if let Some(theme) = &self.theme {
            layer = layer.theme(theme.clone());
        }
        if let Some(background) = &self.background {
            layer = layer.background_color(background.clone());
        }
        if let Some(width) = self.width {
            layer = layer.width(width);
        }
        if let Some(height) = self.height {
            layer = layer.height(height);
        }
        if let Some(timeout) = self.timeout {
            layer = layer.timeout_ms(timeout);
        }
        if self.recursive {
            layer = layer.recursive(true);
        }
        if self.skip_errors {
            layer = layer.skip_errors(true);
        }
        if self.no_overwrite {
            layer = layer.overwrite(false);
        }
        layer
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// How the input is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Single,
    Batch,
}

/// Output path used when `--output` is absent
pub fn default_output(input: &str) -> PathBuf {
    let path = Path::new(input);
    if path.is_file() {
        with_output_extension(path)
    } else {
        PathBuf::from(DEFAULT_BATCH_OUTPUT)
    }
}

/// Batch mode for directories, wildcards, and files aimed at an existing directory
pub fn conversion_mode(input: &str, output: &Path) -> Mode {
    let path = Path::new(input);
    if path.is_dir() || is_glob_pattern(input) || (path.exists() && output.is_dir()) {
        Mode::Batch
    } else {
        Mode::Single
    }
}

/// Main CLI application
pub struct Mmd2svgApp;

impl Mmd2svgApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    ///
    /// `Ok(false)` means the run completed but some items failed without
    /// `--skip-errors`; those failures have already been printed.
    pub fn run(&self, cli: Cli) -> Result<bool> {
        if cli.verbose {
            eprintln!("mmd2svg v{}", env!("CARGO_PKG_VERSION"));
            if let Some(path) = cli.config.clone().or_else(find_config_file) {
                if path.exists() {
                    eprintln!("Loading config from: {}", path.display());
                }
            }
        }

        let file_layer = load_config_layer(cli.config.as_deref())?;
        let config = RenderingConfig::layered(&file_layer, &cli.overrides());

        let output = cli
            .output
            .clone()
            .unwrap_or_else(|| default_output(&cli.input));
        let reporter = Reporter::new(should_colorize(cli.color));
        let pipeline = BatchPipeline::new(MmdcRenderer::with_command(&cli.mmdc));

        let mode = conversion_mode(&cli.input, &output);
        debug!(?mode, input = %cli.input, output = %output.display(), "Resolved conversion mode");

        match mode {
            Mode::Batch => Self::batch_command(&pipeline, &cli.input, &output, &config, reporter),
            Mode::Single => {
                Self::single_command(&pipeline, Path::new(&cli.input), &output, &config, reporter)
            }
        }
    }

    fn batch_command(
        pipeline: &BatchPipeline<MmdcRenderer>,
        input: &str,
        output: &Path,
        config: &RenderingConfig,
        reporter: Reporter,
    ) -> Result<bool> {
        println!("Processing files from: {}", input);
        println!("Output directory: {}", output.display());
        println!();

        let result = pipeline.run_with_progress(input, output, config, |item| {
            println!("{}", reporter.item_line(item));
        })?;

        println!();
        println!("{}", reporter.summary_line(&result));

        Ok(!result.has_failures() || config.skip_errors())
    }

    fn single_command(
        pipeline: &BatchPipeline<MmdcRenderer>,
        input: &Path,
        output: &Path,
        config: &RenderingConfig,
        reporter: Reporter,
    ) -> Result<bool> {
        let written = pipeline.convert_file(input, output, config)?;
        println!("{}", reporter.success_line(input, &written));
        Ok(true)
    }
}

impl Default for Mmd2svgApp {
    fn default() -> Self {
        Self::new()
    }
}
