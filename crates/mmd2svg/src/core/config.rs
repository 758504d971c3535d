//! Rendering configuration and its layered construction
//!
//! A [`RenderingConfig`] is always fully populated. It is built by starting
//! from the built-in defaults and merging [`ConfigLayer`]s on top, later
//! layers winning key by key:
//!
//! 1. built-in defaults ([`RenderingConfig::default`])
//! 2. the persisted configuration file, if any ([`load_config_layer`])
//! 3. per-call overrides (for example, command-line flags)
//!
//! Merging never mutates a config in place. [`RenderingConfig::merged`]
//! derives a new value, so a config handed to a pipeline run cannot observe
//! overrides applied for another call.
//!
//! # Example
//!
//! ```
//! use mmd2svg::core::{ConfigLayer, RenderingConfig};
//!
//! let base = RenderingConfig::default();
//! let dark = base.merged(&ConfigLayer::new().theme("dark").width(800));
//!
//! assert_eq!(base.theme(), "default");
//! assert_eq!(dark.theme(), "dark");
//! assert_eq!(dark.width(), Some(800));
//! ```
//!
//! # File format
//!
//! ```yaml
//! theme: forest
//! background_color: transparent
//! width: 1024
//! puppeteer:
//!   timeout: 60000
//!   headless: true
//! mermaid:
//!   securityLevel: strict
//! batch:
//!   recursive: true
//!   overwrite: false
//!   skip_errors: true
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::{Mmd2svgError, Result};

/// Conventional configuration file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".mmd2svg.yml";

pub const DEFAULT_THEME: &str = "default";
pub const DEFAULT_BACKGROUND: &str = "white";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Fully populated rendering configuration for one conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct RenderingConfig {
    theme: String,
    background_color: String,
    width: Option<u32>,
    height: Option<u32>,
    timeout_ms: u64,
    recursive: bool,
    overwrite: bool,
    skip_errors: bool,
    headless: bool,
    engine_args: Vec<String>,
    mermaid: BTreeMap<String, Value>,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            background_color: DEFAULT_BACKGROUND.to_string(),
            width: None,
            height: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            recursive: false,
            overwrite: true,
            skip_errors: false,
            headless: true,
            engine_args: vec![
                "--no-sandbox".to_string(),
                "--disable-setuid-sandbox".to_string(),
            ],
            mermaid: default_mermaid_options(),
        }
    }
}

fn default_mermaid_options() -> BTreeMap<String, Value> {
    BTreeMap::from([
        ("securityLevel".to_string(), Value::from("loose")),
        ("startOnLoad".to_string(), Value::from(true)),
        ("logLevel".to_string(), Value::from("error")),
    ])
}

impl RenderingConfig {
    /// Defaults, then the file layer, then the override layer
    pub fn layered(file: &ConfigLayer, overrides: &ConfigLayer) -> Self {
        Self::default().merged(file).merged(overrides)
    }

    /// Derive a new config with every key set in `layer` applied on top of `self`
    ///
    /// Keys the layer leaves unset are inherited unchanged. Mermaid options are
    /// merged key by key rather than replaced wholesale.
    pub fn merged(&self, layer: &ConfigLayer) -> Self {
        let mut next = self.clone();

        if let Some(theme) = &layer.theme {
            next.theme = theme.clone();
        }
        if let Some(background_color) = &layer.background_color {
            next.background_color = background_color.clone();
        }
        if let Some(width) = layer.width {
            next.width = width;
        }
        if let Some(height) = layer.height {
            next.height = height;
        }
        if let Some(timeout_ms) = layer.timeout_ms {
            next.timeout_ms = timeout_ms;
        }
        if let Some(recursive) = layer.recursive {
            next.recursive = recursive;
        }
        if let Some(overwrite) = layer.overwrite {
            next.overwrite = overwrite;
        }
        if let Some(skip_errors) = layer.skip_errors {
            next.skip_errors = skip_errors;
        }
        if let Some(headless) = layer.headless {
            next.headless = headless;
        }
        if let Some(engine_args) = &layer.engine_args {
            next.engine_args = engine_args.clone();
        }
        for (key, value) in &layer.mermaid {
            next.mermaid.insert(key.clone(), value.clone());
        }

        next
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    /// Requested output width in pixels, if any
    pub fn width(&self) -> Option<u32> {
        self.width
    }

    /// Requested output height in pixels, if any
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Time budget handed to the renderer for a single diagram
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn skip_errors(&self) -> bool {
        self.skip_errors
    }

    /// Whether the rendering engine runs without a visible window
    pub fn headless(&self) -> bool {
        self.headless
    }

    /// Extra arguments passed to the rendering engine's browser process
    pub fn engine_args(&self) -> &[String] {
        &self.engine_args
    }

    /// Options forwarded verbatim to the Mermaid engine
    pub fn mermaid_options(&self) -> &BTreeMap<String, Value> {
        &self.mermaid
    }
}

/// One override layer; every key is optional
///
/// `width` and `height` are doubly optional: `None` means "not mentioned,
/// inherit", while `Some(None)` means "explicitly no dimension".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigLayer {
    pub theme: Option<String>,
    pub background_color: Option<String>,
    pub width: Option<Option<u32>>,
    pub height: Option<Option<u32>>,
    pub timeout_ms: Option<u64>,
    pub recursive: Option<bool>,
    pub overwrite: Option<bool>,
    pub skip_errors: Option<bool>,
    pub headless: Option<bool>,
    pub engine_args: Option<Vec<String>>,
    pub mermaid: BTreeMap<String, Value>,
}

impl ConfigLayer {
    /// Create an empty layer that overrides nothing
    pub fn new() -> Self {
        Self::default()
    }

    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(Some(width));
        self
    }

    /// Explicitly request no width, even if a lower layer set one
    pub fn clear_width(mut self) -> Self {
        self.width = Some(None);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(Some(height));
        self
    }

    /// Explicitly request no height, even if a lower layer set one
    pub fn clear_height(mut self) -> Self {
        self.height = Some(None);
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = Some(recursive);
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = Some(overwrite);
        self
    }

    pub fn skip_errors(mut self, skip_errors: bool) -> Self {
        self.skip_errors = Some(skip_errors);
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = Some(headless);
        self
    }

    pub fn engine_args(mut self, args: Vec<String>) -> Self {
        self.engine_args = Some(args);
        self
    }

    pub fn mermaid_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.mermaid.insert(key.into(), value.into());
        self
    }

    /// True when applying this layer would change nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// On-disk shape of the configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    theme: Option<String>,
    background_color: Option<String>,
    #[serde(deserialize_with = "explicit")]
    width: Option<Option<u32>>,
    #[serde(deserialize_with = "explicit")]
    height: Option<Option<u32>>,
    puppeteer: Option<EngineSection>,
    mermaid: Option<BTreeMap<String, Value>>,
    batch: Option<BatchSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EngineSection {
    timeout: Option<u64>,
    headless: Option<bool>,
    args: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BatchSection {
    recursive: Option<bool>,
    overwrite: Option<bool>,
    skip_errors: Option<bool>,
}

/// Present-but-null becomes `Some(None)`; absent stays `None` via `#[serde(default)]`
fn explicit<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ConfigFile {
    fn into_layer(self) -> ConfigLayer {
        let engine = self.puppeteer.unwrap_or_default();
        let batch = self.batch.unwrap_or_default();

        ConfigLayer {
            theme: self.theme,
            background_color: self.background_color,
            width: self.width,
            height: self.height,
            timeout_ms: engine.timeout,
            recursive: batch.recursive,
            overwrite: batch.overwrite,
            skip_errors: batch.skip_errors,
            headless: engine.headless,
            engine_args: engine.args,
            mermaid: self.mermaid.unwrap_or_default(),
        }
    }
}

/// Parse configuration file content into a layer
///
/// Unknown keys are ignored. Empty content yields an empty layer.
///
/// # Errors
///
/// Returns [`Mmd2svgError::Config`] for YAML syntax errors and type mismatches.
pub fn parse_config_layer(content: &str) -> Result<ConfigLayer> {
    if content.trim().is_empty() {
        return Ok(ConfigLayer::default());
    }

    let file: Option<ConfigFile> =
        serde_yaml_ng::from_str(content).map_err(|e| Mmd2svgError::config_error(e.to_string()))?;

    Ok(file.map(ConfigFile::into_layer).unwrap_or_default())
}

/// Look for [`CONFIG_FILE_NAME`] in `dir`
pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Look for [`CONFIG_FILE_NAME`] in the current working directory
pub fn find_config_file() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .and_then(|dir| find_config_file_in(&dir))
}

/// Load the persisted configuration layer
///
/// Search order:
/// 1. Explicit path if provided (a missing file logs a warning and yields an empty layer)
/// 2. [`CONFIG_FILE_NAME`] in the current working directory
/// 3. An empty layer if nothing is found
///
/// # Errors
///
/// Returns [`Mmd2svgError::Config`] if a found file cannot be read or parsed.
pub fn load_config_layer(explicit_path: Option<&Path>) -> Result<ConfigLayer> {
    if let Some(path) = explicit_path {
        if !path.exists() {
            warn!(path = %path.display(), "Configuration file not found, using defaults");
            return Ok(ConfigLayer::default());
        }
        info!(path = %path.display(), "Loading configuration from explicit path");
        return load_config_file(path);
    }

    match find_config_file() {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration from working directory");
            load_config_file(&path)
        }
        None => {
            debug!("No configuration file found, using defaults");
            Ok(ConfigLayer::default())
        }
    }
}

fn load_config_file(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)
        .map_err(|e| Mmd2svgError::config_error(format!("{}: {}", path.display(), e)))?;

    parse_config_layer(&content).map_err(|e| match e {
        Mmd2svgError::Config { message } => {
            Mmd2svgError::config_error(format!("{}: {}", path.display(), message))
        }
        other => other,
    })
}
