//! Renderer backed by the Mermaid CLI (`mmdc`)
//!
//! Each render runs in a private scratch directory holding the diagram source,
//! a Mermaid config, a browser config, and the captured stderr. The child
//! process is polled until it exits or the configured timeout elapses. On unix
//! it leads its own process group, and a timeout kills the whole group so the
//! browser it launched does not outlive the render.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::{json, Map, Value};
use tracing::{debug, span, trace, warn, Level};

use super::svg::apply_size;
use crate::core::{DiagramRenderer, Mmd2svgError, RenderingConfig, Result};

/// Executable looked up on `PATH` when no explicit command is given
pub const DEFAULT_MMDC_COMMAND: &str = "mmdc";

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// [`DiagramRenderer`] that shells out to `mmdc`
#[derive(Debug, Clone)]
pub struct MmdcRenderer {
    command: PathBuf,
}

impl MmdcRenderer {
    /// Use `mmdc` from `PATH`
    pub fn new() -> Self {
        Self::with_command(DEFAULT_MMDC_COMMAND)
    }

    /// Use a specific executable, e.g. `node_modules/.bin/mmdc`
    pub fn with_command(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    /// Whether the executable can be started at all
    pub fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

impl Default for MmdcRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Files of one render invocation inside the scratch directory
struct RenderJob {
    input: PathBuf,
    output: PathBuf,
    mermaid_config: PathBuf,
    browser_config: PathBuf,
    stderr_log: PathBuf,
}

impl RenderJob {
    fn prepare(dir: &Path, source: &str, config: &RenderingConfig) -> Result<Self> {
        let job = Self {
            input: dir.join("diagram.mmd"),
            output: dir.join("diagram.svg"),
            mermaid_config: dir.join("mermaid.json"),
            browser_config: dir.join("browser.json"),
            stderr_log: dir.join("mmdc.stderr"),
        };

        write_scratch(&job.input, source.as_bytes())?;
        write_scratch(
            &job.mermaid_config,
            mermaid_config_json(config).to_string().as_bytes(),
        )?;
        write_scratch(
            &job.browser_config,
            browser_config_json(config).to_string().as_bytes(),
        )?;

        Ok(job)
    }

    fn arguments(&self, config: &RenderingConfig) -> Vec<String> {
        let mut args = vec![
            "-i".to_string(),
            self.input.display().to_string(),
            "-o".to_string(),
            self.output.display().to_string(),
            "-t".to_string(),
            config.theme().to_string(),
            "-b".to_string(),
            config.background_color().to_string(),
            "-c".to_string(),
            self.mermaid_config.display().to_string(),
            "-p".to_string(),
            self.browser_config.display().to_string(),
        ];
        if let Some(width) = config.width() {
            args.extend(["-w".to_string(), width.to_string()]);
        }
        if let Some(height) = config.height() {
            args.extend(["-H".to_string(), height.to_string()]);
        }
        args.push("-q".to_string());
        args
    }
}

fn write_scratch(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|e| {
        Mmd2svgError::render_error(format!(
            "failed to prepare '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Mermaid engine options plus the selected theme
fn mermaid_config_json(config: &RenderingConfig) -> Value {
    let mut options: Map<String, Value> = config
        .mermaid_options()
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    options.insert("theme".to_string(), Value::from(config.theme()));
    Value::Object(options)
}

fn browser_config_json(config: &RenderingConfig) -> Value {
    json!({
        "headless": config.headless(),
        "args": config.engine_args(),
    })
}

/// Poll `child` until it exits; `Ok(None)` means it was killed after `timeout`
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            trace!(elapsed_ms = start.elapsed().as_millis() as u64, "mmdc exited");
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            kill_process_tree(child);
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Start the child as the leader of a new process group
#[cfg(unix)]
fn isolate(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn isolate(_command: &mut Command) {}

/// Kill the child and everything it spawned
#[cfg(unix)]
fn kill_process_tree(child: &mut Child) {
    if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: kill(2) with a negative pid only signals that process group.
        let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
        if rc != 0 {
            debug!(pgid, error = %io::Error::last_os_error(), "Process group kill failed");
        }
    }
    let _ = child.kill();
}

#[cfg(not(unix))]
fn kill_process_tree(child: &mut Child) {
    let _ = child.kill();
}

impl DiagramRenderer for MmdcRenderer {
    fn render(&self, source: &str, config: &RenderingConfig) -> Result<Vec<u8>> {
        let render_span = span!(
            Level::DEBUG,
            "mmdc_render",
            command = %self.command.display(),
            source_len = source.len()
        );
        let _enter = render_span.enter();

        let workdir = tempfile::Builder::new()
            .prefix("mmd2svg-")
            .tempdir()
            .map_err(|e| {
                Mmd2svgError::render_error(format!("failed to create scratch directory: {e}"))
            })?;
        let job = RenderJob::prepare(workdir.path(), source, config)?;

        // A file rather than a pipe: descendants holding it open cannot stall the read.
        let stderr_file = fs::File::create(&job.stderr_log).map_err(|e| {
            Mmd2svgError::render_error(format!(
                "failed to prepare '{}': {e}",
                job.stderr_log.display()
            ))
        })?;

        let mut command = Command::new(&self.command);
        command
            .args(job.arguments(config))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr_file));
        isolate(&mut command);

        let mut child = command.spawn().map_err(|e| {
            Mmd2svgError::render_error(format!(
                "failed to spawn '{}' (is @mermaid-js/mermaid-cli installed?): {e}",
                self.command.display()
            ))
        })?;

        let status = wait_with_timeout(&mut child, Duration::from_millis(config.timeout_ms()))
            .map_err(|e| Mmd2svgError::render_error(format!("failed to wait for mmdc: {e}")))?;

        let Some(status) = status else {
            warn!(timeout_ms = config.timeout_ms(), "mmdc timed out and was killed");
            return Err(Mmd2svgError::RenderTimeout {
                timeout_ms: config.timeout_ms(),
            });
        };

        let stderr = fs::read_to_string(&job.stderr_log).unwrap_or_default();

        if !status.success() {
            return Err(Mmd2svgError::render_error(format!(
                "mmdc exited with {}: {}",
                status,
                stderr.trim()
            )));
        }

        let rendered = fs::read(&job.output).map_err(|e| {
            Mmd2svgError::render_error(format!("mmdc produced no output: {e}"))
        })?;
        debug!(bytes = rendered.len(), "mmdc render complete");

        if config.width().is_none() && config.height().is_none() {
            return Ok(rendered);
        }

        let svg = String::from_utf8_lossy(&rendered);
        Ok(apply_size(&svg, config.width(), config.height()).into_bytes())
    }

    fn name(&self) -> &str {
        "mmdc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigLayer;

    #[test]
    fn test_arguments_carry_config() {
        let config = RenderingConfig::default()
            .merged(&ConfigLayer::new().theme("dark").background_color("transparent").width(640));
        let job = RenderJob {
            input: PathBuf::from("/tmp/x/diagram.mmd"),
            output: PathBuf::from("/tmp/x/diagram.svg"),
            mermaid_config: PathBuf::from("/tmp/x/mermaid.json"),
            browser_config: PathBuf::from("/tmp/x/browser.json"),
            stderr_log: PathBuf::from("/tmp/x/mmdc.stderr"),
        };

        let args = job.arguments(&config);
        let joined = args.join(" ");
        assert!(joined.contains("-t dark"));
        assert!(joined.contains("-b transparent"));
        assert!(joined.contains("-w 640"));
        assert!(!joined.contains("-H"));
        assert_eq!(args.last().map(String::as_str), Some("-q"));
    }

    #[test]
    fn test_mermaid_config_includes_theme_and_options() {
        let config = RenderingConfig::default().merged(&ConfigLayer::new().theme("forest"));
        let value = mermaid_config_json(&config);
        assert_eq!(value["theme"], "forest");
        assert_eq!(value["securityLevel"], "loose");
    }

    #[test]
    fn test_browser_config() {
        let config = RenderingConfig::default().merged(&ConfigLayer::new().headless(false));
        let value = browser_config_json(&config);
        assert_eq!(value["headless"], false);
        assert_eq!(value["args"][0], "--no-sandbox");
    }

    #[test]
    fn test_missing_command_is_render_error() {
        let renderer = MmdcRenderer::with_command("/nonexistent/mmdc-binary");
        assert!(!renderer.is_available());

        let err = renderer
            .render("graph TD; A-->B", &RenderingConfig::default())
            .unwrap_err();
        assert!(matches!(err, Mmd2svgError::Render { .. }));
        assert!(err.to_string().contains("failed to spawn"));
    }
}
