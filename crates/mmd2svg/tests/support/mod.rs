//! Shared test doubles

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use mmd2svg::prelude::*;

/// Renderer that records every source it sees and fails on marked input
pub struct RecordingRenderer {
    fail_marker: String,
    calls: Mutex<Vec<String>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::failing_on("%% fail")
    }

    /// Fail any source containing `marker`
    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_marker: marker.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl DiagramRenderer for RecordingRenderer {
    fn render(&self, source: &str, config: &RenderingConfig) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(source.to_string());
        if source.contains(&self.fail_marker) {
            return Err(Mmd2svgError::render_error(format!(
                "cannot render: {}",
                source.trim()
            )));
        }
        Ok(format!(
            "<svg data-theme=\"{}\" data-bg=\"{}\"><!-- {} --></svg>",
            config.theme(),
            config.background_color(),
            source.trim()
        )
        .into_bytes())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Write `contents` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// Every regular file below `root`, relative and sorted
pub fn list_files(root: &Path) -> Vec<String> {
    if !root.exists() {
        return Vec::new();
    }
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

/// Write an executable fake `mmdc` shell script into `dir`
#[cfg(unix)]
pub fn fake_mmdc(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-mmdc");
    let script = format!(
        "#!/bin/sh\nout=\"\"\nargs=\"$*\"\nwhile [ $# -gt 0 ]; do\n  case \"$1\" in\n    -o) out=\"$2\"; shift 2 ;;\n    *) shift ;;\n  esac\ndone\n{body}\n"
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
