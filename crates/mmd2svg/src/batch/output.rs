//! Output path resolution
//!
//! Maps a source path onto the output tree. With a base directory, the
//! source's position below that directory is preserved; without one, only the
//! file name is kept.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::core::{SourceExtension, OUTPUT_EXTENSION};

/// Resolve where the rendered output for `input` goes
///
/// ```
/// use std::path::Path;
/// use mmd2svg::batch::resolve_output_path;
///
/// let out = resolve_output_path(
///     Path::new("docs/sub/x.mmd"),
///     Path::new("out/"),
///     Some(Path::new("docs/")),
/// );
/// assert_eq!(out, Path::new("out/sub/x.svg"));
/// ```
///
/// An input outside `base_dir` falls back to its file name.
pub fn resolve_output_path(input: &Path, output_root: &Path, base_dir: Option<&Path>) -> PathBuf {
    let relative = base_dir
        .and_then(|base| input.strip_prefix(base).ok())
        .filter(|relative| relative.file_name().is_some())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| {
            input
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| input.to_path_buf())
        });

    output_root.join(with_output_extension(&relative))
}

/// Replace a recognized source extension with the output extension
///
/// Anything else keeps its name and gains the output extension, so an output
/// path never coincides with its input.
pub fn with_output_extension(path: &Path) -> PathBuf {
    if SourceExtension::from_path(path).is_some() {
        return path.with_extension(OUTPUT_EXTENSION);
    }

    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_structure_below_base_dir() {
        let out = resolve_output_path(
            Path::new("docs/sub/x.mmd"),
            Path::new("out/"),
            Some(Path::new("docs/")),
        );
        assert_eq!(out, PathBuf::from("out/sub/x.svg"));
    }

    #[test]
    fn test_base_dir_without_trailing_separator() {
        let out = resolve_output_path(
            Path::new("docs/a/b/c.mermaid"),
            Path::new("out"),
            Some(Path::new("docs")),
        );
        assert_eq!(out, PathBuf::from("out/a/b/c.svg"));
    }

    #[test]
    fn test_flat_mode_discards_directories() {
        let out = resolve_output_path(Path::new("docs/sub/x.mmd"), Path::new("out"), None);
        assert_eq!(out, PathBuf::from("out/x.svg"));
    }

    #[test]
    fn test_extension_replacement_is_case_insensitive() {
        let out = resolve_output_path(Path::new("DIAGRAM.MMD"), Path::new("out"), None);
        assert_eq!(out, PathBuf::from("out/DIAGRAM.svg"));

        let out = resolve_output_path(Path::new("flow.MerMaid"), Path::new("out"), None);
        assert_eq!(out, PathBuf::from("out/flow.svg"));
    }

    #[test]
    fn test_input_outside_base_dir_uses_file_name() {
        let out = resolve_output_path(
            Path::new("elsewhere/x.mmd"),
            Path::new("out"),
            Some(Path::new("docs")),
        );
        assert_eq!(out, PathBuf::from("out/x.svg"));
    }

    #[test]
    fn test_unrecognized_extension_is_appended() {
        assert_eq!(
            with_output_extension(Path::new("notes.txt")),
            PathBuf::from("notes.txt.svg")
        );
        assert_eq!(with_output_extension(Path::new("a.mmd")), PathBuf::from("a.svg"));
    }
}
