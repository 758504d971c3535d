//! Input discovery
//!
//! Resolves an input specifier (a single file, a directory, or a glob pattern)
//! into the ordered list of diagram sources to convert. Only files with a
//! recognized extension are kept. Discovery only reads directory structure.

use std::path::Path;

use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::core::{Mmd2svgError, Result, SourceFile};

/// Whether `input` contains a glob wildcard
pub fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Find the diagram sources named by `input`
///
/// - A directory yields its immediate children, or its whole subtree when
///   `recursive` is set, sorted by file name within each directory. Symbolic
///   links to directories are not followed.
/// - An existing file yields itself if its extension is recognized, otherwise
///   nothing. An unrecognized single file is not an error.
/// - A glob pattern yields the matching regular files with a recognized
///   extension, in the order the pattern expands.
///
/// # Errors
///
/// [`Mmd2svgError::NotFound`] if `input` is neither an existing path nor a
/// pattern matching at least one path, and [`Mmd2svgError::InvalidPattern`]
/// for a malformed pattern.
pub fn find_files(input: &str, recursive: bool) -> Result<Vec<SourceFile>> {
    let path = Path::new(input);

    let files = if path.is_dir() {
        find_in_directory(path, recursive)
    } else if path.is_file() {
        SourceFile::from_path(path).into_iter().collect()
    } else if is_glob_pattern(input) {
        find_by_pattern(input)?
    } else {
        return Err(Mmd2svgError::not_found(path));
    };

    debug!(input, recursive, file_count = files.len(), "Discovered source files");
    Ok(files)
}

fn find_in_directory(dir: &Path, recursive: bool) -> Vec<SourceFile> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "Skipping unreadable directory entry");
                None
            }
        })
        // Symlinked files qualify; symlinked directories are never entered, so
        // each file is reached through exactly one path.
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let file = SourceFile::from_path(entry.into_path());
            if let Some(file) = &file {
                trace!(path = %file.path().display(), "Matched source file");
            }
            file
        })
        .collect()
}

fn find_by_pattern(pattern: &str) -> Result<Vec<SourceFile>> {
    let paths = glob::glob(pattern).map_err(|e| Mmd2svgError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut matched_any = false;
    let mut files = Vec::new();

    for entry in paths {
        match entry {
            Ok(path) => {
                matched_any = true;
                if !path.is_file() {
                    continue;
                }
                if let Some(file) = SourceFile::from_path(path) {
                    files.push(file);
                }
            }
            Err(err) => warn!(error = %err, "Skipping unreadable glob match"),
        }
    }

    if !matched_any {
        return Err(Mmd2svgError::not_found(pattern));
    }

    Ok(files)
}
