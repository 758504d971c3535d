//! Diagram source files and the extensions that qualify them

use std::fmt;
use std::path::{Path, PathBuf};

/// Extension written for every rendered output file
pub const OUTPUT_EXTENSION: &str = "svg";

/// Recognized diagram source extension
///
/// Matching is case-insensitive: `A.MMD` qualifies as [`SourceExtension::Mmd`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceExtension {
    /// `.mmd`
    Mmd,
    /// `.mermaid`
    Mermaid,
}

impl SourceExtension {
    /// All recognized extensions
    pub const ALL: [SourceExtension; 2] = [SourceExtension::Mmd, SourceExtension::Mermaid];

    /// The canonical lowercase extension, without the leading dot
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceExtension::Mmd => "mmd",
            SourceExtension::Mermaid => "mermaid",
        }
    }

    /// Classify a bare extension such as `"mmd"` or `"Mermaid"`
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(ext))
    }

    /// Classify the extension of `path`, if it has a recognized one
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for SourceExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.as_str())
    }
}

/// An existing diagram source document discovered on disk
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    path: PathBuf,
    extension: SourceExtension,
}

impl SourceFile {
    /// Build a source file from a path, if its extension is recognized
    ///
    /// Existence is the caller's concern; the finder only hands out paths it
    /// has just seen on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        SourceExtension::from_path(&path).map(|extension| Self { path, extension })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> SourceExtension {
        self.extension
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for SourceFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
