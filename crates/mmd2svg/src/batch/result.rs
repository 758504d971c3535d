//! Per-item outcomes and the aggregated batch result

use std::fmt;
use std::path::{Path, PathBuf};

/// A file that was rendered and written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Succeeded {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// A file whose transaction failed, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failed {
    pub file: PathBuf,
    pub error: String,
}

/// Outcome of one item transaction
///
/// Created exactly once per discovered file and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchItemResult {
    Succeeded(Succeeded),
    Failed(Failed),
}

impl BatchItemResult {
    pub fn succeeded(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self::Succeeded(Succeeded {
            input: input.into(),
            output: output.into(),
        })
    }

    pub fn failed(file: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self::Failed(Failed {
            file: file.into(),
            error: error.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// The source file this outcome belongs to
    pub fn input(&self) -> &Path {
        match self {
            Self::Succeeded(ok) => &ok.input,
            Self::Failed(failed) => &failed.file,
        }
    }
}

impl fmt::Display for BatchItemResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded(ok) => {
                write!(f, "✓ {} → {}", ok.input.display(), ok.output.display())
            }
            Self::Failed(failed) => {
                write!(f, "✗ {} → Error: {}", failed.file.display(), failed.error)
            }
        }
    }
}

/// Every item outcome of one pipeline run, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    items: Vec<BatchItemResult>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, item: BatchItemResult) {
        self.items.push(item);
    }

    /// All outcomes in discovery order
    pub fn items(&self) -> &[BatchItemResult] {
        &self.items
    }

    /// Successful items, in discovery order
    pub fn succeeded(&self) -> impl Iterator<Item = &Succeeded> {
        self.items.iter().filter_map(|item| match item {
            BatchItemResult::Succeeded(ok) => Some(ok),
            BatchItemResult::Failed(_) => None,
        })
    }

    /// Failed items, in discovery order
    pub fn failed(&self) -> impl Iterator<Item = &Failed> {
        self.items.iter().filter_map(|item| match item {
            BatchItemResult::Failed(failed) => Some(failed),
            BatchItemResult::Succeeded(_) => None,
        })
    }

    pub fn succeeded_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for BatchResult {
    type Item = BatchItemResult;
    type IntoIter = std::vec::IntoIter<BatchItemResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
