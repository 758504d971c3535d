//! Terminal progress output for conversions
//!
//! Success and failure markers are coloured using crossterm.

use std::path::Path;

use crossterm::style::{Color, Stylize};
use mmd2svg::{BatchItemResult, BatchResult};

use crate::cli::ColorChoice;

const SUCCESS_MARKER: &str = "✓";
const FAILURE_MARKER: &str = "✗";

/// Decide whether stdout output should carry ANSI colours
pub fn should_colorize(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            crossterm::tty::IsTty::is_tty(&std::io::stdout())
        }
    }
}

/// Formats progress lines, optionally coloured
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    colorize: bool,
}

impl Reporter {
    pub fn new(colorize: bool) -> Self {
        Self { colorize }
    }

    fn marker(&self, marker: &str, color: Color) -> String {
        if self.colorize {
            format!("{}", marker.with(color))
        } else {
            marker.to_string()
        }
    }

    /// `✓ input → output` or `✗ file → Error: message`
    pub fn item_line(&self, item: &BatchItemResult) -> String {
        if !self.colorize {
            return item.to_string();
        }
        match item {
            BatchItemResult::Succeeded(ok) => self.success_line(&ok.input, &ok.output),
            BatchItemResult::Failed(failed) => format!(
                "{} {} → Error: {}",
                self.marker(FAILURE_MARKER, Color::Red),
                failed.file.display(),
                failed.error
            ),
        }
    }

    pub fn success_line(&self, input: &Path, output: &Path) -> String {
        format!(
            "{} {} → {}",
            self.marker(SUCCESS_MARKER, Color::Green),
            input.display(),
            output.display()
        )
    }

    pub fn summary_line(&self, result: &BatchResult) -> String {
        format!(
            "{} succeeded, {} failed",
            result.succeeded_count(),
            result.failed_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_match_display() {
        let reporter = Reporter::new(false);
        let ok = BatchItemResult::succeeded("docs/a.mmd", "out/a.svg");
        let failed = BatchItemResult::failed("docs/b.mmd", "boom");

        assert_eq!(reporter.item_line(&ok), "✓ docs/a.mmd → out/a.svg");
        assert_eq!(reporter.item_line(&failed), "✗ docs/b.mmd → Error: boom");
        assert_eq!(
            reporter.success_line(Path::new("a.mmd"), Path::new("a.svg")),
            "✓ a.mmd → a.svg"
        );
    }

    #[test]
    fn test_colored_lines_wrap_marker_only() {
        let reporter = Reporter::new(true);
        let line = reporter.item_line(&BatchItemResult::failed("b.mmd", "boom"));

        assert!(line.contains("\x1b["));
        assert!(line.contains(FAILURE_MARKER));
        assert!(line.ends_with("b.mmd → Error: boom"));
    }

    #[test]
    fn test_summary_line() {
        let reporter = Reporter::new(true);
        assert_eq!(
            reporter.summary_line(&BatchResult::new()),
            "0 succeeded, 0 failed"
        );
    }

    #[test]
    fn test_explicit_color_choices() {
        assert!(should_colorize(ColorChoice::Always));
        assert!(!should_colorize(ColorChoice::Never));
    }
}
