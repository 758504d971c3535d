//! Core renderer trait for turning diagram source into image bytes
//!
//! The batch pipeline never looks inside a renderer. Anything that can turn
//! one diagram's source text into output bytes under a [`RenderingConfig`]
//! plugs in here, whether it drives an external engine or a test double.

use super::config::RenderingConfig;
use super::error::Result;

/// Core trait for diagram renderers
///
/// Implementations must honor [`RenderingConfig::timeout_ms`] themselves and
/// report an overrun as [`Mmd2svgError::RenderTimeout`]; any other failure is
/// reported as [`Mmd2svgError::Render`].
///
/// [`Mmd2svgError::RenderTimeout`]: super::error::Mmd2svgError::RenderTimeout
/// [`Mmd2svgError::Render`]: super::error::Mmd2svgError::Render
pub trait DiagramRenderer: Send + Sync {
    /// Render one diagram's source text into output bytes
    fn render(&self, source: &str, config: &RenderingConfig) -> Result<Vec<u8>>;

    /// Human-readable renderer name, used in log fields
    fn name(&self) -> &str {
        "renderer"
    }
}

impl<R: DiagramRenderer + ?Sized> DiagramRenderer for &R {
    fn render(&self, source: &str, config: &RenderingConfig) -> Result<Vec<u8>> {
        (**self).render(source, config)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<R: DiagramRenderer + ?Sized> DiagramRenderer for Box<R> {
    fn render(&self, source: &str, config: &RenderingConfig) -> Result<Vec<u8>> {
        (**self).render(source, config)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
