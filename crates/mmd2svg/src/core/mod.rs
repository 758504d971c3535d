//! Core abstractions for diagram conversion
//!
//! Configuration, the renderer contract, source file classification, errors,
//! and logging. The batch machinery in [`crate::batch`] is built on these.

pub mod config;
mod error;
pub mod logging;
mod renderer;
mod source;

pub use config::{ConfigLayer, RenderingConfig};
pub use error::*;
pub use renderer::*;
pub use source::*;
