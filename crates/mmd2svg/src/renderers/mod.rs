//! Concrete [`DiagramRenderer`](crate::core::DiagramRenderer) implementations
//!
//! The batch pipeline only knows the trait. Adapters for actual rendering
//! engines live here.

mod mmdc;
pub mod svg;

pub use mmdc::*;
