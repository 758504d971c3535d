//! Batch conversion: discovery, output path mapping, and the pipeline itself

mod finder;
mod output;
mod pipeline;
mod result;

pub use finder::*;
pub use output::*;
pub use pipeline::*;
pub use result::*;
