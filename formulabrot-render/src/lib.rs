pub mod colormap;
pub mod error;
pub mod grid;
pub mod pipeline;

pub use colormap::{colorize, shade, PixelBuffer, CHANNELS};
pub use error::RenderError;
pub use grid::{IterationGrid, RenderRequest};
pub use pipeline::{render_grid, render_image};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
