use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::region::ComplexRegion;

/// One axis of the configured plane region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub start: f64,
    pub end: f64,
}

/// Render parameters supplied by the embedding application.
///
/// The engine never reads configuration files itself; the presentation
/// layer deserializes this shape (missing fields fail there) and hands it
/// in per render request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub real_range: AxisRange,
    pub imaginary_range: AxisRange,
    pub default_formula: String,
    pub max_iterations: u32,
}

impl RenderConfig {
    /// The configured plane region, validated.
    pub fn region(&self) -> crate::Result<ComplexRegion> {
        ComplexRegion::new(
            self.real_range.start,
            self.real_range.end,
            self.imaginary_range.start,
            self.imaginary_range.end,
        )
    }

    /// Iteration budget, validated.
    pub fn max_iterations(&self) -> crate::Result<u32> {
        if self.max_iterations == 0 {
            return Err(CoreError::invalid_parameter(
                "max_iterations must be >= 1",
            ));
        }
        Ok(self.max_iterations)
    }
}

impl Default for RenderConfig {
    /// The classic full-set view, grayscale budget of 100 iterations.
    fn default() -> Self {
        Self {
            real_range: AxisRange { start: -2.0, end: 1.0 },
            imaginary_range: AxisRange { start: -1.2, end: 1.2 },
            default_formula: "z * z + c".to_owned(),
            max_iterations: 100,
        }
    }
}
