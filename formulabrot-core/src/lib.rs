pub mod ast;
pub mod compiler;
pub mod complex;
pub mod config;
pub mod error;
pub mod iterate;
pub mod parser;
pub mod region;
pub mod transform;

// Re-export primary types for convenience.
pub use compiler::{CompiledFormula, FormulaCompiler};
pub use complex::Complex;
pub use config::{AxisRange, RenderConfig};
pub use error::{CoreError, EvalError};
pub use iterate::{escape_time, escape_time_canonical, is_canonical_formula, PointOutcome};
pub use region::ComplexRegion;
pub use transform::ViewportState;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
