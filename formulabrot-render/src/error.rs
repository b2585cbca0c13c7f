use thiserror::Error;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid max iterations: {0} (must be >= 1)")]
    InvalidMaxIterations(u32),

    /// An optimized grid stage crashed. Caught at the fallback-chain
    /// boundary; never surfaced to callers unless every stage fails.
    #[error("render stage `{stage}` failed: {reason}")]
    StageFailure {
        stage: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Core(#[from] formulabrot_core::CoreError),
}
