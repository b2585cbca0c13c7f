use thiserror::Error;

/// Errors originating from the core engine.
///
/// Only parameter problems surface to callers; formula evaluation failures
/// are absorbed by the iteration loop (see [`crate::iterate`]).
#[derive(Debug, Error)]
pub enum CoreError {
    /// A caller-supplied parameter is out of range or malformed.
    /// Raised synchronously, never swallowed.
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}

impl CoreError {
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}

/// A formula failed to parse or evaluate at a point.
///
/// Distinct from [`CoreError`]: these are caught inside the per-point
/// iterator and converted to an escape-at-zero result, so they never
/// propagate out of a grid computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("syntax error in formula at byte {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("unknown symbol `{0}` in formula")]
    UnknownSymbol(String),

    #[error("function `{name}` expects {expected} argument(s), got {got}")]
    WrongArity {
        name: String,
        expected: usize,
        got: usize,
    },
}
