//! The degrade-on-failure render pipeline.
//!
//! Resolution order for a grid request:
//!   (a) canonical parallel path, when the formula is the defining recurrence;
//!   (b) custom parallel path on the literal formula text;
//!   (c) fully scalar per-pixel loop.
//!
//! A stage failure — an error return or a panic, caught at the stage
//! boundary only — triggers a complete re-attempt at the next stage for
//! the whole grid; nothing partial carries over. Fallbacks are logged,
//! never surfaced. The scalar stage is last and only fails on parameter
//! problems, which are validated before any stage runs.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, info, warn};

use formulabrot_core::{is_canonical_formula, FormulaCompiler};

use crate::colormap::{colorize, PixelBuffer};
use crate::error::RenderError;
use crate::grid::{self, IterationGrid, RenderRequest};

/// Run one stage, converting a panic into a `StageFailure` error so the
/// chain can degrade instead of unwinding through the caller.
fn run_stage<T>(
    stage: &'static str,
    body: impl FnOnce() -> crate::Result<T>,
) -> crate::Result<T> {
    debug!(stage, "render stage entered");
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_owned());
            Err(RenderError::StageFailure { stage, reason })
        }
    }
}

/// One tier of the fallback chain: a name for logging plus the deferred
/// grid computation.
type Stage<'a> = (
    &'static str,
    Box<dyn FnOnce() -> crate::Result<IterationGrid> + 'a>,
);

/// Run stages in order, returning the first grid produced.
///
/// Every failure before the last stage is logged and degraded past; the
/// last stage's failure (not expected in ordinary operation) is the
/// caller's error.
fn run_chain(mut stages: Vec<Stage<'_>>) -> crate::Result<IterationGrid> {
    let start = Instant::now();
    let last = stages.pop();

    for (stage, body) in stages {
        match run_stage(stage, body) {
            Ok(done) => {
                info!(stage, elapsed_ms = start.elapsed().as_millis(), "grid complete");
                return Ok(done);
            }
            Err(error) => warn!(%error, stage, "render stage failed, degrading to next stage"),
        }
    }

    match last {
        Some((stage, body)) => {
            let done = run_stage(stage, body)?;
            info!(stage, elapsed_ms = start.elapsed().as_millis(), "grid complete");
            Ok(done)
        }
        None => Err(RenderError::StageFailure {
            stage: "chain",
            reason: "no stages to run".to_owned(),
        }),
    }
}

/// Generate the iteration grid for a request, degrading through the
/// stage chain as needed.
///
/// The only error this returns is an invalid request; once parameters
/// validate, some stage will produce a grid.
pub fn render_grid(
    compiler: &FormulaCompiler,
    request: &RenderRequest,
) -> crate::Result<IterationGrid> {
    request.validate()?;

    let mut stages: Vec<Stage<'_>> = Vec::with_capacity(3);
    if is_canonical_formula(&request.formula) {
        stages.push((
            "canonical-parallel",
            Box::new(|| grid::canonical_grid(request)),
        ));
    }
    stages.push((
        "custom-parallel",
        Box::new(|| grid::custom_grid_parallel(compiler, request)),
    ));
    stages.push((
        "scalar",
        Box::new(|| grid::custom_grid_scalar(compiler, request)),
    ));
    run_chain(stages)
}

/// Full render: grid generation through the fallback chain, then the
/// grayscale color pass.
pub fn render_image(
    compiler: &FormulaCompiler,
    request: &RenderRequest,
) -> crate::Result<PixelBuffer> {
    let grid = render_grid(compiler, request)?;
    Ok(colorize(&grid))
}
