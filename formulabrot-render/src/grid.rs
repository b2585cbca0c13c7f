//! Iteration-grid generation over a plane region.
//!
//! All three generators share one coordinate convention: a fixed linear
//! per-pixel step derived from `region.extent / pixel_extent`, so pixel
//! `(0,0)` sits exactly at `(real_start, imag_start)`. The interactive
//! coordinate transform is deliberately not consulted here — grid
//! requests arrive with an already-resolved region.
//!
//! Parallel variants partition work by whole rows: each rayon worker owns
//! a disjoint row slice of the output and reads only immutable inputs, so
//! the result is bit-identical for any worker count.

use rayon::prelude::*;
use tracing::debug;

use formulabrot_core::iterate::{escape_time, escape_time_canonical};
use formulabrot_core::{Complex, ComplexRegion, CoreError, FormulaCompiler};

use crate::error::RenderError;

/// One full render request: everything the grid and color passes need.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub width: u32,
    pub height: u32,
    pub region: ComplexRegion,
    pub formula: String,
    pub max_iterations: u32,
}

impl RenderRequest {
    pub fn new(
        width: u32,
        height: u32,
        region: ComplexRegion,
        formula: impl Into<String>,
        max_iterations: u32,
    ) -> Self {
        Self {
            width,
            height,
            region,
            formula: formula.into(),
            max_iterations,
        }
    }

    /// Build a request from application configuration, using the
    /// configured default formula unless the caller supplies one.
    pub fn from_config(
        config: &formulabrot_core::RenderConfig,
        width: u32,
        height: u32,
        formula: Option<&str>,
    ) -> crate::Result<Self> {
        let request = Self::new(
            width,
            height,
            config.region()?,
            formula.unwrap_or(&config.default_formula),
            config.max_iterations()?,
        );
        request.validate()?;
        Ok(request)
    }

    /// Reject malformed requests before any work starts. This is the only
    /// user-facing failure of a render.
    pub fn validate(&self) -> crate::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.max_iterations == 0 {
            return Err(RenderError::InvalidMaxIterations(self.max_iterations));
        }
        if !self.region.validate() {
            return Err(CoreError::invalid_parameter(format!(
                "malformed region: re [{}, {}], im [{}, {}]",
                self.region.real_start,
                self.region.real_end,
                self.region.imag_start,
                self.region.imag_end
            ))
            .into());
        }
        Ok(())
    }
}

/// Per-pixel escape counts for a full frame, row-major, every value in
/// `[0, max_iterations]`.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationGrid {
    pub width: u32,
    pub height: u32,
    pub max_iterations: u32,
    pub data: Vec<u32>,
}

impl IterationGrid {
    fn zeroed(width: u32, height: u32, max_iterations: u32) -> Self {
        Self {
            width,
            height,
            max_iterations,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Escape count at `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.data[y as usize * self.width as usize + x as usize]
    }
}

/// The plane coordinate step for one pixel in each direction.
#[inline]
fn pixel_steps(request: &RenderRequest) -> (f64, f64) {
    (
        request.region.width() / f64::from(request.width),
        request.region.height() / f64::from(request.height),
    )
}

fn fill_row(
    request: &RenderRequest,
    y: usize,
    row: &mut [u32],
    mut point: impl FnMut(Complex) -> u32,
) {
    let (re_step, im_step) = pixel_steps(request);
    let im = request.region.imag_start + y as f64 * im_step;
    for (x, cell) in row.iter_mut().enumerate() {
        let re = request.region.real_start + x as f64 * re_step;
        *cell = point(Complex::new(re, im));
    }
}

/// Canonical `z ← z² + c` grid, rows fanned out across the rayon pool.
pub fn canonical_grid(request: &RenderRequest) -> crate::Result<IterationGrid> {
    request.validate()?;
    let mut grid = IterationGrid::zeroed(request.width, request.height, request.max_iterations);
    let max_iter = request.max_iterations;

    grid.data
        .par_chunks_mut(request.width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            fill_row(request, y, row, |c| escape_time_canonical(c, max_iter));
        });

    debug!(width = request.width, height = request.height, "canonical grid complete");
    Ok(grid)
}

/// Custom-formula grid: compile once, then iterate rows in parallel with
/// the generic point iterator.
pub fn custom_grid_parallel(
    compiler: &FormulaCompiler,
    request: &RenderRequest,
) -> crate::Result<IterationGrid> {
    request.validate()?;
    let formula = compiler.compile(&request.formula);
    let mut grid = IterationGrid::zeroed(request.width, request.height, request.max_iterations);
    let max_iter = request.max_iterations;

    grid.data
        .par_chunks_mut(request.width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            fill_row(request, y, row, |c| escape_time(&formula, c, max_iter));
        });

    debug!(
        width = request.width,
        height = request.height,
        formula = %request.formula,
        "custom parallel grid complete"
    );
    Ok(grid)
}

/// Last-resort scalar path: one thread, row-major, point by point.
pub fn custom_grid_scalar(
    compiler: &FormulaCompiler,
    request: &RenderRequest,
) -> crate::Result<IterationGrid> {
    request.validate()?;
    let formula = compiler.compile(&request.formula);
    let mut grid = IterationGrid::zeroed(request.width, request.height, request.max_iterations);
    let max_iter = request.max_iterations;

    for (y, row) in grid.data.chunks_mut(request.width as usize).enumerate() {
        fill_row(request, y, row, |c| escape_time(&formula, c, max_iter));
    }

    debug!(
        width = request.width,
        height = request.height,
        formula = %request.formula,
        "scalar grid complete"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(formula: &str) -> RenderRequest {
        RenderRequest::new(
            64,
            48,
            ComplexRegion::new(-2.0, 1.0, -1.2, 1.2).unwrap(),
            formula,
            100,
        )
    }

    #[test]
    fn rejects_zero_dimensions() {
        let mut bad = request("z * z + c");
        bad.width = 0;
        assert!(matches!(
            canonical_grid(&bad),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn rejects_zero_iteration_budget() {
        let mut bad = request("z * z + c");
        bad.max_iterations = 0;
        assert!(matches!(
            canonical_grid(&bad),
            Err(RenderError::InvalidMaxIterations(0))
        ));
    }

    #[test]
    fn corner_pixel_escapes_immediately() {
        let grid = canonical_grid(&request("z * z + c")).unwrap();
        // Pixel (0,0) maps to c = -2 - 1.2i, which is outside the escape
        // radius after the first update.
        assert_eq!(grid.get(0, 0), 0);
    }

    #[test]
    fn values_bounded_by_budget() {
        let grid = canonical_grid(&request("z * z + c")).unwrap();
        assert!(grid.data.iter().all(|&n| n <= 100));
        // The frame spans the full set, so both extremes occur.
        assert!(grid.data.iter().any(|&n| n == 100));
        assert!(grid.data.iter().any(|&n| n == 0));
    }

    #[test]
    fn canonical_and_custom_grids_match() {
        let compiler = FormulaCompiler::new();
        let req = request("z * z + c");
        let fast = canonical_grid(&req).unwrap();
        let generic = custom_grid_parallel(&compiler, &req).unwrap();
        assert_eq!(fast, generic);
    }

    #[test]
    fn parallel_and_scalar_grids_match() {
        // Worker count must not be observable: the scalar path is the
        // one-worker degenerate case of the row partitioning.
        let compiler = FormulaCompiler::new();
        let req = request("z*z + sin(c)");
        let parallel = custom_grid_parallel(&compiler, &req).unwrap();
        let scalar = custom_grid_scalar(&compiler, &req).unwrap();
        assert_eq!(parallel, scalar);
    }

    #[test]
    fn broken_formula_yields_all_zero_grid() {
        let compiler = FormulaCompiler::new();
        let grid = custom_grid_parallel(&compiler, &request("z +* garbage ((")).unwrap();
        assert!(grid.data.iter().all(|&n| n == 0));
    }
}
