//! Per-point escape-time iteration.
//!
//! Two paths with one mathematical contract: a specialized
//! component-arithmetic loop for the defining recurrence `z ← z² + c`,
//! and a generic loop driving a compiled formula. For the canonical
//! formula both produce bit-identical iteration counts.

use tracing::trace;

use crate::compiler::CompiledFormula;
use crate::complex::Complex;

/// Squared escape radius: the orbit has escaped once `|z|² > 4`.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Trimmed spellings recognized as the defining recurrence.
///
/// Recognition is plain string equality after trimming — no
/// normalization — so each accepted spelling is listed explicitly.
const CANONICAL_SPELLINGS: &[&str] = &[
    "z * z + c",
    "z*z + c",
    "z*z+c",
    "z**2 + c",
    "z**2+c",
    "z^2 + c",
    "z^2+c",
];

/// `true` iff `text` (after trimming) is an accepted spelling of `z ← z² + c`.
pub fn is_canonical_formula(text: &str) -> bool {
    CANONICAL_SPELLINGS.contains(&text.trim())
}

/// How a single point's iteration ended.
///
/// `FormulaFailed` makes the escape-at-zero policy explicit: evaluation
/// errors do not abort a render, the point just reports iteration 0 and
/// colors as immediately escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    /// The orbit exceeded the escape radius at this 0-based iteration.
    Escaped(u32),
    /// The orbit stayed bounded for the full iteration budget.
    Interior,
    /// The formula failed to evaluate at some step.
    FormulaFailed,
}

impl PointOutcome {
    /// Collapse to the iteration count stored in grids:
    /// escape index, `max_iter` for interior, `0` for a failed formula.
    #[inline]
    pub fn iteration_count(self, max_iter: u32) -> u32 {
        match self {
            Self::Escaped(n) => n,
            Self::Interior => max_iter,
            Self::FormulaFailed => 0,
        }
    }
}

/// Escape test shared by both paths.
///
/// Written as a negated bound check so a NaN magnitude counts as escaped,
/// terminating orbits that wander out of the representable range.
#[inline]
fn has_escaped(norm_sq: f64) -> bool {
    !(norm_sq <= ESCAPE_RADIUS_SQ)
}

/// Canonical fast path: direct real/imaginary component arithmetic for
/// `z ← z² + c`, no expression tree in the loop.
///
/// Returns the 0-based iteration index at escape, or `max_iter` if the
/// orbit never escapes.
#[inline]
pub fn escape_time_canonical(c: Complex, max_iter: u32) -> u32 {
    let mut zr = 0.0_f64;
    let mut zi = 0.0_f64;
    for n in 0..max_iter {
        // Squaring via a + a rounds identically to 2·a, keeping this loop
        // bit-compatible with the generic evaluator's complex multiply.
        let next_zr = zr * zr - zi * zi + c.re;
        let next_zi = zr * zi + zi * zr + c.im;
        zr = next_zr;
        zi = next_zi;
        if has_escaped(zr * zr + zi * zi) {
            return n;
        }
    }
    max_iter
}

/// Generic path: iterate a compiled formula from `z = 0`.
pub fn iterate_point(formula: &CompiledFormula, c: Complex, max_iter: u32) -> PointOutcome {
    let mut z = Complex::ZERO;
    for n in 0..max_iter {
        match formula.eval(z, c, n) {
            Ok(next) => {
                if has_escaped(next.norm_sq()) {
                    return PointOutcome::Escaped(n);
                }
                z = next;
            }
            Err(error) => {
                // Deliberately conflated with immediate escape; the log
                // line is the only place the distinction survives.
                trace!(%error, re = c.re, im = c.im, iteration = n, "formula evaluation failed");
                return PointOutcome::FormulaFailed;
            }
        }
    }
    PointOutcome::Interior
}

/// [`iterate_point`] collapsed to a grid-ready iteration count.
#[inline]
pub fn escape_time(formula: &CompiledFormula, c: Complex, max_iter: u32) -> u32 {
    iterate_point(formula, c, max_iter).iteration_count(max_iter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::FormulaCompiler;

    #[test]
    fn recognizes_accepted_spellings() {
        assert!(is_canonical_formula("z * z + c"));
        assert!(is_canonical_formula("  z*z+c  "));
        assert!(is_canonical_formula("z**2 + c"));
        assert!(is_canonical_formula("z^2+c"));
    }

    #[test]
    fn rejects_other_formulas() {
        assert!(!is_canonical_formula("z * z * z + c"));
        assert!(!is_canonical_formula("Z * Z + C"));
        assert!(!is_canonical_formula("z *  z + c"));
    }

    #[test]
    fn far_point_escapes_at_zero() {
        // |c| > 2, so the very first update already escapes.
        assert_eq!(escape_time_canonical(Complex::new(-2.0, -1.2), 100), 0);
    }

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_time_canonical(Complex::ZERO, 100), 100);
    }

    #[test]
    fn known_escape_count() {
        // c = 1: z₁ = 1, z₂ = 2, z₃ = 5 → |z|² first exceeds 4 at n = 2.
        assert_eq!(escape_time_canonical(Complex::real(1.0), 100), 2);
    }

    #[test]
    fn minus_one_is_interior() {
        // Period-2 orbit 0 → −1 → 0 → …
        assert_eq!(escape_time_canonical(Complex::real(-1.0), 500), 500);
    }

    #[test]
    fn canonical_and_generic_agree_pointwise() {
        let compiler = FormulaCompiler::new();
        let formula = compiler.compile("z * z + c");
        let points = [
            Complex::new(-2.0, -1.2),
            Complex::new(0.0, 0.0),
            Complex::new(1.0, 0.0),
            Complex::new(-0.75, 0.1),
            Complex::new(0.3, 0.5),
            Complex::new(-1.0, 0.0),
            Complex::new(0.25, 0.0),
            Complex::new(-0.1, 0.8),
        ];
        for c in points {
            assert_eq!(
                escape_time_canonical(c, 200),
                escape_time(&formula, c, 200),
                "paths disagree at {c}"
            );
        }
    }

    #[test]
    fn all_spellings_agree_with_fast_path() {
        // `z**2` evaluates by repeated multiplication, so every accepted
        // spelling is iteration-count identical to the specialized loop.
        let compiler = FormulaCompiler::new();
        let points = [
            Complex::new(0.3, 0.5),
            Complex::new(-0.75, 0.1),
            Complex::new(0.36, 0.1),
            Complex::new(-1.25, 0.02),
        ];
        for spelling in ["z * z + c", "z**2 + c", "z^2+c"] {
            let formula = compiler.compile(spelling);
            for c in points {
                assert_eq!(
                    escape_time_canonical(c, 300),
                    escape_time(&formula, c, 300),
                    "`{spelling}` disagrees at {c}"
                );
            }
        }
    }

    #[test]
    fn evaluation_failure_reports_zero() {
        let compiler = FormulaCompiler::new();
        let broken = compiler.compile("z + undefined_name");
        let outcome = iterate_point(&broken, Complex::real(0.1), 50);
        assert_eq!(outcome, PointOutcome::FormulaFailed);
        assert_eq!(outcome.iteration_count(50), 0);
    }

    #[test]
    fn unparseable_formula_reports_zero() {
        let compiler = FormulaCompiler::new();
        let broken = compiler.compile("z +* c");
        assert_eq!(escape_time(&broken, Complex::real(0.1), 50), 0);
    }

    #[test]
    fn custom_formula_iterates() {
        let compiler = FormulaCompiler::new();
        let cubic = compiler.compile("z*z*z + c");
        // c = 2 escapes almost immediately under the cubic map (z₁ = 2 sits
        // exactly on the escape radius, z₂ = 10 is out); the origin does not.
        assert_eq!(escape_time(&cubic, Complex::real(2.0), 100), 1);
        assert_eq!(escape_time(&cubic, Complex::ZERO, 100), 100);
    }

    #[test]
    fn non_finite_orbit_counts_as_escaped() {
        // exp overflows to infinity long before the budget runs out.
        let compiler = FormulaCompiler::new();
        let explosive = compiler.compile("exp(z) + c + 3");
        let n = escape_time(&explosive, Complex::real(0.5), 1000);
        assert!(n < 1000, "overflowing orbit must terminate early, got {n}");
    }
}
