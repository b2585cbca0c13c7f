//! Formula compilation and the process-lifetime formula cache.
//!
//! `compile` never fails: well-formed text yields a reusable expression
//! tree, malformed text yields a deferred evaluator that re-parses (and
//! re-fails) on every call. Failure therefore surfaces only at
//! evaluation time, per point, where the iteration loop absorbs it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::ast::Expr;
use crate::complex::Complex;
use crate::error::EvalError;
use crate::parser::parse;

#[derive(Debug)]
enum EvalKind {
    /// Parsed once, walked per evaluation.
    Tree(Expr),
    /// Parse failed at compile time; the source is kept and re-parsed on
    /// every evaluation so the error is reported where it is observable.
    Deferred(String),
}

/// A shareable, immutable point evaluator for one formula text.
///
/// Cloning is cheap (`Arc`); clones obtained before a cache clear keep
/// working after it.
#[derive(Debug, Clone)]
pub struct CompiledFormula {
    kind: Arc<EvalKind>,
}

impl CompiledFormula {
    /// Evaluate one iteration step: `(z, c, n) -> z'`.
    pub fn eval(&self, z: Complex, c: Complex, n: u32) -> Result<Complex, EvalError> {
        match &*self.kind {
            EvalKind::Tree(expr) => expr.eval(z, c, n),
            EvalKind::Deferred(src) => parse(src)?.eval(z, c, n),
        }
    }

    /// `true` if the formula parsed at compile time.
    pub fn is_compiled(&self) -> bool {
        matches!(&*self.kind, EvalKind::Tree(_))
    }
}

/// Compiles formula text and caches the result by trimmed source text.
///
/// The cache is the engine's only shared mutable state. It is unbounded
/// and lazily populated; [`clear_cache`](Self::clear_cache) is the only
/// eviction. The mutex also guards concurrent first-compiles of the same
/// text, so duplicate work cannot race in.
#[derive(Debug, Default)]
pub struct FormulaCompiler {
    cache: Mutex<HashMap<String, CompiledFormula>>,
}

impl FormulaCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `text`, reusing a cached evaluator when one exists.
    ///
    /// Cache keys are trimmed source text; case and interior whitespace
    /// are significant.
    pub fn compile(&self, text: &str) -> CompiledFormula {
        let key = text.trim();
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(found) = cache.get(key) {
            trace!(formula = key, "formula cache hit");
            return found.clone();
        }

        let kind = match parse(key) {
            Ok(expr) => {
                debug!(formula = key, "compiled formula");
                EvalKind::Tree(expr)
            }
            Err(error) => {
                debug!(formula = key, %error, "formula failed to parse, deferring");
                EvalKind::Deferred(key.to_owned())
            }
        };
        let compiled = CompiledFormula { kind: Arc::new(kind) };
        cache.insert(key.to_owned(), compiled.clone());
        compiled
    }

    /// Drop every cached evaluator. Handles already held by callers are
    /// unaffected; subsequent `compile` calls re-parse from scratch.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        let evicted = cache.len();
        cache.clear();
        debug!(evicted, "formula cache cleared");
    }

    /// Number of cached formulas.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
