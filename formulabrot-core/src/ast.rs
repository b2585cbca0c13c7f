//! Abstract syntax tree for user iteration formulas.
//!
//! A formula is an expression over the variables `z`, `c`, `n`, the
//! constants `pi` and `e`, and a closed set of functions. The tree is
//! built once per distinct formula text and walked per point evaluation —
//! a bounded interpreter over a fixed symbol table, never runtime code.

use crate::complex::Complex;
use crate::error::EvalError;

/// Binary operators, in the usual precedence order (lowest to highest:
/// add/sub, mul/div, pow).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// A parsed formula expression.
///
/// Identifier resolution is deferred to evaluation, matching the
/// dynamic-evaluation semantics the engine preserves: an unknown name
/// parses fine and only fails when a point is actually iterated.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Ident(String),
    Neg(Box<Expr>),
    Bin {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call { name: String, args: Vec<Expr> },
}

impl Expr {
    /// Evaluate the expression for one iteration step.
    ///
    /// `n` is the 0-based iteration counter, promoted to a real value.
    /// Non-finite arithmetic results are not errors; only name and arity
    /// problems fail.
    pub fn eval(&self, z: Complex, c: Complex, n: u32) -> Result<Complex, EvalError> {
        match self {
            Expr::Number(v) => Ok(Complex::real(*v)),
            Expr::Ident(name) => match name.as_str() {
                "z" => Ok(z),
                "c" => Ok(c),
                "n" => Ok(Complex::real(f64::from(n))),
                "pi" => Ok(Complex::real(std::f64::consts::PI)),
                "e" => Ok(Complex::real(std::f64::consts::E)),
                _ => Err(EvalError::UnknownSymbol(name.clone())),
            },
            Expr::Neg(inner) => Ok(-inner.eval(z, c, n)?),
            Expr::Bin { op, lhs, rhs } => {
                let a = lhs.eval(z, c, n)?;
                let b = rhs.eval(z, c, n)?;
                Ok(match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                    BinOp::Pow => a.pow(b),
                })
            }
            Expr::Call { name, args } => {
                let expect = |count: usize| -> Result<(), EvalError> {
                    if args.len() == count {
                        Ok(())
                    } else {
                        Err(EvalError::WrongArity {
                            name: name.clone(),
                            expected: count,
                            got: args.len(),
                        })
                    }
                };
                match name.as_str() {
                    "abs" => {
                        expect(1)?;
                        Ok(Complex::real(args[0].eval(z, c, n)?.norm()))
                    }
                    "sin" => {
                        expect(1)?;
                        Ok(args[0].eval(z, c, n)?.sin())
                    }
                    "cos" => {
                        expect(1)?;
                        Ok(args[0].eval(z, c, n)?.cos())
                    }
                    "exp" => {
                        expect(1)?;
                        Ok(args[0].eval(z, c, n)?.exp())
                    }
                    "log" => {
                        expect(1)?;
                        Ok(args[0].eval(z, c, n)?.ln())
                    }
                    "sqrt" => {
                        expect(1)?;
                        Ok(args[0].eval(z, c, n)?.sqrt())
                    }
                    "pow" => {
                        expect(2)?;
                        let base = args[0].eval(z, c, n)?;
                        let exponent = args[1].eval(z, c, n)?;
                        Ok(base.pow(exponent))
                    }
                    _ => Err(EvalError::UnknownSymbol(name.clone())),
                }
            }
        }
    }
}
