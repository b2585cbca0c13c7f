use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// A complex number represented as two `f64` components.
///
/// This is a lightweight, `Copy` type optimized for the tight iteration loop.
/// We roll our own instead of using `num::Complex` to keep the dependency graph
/// minimal and retain full control over the arithmetic, including the
/// transcendental functions exposed to user formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };

    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// A purely real value.
    #[inline]
    pub fn real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Returns `re² + im²` without taking the square root.
    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Returns `√(re² + im²)`.
    #[inline]
    pub fn norm(self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// The argument (phase angle) in `(-π, π]`.
    #[inline]
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    /// `true` iff both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    // -- Transcendental functions (principal branches) --
    //
    // These back the allow-listed formula functions. Domain edges follow IEEE
    // float arithmetic rather than raising: `ln(0)` is `-∞`, overflow is `∞`.

    /// Complex sine: `sin(a+bi) = sin a · cosh b + i cos a · sinh b`.
    pub fn sin(self) -> Self {
        Self {
            re: self.re.sin() * self.im.cosh(),
            im: self.re.cos() * self.im.sinh(),
        }
    }

    /// Complex cosine: `cos(a+bi) = cos a · cosh b − i sin a · sinh b`.
    pub fn cos(self) -> Self {
        Self {
            re: self.re.cos() * self.im.cosh(),
            im: -(self.re.sin() * self.im.sinh()),
        }
    }

    /// Complex exponential: `e^(a+bi) = e^a (cos b + i sin b)`.
    pub fn exp(self) -> Self {
        let r = self.re.exp();
        Self {
            re: r * self.im.cos(),
            im: r * self.im.sin(),
        }
    }

    /// Principal natural logarithm: `ln|z| + i·arg(z)`.
    pub fn ln(self) -> Self {
        Self {
            re: self.norm().ln(),
            im: self.arg(),
        }
    }

    /// Principal square root, computed in polar form.
    pub fn sqrt(self) -> Self {
        let r = self.norm().sqrt();
        let half = self.arg() * 0.5;
        Self {
            re: r * half.cos(),
            im: r * half.sin(),
        }
    }

    /// Complex power `self^exp`, as `exp(exp · ln self)`.
    ///
    /// `0^0` is `1` and `0^w` is `0` for `w` with a positive real part,
    /// matching the conventional principal-value definition.
    pub fn powc(self, exp: Self) -> Self {
        if self == Self::ZERO {
            if exp == Self::ZERO {
                return Self::ONE;
            }
            if exp.re > 0.0 {
                return Self::ZERO;
            }
        }
        (exp * self.ln()).exp()
    }

    /// Non-negative integer power by sequential multiplication.
    ///
    /// Sequential (not binary) so that `z.powu(2)` rounds exactly like
    /// the written-out product `z * z` — the canonical fast path depends
    /// on `z**2` and `z * z` being bit-identical.
    pub fn powu(self, n: u32) -> Self {
        match n {
            0 => Self::ONE,
            _ => {
                let mut acc = self;
                for _ in 1..n {
                    acc = acc * self;
                }
                acc
            }
        }
    }

    /// Exponentiation as user formulas see it: small integer exponents
    /// use repeated multiplication, everything else the principal branch.
    pub fn pow(self, exp: Self) -> Self {
        if exp.im == 0.0 && exp.re.fract() == 0.0 && exp.re.abs() <= 16.0 {
            let k = exp.re as i32;
            let powered = self.powu(k.unsigned_abs());
            return if k < 0 { Self::ONE / powered } else { powered };
        }
        self.powc(exp)
    }
}

impl From<f64> for Complex {
    #[inline]
    fn from(re: f64) -> Self {
        Self::real(re)
    }
}

// -- Arithmetic operators --

impl Add for Complex {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl AddAssign for Complex {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.re += rhs.re;
        self.im += rhs.im;
    }
}

impl Sub for Complex {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl SubAssign for Complex {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.re -= rhs.re;
        self.im -= rhs.im;
    }
}

impl Mul for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl MulAssign for Complex {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

/// Complex division. A zero divisor yields non-finite components, which the
/// iteration loop treats as an escaped orbit rather than an error.
impl Div for Complex {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        let d = rhs.norm_sq();
        Self {
            re: (self.re * rhs.re + self.im * rhs.im) / d,
            im: (self.im * rhs.re - self.re * rhs.im) / d,
        }
    }
}

impl Neg for Complex {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

/// Scalar multiplication: `Complex * f64`.
impl Mul<f64> for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self {
            re: self.re * rhs,
            im: self.im * rhs,
        }
    }
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.im >= 0.0 {
            write!(f, "{} + {}i", self.re, self.im)
        } else {
            write!(f, "{} - {}i", self.re, -self.im)
        }
    }
}
