//! Numeric scalar abstraction shared by every set and algorithm.
//!
//! Purpose
//! - One trait bound (`Real`) parameterizes all types, so floating-point and
//!   exact rational computations use the same code paths.
//! - Mixing scalar types is impossible by construction (every type carries a
//!   single `N`).
//!
//! Conventions
//! - `default_tolerance()` is the identity tolerance: machine-epsilon scale for
//!   floats, zero for exact rationals.
//! - `sqrt()` is exact for floats and a rational approximation for exact types.

use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use nalgebra::{DVector, Scalar, Vector2};
use num_rational::BigRational;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};

/// Scalar field used by sets, directions, and the approximation engine.
pub trait Real:
    Scalar
    + PartialOrd
    + Signed
    + FromPrimitive
    + ToPrimitive
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
{
    /// Identity tolerance for "approximately equal" tests.
    fn default_tolerance() -> Self;

    /// Square root (rational approximation for exact types).
    fn sqrt(self) -> Self;

    /// Lossy conversion used for diagnostics and error payloads.
    #[inline]
    fn to_f64_lossy(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    /// Strictly above zero. `Signed::is_positive` counts `+0.0` as positive
    /// for floats, which breaks orientation tests on exact zeros.
    #[inline]
    fn gt_zero(&self) -> bool {
        *self > Self::zero()
    }

    /// Strictly below zero (`-0.0` is not negative).
    #[inline]
    fn lt_zero(&self) -> bool {
        *self < Self::zero()
    }

    /// `|a - b| <= tol`.
    #[inline]
    fn approx_eq(a: &Self, b: &Self, tol: &Self) -> bool {
        (a.clone() - b.clone()).abs() <= *tol
    }

    /// Larger of two values (first wins ties).
    #[inline]
    fn max_of(a: Self, b: Self) -> Self {
        if b > a {
            b
        } else {
            a
        }
    }
}

impl Real for f64 {
    #[inline]
    fn default_tolerance() -> Self {
        // Slightly above machine epsilon so that rounding in dot products of
        // O(1)-scaled inputs does not break identity tests.
        1e-12
    }
    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }
}

impl Real for f32 {
    #[inline]
    fn default_tolerance() -> Self {
        1e-5
    }
    #[inline]
    fn sqrt(self) -> Self {
        f32::sqrt(self)
    }
}

impl Real for BigRational {
    #[inline]
    fn default_tolerance() -> Self {
        BigRational::zero()
    }
    fn sqrt(self) -> Self {
        if self.is_zero() {
            return self;
        }
        self.to_f64()
            .and_then(|x| BigRational::from_float(x.sqrt()))
            .unwrap_or_else(BigRational::zero)
    }
}

/// Euclidean norm of a dense vector (no `ComplexField` bound needed).
#[inline]
pub fn norm<N: Real>(v: &DVector<N>) -> N {
    v.dot(v).sqrt()
}

/// Euclidean norm of a 2D vector.
#[inline]
pub fn norm2<N: Real>(v: &Vector2<N>) -> N {
    v.dot(v).sqrt()
}

/// Sign with the "cadlag" convention: `sign(0) = +1`.
#[inline]
pub fn sign_cadlag<N: Real>(x: &N) -> N {
    if x.lt_zero() {
        -N::one()
    } else {
        N::one()
    }
}

/// Whether every component is exactly zero.
#[inline]
pub fn is_zero_vector<N: Real>(v: &DVector<N>) -> bool {
    v.iter().all(|x| x.is_zero())
}

/// Canonical basis vector `e_i` in `R^n`.
#[inline]
pub fn unit_vector<N: Real>(i: usize, n: usize) -> DVector<N> {
    let mut e = DVector::zeros(n);
    e[i] = N::one();
    e
}

/// Lift a 2D vector to a dense vector.
#[inline]
pub fn to_dvector<N: Real>(v: &Vector2<N>) -> DVector<N> {
    DVector::from_iterator(2, v.iter().cloned())
}

/// Restrict a dense vector of length 2 to a static 2D vector.
#[inline]
pub fn to_vector2<N: Real>(v: &DVector<N>) -> Vector2<N> {
    Vector2::new(v[0].clone(), v[1].clone())
}

/// Component-wise approximate equality of two 2D vectors.
#[inline]
pub fn approx_eq2<N: Real>(a: &Vector2<N>, b: &Vector2<N>, tol: &N) -> bool {
    N::approx_eq(&a.x, &b.x, tol) && N::approx_eq(&a.y, &b.y, tol)
}

/// Lossy conversion of a direction for error payloads.
pub fn lossy_vec<N: Real>(v: &DVector<N>) -> Vec<f64> {
    v.iter().map(Real::to_f64_lossy).collect()
}
