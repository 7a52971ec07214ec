//! Polar-angle ordering of 2D directions without trigonometry.
//!
//! The angle of `(1,0)` is zero and grows counter-clockwise on `[0, 2π)`.
//! Vectors are first classified into a quadrant by sign tests, then compared by
//! the sign of the 2D cross product inside a quadrant. The span of a quadrant is
//! below π, so the cross-product sign is a faithful angle test there.
//!
//! Zero vectors are outside the contract: callers special-case them first.

use std::cmp::Ordering;

use nalgebra::Vector2;

use crate::num::Real;

/// Quadrant index in `{0,1,2,3}`; boundaries belong to the quadrant they open.
///
/// - 0: `x > 0, y >= 0` (angles `[0, π/2)`)
/// - 1: `x <= 0, y > 0` (angles `[π/2, π)`)
/// - 2: `x < 0, y <= 0` (angles `[π, 3π/2)`)
/// - 3: `x >= 0, y < 0` (angles `[3π/2, 2π)`)
#[inline]
pub fn quadrant<N: Real>(v: &Vector2<N>) -> u8 {
    debug_assert!(
        !(v.x.is_zero() && v.y.is_zero()),
        "zero direction has no polar angle"
    );
    let zero = N::zero();
    if v.x > zero && v.y >= zero {
        0
    } else if v.x <= zero && v.y > zero {
        1
    } else if v.x < zero && v.y <= zero {
        2
    } else {
        3
    }
}

/// 2D cross product `u.x * v.y - u.y * v.x`.
#[inline]
pub fn cross<N: Real>(u: &Vector2<N>, v: &Vector2<N>) -> N {
    u.x.clone() * v.y.clone() - u.y.clone() * v.x.clone()
}

/// Total order on nonzero directions by polar angle.
pub fn cmp_angle<N: Real>(u: &Vector2<N>, v: &Vector2<N>) -> Ordering {
    let (qu, qv) = (quadrant(u), quadrant(v));
    if qu != qv {
        return qu.cmp(&qv);
    }
    let c = cross(u, v);
    if c.gt_zero() {
        Ordering::Less
    } else if c.lt_zero() {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// `angle(u) <= angle(v)`.
#[inline]
pub fn le<N: Real>(u: &Vector2<N>, v: &Vector2<N>) -> bool {
    cmp_angle(u, v) != Ordering::Greater
}

/// `angle(u) < angle(v)`.
#[inline]
pub fn lt<N: Real>(u: &Vector2<N>, v: &Vector2<N>) -> bool {
    cmp_angle(u, v) == Ordering::Less
}

/// Whether `u` and `v` point in the same direction up to `tol`.
///
/// The test `cross² <= tol² |u|² |v|²` with `u·v > 0` avoids square roots, so it
/// is exact for rational scalars when `tol = 0`.
pub fn same_direction<N: Real>(u: &Vector2<N>, v: &Vector2<N>, tol: &N) -> bool {
    let dot = u.dot(v);
    if !dot.gt_zero() {
        return false;
    }
    let c = cross(u, v);
    c.clone() * c <= tol.clone() * tol.clone() * u.dot(u) * v.dot(v)
}
