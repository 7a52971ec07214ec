//! Unbounded leaf sets: half-spaces `a·x <= b` and hyperplanes `a·x = b`.
//!
//! Support vectors exist only for directions parallel to the normal (positively
//! for half-spaces, either sign for hyperplanes); every other direction reports
//! `UnboundedDirection`.

use nalgebra::DVector;

use crate::error::{SetError, SetResult};
use crate::lazy_set::{ConstraintKind, ConvexSet, LinearConstraint};
use crate::num::{is_zero_vector, lossy_vec, Real};

/// Parallelism of `d` and `a` up to `tol` (a bound on the squared sine of the
/// angle): returns `d·a` when `‖d‖²‖a‖² - (d·a)² <= tol ‖d‖²‖a‖²`.
fn parallel_dot<N: Real>(d: &DVector<N>, a: &DVector<N>, tol: &N) -> Option<N> {
    let da = d.dot(a);
    let dd_aa = d.dot(d) * a.dot(a);
    let gap = dd_aa.clone() - da.clone() * da.clone();
    if gap <= tol.clone() * dd_aa {
        Some(da)
    } else {
        None
    }
}

/// Closest point to the origin on `a·x = b`.
fn foot<N: Real>(a: &DVector<N>, b: &N) -> DVector<N> {
    a * (b.clone() / a.dot(a))
}

fn check_normal<N: Real>(a: &DVector<N>) -> SetResult<()> {
    if is_zero_vector(a) {
        Err(SetError::UnsupportedOperation(
            "constraint with zero normal vector".into(),
        ))
    } else {
        Ok(())
    }
}

/// Closed half-space `{x : a·x <= b}`.
#[derive(Clone, Debug, PartialEq)]
pub struct HalfSpace<N: Real> {
    pub a: DVector<N>,
    pub b: N,
}

impl<N: Real> HalfSpace<N> {
    /// Fails for a zero normal.
    pub fn new(a: DVector<N>, b: N) -> SetResult<Self> {
        check_normal(&a)?;
        Ok(Self { a, b })
    }

    /// Membership with slack `eps`.
    #[inline]
    pub fn contains_eps(&self, x: &DVector<N>, eps: &N) -> bool {
        self.a.dot(x) <= self.b.clone() + eps.clone()
    }
}

impl<N: Real> ConvexSet<N> for HalfSpace<N> {
    fn dim(&self) -> usize {
        self.a.len()
    }

    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        if is_zero_vector(d) {
            return Ok(foot(&self.a, &self.b));
        }
        match parallel_dot(d, &self.a, &N::default_tolerance()) {
            Some(s) if s.gt_zero() => Ok(foot(&self.a, &self.b)),
            _ => Err(SetError::UnboundedDirection {
                direction: lossy_vec(d),
            }),
        }
    }

    fn an_element(&self) -> SetResult<DVector<N>> {
        Ok(foot(&self.a, &self.b))
    }

    fn as_linear_constraint(&self) -> Option<LinearConstraint<N>> {
        Some(LinearConstraint {
            a: self.a.clone(),
            b: self.b.clone(),
            kind: ConstraintKind::Inequality,
        })
    }
}

/// Hyperplane `{x : a·x = b}`.
#[derive(Clone, Debug, PartialEq)]
pub struct Hyperplane<N: Real> {
    pub a: DVector<N>,
    pub b: N,
}

impl<N: Real> Hyperplane<N> {
    /// Fails for a zero normal.
    pub fn new(a: DVector<N>, b: N) -> SetResult<Self> {
        check_normal(&a)?;
        Ok(Self { a, b })
    }
}

impl<N: Real> ConvexSet<N> for Hyperplane<N> {
    fn dim(&self) -> usize {
        self.a.len()
    }

    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        if is_zero_vector(d) {
            return Ok(foot(&self.a, &self.b));
        }
        match parallel_dot(d, &self.a, &N::default_tolerance()) {
            Some(s) if !s.is_zero() => Ok(foot(&self.a, &self.b)),
            _ => Err(SetError::UnboundedDirection {
                direction: lossy_vec(d),
            }),
        }
    }

    fn an_element(&self) -> SetResult<DVector<N>> {
        Ok(foot(&self.a, &self.b))
    }

    fn as_linear_constraint(&self) -> Option<LinearConstraint<N>> {
        Some(LinearConstraint {
            a: self.a.clone(),
            b: self.b.clone(),
            kind: ConstraintKind::Equality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    #[test]
    fn halfspace_support_along_normal_only() {
        let h = HalfSpace::<f64>::new(dvector![0.0, 2.0], 4.0).unwrap();
        assert_eq!(h.sigma(&dvector![0.0, 1.0]).unwrap(), dvector![0.0, 2.0]);
        assert!(matches!(
            h.sigma(&dvector![0.0, -1.0]),
            Err(SetError::UnboundedDirection { .. })
        ));
        assert!(matches!(
            h.sigma(&dvector![1.0, 1.0]),
            Err(SetError::UnboundedDirection { .. })
        ));
        assert!(h.contains_eps(&dvector![5.0, 2.0], &0.0));
        assert!(HalfSpace::<f64>::new(dvector![0.0, 0.0], 1.0).is_err());
    }

    #[test]
    fn hyperplane_support_both_signs() {
        let h = Hyperplane::<f64>::new(dvector![1.0, 1.0], 2.0).unwrap();
        assert_eq!(h.sigma(&dvector![-3.0, -3.0]).unwrap(), dvector![1.0, 1.0]);
        assert!(h.sigma(&dvector![1.0, 0.0]).is_err());
        assert_eq!(
            h.as_linear_constraint().map(|c| c.kind),
            Some(ConstraintKind::Equality)
        );
    }
}
