//! Axis-aligned boxes and single points.

use nalgebra::DVector;

use crate::error::{check_dim, SetError, SetResult};
use crate::lazy_set::ConvexSet;
use crate::num::{sign_cadlag, Real};

/// Box `{x : |x_i - c_i| <= r_i}`.
#[derive(Clone, Debug, PartialEq)]
pub struct Hyperrectangle<N: Real> {
    pub center: DVector<N>,
    pub radius: DVector<N>,
}

impl<N: Real> Hyperrectangle<N> {
    /// Fails on length mismatch or a negative radius component.
    pub fn new(center: DVector<N>, radius: DVector<N>) -> SetResult<Self> {
        check_dim(center.len(), radius.len())?;
        if radius.iter().any(|r| r.lt_zero()) {
            return Err(SetError::EmptySet);
        }
        Ok(Self { center, radius })
    }

    /// Lower corner `c - r`.
    pub fn low(&self) -> DVector<N> {
        &self.center - &self.radius
    }

    /// Upper corner `c + r`.
    pub fn high(&self) -> DVector<N> {
        &self.center + &self.radius
    }
}

impl<N: Real> ConvexSet<N> for Hyperrectangle<N> {
    fn dim(&self) -> usize {
        self.center.len()
    }

    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        Ok(DVector::from_fn(self.dim(), |i, _| {
            self.center[i].clone() + sign_cadlag(&d[i]) * self.radius[i].clone()
        }))
    }

    fn rho(&self, d: &DVector<N>) -> SetResult<N> {
        let mut acc = d.dot(&self.center);
        for (di, ri) in d.iter().zip(self.radius.iter()) {
            acc += di.abs() * ri.clone();
        }
        Ok(acc)
    }

    fn an_element(&self) -> SetResult<DVector<N>> {
        Ok(self.center.clone())
    }
}

/// The set `{x}`.
#[derive(Clone, Debug, PartialEq)]
pub struct Singleton<N: Real> {
    pub element: DVector<N>,
}

impl<N: Real> Singleton<N> {
    #[inline]
    pub fn new(element: DVector<N>) -> Self {
        Self { element }
    }
}

impl<N: Real> ConvexSet<N> for Singleton<N> {
    fn dim(&self) -> usize {
        self.element.len()
    }
    fn sigma(&self, _d: &DVector<N>) -> SetResult<DVector<N>> {
        Ok(self.element.clone())
    }
    fn an_element(&self) -> SetResult<DVector<N>> {
        Ok(self.element.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    #[test]
    fn hyperrectangle_support_and_corners() {
        let h = Hyperrectangle::<f64>::new(dvector![1.0, 0.0], dvector![0.5, 2.0]).unwrap();
        assert_eq!(h.sigma(&dvector![-1.0, 1.0]).unwrap(), dvector![0.5, 2.0]);
        assert_eq!(h.rho(&dvector![-1.0, 1.0]).unwrap(), 1.5);
        assert_eq!(h.low(), dvector![0.5, -2.0]);
        assert_eq!(h.high(), dvector![1.5, 2.0]);
        assert!(Hyperrectangle::<f64>::new(dvector![0.0], dvector![1.0, 1.0]).is_err());
    }

    #[test]
    fn singleton_ignores_direction() {
        let s = Singleton::<f64>::new(dvector![3.0, -1.0]);
        assert_eq!(s.sigma(&dvector![0.0, 1.0]).unwrap(), dvector![3.0, -1.0]);
        assert_eq!(s.rho(&dvector![1.0, 1.0]).unwrap(), 2.0);
    }
}
