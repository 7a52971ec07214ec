//! Zonotopes and vertex-represented polytopes.

use nalgebra::{DMatrix, DVector};

use crate::error::{check_dim, SetError, SetResult};
use crate::lazy_set::ConvexSet;
use crate::num::{sign_cadlag, Real};

/// Zonotope `{c + G ξ : ‖ξ‖_∞ <= 1}`; generators are the columns of `G`.
#[derive(Clone, Debug, PartialEq)]
pub struct Zonotope<N: Real> {
    pub center: DVector<N>,
    pub generators: DMatrix<N>,
}

impl<N: Real> Zonotope<N> {
    pub fn new(center: DVector<N>, generators: DMatrix<N>) -> SetResult<Self> {
        check_dim(center.len(), generators.nrows())?;
        Ok(Self { center, generators })
    }

    /// Number of generators.
    #[inline]
    pub fn ngens(&self) -> usize {
        self.generators.ncols()
    }
}

impl<N: Real> ConvexSet<N> for Zonotope<N> {
    fn dim(&self) -> usize {
        self.center.len()
    }

    /// `c + Σ sign(⟨g_j, d⟩) g_j` with `sign(0) = +1`.
    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let mut out = self.center.clone();
        for g in self.generators.column_iter() {
            let s = sign_cadlag(&g.dot(d));
            out += g * s;
        }
        Ok(out)
    }

    fn rho(&self, d: &DVector<N>) -> SetResult<N> {
        let mut acc = d.dot(&self.center);
        for g in self.generators.column_iter() {
            acc += g.dot(d).abs();
        }
        Ok(acc)
    }

    fn an_element(&self) -> SetResult<DVector<N>> {
        Ok(self.center.clone())
    }
}

/// Convex hull of a finite vertex list.
#[derive(Clone, Debug, PartialEq)]
pub struct VPolytope<N: Real> {
    pub vertices: Vec<DVector<N>>,
}

impl<N: Real> VPolytope<N> {
    /// All vertices must share one dimension.
    pub fn new(vertices: Vec<DVector<N>>) -> SetResult<Self> {
        if let Some(first) = vertices.first() {
            for v in &vertices[1..] {
                check_dim(first.len(), v.len())?;
            }
        }
        Ok(Self { vertices })
    }
}

impl<N: Real> ConvexSet<N> for VPolytope<N> {
    fn dim(&self) -> usize {
        self.vertices.first().map_or(0, |v| v.len())
    }

    /// First vertex of maximal `⟨d, v⟩`.
    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let mut best: Option<(&DVector<N>, N)> = None;
        for v in &self.vertices {
            let val = d.dot(v);
            if best.as_ref().is_none_or(|(_, b)| val > *b) {
                best = Some((v, val));
            }
        }
        best.map(|(v, _)| v.clone()).ok_or(SetError::EmptySet)
    }

    fn an_element(&self) -> SetResult<DVector<N>> {
        self.vertices.first().cloned().ok_or(SetError::EmptySet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn zonotope_support_sums_signed_generators() {
        let z = Zonotope::<f64>::new(dvector![1.0, 1.0], dmatrix![1.0, 0.5; 0.0, 1.0]).unwrap();
        let d = dvector![1.0, -1.0];
        // g1·d = 1 -> +g1, g2·d = -0.5 -> -g2
        assert_eq!(z.sigma(&d).unwrap(), dvector![1.5, 0.0]);
        assert!((z.rho(&d).unwrap() - d.dot(&z.sigma(&d).unwrap())).abs() < 1e-12);
        assert_eq!(z.ngens(), 2);
    }

    #[test]
    fn vpolytope_support_and_empty() {
        let p = VPolytope::<f64>::new(vec![dvector![0.0, 0.0], dvector![1.0, 0.0], dvector![0.0, 1.0]])
            .unwrap();
        assert_eq!(p.sigma(&dvector![1.0, 0.2]).unwrap(), dvector![1.0, 0.0]);
        assert_eq!(p.an_element().unwrap(), dvector![0.0, 0.0]);
        let e = VPolytope::<f64>::new(vec![]).unwrap();
        assert_eq!(e.sigma(&dvector![1.0]), Err(SetError::EmptySet));
        assert!(VPolytope::<f64>::new(vec![dvector![0.0], dvector![1.0, 2.0]]).is_err());
    }
}
