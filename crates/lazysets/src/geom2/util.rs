//! Vertex representation in 2D (`VPolygon`) and conversions to `HPolygon`.

use std::cmp::Ordering;

use nalgebra::{DVector, Vector2};

use super::ordered::HPolygon;
use super::types::HalfSpace2;
use crate::error::{SetError, SetResult};
use crate::lazy_set::ConvexSet;
use crate::num::{approx_eq2, to_dvector, to_vector2, Real};

/// Andrew’s monotone chain convex hull (returns hull in CCW order).
///
/// Collinear points are dropped; duplicates within `tol` are merged.
pub fn convex_hull<N: Real>(points: &[Vector2<N>], tol: &N) -> Vec<Vector2<N>> {
    let mut pts: Vec<_> = points.to_vec();
    pts.sort_by(|a, b| match a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal) {
        Ordering::Equal => a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal),
        o => o,
    });
    pts.dedup_by(|a, b| approx_eq2(a, b, tol));
    if pts.len() < 3 {
        return pts;
    }
    let mut lower: Vec<Vector2<N>> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && !turn(&lower[lower.len() - 2], &lower[lower.len() - 1], p).gt_zero() {
            lower.pop();
        }
        lower.push(p.clone());
    }
    let mut upper: Vec<Vector2<N>> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && !turn(&upper[upper.len() - 2], &upper[upper.len() - 1], p).gt_zero() {
            upper.pop();
        }
        upper.push(p.clone());
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    hull
}

#[inline]
fn turn<N: Real>(a: &Vector2<N>, b: &Vector2<N>, c: &Vector2<N>) -> N {
    let ab = b - a;
    let ac = c - a;
    ab.x.clone() * ac.y.clone() - ab.y.clone() * ac.x.clone()
}

/// Convex polygon given by its vertices in counter-clockwise order.
#[derive(Clone, Debug, PartialEq)]
pub struct VPolygon<N: Real> {
    pub vertices: Vec<Vector2<N>>,
}

impl<N: Real> VPolygon<N> {
    /// Convex hull of arbitrary points; `EmptySet` if no points are given.
    pub fn new(points: &[Vector2<N>]) -> SetResult<Self> {
        if points.is_empty() {
            return Err(SetError::EmptySet);
        }
        Ok(Self {
            vertices: convex_hull(points, &N::default_tolerance()),
        })
    }

    /// Build the ordered H-representation via outward edge normals.
    ///
    /// Degenerate hulls (a point or a segment) yield no full-dimensional
    /// polygon and return `None`.
    pub fn to_hpolygon(&self) -> Option<HPolygon<N>> {
        let m = self.vertices.len();
        if m < 3 {
            return None;
        }
        let mut hs = Vec::with_capacity(m);
        for k in 0..m {
            let p = &self.vertices[k];
            let q = &self.vertices[(k + 1) % m];
            let edge = q - p;
            // For CCW hull order, outward normal is 90° CW: (edge.y, -edge.x)
            let n = Vector2::new(edge.y.clone(), -edge.x.clone());
            hs.push(HalfSpace2::through(n, p));
        }
        Some(HPolygon::from_constraints(hs))
    }
}

impl<N: Real> ConvexSet<N> for VPolygon<N> {
    fn dim(&self) -> usize {
        2
    }

    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let d = to_vector2(d);
        let mut best: Option<(&Vector2<N>, N)> = None;
        for v in &self.vertices {
            let val = d.dot(v);
            match &best {
                Some((_, b)) if *b >= val => {}
                _ => best = Some((v, val)),
            }
        }
        best.map(|(v, _)| to_dvector(v)).ok_or(SetError::EmptySet)
    }
}
