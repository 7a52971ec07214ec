//! Ordered H-representation in 2D (`HPolygon`).
//!
//! Purpose
//! - Provide a polygon as an angle-ordered list of half-spaces, answering σ in
//!   O(log m) by bracketing the query direction between consecutive normals.
//!
//! Invariants
//! - Constraints are sorted by the polar angle of their normal (`direction::le`,
//!   zero angle at `(1,0)`), with near-duplicate normals coalesced (the tighter
//!   offset is kept).
//! - Normals are not normalized, so exact scalar types stay exact.
//!
//! Notes
//! - σ for `d` equal to a stored normal returns the vertex closing that edge;
//!   both adjacent vertices are valid support points.
//! - Consecutive normals spanning an angle of π or more mean the region is
//!   unbounded in between; σ reports `UnboundedDirection` there.

use std::collections::VecDeque;

use nalgebra::{DVector, Matrix2, Vector2};

use super::types::{inverse2, line_intersection, HalfSpace2};
use crate::direction::{cmp_angle, cross, le, lt, same_direction};
use crate::error::{SetError, SetResult};
use crate::lazy_set::ConvexSet;
use crate::num::{lossy_vec, to_dvector, to_vector2, Real};

/// Below this many constraints σ scans linearly instead of bisecting.
pub const BINARY_SEARCH_THRESHOLD: usize = 10;

/// Angle-ordered H-representation of a convex polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct HPolygon<N: Real> {
    pub constraints: Vec<HalfSpace2<N>>,
}

impl<N: Real> Default for HPolygon<N> {
    fn default() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }
}

impl<N: Real> HPolygon<N> {
    /// Sort and coalesce an arbitrary list of constraints.
    pub fn from_constraints(constraints: Vec<HalfSpace2<N>>) -> Self {
        Self::from_constraints_tol(constraints, &N::default_tolerance())
    }

    /// As `from_constraints`, with an explicit duplicate-normal tolerance.
    pub fn from_constraints_tol(mut constraints: Vec<HalfSpace2<N>>, tol: &N) -> Self {
        constraints.retain(|h| !(h.n.x.is_zero() && h.n.y.is_zero()));
        constraints.sort_by(|a, b| cmp_angle(&a.n, &b.n));
        let mut out = Vec::with_capacity(constraints.len());
        for h in constraints {
            push_or_coalesce(&mut out, h, tol);
        }
        Self { constraints: out }
    }

    /// Wrap constraints already sorted by normal angle.
    #[inline]
    pub fn from_sorted_unchecked(constraints: Vec<HalfSpace2<N>>) -> Self {
        Self { constraints }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Insert a half-space and preserve invariants (binary search by angle,
    /// coalesce near-duplicate normals).
    pub fn insert_halfspace(&mut self, h: HalfSpace2<N>) {
        self.insert_halfspace_tol(h, &N::default_tolerance());
    }

    /// As `insert_halfspace`, with an explicit duplicate-normal tolerance.
    pub fn insert_halfspace_tol(&mut self, h: HalfSpace2<N>, tol: &N) {
        if h.n.x.is_zero() && h.n.y.is_zero() {
            return;
        }
        // binary search by angle
        let mut lo = 0usize;
        let mut hi = self.constraints.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            if le(&self.constraints[mid].n, &h.n) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        // lo is insertion point
        for k in [lo.checked_sub(1), Some(lo)].into_iter().flatten() {
            if let Some(existing) = self.constraints.get_mut(k) {
                if same_direction(&existing.n, &h.n, tol) {
                    if h.tighter_than(existing) {
                        *existing = h;
                    }
                    return;
                }
            }
        }
        self.constraints.insert(lo, h);
    }

    /// Index `k` of the first normal with `d <= n_k` (`len()` if none).
    pub fn bracket(&self, d: &Vector2<N>) -> usize {
        let m = self.constraints.len();
        if m <= BINARY_SEARCH_THRESHOLD {
            return self
                .constraints
                .iter()
                .position(|h| le(d, &h.n))
                .unwrap_or(m);
        }
        let mut lo = 0usize;
        let mut hi = m;
        while lo < hi {
            let mid = (lo + hi) / 2;
            if le(d, &self.constraints[mid].n) {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo
    }

    /// Support vector of a 2D direction.
    pub fn sigma2(&self, d: &Vector2<N>) -> SetResult<Vector2<N>> {
        let unbounded = || SetError::UnboundedDirection {
            direction: lossy_vec(&to_dvector(d)),
        };
        if d.x.is_zero() && d.y.is_zero() {
            return self.sigma2(&Vector2::new(N::one(), N::zero()));
        }
        let m = self.constraints.len();
        if m < 2 {
            return Err(unbounded());
        }
        let k = self.bracket(d);
        let (i, j) = if k == 0 || k == m { (m - 1, 0) } else { (k - 1, k) };
        let (hi, hj) = (&self.constraints[i], &self.constraints[j]);
        if !cross(&hi.n, &hj.n).gt_zero() {
            return Err(unbounded());
        }
        line_intersection(hi, hj).ok_or_else(unbounded)
    }

    /// Vertices: intersections of cyclically consecutive constraints.
    ///
    /// Assumes a bounded, redundancy-free list (e.g. an overapproximation
    /// result or the output of `remove_redundant_constraints`).
    pub fn vertices_list(&self) -> Vec<Vector2<N>> {
        let m = self.constraints.len();
        if m < 2 {
            return Vec::new();
        }
        (0..m)
            .filter_map(|k| line_intersection(&self.constraints[k], &self.constraints[(k + 1) % m]))
            .collect()
    }

    /// Intersect with another ordered polygon (merge two sorted streams + coalesce).
    pub fn intersection(&self, other: &HPolygon<N>) -> HPolygon<N> {
        let tol = N::default_tolerance();
        let (a, b) = (&self.constraints, &other.constraints);
        let mut i = 0usize;
        let mut j = 0usize;
        let mut out: Vec<HalfSpace2<N>> = Vec::with_capacity(a.len() + b.len());
        while i < a.len() && j < b.len() {
            if le(&a[i].n, &b[j].n) {
                push_or_coalesce(&mut out, a[i].clone(), &tol);
                i += 1;
            } else {
                push_or_coalesce(&mut out, b[j].clone(), &tol);
                j += 1;
            }
        }
        for h in a[i..].iter().chain(b[j..].iter()) {
            push_or_coalesce(&mut out, h.clone(), &tol);
        }
        HPolygon { constraints: out }
    }

    /// Membership check with custom slack (eps).
    ///
    /// - `eps > 0` is permissive (enlarges the region).
    /// - `eps < 0` is strict (shrinks the region).
    #[inline]
    pub fn contains_eps(&self, p: &Vector2<N>, eps: &N) -> bool {
        self.constraints.iter().all(|h| h.satisfies_eps(p, eps))
    }

    /// Membership within the default tolerance of `N`.
    #[inline]
    pub fn contains(&self, p: &Vector2<N>) -> bool {
        self.contains_eps(p, &N::default_tolerance())
    }

    /// Image under the invertible linear map `x ↦ M x`; result is re-sorted
    /// and coalesced. `None` for a singular `M`.
    pub fn linear_map(&self, m: &Matrix2<N>) -> Option<HPolygon<N>> {
        let minv_t = inverse2(m)?.transpose();
        // n·x <= c with x = M⁻¹ y  ⇔  (M⁻ᵀ n)·y <= c
        let mapped = self
            .constraints
            .iter()
            .map(|h| HalfSpace2::new(&minv_t * &h.n, h.c.clone()))
            .collect();
        Some(HPolygon::from_constraints(mapped))
    }

    /// Intersection of half-spaces using deque sweep on angle-sorted, coalesced constraints.
    ///
    /// eps policy:
    /// - `eps > 0` enlarges all half-spaces (c → c+eps): conservative for declaring emptiness.
    /// - `eps < 0` shrinks all half-spaces: conservative for certifying non‑emptiness.
    pub fn halfspace_intersection_eps(&self, eps: &N) -> HalfspaceIntersection<N> {
        hsi_ordered(&self.constraints, eps).0
    }

    /// Shorthand for `halfspace_intersection_eps(0)`.
    #[inline]
    pub fn halfspace_intersection(&self) -> HalfspaceIntersection<N> {
        self.halfspace_intersection_eps(&N::zero())
    }

    /// Emptiness with the signed eps convention of `halfspace_intersection_eps`.
    #[inline]
    pub fn is_empty_eps(&self, eps: &N) -> bool {
        self.halfspace_intersection_eps(eps).is_empty()
    }

    /// Drop constraints that do not contribute an edge. Returns the kind of the
    /// region; constraints are only rewritten when it is bounded.
    pub fn remove_redundant_constraints(&mut self) -> HalfspaceIntersection<N> {
        let (res, keep) = hsi_ordered(&self.constraints, &N::zero());
        if res.is_bounded() {
            let mut keep = keep;
            keep.sort_unstable();
            self.constraints = keep.into_iter().map(|k| self.constraints[k].clone()).collect();
        }
        res
    }
}

impl<N: Real> ConvexSet<N> for HPolygon<N> {
    fn dim(&self) -> usize {
        2
    }

    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        Ok(to_dvector(&self.sigma2(&to_vector2(d))?))
    }
}

/// HPI result: empty, unbounded, or vertices.
#[derive(Clone, Debug, PartialEq)]
pub enum HalfspaceIntersection<N: Real> {
    Empty,
    Unbounded,
    Bounded(Vec<Vector2<N>>),
}

impl<N: Real> HalfspaceIntersection<N> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, HalfspaceIntersection::Empty)
    }
    #[inline]
    pub fn is_bounded(&self) -> bool {
        matches!(self, HalfspaceIntersection::Bounded(_))
    }
    #[inline]
    pub fn vertices(self) -> Option<Vec<Vector2<N>>> {
        if let HalfspaceIntersection::Bounded(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

/// Deque sweep; also returns the indices of the surviving constraints.
fn hsi_ordered<N: Real>(hs: &[HalfSpace2<N>], eps: &N) -> (HalfspaceIntersection<N>, Vec<usize>) {
    if hs.is_empty() {
        return (HalfspaceIntersection::Unbounded, Vec::new());
    }
    let relaxed: Vec<HalfSpace2<N>> = hs
        .iter()
        .map(|h| HalfSpace2::new(h.n.clone(), h.c.clone() + eps.clone()))
        .collect();
    let hs = &relaxed[..];
    // Fast contradiction check for any opposite parallel pair (interval test):
    // n·x <= c1 and (-λn)·x <= c2 with λ > 0 need -c2/λ <= c1.
    for h in hs {
        let opposite = -h.n.clone();
        let pos = hs.partition_point(|g| lt(&g.n, &opposite));
        if let Some(g) = hs.get(pos) {
            if same_direction(&g.n, &opposite, &N::zero()) {
                // λ = -(g.n·h.n)/(h.n·h.n)
                let lam_num = -g.n.dot(&h.n);
                let lam_den = h.n.dot(&h.n);
                if h.c.clone() * lam_num.clone() < -g.c.clone() * lam_den {
                    return (HalfspaceIntersection::Empty, Vec::new());
                }
            }
        }
    }
    let zero = N::zero();
    let inter = |i1: usize, i2: usize| line_intersection(&hs[i1], &hs[i2]);

    let mut dq: VecDeque<usize> = VecDeque::new();
    for (i, h) in hs.iter().enumerate() {
        while dq.len() >= 2 {
            let l1 = dq[dq.len() - 2];
            let l2 = dq[dq.len() - 1];
            if let Some(p) = inter(l1, l2) {
                if h.satisfies_eps(&p, &zero) {
                    break;
                }
            }
            dq.pop_back();
        }
        while dq.len() >= 2 {
            let f1 = dq[0];
            let f2 = dq[1];
            if let Some(p) = inter(f1, f2) {
                if h.satisfies_eps(&p, &zero) {
                    break;
                }
            }
            dq.pop_front();
        }
        dq.push_back(i);
    }
    while dq.len() >= 3 {
        let l1 = dq[dq.len() - 2];
        let l2 = dq[dq.len() - 1];
        if let Some(p) = inter(l1, l2) {
            if hs[dq[0]].satisfies_eps(&p, &zero) {
                break;
            }
        }
        dq.pop_back();
    }
    while dq.len() >= 3 {
        let f1 = dq[0];
        let f2 = dq[1];
        if let Some(p) = inter(f1, f2) {
            if hs[dq[dq.len() - 1]].satisfies_eps(&p, &zero) {
                break;
            }
        }
        dq.pop_front();
    }
    if dq.is_empty() {
        return (HalfspaceIntersection::Empty, Vec::new());
    }
    let keep: Vec<usize> = dq.iter().copied().collect();
    if dq.len() < 3 {
        return (HalfspaceIntersection::Unbounded, keep);
    }
    let m = dq.len();
    let mut verts = Vec::with_capacity(m);
    for k in 0..m {
        let (i1, i2) = (dq[k], dq[(k + 1) % m]);
        if !cross(&hs[i1].n, &hs[i2].n).gt_zero() {
            return (HalfspaceIntersection::Unbounded, keep);
        }
        match inter(i1, i2) {
            Some(p) => verts.push(p),
            None => return (HalfspaceIntersection::Unbounded, keep),
        }
    }
    // A bounded candidate must satisfy every input constraint.
    if verts
        .iter()
        .any(|p| hs.iter().any(|h| !h.satisfies_eps(p, &N::default_tolerance())))
    {
        return (HalfspaceIntersection::Empty, Vec::new());
    }
    (HalfspaceIntersection::Bounded(verts), keep)
}

#[inline]
pub(crate) fn push_or_coalesce<N: Real>(out: &mut Vec<HalfSpace2<N>>, h: HalfSpace2<N>, tol: &N) {
    if let Some(last) = out.last_mut() {
        if same_direction(&last.n, &h.n, tol) {
            if h.tighter_than(last) {
                *last = h;
            }
            return;
        }
    }
    out.push(h);
}
