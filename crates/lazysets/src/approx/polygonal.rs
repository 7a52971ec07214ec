//! The overapproximation driver.
//!
//! Pending pieces live on a LIFO stack whose top is always the next piece in
//! counter-clockwise order, so accepted pieces arrive sorted by the angle of
//! their first direction and the output needs no sort.
//!
//! Redundancy
//! - An accepted constraint whose normal is a near-duplicate of the previous one
//!   (sine below `redundancy_tol`) is merged, keeping the tighter offset.
//! - After the stack drains, constraints whose edge has zero length are dropped
//!   as long as the remaining normals still turn by less than π between
//!   neighbours, so flat sets keep a bounded (degenerate) polygon.

use nalgebra::{DVector, Vector2};

use super::local::LocalApproximation;
use crate::direction::{cross, same_direction};
use crate::error::{check_dim, SetError, SetResult};
use crate::geom2::{line_intersection, ApproxCfg, HPolygon, HalfSpace2};
use crate::lazy_set::SetRef;
use crate::num::{approx_eq2, to_vector2, unit_vector, Real};

/// Progressive polygonal overapproximation of a 2D convex set.
#[derive(Debug)]
pub struct PolygonalOverapproximation<N: Real> {
    set: SetRef<N>,
    cfg: ApproxCfg<N>,
    pending: Vec<LocalApproximation<N>>,
    constraints: Vec<HalfSpace2<N>>,
    /// `vertices[k]` closes the edge of `constraints[k]` (counter-clockwise end).
    vertices: Vec<Vector2<N>>,
    accepted_error: N,
    iterations: usize,
}

impl<N: Real> PolygonalOverapproximation<N> {
    /// Start from the four axis-aligned support points (an initial box).
    ///
    /// Fails with `UnboundedDirection` if `set` is unbounded along an axis.
    pub fn new(set: SetRef<N>, cfg: ApproxCfg<N>) -> SetResult<Self> {
        check_dim(2, set.dim())?;
        let dirs: Vec<DVector<N>> = vec![
            unit_vector(0, 2),
            unit_vector(1, 2),
            -unit_vector::<N>(0, 2),
            -unit_vector::<N>(1, 2),
        ];
        let mut pts = Vec::with_capacity(4);
        for d in &dirs {
            pts.push(to_vector2(&set.sigma(d)?));
        }
        let dirs: Vec<Vector2<N>> = dirs.iter().map(to_vector2).collect();
        // Reverse push: the piece starting at e1 ends up on top.
        let mut pending = Vec::with_capacity(64);
        for k in (0..4).rev() {
            let next = (k + 1) % 4;
            pending.push(LocalApproximation::new(
                pts[k].clone(),
                dirs[k].clone(),
                pts[next].clone(),
                dirs[next].clone(),
                &cfg,
            ));
        }
        tracing::debug!(pieces = pending.len(), "initial box");
        Ok(Self {
            set,
            cfg,
            pending,
            constraints: Vec::new(),
            vertices: Vec::new(),
            accepted_error: N::zero(),
            iterations: 0,
        })
    }

    /// Refine until every pending piece is within `eps` or degenerate, then
    /// finalize.
    ///
    /// Requires `eps > 0` (`InvalidTolerance` otherwise). When a guard of
    /// `ApproxCfg` fires the remaining pieces stay pending and
    /// `PrecisionNotAchieved` is returned; `finalize` still yields a valid
    /// overapproximation afterwards.
    pub fn refine_until(&mut self, eps: &N) -> SetResult<()> {
        if !eps.gt_zero() {
            return Err(SetError::InvalidTolerance);
        }
        tracing::debug!(eps = eps.to_f64_lossy(), pending = self.pending.len(), "refine");
        while let Some(a) = self.pending.pop() {
            if a.err <= *eps || !a.refinable {
                self.accept(a);
                continue;
            }
            if self.iterations >= self.cfg.max_iterations || a.depth >= self.cfg.max_depth {
                self.pending.push(a);
                let achieved = self.max_error().to_f64_lossy();
                tracing::warn!(
                    iterations = self.iterations,
                    achieved,
                    "refinement guard reached before tolerance"
                );
                return Err(SetError::PrecisionNotAchieved {
                    achieved,
                    iterations: self.iterations,
                });
            }
            let (right, left) = match a.refine(self.set.as_ref(), &self.cfg) {
                Ok(pair) => pair,
                Err(e) => {
                    self.pending.push(a);
                    return Err(e);
                }
            };
            self.iterations += 1;
            tracing::trace!(
                depth = a.depth,
                err = a.err.to_f64_lossy(),
                right = right.err.to_f64_lossy(),
                left = left.err.to_f64_lossy(),
                "split"
            );
            self.pending.push(left);
            self.pending.push(right);
        }
        self.finalize();
        tracing::debug!(
            constraints = self.constraints.len(),
            iterations = self.iterations,
            max_error = self.accepted_error.to_f64_lossy(),
            "done"
        );
        Ok(())
    }

    /// Accept every pending piece as is and close the polygon.
    pub fn finalize(&mut self) {
        while let Some(a) = self.pending.pop() {
            self.accept(a);
        }
        self.close_wraparound();
        self.prune_zero_length_edges();
    }

    fn accept(&mut self, a: LocalApproximation<N>) {
        if a.err > self.accepted_error {
            self.accepted_error = a.err.clone();
        }
        let h = a.constraint();
        let tail = (self.constraints.last_mut(), self.vertices.last_mut());
        if let (Some(last_h), Some(last_q)) = tail {
            if same_direction(&last_h.n, &h.n, &self.cfg.redundancy_tol) {
                if h.tighter_than(last_h) {
                    *last_h = h;
                }
                *last_q = a.q;
                return;
            }
        }
        self.constraints.push(h);
        self.vertices.push(a.q);
    }

    /// Merge a last constraint that duplicates the first one across angle 0.
    fn close_wraparound(&mut self) {
        let m = self.constraints.len();
        if m < 2 {
            return;
        }
        let (first, last) = (&self.constraints[0], &self.constraints[m - 1]);
        if !same_direction(&last.n, &first.n, &self.cfg.redundancy_tol) {
            return;
        }
        self.constraints.pop();
        self.vertices.pop();
        if let Some(q) = line_intersection(&self.constraints[m - 2], &self.constraints[0]) {
            self.vertices[m - 2] = q;
        }
    }

    fn prune_zero_length_edges(&mut self) {
        let mut k = 0usize;
        while self.constraints.len() > 3 && k < self.constraints.len() {
            let m = self.constraints.len();
            let prev = (k + m - 1) % m;
            let next = (k + 1) % m;
            // constraint k spans vertices[prev] → vertices[k]
            if !approx_eq2(&self.vertices[prev], &self.vertices[k], &self.cfg.tol) || !self.bounded_without(k) {
                k += 1;
                continue;
            }
            let q = line_intersection(&self.constraints[prev], &self.constraints[next]);
            self.constraints.remove(k);
            self.vertices.remove(k);
            let prev = if k == 0 { m - 2 } else { k - 1 };
            if let Some(q) = q {
                self.vertices[prev] = q;
            }
            // The edge of the old `next` now starts at the updated vertex.
            k = k.saturating_sub(1);
        }
    }

    /// Whether every cyclically consecutive pair of normals, with
    /// constraint `skip` removed, turns by less than π.
    fn bounded_without(&self, skip: usize) -> bool {
        let kept: Vec<&HalfSpace2<N>> = self
            .constraints
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, h)| h)
            .collect();
        let m = kept.len();
        m >= 3 && (0..m).all(|i| cross(&kept[i].n, &kept[(i + 1) % m].n).gt_zero())
    }

    /// Accepted constraints, sorted by the polar angle of their normals.
    #[inline]
    pub fn constraints(&self) -> &[HalfSpace2<N>] {
        &self.constraints
    }

    /// Vertices of the accepted boundary (valid after `finalize`).
    #[inline]
    pub fn vertices(&self) -> &[Vector2<N>] {
        &self.vertices
    }

    #[inline]
    pub fn pending(&self) -> &[LocalApproximation<N>] {
        &self.pending
    }

    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    #[inline]
    pub fn set(&self) -> &SetRef<N> {
        &self.set
    }

    /// Largest certified error over accepted and pending pieces.
    pub fn max_error(&self) -> N {
        self.pending
            .iter()
            .fold(self.accepted_error.clone(), |m, a| N::max_of(m, a.err.clone()))
    }

    /// The accepted constraints as an ordered polygon.
    pub fn to_hpolygon(&self) -> HPolygon<N> {
        HPolygon::from_sorted_unchecked(self.constraints.clone())
    }
}

/// Certified ε-close polygonal overapproximation of a 2D convex set.
pub fn approximate<N: Real>(set: SetRef<N>, eps: &N) -> SetResult<PolygonalOverapproximation<N>> {
    approximate_with(set, eps, ApproxCfg::default())
}

/// As `approximate`, with explicit tolerances and guards.
pub fn approximate_with<N: Real>(
    set: SetRef<N>,
    eps: &N,
    cfg: ApproxCfg<N>,
) -> SetResult<PolygonalOverapproximation<N>> {
    if !eps.gt_zero() {
        return Err(SetError::InvalidTolerance);
    }
    let mut p = PolygonalOverapproximation::new(set, cfg)?;
    p.refine_until(eps)?;
    Ok(p)
}

/// The overapproximation of `approximate` in constraint representation.
pub fn overapproximate<N: Real>(set: SetRef<N>, eps: &N) -> SetResult<HPolygon<N>> {
    overapproximate_with(set, eps, ApproxCfg::default())
}

/// As `overapproximate`, with explicit tolerances and guards.
pub fn overapproximate_with<N: Real>(set: SetRef<N>, eps: &N, cfg: ApproxCfg<N>) -> SetResult<HPolygon<N>> {
    Ok(approximate_with(set, eps, cfg)?.to_hpolygon())
}
