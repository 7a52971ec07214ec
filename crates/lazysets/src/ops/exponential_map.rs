//! Exponential maps: σ(d, e^M·X) = e^M · σ((e^M)ᵀ d, X).
//!
//! `exp(M)` is never formed; the `ExpAction` backend only evaluates the action
//! `v ↦ exp(M)·v`. The default backend (`TaylorExpAction`) splits the action
//! into `s` steps of `exp(M/s)` with `s ≈ ‖M‖₁` and sums each step's Taylor
//! series of matrix-vector products until the next term is negligible.

use std::fmt;
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use crate::error::{check_dim, SetError, SetResult};
use crate::lazy_set::{ConvexSet, SetRef};
use crate::num::Real;

/// Backend computing `exp(M)·v`.
pub trait ExpAction<N: Real>: fmt::Debug + Send + Sync {
    fn exp_action(&self, m: &DMatrix<N>, v: &DVector<N>) -> SetResult<DVector<N>>;
}

/// Scaled truncated-Taylor backend.
#[derive(Clone, Copy, Debug)]
pub struct TaylorExpAction {
    /// Relative size of the last accepted term.
    pub tol: f64,
    /// Series terms per scaling step before giving up.
    pub max_terms: usize,
    /// Largest number of scaling steps, i.e. the largest accepted 1-norm.
    pub max_steps: usize,
}

impl Default for TaylorExpAction {
    fn default() -> Self {
        Self {
            tol: 1e-15,
            max_terms: 60,
            max_steps: 1 << 16,
        }
    }
}

fn amax_lossy<N: Real>(v: &DVector<N>) -> f64 {
    v.iter().map(|x| x.to_f64_lossy().abs()).fold(0.0, f64::max)
}

/// Induced 1-norm (max column sum), lossy.
fn norm1_lossy<N: Real>(m: &DMatrix<N>) -> f64 {
    m.column_iter()
        .map(|c| c.iter().map(|x| x.to_f64_lossy().abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

impl<N: Real> ExpAction<N> for TaylorExpAction {
    fn exp_action(&self, m: &DMatrix<N>, v: &DVector<N>) -> SetResult<DVector<N>> {
        check_dim(m.ncols(), v.len())?;
        let norm1 = norm1_lossy(m);
        if !norm1.is_finite() || norm1 > self.max_steps as f64 {
            return Err(SetError::UnsupportedOperation(format!(
                "matrix 1-norm {norm1} needs more than {} scaling steps",
                self.max_steps
            )));
        }
        let steps = (norm1.ceil() as usize).max(1);
        let scale = N::from_usize(steps).ok_or_else(|| {
            SetError::UnsupportedOperation("matrix norm not representable".into())
        })?;
        let a = m / scale;
        let mut w = v.clone();
        for _ in 0..steps {
            let mut term = w.clone();
            let mut acc = w.clone();
            let mut converged = false;
            for k in 1..=self.max_terms {
                let kk = N::from_usize(k).unwrap_or_else(N::one);
                term = (&a * term) / kk;
                acc += &term;
                if amax_lossy(&term) <= self.tol * amax_lossy(&acc) {
                    converged = true;
                    break;
                }
            }
            if !converged {
                return Err(SetError::PrecisionNotAchieved {
                    achieved: amax_lossy(&term),
                    iterations: self.max_terms,
                });
            }
            w = acc;
        }
        Ok(w)
    }
}

/// `exp(M)·X` for a square `M`.
#[derive(Clone, Debug)]
pub struct ExponentialMap<N: Real> {
    pub m: DMatrix<N>,
    mt: DMatrix<N>,
    pub x: SetRef<N>,
    backend: Arc<dyn ExpAction<N>>,
}

impl<N: Real> ExponentialMap<N> {
    /// Uses the default Taylor backend.
    pub fn new(m: DMatrix<N>, x: SetRef<N>) -> SetResult<Self> {
        Self::with_backend(m, x, Arc::new(TaylorExpAction::default()))
    }

    pub fn with_backend(
        m: DMatrix<N>,
        x: SetRef<N>,
        backend: Arc<dyn ExpAction<N>>,
    ) -> SetResult<Self> {
        check_dim(m.nrows(), m.ncols())?;
        check_dim(x.dim(), m.ncols())?;
        let mt = m.transpose();
        Ok(Self { m, mt, x, backend })
    }
}

impl<N: Real> ConvexSet<N> for ExponentialMap<N> {
    fn dim(&self) -> usize {
        self.m.nrows()
    }

    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let dx = self.backend.exp_action(&self.mt, d)?;
        self.backend.exp_action(&self.m, &self.x.sigma(&dx)?)
    }

    fn rho(&self, d: &DVector<N>) -> SetResult<N> {
        self.x.rho(&self.backend.exp_action(&self.mt, d)?)
    }
}
