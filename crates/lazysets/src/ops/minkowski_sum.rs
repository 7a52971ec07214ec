//! Minkowski sums: binary, n-ary, and n-ary with a per-direction cache.
//!
//! σ(d, X ⊕ Y) = σ(d, X) + σ(d, Y).

use std::sync::Mutex;

use nalgebra::DVector;

use crate::error::{check_dim, SetError, SetResult};
use crate::lazy_set::{ConvexSet, SetRef};
use crate::num::Real;

/// `X ⊕ Y`.
#[derive(Clone, Debug)]
pub struct MinkowskiSum<N: Real> {
    pub x: SetRef<N>,
    pub y: SetRef<N>,
}

impl<N: Real> MinkowskiSum<N> {
    pub fn new(x: SetRef<N>, y: SetRef<N>) -> SetResult<Self> {
        check_dim(x.dim(), y.dim())?;
        Ok(Self { x, y })
    }
}

impl<N: Real> ConvexSet<N> for MinkowskiSum<N> {
    fn dim(&self) -> usize {
        self.x.dim()
    }
    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        Ok(self.x.sigma(d)? + self.y.sigma(d)?)
    }
    fn rho(&self, d: &DVector<N>) -> SetResult<N> {
        Ok(self.x.rho(d)? + self.y.rho(d)?)
    }
}

/// `X₁ ⊕ … ⊕ X_k`; the empty sum is not allowed (no dimension).
#[derive(Clone, Debug)]
pub struct MinkowskiSumArray<N: Real> {
    pub sets: Vec<SetRef<N>>,
}

fn check_operands<N: Real>(sets: &[SetRef<N>]) -> SetResult<usize> {
    let first = sets.first().ok_or_else(|| {
        SetError::UnsupportedOperation("operator over an empty operand list".into())
    })?;
    for s in &sets[1..] {
        check_dim(first.dim(), s.dim())?;
    }
    Ok(first.dim())
}

impl<N: Real> MinkowskiSumArray<N> {
    pub fn new(sets: Vec<SetRef<N>>) -> SetResult<Self> {
        check_operands(&sets)?;
        Ok(Self { sets })
    }
}

impl<N: Real> ConvexSet<N> for MinkowskiSumArray<N> {
    fn dim(&self) -> usize {
        self.sets[0].dim()
    }
    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let mut acc = DVector::zeros(d.len());
        for s in &self.sets {
            acc += s.sigma(d)?;
        }
        Ok(acc)
    }
    fn rho(&self, d: &DVector<N>) -> SetResult<N> {
        let mut acc = N::zero();
        for s in &self.sets {
            acc += s.rho(d)?;
        }
        Ok(acc)
    }
}

/// Cache entry: partial sum of σ over the first `upto` operands.
#[derive(Clone, Debug)]
struct CacheEntry<N: Real> {
    direction: DVector<N>,
    upto: usize,
    partial: DVector<N>,
}

/// Per-direction memo of partial support sums.
///
/// Entries are keyed by the exact direction and only ever extended: appending
/// operands leaves entries valid for the prefix they cover, and the next query
/// in that direction adds the missing operands.
#[derive(Debug)]
pub struct SupportCache<N: Real> {
    entries: Vec<CacheEntry<N>>,
}

impl<N: Real> SupportCache<N> {
    /// Number of cached directions.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup_mut(&mut self, d: &DVector<N>) -> Option<&mut CacheEntry<N>> {
        self.entries.iter_mut().find(|e| e.direction == *d)
    }
}

/// n-ary Minkowski sum with memoized support vectors.
///
/// Concurrent queries serialize on the cache mutex; operands can only be
/// appended (`push`), never removed.
#[derive(Debug)]
pub struct CachedMinkowskiSumArray<N: Real> {
    sets: Vec<SetRef<N>>,
    cache: Mutex<SupportCache<N>>,
}

impl<N: Real> CachedMinkowskiSumArray<N> {
    pub fn new(sets: Vec<SetRef<N>>) -> SetResult<Self> {
        check_operands(&sets)?;
        Ok(Self {
            sets,
            cache: Mutex::new(SupportCache {
                entries: Vec::new(),
            }),
        })
    }

    /// Append an operand; cached prefixes stay valid.
    pub fn push(&mut self, set: SetRef<N>) -> SetResult<()> {
        check_dim(self.sets[0].dim(), set.dim())?;
        self.sets.push(set);
        Ok(())
    }

    #[inline]
    pub fn array(&self) -> &[SetRef<N>] {
        &self.sets
    }

    /// Number of directions currently memoized.
    pub fn cache_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl<N: Real> ConvexSet<N> for CachedMinkowskiSumArray<N> {
    fn dim(&self) -> usize {
        self.sets[0].dim()
    }

    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| SetError::UnsupportedOperation("support cache poisoned".into()))?;
        let k = self.sets.len();
        if let Some(entry) = cache.lookup_mut(d) {
            // The entry is only updated once every new operand answered.
            let mut partial = entry.partial.clone();
            for s in &self.sets[entry.upto..k] {
                partial += s.sigma(d)?;
            }
            entry.partial = partial.clone();
            entry.upto = k;
            return Ok(partial);
        }
        let mut partial = DVector::zeros(d.len());
        for s in &self.sets {
            partial += s.sigma(d)?;
        }
        cache.entries.push(CacheEntry {
            direction: d.clone(),
            upto: k,
            partial: partial.clone(),
        });
        Ok(partial)
    }
}
