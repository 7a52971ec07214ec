//! Lazy convex sets queried through support functions.
//!
//! Sets are never materialized: leaf shapes and composite operators only
//! answer σ(d) (a support vector) and ρ(d) (the support function), and every
//! other query is derived from those. On top of the protocol sits a 2D engine
//! that turns any bounded set into a certified ε-close polygon.
//!
//! Layout
//! - `num`: scalar trait (`f32`, `f64`, exact `BigRational`).
//! - `direction`: trigonometry-free polar-angle ordering in 2D.
//! - `lazy_set`: the `ConvexSet` trait and derived queries.
//! - `sets`, `ops`: leaf sets and composition rules over shared operands.
//! - `geom2`: ordered H-/V-polygons; `approx`: the overapproximation driver.
//! - `api`: curated re-exports.

pub mod api;
pub mod approx;
pub mod direction;
pub mod error;
pub mod geom2;
pub mod lazy_set;
pub mod num;
pub mod ops;
pub mod sets;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{SetError, SetResult};
pub use lazy_set::{ConvexSet, IntoShared, SetRef};
pub use nalgebra::{DMatrix, DVector, Vector2 as Vec2};
pub use num::Real;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::api::*;
    pub use crate::num::Real;
    pub use nalgebra::{dmatrix, dvector, vector, DMatrix, DVector, Vector2 as Vec2};
}
