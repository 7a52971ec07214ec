//! Composite operations over shared operands.
//!
//! Each node implements σ by a fixed composition rule over its operands' σ,
//! recursing through the operand graph:
//! - Minkowski sum: σ(d) = Σ σ(d, Xᵢ)
//! - Cartesian product: block-wise σ
//! - Convex hull: the operand support with the larger value
//! - Intersection: exact with a half-space or hyperplane operand
//! - Linear map: M σ(Mᵀ d, X)
//! - Exponential map: e^M σ((e^M)ᵀ d, X) through an action-only backend

mod cartesian_product;
mod convex_hull;
mod exponential_map;
mod intersection;
mod linear_map;
mod minkowski_sum;

pub use cartesian_product::{CartesianProduct, CartesianProductArray};
pub use convex_hull::{ConvexHull, ConvexHullArray};
pub use exponential_map::{ExpAction, ExponentialMap, TaylorExpAction};
pub use intersection::Intersection;
pub use linear_map::LinearMap;
pub use minkowski_sum::{CachedMinkowskiSumArray, MinkowskiSum, MinkowskiSumArray, SupportCache};
