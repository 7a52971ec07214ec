//! Curated API surface.
//!
//! Important
//! - One import path for callers (the CLI, benches, demos): sets, operators,
//!   2D polygons, and the approximation entry points.
//! - Breaking changes follow the library; nothing here adds behaviour.

// Support-query protocol
pub use crate::lazy_set::{
    box_approximation, diameter, dim, norm, radius, support_function, support_vector, ConvexSet,
    IntoShared, SetRef,
};
// Leaf sets
pub use crate::sets::{
    Ball1, Ball2, BallInf, HalfSpace, Hyperplane, Hyperrectangle, Singleton, VPolytope, Zonotope,
};
// Composite operations
pub use crate::ops::{
    CachedMinkowskiSumArray, CartesianProduct, CartesianProductArray, ConvexHull, ConvexHullArray,
    ExponentialMap, Intersection, LinearMap, MinkowskiSum, MinkowskiSumArray,
};
// 2D polygons and approximation
pub use crate::approx::{
    approximate, approximate_with, overapproximate, overapproximate_with, PolygonalOverapproximation,
};
pub use crate::geom2::{ApproxCfg, HPolygon, HalfSpace2, VPolygon};
pub use crate::error::{SetError, SetResult};
