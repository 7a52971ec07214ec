//! 2D polygon representations backing the overapproximation engine.
//!
//! Purpose
//! - `HPolygon`: angle-sorted, coalesced half-spaces with O(log m) support
//!   vectors; the output type of `approx::overapproximate`.
//! - `VPolygon`: counter-clockwise vertex list, convertible to `HPolygon`.
//! - Keep the API minimal and numerically explicit (eps-aware, generic scalar).
//!
//! Code cross-refs: `HPolygon`, `HalfSpace2`, `ApproxCfg`, `direction::cmp_angle`

pub mod ordered;
mod types;
mod util;

pub use ordered::{HPolygon, HalfspaceIntersection, BINARY_SEARCH_THRESHOLD};
pub use types::{inverse2, line_intersection, ApproxCfg, HalfSpace2};
pub use util::{convex_hull, VPolygon};
