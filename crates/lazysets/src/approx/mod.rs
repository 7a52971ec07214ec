//! Certified polygonal overapproximation of 2D convex sets.
//!
//! Purpose
//! - Given any 2D `ConvexSet` and `ε > 0`, produce an angle-sorted list of
//!   supporting half-spaces whose intersection contains the set and is within
//!   Hausdorff distance `ε` of it, using σ queries only.
//!
//! Algorithm
//! - Start from the four axis support points (one local approximation per
//!   quadrant), then repeatedly split the top pending piece at the support
//!   point of its chord normal until its certified error is below `ε` or it is
//!   degenerate (corner or flat edge), see `LocalApproximation`.
//! - Accepted pieces contribute their first support line; the result is sorted
//!   by construction.
//!
//! Guards
//! - `ApproxCfg::max_iterations` and `ApproxCfg::max_depth` bound the work;
//!   exceeding either reports `PrecisionNotAchieved` with the best certified
//!   bound instead of truncating silently.

mod local;
mod polygonal;

pub use local::{distance_to_segment, LocalApproximation};
pub use polygonal::{
    approximate, approximate_with, overapproximate, overapproximate_with, PolygonalOverapproximation,
};

#[cfg(test)]
mod tests;
