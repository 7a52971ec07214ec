//! Leaf sets with closed-form support vectors.
//!
//! Every leaf owns its numeric parameters and derives structural equality, so
//! two sets compare equal only when they are the same concrete type with equal
//! fields.

mod balls;
mod constraints;
mod hyperrectangle;
mod zonotope;

pub use balls::{Ball1, Ball2, BallInf};
pub use constraints::{HalfSpace, Hyperplane};
pub use hyperrectangle::{Hyperrectangle, Singleton};
pub use zonotope::{VPolytope, Zonotope};
