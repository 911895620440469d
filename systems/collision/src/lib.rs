#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system answering whether two centred bounding boxes overlap.

use space_shooter_core::{Aabb, Bounded};

/// Stateless overlap test used for every pairwise interaction on the play field.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollisionSystem;

impl CollisionSystem {
    /// Creates a new collision system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns `true` when the bounds of `a` and `b` overlap on both axes.
    ///
    /// Boxes that merely touch along an edge do not collide.
    #[must_use]
    pub fn check_collision<A, B>(&self, a: &A, b: &B) -> bool
    where
        A: Bounded + ?Sized,
        B: Bounded + ?Sized,
    {
        overlaps(a.bounds(), b.bounds())
    }
}

fn overlaps(a: Aabb, b: Aabb) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}
