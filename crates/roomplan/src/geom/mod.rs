//! Axis-aligned geometry for room objects.
//!
//! Purpose
//! - Turn integer bounding boxes into `f64` regions and answer the pairwise
//!   questions the constraint engine asks: overlap area, nearest-edge distance,
//!   corridor blocking and clearance sufficiency.
//!
//! Assumptions and conventions
//! - Every footprint is an axis-aligned rectangle. A quarter turn swaps width
//!   and height about the centre; there are no oblique rotations.
//! - Distances are nearest-edge, never centre-to-centre, so large objects are
//!   not penalized for their size.
//! - `is_blocking` is a corridor-width heuristic, not path planning. A pair
//!   counts as blocking when it overlaps or when no separating axis leaves a
//!   gap of at least the path width.
//! - Edge-touching regions have zero overlap and zero distance.

mod pair;
mod region;

pub use pair::{clearance, clearance_check, collide, ClearanceResult, CollisionResult};
pub use region::{
    edge_distance, facing_gap, gaps, is_blocking, overlap_area, to_region, union_area,
    DegenerateBox, Region, EPS,
};

#[cfg(test)]
mod tests;
