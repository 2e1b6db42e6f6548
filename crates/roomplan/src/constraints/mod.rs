//! Constraint engine: hard rules that make a layout infeasible and soft
//! preferences that grade a feasible one.
//!
//! Purpose
//! - `evaluate` turns `(layout, room, lock set, rules)` into an `Evaluation`:
//!   every hard violation, one satisfaction value per soft rule, and a
//!   suggestion for each soft rule that scores below one half.
//!
//! Assumptions
//! - Rules come from an immutable `ConstraintSet`; omitting a rule from the
//!   set disables it.
//! - A rule whose objects are absent passes (no door means no door corridor,
//!   no desk means `desk_near_window = 1`).
//! - Doors and windows are wall openings. They never take part in
//!   `no_overlap` or `walking_path`; a door's own footprint is covered by
//!   `door_clearance` instead.

mod hard;
mod soft;
mod types;

pub(crate) use hard::door_zone;
pub use soft::proximity;
pub use types::{
    ConstraintSet, Evaluation, HardConstraint, HardRule, SoftConstraint, SoftRule, SoftScore,
    Violation, DOOR_CLEARANCE, WALKING_PATH_WIDTH,
};

use crate::error::LayoutError;
use crate::geom::Region;
use crate::model::{Layout, LockSet, RoomDimensions, RoomObject};

/// Below this satisfaction a soft rule produces a suggestion.
pub const SUGGESTION_THRESHOLD: f64 = 0.5;

/// Regions computed once per evaluation, index-aligned with the objects.
pub(crate) struct Scene<'a> {
    objects: &'a [RoomObject],
    regions: Vec<Region>,
    room: Region,
}

impl<'a> Scene<'a> {
    fn new(layout: &'a Layout, dims: &RoomDimensions) -> Result<Self, LayoutError> {
        let regions = layout
            .iter()
            .map(|o| o.region())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            objects: layout.objects(),
            regions,
            room: dims.bounds(),
        })
    }

    fn indices_of<'s>(&'s self, label: &'s str) -> impl Iterator<Item = usize> + 's {
        self.objects
            .iter()
            .enumerate()
            .filter(move |(_, o)| o.is(label))
            .map(|(i, _)| i)
    }
}

pub fn evaluate(
    layout: &Layout,
    dims: &RoomDimensions,
    locks: &LockSet,
    constraints: &ConstraintSet,
) -> Result<Evaluation, LayoutError> {
    let scene = Scene::new(layout, dims)?;

    let violations = constraints
        .hard
        .iter()
        .flat_map(|c| hard::check(&scene, locks, c))
        .collect();

    let mut soft_scores = Vec::with_capacity(constraints.soft.len());
    let mut suggestions = Vec::new();
    for c in &constraints.soft {
        let satisfaction = soft::satisfaction(&scene, c);
        if satisfaction < SUGGESTION_THRESHOLD {
            suggestions.push(c.name.suggestion().to_string());
        }
        soft_scores.push(SoftScore {
            name: c.name,
            weight: c.weight,
            satisfaction,
        });
    }

    Ok(Evaluation {
        violations,
        soft: soft_scores,
        suggestions,
    })
}
