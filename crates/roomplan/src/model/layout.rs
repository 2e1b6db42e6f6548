//! Layout snapshots and the lock set pinned against them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::types::{BBox, Orientation, RoomDimensions, RoomObject};
use crate::error::LayoutError;

/// One full-room snapshot, ordered and unique by id.
///
/// Layouts are values: edits go through `with_pose`, which returns a new
/// layout and leaves the receiver untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    objects: Vec<RoomObject>,
}

impl Layout {
    pub fn new(objects: Vec<RoomObject>) -> Result<Self, LayoutError> {
        check_unique(&objects)?;
        Ok(Self { objects })
    }

    #[inline]
    pub fn objects(&self) -> &[RoomObject] {
        &self.objects
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, RoomObject> {
        self.objects.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&RoomObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Copy of this layout with one object's bbox and orientation replaced.
    /// Unknown ids yield an unchanged copy.
    pub fn with_pose(&self, id: &str, bbox: BBox, orientation: Orientation) -> Layout {
        let mut next = self.clone();
        if let Some(obj) = next.objects.iter_mut().find(|o| o.id == id) {
            obj.bbox = bbox;
            obj.orientation = orientation;
        }
        next
    }

    /// Reject the layout if any id repeats or any object is degenerate or
    /// outside the room. Fails on the first offending object.
    pub fn validate(&self, dims: &RoomDimensions) -> Result<(), LayoutError> {
        dims.validate()?;
        check_unique(&self.objects)?;
        let room = dims.bounds();
        for obj in &self.objects {
            if obj.id.trim().is_empty() {
                return Err(LayoutError::geometry("<empty>", "object id must not be empty"));
            }
            let region = obj.region()?;
            if obj.bbox.x < 0 || obj.bbox.y < 0 {
                return Err(LayoutError::geometry(&obj.id, "bbox origin must be non-negative"));
            }
            if !room.contains(&region) {
                return Err(LayoutError::geometry(
                    &obj.id,
                    format!(
                        "bbox {:?} extends outside the {} x {} room",
                        <[i32; 4]>::from(obj.bbox),
                        dims.width_estimate,
                        dims.height_estimate
                    ),
                ));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a RoomObject;
    type IntoIter = std::slice::Iter<'a, RoomObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

fn check_unique(objects: &[RoomObject]) -> Result<(), LayoutError> {
    let mut seen = HashSet::with_capacity(objects.len());
    for obj in objects {
        if !seen.insert(obj.id.as_str()) {
            return Err(LayoutError::DuplicateId { id: obj.id.clone() });
        }
    }
    Ok(())
}

/// Reference pose of one pinned object.
#[derive(Clone, Debug, PartialEq)]
pub struct Pin {
    pub id: String,
    pub bbox: BBox,
    pub orientation: Orientation,
}

/// Objects the solver must not touch, with the poses they must keep.
///
/// Built from a reference layout: requested ids, objects flagged
/// `is_locked`, and every structural object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LockSet {
    pins: Vec<Pin>,
}

impl LockSet {
    pub fn capture(reference: &Layout, locked_ids: &[String]) -> Self {
        for id in locked_ids {
            if reference.get(id).is_none() {
                tracing::warn!(id = %id, "locked id does not name an object in the layout");
            }
        }
        let pins = reference
            .iter()
            .filter(|o| o.is_structural() || o.is_locked || locked_ids.contains(&o.id))
            .map(|o| Pin {
                id: o.id.clone(),
                bbox: o.bbox,
                orientation: o.orientation,
            })
            .collect();
        Self { pins }
    }

    #[inline]
    pub fn is_pinned(&self, id: &str) -> bool {
        self.pins.iter().any(|p| p.id == id)
    }

    #[inline]
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.pins.iter().map(|p| p.id.as_str())
    }
}
