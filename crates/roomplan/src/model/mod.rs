//! Room data model: objects, bounding boxes, layouts and lock sets.
//!
//! Field names follow the JSON the vision collaborator produces so that
//! payloads decode straight into these types.

mod layout;
mod types;

pub use layout::{Layout, LockSet, Pin};
pub use types::{BBox, ObjectKind, Orientation, RoomDimensions, RoomObject};
