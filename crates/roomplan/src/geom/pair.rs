//! Pairwise results between two room objects.

use serde::{Deserialize, Serialize};

use super::region::{edge_distance, is_blocking, overlap_area, Region};
use crate::error::LayoutError;
use crate::model::RoomObject;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollisionResult {
    pub object_a_id: String,
    pub object_b_id: String,
    pub overlap_area: f64,
    pub is_blocking: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClearanceResult {
    pub from_id: String,
    pub to_id: String,
    pub distance: f64,
    pub required_clearance: f64,
    pub is_sufficient: bool,
}

/// Wrap `edge_distance` against a threshold.
pub fn clearance_check(
    from_id: &str,
    a: &Region,
    to_id: &str,
    b: &Region,
    required: f64,
) -> ClearanceResult {
    let distance = edge_distance(a, b);
    ClearanceResult {
        from_id: from_id.to_string(),
        to_id: to_id.to_string(),
        distance,
        required_clearance: required,
        is_sufficient: distance >= required,
    }
}

pub fn collide(
    a: &RoomObject,
    b: &RoomObject,
    path_width: f64,
) -> Result<CollisionResult, LayoutError> {
    let (ra, rb) = (a.region()?, b.region()?);
    Ok(CollisionResult {
        object_a_id: a.id.clone(),
        object_b_id: b.id.clone(),
        overlap_area: overlap_area(&ra, &rb),
        is_blocking: is_blocking(&ra, &rb, path_width),
    })
}

pub fn clearance(
    a: &RoomObject,
    b: &RoomObject,
    required: f64,
) -> Result<ClearanceResult, LayoutError> {
    Ok(clearance_check(&a.id, &a.region()?, &b.id, &b.region()?, required))
}
