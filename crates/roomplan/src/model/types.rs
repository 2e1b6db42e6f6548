//! Room objects, bounding boxes and room extents.
//!
//! - `BBox`: integer `[x, y, w, h]` in room units; x grows east, y grows south.
//! - `Orientation`: quarter turns, 0 = north, 90 = east, 180 = south, 270 = west.
//! - `RoomObject`: one detected object, serialized in the vision wire shape.
//! - `RoomDimensions`: room extents shared by every measurement in a session.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::geom::{to_region, Region};

/// Axis-aligned bounding box, serialized as `[x, y, w, h]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct BBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl BBox {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Far x edge, widened so boxes near the `i32` limit never overflow.
    #[inline]
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.w)
    }

    #[inline]
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.h)
    }

    #[inline]
    pub fn center(&self) -> Vector2<f64> {
        Vector2::new(
            f64::from(self.x) + f64::from(self.w) / 2.0,
            f64::from(self.y) + f64::from(self.h) / 2.0,
        )
    }

    /// `None` when the shifted origin leaves the `i32` range.
    #[inline]
    pub fn translated(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(dx)?,
            self.y.checked_add(dy)?,
            self.w,
            self.h,
        ))
    }

    /// Quarter turn about the centre: width and height swap, the centre stays
    /// put up to integer rounding (floor). `None` when the turned origin
    /// leaves the `i32` range.
    pub fn rotated_quarter(&self) -> Option<Self> {
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        let (w, h) = (i64::from(self.w), i64::from(self.h));
        let nx = i32::try_from((2 * x + w - h).div_euclid(2)).ok()?;
        let ny = i32::try_from((2 * y + h - w).div_euclid(2)).ok()?;
        Some(Self::new(nx, ny, self.h, self.w))
    }
}

impl From<[i32; 4]> for BBox {
    fn from(v: [i32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [i32; 4] {
    fn from(b: BBox) -> Self {
        [b.x, b.y, b.w, b.h]
    }
}

/// Facing direction in quarter turns. Serialized as degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Orientation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [Self::North, Self::East, Self::South, Self::West];

    #[inline]
    pub fn degrees(self) -> u16 {
        match self {
            Self::North => 0,
            Self::East => 90,
            Self::South => 180,
            Self::West => 270,
        }
    }

    /// Clockwise quarter turn.
    #[inline]
    pub fn turned(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Unit step in room coordinates (y grows south).
    #[inline]
    pub fn step(self) -> Vector2<f64> {
        match self {
            Self::North => Vector2::new(0.0, -1.0),
            Self::East => Vector2::new(1.0, 0.0),
            Self::South => Vector2::new(0.0, 1.0),
            Self::West => Vector2::new(-1.0, 0.0),
        }
    }

    pub fn compass(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }

    /// Snap an arbitrary angle to the nearest quarter turn.
    pub fn nearest(degrees: i64) -> Self {
        let quarter = ((degrees.rem_euclid(360) + 45) / 90) % 4;
        Self::ALL[quarter as usize]
    }
}

impl TryFrom<u16> for Orientation {
    type Error = String;

    fn try_from(deg: u16) -> Result<Self, Self::Error> {
        match deg {
            0 => Ok(Self::North),
            90 => Ok(Self::East),
            180 => Ok(Self::South),
            270 => Ok(Self::West),
            other => Err(format!("orientation must be 0, 90, 180 or 270 (got {other})")),
        }
    }
}

impl From<Orientation> for u16 {
    fn from(o: Orientation) -> Self {
        o.degrees()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    #[default]
    Movable,
    Structural,
}

fn is_false(v: &bool) -> bool {
    !v
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomObject {
    pub id: String,
    pub label: String,
    pub bbox: BBox,
    #[serde(rename = "type", default)]
    pub kind: ObjectKind,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_locked: bool,
}

impl RoomObject {
    pub fn movable(id: impl Into<String>, label: impl Into<String>, bbox: BBox) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            bbox,
            kind: ObjectKind::Movable,
            orientation: Orientation::North,
            is_locked: false,
        }
    }

    pub fn structural(id: impl Into<String>, label: impl Into<String>, bbox: BBox) -> Self {
        Self {
            kind: ObjectKind::Structural,
            ..Self::movable(id, label, bbox)
        }
    }

    pub fn facing(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn locked(mut self) -> Self {
        self.is_locked = true;
        self
    }

    #[inline]
    pub fn is_structural(&self) -> bool {
        self.kind == ObjectKind::Structural
    }

    #[inline]
    pub fn is(&self, label: &str) -> bool {
        self.label == label
    }

    /// Doors and windows are openings in a wall, not floor obstacles.
    #[inline]
    pub fn is_aperture(&self) -> bool {
        self.is("door") || self.is("window")
    }

    pub fn region(&self) -> Result<Region, LayoutError> {
        to_region(&self.bbox).map_err(|err| LayoutError::geometry(&self.id, err.to_string()))
    }
}

/// Room extents in bbox units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomDimensions {
    pub width_estimate: f64,
    pub height_estimate: f64,
}

impl RoomDimensions {
    pub fn new(width_estimate: f64, height_estimate: f64) -> Self {
        Self {
            width_estimate,
            height_estimate,
        }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width_estimate) && ok(self.height_estimate) {
            Ok(())
        } else {
            Err(LayoutError::InvalidDimensions {
                width: self.width_estimate,
                height: self.height_estimate,
            })
        }
    }

    /// The room floor as a region anchored at the origin.
    #[inline]
    pub fn bounds(&self) -> Region {
        Region::new(
            Vector2::zeros(),
            Vector2::new(self.width_estimate, self.height_estimate),
        )
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width_estimate * self.height_estimate
    }
}
