//! Error type shared by the layout engine.
//!
//! Geometry problems reject the whole request: one malformed object breaks
//! every relative measurement made against it. Unresolvable layouts are not
//! errors; they come back as a partial `OptimizeResult`.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Non-positive size, negative origin, or a bbox poking out of the room.
    InvalidGeometry { id: String, reason: String },
    /// Room extents that are not positive finite numbers.
    InvalidDimensions { width: f64, height: f64 },
    /// Two objects in one layout share an id.
    DuplicateId { id: String },
    /// A configuration value outside its allowed range.
    InvalidConfig { reason: String },
    /// Wire payload that does not decode (JSON entry points only).
    Json { reason: String },
}

impl LayoutError {
    pub(crate) fn geometry(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGeometry { id, reason } => {
                write!(f, "invalid geometry for object {id}: {reason}")
            }
            Self::InvalidDimensions { width, height } => write!(
                f,
                "room dimensions must be positive and finite (got {width} x {height})"
            ),
            Self::DuplicateId { id } => write!(f, "object id {id} appears more than once"),
            Self::InvalidConfig { reason } => write!(f, "invalid configuration: {reason}"),
            Self::Json { reason } => write!(f, "malformed payload: {reason}"),
        }
    }
}

impl std::error::Error for LayoutError {}

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            reason: err.to_string(),
        }
    }
}
