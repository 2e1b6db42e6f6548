//! Constraint-driven furniture layout engine.
//!
//! Pipeline: detector output → (optional `normalize`) → `Layout` validated
//! against the room → `RoomGraph` → constraint evaluation → greedy solver →
//! scored `OptimizeResult` with a plain-language explanation.
//!
//! Everything here is synchronous and pure over in-memory values. Layouts
//! are never mutated in place; each accepted move produces a new value.

pub mod api;
pub mod constraints;
pub mod error;
pub mod geom;
pub mod graph;
pub mod model;
pub mod normalize;
pub mod request;
pub mod sample;
pub mod scoring;
pub mod solver;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::LayoutError;
pub use model::{BBox, Layout, Orientation, RoomDimensions, RoomObject};
pub use solver::{optimize, OptimizeResult};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::constraints::{evaluate, ConstraintSet, Evaluation, Violation};
    pub use crate::error::LayoutError;
    pub use crate::graph::{GraphCfg, RoomGraph};
    pub use crate::model::{BBox, Layout, LockSet, ObjectKind, Orientation, RoomDimensions, RoomObject};
    pub use crate::request::{optimize_json, OptimizeRequest};
    pub use crate::scoring::{score, Scorecard};
    pub use crate::solver::{optimize, optimize_with, OptimizeResult, PlannerCfg, SolverCfg, Status};
}
