//! Curated surface for the CLI and other in-workspace callers.
//!
//! Not a stable public API. Prefer these re-exports over reaching into
//! submodules so call sites read the same across the workspace.

// Data model and wire payloads
pub use crate::model::{BBox, Layout, LockSet, ObjectKind, Orientation, Pin, RoomDimensions, RoomObject};
pub use crate::normalize::{normalize, normalize_label, RawObject, VisionOutput};
pub use crate::request::{optimize_json, OptimizeRequest};
// Geometry
pub use crate::geom::{
    clearance, clearance_check, collide, edge_distance, is_blocking, overlap_area, to_region,
    ClearanceResult, CollisionResult, Region,
};
// Relationships and rules
pub use crate::constraints::{
    evaluate, ConstraintSet, Evaluation, HardConstraint, HardRule, SoftConstraint, SoftRule,
    Violation,
};
pub use crate::graph::{Edge, GraphCfg, Node, Relation, RoomGraph};
// Scoring and search
pub use crate::sample::{draw_layout, ReplayToken as SampleReplay, SampleCfg};
pub use crate::scoring::{
    compare, efficiency, furniture_density, score, score_layout, walkability, Preference,
    Scorecard,
};
pub use crate::solver::{
    optimize, optimize_with, proposals, Move, OptimizeResult, PlannerCfg, Proposal, SolverCfg,
    Status,
};
