//! Constraint configuration and evaluation results.
//!
//! - `ConstraintSet`: immutable rule lists handed to `evaluate`; the default
//!   set is the standard bedroom rule book.
//! - `Violation`: one failed hard rule, with the ids it names.
//! - `Evaluation`: everything `evaluate` learned about one layout.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LayoutError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardRule {
    DoorClearance,
    WalkingPath,
    NoOverlap,
    LockedObjects,
}

impl HardRule {
    pub fn name(self) -> &'static str {
        match self {
            Self::DoorClearance => "door_clearance",
            Self::WalkingPath => "walking_path",
            Self::NoOverlap => "no_overlap",
            Self::LockedObjects => "locked_objects",
        }
    }
}

impl fmt::Display for HardRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftRule {
    DeskNearWindow,
    BedAwayFromDoor,
    NightstandNearBed,
}

impl SoftRule {
    pub fn name(self) -> &'static str {
        match self {
            Self::DeskNearWindow => "desk_near_window",
            Self::BedAwayFromDoor => "bed_away_from_door",
            Self::NightstandNearBed => "nightstand_near_bed",
        }
    }

    pub(crate) fn suggestion(self) -> &'static str {
        match self {
            Self::DeskNearWindow => "Consider moving the desk closer to a window for better lighting",
            Self::BedAwayFromDoor => "Consider moving the bed further from the door for privacy",
            Self::NightstandNearBed => "Consider placing the nightstand right beside the bed",
        }
    }
}

impl fmt::Display for SoftRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary rule measured against `min_clearance` (unused by `no_overlap` and
/// `locked_objects`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HardConstraint {
    pub name: HardRule,
    pub description: String,
    pub min_clearance: f64,
}

/// Weighted preference. Satisfaction is 1 within `radius` and decays
/// linearly to 0 over the next `falloff` units (inverted for "away" rules).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoftConstraint {
    pub name: SoftRule,
    pub description: String,
    pub weight: f64,
    pub radius: f64,
    pub falloff: f64,
}

pub const DOOR_CLEARANCE: f64 = 60.0;
pub const WALKING_PATH_WIDTH: f64 = 45.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintSet {
    pub hard: Vec<HardConstraint>,
    pub soft: Vec<SoftConstraint>,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        let hard = |name, description: &str, min_clearance| HardConstraint {
            name,
            description: description.to_string(),
            min_clearance,
        };
        let soft = |name, description: &str, weight, radius, falloff| SoftConstraint {
            name,
            description: description.to_string(),
            weight,
            radius,
            falloff,
        };
        Self {
            hard: vec![
                hard(
                    HardRule::DoorClearance,
                    "Door must remain unblocked with swing path clear",
                    DOOR_CLEARANCE,
                ),
                hard(
                    HardRule::WalkingPath,
                    "Minimum walking clearance between objects",
                    WALKING_PATH_WIDTH,
                ),
                hard(HardRule::NoOverlap, "Objects cannot overlap each other", 0.0),
                hard(HardRule::LockedObjects, "Locked objects cannot be moved", 0.0),
            ],
            soft: vec![
                soft(
                    SoftRule::DeskNearWindow,
                    "Desk should be positioned near natural light",
                    0.3,
                    50.0,
                    150.0,
                ),
                soft(
                    SoftRule::BedAwayFromDoor,
                    "Bed should be away from main entry",
                    0.2,
                    50.0,
                    100.0,
                ),
                soft(
                    SoftRule::NightstandNearBed,
                    "Nightstand should be adjacent to bed",
                    0.2,
                    5.0,
                    95.0,
                ),
            ],
        }
    }
}

impl ConstraintSet {
    pub fn hard_rule(&self, rule: HardRule) -> Option<&HardConstraint> {
        self.hard.iter().find(|c| c.name == rule)
    }

    pub fn total_soft_weight(&self) -> f64 {
        self.soft.iter().map(|c| c.weight).sum()
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        for c in &self.hard {
            if !(c.min_clearance.is_finite() && c.min_clearance >= 0.0) {
                return Err(LayoutError::config(format!(
                    "{}: min_clearance must be a non-negative number",
                    c.name
                )));
            }
        }
        for c in &self.soft {
            if !(0.0..=1.0).contains(&c.weight) {
                return Err(LayoutError::config(format!(
                    "{}: weight {} is outside [0, 1]",
                    c.name, c.weight
                )));
            }
            if !(c.radius >= 0.0 && c.falloff >= 0.0) {
                return Err(LayoutError::config(format!(
                    "{}: radius and falloff must be non-negative",
                    c.name
                )));
            }
        }
        Ok(())
    }
}

/// One failed hard rule. Two violations are the same when rule and ids match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub constraint: HardRule,
    pub objects: Vec<String>,
    pub message: String,
}

impl Violation {
    #[inline]
    pub fn same_as(&self, other: &Violation) -> bool {
        self.constraint == other.constraint && self.objects == other.objects
    }

    #[inline]
    pub fn involves(&self, id: &str) -> bool {
        self.objects.iter().any(|o| o == id)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.constraint, self.message)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoftScore {
    pub name: SoftRule,
    pub weight: f64,
    pub satisfaction: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub violations: Vec<Violation>,
    pub soft: Vec<SoftScore>,
    pub suggestions: Vec<String>,
}

impl Evaluation {
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    /// Σ weight·satisfaction / Σ weight, or 1 when no weight is configured.
    pub fn soft_ratio(&self) -> f64 {
        let total: f64 = self.soft.iter().map(|s| s.weight).sum();
        if total <= 0.0 {
            return 1.0;
        }
        let got: f64 = self.soft.iter().map(|s| s.weight * s.satisfaction).sum();
        (got / total).clamp(0.0, 1.0)
    }

    pub fn contains(&self, v: &Violation) -> bool {
        self.violations.iter().any(|w| w.same_as(v))
    }

    /// Violations rendered for callers, `rule: message`.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }
}
