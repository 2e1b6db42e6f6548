//! Layout optimizer: greedy local repair of hard violations.
//!
//! Purpose
//! - Move or turn unpinned movable objects until the layout breaks no hard
//!   rule, and explain every move in words.
//!
//! Search
//! - Each pass walks the current violation list in order. For every violation
//!   the movable, unpinned participants are tried in graph optimization order
//!   (anchors before their dependents); each gets a finite list of shifts away
//!   from the obstacle plus a quarter turn (`proposals`).
//! - A proposal is admissible when it clears the targeted violation and adds
//!   no violation that was not already there. The admissible proposal with the
//!   highest score is applied; ties keep the earliest one.
//! - The loop stops when the layout is feasible, after `max_iterations`
//!   passes, or after a pass that applied nothing.
//!
//! Competing soft preferences are settled by the aggregate score only: a move
//! that helps the desk but hurts the bed is taken if the total goes up.

mod cfg;
mod proposals;
mod search;

pub use cfg::{PlannerCfg, SolverCfg};
pub use proposals::{proposals, Proposal};
pub use search::{optimize, optimize_with};

use serde::{Deserialize, Serialize};

use crate::constraints::HardRule;
use crate::model::{BBox, Layout, Orientation};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Resolved,
    Unresolvable,
}

/// One accepted pose change and the violation it cleared.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub id: String,
    pub label: String,
    pub from: BBox,
    pub to: BBox,
    pub from_orientation: Orientation,
    pub to_orientation: Orientation,
    pub constraint: HardRule,
    pub objects: Vec<String>,
}

impl Move {
    #[inline]
    pub fn is_rotation(&self) -> bool {
        self.from_orientation != self.to_orientation
    }

    pub fn describe(&self) -> String {
        let cause = format!("{} ({})", self.constraint, self.objects.join(", "));
        if self.is_rotation() {
            format!(
                "Turned {} ({}) to face {} to resolve {cause}.",
                self.label,
                self.id,
                self.to_orientation.compass()
            )
        } else {
            let dx = self.to.x - self.from.x;
            let dy = self.to.y - self.from.y;
            let (dir, amount) = match (dx, dy) {
                (0, d) if d < 0 => ("north", -d),
                (0, d) => ("south", d),
                (d, _) if d < 0 => ("west", -d),
                (d, _) => ("east", d),
            };
            format!(
                "Moved {} ({}) {amount} units {dir} to resolve {cause}.",
                self.label, self.id
            )
        }
    }
}

/// Response of `optimize`. The first four fields are the wire contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResult {
    pub new_layout: Layout,
    pub explanation: String,
    pub layout_score: f64,
    pub constraint_violations: Vec<String>,
    pub status: Status,
    pub moves: Vec<Move>,
    pub iterations: usize,
}

#[cfg(test)]
mod tests;
