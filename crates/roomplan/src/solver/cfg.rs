use serde::{Deserialize, Serialize};

use crate::constraints::ConstraintSet;
use crate::error::LayoutError;
use crate::graph::GraphCfg;

/// Search limits for the greedy repair loop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverCfg {
    /// Upper bound on full passes over the violation list.
    pub max_iterations: usize,
    /// Shift increment in bbox units.
    pub step: i32,
    /// Shifts are tried at `k × step` for `k = 1..=max_steps`.
    pub max_steps: u32,
    /// Margin a later proposal must beat an earlier one by to replace it.
    pub epsilon: f64,
    pub allow_rotation: bool,
}

impl Default for SolverCfg {
    fn default() -> Self {
        Self {
            max_iterations: 8,
            step: 10,
            max_steps: 30,
            epsilon: 1e-6,
            allow_rotation: true,
        }
    }
}

impl SolverCfg {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.step <= 0 {
            return Err(LayoutError::config(format!(
                "solver step must be positive (got {})",
                self.step
            )));
        }
        if !(self.epsilon >= 0.0) {
            return Err(LayoutError::config("solver epsilon must be non-negative"));
        }
        Ok(())
    }
}

/// Everything `optimize_with` reads, loadable from one JSON file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerCfg {
    pub constraints: ConstraintSet,
    pub graph: GraphCfg,
    pub solver: SolverCfg,
}

impl PlannerCfg {
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.constraints.validate()?;
        self.graph.validate()?;
        self.solver.validate()
    }
}
