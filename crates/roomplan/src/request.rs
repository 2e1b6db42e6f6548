//! Request payloads and the JSON entry point for embedding callers.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::model::{Layout, RoomDimensions};
use crate::solver::{optimize_with, OptimizeResult, PlannerCfg};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub current_layout: Layout,
    #[serde(default)]
    pub locked_ids: Vec<String>,
    pub room_dimensions: RoomDimensions,
}

impl OptimizeRequest {
    pub fn optimize(&self, cfg: &PlannerCfg) -> Result<OptimizeResult, LayoutError> {
        optimize_with(
            &self.current_layout,
            &self.locked_ids,
            &self.room_dimensions,
            cfg,
        )
    }
}

/// Decode an `OptimizeRequest`, optimize with default settings and encode
/// the result.
pub fn optimize_json(payload: &str) -> Result<String, LayoutError> {
    let request: OptimizeRequest = serde_json::from_str(payload)?;
    let result = request.optimize(&PlannerCfg::default())?;
    Ok(serde_json::to_string(&result)?)
}
