//! Relationship graph over the objects of one layout.
//!
//! The graph is a derived view: `RoomGraph::build` recomputes every edge from
//! a layout, so there is nothing to keep in sync and no back-references.
//! Pairs are evaluated exhaustively (O(n²)); rooms hold a few dozen objects at
//! most.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::geom::{edge_distance, is_blocking, Region};
use crate::model::{Layout, ObjectKind};

/// Dependent label → anchor label. A dependent is linked to its nearest anchor.
pub const DEPENDENCY_RULES: &[(&str, &str)] = &[("nightstand", "bed"), ("chair", "desk")];

/// Proximity thresholds for edge classification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphCfg {
    /// Edge distance below which two objects count as adjacent.
    pub adjacent_threshold: f64,
    /// Edge distance below which two non-adjacent objects count as near.
    pub near_threshold: f64,
    /// Corridor width used for blocking edges.
    pub path_width: f64,
}

impl Default for GraphCfg {
    fn default() -> Self {
        Self {
            adjacent_threshold: 20.0,
            near_threshold: 50.0,
            path_width: 45.0,
        }
    }
}

impl GraphCfg {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.adjacent_threshold >= 0.0 && self.near_threshold >= self.adjacent_threshold) {
            return Err(LayoutError::config(format!(
                "graph thresholds need 0 <= adjacent ({}) <= near ({})",
                self.adjacent_threshold, self.near_threshold
            )));
        }
        if !(self.path_width >= 0.0) {
            return Err(LayoutError::config("graph path_width must be non-negative"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Adjacent,
    Near,
    Blocking,
    DependsOn,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub is_locked: bool,
}

/// `adjacent`, `near` and `blocking` are symmetric and stored once, earlier
/// object first. `depends_on` points from dependent to anchor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub relation: Relation,
    pub distance: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl RoomGraph {
    pub fn build(layout: &Layout, cfg: &GraphCfg) -> Result<Self, LayoutError> {
        let regions = layout
            .iter()
            .map(|o| o.region())
            .collect::<Result<Vec<Region>, _>>()?;
        let objs = layout.objects();

        let nodes = objs
            .iter()
            .map(|o| Node {
                id: o.id.clone(),
                label: o.label.clone(),
                kind: o.kind,
                is_locked: o.is_locked || o.is_structural(),
            })
            .collect();

        let mut edges = Vec::new();
        for i in 0..objs.len() {
            for j in (i + 1)..objs.len() {
                let d = edge_distance(&regions[i], &regions[j]);
                let mut push = |relation| {
                    edges.push(Edge {
                        from: objs[i].id.clone(),
                        to: objs[j].id.clone(),
                        relation,
                        distance: d,
                    })
                };
                if d < cfg.adjacent_threshold {
                    push(Relation::Adjacent);
                } else if d < cfg.near_threshold {
                    push(Relation::Near);
                }
                if is_blocking(&regions[i], &regions[j], cfg.path_width) {
                    push(Relation::Blocking);
                }
            }
        }

        for &(dependent, anchor) in DEPENDENCY_RULES {
            for (i, dep) in objs.iter().enumerate().filter(|(_, o)| o.is(dependent)) {
                let nearest = objs
                    .iter()
                    .enumerate()
                    .filter(|(_, o)| o.is(anchor))
                    .map(|(j, o)| (o, edge_distance(&regions[i], &regions[j])))
                    .min_by(|a, b| a.1.total_cmp(&b.1));
                if let Some((anchor_obj, d)) = nearest {
                    edges.push(Edge {
                        from: dep.id.clone(),
                        to: anchor_obj.id.clone(),
                        relation: Relation::DependsOn,
                        distance: d,
                    });
                }
            }
        }

        Ok(Self { nodes, edges })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edges_of(&self, relation: Relation) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.relation == relation)
    }

    /// Anchors that `id` depends on.
    pub fn dependencies(&self, id: &str) -> Vec<&str> {
        self.edges_of(Relation::DependsOn)
            .filter(|e| e.from == id)
            .map(|e| e.to.as_str())
            .collect()
    }

    /// Objects that depend on `id`.
    pub fn dependents(&self, id: &str) -> Vec<&str> {
        self.edges_of(Relation::DependsOn)
            .filter(|e| e.to == id)
            .map(|e| e.from.as_str())
            .collect()
    }

    pub fn adjacent(&self, id: &str) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .edges_of(Relation::Adjacent)
            .filter_map(|e| {
                if e.from == id {
                    Some(e.to.as_str())
                } else if e.to == id {
                    Some(e.from.as_str())
                } else {
                    None
                }
            })
            .collect();
        out.dedup();
        out
    }

    pub fn locked_ids(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.is_locked)
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Movable objects that are not locked.
    pub fn movable_ids(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.kind == ObjectKind::Movable && !n.is_locked)
            .map(|n| n.id.as_str())
            .collect()
    }

    pub fn structural_ids(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.kind == ObjectKind::Structural)
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Movable ids with anchors ahead of their dependents; layout order
    /// otherwise. A dependency cycle falls back to layout order for the rest.
    pub fn optimization_order(&self) -> Vec<&str> {
        let mut pending = self.movable_ids();
        let mut order: Vec<&str> = Vec::with_capacity(pending.len());
        while !pending.is_empty() {
            let ready: Vec<&str> = pending
                .iter()
                .copied()
                .filter(|id| {
                    self.dependencies(id)
                        .iter()
                        .all(|dep| order.contains(dep) || !pending.contains(dep))
                })
                .collect();
            if ready.is_empty() {
                order.append(&mut pending);
                break;
            }
            pending.retain(|id| !ready.contains(id));
            order.extend(ready);
        }
        order
    }
}
