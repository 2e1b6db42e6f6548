//! Greedy repair loop: one violation at a time, one accepted move per fix.

use crate::constraints::{evaluate, Evaluation, Violation};
use crate::error::LayoutError;
use crate::graph::RoomGraph;
use crate::model::{Layout, LockSet, RoomDimensions};
use crate::scoring::score;

use super::cfg::PlannerCfg;
use super::proposals::proposals;
use super::{Move, OptimizeResult, Status};

/// Optimize with the default rule book and search limits.
pub fn optimize(
    current_layout: &Layout,
    locked_ids: &[String],
    room_dimensions: &RoomDimensions,
) -> Result<OptimizeResult, LayoutError> {
    optimize_with(
        current_layout,
        locked_ids,
        room_dimensions,
        &PlannerCfg::default(),
    )
}

/// Validate the request, then repair hard violations until none remain, the
/// iteration budget runs out, or a full pass accepts no move.
///
/// Every accepted move removes its target violation and adds none, so the
/// layout held at the end is also the best one seen (fewest violations).
pub fn optimize_with(
    current_layout: &Layout,
    locked_ids: &[String],
    room_dimensions: &RoomDimensions,
    cfg: &PlannerCfg,
) -> Result<OptimizeResult, LayoutError> {
    cfg.validate()?;
    current_layout.validate(room_dimensions)?;
    let locks = LockSet::capture(current_layout, locked_ids);
    let mut search = Search::new(current_layout, room_dimensions, &locks, cfg)?;
    search.run()?;
    Ok(search.finish())
}

struct Search<'a> {
    dims: &'a RoomDimensions,
    locks: &'a LockSet,
    cfg: &'a PlannerCfg,
    layout: Layout,
    eval: Evaluation,
    score: f64,
    moves: Vec<Move>,
    iterations: usize,
}

impl<'a> Search<'a> {
    fn new(
        layout: &Layout,
        dims: &'a RoomDimensions,
        locks: &'a LockSet,
        cfg: &'a PlannerCfg,
    ) -> Result<Self, LayoutError> {
        let eval = evaluate(layout, dims, locks, &cfg.constraints)?;
        let score = score(&eval);
        Ok(Self {
            dims,
            locks,
            cfg,
            layout: layout.clone(),
            eval,
            score,
            moves: Vec::new(),
            iterations: 0,
        })
    }

    fn run(&mut self) -> Result<(), LayoutError> {
        let scfg = self.cfg.solver;
        while !self.eval.is_feasible() && self.iterations < scfg.max_iterations {
            self.iterations += 1;
            let mut accepted = 0usize;
            for v in self.eval.violations.clone() {
                // An earlier move in this pass may already have cleared it.
                if !self.eval.contains(&v) {
                    continue;
                }
                if let Some(mv) = self.resolve(&v)? {
                    self.moves.push(mv);
                    accepted += 1;
                }
            }
            tracing::debug!(
                iteration = self.iterations,
                accepted,
                remaining = self.eval.violations.len(),
                score = self.score,
                "solver pass"
            );
            if accepted == 0 {
                break;
            }
        }
        Ok(())
    }

    /// Try every proposal for every movable participant of `v`; apply the
    /// best admissible one.
    fn resolve(&mut self, v: &Violation) -> Result<Option<Move>, LayoutError> {
        let graph = RoomGraph::build(&self.layout, &self.cfg.graph)?;
        let targets: Vec<String> = graph
            .optimization_order()
            .into_iter()
            .filter(|id| v.involves(id) && !self.locks.is_pinned(id))
            .map(str::to_string)
            .collect();

        let mut best: Option<(Layout, Evaluation, f64, Move)> = None;
        let mut tried = 0usize;
        for target in &targets {
            let candidates = proposals(
                &self.layout,
                target,
                v,
                self.dims,
                &self.cfg.constraints,
                &self.cfg.solver,
            )?;
            for p in candidates {
                tried += 1;
                let next = self.layout.with_pose(&p.id, p.bbox, p.orientation);
                let next_eval = evaluate(&next, self.dims, self.locks, &self.cfg.constraints)?;
                let fixes = !next_eval.contains(v);
                let adds_nothing = next_eval.violations.iter().all(|w| self.eval.contains(w));
                if !(fixes && adds_nothing) {
                    continue;
                }
                let next_score = score(&next_eval);
                // Strictly better by more than epsilon, so ties keep the earlier proposal.
                if best
                    .as_ref()
                    .map_or(true, |b| next_score > b.2 + self.cfg.solver.epsilon)
                {
                    let Some(prev) = self.layout.get(&p.id) else {
                        continue;
                    };
                    let mv = Move {
                        id: p.id.clone(),
                        label: prev.label.clone(),
                        from: prev.bbox,
                        to: p.bbox,
                        from_orientation: prev.orientation,
                        to_orientation: p.orientation,
                        constraint: v.constraint,
                        objects: v.objects.clone(),
                    };
                    best = Some((next, next_eval, next_score, mv));
                }
            }
        }

        let Some((layout, eval, score, mv)) = best else {
            tracing::debug!(constraint = %v.constraint, objects = ?v.objects, tried, "no admissible move");
            return Ok(None);
        };
        tracing::debug!(
            id = %mv.id,
            constraint = %v.constraint,
            tried,
            score,
            "accepted move"
        );
        self.layout = layout;
        self.eval = eval;
        self.score = score;
        Ok(Some(mv))
    }

    fn finish(self) -> OptimizeResult {
        let status = if self.eval.is_feasible() {
            Status::Resolved
        } else {
            Status::Unresolvable
        };
        let mut lines: Vec<String> = Vec::new();
        if self.moves.is_empty() && status == Status::Resolved {
            lines.push("Layout already satisfies every hard constraint; nothing was moved.".into());
        }
        lines.extend(self.moves.iter().map(Move::describe));
        for v in &self.eval.violations {
            let pinned: Vec<&str> = v
                .objects
                .iter()
                .map(String::as_str)
                .filter(|id| self.locks.is_pinned(id))
                .collect();
            if pinned.is_empty() {
                lines.push(format!("Could not resolve: {}.", v.message));
            } else {
                lines.push(format!(
                    "Could not resolve: {} ({} cannot move).",
                    v.message,
                    pinned.join(", ")
                ));
            }
        }
        lines.extend(self.eval.suggestions.iter().cloned());
        lines.push(format!("Layout score: {:.1}/100.", self.score));

        tracing::info!(
            status = ?status,
            moves = self.moves.len(),
            iterations = self.iterations,
            score = self.score,
            remaining = self.eval.violations.len(),
            "optimize finished"
        );

        OptimizeResult {
            constraint_violations: self.eval.messages(),
            new_layout: self.layout,
            explanation: lines.join("\n"),
            layout_score: self.score,
            status,
            moves: self.moves,
            iterations: self.iterations,
        }
    }
}
