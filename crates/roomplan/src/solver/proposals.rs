//! Candidate poses for one object, derived from one violation.

use crate::constraints::{
    door_zone, ConstraintSet, HardRule, Violation, DOOR_CLEARANCE, WALKING_PATH_WIDTH,
};
use crate::error::LayoutError;
use crate::geom::{Region, EPS};
use crate::model::{BBox, Layout, Orientation, RoomDimensions};

use super::cfg::SolverCfg;

#[derive(Clone, Debug, PartialEq)]
pub struct Proposal {
    pub id: String,
    pub bbox: BBox,
    pub orientation: Orientation,
}

/// Something the target has to get away from.
struct Obstacle {
    region: Region,
    gap: f64,
    /// Closing the gap entirely is also a fix (walking paths).
    flush_ok: bool,
}

/// Poses for `target` that might clear `violation`, smallest displacement
/// first, quarter turn last. Every pose lies inside the room. Pure: the same
/// inputs always give the same sequence.
pub fn proposals(
    layout: &Layout,
    target: &str,
    violation: &Violation,
    dims: &RoomDimensions,
    rules: &ConstraintSet,
    cfg: &SolverCfg,
) -> Result<Vec<Proposal>, LayoutError> {
    let Some(obj) = layout.get(target) else {
        return Ok(Vec::new());
    };
    let own = obj.region()?;
    let room = dims.bounds();
    let obstacles = obstacles_for(layout, target, violation, &room, rules)?;

    let mut shifts: Vec<(Orientation, i32)> = Vec::new();
    for obs in &obstacles {
        let away = own.center() - obs.region.center();
        for dir in Orientation::ALL {
            if dir.step().dot(&away) >= 0.0 {
                for k in 1..=cfg.max_steps {
                    shifts.push((dir, cfg.step.saturating_mul(k as i32)));
                }
                let exact = clearing_shift(&own, &obs.region, dir, obs.gap);
                if exact > 0 {
                    shifts.push((dir, exact));
                }
            } else if obs.flush_ok {
                let close =
                    clearing_shift(&own, &obs.region, dir.turned().turned(), 0.0).saturating_neg();
                if close > 0 {
                    shifts.push((dir, close));
                }
            }
        }
    }
    // Stable: equal displacements keep generation order.
    shifts.sort_by_key(|&(_, amount)| amount);
    shifts.dedup();

    let fits = |b: &BBox| {
        b.x >= 0
            && b.y >= 0
            && (b.right() as f64) <= dims.width_estimate + EPS
            && (b.bottom() as f64) <= dims.height_estimate + EPS
    };
    let mut out: Vec<Proposal> = shifts
        .into_iter()
        .filter_map(|(dir, amount)| {
            let step = dir.step();
            obj.bbox
                .translated(step.x as i32 * amount, step.y as i32 * amount)
        })
        .filter(|b| fits(b))
        .map(|bbox| Proposal {
            id: obj.id.clone(),
            bbox,
            orientation: obj.orientation,
        })
        .collect();

    if cfg.allow_rotation {
        if let Some(turned) = obj.bbox.rotated_quarter().filter(|b| fits(b)) {
            out.push(Proposal {
                id: obj.id.clone(),
                bbox: turned,
                orientation: obj.orientation.turned(),
            });
        }
    }
    Ok(out)
}

fn obstacles_for(
    layout: &Layout,
    target: &str,
    violation: &Violation,
    room: &Region,
    rules: &ConstraintSet,
) -> Result<Vec<Obstacle>, LayoutError> {
    let clearance = |rule: HardRule, fallback: f64| {
        rules
            .hard_rule(rule)
            .map_or(fallback, |c| c.min_clearance)
    };
    let mut out = Vec::new();
    for id in violation.objects.iter().filter(|id| id.as_str() != target) {
        let Some(other) = layout.get(id) else {
            continue;
        };
        let region = other.region()?;
        let obstacle = match violation.constraint {
            HardRule::DoorClearance => {
                let depth = clearance(HardRule::DoorClearance, DOOR_CLEARANCE);
                Obstacle {
                    region: door_zone(&region, other.orientation, depth, room),
                    gap: 0.0,
                    flush_ok: false,
                }
            }
            HardRule::WalkingPath => Obstacle {
                region,
                gap: clearance(HardRule::WalkingPath, WALKING_PATH_WIDTH),
                flush_ok: true,
            },
            HardRule::NoOverlap => Obstacle {
                region,
                gap: 0.0,
                flush_ok: false,
            },
            HardRule::LockedObjects => continue,
        };
        out.push(obstacle);
    }
    Ok(out)
}

/// Shift along `dir` that leaves at least `gap` between `own` and `obs` on
/// that side. Non-positive when the gap is already there.
fn clearing_shift(own: &Region, obs: &Region, dir: Orientation, gap: f64) -> i32 {
    let need = match dir {
        Orientation::East => obs.max.x + gap - own.min.x,
        Orientation::West => own.max.x - (obs.min.x - gap),
        Orientation::South => obs.max.y + gap - own.min.y,
        Orientation::North => own.max.y - (obs.min.y - gap),
    };
    (need - EPS).ceil() as i32
}
