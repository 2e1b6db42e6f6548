//! Scalar layout scores in `[0, 100]`.
//!
//! A feasible layout scores `100 × soft_ratio`. Any hard violation caps the
//! score at `HARD_CEILING` and divides it by the number of violations, so
//! every removed violation is visible to the solver as an improvement.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::constraints::{evaluate, ConstraintSet, Evaluation, SoftScore};
use crate::error::LayoutError;
use crate::geom::{overlap_area, union_area, Region};
use crate::model::{Layout, LockSet, RoomDimensions};

pub const HARD_CEILING: f64 = 50.0;

pub fn score(evaluation: &Evaluation) -> f64 {
    let ratio = evaluation.soft_ratio();
    let n = evaluation.violations.len();
    let raw = if n == 0 {
        100.0 * ratio
    } else {
        HARD_CEILING * ratio / n as f64
    };
    raw.clamp(0.0, 100.0)
}

pub fn score_layout(
    layout: &Layout,
    dims: &RoomDimensions,
    locks: &LockSet,
    constraints: &ConstraintSet,
) -> Result<f64, LayoutError> {
    Ok(score(&evaluate(layout, dims, locks, constraints)?))
}

/// Everything a caller shows next to a layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub score: f64,
    pub violation_count: usize,
    pub violations: Vec<String>,
    pub soft: Vec<SoftScore>,
    /// Percent of the floor covered by movable objects.
    pub furniture_density: f64,
    /// Share of the floor no floor object stands on, in `[0, 1]`.
    pub free_space_ratio: f64,
    pub walkability: f64,
    pub efficiency: f64,
    pub suggestions: Vec<String>,
}

impl Scorecard {
    pub fn build(
        layout: &Layout,
        dims: &RoomDimensions,
        locks: &LockSet,
        constraints: &ConstraintSet,
    ) -> Result<Self, LayoutError> {
        dims.validate()?;
        let evaluation = evaluate(layout, dims, locks, constraints)?;
        let floor = floor_regions(layout, dims)?;
        let free = free_space_ratio(&floor, dims);
        let collisions = floor
            .iter()
            .enumerate()
            .flat_map(|(i, a)| floor[i + 1..].iter().map(move |b| overlap_area(a, b)))
            .filter(|&area| area > 0.0)
            .count();
        let density = furniture_density(layout, dims);
        Ok(Self {
            score: score(&evaluation),
            violation_count: evaluation.violations.len(),
            violations: evaluation.messages(),
            furniture_density: density,
            free_space_ratio: free,
            walkability: walkability(free, collisions),
            efficiency: efficiency(density),
            soft: evaluation.soft,
            suggestions: evaluation.suggestions,
        })
    }
}

/// Footprint of movable objects as a percentage of the room area. Overlaps
/// are counted twice; the value is informational.
pub fn furniture_density(layout: &Layout, dims: &RoomDimensions) -> f64 {
    let area = dims.area();
    if area <= 0.0 {
        return 0.0;
    }
    let covered: f64 = layout
        .iter()
        .filter(|o| !o.is_structural())
        .map(|o| f64::from(o.bbox.w.max(0)) * f64::from(o.bbox.h.max(0)))
        .sum();
    100.0 * covered / area
}

/// Footprints that take up floor (everything but doors and windows),
/// clipped to the room.
fn floor_regions(layout: &Layout, dims: &RoomDimensions) -> Result<Vec<Region>, LayoutError> {
    let room = dims.bounds();
    let mut out = Vec::with_capacity(layout.len());
    for obj in layout.iter().filter(|o| !o.is_aperture()) {
        if let Some(r) = obj.region()?.clip_to(&room) {
            out.push(r);
        }
    }
    Ok(out)
}

fn free_space_ratio(floor: &[Region], dims: &RoomDimensions) -> f64 {
    let area = dims.area();
    if area <= 0.0 {
        return 0.0;
    }
    (1.0 - union_area(floor) / area).clamp(0.0, 1.0)
}

/// 100 with at least 30% free floor, stepping down to 20 below 10%. Each
/// overlapping pair of floor objects costs 15.
pub fn walkability(free_ratio: f64, collisions: usize) -> f64 {
    let base = match free_ratio {
        r if r >= 0.30 => 100.0,
        r if r >= 0.20 => 70.0,
        r if r >= 0.10 => 40.0,
        _ => 20.0,
    };
    (base - 15.0 * collisions as f64).max(0.0)
}

/// Furniture density (percent) graded against a 40-60% target band.
pub fn efficiency(density: f64) -> f64 {
    match density {
        d if (40.0..=60.0).contains(&d) => 100.0,
        d if (30.0..=70.0).contains(&d) => 80.0,
        d if (20.0..=80.0).contains(&d) => 60.0,
        _ => 40.0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    First,
    Second,
    Tie,
}

/// Which of two layouts of the same room scores higher.
pub fn compare(
    first: &Layout,
    second: &Layout,
    dims: &RoomDimensions,
    locks: &LockSet,
    constraints: &ConstraintSet,
) -> Result<Preference, LayoutError> {
    let a = score_layout(first, dims, locks, constraints)?;
    let b = score_layout(second, dims, locks, constraints)?;
    Ok(match a.total_cmp(&b) {
        Ordering::Greater => Preference::First,
        Ordering::Less => Preference::Second,
        Ordering::Equal => Preference::Tie,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{HardRule, SoftRule, Violation};
    use crate::model::{BBox, RoomObject};
    use proptest::prelude::*;

    fn violation(n: usize) -> Violation {
        Violation {
            constraint: HardRule::NoOverlap,
            objects: vec![format!("o{n}")],
            message: String::new(),
        }
    }

    fn evaluation(violations: usize, satisfaction: [f64; 3]) -> Evaluation {
        let names = [
            SoftRule::DeskNearWindow,
            SoftRule::BedAwayFromDoor,
            SoftRule::NightstandNearBed,
        ];
        let weights = [0.3, 0.2, 0.2];
        Evaluation {
            violations: (0..violations).map(violation).collect(),
            soft: (0..3)
                .map(|i| SoftScore {
                    name: names[i],
                    weight: weights[i],
                    satisfaction: satisfaction[i],
                })
                .collect(),
            suggestions: vec![],
        }
    }

    #[test]
    fn feasible_score_is_weighted_soft_ratio() {
        assert_eq!(score(&evaluation(0, [1.0, 1.0, 1.0])), 100.0);
        let s = score(&evaluation(0, [0.0, 1.0, 1.0]));
        assert!((s - 100.0 * 0.4 / 0.7).abs() < 1e-9);
        assert_eq!(score(&Evaluation::default()), 100.0);
    }

    #[test]
    fn violations_cap_and_divide() {
        assert_eq!(score(&evaluation(1, [1.0, 1.0, 1.0])), HARD_CEILING);
        assert_eq!(score(&evaluation(2, [1.0, 1.0, 1.0])), HARD_CEILING / 2.0);
        assert!(score(&evaluation(3, [1.0; 3])) < score(&evaluation(2, [1.0; 3])));
    }

    #[test]
    fn overlapping_pair_scores_at_most_the_ceiling() {
        let layout = Layout::new(vec![
            RoomObject::movable("a", "dresser", BBox::new(0, 0, 50, 50)),
            RoomObject::movable("b", "shelf", BBox::new(40, 40, 50, 50)),
        ])
        .unwrap();
        let dims = RoomDimensions::new(300.0, 400.0);
        let card = Scorecard::build(
            &layout,
            &dims,
            &LockSet::default(),
            &ConstraintSet::default(),
        )
        .unwrap();
        assert!(card.score <= HARD_CEILING);
        assert_eq!(card.violation_count, 1);
        assert!(card.violations[0].starts_with("no_overlap"));
        assert!((card.furniture_density - 100.0 * 5000.0 / 120_000.0).abs() < 1e-9);
        assert!((card.free_space_ratio - (1.0 - 4900.0 / 120_000.0)).abs() < 1e-9);
        assert_eq!(card.walkability, 85.0);
        assert_eq!(card.efficiency, 40.0);
    }

    #[test]
    fn walkability_follows_free_floor_and_collisions() {
        assert_eq!(walkability(0.5, 0), 100.0);
        assert_eq!(walkability(0.25, 0), 70.0);
        assert_eq!(walkability(0.15, 1), 25.0);
        assert_eq!(walkability(0.05, 2), 0.0);
    }

    #[test]
    fn efficiency_peaks_in_the_middle_band() {
        assert_eq!(efficiency(50.0), 100.0);
        assert_eq!(efficiency(35.0), 80.0);
        assert_eq!(efficiency(75.0), 60.0);
        assert_eq!(efficiency(5.0), 40.0);
        assert_eq!(efficiency(95.0), 40.0);
    }

    #[test]
    fn doors_and_windows_leave_the_floor_free() {
        let layout = Layout::new(vec![
            RoomObject::structural("door_1", "door", BBox::new(0, 150, 20, 80)),
            RoomObject::structural("window_1", "window", BBox::new(100, 0, 80, 10)),
        ])
        .unwrap();
        let dims = RoomDimensions::new(300.0, 400.0);
        let card = Scorecard::build(
            &layout,
            &dims,
            &LockSet::default(),
            &ConstraintSet::default(),
        )
        .unwrap();
        assert_eq!(card.free_space_ratio, 1.0);
        assert_eq!(card.walkability, 100.0);
    }

    #[test]
    fn compare_prefers_the_feasible_layout() {
        let dims = RoomDimensions::new(300.0, 400.0);
        let clash = Layout::new(vec![
            RoomObject::movable("a", "dresser", BBox::new(0, 0, 50, 50)),
            RoomObject::movable("b", "shelf", BBox::new(40, 40, 50, 50)),
        ])
        .unwrap();
        let apart = clash.with_pose("b", BBox::new(200, 200, 50, 50), Default::default());
        let rules = ConstraintSet::default();
        let locks = LockSet::default();
        assert_eq!(
            compare(&clash, &apart, &dims, &locks, &rules).unwrap(),
            Preference::Second
        );
        assert_eq!(
            compare(&apart, &apart, &dims, &locks, &rules).unwrap(),
            Preference::Tie
        );
    }

    proptest! {
        #[test]
        fn score_stays_in_range(
            n in 0usize..6,
            s in prop::array::uniform3(0.0f64..=1.0),
        ) {
            let v = score(&evaluation(n, s));
            prop_assert!((0.0..=100.0).contains(&v));
            if n > 0 {
                prop_assert!(v <= HARD_CEILING);
            }
        }
    }
}
