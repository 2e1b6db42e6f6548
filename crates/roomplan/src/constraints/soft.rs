use super::types::{SoftConstraint, SoftRule};
use super::Scene;
use crate::geom::edge_distance;

/// Linear decay: 1 up to `radius`, 0 from `radius + falloff` on.
#[inline]
pub fn proximity(d: f64, radius: f64, falloff: f64) -> f64 {
    if d <= radius {
        1.0
    } else if falloff <= 0.0 {
        0.0
    } else {
        (1.0 - (d - radius) / falloff).clamp(0.0, 1.0)
    }
}

pub(super) fn satisfaction(scene: &Scene<'_>, c: &SoftConstraint) -> f64 {
    let (subject, target, away) = match c.name {
        SoftRule::DeskNearWindow => ("desk", "window", false),
        SoftRule::BedAwayFromDoor => ("bed", "door", true),
        SoftRule::NightstandNearBed => ("nightstand", "bed", false),
    };
    let per_subject: Vec<f64> = scene
        .indices_of(subject)
        .filter_map(|i| nearest(scene, i, target))
        .map(|d| {
            let near = proximity(d, c.radius, c.falloff);
            if away {
                1.0 - near
            } else {
                near
            }
        })
        .collect();
    if per_subject.is_empty() {
        return 1.0;
    }
    per_subject.iter().sum::<f64>() / per_subject.len() as f64
}

fn nearest(scene: &Scene<'_>, from: usize, label: &str) -> Option<f64> {
    scene
        .indices_of(label)
        .filter(|&j| j != from)
        .map(|j| edge_distance(&scene.regions[from], &scene.regions[j]))
        .min_by(f64::total_cmp)
}
