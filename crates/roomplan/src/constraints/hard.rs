use super::types::{HardConstraint, HardRule, Violation};
use super::Scene;
use crate::geom::{edge_distance, facing_gap, overlap_area, Region};
use crate::model::{LockSet, Orientation};

pub(super) fn check(scene: &Scene<'_>, locks: &LockSet, c: &HardConstraint) -> Vec<Violation> {
    match c.name {
        HardRule::DoorClearance => door_clearance(scene, c.min_clearance),
        HardRule::WalkingPath => walking_path(scene, c.min_clearance),
        HardRule::NoOverlap => no_overlap(scene),
        HardRule::LockedObjects => locked_objects(scene, locks),
    }
}

/// Floor a door needs free: its own footprint plus the corridor of `depth`
/// in front of it, clipped to the room.
pub(crate) fn door_zone(door: &Region, facing: Orientation, depth: f64, room: &Region) -> Region {
    match door.expand_toward(facing, depth).clip_to(room) {
        Some(corridor) => door.hull(&corridor),
        None => *door,
    }
}

fn door_clearance(scene: &Scene<'_>, depth: f64) -> Vec<Violation> {
    let mut out = Vec::new();
    for (i, door) in scene.objects.iter().enumerate().filter(|(_, o)| o.is("door")) {
        let zone = door_zone(&scene.regions[i], door.orientation, depth, &scene.room);
        for (j, obj) in scene.objects.iter().enumerate() {
            if j == i || obj.is_structural() {
                continue;
            }
            if zone.intersection(&scene.regions[j]).is_some() {
                out.push(Violation {
                    constraint: HardRule::DoorClearance,
                    objects: vec![door.id.clone(), obj.id.clone()],
                    message: format!(
                        "{} ({}) is blocking {}; keep {depth} units clear in front of the door",
                        obj.label, obj.id, door.id
                    ),
                });
            }
        }
    }
    out
}

fn walking_path(scene: &Scene<'_>, min_gap: f64) -> Vec<Violation> {
    let floor: Vec<usize> = (0..scene.objects.len())
        .filter(|&i| !scene.objects[i].is_aperture())
        .collect();
    let mut out = Vec::new();
    for (n, &i) in floor.iter().enumerate() {
        for &j in &floor[n + 1..] {
            let (a, b) = (&scene.objects[i], &scene.objects[j]);
            if a.is_structural() && b.is_structural() {
                continue;
            }
            let Some(strip) = facing_gap(&scene.regions[i], &scene.regions[j]) else {
                continue;
            };
            let gap = edge_distance(&scene.regions[i], &scene.regions[j]);
            if gap >= min_gap {
                continue;
            }
            let intruded = floor
                .iter()
                .filter(|&&k| k != i && k != j)
                .any(|&k| strip.intersection(&scene.regions[k]).is_some());
            if intruded {
                continue;
            }
            out.push(Violation {
                constraint: HardRule::WalkingPath,
                objects: vec![a.id.clone(), b.id.clone()],
                message: format!(
                    "only {gap:.0} units of floor between {} ({}) and {} ({}); walking paths need {min_gap}",
                    a.label, a.id, b.label, b.id
                ),
            });
        }
    }
    out
}

fn no_overlap(scene: &Scene<'_>) -> Vec<Violation> {
    let objs = scene.objects;
    let mut out = Vec::new();
    for i in 0..objs.len() {
        if objs[i].is_aperture() {
            continue;
        }
        for j in (i + 1)..objs.len() {
            if objs[j].is_aperture() {
                continue;
            }
            let area = overlap_area(&scene.regions[i], &scene.regions[j]);
            if area > 0.0 {
                out.push(Violation {
                    constraint: HardRule::NoOverlap,
                    objects: vec![objs[i].id.clone(), objs[j].id.clone()],
                    message: format!(
                        "{} ({}) overlaps {} ({}) by {area:.0} square units",
                        objs[i].label, objs[i].id, objs[j].label, objs[j].id
                    ),
                });
            }
        }
    }
    out
}

fn locked_objects(scene: &Scene<'_>, locks: &LockSet) -> Vec<Violation> {
    let mut out = Vec::new();
    for pin in locks.pins() {
        let message = match scene.objects.iter().find(|o| o.id == pin.id) {
            None => format!("locked object {} is missing from the layout", pin.id),
            Some(o) if o.bbox != pin.bbox || o.orientation != pin.orientation => format!(
                "locked object {} ({}) moved from {:?} @ {} to {:?} @ {}",
                o.label,
                o.id,
                <[i32; 4]>::from(pin.bbox),
                pin.orientation.degrees(),
                <[i32; 4]>::from(o.bbox),
                o.orientation.degrees()
            ),
            Some(_) => continue,
        };
        out.push(Violation {
            constraint: HardRule::LockedObjects,
            objects: vec![pin.id.clone()],
            message,
        });
    }
    out
}
