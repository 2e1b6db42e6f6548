use super::*;
use crate::constraints::{evaluate, ConstraintSet};
use crate::error::LayoutError;
use crate::model::{LockSet, RoomDimensions, RoomObject};
use crate::sample::{draw_layout, ReplayToken, SampleCfg};
use crate::scoring::HARD_CEILING;
use proptest::prelude::*;

fn room() -> RoomDimensions {
    RoomDimensions::new(300.0, 400.0)
}

fn layout(objects: Vec<RoomObject>) -> Layout {
    Layout::new(objects).unwrap()
}

#[test]
fn locked_bed_in_door_corridor_stays_put() {
    let input = layout(vec![
        RoomObject::movable("bed_1", "bed", BBox::new(10, 10, 100, 200)),
        RoomObject::movable("desk_1", "desk", BBox::new(200, 50, 80, 50)),
        RoomObject::structural("door_1", "door", BBox::new(0, 150, 20, 80))
            .facing(Orientation::East),
    ]);
    let res = optimize(&input, &["bed_1".to_string()], &room()).unwrap();
    assert_eq!(
        res.new_layout.get("bed_1").unwrap().bbox,
        BBox::new(10, 10, 100, 200)
    );
    assert_eq!(res.status, Status::Unresolvable);
    assert!(res.moves.is_empty());
    assert_eq!(res.constraint_violations.len(), 1);
    assert!(res.constraint_violations[0].starts_with("door_clearance"));
    assert!(res.layout_score <= HARD_CEILING);
    assert!(res.explanation.contains("bed_1 cannot move"));
}

#[test]
fn overlap_is_fixed_by_the_smallest_shift() {
    let input = layout(vec![
        RoomObject::movable("a", "dresser", BBox::new(0, 0, 50, 50)),
        RoomObject::movable("b", "shelf", BBox::new(40, 40, 50, 50)),
    ]);
    let before = evaluate(&input, &room(), &LockSet::default(), &ConstraintSet::default())
        .unwrap();
    assert!(crate::scoring::score(&before) <= HARD_CEILING);

    let res = optimize(&input, &[], &room()).unwrap();
    assert_eq!(res.status, Status::Resolved);
    assert!(res.constraint_violations.is_empty());
    assert_eq!(res.layout_score, 100.0);
    // `a` is wedged in the corner; `b` slides east until the edges touch.
    assert_eq!(res.new_layout.get("a").unwrap().bbox, BBox::new(0, 0, 50, 50));
    assert_eq!(res.new_layout.get("b").unwrap().bbox, BBox::new(50, 40, 50, 50));
    assert_eq!(res.moves.len(), 1);
    assert_eq!(
        res.moves[0].describe(),
        "Moved shelf (b) 10 units east to resolve no_overlap (a, b)."
    );
    // Input value is untouched.
    assert_eq!(input.get("b").unwrap().bbox, BBox::new(40, 40, 50, 50));
}

#[test]
fn chair_on_the_door_is_moved_off_it() {
    let input = layout(vec![
        RoomObject::movable("chair_1", "chair", BBox::new(0, 160, 20, 20)),
        RoomObject::structural("door_1", "door", BBox::new(0, 150, 20, 80))
            .facing(Orientation::East),
    ]);
    let before = evaluate(&input, &room(), &LockSet::default(), &ConstraintSet::default())
        .unwrap();
    assert!(!before.is_feasible());

    let res = optimize(&input, &[], &room()).unwrap();
    assert_eq!(res.status, Status::Resolved);
    assert!(res.constraint_violations.is_empty());
    assert_eq!(
        res.new_layout.get("chair_1").unwrap().bbox,
        BBox::new(0, 130, 20, 20)
    );
}

#[test]
fn boxes_near_the_integer_limit_do_not_overflow() {
    let dims = RoomDimensions::new(3e9, 400.0);
    let input = layout(vec![
        RoomObject::movable("a", "dresser", BBox::new(2_147_483_000, 0, 50, 50)),
        RoomObject::movable("b", "shelf", BBox::new(2_147_483_040, 40, 50, 50)),
    ]);
    let res = optimize(&input, &[], &dims).unwrap();
    assert_eq!(res.status, Status::Resolved);
    assert!(res.constraint_violations.is_empty());
}

#[test]
fn desk_leaves_the_door_corridor() {
    let input = layout(vec![
        RoomObject::movable("desk_1", "desk", BBox::new(30, 160, 60, 40)),
        RoomObject::structural("door_1", "door", BBox::new(0, 150, 20, 80))
            .facing(Orientation::East),
    ]);
    let res = optimize(&input, &[], &room()).unwrap();
    assert_eq!(res.status, Status::Resolved);
    assert_eq!(
        res.new_layout.get("door_1").unwrap().bbox,
        BBox::new(0, 150, 20, 80)
    );
    let mv = &res.moves[0];
    assert_eq!(mv.id, "desk_1");
    assert_eq!(mv.constraint, crate::constraints::HardRule::DoorClearance);
    assert_eq!(mv.to, BBox::new(30, 110, 60, 40));
}

#[test]
fn narrow_walking_path_gets_resolved() {
    let input = layout(vec![
        RoomObject::movable("bed_1", "bed", BBox::new(0, 0, 100, 200)),
        RoomObject::movable("desk_1", "desk", BBox::new(130, 50, 80, 50)),
    ]);
    let res = optimize(&input, &[], &room()).unwrap();
    assert_eq!(res.status, Status::Resolved);
    assert_eq!(res.moves.len(), 1);
    assert_eq!(
        res.moves[0].constraint,
        crate::constraints::HardRule::WalkingPath
    );
    assert_eq!(res.iterations, 1);
}

#[test]
fn feasible_input_is_returned_unchanged() {
    let input = layout(vec![
        RoomObject::movable("bed_1", "bed", BBox::new(150, 150, 100, 200)),
        RoomObject::movable("nightstand_1", "nightstand", BBox::new(250, 150, 40, 40)),
        RoomObject::movable("desk_1", "desk", BBox::new(100, 0, 100, 50)),
        RoomObject::structural("window_1", "window", BBox::new(100, 0, 60, 10)),
        RoomObject::structural("door_1", "door", BBox::new(0, 0, 10, 80))
            .facing(Orientation::East),
    ]);
    let res = optimize(&input, &[], &room()).unwrap();
    assert_eq!(res.status, Status::Resolved);
    assert_eq!(res.new_layout, input);
    assert!(res.moves.is_empty());
    assert_eq!(res.iterations, 0);
    assert!(res.explanation.starts_with("Layout already satisfies"));
}

#[test]
fn out_of_room_object_fails_fast() {
    let input = layout(vec![RoomObject::movable(
        "bed_1",
        "bed",
        BBox::new(250, 10, 100, 200),
    )]);
    let err = optimize(&input, &[], &room()).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidGeometry { ref id, .. } if id == "bed_1"));
}

#[test]
fn bad_config_is_rejected() {
    let cfg = PlannerCfg {
        solver: SolverCfg {
            step: 0,
            ..SolverCfg::default()
        },
        ..PlannerCfg::default()
    };
    let err = optimize_with(&Layout::default(), &[], &room(), &cfg).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidConfig { .. }));
}

#[test]
fn result_serializes_with_wire_field_names() {
    let input = layout(vec![
        RoomObject::movable("a", "dresser", BBox::new(0, 0, 50, 50)),
        RoomObject::movable("b", "shelf", BBox::new(40, 40, 50, 50)),
    ]);
    let res = optimize(&input, &[], &room()).unwrap();
    let value = serde_json::to_value(&res).unwrap();
    for key in [
        "new_layout",
        "explanation",
        "layout_score",
        "constraint_violations",
        "status",
        "moves",
        "iterations",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["status"], "resolved");
    assert_eq!(value["moves"][0]["to"], serde_json::json!([50, 40, 50, 50]));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn pinned_objects_never_move(seed in any::<u64>(), index in 0u64..1000) {
        let req = draw_layout(SampleCfg::default(), ReplayToken { seed, index });
        let res = optimize(&req.current_layout, &req.locked_ids, &req.room_dimensions).unwrap();
        for obj in req.current_layout.iter() {
            if obj.is_structural() || req.locked_ids.contains(&obj.id) {
                let after = res.new_layout.get(&obj.id).unwrap();
                prop_assert_eq!(after.bbox, obj.bbox);
                prop_assert_eq!(after.orientation, obj.orientation);
            }
        }
        prop_assert!(res.new_layout.validate(&req.room_dimensions).is_ok());
    }

    #[test]
    fn score_range_and_ceiling(seed in any::<u64>(), index in 0u64..1000) {
        let req = draw_layout(SampleCfg::default(), ReplayToken { seed, index });
        let res = optimize(&req.current_layout, &req.locked_ids, &req.room_dimensions).unwrap();
        prop_assert!((0.0..=100.0).contains(&res.layout_score));
        if !res.constraint_violations.is_empty() {
            prop_assert!(res.layout_score <= HARD_CEILING);
            prop_assert_eq!(res.status, Status::Unresolvable);
        }
        // Never worse than the input.
        let locks = LockSet::capture(&req.current_layout, &req.locked_ids);
        let before = evaluate(&req.current_layout, &req.room_dimensions, &locks, &ConstraintSet::default()).unwrap();
        prop_assert!(res.constraint_violations.len() <= before.violations.len());
    }

    #[test]
    fn optimizing_a_result_again_changes_nothing(seed in any::<u64>()) {
        let req = draw_layout(SampleCfg::default(), ReplayToken { seed, index: 0 });
        let first = optimize(&req.current_layout, &req.locked_ids, &req.room_dimensions).unwrap();
        prop_assume!(first.status == Status::Resolved);
        let second = optimize(&first.new_layout, &req.locked_ids, &req.room_dimensions).unwrap();
        prop_assert_eq!(second.new_layout, first.new_layout);
        prop_assert!(second.moves.is_empty());
    }
}
