use super::*;
use crate::model::{BBox, Orientation, RoomObject};
use nalgebra::vector;
use proptest::prelude::*;

fn region(x: i32, y: i32, w: i32, h: i32) -> Region {
    to_region(&BBox::new(x, y, w, h)).unwrap()
}

#[test]
fn degenerate_boxes_are_rejected() {
    assert_eq!(
        to_region(&BBox::new(0, 0, 0, 10)),
        Err(DegenerateBox { w: 0, h: 10 })
    );
    assert!(to_region(&BBox::new(0, 0, 10, -1)).is_err());
}

#[test]
fn overlap_of_offset_squares() {
    let a = region(0, 0, 50, 50);
    let b = region(40, 40, 50, 50);
    assert!((overlap_area(&a, &b) - 100.0).abs() < 1e-12);
    assert!(is_blocking(&a, &b, 0.0));
    assert_eq!(edge_distance(&a, &b), 0.0);
}

#[test]
fn touching_edges_have_no_overlap() {
    let a = region(0, 0, 10, 10);
    let b = region(10, 0, 10, 10);
    assert_eq!(overlap_area(&a, &b), 0.0);
    assert_eq!(edge_distance(&a, &b), 0.0);
    // Flush objects leave no corridor for any positive width.
    assert!(is_blocking(&a, &b, 1.0));
    assert!(!is_blocking(&a, &b, 0.0));
}

#[test]
fn diagonal_distance_is_euclidean() {
    let a = region(0, 0, 10, 10);
    let b = region(13, 14, 5, 5);
    assert!((edge_distance(&a, &b) - 5.0).abs() < 1e-12);
    assert_eq!(gaps(&a, &b), vector![3.0, 4.0]);
    // Widest separating gap is 4: a 4-wide corridor fits, a 5-wide one does not.
    assert!(!is_blocking(&a, &b, 4.0));
    assert!(is_blocking(&a, &b, 5.0));
}

#[test]
fn corridor_strips_follow_orientation() {
    let door = region(0, 150, 20, 80);
    let east = door.expand_toward(Orientation::East, 60.0);
    assert_eq!(east, Region::new(vector![20.0, 150.0], vector![80.0, 230.0]));
    let north = door.expand_toward(Orientation::North, 60.0);
    assert_eq!(north, Region::new(vector![0.0, 90.0], vector![20.0, 150.0]));
    let west = door.expand_toward(Orientation::West, 60.0);
    let room = region(0, 0, 300, 400);
    assert!(west.clip_to(&room).is_none());
}

#[test]
fn facing_gap_only_for_aligned_neighbours() {
    let a = region(0, 0, 100, 50);
    let b = region(20, 80, 40, 40);
    let strip = facing_gap(&a, &b).unwrap();
    assert_eq!(strip, Region::new(vector![20.0, 50.0], vector![60.0, 80.0]));
    // Diagonal: no shared projection.
    let c = region(150, 100, 10, 10);
    assert!(facing_gap(&a, &c).is_none());
    // Overlapping pairs are not "across open floor".
    let d = region(50, 25, 10, 10);
    assert!(facing_gap(&a, &d).is_none());
}

#[test]
fn room_containment_includes_boundary() {
    let room = region(0, 0, 300, 400);
    assert!(room.contains(&region(0, 0, 300, 400)));
    assert!(room.contains(&region(200, 350, 100, 50)));
    assert!(!room.contains(&region(201, 350, 100, 50)));
}

#[test]
fn clearance_reports_ids_and_threshold() {
    let desk = RoomObject::movable("desk_1", "desk", BBox::new(200, 50, 80, 50));
    let window = RoomObject::structural("window_1", "window", BBox::new(200, 0, 50, 20));
    let res = clearance(&desk, &window, 50.0).unwrap();
    assert_eq!(res.from_id, "desk_1");
    assert_eq!(res.to_id, "window_1");
    assert!((res.distance - 30.0).abs() < 1e-12);
    assert!(!res.is_sufficient);
    let res = clearance(&desk, &window, 30.0).unwrap();
    assert!(res.is_sufficient);
}

#[test]
fn collide_rejects_bad_boxes() {
    let ok = RoomObject::movable("a", "desk", BBox::new(0, 0, 10, 10));
    let bad = RoomObject::movable("b", "desk", BBox::new(0, 0, 10, 0));
    let err = collide(&ok, &bad, 10.0).unwrap_err();
    assert!(err.to_string().contains("object b"));
}

#[test]
fn union_area_counts_overlaps_once() {
    let a = region(0, 0, 50, 50);
    let b = region(40, 40, 50, 50);
    assert_eq!(union_area(&[a, b]), 4900.0);
    assert_eq!(union_area(&[a, region(10, 10, 5, 5)]), 2500.0);
    assert_eq!(union_area(&[a, region(100, 0, 10, 10)]), 2600.0);
    assert_eq!(union_area(&[]), 0.0);
}

fn arb_region() -> impl Strategy<Value = Region> {
    (0i32..400, 0i32..400, 1i32..150, 1i32..150).prop_map(|(x, y, w, h)| region(x, y, w, h))
}

proptest! {
    #[test]
    fn edge_distance_is_symmetric(a in arb_region(), b in arb_region()) {
        prop_assert_eq!(edge_distance(&a, &b), edge_distance(&b, &a));
        prop_assert_eq!(edge_distance(&a, &a), 0.0);
        prop_assert_eq!(overlap_area(&a, &b), overlap_area(&b, &a));
    }

    #[test]
    fn disjoint_regions_never_block_narrower_paths(
        a in arb_region(),
        sep in 1i32..100,
        w in 1i32..100,
        h in 1i32..100,
        path in 0i32..100,
    ) {
        // Place b strictly east of a, separated by `sep`.
        let b = Region::new(
            vector![a.max.x + f64::from(sep), a.min.y],
            vector![a.max.x + f64::from(sep + w), a.min.y + f64::from(h)],
        );
        prop_assert_eq!(overlap_area(&a, &b), 0.0);
        prop_assert!(!is_blocking(&a, &b, 0.0));
        if path <= sep {
            prop_assert!(!is_blocking(&a, &b, f64::from(path)));
        }
    }

    #[test]
    fn union_of_two_is_inclusion_exclusion(a in arb_region(), b in arb_region()) {
        let expected = a.area() + b.area() - overlap_area(&a, &b);
        prop_assert!((union_area(&[a, b]) - expected).abs() < 1e-6);
    }

    #[test]
    fn quarter_turn_swaps_sides_and_keeps_center(
        x in 0i32..300, y in 0i32..300, w in 1i32..120, h in 1i32..120,
    ) {
        let bbox = BBox::new(x, y, w, h);
        let turned = bbox.rotated_quarter().unwrap();
        prop_assert_eq!((turned.w, turned.h), (h, w));
        let shift = (turned.center() - bbox.center()).abs();
        prop_assert!(shift.x <= 0.5 && shift.y <= 0.5);
        let mut full = turned;
        for _ in 0..3 {
            full = full.rotated_quarter().unwrap();
        }
        prop_assert_eq!(full.w, w);
    }
}
