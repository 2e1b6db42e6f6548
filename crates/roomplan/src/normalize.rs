//! Cleanup of raw detector output into a valid `Layout`.
//!
//! Detectors disagree on label spelling, emit boxes that poke out of the
//! image, and sometimes repeat or omit ids. `normalize` fixes all of that in
//! one pass. It is opt-in: `optimize` never normalizes and rejects anything
//! malformed.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::LayoutError;
use crate::model::{BBox, Layout, ObjectKind, Orientation, RoomDimensions, RoomObject};

/// Labels that are part of the building. Objects with these labels are
/// always structural and therefore never moved.
pub const STRUCTURAL_LABELS: &[&str] = &["door", "window", "wall", "column", "radiator", "fireplace"];

const SYNONYMS: &[(&str, &str)] = &[
    ("couch", "sofa"),
    ("loveseat", "sofa"),
    ("settee", "sofa"),
    ("divan", "sofa"),
    ("single_bed", "bed"),
    ("double_bed", "bed"),
    ("queen_bed", "bed"),
    ("king_bed", "bed"),
    ("night_stand", "nightstand"),
    ("bedside_table", "nightstand"),
    ("night_table", "nightstand"),
    ("writing_desk", "desk"),
    ("work_desk", "desk"),
    ("office_chair", "chair"),
    ("desk_chair", "chair"),
    ("chest_of_drawers", "dresser"),
    ("doorway", "door"),
    ("pillar", "column"),
    ("heater", "radiator"),
];

/// One object as a detector reports it. Everything but `label` and `bbox`
/// is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawObject {
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
    pub bbox: [i32; 4],
    #[serde(rename = "type", default)]
    pub kind: Option<ObjectKind>,
    /// Any angle; snapped to the nearest quarter turn.
    #[serde(default)]
    pub orientation: Option<i64>,
    #[serde(default)]
    pub is_locked: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisionOutput {
    pub room_dimensions: RoomDimensions,
    pub objects: Vec<RawObject>,
}

/// Trim, lowercase, join words with `_`, then map known synonyms.
pub fn normalize_label(raw: &str) -> String {
    let flat: String = raw
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if flat.is_empty() {
        return "unknown".to_string();
    }
    SYNONYMS
        .iter()
        .find(|(from, _)| *from == flat)
        .map_or(flat, |(_, to)| to.to_string())
}

#[inline]
pub fn is_structural_label(label: &str) -> bool {
    STRUCTURAL_LABELS.contains(&label)
}

pub fn normalize(
    raw: &[RawObject],
    dims: &RoomDimensions,
    locked_ids: &[String],
) -> Result<Layout, LayoutError> {
    dims.validate()?;
    let room_w = (dims.width_estimate.floor() as i32).max(1);
    let room_h = (dims.height_estimate.floor() as i32).max(1);

    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut objects = Vec::with_capacity(raw.len());
    for r in raw {
        let label = normalize_label(&r.label);
        let [x, y, w, h] = r.bbox;
        let x = x.clamp(0, room_w - 1);
        let y = y.clamp(0, room_h - 1);
        let bbox = BBox::new(x, y, w.clamp(1, room_w - x), h.clamp(1, room_h - y));

        let count = counts.entry(label.clone()).or_insert(0);
        *count += 1;
        let given = r.id.as_deref().map(str::trim).unwrap_or_default();
        let id = if given.is_empty() || seen.contains(given) {
            let mut n = *count;
            while seen.contains(&format!("{label}_{n}")) {
                n += 1;
            }
            let fresh = format!("{label}_{n}");
            if !given.is_empty() {
                tracing::debug!(given, fresh = %fresh, "renamed duplicate id");
            }
            fresh
        } else {
            given.to_string()
        };
        seen.insert(id.clone());

        let kind = if is_structural_label(&label) || r.kind == Some(ObjectKind::Structural) {
            ObjectKind::Structural
        } else {
            ObjectKind::Movable
        };
        let is_locked = r.is_locked
            || locked_ids.contains(&id)
            || r.id.as_ref().is_some_and(|orig| locked_ids.contains(orig));
        objects.push(RoomObject {
            id,
            label,
            bbox,
            kind,
            orientation: r.orientation.map_or(Orientation::North, Orientation::nearest),
            is_locked,
        });
    }
    Layout::new(objects)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: Option<&str>, label: &str, bbox: [i32; 4]) -> RawObject {
        RawObject {
            id: id.map(str::to_string),
            label: label.to_string(),
            bbox,
            kind: None,
            orientation: None,
            is_locked: false,
        }
    }

    #[test]
    fn labels_are_canonicalized() {
        assert_eq!(normalize_label("  Night Stand "), "nightstand");
        assert_eq!(normalize_label("Couch"), "sofa");
        assert_eq!(normalize_label("queen-bed"), "bed");
        assert_eq!(normalize_label("Floor  Lamp"), "floor_lamp");
        assert_eq!(normalize_label("   "), "unknown");
    }

    #[test]
    fn boxes_are_clamped_and_types_inferred() {
        let dims = RoomDimensions::new(300.0, 400.0);
        let layout = normalize(
            &[
                raw(Some("w"), "Window", [-20, -5, 100, 10]),
                raw(Some("bed_1"), "bed", [250, 350, 100, 200]),
            ],
            &dims,
            &[],
        )
        .unwrap();
        let window = layout.get("w").unwrap();
        assert_eq!(window.bbox, BBox::new(0, 0, 100, 10));
        assert!(window.is_structural());
        let bed = layout.get("bed_1").unwrap();
        assert_eq!(bed.bbox, BBox::new(250, 350, 50, 50));
        assert!(!bed.is_structural());
        assert!(layout.validate(&dims).is_ok());
    }

    #[test]
    fn missing_and_duplicate_ids_get_label_numbers() {
        let dims = RoomDimensions::new(300.0, 400.0);
        let layout = normalize(
            &[
                raw(Some("bed_1"), "bed", [0, 0, 100, 200]),
                raw(Some("bed_1"), "bed", [150, 0, 100, 200]),
                raw(None, "chair", [0, 300, 40, 40]),
                raw(Some(" "), "chair", [50, 300, 40, 40]),
            ],
            &dims,
            &["chair_2".to_string()],
        )
        .unwrap();
        let ids: Vec<_> = layout.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["bed_1", "bed_2", "chair_1", "chair_2"]);
        assert!(layout.get("chair_2").unwrap().is_locked);
        assert!(!layout.get("chair_1").unwrap().is_locked);
    }

    #[test]
    fn orientation_snaps_and_vision_payload_decodes() {
        let json = r#"{
            "room_dimensions": {"width_estimate": 300, "height_estimate": 400},
            "objects": [
                {"label": "Door", "bbox": [0, 150, 20, 80], "orientation": 95},
                {"id": "desk_1", "label": "desk", "bbox": [200, 50, 80, 50], "type": "movable"}
            ]
        }"#;
        let vision: VisionOutput = serde_json::from_str(json).unwrap();
        let layout = normalize(&vision.objects, &vision.room_dimensions, &[]).unwrap();
        let door = layout.get("door_1").unwrap();
        assert_eq!(door.orientation, Orientation::East);
        assert!(door.is_structural());
        assert_eq!(layout.get("desk_1").unwrap().orientation, Orientation::North);
    }
}
