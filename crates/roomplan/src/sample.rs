//! Random bedroom requests for benches, property tests and the CLI.
//!
//! Model
//! - Room sides uniform in `[min_side, max_side]`. A door sits on the west
//!   wall facing east and a window on the north wall.
//! - Each catalogue piece lands at a uniform position that fits the room,
//!   turned a random quarter. Pieces may overlap; the solver is meant to
//!   untangle them.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{BBox, Layout, Orientation, RoomDimensions, RoomObject};
use crate::request::OptimizeRequest;

/// Furniture drawn into every sample: label and footprint facing north.
pub const BEDROOM_CATALOGUE: &[(&str, i32, i32)] = &[
    ("bed", 100, 200),
    ("nightstand", 40, 40),
    ("desk", 100, 50),
    ("chair", 45, 45),
    ("dresser", 80, 45),
];

#[derive(Clone, Copy, Debug)]
pub struct SampleCfg {
    pub min_side: i32,
    pub max_side: i32,
    /// Chance that a movable piece is requested as locked.
    pub lock_probability: f64,
}

impl Default for SampleCfg {
    fn default() -> Self {
        Self {
            min_side: 300,
            max_side: 500,
            lock_probability: 0.2,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw one request. Every object fits inside the room, ids are unique.
pub fn draw_layout(cfg: SampleCfg, tok: ReplayToken) -> OptimizeRequest {
    let mut rng = tok.to_std_rng();
    // The bed must fit in either orientation.
    let lo = cfg.min_side.max(220);
    let hi = cfg.max_side.max(lo);
    let w = rng.gen_range(lo..=hi);
    let h = rng.gen_range(lo..=hi);

    let mut objects = vec![
        RoomObject::structural("door_1", "door", BBox::new(0, rng.gen_range(0..=h - 80), 10, 80))
            .facing(Orientation::East),
        RoomObject::structural(
            "window_1",
            "window",
            BBox::new(rng.gen_range(0..=w - 60), 0, 60, 10),
        )
        .facing(Orientation::South),
    ];
    let mut locked_ids = Vec::new();
    for &(label, pw, ph) in BEDROOM_CATALOGUE {
        let facing = Orientation::ALL[rng.gen_range(0..4)];
        let (pw, ph) = match facing {
            Orientation::East | Orientation::West => (ph, pw),
            _ => (pw, ph),
        };
        let x = rng.gen_range(0..=w - pw);
        let y = rng.gen_range(0..=h - ph);
        let id = format!("{label}_1");
        if rng.gen_bool(cfg.lock_probability.clamp(0.0, 1.0)) {
            locked_ids.push(id.clone());
        }
        objects.push(RoomObject::movable(id, label, BBox::new(x, y, pw, ph)).facing(facing));
    }

    OptimizeRequest {
        // Ids are built unique above.
        current_layout: Layout::new(objects).unwrap_or_default(),
        locked_ids,
        room_dimensions: RoomDimensions::new(f64::from(w), f64::from(h)),
    }
}
