//! Optimize a few sampled bedrooms and print what moved.
//!
//! Usage:
//!   cargo run -p roomplan --example optimize_bedroom -- [seed]

use roomplan::api::{draw_layout, Scorecard, SampleCfg, SampleReplay};
use roomplan::prelude::*;

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2025u64);
    for index in 0..3 {
        let req = draw_layout(SampleCfg::default(), SampleReplay { seed, index });
        let locks = LockSet::capture(&req.current_layout, &req.locked_ids);
        let before = match Scorecard::build(
            &req.current_layout,
            &req.room_dimensions,
            &locks,
            &ConstraintSet::default(),
        ) {
            Ok(card) => card,
            Err(err) => {
                eprintln!("sample {index}: {err}");
                continue;
            }
        };
        match req.optimize(&PlannerCfg::default()) {
            Ok(res) => {
                println!(
                    "sample {index}: {:.1} -> {:.1} ({:?}, {} moves, locked {:?})",
                    before.score,
                    res.layout_score,
                    res.status,
                    res.moves.len(),
                    req.locked_ids
                );
                for line in res.explanation.lines() {
                    println!("  {line}");
                }
            }
            Err(err) => eprintln!("sample {index}: {err}"),
        }
    }
}
