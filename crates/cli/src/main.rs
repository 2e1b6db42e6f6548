mod provenance;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use polars::prelude::{ChunkAgg, CsvWriter, SerWriter};
use roomplan::api::{
    collide, draw_layout, normalize, CollisionResult, GraphCfg, LockSet, OptimizeRequest,
    PlannerCfg, RoomGraph, SampleCfg, SampleReplay, Scorecard, Status, VisionOutput,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use provenance::{write_sidecar, Build, Run};

#[derive(Parser)]
#[command(name = "roomplan")]
#[command(about = "Constraint-driven furniture layout optimizer")]
struct Cmd {
    /// Planner configuration (JSON); missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Optimize one request and write the result plus a provenance sidecar
    Optimize {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the scorecard of a request's current layout
    Score {
        #[arg(long)]
        input: PathBuf,
    },
    /// Print the relationship graph and pairwise collisions of a request
    Graph {
        #[arg(long)]
        input: PathBuf,
    },
    /// Turn raw vision output into a clean optimize request
    Normalize {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Object id to lock; repeat for several
        #[arg(long = "lock")]
        lock: Vec<String>,
    },
    /// Write seeded sample requests
    Sample {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1)]
        count: u64,
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Optimize every request in a directory and write a CSV summary
    Batch {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let cfg = load_cfg(cmd.config.as_deref())?;
    match cmd.action {
        Action::Optimize { input, out } => optimize(&input, &out, &cfg),
        Action::Score { input } => print_json(&score(&input, &cfg)?),
        Action::Graph { input } => print_json(&graph(&input, &cfg.graph)?),
        Action::Normalize { input, out, lock } => normalize_vision(&input, &out, &lock),
        Action::Sample {
            seed,
            count,
            out_dir,
        } => sample(seed, count, &out_dir).map(|_| ()),
        Action::Batch { dir, out } => batch(&dir, &out, &cfg),
        Action::Report => print_json(&Build::current()),
    }
}

fn load_cfg(path: Option<&Path>) -> Result<PlannerCfg> {
    let cfg = match path {
        Some(p) => read_json(p)?,
        None => PlannerCfg::default(),
    };
    if let Err(err) = cfg.validate() {
        bail!("{err} ({})", path.map_or("<default>".into(), |p| p.display().to_string()));
    }
    Ok(cfg)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("decoding {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn optimize(input: &Path, out: &Path, cfg: &PlannerCfg) -> Result<()> {
    let req: OptimizeRequest = read_json(input)?;
    let res = req
        .optimize(cfg)
        .with_context(|| format!("optimizing {}", input.display()))?;
    tracing::info!(
        input = %input.display(),
        out = %out.display(),
        status = ?res.status,
        score = res.layout_score,
        moves = res.moves.len(),
        "optimize"
    );
    write_json(out, &res)?;
    write_sidecar(
        out,
        Run::new("optimize", &[input], cfg).outcome(json!({
            "locked_ids": req.locked_ids,
            "status": res.status,
            "layout_score": res.layout_score,
            "moves": res.moves.len(),
        })),
    )?;
    Ok(())
}

fn score(input: &Path, cfg: &PlannerCfg) -> Result<Scorecard> {
    let req: OptimizeRequest = read_json(input)?;
    let locks = LockSet::capture(&req.current_layout, &req.locked_ids);
    let card = Scorecard::build(
        &req.current_layout,
        &req.room_dimensions,
        &locks,
        &cfg.constraints,
    )?;
    tracing::info!(
        input = %input.display(),
        score = card.score,
        violations = card.violation_count,
        "score"
    );
    Ok(card)
}

fn graph(input: &Path, cfg: &GraphCfg) -> Result<serde_json::Value> {
    let req: OptimizeRequest = read_json(input)?;
    req.current_layout.validate(&req.room_dimensions)?;
    let g = RoomGraph::build(&req.current_layout, cfg)?;
    let objects = req.current_layout.objects();
    let mut collisions: Vec<CollisionResult> = Vec::new();
    for (i, a) in objects.iter().enumerate() {
        for b in &objects[i + 1..] {
            let c = collide(a, b, cfg.path_width)?;
            if c.overlap_area > 0.0 {
                collisions.push(c);
            }
        }
    }
    tracing::info!(input = %input.display(), nodes = g.len(), edges = g.edges.len(), "graph");
    Ok(json!({
        "optimization_order": g.optimization_order(),
        "collisions": collisions,
        "graph": g,
    }))
}

fn normalize_vision(input: &Path, out: &Path, lock: &[String]) -> Result<()> {
    let vision: VisionOutput = read_json(input)?;
    let layout = normalize(&vision.objects, &vision.room_dimensions, lock)?;
    let locked_ids: Vec<String> = lock
        .iter()
        .filter(|id| {
            let known = layout.get(id).is_some();
            if !known {
                tracing::warn!(id = %id, "lock names no object after normalization");
            }
            known
        })
        .cloned()
        .collect();
    tracing::info!(
        input = %input.display(),
        objects = layout.len(),
        locked = locked_ids.len(),
        "normalize"
    );
    write_json(
        out,
        &OptimizeRequest {
            current_layout: layout,
            locked_ids,
            room_dimensions: vision.room_dimensions,
        },
    )
}

fn sample(seed: u64, count: u64, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let mut written = Vec::with_capacity(count as usize);
    for index in 0..count {
        let req = draw_layout(SampleCfg::default(), SampleReplay { seed, index });
        let path = out_dir.join(format!("sample_{seed}_{index}.json"));
        write_json(&path, &req)?;
        written.push(path);
    }
    tracing::info!(seed, count, out_dir = %out_dir.display(), "sample");
    Ok(written)
}

fn batch(dir: &Path, out: &Path, cfg: &PlannerCfg) -> Result<()> {
    let mut inputs: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .filter(|p| !p.to_string_lossy().ends_with(".provenance.json"))
        .collect();
    inputs.sort();
    if inputs.is_empty() {
        bail!("no .json requests in {}", dir.display());
    }

    let mut files = Vec::with_capacity(inputs.len());
    let mut objects = Vec::with_capacity(inputs.len());
    let mut before = Vec::with_capacity(inputs.len());
    let mut after = Vec::with_capacity(inputs.len());
    let mut status = Vec::with_capacity(inputs.len());
    let mut moves = Vec::with_capacity(inputs.len());
    let mut remaining = Vec::with_capacity(inputs.len());
    for path in &inputs {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let req: OptimizeRequest = read_json(path)?;
        let locks = LockSet::capture(&req.current_layout, &req.locked_ids);
        let outcome = Scorecard::build(
            &req.current_layout,
            &req.room_dimensions,
            &locks,
            &cfg.constraints,
        )
        .and_then(|card| req.optimize(cfg).map(|res| (card, res)));
        match outcome {
            Ok((card, res)) => {
                files.push(name);
                objects.push(req.current_layout.len() as u32);
                before.push(card.score);
                after.push(res.layout_score);
                status.push(
                    match res.status {
                        Status::Resolved => "resolved",
                        Status::Unresolvable => "unresolvable",
                    }
                    .to_string(),
                );
                moves.push(res.moves.len() as u32);
                remaining.push(res.constraint_violations.len() as u32);
            }
            Err(err) => {
                tracing::warn!(file = %name, error = %err, "skipping invalid request");
            }
        }
    }

    let mut df = polars::df!(
        "file" => &files,
        "objects" => &objects,
        "score_before" => &before,
        "score_after" => &after,
        "status" => &status,
        "moves" => &moves,
        "remaining_violations" => &remaining
    )?;
    let mean_after = df.column("score_after")?.f64()?.mean();
    ensure_parent(out)?;
    let mut file = fs::File::create(out).with_context(|| format!("creating {}", out.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(
        rows = df.height(),
        skipped = inputs.len() - df.height(),
        mean_score = ?mean_after,
        out = %out.display(),
        "batch"
    );
    let sources: Vec<&Path> = inputs.iter().map(PathBuf::as_path).collect();
    write_sidecar(
        out,
        Run::new("batch", &sources, cfg).outcome(json!({
            "rows": df.height(),
            "skipped": inputs.len() - df.height(),
            "mean_score_after": mean_after,
        })),
    )?;
    Ok(())
}
