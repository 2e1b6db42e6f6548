//! `<artifact>.provenance.json` sidecars: which build, which inputs and which
//! planner settings produced an artifact.

use anyhow::{Context, Result};
use roomplan::api::PlannerCfg;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Code revision and versions of the binary.
#[derive(Debug, Serialize)]
pub struct Build {
    pub code_rev: String,
    pub engine_version: &'static str,
    pub cli_version: &'static str,
}

impl Build {
    pub fn current() -> Self {
        Self {
            code_rev: current_git_rev(),
            engine_version: roomplan::VERSION,
            cli_version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// One planner run as recorded next to its output.
#[derive(Debug, Serialize)]
pub struct Run<'a> {
    pub command: &'static str,
    pub inputs: Vec<String>,
    pub config: &'a PlannerCfg,
    /// Command-specific summary: final status, score, row count.
    pub outcome: Value,
}

impl<'a> Run<'a> {
    pub fn new(command: &'static str, inputs: &[&Path], config: &'a PlannerCfg) -> Self {
        Self {
            command,
            inputs: inputs.iter().map(|p| p.to_string_lossy().into_owned()).collect(),
            config,
            outcome: Value::Null,
        }
    }

    pub fn outcome(mut self, outcome: Value) -> Self {
        self.outcome = outcome;
        self
    }
}

#[derive(Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    #[serde(flatten)]
    build: Build,
    callsite: Callsite,
    run: Run<'a>,
    output: String,
}

/// Write the sidecar for `artifact` and return its path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, run: Run<'_>) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = sidecar_path(artifact);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating provenance dir {}", parent.display()))?;
    }
    let caller = Location::caller();
    let doc = Sidecar {
        build: Build::current(),
        callsite: Callsite {
            file: caller.file(),
            line: caller.line(),
        },
        run,
        output: artifact.to_string_lossy().into_owned(),
    };
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map_or_else(|| "artifact".into(), |s| s.to_string_lossy().into_owned());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` (build time, then run time) or `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    let baked = option_env!("GIT_COMMIT").map(str::to_string);
    let runtime = std::env::var("GIT_COMMIT").ok();
    if let Some(rev) = baked.into_iter().chain(runtime).find(|r| !r.is_empty()) {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_the_artifact() {
        let derived = sidecar_path(Path::new("/tmp/output/scores.csv"));
        assert_eq!(derived, Path::new("/tmp/output/scores.provenance.json"));
    }

    #[test]
    fn sidecar_records_run_and_build() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("result.json");
        fs::write(&artifact, "{}").unwrap();
        let cfg = PlannerCfg::default();
        let run = Run::new("optimize", &[Path::new("request.json")], &cfg)
            .outcome(json!({"status": "resolved", "layout_score": 100.0}));
        let path = write_sidecar(&artifact, run).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["output"], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["engine_version"], roomplan::VERSION);
        assert_eq!(parsed["run"]["command"], "optimize");
        assert_eq!(parsed["run"]["inputs"][0], "request.json");
        assert_eq!(parsed["run"]["outcome"]["status"], "resolved");
        assert_eq!(parsed["run"]["config"]["solver"]["max_iterations"], 8);
        assert!(parsed["callsite"]["line"].as_u64().is_some());
    }
}
