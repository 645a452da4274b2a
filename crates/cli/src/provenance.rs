use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: the subcommand and its resolved parameters.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self { command, params }
    }
}

/// Write `<artifact>.provenance.json` with the git commit, library version,
/// callsite, command, params, and outputs.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "polyedit_version": polyedit::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "command": payload.command,
        "params": payload.params,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    tracing::debug!(path = %provenance_path.display(), "provenance sidecar");
    Ok(provenance_path)
}

/// `<dir>/<stem>.provenance.json`; a path without a file name uses `artifact`.
fn provenance_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map_or(Cow::Borrowed("artifact"), |s| s.to_string_lossy());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

pub fn current_git_rev() -> String {
    if let Some(from_env) = option_env!("GIT_COMMIT") {
        if !from_env.is_empty() {
            return from_env.to_string();
        }
    }
    if let Ok(env_override) = std::env::var("GIT_COMMIT") {
        if !env_override.is_empty() {
            return env_override;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn provenance_path_replaces_extension() {
        let base = Path::new("/tmp/output/cells.metrics.json");
        let derived = provenance_path(base);
        assert_eq!(derived, Path::new("/tmp/output/cells.metrics.provenance.json"));
    }

    #[test]
    fn provenance_path_without_stem() {
        assert_eq!(
            provenance_path(Path::new("/")),
            Path::new("/artifact.provenance.json")
        );
    }

    #[test]
    fn write_sidecar_records_command_and_output() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("sliced.json");
        fs::write(&artifact, "{}").unwrap();
        let payload = Payload::new("slice", json!({"id": "cell-1"}));
        let prov_path = write_sidecar(&artifact, payload).unwrap();
        assert!(prov_path.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(prov_path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["command"], "slice");
        assert_eq!(parsed["params"]["id"], "cell-1");
        assert_eq!(parsed["polyedit_version"], polyedit::VERSION);
        assert!(parsed["code_rev"].as_str().is_some_and(|r| !r.is_empty()));
        assert!(parsed["callsite"]["file"]
            .as_str()
            .is_some_and(|f| f.ends_with("provenance.rs")));
    }
}
