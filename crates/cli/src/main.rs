mod provenance;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use polyedit::prelude::*;
use provenance::{write_sidecar, Payload};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "polyedit-cli")]
#[command(about = "Batch driver for polygon segmentation edits")]
struct Cmd {
    /// Editor configuration (JSON, partial fields allowed)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Compute shape metrics for every external polygon
    Metrics {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Cut one polygon along the line through two points
    Slice {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        id: String,
        /// Line start as `x,y` (image coordinates)
        #[arg(long, value_parser = parse_point)]
        from: Point,
        /// Line end as `x,y` (image coordinates)
        #[arg(long, value_parser = parse_point)]
        to: Point,
        #[arg(long)]
        out: PathBuf,
    },
    /// Feed a recorded event list through the editor and save the result
    Replay {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        events: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(filter)
        .init();
    let cmd = Cmd::parse();
    let cfg = load_cfg(cmd.config.as_deref())?;
    match cmd.action {
        Action::Metrics { input, out } => metrics(&input, &out, cfg),
        Action::Slice {
            input,
            id,
            from,
            to,
            out,
        } => slice(&input, &id, from, to, &out, cfg),
        Action::Replay { input, events, out } => replay(&input, &events, &out, cfg),
        Action::Report => report(),
    }
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
    Ok(Point::new(x, y))
}

fn load_cfg(path: Option<&Path>) -> Result<EditorCfg> {
    let Some(path) = path else {
        return Ok(EditorCfg::default());
    };
    let raw = std::fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn load_data(path: &Path, ids: &mut IdGen) -> Result<SegmentationData> {
    let value = read_json(path)?;
    let data = SegmentationData::from_json(&value, ids);
    tracing::info!(
        input = %path.display(),
        polygons = data.polygons.len(),
        width = data.image.width,
        height = data.image.height,
        "loaded"
    );
    Ok(data)
}

fn write_json<T: Serialize>(out: &Path, value: &T) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let bytes = serde_json::to_vec_pretty(value)?;
    std::fs::write(out, bytes).with_context(|| format!("writing {}", out.display()))
}

#[derive(Serialize)]
struct MetricsRow {
    id: PolygonId,
    label: Option<String>,
    #[serde(flatten)]
    metrics: ShapeMetrics,
}

fn metrics(input: &Path, out: &Path, cfg: EditorCfg) -> Result<()> {
    let mut ids = IdGen::new(cfg.id_seed);
    let data = load_data(input, &mut ids)?;
    let rows: Vec<MetricsRow> = data
        .polygons
        .metrics()
        .into_iter()
        .map(|(id, metrics)| MetricsRow {
            label: data.polygons.get(&id).and_then(|p| p.label.clone()),
            id,
            metrics,
        })
        .collect();
    tracing::info!(rows = rows.len(), out = %out.display(), "metrics");
    write_json(out, &rows)?;
    write_sidecar(
        out,
        Payload::new(
            "metrics",
            serde_json::json!({ "input": input, "polygons": data.polygons.len() }),
        ),
    )?;
    Ok(())
}

fn slice(
    input: &Path,
    id: &str,
    from: Point,
    to: Point,
    out: &Path,
    cfg: EditorCfg,
) -> Result<()> {
    let mut ids = IdGen::new(cfg.id_seed);
    let data = load_data(input, &mut ids)?;
    let target = PolygonId::new(id);
    let Some(polygon) = data.polygons.get(&target).cloned() else {
        bail!("no polygon with id `{id}` in {}", input.display());
    };
    let sliced = data
        .polygons
        .sliced(&polygon, from, to, &mut ids)
        .with_context(|| format!("slicing `{id}`"))?;
    tracing::info!(id, polygons = sliced.len(), "sliced");
    let result = SegmentationData {
        polygons: sliced,
        image: data.image,
    };
    write_json(out, &result.to_json())?;
    write_sidecar(
        out,
        Payload::new(
            "slice",
            serde_json::json!({ "input": input, "id": id, "from": from, "to": to }),
        ),
    )?;
    Ok(())
}

#[derive(Debug, Default, Serialize)]
struct ReplaySummary {
    events: usize,
    committed: usize,
    rejected: usize,
    restored: usize,
}

fn replay(input: &Path, events: &Path, out: &Path, cfg: EditorCfg) -> Result<()> {
    let mut editor = Editor::new(cfg);
    editor.load_json(&read_json(input)?);
    let raw = std::fs::read(events).with_context(|| format!("reading {}", events.display()))?;
    let events_list: Vec<Event> = serde_json::from_slice(&raw)
        .with_context(|| format!("parsing events {}", events.display()))?;

    let mut summary = ReplaySummary {
        events: events_list.len(),
        ..ReplaySummary::default()
    };
    for (k, event) in events_list.into_iter().enumerate() {
        match editor.handle(event) {
            Ok(Outcome::Committed) => summary.committed += 1,
            Ok(Outcome::Restored) => summary.restored += 1,
            Ok(_) => {}
            Err(e) => {
                tracing::info!(index = k, error = %e, "event rejected");
                summary.rejected += 1;
            }
        }
    }
    tracing::info!(?summary, mode = ?editor.mode(), "replay finished");

    let result = SegmentationData {
        polygons: editor.polygons().clone(),
        image: editor.image(),
    };
    write_json(out, &result.to_json())?;
    write_sidecar(
        out,
        Payload::new(
            "replay",
            serde_json::json!({
                "input": input,
                "events": events,
                "config": editor.cfg(),
                "summary": summary,
            }),
        ),
    )?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "polyedit_version": polyedit::VERSION,
        "defaults": EditorCfg::default(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn seeded() -> EditorCfg {
        EditorCfg {
            id_seed: Some(3),
            ..EditorCfg::default()
        }
    }

    fn write_square(dir: &Path) -> PathBuf {
        let input = dir.join("in.json");
        let doc = json!({
            "polygons": [{"id": "sq", "type": "external",
                "points": [[0, 0], [10, 0], [10, 10], [0, 10]]}],
            "imageWidth": 10,
            "imageHeight": 10
        });
        std::fs::write(&input, serde_json::to_vec(&doc).unwrap()).unwrap();
        input
    }

    #[test]
    fn parse_point_accepts_pairs() {
        assert_eq!(parse_point("1.5, -2").unwrap(), Point::new(1.5, -2.0));
        assert!(parse_point("3").is_err());
        assert!(parse_point("a,1").is_err());
    }

    #[test]
    fn metrics_writes_rows_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = write_square(dir.path());
        let out = dir.path().join("out/metrics.json");
        metrics(&input, &out, seeded()).unwrap();
        let rows = read_json(&out).unwrap();
        assert_eq!(rows[0]["id"], "sq");
        assert_eq!(rows[0]["area"], 100.0);
        assert!(dir.path().join("out/metrics.provenance.json").exists());
    }

    #[test]
    fn slice_splits_square() {
        let dir = tempdir().unwrap();
        let input = write_square(dir.path());
        let out = dir.path().join("sliced.json");
        slice(
            &input,
            "sq",
            Point::new(5.0, -1.0),
            Point::new(5.0, 11.0),
            &out,
            seeded(),
        )
        .unwrap();
        let doc = read_json(&out).unwrap();
        assert_eq!(doc["polygons"].as_array().unwrap().len(), 2);
        assert!(slice(&input, "nope", Point::default(), Point::new(1.0, 1.0), &out, seeded()).is_err());
    }

    #[test]
    fn replay_runs_events() {
        let dir = tempdir().unwrap();
        let input = write_square(dir.path());
        let events = dir.path().join("events.json");
        let script = json!([
            {"event": "select_mode", "mode": "DeletePolygon"},
            {"event": "pointer_down", "pos": {"x": 5, "y": 5}},
            {"event": "undo"},
            {"event": "select_mode", "mode": "Slice"},
            {"event": "pointer_down", "pos": {"x": 5, "y": 5}},
            {"event": "pointer_down", "pos": {"x": -1, "y": 20}},
            {"event": "pointer_down", "pos": {"x": 11, "y": 20}}
        ]);
        std::fs::write(&events, serde_json::to_vec(&script).unwrap()).unwrap();
        let out = dir.path().join("replayed.json");
        replay(&input, &events, &out, seeded()).unwrap();
        let doc = read_json(&out).unwrap();
        assert_eq!(doc["polygons"].as_array().unwrap().len(), 1);
        let prov = read_json(&dir.path().join("replayed.provenance.json")).unwrap();
        assert_eq!(prov["params"]["summary"]["committed"], 1);
        assert_eq!(prov["params"]["summary"]["restored"], 1);
        assert_eq!(prov["params"]["summary"]["rejected"], 1);
    }
}
