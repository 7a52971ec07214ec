use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lazysets::api::{ApproxCfg, ConvexSet, HPolygon, PolygonalOverapproximation, SetError};
use polars::prelude::*;
use serde_json::json;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod config;
mod expr;
mod provenance;

use config::ApproxSettings;
use expr::SetDoc;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Support queries and certified polygonal overapproximation")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Overapproximate a 2D set by a polygon and write its constraints
    Approximate {
        /// Set expression: a JSON file path or inline JSON
        #[arg(long)]
        set: String,
        #[arg(long)]
        eps: f64,
        /// Output table (.csv or .parquet)
        #[arg(long)]
        out: PathBuf,
        /// Optional JSON file overriding tolerances and guards
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the support function and a support vector
    Support {
        #[arg(long)]
        set: String,
        /// Comma-separated direction, e.g. "1,0"
        #[arg(long, allow_hyphen_values = true)]
        direction: String,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Approximate {
            set,
            eps,
            out,
            config,
        } => approximate(&set, eps, &out, config.as_deref()).map(|_| ()),
        Action::Support { set, direction } => support(&set, &direction),
        Action::Report => report(),
    }
}

/// Inline JSON or the contents of the file it names.
fn read_set_arg(arg: &str) -> Result<String> {
    let path = Path::new(arg);
    if path.is_file() {
        return std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    Ok(arg.to_string())
}

#[derive(Debug)]
struct Outcome {
    poly: HPolygon<f64>,
    certified: bool,
}

fn approximate(set: &str, eps: f64, out: &Path, config: Option<&Path>) -> Result<Outcome> {
    let text = read_set_arg(set)?;
    let settings = match config {
        Some(p) => ApproxSettings::load(p)?,
        None => ApproxSettings::default(),
    };
    let cfg: ApproxCfg<f64> = settings.to_cfg();
    tracing::info!(eps, out = %out.display(), "approximate");

    let s = SetDoc::parse(&text)?.build()?;
    let mut p = PolygonalOverapproximation::new(s, cfg)?;
    // A guard hit still leaves a valid (uncertified) overapproximation.
    let certified = match p.refine_until(&eps) {
        Ok(()) => true,
        Err(SetError::PrecisionNotAchieved {
            achieved,
            iterations,
        }) => {
            tracing::warn!(achieved, iterations, "tolerance not reached; writing partial result");
            p.finalize();
            false
        }
        Err(e) => return Err(e.into()),
    };
    let poly = p.to_hpolygon();
    tracing::info!(
        constraints = poly.len(),
        iterations = p.iterations(),
        max_error = p.max_error(),
        certified,
        "approximated"
    );

    let mut df = constraints_frame(&poly, p.vertices())?;
    write_frame(&mut df, out)?;

    let payload = provenance::Payload::new(json!({
        "set": serde_json::from_str::<serde_json::Value>(&text).unwrap_or(serde_json::Value::Null),
        "eps": eps,
        "settings": settings,
    }))
    .with_summary(json!({
        "constraints": poly.len(),
        "iterations": p.iterations(),
        "max_error": p.max_error(),
        "certified": certified,
    }));
    provenance::write_sidecar(out, payload)?;
    Ok(Outcome { poly, certified })
}

/// One row per constraint `nx·x + ny·y <= c`, with the vertex closing its edge.
fn constraints_frame(poly: &HPolygon<f64>, vertices: &[lazysets::Vec2<f64>]) -> Result<DataFrame> {
    let hs = &poly.constraints;
    let k: Vec<u32> = (0..hs.len() as u32).collect();
    let nx: Vec<f64> = hs.iter().map(|h| h.n.x).collect();
    let ny: Vec<f64> = hs.iter().map(|h| h.n.y).collect();
    let c: Vec<f64> = hs.iter().map(|h| h.c).collect();
    let vx: Vec<f64> = vertices.iter().map(|v| v.x).collect();
    let vy: Vec<f64> = vertices.iter().map(|v| v.y).collect();
    let df = df!(
        "k" => k,
        "nx" => nx,
        "ny" => ny,
        "c" => c,
        "vx" => vx,
        "vy" => vy,
    )?;
    Ok(df)
}

fn write_frame(df: &mut DataFrame, out: &Path) -> Result<()> {
    let ext = out.extension().and_then(|e| e.to_str());
    if !matches!(ext, Some("csv") | Some("parquet")) {
        bail!("unsupported output extension {ext:?} (use .csv or .parquet)");
    }
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    if ext == Some("csv") {
        CsvWriter::new(&mut file).finish(df)?;
    } else {
        ParquetWriter::new(file).finish(df)?;
    }
    Ok(())
}

fn parse_direction(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .map(|t| {
            t.trim()
                .parse::<f64>()
                .with_context(|| format!("bad direction component `{t}`"))
        })
        .collect()
}

fn support(set: &str, direction: &str) -> Result<()> {
    let s = SetDoc::parse(&read_set_arg(set)?)?.build()?;
    let d = lazysets::DVector::from_vec(parse_direction(direction)?);
    let sigma = s.support_vector(&d)?;
    let rho = s.support_function(&d)?;
    tracing::info!(dim = s.dim(), rho, "support");
    let obj = json!({
        "rho": rho,
        "sigma": sigma.iter().copied().collect::<Vec<f64>>(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn report() -> Result<()> {
    let mut obj = provenance::header();
    obj["params"] = json!({});
    obj["outputs"] = json!([]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DISK: &str = r#"{"type": "ball2", "center": [0, 0], "radius": 1}"#;

    #[test]
    fn approximate_writes_csv_and_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("disk.csv");
        let outcome = approximate(DISK, 0.1, &out, None).unwrap();
        assert!(outcome.certified);
        assert_eq!(outcome.poly.len(), 16);
        let df = LazyCsvReader::new(&out).finish().unwrap().collect().unwrap();
        assert_eq!(df.height(), 16);
        assert_eq!(df.width(), 6);
        assert!(provenance::provenance_path(&out).exists());
    }

    #[test]
    fn approximate_writes_parquet_from_file_input() {
        let dir = tempdir().unwrap();
        let set = dir.path().join("set.json");
        std::fs::write(
            &set,
            r#"{"type": "minkowski_sum", "sets": [
                {"type": "ball_inf", "center": [0, 0], "radius": 1},
                {"type": "singleton", "element": [2, 0]}
            ]}"#,
        )
        .unwrap();
        let out = dir.path().join("nested").join("box.parquet");
        let outcome = approximate(set.to_str().unwrap(), 0.01, &out, None).unwrap();
        assert_eq!(outcome.poly.len(), 4);
        let df = LazyFrame::scan_parquet(&out, Default::default())
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(df.height(), 4);
    }

    #[test]
    fn guard_in_config_yields_uncertified_result() {
        let dir = tempdir().unwrap();
        let cfg = dir.path().join("cfg.json");
        std::fs::write(&cfg, r#"{"max_iterations": 2}"#).unwrap();
        let out = dir.path().join("disk.csv");
        let outcome = approximate(DISK, 1e-4, &out, Some(&cfg)).unwrap();
        assert!(!outcome.certified);
        assert!(outcome.poly.len() >= 4);
        let prov: serde_json::Value =
            serde_json::from_slice(&std::fs::read(provenance::provenance_path(&out)).unwrap()).unwrap();
        assert_eq!(prov["summary"]["certified"], false);
    }

    #[test]
    fn unsupported_extension_and_unbounded_set_fail() {
        let dir = tempdir().unwrap();
        assert!(approximate(DISK, 0.1, &dir.path().join("disk.txt"), None).is_err());
        let half = r#"{"type": "half_space", "a": [1, 0], "b": 1}"#;
        let err = approximate(half, 0.1, &dir.path().join("h.csv"), None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SetError>(),
            Some(SetError::UnboundedDirection { .. })
        ));
    }

    #[test]
    fn direction_parsing() {
        assert_eq!(parse_direction("1, -0.5").unwrap(), vec![1.0, -0.5]);
        assert!(parse_direction("1,x").is_err());
        assert!(support(DISK, "1,0").is_ok());
        assert!(support(DISK, "1,0,0").is_err());
    }
}
