//! Approximation settings read from an optional JSON file.

use std::path::Path;

use anyhow::{Context, Result};
use lazysets::api::ApproxCfg;
use serde::{Deserialize, Serialize};

/// Overrides for `ApproxCfg<f64>`; absent fields keep the library defaults.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ApproxSettings {
    pub tol: Option<f64>,
    pub redundancy_tol: Option<f64>,
    pub max_iterations: Option<usize>,
    pub max_depth: Option<usize>,
}

impl ApproxSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn to_cfg(&self) -> ApproxCfg<f64> {
        let d = ApproxCfg::default();
        ApproxCfg {
            tol: self.tol.unwrap_or(d.tol),
            redundancy_tol: self.redundancy_tol.unwrap_or(d.redundancy_tol),
            max_iterations: self.max_iterations.unwrap_or(d.max_iterations),
            max_depth: self.max_depth.unwrap_or(d.max_depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"max_depth": 8}"#).unwrap();
        let s = ApproxSettings::load(&path).unwrap();
        let cfg = s.to_cfg();
        assert_eq!(cfg.max_depth, 8);
        assert_eq!(cfg.max_iterations, ApproxCfg::<f64>::default().max_iterations);
        assert_eq!(cfg.tol, 1e-12);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"max_dept": 8}"#).unwrap();
        assert!(ApproxSettings::load(&path).is_err());
        assert!(ApproxSettings::load(&dir.path().join("missing.json")).is_err());
    }
}
