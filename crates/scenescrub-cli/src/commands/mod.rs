//! Subcommand implementations.

pub mod analyze;
pub mod autofix;

use anyhow::{Context, Result};
use scenescrub_graph::{document, SceneGraph, Thresholds};
use std::path::Path;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Loads the host scene document from disk.
pub(crate) fn load_graph(path: &Path) -> Result<SceneGraph> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scene document {}", path.display()))?;
    document::load_scene(&json)
        .with_context(|| format!("failed to load scene document {}", path.display()))
}

/// Loads a thresholds override file, or the defaults when none is given.
/// Override files are partial: absent fields keep their defaults.
pub(crate) fn load_thresholds(path: Option<&Path>) -> Result<Thresholds> {
    let Some(path) = path else {
        return Ok(Thresholds::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read thresholds file {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("failed to parse thresholds file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_thresholds_without_file() {
        let t = load_thresholds(None).unwrap();
        assert_eq!(t, Thresholds::default());
    }

    #[test]
    fn test_partial_thresholds_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"decimate_target": 900}}"#).unwrap();
        let t = load_thresholds(Some(file.path())).unwrap();
        assert_eq!(t.decimate_target, 900);
        assert_eq!(t.critical_vertex_limit, 2000);
    }

    #[test]
    fn test_missing_scene_file_is_an_error() {
        assert!(load_graph(Path::new("/nonexistent/scene.json")).is_err());
    }
}
