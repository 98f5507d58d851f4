//! Threshold configuration threaded through analysis and autofix.

use serde::{Deserialize, Serialize};

/// Tunable limits and epsilons for classification and repair.
///
/// Passed explicitly to `analyze`/`autofix` so a run is reentrant and tests
/// can vary limits per call; there is no process-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Per-mesh vertex count above which classification is CRITICAL.
    pub critical_vertex_limit: usize,
    /// Per-mesh vertex count above which classification is WARNING.
    pub warning_vertex_limit: usize,
    /// Scene-wide vertex budget; exceeding it is a scene-level WARNING.
    pub scene_vertex_limit: usize,
    /// Vertex count decimation reduces toward.
    pub decimate_target: usize,
    /// Island count beyond which the repetitive-detail rule can fire.
    pub repetitive_island_limit: usize,
    /// Vertices-per-island cutoff for the repetitive-detail rule.
    pub repetitive_vertex_limit: usize,
    /// Distance within which geometry cleanup merges vertices.
    pub merge_distance: f32,
    /// Triangle area below which a face counts as degenerate.
    pub degenerate_area: f32,
    /// Weight below which a vertex group entry counts as zero.
    pub weight_epsilon: f32,
    /// Keyframe value spread below which a channel counts as constant.
    pub static_epsilon: f32,
    /// Decimation never reduces a mesh below this many vertices.
    pub decimate_floor_vertices: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            critical_vertex_limit: 2000,
            warning_vertex_limit: 1000,
            scene_vertex_limit: 15_000,
            decimate_target: 1600,
            repetitive_island_limit: 10,
            repetitive_vertex_limit: 50,
            merge_distance: 1e-4,
            degenerate_area: 1e-8,
            weight_epsilon: 1e-4,
            static_epsilon: 1e-2,
            decimate_floor_vertices: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = Thresholds::default();
        assert_eq!(t.critical_vertex_limit, 2000);
        assert_eq!(t.warning_vertex_limit, 1000);
        assert_eq!(t.scene_vertex_limit, 15_000);
        assert_eq!(t.decimate_target, 1600);
    }

    #[test]
    fn test_partial_json_overrides() {
        let t: Thresholds = serde_json::from_str(r#"{"critical_vertex_limit": 500}"#).unwrap();
        assert_eq!(t.critical_vertex_limit, 500);
        assert_eq!(t.warning_vertex_limit, 1000);
    }
}
