//! Scene complexity analysis for the scenescrub pipeline.
//!
//! Walks the scene graph, computes per-mesh and scene-wide metrics,
//! classifies bloat against configurable thresholds, detects static bones
//! and export-name collisions, and assembles everything into an
//! [`AnalysisReport`]. Analysis is pure: the graph is never mutated, and
//! identical input always produces an identical report.
//!
//! # Example
//!
//! ```
//! use scenescrub_analysis::analyze;
//! use scenescrub_graph::{SceneBuilder, Thresholds};
//!
//! let mut b = SceneBuilder::new();
//! let mesh = b.mesh("tri", vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], vec![[0, 1, 2]]);
//! b.mesh_object("tri", mesh);
//! let graph = b.build();
//!
//! let report = analyze(&graph, &Thresholds::default()).unwrap();
//! assert!(!report.has_critical());
//! ```

pub mod animation;
pub mod duplicates;
pub mod metrics;
pub mod report;
pub mod rules;

pub use animation::BoneStatus;
pub use duplicates::{CollisionGroup, Namespace, PlannedRename};
pub use metrics::{MeshMetrics, SceneTotals};
pub use report::{
    AnalysisReport, AnalysisSummary, DegenerateNote, MeshAssessment, Reason, SceneAssessment,
    Severity,
};
pub use rules::MeshRule;

use scenescrub_graph::{GraphResult, SceneGraph, Thresholds};

/// Analyzes the scene graph against the given thresholds.
///
/// Read-only. Malformed-but-parseable content (zero-vertex meshes,
/// zero-bone armatures) is downgraded to notes; only broken references
/// surface as errors.
pub fn analyze(graph: &SceneGraph, thresholds: &Thresholds) -> GraphResult<AnalysisReport> {
    let metric_set = metrics::collect(graph, thresholds)?;

    let mut meshes = Vec::with_capacity(metric_set.per_mesh.len());
    let mut notes = Vec::new();

    for mesh_metrics in &metric_set.per_mesh {
        if mesh_metrics.vertex_count == 0 {
            notes.push(DegenerateNote {
                node: mesh_metrics.mesh,
                name: mesh_metrics.name.clone(),
                detail: "degenerate mesh: no vertices".to_string(),
            });
            meshes.push(MeshAssessment {
                mesh: mesh_metrics.mesh,
                name: mesh_metrics.name.clone(),
                severity: Severity::Ok,
                reasons: Vec::new(),
            });
            continue;
        }
        meshes.push(rules::classify_mesh(mesh_metrics, thresholds));
    }

    for armature in &graph.armatures {
        if armature.bones.is_empty() {
            notes.push(DegenerateNote {
                node: armature.id,
                name: armature.name.clone(),
                detail: "degenerate armature: no bones".to_string(),
            });
        }
    }

    let scene = rules::classify_scene(&metric_set.totals, thresholds);
    let bones = animation::analyze_bones(graph, thresholds);
    let duplicates = duplicates::find_collisions(graph);

    let summary = AnalysisSummary {
        critical_count: meshes
            .iter()
            .filter(|a| a.severity == Severity::Critical)
            .count(),
        warning_count: meshes
            .iter()
            .filter(|a| a.severity == Severity::Warning)
            .count()
            + scene.reasons.len(),
        collision_count: duplicates.len(),
        static_bone_count: bones.iter().filter(|b| !b.animated).count(),
    };

    Ok(AnalysisReport {
        meshes,
        scene,
        duplicates,
        bones,
        notes,
        totals: metric_set.totals,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenescrub_graph::SceneBuilder;

    /// Grid of n x n vertices triangulated into 2(n-1)^2 triangles, one island.
    fn grid_mesh(n: usize) -> (Vec<[f32; 3]>, Vec<[u32; 3]>) {
        let mut positions = Vec::with_capacity(n * n);
        for y in 0..n {
            for x in 0..n {
                positions.push([x as f32, y as f32, 0.0]);
            }
        }
        let mut triangles = Vec::new();
        for y in 0..n - 1 {
            for x in 0..n - 1 {
                let a = (y * n + x) as u32;
                let b = a + 1;
                let c = a + n as u32;
                let d = c + 1;
                triangles.push([a, b, c]);
                triangles.push([b, d, c]);
            }
        }
        (positions, triangles)
    }

    #[test]
    fn test_oversized_mesh_reported_critical_scene_ok() {
        // 51 x 51 grid = 2601 vertices: over the critical limit, while the
        // scene total stays under budget.
        let mut b = SceneBuilder::new();
        let (positions, triangles) = grid_mesh(51);
        let mesh = b.mesh("rock", positions, triangles);
        b.mesh_object("rock", mesh);
        let graph = b.build();

        let report = analyze(&graph, &Thresholds::default()).unwrap();
        let assessment = report.assessment(mesh).unwrap();
        assert_eq!(assessment.severity, Severity::Critical);
        assert!(report.scene.passed);
        assert_eq!(report.summary.critical_count, 1);
    }

    #[test]
    fn test_zero_vertex_mesh_is_ok_with_note() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh("marker", vec![], vec![]);
        b.mesh_object("marker", mesh);
        let graph = b.build();

        let report = analyze(&graph, &Thresholds::default()).unwrap();
        assert_eq!(report.assessment(mesh).unwrap().severity, Severity::Ok);
        assert_eq!(report.notes.len(), 1);
        assert!(report.notes[0].detail.contains("no vertices"));
    }

    #[test]
    fn test_zero_bone_armature_noted() {
        let mut b = SceneBuilder::new();
        b.armature("empty_rig");
        let graph = b.build();

        let report = analyze(&graph, &Thresholds::default()).unwrap();
        assert_eq!(report.notes.len(), 1);
        assert!(report.notes[0].detail.contains("no bones"));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let mut b = SceneBuilder::new();
        let (positions, triangles) = grid_mesh(40);
        let mesh = b.mesh("prop", positions, triangles);
        b.mesh_object("Prop", mesh);
        b.object("Prop", None);
        let graph = b.build();

        let a = analyze(&graph, &Thresholds::default()).unwrap();
        let b2 = analyze(&graph, &Thresholds::default()).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b2).unwrap()
        );
    }

    #[test]
    fn test_scene_total_warning() {
        let mut b = SceneBuilder::new();
        // Eight 44x44 grids: 8 * 1936 = 15488 total vertices, each mesh over
        // the soft limit but under the hard one.
        for i in 0..8 {
            let (positions, triangles) = grid_mesh(44);
            let mesh = b.mesh(format!("tile_{i}"), positions, triangles);
            b.mesh_object(format!("tile_{i}"), mesh);
        }
        let graph = b.build();

        let report = analyze(&graph, &Thresholds::default()).unwrap();
        assert!(!report.scene.passed);
        assert_eq!(report.summary.critical_count, 0);
        assert!(report.has_warnings());
    }
}
