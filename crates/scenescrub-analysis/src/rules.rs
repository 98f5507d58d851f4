//! Bloat classification rules.
//!
//! Rules run in priority order per mesh: the first rule that matches fixes
//! the severity, and every matching rule contributes a recorded reason, so
//! the report always shows the full set of triggered checks.

use crate::metrics::{MeshMetrics, SceneTotals};
use crate::report::{MeshAssessment, Reason, SceneAssessment, Severity};
use scenescrub_graph::Thresholds;

/// A classification rule evaluated against one mesh's metrics.
pub trait MeshRule: Send + Sync {
    /// Unique identifier (e.g., "bloat/oversized").
    fn id(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// Severity this rule carries when it matches.
    fn severity(&self) -> Severity;

    /// Run the check, returning a reason if the rule triggers.
    fn check(&self, metrics: &MeshMetrics, thresholds: &Thresholds) -> Option<Reason>;
}

/// Vertex count beyond the hard per-mesh budget.
pub struct OversizedRule;

impl MeshRule for OversizedRule {
    fn id(&self) -> &'static str {
        "bloat/oversized"
    }

    fn description(&self) -> &'static str {
        "Detects meshes whose vertex count exceeds the critical budget"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn check(&self, metrics: &MeshMetrics, thresholds: &Thresholds) -> Option<Reason> {
        if metrics.vertex_count <= thresholds.critical_vertex_limit {
            return None;
        }
        Some(
            Reason::new(
                self.id(),
                self.severity(),
                format!(
                    "'{}' has {} vertices (limit: {})",
                    metrics.name, metrics.vertex_count, thresholds.critical_vertex_limit
                ),
                "Decimate or replace with baked texture",
            )
            .with_actual_value(format!("{} vertices", metrics.vertex_count))
            .with_expected_range(format!("<= {} vertices", thresholds.critical_vertex_limit)),
        )
    }
}

/// Many islands, each carrying high vertex counts: repeated detail that
/// should be instanced or baked instead of modeled.
pub struct RepetitiveDetailRule;

impl MeshRule for RepetitiveDetailRule {
    fn id(&self) -> &'static str {
        "bloat/repetitive-detail"
    }

    fn description(&self) -> &'static str {
        "Detects repeated high-vertex geometry islands"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn check(&self, metrics: &MeshMetrics, thresholds: &Thresholds) -> Option<Reason> {
        if metrics.island_count <= thresholds.repetitive_island_limit {
            return None;
        }
        let verts_per_island = metrics.vertex_count as f64 / metrics.island_count.max(1) as f64;
        if verts_per_island <= thresholds.repetitive_vertex_limit as f64 {
            return None;
        }
        Some(
            Reason::new(
                self.id(),
                self.severity(),
                format!(
                    "'{}' has {} islands x {:.0} vertices each",
                    metrics.name, metrics.island_count, verts_per_island
                ),
                "Merge islands or use instancing/texture",
            )
            .with_actual_value(format!("{} islands", metrics.island_count))
            .with_expected_range(format!(
                "<= {} islands above {} vertices each",
                thresholds.repetitive_island_limit, thresholds.repetitive_vertex_limit
            )),
        )
    }
}

/// Vertex count above the soft per-mesh budget.
pub struct HighVertexRule;

impl MeshRule for HighVertexRule {
    fn id(&self) -> &'static str {
        "bloat/high-verts"
    }

    fn description(&self) -> &'static str {
        "Warns about meshes above the soft vertex budget"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, metrics: &MeshMetrics, thresholds: &Thresholds) -> Option<Reason> {
        if metrics.vertex_count <= thresholds.warning_vertex_limit {
            return None;
        }
        Some(
            Reason::new(
                self.id(),
                self.severity(),
                format!("'{}' has {} vertices", metrics.name, metrics.vertex_count),
                "Consider simplifying",
            )
            .with_actual_value(format!("{} vertices", metrics.vertex_count))
            .with_expected_range(format!("<= {} vertices", thresholds.warning_vertex_limit)),
        )
    }
}

/// Skinned mesh whose object is parented below something other than the
/// armature root. Parent transforms do not affect skinned meshes in glTF,
/// so these end up positioned unexpectedly after export.
pub struct NonRootSkinnedRule;

impl MeshRule for NonRootSkinnedRule {
    fn id(&self) -> &'static str {
        "skin/non-root-parent"
    }

    fn description(&self) -> &'static str {
        "Detects skinned meshes not parented at the armature root"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, metrics: &MeshMetrics, _thresholds: &Thresholds) -> Option<Reason> {
        if !metrics.is_skinned || metrics.parent_is_root {
            return None;
        }
        Some(Reason::new(
            self.id(),
            self.severity(),
            format!("skinned mesh '{}' is not parented at the armature root", metrics.name),
            "Apply parent transforms or reparent to the armature root",
        ))
    }
}

/// All mesh rules in priority order: critical rules first, so the first
/// match fixes the assessment severity.
pub fn all_rules() -> Vec<Box<dyn MeshRule>> {
    vec![
        Box::new(OversizedRule),
        Box::new(RepetitiveDetailRule),
        Box::new(HighVertexRule),
        Box::new(NonRootSkinnedRule),
    ]
}

/// Classifies one mesh against the full rule set.
pub fn classify_mesh(metrics: &MeshMetrics, thresholds: &Thresholds) -> MeshAssessment {
    let mut severity = Severity::Ok;
    let mut reasons = Vec::new();

    for rule in all_rules() {
        if let Some(reason) = rule.check(metrics, thresholds) {
            if reasons.is_empty() {
                severity = rule.severity();
            }
            reasons.push(reason);
        }
    }

    MeshAssessment {
        mesh: metrics.mesh,
        name: metrics.name.clone(),
        severity,
        reasons,
    }
}

/// Classifies the scene aggregate against the scene-wide vertex budget.
pub fn classify_scene(totals: &SceneTotals, thresholds: &Thresholds) -> SceneAssessment {
    let mut reasons = Vec::new();
    if totals.vertex_count > thresholds.scene_vertex_limit {
        reasons.push(
            Reason::new(
                "bloat/scene-total",
                Severity::Warning,
                format!(
                    "scene has {} vertices (target: < {})",
                    totals.vertex_count, thresholds.scene_vertex_limit
                ),
                "Review all meshes for optimization opportunities",
            )
            .with_actual_value(format!("{} vertices", totals.vertex_count))
            .with_expected_range(format!("< {} vertices", thresholds.scene_vertex_limit)),
        );
    }
    SceneAssessment {
        total_vertices: totals.vertex_count,
        passed: reasons.is_empty(),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scenescrub_graph::NodeId;

    fn metrics(vertex_count: usize, island_count: usize) -> MeshMetrics {
        MeshMetrics {
            mesh: NodeId::from_raw(1),
            name: "prop".to_string(),
            vertex_count,
            triangle_count: vertex_count / 3,
            island_count,
            is_skinned: false,
            parent_is_root: true,
            instance_count: 1,
        }
    }

    #[test]
    fn test_small_single_island_mesh_is_ok() {
        let a = classify_mesh(&metrics(800, 1), &Thresholds::default());
        assert_eq!(a.severity, Severity::Ok);
        assert!(a.reasons.is_empty());
    }

    #[test]
    fn test_oversized_is_critical() {
        let a = classify_mesh(&metrics(2500, 1), &Thresholds::default());
        assert_eq!(a.severity, Severity::Critical);
        assert_eq!(a.reasons[0].rule_id, "bloat/oversized");
        // The soft budget also triggered; its reason is still recorded.
        assert!(a.reasons.iter().any(|r| r.rule_id == "bloat/high-verts"));
    }

    #[test]
    fn test_high_verts_is_warning() {
        let a = classify_mesh(&metrics(1500, 1), &Thresholds::default());
        assert_eq!(a.severity, Severity::Warning);
        assert_eq!(a.reasons.len(), 1);
        assert_eq!(a.reasons[0].rule_id, "bloat/high-verts");
    }

    #[test]
    fn test_repetitive_detail_is_critical() {
        // 12 islands x 100 verts each: below the hard per-mesh limit but
        // clearly repeated geometry.
        let a = classify_mesh(&metrics(1200, 12), &Thresholds::default());
        assert_eq!(a.severity, Severity::Critical);
        assert!(a
            .reasons
            .iter()
            .any(|r| r.rule_id == "bloat/repetitive-detail"));
    }

    #[test]
    fn test_many_small_islands_not_repetitive() {
        let a = classify_mesh(&metrics(600, 20), &Thresholds::default());
        assert_eq!(a.severity, Severity::Ok);
    }

    #[test]
    fn test_skinned_non_root_parent_is_additive_warning() {
        let mut m = metrics(1500, 1);
        m.is_skinned = true;
        m.parent_is_root = false;
        let a = classify_mesh(&m, &Thresholds::default());
        assert_eq!(a.severity, Severity::Warning);
        assert_eq!(a.reasons.len(), 2);
        assert!(a.reasons.iter().any(|r| r.rule_id == "skin/non-root-parent"));
    }

    #[test]
    fn test_scene_total_rule() {
        let totals = SceneTotals {
            vertex_count: 20_000,
            mesh_count: 4,
            bone_count: 0,
            action_count: 0,
        };
        let scene = classify_scene(&totals, &Thresholds::default());
        assert!(!scene.passed);
        assert_eq!(scene.reasons[0].rule_id, "bloat/scene-total");

        let small = SceneTotals {
            vertex_count: 500,
            ..totals
        };
        assert!(classify_scene(&small, &Thresholds::default()).passed);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = Thresholds {
            critical_vertex_limit: 100,
            warning_vertex_limit: 50,
            ..Thresholds::default()
        };
        let a = classify_mesh(&metrics(120, 1), &thresholds);
        assert_eq!(a.severity, Severity::Critical);
    }
}
