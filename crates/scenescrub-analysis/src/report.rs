//! Analysis report types for structured output.

use crate::animation::BoneStatus;
use crate::duplicates::CollisionGroup;
use crate::metrics::SceneTotals;
use scenescrub_graph::NodeId;
use serde::{Deserialize, Serialize};

/// Severity classification for a mesh or the scene aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Within budget, nothing to do.
    Ok,
    /// Likely bloated, worth reviewing before export.
    Warning,
    /// Must be fixed before export.
    Critical,
}

/// A single triggered classification rule.
///
/// Severity classification is "first match wins", but every triggered rule
/// is recorded here so reports and tests see the full picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reason {
    /// Rule identifier (e.g., "bloat/oversized").
    pub rule_id: String,

    /// Severity the rule carries on its own.
    pub severity: Severity,

    /// Human-readable description of what triggered.
    pub message: String,

    /// Human-readable explanation of how to fix.
    pub suggestion: String,

    /// Measured value that triggered the rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<String>,

    /// Expected or acceptable range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_range: Option<String>,
}

impl Reason {
    /// Creates a new reason with required fields.
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            suggestion: suggestion.into(),
            actual_value: None,
            expected_range: None,
        }
    }

    /// Builder method to set the measured value.
    pub fn with_actual_value(mut self, value: impl Into<String>) -> Self {
        self.actual_value = Some(value.into());
        self
    }

    /// Builder method to set the acceptable range.
    pub fn with_expected_range(mut self, range: impl Into<String>) -> Self {
        self.expected_range = Some(range.into());
        self
    }
}

/// Classification result for one mesh data block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshAssessment {
    pub mesh: NodeId,
    pub name: String,
    pub severity: Severity,
    /// Every rule that triggered, in priority order.
    pub reasons: Vec<Reason>,
}

/// Scene-level aggregate classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneAssessment {
    pub total_vertices: usize,
    pub passed: bool,
    pub reasons: Vec<Reason>,
}

/// A degenerate-geometry note: recorded, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegenerateNote {
    pub node: NodeId,
    pub name: String,
    pub detail: String,
}

/// Summary statistics for an analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub critical_count: usize,
    pub warning_count: usize,
    pub collision_count: usize,
    pub static_bone_count: usize,
}

/// Complete analysis report, consumed by the autofix executor and by the
/// presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub meshes: Vec<MeshAssessment>,
    pub scene: SceneAssessment,
    pub duplicates: Vec<CollisionGroup>,
    pub bones: Vec<BoneStatus>,
    pub notes: Vec<DegenerateNote>,
    pub totals: SceneTotals,
    pub summary: AnalysisSummary,
}

impl AnalysisReport {
    /// Assessment for a specific mesh data block, if it was analyzed.
    pub fn assessment(&self, mesh: NodeId) -> Option<&MeshAssessment> {
        self.meshes.iter().find(|a| a.mesh == mesh)
    }

    /// True if any mesh classified CRITICAL.
    pub fn has_critical(&self) -> bool {
        self.summary.critical_count > 0
    }

    /// True if any mesh- or scene-level WARNING fired.
    pub fn has_warnings(&self) -> bool {
        self.summary.warning_count > 0 || !self.scene.passed
    }

    /// Bones classified static, in armature order.
    pub fn static_bones(&self) -> impl Iterator<Item = &BoneStatus> {
        self.bones.iter().filter(|b| !b.animated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Ok < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
    }

    #[test]
    fn test_reason_builder() {
        let reason = Reason::new(
            "bloat/oversized",
            Severity::Critical,
            "2,500 verts",
            "Decimate or replace with baked texture",
        )
        .with_actual_value("2500")
        .with_expected_range("<= 2000");

        assert_eq!(reason.rule_id, "bloat/oversized");
        assert_eq!(reason.actual_value, Some("2500".to_string()));
        assert_eq!(reason.expected_range, Some("<= 2000".to_string()));
    }
}
