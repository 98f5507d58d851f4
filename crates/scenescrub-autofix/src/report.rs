//! Autofix report types: what each step changed, and what it skipped.

use scenescrub_analysis::PlannedRename;
use scenescrub_graph::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-mesh geometry cleanup results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupRecord {
    pub mesh: NodeId,
    pub name: String,
    pub doubles_merged: usize,
    pub degenerate_removed: usize,
    pub loose_removed: usize,
    pub vertices_before: usize,
    pub vertices_after: usize,
}

/// Per-mesh decimation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecimationRecord {
    pub mesh: NodeId,
    pub name: String,
    pub vertices_before: usize,
    pub vertices_after: usize,
    pub triangles_before: usize,
    pub triangles_after: usize,
    pub reduction_percent: f32,
    /// False when the floor stopped the collapse before the target.
    pub reached_target: bool,
}

/// A bone whose deform flag was cleared (or deliberately kept).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoneMarkRecord {
    pub bone: NodeId,
    pub name: String,
}

/// A UV channel or vertex group removed from a mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneRecord {
    pub mesh: String,
    pub name: String,
}

/// A shape-helper object removed from the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelperRecord {
    pub object: NodeId,
    pub name: String,
}

/// Autofix pipeline step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    Cleanup,
    Decimate,
    Rename,
    MarkBones,
    PruneUvChannels,
    PruneVertexGroups,
    RemoveHelpers,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::Cleanup => "cleanup",
            Step::Decimate => "decimate",
            Step::Rename => "rename",
            Step::MarkBones => "mark-bones",
            Step::PruneUvChannels => "prune-uv-channels",
            Step::PruneVertexGroups => "prune-vertex-groups",
            Step::RemoveHelpers => "remove-helpers",
        };
        f.write_str(label)
    }
}

/// A step whose precondition wasn't met for one target: logged, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skipped {
    pub step: Step,
    pub target: String,
    pub reason: String,
}

/// Counts of each mutation kind applied during one autofix run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutofixCounts {
    pub vertices_merged: usize,
    pub degenerate_triangles_removed: usize,
    pub loose_vertices_removed: usize,
    pub meshes_decimated: usize,
    pub nodes_renamed: usize,
    pub bones_marked_non_deform: usize,
    pub uv_channels_removed: usize,
    pub vertex_groups_removed: usize,
    pub helper_objects_removed: usize,
}

impl AutofixCounts {
    /// Total mutations across all kinds; zero means the run was a no-op.
    pub fn total(&self) -> usize {
        self.vertices_merged
            + self.degenerate_triangles_removed
            + self.loose_vertices_removed
            + self.meshes_decimated
            + self.nodes_renamed
            + self.bones_marked_non_deform
            + self.uv_channels_removed
            + self.vertex_groups_removed
            + self.helper_objects_removed
    }
}

/// Complete record of one autofix run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutofixReport {
    pub cleanup: Vec<CleanupRecord>,
    pub decimated: Vec<DecimationRecord>,
    pub renames: Vec<PlannedRename>,
    pub bones_marked: Vec<BoneMarkRecord>,
    /// Static bones left deform-capable because weighted groups bind them.
    pub bones_kept_for_skinning: Vec<BoneMarkRecord>,
    pub uv_channels_removed: Vec<PruneRecord>,
    pub vertex_groups_removed: Vec<PruneRecord>,
    pub helpers_removed: Vec<HelperRecord>,
    pub skipped: Vec<Skipped>,
    pub summary: AutofixCounts,
}

impl AutofixReport {
    /// Recomputes the summary from the step records.
    pub fn finalize(&mut self) {
        self.summary = AutofixCounts {
            vertices_merged: self.cleanup.iter().map(|c| c.doubles_merged).sum(),
            degenerate_triangles_removed: self
                .cleanup
                .iter()
                .map(|c| c.degenerate_removed)
                .sum(),
            loose_vertices_removed: self.cleanup.iter().map(|c| c.loose_removed).sum(),
            meshes_decimated: self.decimated.len(),
            nodes_renamed: self.renames.len(),
            bones_marked_non_deform: self.bones_marked.len(),
            uv_channels_removed: self.uv_channels_removed.len(),
            vertex_groups_removed: self.vertex_groups_removed.len(),
            helper_objects_removed: self.helpers_removed.len(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_counts_zero() {
        let mut report = AutofixReport::default();
        report.finalize();
        assert_eq!(report.summary.total(), 0);
    }

    #[test]
    fn test_finalize_sums_cleanup() {
        let mut report = AutofixReport::default();
        report.cleanup.push(CleanupRecord {
            mesh: NodeId::from_raw(1),
            name: "a".to_string(),
            doubles_merged: 3,
            degenerate_removed: 2,
            loose_removed: 1,
            vertices_before: 10,
            vertices_after: 6,
        });
        report.finalize();
        assert_eq!(report.summary.vertices_merged, 3);
        assert_eq!(report.summary.total(), 6);
    }
}
