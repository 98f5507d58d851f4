//! Rule-driven scene repair for the scenescrub pipeline.
//!
//! Consumes an [`AnalysisReport`](scenescrub_analysis::AnalysisReport) and
//! applies a fixed sequence of graph mutations: geometry cleanup, decimation
//! of over-budget meshes, duplicate renaming, static-bone marking, and
//! unused-data pruning. Every step is individually idempotent, so running
//! autofix on an already-fixed graph reports zero mutations. Per-item
//! failures become skip records; only broken graph references abort the run.
//!
//! Autofix never runs implicitly: callers invoke [`autofix`] explicitly
//! after deciding the report warrants it.

pub mod bones;
pub mod cleanup;
pub mod decimate;
pub mod helpers;
pub mod quadric;
pub mod rename;
pub mod report;
pub mod uv;
pub mod vertex_groups;

pub use report::{
    AutofixCounts, AutofixReport, BoneMarkRecord, CleanupRecord, DecimationRecord, HelperRecord,
    PruneRecord, Skipped, Step,
};

use scenescrub_analysis::{AnalysisReport, Severity};
use scenescrub_graph::{GraphResult, SceneGraph, Thresholds};
use tracing::info;

/// Rules whose reasons mark a mesh as over the vertex budget; only these
/// select a mesh for decimation.
const VERTEX_RULES: [&str; 2] = ["bloat/oversized", "bloat/high-verts"];

/// Applies the full mutation sequence to `graph` per the analysis report.
pub fn autofix(
    graph: &mut SceneGraph,
    analysis: &AnalysisReport,
    thresholds: &Thresholds,
) -> GraphResult<AutofixReport> {
    let mut out = AutofixReport::default();

    // 1. Geometry cleanup on every mesh worth touching.
    for mesh in &mut graph.meshes {
        if mesh.vertex_count() < cleanup::MIN_CLEANUP_VERTICES {
            continue;
        }
        let before = mesh.vertex_count();
        let stats = cleanup::cleanup_mesh(mesh, thresholds);
        if stats.changed() {
            out.cleanup.push(CleanupRecord {
                mesh: mesh.id,
                name: mesh.name.clone(),
                doubles_merged: stats.doubles_merged,
                degenerate_removed: stats.degenerate_removed,
                loose_removed: stats.loose_removed,
                vertices_before: before,
                vertices_after: mesh.vertex_count(),
            });
        }
    }

    // 2. Decimate meshes flagged over the vertex budget.
    for assessment in &analysis.meshes {
        if assessment.severity == Severity::Ok {
            continue;
        }
        if !assessment
            .reasons
            .iter()
            .any(|r| VERTEX_RULES.contains(&r.rule_id.as_str()))
        {
            continue;
        }

        let Ok(mesh) = graph.mesh_mut(assessment.mesh) else {
            out.skipped.push(Skipped {
                step: Step::Decimate,
                target: assessment.name.clone(),
                reason: "mesh no longer exists".to_string(),
            });
            continue;
        };

        // Cleanup may already have brought the mesh under target.
        if mesh.vertex_count() <= thresholds.decimate_target {
            out.skipped.push(Skipped {
                step: Step::Decimate,
                target: mesh.name.clone(),
                reason: format!(
                    "already at or below target ({} <= {})",
                    mesh.vertex_count(),
                    thresholds.decimate_target
                ),
            });
            continue;
        }

        let outcome = decimate::decimate_to_target(mesh, thresholds.decimate_target, thresholds);
        if outcome.changed() {
            let reduction = (outcome.vertices_before - outcome.vertices_after) as f32
                / outcome.vertices_before as f32
                * 100.0;
            out.decimated.push(DecimationRecord {
                mesh: assessment.mesh,
                name: mesh.name.clone(),
                vertices_before: outcome.vertices_before,
                vertices_after: outcome.vertices_after,
                triangles_before: outcome.triangles_before,
                triangles_after: outcome.triangles_after,
                reduction_percent: reduction,
                reached_target: outcome.reached_target,
            });
        }
        if !outcome.reached_target {
            out.skipped.push(Skipped {
                step: Step::Decimate,
                target: mesh.name.clone(),
                reason: format!(
                    "stopped at {} vertices before reaching target {}",
                    outcome.vertices_after, thresholds.decimate_target
                ),
            });
        }
    }

    // 3. Duplicate renaming.
    out.renames = rename::apply_renames(graph, &analysis.duplicates);

    // 4. Static-bone marking with orphan-weight safety.
    let (marked, kept) = bones::mark_static_bones(graph, analysis, thresholds);
    out.bones_marked = marked;
    out.bones_kept_for_skinning = kept;

    // 5 + 6. Unused data pruning.
    out.uv_channels_removed = uv::prune_unused_uv_channels(graph)?;
    out.vertex_groups_removed = vertex_groups::prune_empty_vertex_groups(graph, thresholds);

    // 7. Shape-helper removal.
    out.helpers_removed = helpers::remove_shape_helpers(graph, thresholds);

    out.finalize();
    info!(
        mutations = out.summary.total(),
        skipped = out.skipped.len(),
        "autofix complete"
    );
    Ok(out)
}
