//! Static-bone deform clearing.
//!
//! Bones the animation analyzer found static stop contributing to exported
//! skin data. The orphan-weight safety check is mandatory: a bone bound by a
//! vertex group with live weights keeps its deform flag no matter what the
//! animation analysis said, otherwise those weights would be orphaned.

use crate::report::BoneMarkRecord;
use scenescrub_analysis::AnalysisReport;
use scenescrub_graph::{SceneGraph, Thresholds};
use std::collections::HashSet;
use tracing::debug;

/// Clears `deform` on safe static bones.
///
/// Returns `(marked, kept)`: bones actually flipped this run, and static
/// bones deliberately left deform-capable because weighted groups bind them.
pub fn mark_static_bones(
    graph: &mut SceneGraph,
    report: &AnalysisReport,
    thresholds: &Thresholds,
) -> (Vec<BoneMarkRecord>, Vec<BoneMarkRecord>) {
    let weighted_names = weighted_group_names(graph, thresholds.weight_epsilon);
    let static_ids: HashSet<_> = report.static_bones().map(|s| s.bone).collect();

    let mut marked = Vec::new();
    let mut kept = Vec::new();

    for armature in &mut graph.armatures {
        for bone in &mut armature.bones {
            if !static_ids.contains(&bone.id) || !bone.deform {
                continue;
            }
            if weighted_names.contains(&bone.name) {
                kept.push(BoneMarkRecord {
                    bone: bone.id,
                    name: bone.name.clone(),
                });
                continue;
            }
            bone.deform = false;
            debug!(bone = %bone.name, "marked static bone non-deform");
            marked.push(BoneMarkRecord {
                bone: bone.id,
                name: bone.name.clone(),
            });
        }
    }

    (marked, kept)
}

/// Names of vertex groups with live weights anywhere in the scene. Vertex
/// groups are named after the bones they bind, so this is the set of bones
/// skinning actually uses.
fn weighted_group_names(graph: &SceneGraph, epsilon: f32) -> HashSet<String> {
    let mut names = HashSet::new();
    for mesh in &graph.meshes {
        for group in &mesh.vertex_groups {
            if group.has_weights(epsilon) {
                names.insert(group.name.clone());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenescrub_analysis::analyze;
    use scenescrub_graph::{ChannelProperty, SceneBuilder};

    #[test]
    fn test_marks_unweighted_static_bone() {
        let mut b = SceneBuilder::new();
        let arm = b.armature("rig");
        b.bone(arm, "helper", None);
        b.action("idle");
        let mut graph = b.build();

        let thresholds = Thresholds::default();
        let report = analyze(&graph, &thresholds).unwrap();
        let (marked, kept) = mark_static_bones(&mut graph, &report, &thresholds);

        assert_eq!(marked.len(), 1);
        assert!(kept.is_empty());
        assert!(!graph.armatures[0].bones[0].deform);
    }

    #[test]
    fn test_orphan_weight_safety() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh(
            "body",
            vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
        );
        b.vertex_group(mesh, "spine", vec![(0, 0.9)]);
        let arm = b.armature("rig");
        b.bone(arm, "spine", None);
        let mut graph = b.build();

        let thresholds = Thresholds::default();
        let report = analyze(&graph, &thresholds).unwrap();
        // "spine" has zero channels, so it is static; but its weights are
        // live, so deform must survive.
        assert_eq!(report.summary.static_bone_count, 1);

        let (marked, kept) = mark_static_bones(&mut graph, &report, &thresholds);
        assert!(marked.is_empty());
        assert_eq!(kept.len(), 1);
        assert!(graph.armatures[0].bones[0].deform);
    }

    #[test]
    fn test_animated_bone_untouched() {
        let mut b = SceneBuilder::new();
        let arm = b.armature("rig");
        let spine = b.bone(arm, "spine", None);
        let act = b.action("walk");
        b.channel(act, spine, ChannelProperty::Rotation, &[(1.0, 0.0), (9.0, 1.0)]);
        let mut graph = b.build();

        let thresholds = Thresholds::default();
        let report = analyze(&graph, &thresholds).unwrap();
        let (marked, _) = mark_static_bones(&mut graph, &report, &thresholds);
        assert!(marked.is_empty());
        assert!(graph.armatures[0].bones[0].deform);
    }

    #[test]
    fn test_rerun_marks_nothing() {
        let mut b = SceneBuilder::new();
        let arm = b.armature("rig");
        b.bone(arm, "helper", None);
        let mut graph = b.build();

        let thresholds = Thresholds::default();
        let report = analyze(&graph, &thresholds).unwrap();
        mark_static_bones(&mut graph, &report, &thresholds);
        let (marked, _) = mark_static_bones(&mut graph, &report, &thresholds);
        assert!(marked.is_empty());
    }
}
