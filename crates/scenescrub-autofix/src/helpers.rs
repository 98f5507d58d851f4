//! Bone-shape helper object removal.
//!
//! Rigs often carry proxy objects whose only purpose is giving bones a
//! visible widget in the host tool. They never skin and never render, but
//! they survive into exports. Detection is heuristic: marker names, or
//! data-less/empty marker geometry. Guards keep anything another node still
//! depends on.

use crate::report::HelperRecord;
use scenescrub_graph::{NodeId, ObjectData, SceneGraph, Thresholds};
use tracing::debug;

/// Name fragments that tag an object as a bone-shape proxy.
const SHAPE_MARKERS: [&str; 4] = ["icosphere", "bone_shape", "widget", "wgt_"];

/// Removes shape-helper objects, plus their mesh data when it becomes
/// unreferenced.
pub fn remove_shape_helpers(
    graph: &mut SceneGraph,
    thresholds: &Thresholds,
) -> Vec<HelperRecord> {
    let victims: Vec<(NodeId, String)> = graph
        .objects
        .iter()
        .filter(|obj| is_shape_helper(graph, obj.id, thresholds.weight_epsilon))
        .map(|obj| (obj.id, obj.name.clone()))
        .collect();

    let mut removed = Vec::new();
    for (id, name) in victims {
        let data = graph
            .objects
            .iter()
            .find(|o| o.id == id)
            .and_then(|o| o.data);
        graph.objects.retain(|o| o.id != id);
        // Drop orphaned mesh data so the helper's geometry leaves the
        // document with it.
        if let Some(ObjectData::Mesh(mesh_id)) = data {
            if graph.objects_instancing(mesh_id).is_empty() {
                graph.meshes.retain(|m| m.id != mesh_id);
            }
        }
        debug!(object = %name, "removed shape helper");
        removed.push(HelperRecord { object: id, name });
    }
    removed
}

fn is_shape_helper(graph: &SceneGraph, id: NodeId, weight_epsilon: f32) -> bool {
    let Ok(obj) = graph.object(id) else {
        return false;
    };

    // Anything the scene still hangs off is not a disposable proxy.
    if graph.has_children(id) {
        return false;
    }

    match obj.data {
        Some(ObjectData::Armature(_)) => false,
        Some(ObjectData::Mesh(mesh_id)) => {
            let Ok(mesh) = graph.mesh(mesh_id) else {
                return false;
            };
            // Shared or skinned data means real content, whatever the name.
            if graph.objects_instancing(mesh_id).len() > 1 || mesh.is_skinned(weight_epsilon) {
                return false;
            }
            has_marker_name(&obj.name) || mesh.vertex_count() == 0
        }
        None => has_marker_name(&obj.name),
    }
}

fn has_marker_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    SHAPE_MARKERS.iter().any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenescrub_graph::SceneBuilder;

    #[test]
    fn test_removes_marker_named_objects() {
        let mut b = SceneBuilder::new();
        let shape = b.mesh("shape", vec![[0.0; 3]; 3], vec![[0, 1, 2]]);
        b.mesh_object("WGT_hand", shape);
        b.object("Icosphere.001", None);
        let keep_mesh = b.mesh("prop", vec![[0.0; 3]; 3], vec![[0, 1, 2]]);
        b.mesh_object("prop", keep_mesh);
        let mut graph = b.build();

        let removed = remove_shape_helpers(&mut graph, &Thresholds::default());
        assert_eq!(removed.len(), 2);
        assert_eq!(graph.objects.len(), 1);
        assert_eq!(graph.objects[0].name, "prop");
        // The widget's mesh data left with it.
        assert_eq!(graph.meshes.len(), 1);
        assert_eq!(graph.meshes[0].name, "prop");
    }

    #[test]
    fn test_keeps_skinned_mesh_despite_name() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh("widget_body", vec![[0.0; 3]; 3], vec![[0, 1, 2]]);
        b.vertex_group(mesh, "spine", vec![(0, 1.0)]);
        b.mesh_object("widget_body", mesh);
        let mut graph = b.build();

        let removed = remove_shape_helpers(&mut graph, &Thresholds::default());
        assert!(removed.is_empty());
        assert_eq!(graph.objects.len(), 1);
    }

    #[test]
    fn test_keeps_objects_with_children() {
        let mut b = SceneBuilder::new();
        let widget = b.object("widget_root", None);
        let child = b.object("child", None);
        b.parent(child, widget);
        let mut graph = b.build();

        let removed = remove_shape_helpers(&mut graph, &Thresholds::default());
        // Only the child (no marker name) survives untouched; the parent is
        // kept because removing it would orphan the child.
        assert!(removed.is_empty());
        assert_eq!(graph.objects.len(), 2);
    }

    #[test]
    fn test_removes_zero_vertex_marker_geometry() {
        let mut b = SceneBuilder::new();
        let empty = b.mesh("empty", vec![], vec![]);
        b.mesh_object("proxy", empty);
        let mut graph = b.build();

        let removed = remove_shape_helpers(&mut graph, &Thresholds::default());
        assert_eq!(removed.len(), 1);
        assert!(graph.objects.is_empty());
        assert!(graph.meshes.is_empty());
    }

    #[test]
    fn test_rerun_removes_nothing() {
        let mut b = SceneBuilder::new();
        b.object("wgt_spine", None);
        let mut graph = b.build();

        remove_shape_helpers(&mut graph, &Thresholds::default());
        let removed = remove_shape_helpers(&mut graph, &Thresholds::default());
        assert!(removed.is_empty());
    }
}
