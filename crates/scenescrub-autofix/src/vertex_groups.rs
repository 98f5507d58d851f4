//! Empty vertex group removal.
//!
//! A vertex group with no live weight is a dangling bone reference: it
//! contributes joint/weight attributes to the export without moving a single
//! vertex.

use crate::report::PruneRecord;
use scenescrub_graph::{SceneGraph, Thresholds};
use tracing::debug;

/// Removes vertex groups whose weights are all at or below the epsilon.
pub fn prune_empty_vertex_groups(
    graph: &mut SceneGraph,
    thresholds: &Thresholds,
) -> Vec<PruneRecord> {
    let mut removed = Vec::new();
    for mesh in &mut graph.meshes {
        let mesh_name = mesh.name.clone();
        mesh.vertex_groups.retain(|group| {
            if group.has_weights(thresholds.weight_epsilon) {
                return true;
            }
            debug!(mesh = %mesh_name, group = %group.name, "removed empty vertex group");
            removed.push(PruneRecord {
                mesh: mesh_name.clone(),
                name: group.name.clone(),
            });
            false
        });
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenescrub_graph::SceneBuilder;

    #[test]
    fn test_removes_empty_groups_only() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh("body", vec![[0.0; 3]; 3], vec![[0, 1, 2]]);
        b.vertex_group(mesh, "spine", vec![(0, 0.8)]);
        b.vertex_group(mesh, "tail", vec![]);
        b.vertex_group(mesh, "ear", vec![(1, 0.00001)]);
        let mut graph = b.build();

        let removed = prune_empty_vertex_groups(&mut graph, &Thresholds::default());
        let names: Vec<_> = removed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["tail", "ear"]);
        assert_eq!(graph.meshes[0].vertex_groups.len(), 1);
        assert_eq!(graph.meshes[0].vertex_groups[0].name, "spine");
    }

    #[test]
    fn test_rerun_removes_nothing() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh("body", vec![[0.0; 3]; 3], vec![[0, 1, 2]]);
        b.vertex_group(mesh, "tail", vec![]);
        let mut graph = b.build();

        prune_empty_vertex_groups(&mut graph, &Thresholds::default());
        let removed = prune_empty_vertex_groups(&mut graph, &Thresholds::default());
        assert!(removed.is_empty());
    }
}
