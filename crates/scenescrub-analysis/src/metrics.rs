//! Per-mesh and scene-wide metric collection.
//!
//! Metrics are computed per mesh data block: a mesh instanced by several
//! objects is measured once, and the scene total counts it once. Collection
//! is read-only; nothing here mutates the graph.

use scenescrub_graph::{GraphResult, NodeId, ObjectData, SceneGraph, Thresholds};
use serde::{Deserialize, Serialize};

/// Derived metrics for one mesh data block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshMetrics {
    pub mesh: NodeId,
    pub name: String,
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Connected components of the triangle graph under shared-vertex
    /// adjacency. Zero for meshes without triangles.
    pub island_count: usize,
    /// True if at least one vertex group carries a nonzero weight.
    pub is_skinned: bool,
    /// True if every visible object instancing this mesh either sits at
    /// scene root or is parented directly to an armature object.
    pub parent_is_root: bool,
    /// Number of visible objects instancing this data block.
    pub instance_count: usize,
}

/// Scene-wide aggregates over all visible mesh data blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneTotals {
    pub vertex_count: usize,
    pub mesh_count: usize,
    pub bone_count: usize,
    pub action_count: usize,
}

/// Everything the classifier needs from one collection pass.
#[derive(Debug, Clone)]
pub struct MetricSet {
    pub per_mesh: Vec<MeshMetrics>,
    pub totals: SceneTotals,
}

/// Collects metrics for every mesh reachable from visible objects.
pub fn collect(graph: &SceneGraph, thresholds: &Thresholds) -> GraphResult<MetricSet> {
    let mut per_mesh = Vec::new();
    let mut totals = SceneTotals {
        bone_count: graph.armatures.iter().map(|a| a.bones.len()).sum(),
        action_count: graph.actions.len(),
        ..SceneTotals::default()
    };

    for mesh_id in graph.visible_mesh_ids() {
        let mesh = graph.mesh(mesh_id)?;
        let instances: Vec<_> = graph
            .objects_instancing(mesh_id)
            .into_iter()
            .filter(|o| o.visible)
            .collect();

        let mut parent_is_root = true;
        for obj in &instances {
            let root_parented = match obj.parent {
                None => true,
                Some(parent) => matches!(
                    graph.object(parent)?.data,
                    Some(ObjectData::Armature(_))
                ),
            };
            if !root_parented {
                parent_is_root = false;
            }
        }

        per_mesh.push(MeshMetrics {
            mesh: mesh_id,
            name: mesh.name.clone(),
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            island_count: count_islands(mesh.vertex_count(), &mesh.triangles),
            is_skinned: mesh.is_skinned(thresholds.weight_epsilon),
            parent_is_root,
            instance_count: instances.len(),
        });

        totals.vertex_count += mesh.vertex_count();
        totals.mesh_count += 1;
    }

    Ok(MetricSet { per_mesh, totals })
}

/// Counts islands: maximal sets of triangles connected through shared
/// vertices. Union-find over vertex indices keeps this near-linear.
pub fn count_islands(vertex_count: usize, triangles: &[[u32; 3]]) -> usize {
    if triangles.is_empty() {
        return 0;
    }

    let mut dsu = DisjointSet::new(vertex_count);
    let mut in_triangle = vec![false; vertex_count];
    for tri in triangles {
        dsu.union(tri[0], tri[1]);
        dsu.union(tri[1], tri[2]);
        for &v in tri {
            in_triangle[v as usize] = true;
        }
    }

    let mut roots = std::collections::HashSet::new();
    for v in 0..vertex_count as u32 {
        if in_triangle[v as usize] {
            roots.insert(dsu.find(v));
        }
    }
    roots.len()
}

/// Union-find with path halving and union by size.
struct DisjointSet {
    parent: Vec<u32>,
    size: Vec<u32>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut v: u32) -> u32 {
        while self.parent[v as usize] != v {
            self.parent[v as usize] = self.parent[self.parent[v as usize] as usize];
            v = self.parent[v as usize];
        }
        v
    }

    fn union(&mut self, a: u32, b: u32) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra as usize] < self.size[rb as usize] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb as usize] = ra;
        self.size[ra as usize] += self.size[rb as usize];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenescrub_graph::SceneBuilder;

    /// Two disjoint triangles sharing no vertices.
    fn two_island_mesh() -> (Vec<[f32; 3]>, Vec<[u32; 3]>) {
        let positions = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [5.0, 0.0, 0.0],
            [6.0, 0.0, 0.0],
            [5.0, 1.0, 0.0],
        ];
        let triangles = vec![[0, 1, 2], [3, 4, 5]];
        (positions, triangles)
    }

    #[test]
    fn test_island_count_disjoint() {
        let (positions, triangles) = two_island_mesh();
        assert_eq!(count_islands(positions.len(), &triangles), 2);
    }

    #[test]
    fn test_island_count_shared_vertex() {
        // Second triangle reuses vertex 2: one island.
        let positions = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ];
        let triangles = vec![[0, 1, 2], [2, 1, 3]];
        assert_eq!(count_islands(positions.len(), &triangles), 1);
    }

    #[test]
    fn test_island_count_no_triangles() {
        assert_eq!(count_islands(10, &[]), 0);
    }

    #[test]
    fn test_instanced_mesh_counted_once() {
        let mut b = SceneBuilder::new();
        let (positions, triangles) = two_island_mesh();
        let mesh = b.mesh("shared", positions, triangles);
        b.mesh_object("left", mesh);
        b.mesh_object("right", mesh);
        let graph = b.build();

        let set = collect(&graph, &Thresholds::default()).unwrap();
        assert_eq!(set.per_mesh.len(), 1);
        assert_eq!(set.per_mesh[0].instance_count, 2);
        assert_eq!(set.totals.vertex_count, 6);
        assert_eq!(set.totals.mesh_count, 1);
    }

    #[test]
    fn test_parent_is_root_through_armature() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh(
            "body",
            vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
        );
        b.vertex_group(mesh, "spine", vec![(0, 1.0)]);
        let arm = b.armature("rig");
        b.bone(arm, "spine", None);
        let arm_obj = b.object("rig", Some(scenescrub_graph::ObjectData::Armature(arm)));
        let body = b.mesh_object("body", mesh);
        b.parent(body, arm_obj);
        let graph = b.build();

        let set = collect(&graph, &Thresholds::default()).unwrap();
        assert!(set.per_mesh[0].is_skinned);
        assert!(set.per_mesh[0].parent_is_root);
    }

    #[test]
    fn test_parent_is_root_false_for_plain_parent() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh(
            "body",
            vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
        );
        b.vertex_group(mesh, "spine", vec![(0, 1.0)]);
        let holder = b.object("holder", None);
        let body = b.mesh_object("body", mesh);
        b.parent(body, holder);
        let graph = b.build();

        let set = collect(&graph, &Thresholds::default()).unwrap();
        assert!(!set.per_mesh[0].parent_is_root);
    }
}
