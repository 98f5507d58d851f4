//! Unused UV channel removal.
//!
//! A UV channel nothing samples still ships a full TEXCOORD attribute in the
//! export. A channel is used when a material on the owning mesh names it; a
//! texture input with no explicit channel claims the mesh's first channel,
//! and a mesh whose materials name nothing keeps its first channel rather
//! than losing its only plausible coordinate set.

use crate::report::PruneRecord;
use scenescrub_graph::{GraphResult, SceneGraph};
use std::collections::HashSet;
use tracing::debug;

/// Removes unused UV channels from every mesh.
pub fn prune_unused_uv_channels(graph: &mut SceneGraph) -> GraphResult<Vec<PruneRecord>> {
    // Plan immutably first: the used-set needs material lookups while the
    // removal needs mutable meshes.
    let mut plan: Vec<(scenescrub_graph::NodeId, Vec<String>)> = Vec::new();
    for mesh in &graph.meshes {
        if mesh.uv_channels.is_empty() {
            continue;
        }

        let mut used: HashSet<String> = HashSet::new();
        for &slot in &mesh.material_slots {
            let material = graph.material(slot)?;
            for input in &material.texture_inputs {
                match &input.uv_channel {
                    Some(name) => {
                        used.insert(name.clone());
                    }
                    None => {
                        used.insert(mesh.uv_channels[0].name.clone());
                    }
                }
            }
        }

        // No material references anything on this mesh: keep the first
        // channel rather than stripping the mesh bare.
        let references_any = mesh.uv_channels.iter().any(|uv| used.contains(&uv.name));
        if !references_any {
            used.insert(mesh.uv_channels[0].name.clone());
        }

        let unused: Vec<String> = mesh
            .uv_channels
            .iter()
            .filter(|uv| !used.contains(&uv.name))
            .map(|uv| uv.name.clone())
            .collect();
        if !unused.is_empty() {
            plan.push((mesh.id, unused));
        }
    }

    let mut removed = Vec::new();
    for (mesh_id, names) in plan {
        let mesh = graph.mesh_mut(mesh_id)?;
        for name in names {
            mesh.uv_channels.retain(|uv| uv.name != name);
            debug!(mesh = %mesh.name, channel = %name, "removed unused uv channel");
            removed.push(PruneRecord {
                mesh: mesh.name.clone(),
                name,
            });
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenescrub_graph::{SceneBuilder, TextureInput};

    #[test]
    fn test_removes_unreferenced_channel() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh("prop", vec![[0.0; 3]; 3], vec![[0, 1, 2]]);
        b.uv_channel(mesh, "uv0");
        b.uv_channel(mesh, "bake");
        let mat = b.material(
            "skin",
            vec![TextureInput {
                uv_channel: Some("uv0".to_string()),
            }],
        );
        b.assign_material(mesh, mat);
        let mut graph = b.build();

        let removed = prune_unused_uv_channels(&mut graph).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].name, "bake");
        assert_eq!(graph.meshes[0].uv_channels.len(), 1);
        assert_eq!(graph.meshes[0].uv_channels[0].name, "uv0");
    }

    #[test]
    fn test_implicit_input_claims_first_channel() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh("prop", vec![[0.0; 3]; 3], vec![[0, 1, 2]]);
        b.uv_channel(mesh, "uv0");
        b.uv_channel(mesh, "uv1");
        let mat = b.material("skin", vec![TextureInput { uv_channel: None }]);
        b.assign_material(mesh, mat);
        let mut graph = b.build();

        let removed = prune_unused_uv_channels(&mut graph).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].name, "uv1");
    }

    #[test]
    fn test_mesh_without_material_keeps_first_channel() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh("prop", vec![[0.0; 3]; 3], vec![[0, 1, 2]]);
        b.uv_channel(mesh, "uv0");
        b.uv_channel(mesh, "uv1");
        let mut graph = b.build();

        let removed = prune_unused_uv_channels(&mut graph).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(graph.meshes[0].uv_channels[0].name, "uv0");
    }

    #[test]
    fn test_rerun_removes_nothing() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh("prop", vec![[0.0; 3]; 3], vec![[0, 1, 2]]);
        b.uv_channel(mesh, "uv0");
        b.uv_channel(mesh, "bake");
        let mut graph = b.build();

        prune_unused_uv_channels(&mut graph).unwrap();
        let removed = prune_unused_uv_channels(&mut graph).unwrap();
        assert!(removed.is_empty());
    }
}
