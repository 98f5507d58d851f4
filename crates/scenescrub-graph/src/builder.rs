//! Programmatic scene construction.
//!
//! The write-side counterpart of the document adapter: host embeddings (and
//! tests) assemble a graph node by node and get consistent identities without
//! touching the id counter by hand.

use crate::graph::SceneGraph;
use crate::node::{
    Action, Armature, Bone, Channel, ChannelProperty, Keyframe, Material, Mesh, NodeId, Object,
    ObjectData, TextureInput, Transform, UvChannel, VertexGroup,
};

/// Incrementally builds a [`SceneGraph`] with consistent identities.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    graph: SceneGraph,
}

impl SceneBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mesh data block and returns its identity.
    pub fn mesh(
        &mut self,
        name: impl Into<String>,
        positions: Vec<[f32; 3]>,
        triangles: Vec<[u32; 3]>,
    ) -> NodeId {
        let id = self.graph.alloc_id();
        self.graph.meshes.push(Mesh {
            id,
            name: name.into(),
            positions,
            triangles,
            uv_channels: Vec::new(),
            vertex_groups: Vec::new(),
            material_slots: Vec::new(),
        });
        id
    }

    /// Adds an object wrapping the given data block (or nothing).
    pub fn object(&mut self, name: impl Into<String>, data: Option<ObjectData>) -> NodeId {
        let id = self.graph.alloc_id();
        self.graph.objects.push(Object {
            id,
            name: name.into(),
            parent: None,
            data,
            transform: Transform::identity(),
            visible: true,
        });
        id
    }

    /// Adds an object instancing a mesh data block.
    pub fn mesh_object(&mut self, name: impl Into<String>, mesh: NodeId) -> NodeId {
        self.object(name, Some(ObjectData::Mesh(mesh)))
    }

    /// Sets `child`'s parent. No cycle checking here; `validate` catches it.
    pub fn parent(&mut self, child: NodeId, parent: NodeId) {
        if let Some(obj) = self.graph.objects.iter_mut().find(|o| o.id == child) {
            obj.parent = Some(parent);
        }
    }

    /// Adds a material and returns its identity.
    pub fn material(
        &mut self,
        name: impl Into<String>,
        texture_inputs: Vec<TextureInput>,
    ) -> NodeId {
        let id = self.graph.alloc_id();
        self.graph.materials.push(Material {
            id,
            name: name.into(),
            texture_inputs,
        });
        id
    }

    /// Appends a material slot to a mesh.
    pub fn assign_material(&mut self, mesh: NodeId, material: NodeId) {
        if let Some(m) = self.graph.meshes.iter_mut().find(|m| m.id == mesh) {
            m.material_slots.push(material);
        }
    }

    /// Adds a UV channel to a mesh and returns its identity.
    pub fn uv_channel(&mut self, mesh: NodeId, name: impl Into<String>) -> NodeId {
        let id = self.graph.alloc_id();
        if let Some(m) = self.graph.meshes.iter_mut().find(|m| m.id == mesh) {
            m.uv_channels.push(UvChannel {
                id,
                name: name.into(),
            });
        }
        id
    }

    /// Adds a vertex group to a mesh and returns its identity.
    pub fn vertex_group(
        &mut self,
        mesh: NodeId,
        name: impl Into<String>,
        weights: Vec<(u32, f32)>,
    ) -> NodeId {
        let id = self.graph.alloc_id();
        if let Some(m) = self.graph.meshes.iter_mut().find(|m| m.id == mesh) {
            m.vertex_groups.push(VertexGroup {
                id,
                name: name.into(),
                weights,
            });
        }
        id
    }

    /// Adds an armature data block and returns its identity.
    pub fn armature(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.graph.alloc_id();
        self.graph.armatures.push(Armature {
            id,
            name: name.into(),
            bones: Vec::new(),
        });
        id
    }

    /// Adds a bone to an armature and returns its identity.
    pub fn bone(
        &mut self,
        armature: NodeId,
        name: impl Into<String>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = self.graph.alloc_id();
        if let Some(a) = self.graph.armatures.iter_mut().find(|a| a.id == armature) {
            a.bones.push(Bone {
                id,
                name: name.into(),
                parent,
                deform: true,
            });
        }
        id
    }

    /// Adds an empty action and returns its identity.
    pub fn action(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.graph.alloc_id();
        self.graph.actions.push(Action {
            id,
            name: name.into(),
            channels: Vec::new(),
        });
        id
    }

    /// Adds a channel targeting a bone to an action.
    pub fn channel(
        &mut self,
        action: NodeId,
        bone: NodeId,
        property: ChannelProperty,
        keyframes: &[(f32, f32)],
    ) {
        if let Some(a) = self.graph.actions.iter_mut().find(|a| a.id == action) {
            a.channels.push(Channel {
                target_bone: bone,
                property,
                component: 0,
                keyframes: keyframes
                    .iter()
                    .map(|&(frame, value)| Keyframe { frame, value })
                    .collect(),
            });
        }
    }

    /// Finishes construction. The result is consistent by construction but
    /// not validated; run [`SceneGraph::validate`] to check integrity.
    pub fn build(self) -> SceneGraph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rigged_scene() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh(
            "body",
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
        );
        b.vertex_group(mesh, "spine", vec![(0, 1.0), (1, 1.0), (2, 1.0)]);
        let arm = b.armature("rig");
        let root = b.bone(arm, "root", None);
        let spine = b.bone(arm, "spine", Some(root));
        let arm_obj = b.object("rig", Some(ObjectData::Armature(arm)));
        let body = b.mesh_object("body", mesh);
        b.parent(body, arm_obj);
        let act = b.action("walk");
        b.channel(act, spine, ChannelProperty::Rotation, &[(1.0, 0.0), (10.0, 0.8)]);

        let mut graph = b.build();
        graph.validate().unwrap();
        assert_eq!(graph.objects.len(), 2);
        assert_eq!(graph.armatures[0].bones.len(), 2);
        assert!(graph.meshes[0].is_skinned(1e-4));
    }
}
