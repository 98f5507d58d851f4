//! The scene graph arena and its integrity checks.

use crate::error::{GraphError, GraphResult};
use crate::node::{Action, Armature, Bone, Material, Mesh, NodeId, Object, ObjectData};
use serde::{Deserialize, Serialize};

/// In-memory scene graph, exclusively owned by one analysis/autofix run.
///
/// Nodes live in flat per-type vectors; every cross-reference is a [`NodeId`]
/// resolved through the lookup methods, which surface dangling references as
/// [`GraphError::MissingNode`] instead of panicking. The id counter only
/// moves forward, so deleting a node never recycles its identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneGraph {
    #[serde(skip)]
    next_id: u32,
    pub objects: Vec<Object>,
    pub meshes: Vec<Mesh>,
    pub armatures: Vec<Armature>,
    pub materials: Vec<Material>,
    pub actions: Vec<Action>,
}

impl SceneGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh node identity.
    pub fn alloc_id(&mut self) -> NodeId {
        let id = NodeId::from_raw(self.next_id);
        self.next_id += 1;
        id
    }

    /// Looks up an object by id.
    pub fn object(&self, id: NodeId) -> GraphResult<&Object> {
        self.objects
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| GraphError::missing(id, "object"))
    }

    /// Looks up a mesh data block by id.
    pub fn mesh(&self, id: NodeId) -> GraphResult<&Mesh> {
        self.meshes
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| GraphError::missing(id, "mesh"))
    }

    /// Mutable mesh lookup.
    pub fn mesh_mut(&mut self, id: NodeId) -> GraphResult<&mut Mesh> {
        self.meshes
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| GraphError::missing(id, "mesh"))
    }

    /// Looks up an armature data block by id.
    pub fn armature(&self, id: NodeId) -> GraphResult<&Armature> {
        self.armatures
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| GraphError::missing(id, "armature"))
    }

    /// Looks up a material by id.
    pub fn material(&self, id: NodeId) -> GraphResult<&Material> {
        self.materials
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| GraphError::missing(id, "material"))
    }

    /// Finds the bone with the given id across all armatures.
    pub fn bone(&self, id: NodeId) -> Option<(&Armature, &Bone)> {
        self.armatures
            .iter()
            .find_map(|a| a.bone(id).map(|b| (a, b)))
    }

    /// Objects whose data block is the given mesh, in scene order.
    pub fn objects_instancing(&self, mesh: NodeId) -> Vec<&Object> {
        self.objects
            .iter()
            .filter(|o| o.data == Some(ObjectData::Mesh(mesh)))
            .collect()
    }

    /// The object wrapping the given armature data block, if any.
    pub fn armature_object(&self, armature: NodeId) -> Option<&Object> {
        self.objects
            .iter()
            .find(|o| o.data == Some(ObjectData::Armature(armature)))
    }

    /// True if any object names `id` as its parent.
    pub fn has_children(&self, id: NodeId) -> bool {
        self.objects.iter().any(|o| o.parent == Some(id))
    }

    /// Mesh data blocks reachable from visible objects, each exactly once,
    /// in first-encounter scene order. Metrics are per data block, so a mesh
    /// instanced by several objects appears a single time.
    pub fn visible_mesh_ids(&self) -> Vec<NodeId> {
        let mut seen = Vec::new();
        for obj in self.objects.iter().filter(|o| o.visible) {
            if let Some(ObjectData::Mesh(mesh_id)) = obj.data {
                if !seen.contains(&mesh_id) {
                    seen.push(mesh_id);
                }
            }
        }
        seen
    }

    /// Validates referential integrity and reseeds the id counter.
    ///
    /// Called by the document adapter after load and again before commit;
    /// any failure here means the input document is corrupt and the run must
    /// abort rather than operate on untrusted references.
    pub fn validate(&mut self) -> GraphResult<()> {
        self.reseed_ids();
        self.check_object_refs()?;
        self.check_mesh_refs()?;
        self.check_bone_refs()?;
        self.check_action_refs()?;
        Ok(())
    }

    fn reseed_ids(&mut self) {
        let mut max = 0u32;
        let mut track = |id: NodeId| max = max.max(id.raw() + 1);
        for o in &self.objects {
            track(o.id);
        }
        for m in &self.meshes {
            track(m.id);
            for uv in &m.uv_channels {
                track(uv.id);
            }
            for vg in &m.vertex_groups {
                track(vg.id);
            }
        }
        for a in &self.armatures {
            track(a.id);
            for b in &a.bones {
                track(b.id);
            }
        }
        for m in &self.materials {
            track(m.id);
        }
        for a in &self.actions {
            track(a.id);
        }
        self.next_id = self.next_id.max(max);
    }

    fn check_object_refs(&self) -> GraphResult<()> {
        for obj in &self.objects {
            if let Some(parent) = obj.parent {
                self.object(parent)?;
            }
            match obj.data {
                Some(ObjectData::Mesh(id)) => {
                    self.mesh(id)?;
                }
                Some(ObjectData::Armature(id)) => {
                    self.armature(id)?;
                }
                None => {}
            }
        }
        // Parent chains must terminate; a chain longer than the object count
        // can only mean a cycle.
        for obj in &self.objects {
            let mut hops = 0usize;
            let mut cursor = obj.parent;
            while let Some(parent) = cursor {
                hops += 1;
                if hops > self.objects.len() {
                    return Err(GraphError::ParentCycle {
                        id: obj.id,
                        name: obj.name.clone(),
                    });
                }
                cursor = self.object(parent)?.parent;
            }
        }
        Ok(())
    }

    fn check_mesh_refs(&self) -> GraphResult<()> {
        for mesh in &self.meshes {
            let vertex_count = mesh.positions.len();
            for tri in &mesh.triangles {
                for &index in tri {
                    if index as usize >= vertex_count {
                        return Err(GraphError::TriangleOutOfBounds {
                            id: mesh.id,
                            name: mesh.name.clone(),
                            index,
                            vertex_count,
                        });
                    }
                }
            }
            for group in &mesh.vertex_groups {
                for &(index, _) in &group.weights {
                    if index as usize >= vertex_count {
                        return Err(GraphError::WeightOutOfBounds {
                            mesh: mesh.name.clone(),
                            group: group.name.clone(),
                            index,
                            vertex_count,
                        });
                    }
                }
            }
            for &slot in &mesh.material_slots {
                self.material(slot)?;
            }
        }
        Ok(())
    }

    fn check_bone_refs(&self) -> GraphResult<()> {
        for armature in &self.armatures {
            for bone in &armature.bones {
                if let Some(parent) = bone.parent {
                    if armature.bone(parent).is_none() {
                        return Err(GraphError::missing(parent, "bone"));
                    }
                }
            }
        }
        Ok(())
    }

    fn check_action_refs(&self) -> GraphResult<()> {
        for action in &self.actions {
            for channel in &action.channels {
                if self.bone(channel.target_bone).is_none() {
                    return Err(GraphError::missing(channel.target_bone, "bone"));
                }
            }
        }
        Ok(())
    }
}
