//! Typed scene nodes stored in the graph arena.
//!
//! Relationships between nodes are expressed as [`NodeId`] lookups through
//! the owning [`crate::SceneGraph`], never as embedded pointers, so shared
//! data (materials, instanced mesh data) stays explicit and mutation never
//! invalidates references held elsewhere.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity for a node in the scene graph.
///
/// Allocated from the owning graph's counter, unique for the lifetime of the
/// in-memory graph, and never reused. Identity survives renaming; the
/// export-visible [`display name`](Object::name) does not participate in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Wraps a raw id value. Intended for the document adapter and tests;
    /// prefer [`crate::SceneGraph::alloc_id`] when constructing graphs.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Short hex suffix (low 16 bits) used to disambiguate renamed
    /// duplicates deterministically.
    pub fn suffix(self) -> String {
        format!("{:04x}", self.0 & 0xffff)
    }

    /// Full-width hex suffix, used when the short suffix itself collides.
    pub fn wide_suffix(self) -> String {
        format!("{:08x}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Local transform of an object relative to its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: [f32; 3],
    pub rotation_euler: [f32; 3],
    pub scale: [f32; 3],
}

impl Transform {
    const EPSILON: f32 = 1e-4;

    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            translation: [0.0; 3],
            rotation_euler: [0.0; 3],
            scale: [1.0; 3],
        }
    }

    /// True if the transform is the identity within a small epsilon.
    pub fn is_identity(&self) -> bool {
        self.translation.iter().all(|v| v.abs() < Self::EPSILON)
            && self.rotation_euler.iter().all(|v| v.abs() < Self::EPSILON)
            && self.scale.iter().all(|v| (v - 1.0).abs() < Self::EPSILON)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Data block wrapped by an [`Object`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectData {
    /// Mesh data block, possibly instanced by several objects.
    Mesh(NodeId),
    /// Armature data block.
    Armature(NodeId),
}

/// A scene object: a placement of a data block in the object tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Object {
    pub id: NodeId,
    pub name: String,
    /// Parent object, `None` when the object sits at scene root.
    pub parent: Option<NodeId>,
    /// Wrapped data block; `None` for plain empties / marker objects.
    pub data: Option<ObjectData>,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

/// A UV channel owned by exactly one mesh.
///
/// "Unused" is decided against the owning mesh's materials, not stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UvChannel {
    pub id: NodeId,
    pub name: String,
}

/// A weight-painting bone binding owned by exactly one mesh.
///
/// Weights are sparse `(vertex index, weight)` pairs; the group is named
/// after the bone it binds to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexGroup {
    pub id: NodeId,
    pub name: String,
    pub weights: Vec<(u32, f32)>,
}

impl VertexGroup {
    /// True if any weight exceeds `epsilon`.
    pub fn has_weights(&self, epsilon: f32) -> bool {
        self.weights.iter().any(|&(_, w)| w > epsilon)
    }
}

/// Triangle mesh data block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub id: NodeId,
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
    #[serde(default)]
    pub uv_channels: Vec<UvChannel>,
    #[serde(default)]
    pub vertex_groups: Vec<VertexGroup>,
    /// Materials assigned to this mesh; shared across meshes, referenced by id.
    #[serde(default)]
    pub material_slots: Vec<NodeId>,
}

impl Mesh {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True if at least one vertex group carries a nonzero weight.
    pub fn is_skinned(&self, weight_epsilon: f32) -> bool {
        self.vertex_groups.iter().any(|g| g.has_weights(weight_epsilon))
    }
}

/// A skeleton bone inside an armature's bone tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bone {
    pub id: NodeId,
    pub name: String,
    /// Parent bone within the same armature; `None` for roots.
    pub parent: Option<NodeId>,
    /// True while the bone contributes to skinning at export time.
    #[serde(default = "default_deform")]
    pub deform: bool,
}

fn default_deform() -> bool {
    true
}

/// Armature data block: an ordered tree of bones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Armature {
    pub id: NodeId,
    pub name: String,
    pub bones: Vec<Bone>,
}

impl Armature {
    /// Looks up a bone by id.
    pub fn bone(&self, id: NodeId) -> Option<&Bone> {
        self.bones.iter().find(|b| b.id == id)
    }
}

/// A texture-coordinate input on a material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureInput {
    /// UV channel name sampled by this texture. `None` means the host tool's
    /// implicit binding: the mesh's first UV channel.
    pub uv_channel: Option<String>,
}

/// A material, shared across meshes (lifetime governed by references).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub texture_inputs: Vec<TextureInput>,
}

/// Transform property targeted by an animation channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelProperty {
    Location,
    Rotation,
    Scale,
}

/// A single keyframe on an animation channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: f32,
    pub value: f32,
}

/// One animated curve targeting a bone's transform property component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub target_bone: NodeId,
    pub property: ChannelProperty,
    /// Component index within the property (axis or quaternion lane).
    #[serde(default)]
    pub component: u8,
    pub keyframes: Vec<Keyframe>,
}

/// An animation clip owning a set of bone channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub channels: Vec<Channel>,
}
