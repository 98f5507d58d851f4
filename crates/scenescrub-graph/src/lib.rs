//! Scene graph arena for the scenescrub analysis and repair pipeline.
//!
//! The host modeling tool hands the core a scene document (JSON); this crate
//! turns it into an in-memory graph of typed nodes with stable identities and
//! identity-to-identity cross references, and commits mutations back out.
//!
//! # Example
//!
//! ```no_run
//! use scenescrub_graph::document;
//!
//! let json = std::fs::read_to_string("scene.json").unwrap();
//! let graph = document::load_scene(&json).unwrap();
//! println!("{} objects", graph.objects.len());
//! ```

pub mod builder;
pub mod document;
pub mod error;
pub mod graph;
pub mod name;
pub mod node;
pub mod thresholds;

pub use builder::SceneBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::SceneGraph;
pub use node::{
    Action, Armature, Bone, Channel, ChannelProperty, Keyframe, Material, Mesh, NodeId, Object,
    ObjectData, TextureInput, Transform, UvChannel, VertexGroup,
};
pub use thresholds::Thresholds;
