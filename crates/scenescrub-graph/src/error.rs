//! Error types for scene graph construction and traversal.

use crate::node::NodeId;
use thiserror::Error;

/// Result type for scene graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised while building or traversing the scene graph.
///
/// Every variant except `Document` indicates a corrupted input document:
/// analysis and autofix abort rather than continue on a graph whose
/// cross-references cannot be trusted.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A cross-reference points at a node that does not exist.
    #[error("reference to missing {role} node {id}")]
    MissingNode { id: NodeId, role: &'static str },

    /// An object's parent chain loops back on itself.
    #[error("object '{name}' ({id}) has a cyclic parent chain")]
    ParentCycle { id: NodeId, name: String },

    /// A triangle indexes a vertex that does not exist.
    #[error("mesh '{name}' ({id}) triangle references vertex {index} but only {vertex_count} vertices exist")]
    TriangleOutOfBounds {
        id: NodeId,
        name: String,
        index: u32,
        vertex_count: usize,
    },

    /// A vertex group weight indexes a vertex that does not exist.
    #[error("vertex group '{group}' on mesh '{mesh}' references vertex {index} but only {vertex_count} vertices exist")]
    WeightOutOfBounds {
        mesh: String,
        group: String,
        index: u32,
        vertex_count: usize,
    },

    /// Failed to parse or serialize the host scene document.
    #[error("scene document error: {0}")]
    Document(#[from] serde_json::Error),
}

impl GraphError {
    /// Creates a missing-node error for the given role.
    pub fn missing(id: NodeId, role: &'static str) -> Self {
        Self::MissingNode { id, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphError::missing(NodeId::from_raw(7), "material");
        assert!(err.to_string().contains("missing material node"));
        assert!(err.to_string().contains("#7"));

        let err = GraphError::ParentCycle {
            id: NodeId::from_raw(3),
            name: "Prop".to_string(),
        };
        assert!(err.to_string().contains("cyclic parent chain"));
    }
}
