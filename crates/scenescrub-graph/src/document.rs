//! Host scene document adapter.
//!
//! The surrounding pipeline owns file formats and the host tool session; the
//! boundary with this core is a JSON scene document. Load parses and
//! validates integrity (a corrupt document aborts the run), commit validates
//! again so a buggy mutation can never hand a dangling reference downstream.

use crate::error::GraphResult;
use crate::graph::SceneGraph;

/// Parses a host scene document and validates graph integrity.
pub fn load_scene(json: &str) -> GraphResult<SceneGraph> {
    let mut graph: SceneGraph = serde_json::from_str(json)?;
    graph.validate()?;
    Ok(graph)
}

/// Serializes the (possibly mutated) graph back into a scene document.
///
/// Validates first: committing a graph with broken references is a bug in
/// the mutation pipeline, not a recoverable condition.
pub fn save_scene(graph: &mut SceneGraph) -> GraphResult<String> {
    graph.validate()?;
    Ok(serde_json::to_string_pretty(graph)?)
}
