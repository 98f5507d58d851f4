//! Static-bone detection.
//!
//! A bone is animated iff some action channel targets it with keyframe
//! values that actually move: a single keyframe, or a channel whose values
//! stay within the static epsilon, is indistinguishable from a held pose.
//! Activity never propagates between parents and children; each bone is
//! judged by its own channels only.

use scenescrub_graph::{NodeId, SceneGraph, Thresholds};
use serde::{Deserialize, Serialize};

/// Animation activity for one bone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoneStatus {
    pub bone: NodeId,
    pub name: String,
    pub armature: NodeId,
    pub animated: bool,
}

/// Classifies every bone in every armature against the scene's action set.
pub fn analyze_bones(graph: &SceneGraph, thresholds: &Thresholds) -> Vec<BoneStatus> {
    let mut statuses = Vec::new();
    for armature in &graph.armatures {
        for bone in &armature.bones {
            let animated = graph.actions.iter().any(|action| {
                action
                    .channels
                    .iter()
                    .filter(|c| c.target_bone == bone.id)
                    .any(|c| channel_moves(c.keyframes.iter().map(|k| k.value), thresholds))
            });
            statuses.push(BoneStatus {
                bone: bone.id,
                name: bone.name.clone(),
                armature: armature.id,
                animated,
            });
        }
    }
    statuses
}

/// True if the value track spans more than the static epsilon.
fn channel_moves(values: impl Iterator<Item = f32>, thresholds: &Thresholds) -> bool {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut count = 0usize;
    for v in values {
        min = min.min(v);
        max = max.max(v);
        count += 1;
    }
    count > 1 && (max - min) > thresholds.static_epsilon
}
