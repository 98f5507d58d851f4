//! Applies the duplicate resolver's planned renames.

use scenescrub_analysis::{CollisionGroup, Namespace, PlannedRename};
use scenescrub_graph::SceneGraph;
use tracing::debug;

/// Applies every planned rename whose node still carries the old name.
///
/// The old-name guard makes reapplication a no-op: once a node has been
/// renamed, a stale plan no longer matches and is skipped silently.
pub fn apply_renames(graph: &mut SceneGraph, groups: &[CollisionGroup]) -> Vec<PlannedRename> {
    let mut applied = Vec::new();
    for group in groups {
        for plan in &group.renames {
            let renamed = match plan.namespace {
                Namespace::Object => rename_in(
                    graph.objects.iter_mut().map(|o| (o.id, &mut o.name)),
                    plan,
                ),
                Namespace::Mesh => rename_in(
                    graph.meshes.iter_mut().map(|m| (m.id, &mut m.name)),
                    plan,
                ),
                Namespace::Material => rename_in(
                    graph.materials.iter_mut().map(|m| (m.id, &mut m.name)),
                    plan,
                ),
                Namespace::Action => rename_in(
                    graph.actions.iter_mut().map(|a| (a.id, &mut a.name)),
                    plan,
                ),
            };
            if renamed {
                debug!(
                    namespace = %plan.namespace,
                    old = %plan.old_name,
                    new = %plan.new_name,
                    "renamed duplicate"
                );
                applied.push(plan.clone());
            }
        }
    }
    applied
}

fn rename_in<'a>(
    nodes: impl Iterator<Item = (scenescrub_graph::NodeId, &'a mut String)>,
    plan: &PlannedRename,
) -> bool {
    for (id, name) in nodes {
        if id == plan.node && *name == plan.old_name {
            *name = plan.new_name.clone();
            return true;
        }
    }
    false
}
