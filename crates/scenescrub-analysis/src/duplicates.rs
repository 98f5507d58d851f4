//! Duplicate name detection across export namespaces.
//!
//! Export sanitization can make two distinct host names collide (e.g.
//! "Cube.155" and "cube_155"), which breaks name-addressed lookups in the
//! exported file. Detection groups nodes by sanitized name per namespace;
//! resolution plans deterministic renames derived from stable identities,
//! so repeated runs produce identical names.

use scenescrub_graph::name::sanitize_export_name;
use scenescrub_graph::{NodeId, SceneGraph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Name namespace checked for collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Object,
    Mesh,
    Material,
    Action,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Namespace::Object => "object",
            Namespace::Mesh => "mesh",
            Namespace::Material => "material",
            Namespace::Action => "action",
        };
        f.write_str(label)
    }
}

/// A rename the autofix executor will apply for one colliding node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedRename {
    pub node: NodeId,
    pub namespace: Namespace,
    pub old_name: String,
    pub new_name: String,
}

/// Nodes whose names collapse to the same sanitized export name.
///
/// The first-encountered member keeps its name; `renames` covers the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionGroup {
    pub namespace: Namespace,
    pub sanitized: String,
    pub members: Vec<NodeId>,
    pub names: Vec<String>,
    pub renames: Vec<PlannedRename>,
}

/// Finds sanitized-name collisions in every namespace and plans renames.
pub fn find_collisions(graph: &SceneGraph) -> Vec<CollisionGroup> {
    let mut groups = Vec::new();

    let objects: Vec<_> = graph.objects.iter().map(|o| (o.id, o.name.clone())).collect();
    groups.extend(collisions_in(Namespace::Object, &objects));

    let meshes: Vec<_> = graph.meshes.iter().map(|m| (m.id, m.name.clone())).collect();
    groups.extend(collisions_in(Namespace::Mesh, &meshes));

    let materials: Vec<_> = graph.materials.iter().map(|m| (m.id, m.name.clone())).collect();
    groups.extend(collisions_in(Namespace::Material, &materials));

    let actions: Vec<_> = graph.actions.iter().map(|a| (a.id, a.name.clone())).collect();
    groups.extend(collisions_in(Namespace::Action, &actions));

    groups
}

fn collisions_in(namespace: Namespace, items: &[(NodeId, String)]) -> Vec<CollisionGroup> {
    // Group by sanitized name, preserving first-encounter order.
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, (_, name)) in items.iter().enumerate() {
        let key = sanitize_export_name(name);
        buckets
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(index);
    }

    // Planned names must not collide with anything already in the
    // namespace, nor with each other.
    let mut taken: HashSet<String> = buckets.keys().cloned().collect();

    let mut groups = Vec::new();
    for key in order {
        let indices = &buckets[&key];
        if indices.len() < 2 {
            continue;
        }

        let mut renames = Vec::new();
        for &index in &indices[1..] {
            let (id, old_name) = &items[index];
            let new_name = disambiguate(old_name, *id, &mut taken);
            renames.push(PlannedRename {
                node: *id,
                namespace,
                old_name: old_name.clone(),
                new_name,
            });
        }

        groups.push(CollisionGroup {
            namespace,
            sanitized: key,
            members: indices.iter().map(|&i| items[i].0).collect(),
            names: indices.iter().map(|&i| items[i].1.clone()).collect(),
            renames,
        });
    }
    groups
}

/// Appends an identity-derived suffix, widening it until the sanitized
/// result is unique within the namespace.
fn disambiguate(old_name: &str, id: NodeId, taken: &mut HashSet<String>) -> String {
    let mut candidate = format!("{}_{}", old_name, id.suffix());
    if taken.contains(&sanitize_export_name(&candidate)) {
        candidate = format!("{}_{}", old_name, id.wide_suffix());
    }
    let mut round = 2u32;
    while taken.contains(&sanitize_export_name(&candidate)) {
        candidate = format!("{}_{}_{}", old_name, id.wide_suffix(), round);
        round += 1;
    }
    taken.insert(sanitize_export_name(&candidate));
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenescrub_graph::SceneBuilder;

    #[test]
    fn test_no_collisions() {
        let mut b = SceneBuilder::new();
        b.object("chair", None);
        b.object("table", None);
        let graph = b.build();
        assert!(find_collisions(&graph).is_empty());
    }

    #[test]
    fn test_exact_duplicate_objects() {
        let mut b = SceneBuilder::new();
        let first = b.object("Prop", None);
        let second = b.object("Prop", None);
        let graph = b.build();

        let groups = find_collisions(&graph);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].namespace, Namespace::Object);
        assert_eq!(groups[0].members, vec![first, second]);
        // Exactly one rename: the first-encountered node keeps its name.
        assert_eq!(groups[0].renames.len(), 1);
        assert_eq!(groups[0].renames[0].node, second);
        assert_ne!(groups[0].renames[0].new_name, "Prop");
    }

    #[test]
    fn test_sanitization_collision() {
        let mut b = SceneBuilder::new();
        b.object("Cube 155", None);
        b.object("cube_155", None);
        let graph = b.build();

        let groups = find_collisions(&graph);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].sanitized, "cube_155");
    }

    #[test]
    fn test_namespaces_are_independent() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh("Prop", vec![], vec![]);
        b.object("Prop", None);
        let _ = mesh;
        let graph = b.build();
        // Same name in different namespaces is not a collision.
        assert!(find_collisions(&graph).is_empty());
    }

    #[test]
    fn test_resolved_names_unique_and_stable() {
        let mut b = SceneBuilder::new();
        b.object("Prop", None);
        b.object("Prop", None);
        b.object("Prop", None);
        let graph = b.build();

        let first = find_collisions(&graph);
        let second = find_collisions(&graph);

        let names: Vec<_> = first[0].renames.iter().map(|r| &r.new_name).collect();
        let mut sanitized: Vec<_> = names
            .iter()
            .map(|n| sanitize_export_name(n))
            .collect();
        sanitized.sort();
        sanitized.dedup();
        assert_eq!(sanitized.len(), names.len());

        // Deterministic: same input graph, same planned names.
        for (a, c) in first[0].renames.iter().zip(second[0].renames.iter()) {
            assert_eq!(a.new_name, c.new_name);
        }
    }

    #[test]
    fn test_planned_name_avoids_existing_node() {
        let mut b = SceneBuilder::new();
        let dup_a = b.object("Prop", None);
        let dup_b = b.object("Prop", None);
        // An unrelated object already using the name the resolver would pick
        // for dup_b with the short suffix.
        b.object(format!("Prop_{}", dup_b.suffix()), None);
        let graph = b.build();

        let groups = find_collisions(&graph);
        let rename = &groups[0].renames[0];
        assert_eq!(rename.node, dup_b);
        assert_ne!(
            sanitize_export_name(&rename.new_name),
            sanitize_export_name(&format!("Prop_{}", dup_b.suffix()))
        );
        let _ = dup_a;
    }
}
