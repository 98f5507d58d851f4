//! Edge-collapse decimation toward a vertex-count target.
//!
//! Collapses the cheapest edges first, cost measured by quadric error, until
//! the mesh reaches the target vertex count or nothing safe is left to
//! collapse. Open boundary edges and edges crossing vertex-group boundaries
//! are penalized heavily so silhouettes and skinning seams survive as long
//! as the budget allows. Vertex count only ever decreases, and never below
//! the configured floor.

use crate::quadric::Quadric;
use scenescrub_graph::{Mesh, Thresholds};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::{debug, info};

/// Cost multiplier for collapsing an open boundary edge.
const BOUNDARY_PENALTY: f64 = 100.0;
/// Cost multiplier for collapsing across vertex-group boundaries.
const GROUP_BOUNDARY_PENALTY: f64 = 10.0;

/// Result of decimating one mesh.
#[derive(Debug, Clone, Copy)]
pub struct DecimationOutcome {
    pub vertices_before: usize,
    pub vertices_after: usize,
    pub triangles_before: usize,
    pub triangles_after: usize,
    pub reached_target: bool,
}

impl DecimationOutcome {
    /// True if the pass removed anything.
    pub fn changed(&self) -> bool {
        self.vertices_after < self.vertices_before
    }
}

/// An edge collapse candidate in the priority queue.
#[derive(Debug, Clone)]
struct EdgeCollapse {
    v1: u32,
    v2: u32,
    cost: f64,
    position: [f64; 3],
}

impl PartialEq for EdgeCollapse {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for EdgeCollapse {}

impl PartialOrd for EdgeCollapse {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCollapse {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the cheapest collapse.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

/// Decimates `mesh` in place toward `target` vertices.
pub fn decimate_to_target(
    mesh: &mut Mesh,
    target: usize,
    thresholds: &Thresholds,
) -> DecimationOutcome {
    let vertices_before = mesh.vertex_count();
    let triangles_before = mesh.triangle_count();
    let floor = thresholds.decimate_floor_vertices.max(3);
    let target = target.max(floor);

    let unchanged = DecimationOutcome {
        vertices_before,
        vertices_after: vertices_before,
        triangles_before,
        triangles_after: triangles_before,
        reached_target: vertices_before <= target,
    };
    if vertices_before <= target || triangles_before == 0 {
        return unchanged;
    }

    debug!(
        mesh = %mesh.name,
        vertices = vertices_before,
        target = target,
        "starting decimation"
    );

    let n = mesh.positions.len();
    let mut positions: Vec<[f64; 3]> = mesh
        .positions
        .iter()
        .map(|p| [f64::from(p[0]), f64::from(p[1]), f64::from(p[2])])
        .collect();
    let mut alive = vec![true; n];
    let mut faces: Vec<Option<[u32; 3]>> = mesh.triangles.iter().copied().map(Some).collect();
    let mut quadrics = vertex_quadrics(&positions, &mesh.triangles);
    let boundary = boundary_edges(&mesh.triangles);
    let dominant = dominant_groups(mesh, thresholds.weight_epsilon);

    // Collapsed vertices chain to their survivor; path-halved on resolve.
    let mut remap: Vec<u32> = (0..n as u32).collect();

    let mut heap = BinaryHeap::new();
    let mut seen = HashSet::new();
    for tri in &mesh.triangles {
        for k in 0..3 {
            let edge = ordered(tri[k], tri[(k + 1) % 3]);
            if seen.insert(edge) {
                heap.push(candidate(
                    edge.0, edge.1, &positions, &quadrics, &boundary, &dominant,
                ));
            }
        }
    }

    let mut active_verts = vertices_before;
    let mut active_faces = triangles_before;

    while active_verts > target {
        let Some(collapse) = heap.pop() else {
            break;
        };
        if active_verts <= floor {
            break;
        }

        let v1 = resolve(&mut remap, collapse.v1);
        let v2 = resolve(&mut remap, collapse.v2);
        if v1 == v2 || !alive[v1 as usize] || !alive[v2 as usize] {
            continue;
        }

        // Reject collapses that would pinch the surface into a non-manifold
        // fan, and collapses that would consume the last triangle.
        let (shared, dying_faces) = collapse_impact(&faces, &mut remap, v1, v2);
        if shared > 2 {
            continue;
        }
        if active_faces.saturating_sub(dying_faces) < 1 {
            continue;
        }

        positions[v1 as usize] = collapse.position;
        let q2 = quadrics[v2 as usize];
        quadrics[v1 as usize].add(&q2);
        alive[v2 as usize] = false;
        remap[v2 as usize] = v1;
        active_verts -= 1;

        for face in faces.iter_mut() {
            let Some(tri) = face else { continue };
            let mut changed = false;
            for idx in tri.iter_mut() {
                let actual = resolve(&mut remap, *idx);
                if *idx != actual {
                    *idx = actual;
                    changed = true;
                }
            }
            if changed && (tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2]) {
                *face = None;
                active_faces -= 1;
            }
        }

        // Fresh candidates for every surviving edge around the merged vertex.
        for neighbor in vertex_neighbors(&faces, v1) {
            if alive[neighbor as usize] {
                heap.push(candidate(
                    v1, neighbor, &positions, &quadrics, &boundary, &dominant,
                ));
            }
        }
    }

    rebuild(
        mesh,
        &positions,
        &alive,
        &faces,
        &mut remap,
        f64::from(thresholds.degenerate_area),
    );

    let outcome = DecimationOutcome {
        vertices_before,
        vertices_after: mesh.vertex_count(),
        triangles_before,
        triangles_after: mesh.triangle_count(),
        reached_target: mesh.vertex_count() <= target,
    };
    info!(
        mesh = %mesh.name,
        before = outcome.vertices_before,
        after = outcome.vertices_after,
        reached_target = outcome.reached_target,
        "decimation complete"
    );
    outcome
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn resolve(remap: &mut [u32], mut v: u32) -> u32 {
    while remap[v as usize] != v {
        remap[v as usize] = remap[remap[v as usize] as usize];
        v = remap[v as usize];
    }
    v
}

fn vertex_quadrics(positions: &[[f64; 3]], triangles: &[[u32; 3]]) -> Vec<Quadric> {
    let mut quadrics = vec![Quadric::default(); positions.len()];
    for tri in triangles {
        let a = positions[tri[0] as usize];
        let b = positions[tri[1] as usize];
        let c = positions[tri[2] as usize];
        let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let normal = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        let len = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
        if len < 1e-12 {
            continue;
        }
        let (nx, ny, nz) = (normal[0] / len, normal[1] / len, normal[2] / len);
        let d = -(nx * a[0] + ny * a[1] + nz * a[2]);
        let q = Quadric::from_plane(nx, ny, nz, d);
        for &vi in tri {
            quadrics[vi as usize].add(&q);
        }
    }
    quadrics
}

/// Edges used by exactly one triangle.
fn boundary_edges(triangles: &[[u32; 3]]) -> HashSet<(u32, u32)> {
    let mut counts: HashMap<(u32, u32), u32> = HashMap::new();
    for tri in triangles {
        for k in 0..3 {
            *counts.entry(ordered(tri[k], tri[(k + 1) % 3])).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .filter(|&(_, count)| count == 1)
        .map(|(edge, _)| edge)
        .collect()
}

/// Highest-weighted vertex group per vertex, if any weight is nonzero.
fn dominant_groups(mesh: &Mesh, epsilon: f32) -> Vec<Option<usize>> {
    let mut best: Vec<Option<(usize, f32)>> = vec![None; mesh.positions.len()];
    for (group_index, group) in mesh.vertex_groups.iter().enumerate() {
        for &(vertex, weight) in &group.weights {
            if weight <= epsilon {
                continue;
            }
            let slot = &mut best[vertex as usize];
            if slot.map_or(true, |(_, w)| weight > w) {
                *slot = Some((group_index, weight));
            }
        }
    }
    best.into_iter().map(|b| b.map(|(g, _)| g)).collect()
}

fn candidate(
    v1: u32,
    v2: u32,
    positions: &[[f64; 3]],
    quadrics: &[Quadric],
    boundary: &HashSet<(u32, u32)>,
    dominant: &[Option<usize>],
) -> EdgeCollapse {
    let mut combined = quadrics[v1 as usize];
    combined.add(&quadrics[v2 as usize]);

    let p1 = positions[v1 as usize];
    let p2 = positions[v2 as usize];
    let midpoint = [
        (p1[0] + p2[0]) / 2.0,
        (p1[1] + p2[1]) / 2.0,
        (p1[2] + p2[2]) / 2.0,
    ];
    let position = combined.optimal_point().unwrap_or(midpoint);

    let mut cost = combined.evaluate(position[0], position[1], position[2]).max(0.0);
    if boundary.contains(&ordered(v1, v2)) {
        cost = (cost + 1e-12) * BOUNDARY_PENALTY;
    }
    if dominant[v1 as usize] != dominant[v2 as usize] {
        cost = (cost + 1e-12) * GROUP_BOUNDARY_PENALTY;
    }

    EdgeCollapse {
        v1,
        v2,
        cost,
        position,
    }
}

/// Shared-neighbor count (non-manifold guard) and how many live faces the
/// collapse would remove.
fn collapse_impact(
    faces: &[Option<[u32; 3]>],
    remap: &mut [u32],
    v1: u32,
    v2: u32,
) -> (usize, usize) {
    let mut n1 = HashSet::new();
    let mut n2 = HashSet::new();
    let mut dying = 0usize;
    for face in faces.iter().flatten() {
        let resolved = [
            resolve(remap, face[0]),
            resolve(remap, face[1]),
            resolve(remap, face[2]),
        ];
        let has_v1 = resolved.contains(&v1);
        let has_v2 = resolved.contains(&v2);
        if has_v1 && has_v2 {
            dying += 1;
        }
        for &v in &resolved {
            if v != v1 && v != v2 {
                if has_v1 {
                    n1.insert(v);
                }
                if has_v2 {
                    n2.insert(v);
                }
            }
        }
    }
    (n1.intersection(&n2).count(), dying)
}

fn vertex_neighbors(faces: &[Option<[u32; 3]>], v: u32) -> Vec<u32> {
    let mut neighbors = Vec::new();
    for face in faces.iter().flatten() {
        if face.contains(&v) {
            for &other in face {
                if other != v && !neighbors.contains(&other) {
                    neighbors.push(other);
                }
            }
        }
    }
    neighbors
}

/// Compacts surviving vertices and faces back into the mesh, following the
/// remap chain so vertex-group weights land on the surviving vertex.
///
/// Collapses can leave behind sliver triangles and vertices whose every face
/// died; both are swept out here, so a cleanup pass after decimation finds
/// nothing left to do.
fn rebuild(
    mesh: &mut Mesh,
    positions: &[[f64; 3]],
    alive: &[bool],
    faces: &[Option<[u32; 3]>],
    remap: &mut [u32],
    min_area: f64,
) {
    let mut resolved = Vec::new();
    for face in faces.iter().flatten() {
        let a = resolve(remap, face[0]);
        let b = resolve(remap, face[1]);
        let c = resolve(remap, face[2]);
        if a == b || b == c || a == c {
            continue;
        }
        if area(positions[a as usize], positions[b as usize], positions[c as usize]) >= min_area {
            resolved.push([a, b, c]);
        }
    }
    // If the area sweep would leave nothing, keep the non-degenerate faces
    // rather than emptying the mesh.
    if resolved.is_empty() {
        for face in faces.iter().flatten() {
            let a = resolve(remap, face[0]);
            let b = resolve(remap, face[1]);
            let c = resolve(remap, face[2]);
            if a != b && b != c && a != c {
                resolved.push([a, b, c]);
            }
        }
    }

    let mut used = vec![false; positions.len()];
    for face in &resolved {
        for &v in face {
            used[v as usize] = true;
        }
    }

    let mut new_index = vec![u32::MAX; positions.len()];
    let mut new_positions = Vec::new();
    for (i, pos) in positions.iter().enumerate() {
        if alive[i] && used[i] {
            new_index[i] = new_positions.len() as u32;
            new_positions.push([pos[0] as f32, pos[1] as f32, pos[2] as f32]);
        }
    }

    let new_triangles = resolved
        .iter()
        .map(|face| {
            [
                new_index[face[0] as usize],
                new_index[face[1] as usize],
                new_index[face[2] as usize],
            ]
        })
        .collect();

    for group in &mut mesh.vertex_groups {
        let mut folded: HashMap<u32, f32> = HashMap::new();
        for &(vertex, weight) in &group.weights {
            let survivor = resolve(remap, vertex);
            if new_index[survivor as usize] != u32::MAX {
                let entry = folded.entry(new_index[survivor as usize]).or_insert(0.0);
                *entry = entry.max(weight);
            }
        }
        let mut weights: Vec<_> = folded.into_iter().collect();
        weights.sort_by_key(|&(i, _)| i);
        group.weights = weights;
    }

    mesh.positions = new_positions;
    mesh.triangles = new_triangles;
}

fn area(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let cross = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    0.5 * (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt()
}
