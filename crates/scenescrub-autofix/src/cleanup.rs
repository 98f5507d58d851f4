//! Geometry cleanup: merge near-coincident vertices, drop zero-area
//! triangles, drop vertices no triangle references.
//!
//! Runs before decimation so collapse costs aren't polluted by duplicate
//! geometry. Vertex-group weights follow every remap: a merged vertex hands
//! its weights to the surviving vertex (keeping the larger weight per group),
//! and removed vertices take their weight entries with them.

use scenescrub_graph::{Mesh, Thresholds};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Meshes below this vertex count are left untouched; tiny marker geometry
/// is usually intentional.
pub const MIN_CLEANUP_VERTICES: usize = 10;

/// What one cleanup pass changed on one mesh.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CleanupStats {
    pub doubles_merged: usize,
    pub degenerate_removed: usize,
    pub loose_removed: usize,
}

impl CleanupStats {
    /// True if the pass changed anything.
    pub fn changed(&self) -> bool {
        self.doubles_merged + self.degenerate_removed + self.loose_removed > 0
    }
}

/// Cleans one mesh in place. Idempotent: a second run finds nothing.
pub fn cleanup_mesh(mesh: &mut Mesh, thresholds: &Thresholds) -> CleanupStats {
    let stats = CleanupStats {
        doubles_merged: merge_doubles(mesh, thresholds.merge_distance),
        degenerate_removed: remove_degenerate_triangles(mesh, thresholds.degenerate_area),
        loose_removed: remove_loose_vertices(mesh),
    };
    if stats.changed() {
        debug!(
            mesh = %mesh.name,
            doubles = stats.doubles_merged,
            degenerate = stats.degenerate_removed,
            loose = stats.loose_removed,
            "cleaned mesh geometry"
        );
    }
    stats
}

/// Merges vertices within `distance` of each other until no pair remains.
fn merge_doubles(mesh: &mut Mesh, distance: f32) -> usize {
    let mut total = 0;
    loop {
        let merged = merge_pass(mesh, distance);
        if merged == 0 {
            return total;
        }
        total += merged;
    }
}

fn merge_pass(mesh: &mut Mesh, distance: f32) -> usize {
    let n = mesh.positions.len();
    if n == 0 {
        return 0;
    }

    let cell = f64::from(distance.max(f32::EPSILON));
    let quantize = |p: [f32; 3]| {
        (
            (f64::from(p[0]) / cell).floor() as i64,
            (f64::from(p[1]) / cell).floor() as i64,
            (f64::from(p[2]) / cell).floor() as i64,
        )
    };

    // First vertex in a neighborhood survives; later ones map onto it.
    let mut grid: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    let mut remap: Vec<u32> = Vec::with_capacity(n);
    let mut merged = 0usize;

    for i in 0..n {
        let p = mesh.positions[i];
        let (cx, cy, cz) = quantize(p);
        let mut found = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(bucket) = grid.get(&(cx + dx, cy + dy, cz + dz)) {
                        for &j in bucket {
                            if squared_distance(p, mesh.positions[j as usize])
                                <= distance * distance
                            {
                                found = Some(j);
                                break 'search;
                            }
                        }
                    }
                }
            }
        }
        match found {
            Some(j) => {
                remap.push(j);
                merged += 1;
            }
            None => {
                grid.entry((cx, cy, cz)).or_default().push(i as u32);
                remap.push(i as u32);
            }
        }
    }

    if merged == 0 {
        return 0;
    }

    for tri in &mut mesh.triangles {
        for idx in tri.iter_mut() {
            *idx = remap[*idx as usize];
        }
    }
    fold_weights(mesh, &remap);
    compact_vertices(mesh, |i| remap[i] == i as u32);
    merged
}

/// Removes triangles with repeated indices or area below `min_area`.
fn remove_degenerate_triangles(mesh: &mut Mesh, min_area: f32) -> usize {
    let positions = &mesh.positions;
    let before = mesh.triangles.len();
    mesh.triangles.retain(|tri| {
        if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
            return false;
        }
        triangle_area(
            positions[tri[0] as usize],
            positions[tri[1] as usize],
            positions[tri[2] as usize],
        ) >= min_area
    });
    before - mesh.triangles.len()
}

/// Removes vertices no triangle references.
fn remove_loose_vertices(mesh: &mut Mesh) -> usize {
    let mut used = vec![false; mesh.positions.len()];
    for tri in &mesh.triangles {
        for &idx in tri {
            used[idx as usize] = true;
        }
    }
    let loose = used.iter().filter(|&&u| !u).count();
    if loose > 0 {
        compact_vertices(mesh, |i| used[i]);
    }
    loose
}

/// Re-targets weight entries through `remap`, keeping the larger weight when
/// several vertices fold into one.
fn fold_weights(mesh: &mut Mesh, remap: &[u32]) {
    for group in &mut mesh.vertex_groups {
        let mut folded: HashMap<u32, f32> = HashMap::new();
        for &(idx, w) in &group.weights {
            let target = remap[idx as usize];
            let entry = folded.entry(target).or_insert(0.0);
            *entry = entry.max(w);
        }
        let mut weights: Vec<_> = folded.into_iter().collect();
        weights.sort_by_key(|&(i, _)| i);
        group.weights = weights;
    }
}

/// Drops vertices failing `keep` and renumbers triangles and weights.
/// Callers must already have re-pointed triangles at surviving vertices.
fn compact_vertices(mesh: &mut Mesh, keep: impl Fn(usize) -> bool) {
    let n = mesh.positions.len();
    let mut new_index = vec![u32::MAX; n];
    let mut new_positions = Vec::new();
    for i in 0..n {
        if keep(i) {
            new_index[i] = new_positions.len() as u32;
            new_positions.push(mesh.positions[i]);
        }
    }
    mesh.positions = new_positions;

    for tri in &mut mesh.triangles {
        for idx in tri.iter_mut() {
            *idx = new_index[*idx as usize];
        }
    }
    for group in &mut mesh.vertex_groups {
        group.weights.retain(|&(i, _)| new_index[i as usize] != u32::MAX);
        for entry in &mut group.weights {
            entry.0 = new_index[entry.0 as usize];
        }
    }
}

fn squared_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Area of a triangle via the cross-product magnitude.
pub(crate) fn triangle_area(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> f32 {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let cross = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    0.5 * (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt()
}
