//! Mask vectorization
//!
//! Groups 4-connected changed pixels into components and traces each
//! component's boundary into polygon rings. Rings follow pixel corners;
//! the component interior stays on the right of every directed edge, so
//! exterior rings and hole rings come out with opposite winding and are
//! told apart by the sign of their pixel-space area.

use std::collections::{HashMap, VecDeque};

use geo::{Coord, LineString, Polygon};
use ndarray::Array2;
use terradiff_core::raster::{GeoTransform, Raster};

use crate::change::MASK_CHANGED;

/// 4-neighborhood as (row, col) offsets
const OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

type Vertex = (i64, i64);
type Edge = (Vertex, Vertex);

/// Convert a change mask into one polygon per 4-connected component of
/// changed pixels.
///
/// Holes (enclosed unchanged pixels) become interior rings. Ring
/// coordinates are geographic, mapped through the mask's transform.
pub fn vectorize_mask(mask: &Raster<u8>) -> Vec<Polygon<f64>> {
    let (rows, cols) = mask.shape();
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let (labels, count) = label_components(mask);
    if count == 0 {
        return Vec::new();
    }

    // Boundary edges per component, directed with the interior on the right
    let mut edges: Vec<Vec<Edge>> = vec![Vec::new(); count as usize];
    let label_at = |r: isize, c: isize| -> i32 {
        if r < 0 || c < 0 || r >= rows as isize || c >= cols as isize {
            0
        } else {
            labels[(r as usize, c as usize)]
        }
    };
    for row in 0..rows {
        for col in 0..cols {
            let label = labels[(row, col)];
            if label == 0 {
                continue;
            }
            let (r, c) = (row as isize, col as isize);
            let (x, y) = (col as i64, row as i64);
            let bucket = &mut edges[(label - 1) as usize];
            if label_at(r - 1, c) != label {
                bucket.push(((x, y), (x + 1, y)));
            }
            if label_at(r, c + 1) != label {
                bucket.push(((x + 1, y), (x + 1, y + 1)));
            }
            if label_at(r + 1, c) != label {
                bucket.push(((x + 1, y + 1), (x, y + 1)));
            }
            if label_at(r, c - 1) != label {
                bucket.push(((x, y + 1), (x, y)));
            }
        }
    }

    let transform = *mask.transform();
    let mut polygons = Vec::with_capacity(count as usize);
    for bucket in &edges {
        polygons.extend(assemble_polygons(bucket, &transform));
    }
    polygons
}

/// BFS labeling of 4-connected changed pixels. Returns the label grid
/// (0 = background) and the component count.
fn label_components(mask: &Raster<u8>) -> (Array2<i32>, i32) {
    let (rows, cols) = mask.shape();
    let mut labels = Array2::<i32>::zeros((rows, cols));
    let mut count = 0i32;
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    for row in 0..rows {
        for col in 0..cols {
            if labels[(row, col)] != 0 {
                continue;
            }
            if unsafe { mask.get_unchecked(row, col) } != MASK_CHANGED {
                continue;
            }

            count += 1;
            labels[(row, col)] = count;
            queue.push_back((row, col));

            while let Some((r, c)) = queue.pop_front() {
                for (dr, dc) in OFFSETS {
                    let nr = r as isize + dr;
                    let nc = c as isize + dc;
                    if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                        continue;
                    }
                    let (nr, nc) = (nr as usize, nc as usize);
                    if labels[(nr, nc)] != 0 {
                        continue;
                    }
                    if unsafe { mask.get_unchecked(nr, nc) } != MASK_CHANGED {
                        continue;
                    }
                    labels[(nr, nc)] = count;
                    queue.push_back((nr, nc));
                }
            }
        }
    }

    (labels, count)
}

/// Chain one component's boundary edges into rings and build its polygons.
///
/// A component normally yields one exterior ring; pinched components
/// (cells touching only at a corner) may split into several, each emitted
/// as its own polygon. Hole rings attach to the exterior that contains
/// them.
fn assemble_polygons(edges: &[Edge], transform: &GeoTransform) -> Vec<Polygon<f64>> {
    let rings = chain_rings(edges);

    let mut exteriors: Vec<Vec<Vertex>> = Vec::new();
    let mut holes: Vec<Vec<Vertex>> = Vec::new();
    for ring in rings {
        if pixel_area(&ring) > 0.0 {
            exteriors.push(ring);
        } else {
            holes.push(ring);
        }
    }

    if exteriors.is_empty() {
        return Vec::new();
    }

    let mut interiors: Vec<Vec<LineString<f64>>> = vec![Vec::new(); exteriors.len()];
    for hole in &holes {
        let probe = hole_probe(hole);
        let target = exteriors
            .iter()
            .position(|ext| ring_contains(ext, probe))
            .unwrap_or(0);
        interiors[target].push(to_geo_ring(hole, transform));
    }

    exteriors
        .iter()
        .zip(interiors)
        .map(|(ext, holes)| Polygon::new(to_geo_ring(ext, transform), holes))
        .collect()
}

/// Link directed edges into closed rings, preferring the sharpest turn
/// toward the interior at junction vertices.
fn chain_rings(edges: &[Edge]) -> Vec<Vec<Vertex>> {
    let mut outgoing: HashMap<Vertex, Vec<usize>> = HashMap::new();
    for (i, (from, _)) in edges.iter().enumerate() {
        outgoing.entry(*from).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        let origin = edges[start].0;
        let mut ring: Vec<Vertex> = Vec::new();
        let mut current = start;
        loop {
            used[current] = true;
            let (from, to) = edges[current];
            ring.push(from);
            if to == origin {
                rings.push(simplify_ring(ring));
                break;
            }
            let dir = (to.0 - from.0, to.1 - from.1);
            match next_edge(edges, &outgoing, &used, to, dir) {
                Some(next) => current = next,
                // Unreachable for well-formed edge sets; drop the partial ring
                None => break,
            }
        }
    }

    rings
}

fn next_edge(
    edges: &[Edge],
    outgoing: &HashMap<Vertex, Vec<usize>>,
    used: &[bool],
    vertex: Vertex,
    dir: (i64, i64),
) -> Option<usize> {
    let candidates = outgoing.get(&vertex)?;
    // Right turn hugs the interior, then straight, then left
    let preferences = [(-dir.1, dir.0), dir, (dir.1, -dir.0)];
    for pref in preferences {
        for &i in candidates {
            if used[i] {
                continue;
            }
            let (from, to) = edges[i];
            if (to.0 - from.0, to.1 - from.1) == pref {
                return Some(i);
            }
        }
    }
    None
}

/// Drop vertices that continue in the same direction
fn simplify_ring(ring: Vec<Vertex>) -> Vec<Vertex> {
    let n = ring.len();
    if n < 3 {
        return ring;
    }
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let here = ring[i];
        let next = ring[(i + 1) % n];
        let d_in = (here.0 - prev.0, here.1 - prev.1);
        let d_out = (next.0 - here.0, next.1 - here.1);
        if d_in != d_out {
            out.push(here);
        }
    }
    out
}

/// Twice the signed shoelace area in pixel coordinates.
///
/// Positive for exterior rings, negative for holes, given the edge
/// orientation used above.
fn pixel_area(ring: &[Vertex]) -> f64 {
    let n = ring.len();
    let mut sum = 0i64;
    for i in 0..n {
        let (x0, y0) = ring[i];
        let (x1, y1) = ring[(i + 1) % n];
        sum += x0 * y1 - x1 * y0;
    }
    sum as f64
}

/// A point strictly inside the component, half a cell to the right of the
/// hole ring's first edge
fn hole_probe(ring: &[Vertex]) -> (f64, f64) {
    let (x0, y0) = ring[0];
    let (x1, y1) = ring[1 % ring.len()];
    let dx = (x1 - x0) as f64;
    let dy = (y1 - y0) as f64;
    let len = (dx * dx + dy * dy).sqrt().max(1.0);
    let (mx, my) = ((x0 + x1) as f64 / 2.0, (y0 + y1) as f64 / 2.0);
    (mx + 0.5 * (-dy / len), my + 0.5 * (dx / len))
}

/// Even-odd containment test in pixel coordinates
fn ring_contains(ring: &[Vertex], point: (f64, f64)) -> bool {
    let (px, py) = point;
    let n = ring.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i].0 as f64, ring[i].1 as f64);
        let (xj, yj) = (ring[j].0 as f64, ring[j].1 as f64);
        if (yi > py) != (yj > py) {
            let x_cross = xj + (py - yj) / (yi - yj) * (xi - xj);
            if px < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Map a pixel-corner ring to geographic coordinates and close it
fn to_geo_ring(ring: &[Vertex], transform: &GeoTransform) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = ring
        .iter()
        .map(|&(x, y)| {
            let (gx, gy) = transform.corner(x as usize, y as usize);
            Coord { x: gx, y: gy }
        })
        .collect();
    if let Some(&first) = coords.first() {
        coords.push(first);
    }
    LineString::new(coords)
}
