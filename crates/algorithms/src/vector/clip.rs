//! Convex clipping
//!
//! Sutherland-Hodgman clipping of polygon rings against a convex clip
//! ring. The axis-aligned special case (rectangular areas of interest)
//! falls out of the general half-plane form.

use geo::{Coord, LineString, Polygon};
use terradiff_core::aoi::AreaOfInterest;

/// Clip a ring against a convex clip ring.
///
/// Both rings may be given open or closed. The result is an open ring; it
/// is empty when the subject lies entirely outside the clip boundary.
/// Concave clip rings are not supported and clip as their convex
/// traversal would.
pub fn clip_ring(subject: &[Coord<f64>], clip: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let clip = open_ring(clip);
    let mut vertices = open_ring(subject).to_vec();
    if clip.len() < 3 || vertices.is_empty() {
        return Vec::new();
    }

    // Half-plane test must match the clip ring's winding
    let ccw = ring_signed_area(clip) >= 0.0;

    let n = clip.len();
    for i in 0..n {
        let a = clip[i];
        let b = clip[(i + 1) % n];
        vertices = clip_against_edge(&vertices, a, b, ccw);
        if vertices.is_empty() {
            return Vec::new();
        }
    }
    vertices
}

/// One Sutherland-Hodgman pass against the half-plane of edge a->b
fn clip_against_edge(vertices: &[Coord<f64>], a: Coord<f64>, b: Coord<f64>, ccw: bool) -> Vec<Coord<f64>> {
    let inside = |p: &Coord<f64>| {
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        if ccw {
            cross >= 0.0
        } else {
            cross <= 0.0
        }
    };

    let mut output = Vec::with_capacity(vertices.len() + 1);
    let n = vertices.len();
    for i in 0..n {
        let current = vertices[i];
        let next = vertices[(i + 1) % n];

        match (inside(&current), inside(&next)) {
            (true, true) => output.push(next),
            (true, false) => output.push(intersect(current, next, a, b)),
            (false, true) => {
                output.push(intersect(current, next, a, b));
                output.push(next);
            }
            (false, false) => {}
        }
    }
    output
}

/// Intersection of segment p->q with the infinite line through a->b
fn intersect(p: Coord<f64>, q: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> Coord<f64> {
    let edge = (b.x - a.x, b.y - a.y);
    let seg = (q.x - p.x, q.y - p.y);
    let denom = edge.0 * seg.1 - edge.1 * seg.0;
    if denom.abs() < 1e-15 {
        // Parallel; the caller only reaches this with one endpoint on each
        // side, so fall back to the segment end
        return q;
    }
    let t = (edge.0 * (p.y - a.y) - edge.1 * (p.x - a.x)) / denom;
    Coord {
        x: p.x + t * seg.0,
        y: p.y + t * seg.1,
    }
}

fn open_ring(ring: &[Coord<f64>]) -> &[Coord<f64>] {
    if ring.len() > 1 && ring.first() == ring.last() {
        &ring[..ring.len() - 1]
    } else {
        ring
    }
}

fn ring_signed_area(ring: &[Coord<f64>]) -> f64 {
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let p = ring[i];
        let q = ring[(i + 1) % n];
        sum += p.x * q.y - q.x * p.y;
    }
    sum / 2.0
}

/// Clip a polygon against the boundary of an area of interest.
///
/// Exterior and interior rings are clipped independently; interior rings
/// that degenerate are dropped. Returns `None` when the polygon lies
/// entirely outside the area.
pub fn clip_polygon_to_aoi(polygon: &Polygon<f64>, area: &AreaOfInterest) -> Option<Polygon<f64>> {
    let boundary = area.exterior();

    let exterior = clip_ring(&polygon.exterior().0, &boundary);
    if exterior.len() < 3 {
        return None;
    }

    let interiors: Vec<LineString<f64>> = polygon
        .interiors()
        .iter()
        .filter_map(|ring| {
            let clipped = clip_ring(&ring.0, &boundary);
            (clipped.len() >= 3).then(|| LineString::new(close_ring(clipped)))
        })
        .collect();

    Some(Polygon::new(
        LineString::new(close_ring(exterior)),
        interiors,
    ))
}

fn close_ring(mut ring: Vec<Coord<f64>>) -> Vec<Coord<f64>> {
    if let Some(&first) = ring.first() {
        if ring.last() != Some(&first) {
            ring.push(first);
        }
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    fn square(min: f64, max: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (min, min),
                (max, min),
                (max, max),
                (min, max),
                (min, min),
            ]),
            vec![],
        )
    }

    #[test]
    fn fully_inside_is_unchanged() {
        let area = AreaOfInterest::rect(0.0, 0.0, 10.0, 10.0);
        let clipped = clip_polygon_to_aoi(&square(2.0, 8.0), &area).unwrap();
        assert!((clipped.unsigned_area() - 36.0).abs() < 1e-10);
    }

    #[test]
    fn straddling_polygon_is_cut_to_the_boundary() {
        let area = AreaOfInterest::rect(0.0, 0.0, 10.0, 10.0);
        let clipped = clip_polygon_to_aoi(&square(5.0, 15.0), &area).unwrap();

        assert!((clipped.unsigned_area() - 25.0).abs() < 1e-10);
        for c in clipped.exterior().coords() {
            assert!(c.x >= -1e-10 && c.x <= 10.0 + 1e-10);
            assert!(c.y >= -1e-10 && c.y <= 10.0 + 1e-10);
        }
    }

    #[test]
    fn fully_outside_is_dropped() {
        let area = AreaOfInterest::rect(0.0, 0.0, 10.0, 10.0);
        assert!(clip_polygon_to_aoi(&square(20.0, 30.0), &area).is_none());
    }

    #[test]
    fn convex_quad_boundary() {
        // Diamond-shaped AOI
        let area = AreaOfInterest::polygon(vec![(5.0, 0.0), (10.0, 5.0), (5.0, 10.0), (0.0, 5.0)]);
        let clipped = clip_polygon_to_aoi(&square(0.0, 10.0), &area).unwrap();

        // The square clipped to the inscribed diamond is the diamond itself
        assert!((clipped.unsigned_area() - 50.0).abs() < 1e-10);
        for c in clipped.exterior().coords() {
            assert!(area.contains(c.x, c.y) || on_diamond_edge(*c));
        }
    }

    fn on_diamond_edge(c: Coord<f64>) -> bool {
        ((c.x - 5.0).abs() + (c.y - 5.0).abs() - 5.0).abs() < 1e-10
    }

    #[test]
    fn clip_ring_accepts_either_winding() {
        let subject: Vec<Coord<f64>> = vec![
            Coord { x: -5.0, y: 2.0 },
            Coord { x: 5.0, y: 2.0 },
            Coord { x: 5.0, y: 8.0 },
            Coord { x: -5.0, y: 8.0 },
        ];
        let ccw: Vec<Coord<f64>> = vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: 10.0, y: 10.0 },
            Coord { x: 0.0, y: 10.0 },
        ];
        let cw: Vec<Coord<f64>> = ccw.iter().rev().copied().collect();

        let from_ccw = clip_ring(&subject, &ccw);
        let from_cw = clip_ring(&subject, &cw);
        assert_eq!(from_ccw.len(), from_cw.len());
        assert!((ring_signed_area(&from_ccw).abs() - ring_signed_area(&from_cw).abs()).abs() < 1e-10);
    }

    #[test]
    fn hole_clipped_with_its_polygon() {
        let area = AreaOfInterest::rect(0.0, 0.0, 10.0, 10.0);
        let outer = LineString::from(vec![
            (2.0, 2.0),
            (8.0, 2.0),
            (8.0, 8.0),
            (2.0, 8.0),
            (2.0, 2.0),
        ]);
        let inner = LineString::from(vec![
            (4.0, 4.0),
            (6.0, 4.0),
            (6.0, 6.0),
            (4.0, 6.0),
            (4.0, 4.0),
        ]);
        let poly = Polygon::new(outer, vec![inner]);

        let clipped = clip_polygon_to_aoi(&poly, &area).unwrap();
        assert_eq!(clipped.interiors().len(), 1);
    }
}
