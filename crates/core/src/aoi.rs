//! Area of interest: the spatial extent of an analysis

use crate::error::{Error, Result};
use geo_types::{Coord, LineString, Polygon};

/// The spatial extent a detection runs over.
///
/// Either a closed lon/lat polygon or an axis-aligned rectangle. Validation
/// happens in [`AreaOfInterest::validate`], which callers invoke before any
/// remote request is issued.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaOfInterest {
    /// Polygon given as (longitude, latitude) vertices. The closing vertex
    /// may be repeated or omitted.
    Polygon(Vec<(f64, f64)>),
    /// Rectangle given as its lon/lat extremes.
    Rect {
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    },
}

impl AreaOfInterest {
    pub fn polygon(vertices: Vec<(f64, f64)>) -> Self {
        Self::Polygon(vertices)
    }

    pub fn rect(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self::Rect {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Check well-formedness: a polygon needs at least 3 distinct vertices,
    /// a rectangle needs min < max on both axes.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Polygon(vertices) => {
                let mut distinct: Vec<(f64, f64)> = Vec::with_capacity(vertices.len());
                for &v in vertices {
                    if !distinct.contains(&v) {
                        distinct.push(v);
                    }
                }
                if distinct.len() < 3 {
                    return Err(Error::DegenerateArea(distinct.len()));
                }
                Ok(())
            }
            Self::Rect {
                min_lon,
                min_lat,
                max_lon,
                max_lat,
            } => {
                if min_lon >= max_lon || min_lat >= max_lat {
                    return Err(Error::InvertedBounds {
                        min_lon: *min_lon,
                        min_lat: *min_lat,
                        max_lon: *max_lon,
                        max_lat: *max_lat,
                    });
                }
                Ok(())
            }
        }
    }

    /// Bounding box as `[west, south, east, north]`
    pub fn bbox(&self) -> [f64; 4] {
        match self {
            Self::Polygon(vertices) => {
                let mut west = f64::INFINITY;
                let mut south = f64::INFINITY;
                let mut east = f64::NEG_INFINITY;
                let mut north = f64::NEG_INFINITY;
                for &(lon, lat) in vertices {
                    west = west.min(lon);
                    south = south.min(lat);
                    east = east.max(lon);
                    north = north.max(lat);
                }
                [west, south, east, north]
            }
            Self::Rect {
                min_lon,
                min_lat,
                max_lon,
                max_lat,
            } => [*min_lon, *min_lat, *max_lon, *max_lat],
        }
    }

    /// Whether a point falls inside the area.
    ///
    /// Rectangles are closed on all edges. Polygons use even-odd ray casting;
    /// points exactly on an edge may fall either way.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        match self {
            Self::Rect {
                min_lon,
                min_lat,
                max_lon,
                max_lat,
            } => lon >= *min_lon && lon <= *max_lon && lat >= *min_lat && lat <= *max_lat,
            Self::Polygon(vertices) => {
                let ring = dedup_ring(vertices);
                let n = ring.len();
                if n < 3 {
                    return false;
                }
                let mut inside = false;
                let mut j = n - 1;
                for i in 0..n {
                    let (xi, yi) = ring[i];
                    let (xj, yj) = ring[j];
                    if (yi > lat) != (yj > lat) {
                        let x_cross = xj + (lat - yj) / (yi - yj) * (xi - xj);
                        if lon < x_cross {
                            inside = !inside;
                        }
                    }
                    j = i;
                }
                inside
            }
        }
    }

    /// The boundary as a closed ring of coordinates
    pub fn exterior(&self) -> Vec<Coord<f64>> {
        let mut ring: Vec<Coord<f64>> = match self {
            Self::Polygon(vertices) => dedup_ring(vertices)
                .into_iter()
                .map(|(x, y)| Coord { x, y })
                .collect(),
            Self::Rect {
                min_lon,
                min_lat,
                max_lon,
                max_lat,
            } => vec![
                Coord {
                    x: *min_lon,
                    y: *min_lat,
                },
                Coord {
                    x: *max_lon,
                    y: *min_lat,
                },
                Coord {
                    x: *max_lon,
                    y: *max_lat,
                },
                Coord {
                    x: *min_lon,
                    y: *max_lat,
                },
            ],
        };
        if let Some(&first) = ring.first() {
            ring.push(first);
        }
        ring
    }

    /// The area as a `geo` polygon
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::new(self.exterior()), vec![])
    }
}

/// Strip a repeated closing vertex so the ring is open
fn dedup_ring(vertices: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut ring = vertices.to_vec();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> AreaOfInterest {
        AreaOfInterest::polygon(vec![
            (-122.092, 37.424),
            (-122.086, 37.418),
            (-122.079, 37.425),
            (-122.085, 37.43),
        ])
    }

    #[test]
    fn valid_polygon_and_rect() {
        assert!(quad().validate().is_ok());
        assert!(AreaOfInterest::rect(-122.092, 37.42, -122.08, 37.431)
            .validate()
            .is_ok());
    }

    #[test]
    fn degenerate_polygon_rejected() {
        let two = AreaOfInterest::polygon(vec![(0.0, 0.0), (1.0, 1.0)]);
        assert!(matches!(two.validate(), Err(Error::DegenerateArea(2))));

        // Repeated vertices don't count as distinct
        let fake = AreaOfInterest::polygon(vec![(0.0, 0.0), (1.0, 1.0), (0.0, 0.0), (1.0, 1.0)]);
        assert!(matches!(fake.validate(), Err(Error::DegenerateArea(2))));
    }

    #[test]
    fn inverted_rect_rejected() {
        let r = AreaOfInterest::rect(10.0, 0.0, 5.0, 1.0);
        assert!(matches!(r.validate(), Err(Error::InvertedBounds { .. })));
    }

    #[test]
    fn bbox_of_polygon() {
        let [w, s, e, n] = quad().bbox();
        assert_eq!(w, -122.092);
        assert_eq!(s, 37.418);
        assert_eq!(e, -122.079);
        assert_eq!(n, 37.43);
    }

    #[test]
    fn rect_containment_is_closed() {
        let r = AreaOfInterest::rect(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(5.0, 5.0));
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(10.0, 10.0));
        assert!(!r.contains(10.001, 5.0));
    }

    #[test]
    fn polygon_containment() {
        let tri = AreaOfInterest::polygon(vec![(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]);
        assert!(tri.contains(5.0, 2.0));
        assert!(!tri.contains(0.5, 9.0));
        assert!(!tri.contains(-1.0, 0.5));
    }

    #[test]
    fn exterior_is_closed_ring() {
        let ring = quad().exterior();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());

        let rect_ring = AreaOfInterest::rect(0.0, 0.0, 1.0, 1.0).exterior();
        assert_eq!(rect_ring.len(), 5);
        assert_eq!(rect_ring.first(), rect_ring.last());
    }
}
