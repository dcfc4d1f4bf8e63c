//! Vector features carried to the export path

use geo_types::{Geometry, Polygon};
use std::collections::BTreeMap;

/// A geographic feature: one geometry plus free-form attributes
#[derive(Debug, Clone)]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub properties: BTreeMap<String, serde_json::Value>,
    pub id: Option<String>,
}

impl Feature {
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry,
            properties: BTreeMap::new(),
            id: None,
        }
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.properties.insert(key.into(), value);
    }

    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }
}

/// An ordered collection of features
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap bare polygons as attribute-less features
    pub fn from_polygons(polygons: Vec<Polygon<f64>>) -> Self {
        Self {
            features: polygons
                .into_iter()
                .map(|p| Feature::new(Geometry::Polygon(p)))
                .collect(),
        }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{LineString, Polygon};

    fn unit_square() -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (0.0, 0.0),
                (1.0, 0.0),
                (1.0, 1.0),
                (0.0, 1.0),
                (0.0, 0.0),
            ]),
            vec![],
        )
    }

    #[test]
    fn from_polygons_wraps_each() {
        let fc = FeatureCollection::from_polygons(vec![unit_square(), unit_square()]);
        assert_eq!(fc.len(), 2);
        assert!(fc.iter().all(|f| f.properties.is_empty()));
    }

    #[test]
    fn properties_roundtrip() {
        let mut f = Feature::new(Geometry::Polygon(unit_square()));
        f.set_property("label", serde_json::json!("changed"));
        assert_eq!(f.property("label"), Some(&serde_json::json!("changed")));
        assert_eq!(f.property("missing"), None);
    }
}
