//! GeoJSON serialization and the file export sink
//!
//! Lightweight serde models covering the subset TerraDiff emits: polygon
//! and multi-polygon features without foreign members.

use std::fs;
use std::path::{Path, PathBuf};

use geo_types::{Geometry, LineString, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::service::{ExportFormat, ExportSink};
use crate::vector::FeatureCollection;

// ---------------------------------------------------------------------------
// Wire models
// ---------------------------------------------------------------------------

/// A GeoJSON FeatureCollection document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonFeatureCollection {
    #[serde(rename = "type")]
    pub type_: String,
    pub features: Vec<GeoJsonFeature>,
}

/// A GeoJSON Feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type")]
    pub type_: String,

    pub geometry: GeoJsonGeometry,

    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Geometry variants TerraDiff emits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<[f64; 2]>>> },
}

fn ring_coords(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

fn polygon_coords(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    let mut rings = vec![ring_coords(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(ring_coords));
    rings
}

/// Convert a feature collection into its GeoJSON document.
///
/// Only polygonal geometries are representable here; anything else is an
/// error rather than a silent drop.
pub fn to_geojson(collection: &FeatureCollection) -> Result<GeoJsonFeatureCollection> {
    let mut features = Vec::with_capacity(collection.len());
    for feature in collection.iter() {
        let geometry = match &feature.geometry {
            Geometry::Polygon(p) => GeoJsonGeometry::Polygon {
                coordinates: polygon_coords(p),
            },
            Geometry::MultiPolygon(mp) => GeoJsonGeometry::MultiPolygon {
                coordinates: mp.0.iter().map(polygon_coords).collect(),
            },
            other => {
                return Err(Error::Export(format!(
                    "unsupported geometry for GeoJSON export: {other:?}"
                )))
            }
        };
        features.push(GeoJsonFeature {
            type_: "Feature".to_string(),
            geometry,
            properties: feature.properties.clone().into_iter().collect(),
            id: feature.id.clone(),
        });
    }
    Ok(GeoJsonFeatureCollection {
        type_: "FeatureCollection".to_string(),
        features,
    })
}

/// Serialize a feature collection to a `.geojson` file
pub fn write_geojson(collection: &FeatureCollection, path: &Path) -> Result<()> {
    let doc = to_geojson(collection)?;
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &doc)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// File sink
// ---------------------------------------------------------------------------

/// Export sink that persists tables under a local root directory as
/// `<root>/<destination>/<description>.geojson`.
#[derive(Debug, Clone)]
pub struct FileExport {
    root: PathBuf,
}

impl FileExport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ExportSink for FileExport {
    fn export_table(
        &self,
        table: &FeatureCollection,
        destination: &str,
        description: &str,
        format: ExportFormat,
    ) -> Result<()> {
        match format {
            ExportFormat::GeoJson => {
                let dir = self.root.join(destination);
                fs::create_dir_all(&dir)?;
                let path = dir.join(format!("{description}.geojson"));
                write_geojson(table, &path)
            }
        }
    }
}
