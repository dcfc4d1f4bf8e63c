//! Collaborator contracts: imagery catalog, export sink, map view
//!
//! The pipeline never touches a global platform handle; every remote
//! collaborator is injected through one of these traits.

use std::collections::BTreeMap;

use crate::aoi::AreaOfInterest;
use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::time::DateRange;
use crate::vector::FeatureCollection;

/// Per-pixel temporal aggregation applied across the scenes of one window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    Median,
}

/// A catalog query for one time window
#[derive(Debug, Clone)]
pub struct SceneQuery {
    /// Catalog collection identifier, e.g. `"COPERNICUS/S2_SR"`
    pub collection: String,
    /// Spatial filter as `[west, south, east, north]`
    pub bbox: [f64; 4],
    /// Temporal filter
    pub range: DateRange,
    /// Bands the caller needs; the service may omit all others
    pub bands: Vec<String>,
}

/// One catalog image clipped to the query bbox
#[derive(Debug, Clone)]
pub struct Scene {
    pub id: String,
    /// Acquisition timestamp as reported by the catalog
    pub datetime: Option<String>,
    /// Band name -> single-band raster; all bands of a scene share shape
    /// and transform
    pub bands: BTreeMap<String, Raster<f64>>,
}

impl Scene {
    pub fn band(&self, name: &str) -> Result<&Raster<f64>> {
        self.bands
            .get(name)
            .ok_or_else(|| Error::MissingBand(name.to_string()))
    }
}

/// The imagery catalog contract.
///
/// Zero matching scenes is a normal outcome, not an error; implementations
/// return an empty vector and the pipeline produces an empty result.
pub trait ImageryService {
    /// All scenes of a collection intersecting the bbox within the range
    fn scenes(&self, query: &SceneQuery) -> Result<Vec<Scene>>;

    /// Fetch both windows of a detection.
    ///
    /// The two queries are independent; implementations may overlap the
    /// requests. The default issues them sequentially.
    fn scene_pair(
        &self,
        before: &SceneQuery,
        after: &SceneQuery,
    ) -> Result<(Vec<Scene>, Vec<Scene>)> {
        Ok((self.scenes(before)?, self.scenes(after)?))
    }
}

/// Output formats understood by export sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    GeoJson,
}

/// The export collaborator contract.
///
/// Delivery is fire-and-forget: the sink reports transport failures but no
/// delivery confirmation.
pub trait ExportSink {
    fn export_table(
        &self,
        table: &FeatureCollection,
        destination: &str,
        description: &str,
        format: ExportFormat,
    ) -> Result<()>;
}

/// Styling hints for a displayed layer
#[derive(Debug, Clone, Default)]
pub struct LayerStyle {
    pub palette: Vec<String>,
}

impl LayerStyle {
    pub fn palette(colors: &[&str]) -> Self {
        Self {
            palette: colors.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// The visualization collaborator contract: display side effects only,
/// nothing flows back into the pipeline.
pub trait MapView {
    fn center(&self, area: &AreaOfInterest, zoom: u8);
    fn add_layer(&self, label: &str, style: &LayerStyle);
}

/// Map view that discards everything, for headless use
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMapView;

impl MapView for NullMapView {
    fn center(&self, _area: &AreaOfInterest, _zoom: u8) {}
    fn add_layer(&self, _label: &str, _style: &LayerStyle) {}
}
