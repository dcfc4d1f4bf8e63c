//! Wire models for the scene service
//!
//! Lightweight serde models for `POST /scenes` requests and responses.
//! The engine selects and clips imagery server-side; pixel data arrives
//! as row-major band arrays with `null` marking nodata (JSON has no NaN).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use terradiff_core::service::{Scene, SceneQuery};
use terradiff_core::{GeoTransform, Raster};

use crate::error::{CloudError, Result};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Body for `POST /scenes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneRequest {
    pub collection: String,

    /// `[west, south, east, north]`
    pub bbox: [f64; 4],

    /// Interval notation, e.g. `"2022-01-01/2022-01-15"`
    pub datetime: String,

    /// Bands the response must carry
    pub bands: Vec<String>,

    /// Cap on returned scenes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl SceneRequest {
    /// Build the wire request for a catalog query
    pub fn from_query(query: &SceneQuery) -> Self {
        Self {
            collection: query.collection.clone(),
            bbox: query.bbox,
            datetime: query.range.interval(),
            bands: query.bands.clone(),
            limit: None,
        }
    }

    /// Set the scene cap
    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Response body for `POST /scenes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneResponse {
    pub scenes: Vec<SceneDto>,

    #[serde(rename = "numberReturned", skip_serializing_if = "Option::is_none")]
    pub number_returned: Option<u64>,
}

/// One catalog scene clipped to the request bbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDto {
    pub id: String,

    /// ISO 8601 acquisition timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    pub rows: usize,
    pub cols: usize,

    /// `[origin_x, origin_y, pixel_width, pixel_height]`
    pub transform: [f64; 4],

    /// Band name -> row-major samples; `null` marks nodata
    pub bands: BTreeMap<String, Vec<Option<f64>>>,
}

impl SceneDto {
    /// Decode into the core scene type, mapping `null` samples to NaN
    pub fn into_scene(self) -> Result<Scene> {
        let [origin_x, origin_y, pixel_width, pixel_height] = self.transform;
        let transform = GeoTransform::new(origin_x, origin_y, pixel_width, pixel_height);
        let expected = self.rows * self.cols;

        let mut bands = BTreeMap::new();
        for (name, samples) in self.bands {
            if samples.len() != expected {
                return Err(CloudError::PayloadShape {
                    band: name,
                    expected,
                    got: samples.len(),
                });
            }
            let values: Vec<f64> = samples
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            let mut raster = Raster::from_vec(values, self.rows, self.cols)?;
            raster.set_transform(transform);
            raster.set_nodata(Some(f64::NAN));
            bands.insert(name, raster);
        }

        Ok(Scene {
            id: self.id,
            datetime: self.datetime,
            bands,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
