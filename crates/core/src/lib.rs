//! # TerraDiff Core
//!
//! Core types and contracts for the TerraDiff change-detection pipeline.
//!
//! This crate provides:
//! - `Raster<T>`: georeferenced raster grid
//! - `AreaOfInterest` / `DateRange`: analysis extent and temporal filters
//! - Collaborator contracts: imagery catalog, export sink, map view
//! - GeoJSON serialization for exported change regions

pub mod aoi;
pub mod error;
pub mod io;
pub mod raster;
pub mod service;
pub mod time;
pub mod vector;

pub use aoi::AreaOfInterest;
pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement};
pub use service::{
    ExportFormat, ExportSink, ImageryService, LayerStyle, MapView, NullMapView, Reducer, Scene,
    SceneQuery,
};
pub use time::DateRange;
pub use vector::{Feature, FeatureCollection};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aoi::AreaOfInterest;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::service::{ExportFormat, ExportSink, ImageryService, Reducer, Scene, SceneQuery};
    pub use crate::time::DateRange;
    pub use crate::vector::{Feature, FeatureCollection};
}
