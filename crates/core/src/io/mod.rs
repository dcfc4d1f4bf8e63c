//! Serialization and file delivery for vector outputs

mod geojson;

pub use geojson::{
    to_geojson, write_geojson, FileExport, GeoJsonFeature, GeoJsonFeatureCollection,
    GeoJsonGeometry,
};
