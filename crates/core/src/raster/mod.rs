//! Raster grid and georeferencing

mod element;
mod grid;
mod transform;

pub use element::RasterElement;
pub use grid::Raster;
pub use transform::GeoTransform;
