//! Vector operations on masks and polygons
//!
//! - Vectorize: connected changed pixels to polygon geometries
//! - Clip: Sutherland-Hodgman against a convex boundary

mod clip;
mod vectorize;

pub use clip::{clip_polygon_to_aoi, clip_ring};
pub use vectorize::vectorize_mask;
