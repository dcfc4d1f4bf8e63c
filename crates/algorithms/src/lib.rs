//! # TerraDiff Algorithms
//!
//! The local half of the change-detection pipeline:
//!
//! - **imagery**: temporal compositing and spectral index evaluation
//! - **change**: delta rasters and strict threshold masks
//! - **vector**: mask vectorization and convex clipping
//! - **detect**: the `ChangeDetector` pipeline and scenario presets

pub mod change;
pub mod detect;
pub mod imagery;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::change::{delta, threshold_mask, Comparator, DeltaOrder};
    pub use crate::detect::{presets, ChangeDetector, DetectParams};
    pub use crate::imagery::{
        composite_band, composite_stack, normalized_difference, IndexFormula,
    };
    pub use crate::vector::{clip_polygon_to_aoi, clip_ring, vectorize_mask};
    pub use terradiff_core::prelude::*;
}
