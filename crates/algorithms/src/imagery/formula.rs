//! The per-pixel quantity differenced between the two windows

use std::collections::BTreeMap;

use terradiff_core::raster::Raster;
use terradiff_core::{Error, Result};

use super::normalized_difference;

/// What gets computed from each composite before the epochs are differenced.
///
/// The optical scenarios difference a normalized-difference index; the radar
/// scenario differences a raw backscatter band directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexFormula {
    /// `(band_a - band_b) / (band_a + band_b)`
    NormalizedDifference { band_a: String, band_b: String },
    /// A single band, unchanged
    Band(String),
}

impl IndexFormula {
    pub fn normalized_difference(band_a: impl Into<String>, band_b: impl Into<String>) -> Self {
        Self::NormalizedDifference {
            band_a: band_a.into(),
            band_b: band_b.into(),
        }
    }

    pub fn band(name: impl Into<String>) -> Self {
        Self::Band(name.into())
    }

    /// The band names the formula reads
    pub fn bands(&self) -> Vec<String> {
        match self {
            Self::NormalizedDifference { band_a, band_b } => {
                vec![band_a.clone(), band_b.clone()]
            }
            Self::Band(name) => vec![name.clone()],
        }
    }

    /// Evaluate the formula over a composite's bands
    pub fn evaluate(&self, bands: &BTreeMap<String, Raster<f64>>) -> Result<Raster<f64>> {
        let lookup = |name: &str| {
            bands
                .get(name)
                .ok_or_else(|| Error::MissingBand(name.to_string()))
        };
        match self {
            Self::NormalizedDifference { band_a, band_b } => {
                normalized_difference(lookup(band_a)?, lookup(band_b)?)
            }
            Self::Band(name) => Ok(lookup(name)?.clone()),
        }
    }
}
