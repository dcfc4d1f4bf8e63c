//! Scenario presets
//!
//! The three operational parameterizations with their original literal
//! constants, kept as named configuration so each run stays reproducible
//! as a regression fixture.

use terradiff_core::aoi::AreaOfInterest;
use terradiff_core::service::Reducer;
use terradiff_core::time::DateRange;

use super::DetectParams;
use crate::change::{Comparator, DeltaOrder};
use crate::imagery::IndexFormula;

fn range(start: &str, end: &str) -> DateRange {
    DateRange::parse(start, end).expect("preset dates are literal and ordered")
}

/// Burnt-area mapping: drop of the NBR-style index over MODIS surface
/// reflectance, pre-fire minus post-fire.
pub fn fire() -> DetectParams {
    DetectParams {
        area: AreaOfInterest::polygon(vec![
            (-122.092, 37.424),
            (-122.086, 37.418),
            (-122.079, 37.425),
            (-122.085, 37.43),
        ]),
        collection: "MODIS/006/MOD09GA".to_string(),
        range_before: range("2022-01-01", "2022-01-15"),
        range_after: range("2022-02-01", "2022-02-15"),
        formula: IndexFormula::normalized_difference("sur_refl_b02", "sur_refl_b07"),
        reducer: Reducer::Mean,
        delta_order: DeltaOrder::BeforeMinusAfter,
        comparator: Comparator::Gt,
        threshold: 0.2,
    }
}

/// Flood mapping: rise in Sentinel-1 backscatter, post minus pre.
///
/// The source thresholds the raw difference of the mean composites; the
/// VV polarization carries that comparison here.
pub fn flood() -> DetectParams {
    DetectParams {
        area: AreaOfInterest::rect(-122.092, 37.42, -122.08, 37.431),
        collection: "COPERNICUS/S1_GRD".to_string(),
        range_before: range("2022-06-01", "2022-06-15"),
        range_after: range("2022-07-01", "2022-07-15"),
        formula: IndexFormula::band("VV"),
        reducer: Reducer::Mean,
        delta_order: DeltaOrder::AfterMinusBefore,
        comparator: Comparator::Gt,
        threshold: 1.0,
    }
}

/// Forest-loss mapping: drop in Sentinel-2 NDVI between the two windows,
/// median composites.
pub fn forest_loss() -> DetectParams {
    DetectParams {
        area: AreaOfInterest::rect(-122.092, 37.42, -122.08, 37.438),
        collection: "COPERNICUS/S2_SR".to_string(),
        range_before: range("2022-01-01", "2022-01-31"),
        range_after: range("2022-06-01", "2022-06-30"),
        formula: IndexFormula::normalized_difference("B8", "B4"),
        reducer: Reducer::Median,
        delta_order: DeltaOrder::BeforeMinusAfter,
        comparator: Comparator::Gt,
        threshold: 0.3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_preset_constants() {
        let p = fire();
        assert!(p.area.validate().is_ok());
        assert_eq!(p.collection, "MODIS/006/MOD09GA");
        assert_eq!(p.range_before.interval(), "2022-01-01/2022-01-15");
        assert_eq!(p.range_after.interval(), "2022-02-01/2022-02-15");
        assert_eq!(
            p.formula,
            IndexFormula::normalized_difference("sur_refl_b02", "sur_refl_b07")
        );
        assert_eq!(p.delta_order, DeltaOrder::BeforeMinusAfter);
        assert_eq!(p.comparator, Comparator::Gt);
        assert_eq!(p.threshold, 0.2);
    }

    #[test]
    fn flood_preset_constants() {
        let p = flood();
        assert!(p.area.validate().is_ok());
        assert_eq!(p.area.bbox(), [-122.092, 37.42, -122.08, 37.431]);
        assert_eq!(p.collection, "COPERNICUS/S1_GRD");
        assert_eq!(p.formula, IndexFormula::band("VV"));
        assert_eq!(p.delta_order, DeltaOrder::AfterMinusBefore);
        assert_eq!(p.threshold, 1.0);
    }

    #[test]
    fn forest_loss_preset_constants() {
        let p = forest_loss();
        assert!(p.area.validate().is_ok());
        assert_eq!(p.area.bbox(), [-122.092, 37.42, -122.08, 37.438]);
        assert_eq!(p.collection, "COPERNICUS/S2_SR");
        assert_eq!(p.formula, IndexFormula::normalized_difference("B8", "B4"));
        assert_eq!(p.reducer, Reducer::Median);
        assert_eq!(p.threshold, 0.3);
    }

    #[test]
    fn all_presets_use_strict_greater_than() {
        for p in [fire(), flood(), forest_loss()] {
            assert_eq!(p.comparator, Comparator::Gt);
        }
    }
}
