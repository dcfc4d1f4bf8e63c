//! The bitemporal detection pipeline
//!
//! `ChangeDetector` chains the stages of one run over an injected imagery
//! service: validate inputs, fetch both windows, composite each stack,
//! evaluate the index, difference, threshold, vectorize, clip.
//!
//! The detector holds no state between runs; identical inputs against an
//! unchanged catalog produce identical regions.

pub mod presets;

use geo::Polygon;
use terradiff_core::aoi::AreaOfInterest;
use terradiff_core::service::{ImageryService, Reducer, SceneQuery};
use terradiff_core::time::DateRange;
use terradiff_core::Result;

use crate::change::{apply_area_mask, delta, threshold_mask, Comparator, DeltaOrder};
use crate::imagery::{composite_stack, IndexFormula};
use crate::vector::{clip_polygon_to_aoi, vectorize_mask};

/// Parameters of one detection run.
///
/// All of these were literal constants in the operational scripts; see
/// [`presets`] for the original parameterizations.
#[derive(Debug, Clone)]
pub struct DetectParams {
    pub area: AreaOfInterest,
    /// Catalog collection identifier
    pub collection: String,
    pub range_before: DateRange,
    pub range_after: DateRange,
    /// Per-pixel quantity differenced between the epochs
    pub formula: IndexFormula,
    /// Temporal aggregation within each window
    pub reducer: Reducer,
    /// Which epoch is the minuend
    pub delta_order: DeltaOrder,
    pub comparator: Comparator,
    pub threshold: f64,
}

/// The change-detection pipeline over an injected imagery service
pub struct ChangeDetector<'a, S: ImageryService> {
    service: &'a S,
}

impl<'a, S: ImageryService> ChangeDetector<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Run one detection and return the changed regions clipped to the
    /// area of interest.
    ///
    /// An empty catalog response for either window yields an empty result,
    /// not an error. Malformed inputs fail before any service call.
    pub fn detect(&self, params: &DetectParams) -> Result<Vec<Polygon<f64>>> {
        params.area.validate()?;

        let bands = params.formula.bands();
        let bbox = params.area.bbox();
        let query = |range: DateRange| SceneQuery {
            collection: params.collection.clone(),
            bbox,
            range,
            bands: bands.clone(),
        };

        let (scenes_before, scenes_after) = self
            .service
            .scene_pair(&query(params.range_before), &query(params.range_after))?;

        let Some(composite_before) = composite_stack(&scenes_before, &bands, params.reducer)?
        else {
            return Ok(Vec::new());
        };
        let Some(composite_after) = composite_stack(&scenes_after, &bands, params.reducer)? else {
            return Ok(Vec::new());
        };

        let index_before = params.formula.evaluate(&composite_before)?;
        let index_after = params.formula.evaluate(&composite_after)?;

        let diff = delta(&index_before, &index_after, params.delta_order)?;
        let mut mask = threshold_mask(&diff, params.comparator, params.threshold)?;
        apply_area_mask(&mut mask, &params.area)?;

        Ok(vectorize_mask(&mask)
            .iter()
            .filter_map(|p| clip_polygon_to_aoi(p, &params.area))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use terradiff_core::service::Scene;
    use terradiff_core::{Error, GeoTransform, Raster};

    /// In-memory catalog keyed by date-range interval
    struct MockCatalog {
        by_interval: HashMap<String, Vec<Scene>>,
        calls: AtomicUsize,
    }

    impl MockCatalog {
        fn new() -> Self {
            Self {
                by_interval: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn insert(&mut self, interval: &str, scenes: Vec<Scene>) {
            self.by_interval.insert(interval.to_string(), scenes);
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ImageryService for MockCatalog {
        fn scenes(&self, query: &SceneQuery) -> Result<Vec<Scene>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .by_interval
                .get(&query.range.interval())
                .cloned()
                .unwrap_or_default())
        }
    }

    const ROWS: usize = 8;
    const COLS: usize = 8;

    /// 8x8 grid over [0,8]x[0,8], one unit per cell
    fn grid_transform() -> GeoTransform {
        GeoTransform::new(0.0, ROWS as f64, 1.0, -1.0)
    }

    fn band(value: f64, block: Option<(std::ops::Range<usize>, std::ops::Range<usize>, f64)>) -> Raster<f64> {
        let mut r = Raster::filled(ROWS, COLS, value);
        r.set_transform(grid_transform());
        r.set_nodata(Some(f64::NAN));
        if let Some((rows, cols, v)) = block {
            for row in rows {
                for col in cols.clone() {
                    r.set(row, col, v).unwrap();
                }
            }
        }
        r
    }

    fn scene(id: &str, bands: Vec<(&str, Raster<f64>)>) -> Scene {
        Scene {
            id: id.to_string(),
            datetime: None,
            bands: bands
                .into_iter()
                .map(|(n, r)| (n.to_string(), r))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn ndvi_params(area: AreaOfInterest, threshold: f64) -> DetectParams {
        DetectParams {
            area,
            collection: "COPERNICUS/S2_SR".to_string(),
            range_before: DateRange::parse("2022-01-01", "2022-01-31").unwrap(),
            range_after: DateRange::parse("2022-06-01", "2022-06-30").unwrap(),
            formula: IndexFormula::normalized_difference("B8", "B4"),
            reducer: Reducer::Mean,
            delta_order: DeltaOrder::BeforeMinusAfter,
            comparator: Comparator::Gt,
            threshold,
        }
    }

    /// Catalog where NDVI drops from 0.6 to -0.6 inside rows 2..4, cols 2..4
    fn catalog_with_loss_block() -> MockCatalog {
        let mut catalog = MockCatalog::new();
        catalog.insert(
            "2022-01-01/2022-01-31",
            vec![scene(
                "before",
                vec![("B8", band(0.8, None)), ("B4", band(0.2, None))],
            )],
        );
        catalog.insert(
            "2022-06-01/2022-06-30",
            vec![scene(
                "after",
                vec![
                    ("B8", band(0.8, Some((2..4, 2..4, 0.2)))),
                    ("B4", band(0.2, Some((2..4, 2..4, 0.8)))),
                ],
            )],
        );
        catalog
    }

    #[test]
    fn equal_ranges_yield_empty_regions() {
        let mut catalog = MockCatalog::new();
        catalog.insert(
            "2022-01-01/2022-01-31",
            vec![scene(
                "s",
                vec![("B8", band(0.8, None)), ("B4", band(0.2, None))],
            )],
        );

        let mut params = ndvi_params(AreaOfInterest::rect(0.0, 0.0, 8.0, 8.0), 0.2);
        params.range_after = params.range_before;

        let regions = ChangeDetector::new(&catalog).detect(&params).unwrap();
        assert!(regions.is_empty());
    }

    #[test]
    fn detects_the_changed_block() {
        let catalog = catalog_with_loss_block();
        let params = ndvi_params(AreaOfInterest::rect(0.0, 0.0, 8.0, 8.0), 0.3);

        let regions = ChangeDetector::new(&catalog).detect(&params).unwrap();
        assert_eq!(regions.len(), 1);
        // 2x2 block of unit cells
        assert!((regions[0].unsigned_area() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn raising_the_threshold_never_grows_the_result() {
        let catalog = catalog_with_loss_block();
        let area = AreaOfInterest::rect(0.0, 0.0, 8.0, 8.0);

        let mut last_count = usize::MAX;
        let mut last_area = f64::INFINITY;
        for threshold in [0.1, 0.5, 1.0, 1.5] {
            let params = ndvi_params(area.clone(), threshold);
            let regions = ChangeDetector::new(&catalog).detect(&params).unwrap();
            let total: f64 = regions.iter().map(|p| p.unsigned_area()).sum();

            assert!(regions.len() <= last_count);
            assert!(total <= last_area + 1e-12);
            last_count = regions.len();
            last_area = total;
        }
        // Delta is 1.2 inside the block, so the highest threshold finds nothing
        assert_eq!(last_count, 0);
    }

    #[test]
    fn identical_runs_are_identical() {
        let catalog = catalog_with_loss_block();
        let params = ndvi_params(AreaOfInterest::rect(0.0, 0.0, 8.0, 8.0), 0.3);
        let detector = ChangeDetector::new(&catalog);

        let first = detector.detect(&params).unwrap();
        let second = detector.detect(&params).unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            let ca: Vec<_> = a.exterior().coords().collect();
            let cb: Vec<_> = b.exterior().coords().collect();
            assert_eq!(ca, cb);
        }
    }

    #[test]
    fn delta_equal_to_threshold_is_excluded() {
        // Raw band drops exactly 0.5 everywhere
        let mut catalog = MockCatalog::new();
        catalog.insert(
            "2022-01-01/2022-01-31",
            vec![scene("b", vec![("VV", band(1.0, None))])],
        );
        catalog.insert(
            "2022-06-01/2022-06-30",
            vec![scene("a", vec![("VV", band(0.5, None))])],
        );

        let mut params = ndvi_params(AreaOfInterest::rect(0.0, 0.0, 8.0, 8.0), 0.5);
        params.formula = IndexFormula::band("VV");

        let detector = ChangeDetector::new(&catalog);
        assert!(detector.detect(&params).unwrap().is_empty());

        params.threshold = 0.499;
        assert!(!detector.detect(&params).unwrap().is_empty());
    }

    #[test]
    fn empty_catalog_is_not_an_error() {
        let catalog = MockCatalog::new();
        let params = ndvi_params(AreaOfInterest::rect(0.0, 0.0, 8.0, 8.0), 0.2);

        let regions = ChangeDetector::new(&catalog).detect(&params).unwrap();
        assert!(regions.is_empty());
        // Both windows were still queried
        assert_eq!(catalog.call_count(), 2);
    }

    #[test]
    fn invalid_area_fails_before_any_service_call() {
        let catalog = catalog_with_loss_block();
        let params = ndvi_params(AreaOfInterest::polygon(vec![(0.0, 0.0), (1.0, 1.0)]), 0.2);

        let err = ChangeDetector::new(&catalog).detect(&params).unwrap_err();
        assert!(matches!(err, Error::DegenerateArea(_)));
        assert_eq!(catalog.call_count(), 0);
    }

    #[test]
    fn regions_never_leave_the_area_of_interest() {
        // Change everywhere, diamond-shaped AOI inside the grid
        let mut catalog = MockCatalog::new();
        catalog.insert(
            "2022-01-01/2022-01-31",
            vec![scene("b", vec![("VV", band(5.0, None))])],
        );
        catalog.insert(
            "2022-06-01/2022-06-30",
            vec![scene("a", vec![("VV", band(0.0, None))])],
        );

        let area =
            AreaOfInterest::polygon(vec![(4.0, 0.0), (8.0, 4.0), (4.0, 8.0), (0.0, 4.0)]);
        let mut params = ndvi_params(area, 1.0);
        params.formula = IndexFormula::band("VV");

        let regions = ChangeDetector::new(&catalog).detect(&params).unwrap();
        assert!(!regions.is_empty());
        for polygon in &regions {
            for c in polygon.exterior().coords() {
                // Inside or on the diamond |x-4| + |y-4| <= 4
                assert!(
                    (c.x - 4.0).abs() + (c.y - 4.0).abs() <= 4.0 + 1e-9,
                    "vertex ({}, {}) escapes the AOI",
                    c.x,
                    c.y
                );
            }
        }
    }

    #[test]
    fn radar_delta_uses_after_minus_before() {
        // Backscatter rises by 5 dB inside the block; flood polarity
        let mut catalog = MockCatalog::new();
        catalog.insert(
            "2022-06-01/2022-06-15",
            vec![scene("b", vec![("VV", band(-12.0, None))])],
        );
        catalog.insert(
            "2022-07-01/2022-07-15",
            vec![scene(
                "a",
                vec![("VV", band(-12.0, Some((1..3, 1..3, -7.0))))],
            )],
        );

        let params = DetectParams {
            area: AreaOfInterest::rect(0.0, 0.0, 8.0, 8.0),
            collection: "COPERNICUS/S1_GRD".to_string(),
            range_before: DateRange::parse("2022-06-01", "2022-06-15").unwrap(),
            range_after: DateRange::parse("2022-07-01", "2022-07-15").unwrap(),
            formula: IndexFormula::band("VV"),
            reducer: Reducer::Mean,
            delta_order: DeltaOrder::AfterMinusBefore,
            comparator: Comparator::Gt,
            threshold: 1.0,
        };

        let regions = ChangeDetector::new(&catalog).detect(&params).unwrap();
        assert_eq!(regions.len(), 1);
        assert!((regions[0].unsigned_area() - 4.0).abs() < 1e-10);
    }
}
