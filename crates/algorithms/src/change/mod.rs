//! Delta rasters and threshold masks
//!
//! The bitemporal core: subtract the two index rasters in a caller-fixed
//! order, then classify each pixel against a strict threshold.

use ndarray::Array2;
use rayon::prelude::*;
use terradiff_core::aoi::AreaOfInterest;
use terradiff_core::raster::{Raster, RasterElement};
use terradiff_core::{Error, Result};

/// Mask cell values
pub const MASK_UNCHANGED: u8 = 0;
pub const MASK_CHANGED: u8 = 1;
/// Mask nodata: undefined delta or outside the area of interest
pub const MASK_NODATA: u8 = 255;

/// Which epoch is the minuend.
///
/// The scenarios disagree on polarity (burn and forest loss difference
/// before - after, flood after - before); the order is part of the
/// caller's parameters, never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaOrder {
    BeforeMinusAfter,
    AfterMinusBefore,
}

/// Strict comparison of a delta pixel against the threshold.
///
/// A delta exactly equal to the threshold never classifies as changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Gt,
    Lt,
}

impl Comparator {
    pub fn matches(&self, delta: f64, threshold: f64) -> bool {
        match self {
            Self::Gt => delta > threshold,
            Self::Lt => delta < threshold,
        }
    }
}

/// Pixelwise difference of the two index rasters in the given order.
///
/// Nodata in either epoch produces nodata in the delta.
pub fn delta(
    before: &Raster<f64>,
    after: &Raster<f64>,
    order: DeltaOrder,
) -> Result<Raster<f64>> {
    if before.shape() != after.shape() {
        return Err(Error::SizeMismatch {
            er: before.rows(),
            ec: before.cols(),
            ar: after.rows(),
            ac: after.cols(),
        });
    }

    let (rows, cols) = before.shape();
    let nodata_b = before.nodata();
    let nodata_a = after.nodata();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for col in 0..cols {
                let b = unsafe { before.get_unchecked(row, col) };
                let a = unsafe { after.get_unchecked(row, col) };

                if b.is_nodata(nodata_b) || a.is_nodata(nodata_a) {
                    continue;
                }

                row_data[col] = match order {
                    DeltaOrder::BeforeMinusAfter => b - a,
                    DeltaOrder::AfterMinusBefore => a - b,
                };
            }
            row_data
        })
        .collect();

    let mut output = before.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}

/// Classify each delta pixel against the threshold.
///
/// Output cells are [`MASK_CHANGED`], [`MASK_UNCHANGED`] or [`MASK_NODATA`]
/// (where the delta is undefined).
pub fn threshold_mask(
    delta: &Raster<f64>,
    comparator: Comparator,
    threshold: f64,
) -> Result<Raster<u8>> {
    let (rows, cols) = delta.shape();
    let nodata = delta.nodata();

    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![MASK_NODATA; cols];
            for col in 0..cols {
                let d = unsafe { delta.get_unchecked(row, col) };
                if d.is_nodata(nodata) {
                    continue;
                }
                row_data[col] = if comparator.matches(d, threshold) {
                    MASK_CHANGED
                } else {
                    MASK_UNCHANGED
                };
            }
            row_data
        })
        .collect();

    let mut output = delta.with_same_meta::<u8>(rows, cols);
    output.set_nodata(Some(MASK_NODATA));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}

/// Knock out mask cells whose centers fall outside the area of interest.
///
/// Pixels outside the area never contribute to a change region, even when
/// 4-connected to pixels inside it.
pub fn apply_area_mask(mask: &mut Raster<u8>, area: &AreaOfInterest) -> Result<()> {
    let (rows, cols) = mask.shape();
    let transform = *mask.transform();

    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = Vec::with_capacity(cols);
            for col in 0..cols {
                let v = unsafe { mask.get_unchecked(row, col) };
                let (x, y) = transform.center(col, row);
                row_data.push(if area.contains(x, y) { v } else { MASK_NODATA });
            }
            row_data
        })
        .collect();

    *mask.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(())
}
