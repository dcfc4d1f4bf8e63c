//! Temporal compositing of scene stacks

use std::collections::BTreeMap;

use ndarray::Array2;
use rayon::prelude::*;
use terradiff_core::raster::Raster;
use terradiff_core::service::{Reducer, Scene};
use terradiff_core::{Error, Result};

/// Reduce one band across a stack of scenes into a single composite raster.
///
/// Each output pixel aggregates the valid (non-nodata) observations of that
/// pixel across the stack; pixels with no valid observation come out NaN.
/// All scenes must carry the band and share the shape of the first scene.
///
/// Returns `None` for an empty stack; no matching imagery is a normal
/// outcome, not a failure.
pub fn composite_band(
    scenes: &[Scene],
    band: &str,
    reducer: Reducer,
) -> Result<Option<Raster<f64>>> {
    let Some(first) = scenes.first() else {
        return Ok(None);
    };

    let reference = first.band(band)?;
    let (rows, cols) = reference.shape();

    let mut layers: Vec<&Raster<f64>> = Vec::with_capacity(scenes.len());
    for scene in scenes {
        let layer = scene.band(band)?;
        if layer.shape() != (rows, cols) {
            return Err(Error::SizeMismatch {
                er: rows,
                ec: cols,
                ar: layer.rows(),
                ac: layer.cols(),
            });
        }
        layers.push(layer);
    }

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            let mut values: Vec<f64> = Vec::with_capacity(layers.len());
            for (col, slot) in row_data.iter_mut().enumerate() {
                values.clear();
                for layer in &layers {
                    let v = unsafe { layer.get_unchecked(row, col) };
                    if !layer.is_nodata(v) {
                        values.push(v);
                    }
                }
                if !values.is_empty() {
                    *slot = reduce(&mut values, reducer);
                }
            }
            row_data
        })
        .collect();

    let mut output = reference.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(Some(output))
}

/// Composite every requested band of a stack.
///
/// `None` when the stack is empty, otherwise a band-name map of composites.
pub fn composite_stack(
    scenes: &[Scene],
    bands: &[String],
    reducer: Reducer,
) -> Result<Option<BTreeMap<String, Raster<f64>>>> {
    if scenes.is_empty() {
        return Ok(None);
    }
    let mut out = BTreeMap::new();
    for band in bands {
        let composite = composite_band(scenes, band, reducer)?
            .ok_or_else(|| Error::Other("empty stack after non-empty check".to_string()))?;
        out.insert(band.clone(), composite);
    }
    Ok(Some(out))
}

fn reduce(values: &mut [f64], reducer: Reducer) -> f64 {
    match reducer {
        Reducer::Mean => values.iter().sum::<f64>() / values.len() as f64,
        Reducer::Median => {
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let mid = values.len() / 2;
            if values.len() % 2 == 1 {
                values[mid]
            } else {
                (values[mid - 1] + values[mid]) / 2.0
            }
        }
    }
}
