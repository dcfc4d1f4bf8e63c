//! Generic normalized difference index

use ndarray::Array2;
use rayon::prelude::*;
use terradiff_core::raster::{Raster, RasterElement};
use terradiff_core::{Error, Result};

/// Compute the normalized difference of two bands:
///
/// `(band_a - band_b) / (band_a + band_b)`
///
/// Result is in `[-1, 1]`. Pixels where the sum is (near) zero or where
/// either band is nodata come out as NaN.
pub fn normalized_difference(band_a: &Raster<f64>, band_b: &Raster<f64>) -> Result<Raster<f64>> {
    if band_a.shape() != band_b.shape() {
        return Err(Error::SizeMismatch {
            er: band_a.rows(),
            ec: band_a.cols(),
            ar: band_b.rows(),
            ac: band_b.cols(),
        });
    }

    let (rows, cols) = band_a.shape();
    let nodata_a = band_a.nodata();
    let nodata_b = band_b.nodata();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for col in 0..cols {
                let a = unsafe { band_a.get_unchecked(row, col) };
                let b = unsafe { band_b.get_unchecked(row, col) };

                if a.is_nodata(nodata_a) || b.is_nodata(nodata_b) {
                    continue;
                }

                let sum = a + b;
                if sum.abs() < 1e-10 {
                    continue;
                }

                row_data[col] = (a - b) / sum;
            }
            row_data
        })
        .collect();

    let mut output = band_a.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use terradiff_core::GeoTransform;

    fn band(value: f64) -> Raster<f64> {
        let mut r = Raster::filled(4, 4, value);
        r.set_transform(GeoTransform::new(0.0, 4.0, 1.0, -1.0));
        r
    }

    #[test]
    fn known_value() {
        // (0.6 - 0.2) / (0.6 + 0.2) = 0.5
        let nd = normalized_difference(&band(0.6), &band(0.2)).unwrap();
        assert_relative_eq!(nd.get(1, 1).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn antisymmetric() {
        let ab = normalized_difference(&band(0.6), &band(0.2)).unwrap();
        let ba = normalized_difference(&band(0.2), &band(0.6)).unwrap();
        assert_relative_eq!(ab.get(0, 0).unwrap(), -ba.get(0, 0).unwrap());
    }

    #[test]
    fn zero_sum_is_nodata() {
        let nd = normalized_difference(&band(0.3), &band(-0.3)).unwrap();
        assert!(nd.get(2, 2).unwrap().is_nan());
    }

    #[test]
    fn nodata_propagates() {
        let mut a = band(0.6);
        a.set(1, 2, f64::NAN).unwrap();
        let nd = normalized_difference(&a, &band(0.2)).unwrap();
        assert!(nd.get(1, 2).unwrap().is_nan());
        assert!(!nd.get(0, 0).unwrap().is_nodata(None));
    }

    #[test]
    fn shape_mismatch_rejected() {
        let a = band(0.5);
        let b = Raster::filled(3, 4, 0.5);
        assert!(matches!(
            normalized_difference(&a, &b),
            Err(Error::SizeMismatch { .. })
        ));
    }
}
