//! Georeferenced raster grid

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, RasterElement};
use ndarray::Array2;

/// A georeferenced 2D raster grid.
///
/// Stores cells of type `T` in row-major order together with the affine
/// transform that places them on the map, and an optional no-data value.
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    data: Array2<T>,
    transform: GeoTransform,
    nodata: Option<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a raster of zeros with the default transform
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
            transform: GeoTransform::default(),
            nodata: None,
        }
    }

    /// Create a raster filled with a value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
            transform: GeoTransform::default(),
            nodata: None,
        }
    }

    /// Create a raster from a row-major vector
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        let data =
            Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self {
            data,
            transform: GeoTransform::default(),
            nodata: None,
        })
    }

    /// A zeroed raster of another cell type carrying this raster's transform
    pub fn with_same_meta<U: RasterElement>(&self, rows: usize, cols: usize) -> Raster<U> {
        Raster {
            data: Array2::zeros((rows, cols)),
            transform: self.transform,
            nodata: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Whether a value is no-data for this raster
    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    /// Geographic coordinates of the center of cell (col, row)
    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        self.transform.center(col, row)
    }

    /// Geographic bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_and_shape() {
        let r: Raster<f32> = Raster::new(100, 200);
        assert_eq!(r.rows(), 100);
        assert_eq!(r.cols(), 200);
        assert_eq!(r.shape(), (100, 200));
        assert_eq!(r.len(), 20_000);
        assert!(!r.is_empty());
    }

    #[test]
    fn get_set() {
        let mut r: Raster<f64> = Raster::new(10, 10);
        r.set(5, 5, 42.0).unwrap();
        assert_eq!(r.get(5, 5).unwrap(), 42.0);
        assert!(r.get(10, 0).is_err());
        assert!(r.set(0, 10, 1.0).is_err());
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(Raster::from_vec(vec![1.0; 6], 2, 3).is_ok());
        assert!(Raster::from_vec(vec![1.0; 5], 2, 3).is_err());
    }

    #[test]
    fn nodata_check() {
        let mut r: Raster<f64> = Raster::filled(2, 2, 1.0);
        assert!(r.is_nodata(f64::NAN));
        assert!(!r.is_nodata(0.0));
        r.set_nodata(Some(-9999.0));
        assert!(r.is_nodata(-9999.0));
    }

    #[test]
    fn cell_center_uses_transform() {
        let mut r: Raster<f64> = Raster::new(4, 4);
        r.set_transform(GeoTransform::new(0.0, 4.0, 1.0, -1.0));
        let (x, y) = r.cell_center(0, 0);
        assert_eq!((x, y), (0.5, 3.5));
    }
}
