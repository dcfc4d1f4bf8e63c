//! Raster element trait for generic cell values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Types that can be stored in a raster cell.
pub trait RasterElement:
    Copy + Debug + PartialEq + PartialOrd + NumCast + Zero + Send + Sync + 'static
{
    /// Default no-data value for this type
    fn default_nodata() -> Self;

    /// Whether this value represents no-data
    fn is_nodata(&self, nodata: Option<Self>) -> bool;

    /// Convert to f64, if representable
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }
}

macro_rules! impl_element_int {
    ($($t:ty),*) => {$(
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::MAX
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                matches!(nodata, Some(nd) if *self == nd)
            }
        }
    )*};
}

macro_rules! impl_element_float {
    ($($t:ty),*) => {$(
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::NAN
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                if self.is_nan() {
                    return true;
                }
                matches!(nodata, Some(nd) if (*self - nd).abs() < <$t>::EPSILON * 100.0)
            }
        }
    )*};
}

impl_element_int!(u8, u16, u32, i32, i64);
impl_element_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_nan_is_always_nodata() {
        assert!(f64::NAN.is_nodata(None));
        assert!(f64::NAN.is_nodata(Some(-9999.0)));
        assert!(!1.5f64.is_nodata(None));
    }

    #[test]
    fn int_nodata_requires_sentinel() {
        assert!(!0u8.is_nodata(None));
        assert!(255u8.is_nodata(Some(255)));
        assert!(!1u8.is_nodata(Some(255)));
    }
}
