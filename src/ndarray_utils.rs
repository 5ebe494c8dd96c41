//! Conversions between the struct-of-arrays containers and `ndarray` matrices.
//! Matrices are row-per-point, with one column per channel in channel order.

use ndarray::{Array2, ArrayView2, Axis};

use crate::error::Error;
use crate::point_sources::{
    CartesianPointSources, GnomonicPointSources, PointSources, TopocentricPointSources,
};
use crate::Float;

/// Copy a container into a matrix of shape `(n_points, n_channels)`.
pub trait IntoNdarray2 {
    /// The matrix type.
    type Out;

    /// Perform the conversion.
    fn into_ndarray2(self) -> Self::Out;
}

impl<F: Float, const N: usize> IntoNdarray2 for &PointSources<F, N> {
    type Out = Array2<F>;

    fn into_ndarray2(self) -> Self::Out {
        Array2::from_shape_fn((self.len(), N), |(i, c)| self.channel(c)[i])
    }
}

impl<F: Float> IntoNdarray2 for &CartesianPointSources<F> {
    type Out = Array2<F>;

    fn into_ndarray2(self) -> Self::Out {
        (**self).into_ndarray2()
    }
}

impl<F: Float> IntoNdarray2 for &GnomonicPointSources<F> {
    type Out = Array2<F>;

    fn into_ndarray2(self) -> Self::Out {
        (**self).into_ndarray2()
    }
}

impl<F: Float> IntoNdarray2 for &TopocentricPointSources<F> {
    type Out = Array2<F>;

    fn into_ndarray2(self) -> Self::Out {
        (**self).into_ndarray2()
    }
}

impl<F: Float, const N: usize> TryFrom<ArrayView2<'_, F>> for PointSources<F, N> {
    type Error = Error;

    /// Build a container from a `(n_points, N)` matrix.
    /// The capacity is the number of rows, but at least one.
    fn try_from(value: ArrayView2<'_, F>) -> Result<Self, Self::Error> {
        let (n_points, n_columns) = value.dim();
        if n_columns != N {
            return Err(Error::ColumnCount {
                expected: N,
                found: n_columns,
            });
        }

        let mut points = PointSources::new(n_points.max(1))?;
        for row in value.axis_iter(Axis(0)) {
            points.push(std::array::from_fn(|c| row[c]))?;
        }
        Ok(points)
    }
}

impl<F: Float> TryFrom<ArrayView2<'_, F>> for CartesianPointSources<F> {
    type Error = Error;

    fn try_from(value: ArrayView2<'_, F>) -> Result<Self, Self::Error> {
        PointSources::try_from(value).map(Self::from)
    }
}

impl<F: Float> TryFrom<ArrayView2<'_, F>> for GnomonicPointSources<F> {
    type Error = Error;

    fn try_from(value: ArrayView2<'_, F>) -> Result<Self, Self::Error> {
        PointSources::try_from(value).map(Self::from)
    }
}

impl<F: Float> TryFrom<ArrayView2<'_, F>> for TopocentricPointSources<F> {
    type Error = Error;

    fn try_from(value: ArrayView2<'_, F>) -> Result<Self, Self::Error> {
        PointSources::try_from(value).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn cartesian_to_array2() {
        let mut cartesian = CartesianPointSources::new(2).unwrap();
        cartesian.push(1., 2., 3., 4.).unwrap();
        cartesian.push(5., 6., 7., 8.).unwrap();

        let arr = (&cartesian).into_ndarray2();
        assert_eq!(arr, array![[1., 2., 3., 4.], [5., 6., 7., 8.]]);
    }

    #[test]
    fn empty_to_array2() {
        let gnomonic = GnomonicPointSources::<f32>::new(4).unwrap();
        assert_eq!((&gnomonic).into_ndarray2().shape(), &[0, 3]);
    }

    #[test]
    fn array2_to_cartesian() {
        let arr: Array2<f64> = array![[1., 2., 3., 4.], [5., 6., 7., 8.], [9., 10., 11., 12.]];
        let cartesian = CartesianPointSources::try_from(arr.view()).unwrap();

        assert_eq!(cartesian.len(), 3);
        assert_eq!(cartesian.capacity(), 3);
        assert_eq!(cartesian.z(), &[3., 7., 11.]);
        assert_eq!((&cartesian).into_ndarray2(), arr);
    }

    #[test]
    fn array2_wrong_columns() {
        let arr: Array2<f64> = array![[1., 2., 3.], [4., 5., 6.]];
        assert_eq!(
            CartesianPointSources::try_from(arr.view()).unwrap_err(),
            Error::ColumnCount {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn array2_to_topocentric() {
        let arr: Array2<f64> = array![[10.5, -3.25, 56537.1], [10.6, -3.5, 56537.2]];
        let topocentric = TopocentricPointSources::try_from(arr.view()).unwrap();

        assert_eq!(topocentric.len(), 2);
        assert_eq!(topocentric.ra(), &[10.5, 10.6]);
        assert_eq!(topocentric.dec(), &[-3.25, -3.5]);
        assert_eq!(topocentric.t(), &[56537.1, 56537.2]);
        assert_eq!((&topocentric).into_ndarray2(), arr);

        let wrong: Array2<f64> = array![[1., 2., 3., 4.]];
        assert_eq!(
            TopocentricPointSources::try_from(wrong.view()).unwrap_err(),
            Error::ColumnCount {
                expected: 3,
                found: 4
            }
        );
    }

    #[test]
    fn empty_array2() {
        let arr = Array2::<f64>::zeros((0, 3));
        let gnomonic = GnomonicPointSources::try_from(arr.view()).unwrap();
        assert!(gnomonic.is_empty());
        assert_eq!(gnomonic.capacity(), 1);
    }
}
