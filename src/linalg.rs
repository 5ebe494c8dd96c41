//! Fixed-size 3-vector and 3x3-matrix primitives.
//!
//! These are thin and allocation-free, since the projector calls them once per point.
//! Zero tests are exact on the computed value: [`normalize`] rejects a vector whose
//! magnitude evaluates to exactly zero (which includes components so small that their
//! squares underflow), and [`invert3x3`] a matrix whose determinant does. Tolerance policy
//! is left to the caller.
use nalgebra::{ComplexField, Matrix3, Vector3};

use crate::error::Error;
use crate::Float;

/// Dot product of two 3-vectors.
#[inline]
pub fn dot<F: Float>(a: &Vector3<F>, b: &Vector3<F>) -> F {
    a.dot(b)
}

/// Cross product of two 3-vectors.
#[inline]
pub fn cross<F: Float>(a: &Vector3<F>, b: &Vector3<F>) -> Vector3<F> {
    a.cross(b)
}

/// Euclidean length of a 3-vector.
#[inline]
pub fn magnitude<F: Float>(v: &Vector3<F>) -> F {
    v.norm()
}

/// Rescale `v` to unit length in place.
///
/// Fails with [`Error::DegenerateVector`] if the magnitude is exactly zero, in which case `v`
/// is left untouched.
pub fn normalize<F: Float>(v: &mut Vector3<F>) -> Result<(), Error> {
    let mag = magnitude(v);
    if mag == F::zero() {
        return Err(Error::DegenerateVector);
    }
    *v /= mag;
    Ok(())
}

/// Multiply a 3x3 matrix by a 3-vector.
#[inline]
pub fn matmul_vec<F: Float>(m: &Matrix3<F>, v: &Vector3<F>) -> Vector3<F> {
    m * v
}

/// Multiply two 3x3 matrices.
#[inline]
pub fn matmul<F: Float>(a: &Matrix3<F>, b: &Matrix3<F>) -> Matrix3<F> {
    a * b
}

/// Multiply a 3x3 matrix by itself.
#[inline]
pub fn square<F: Float>(m: &Matrix3<F>) -> Matrix3<F> {
    m * m
}

/// Multiply every entry of `m` by `s` in place.
#[inline]
pub fn scale<F: Float>(m: &mut Matrix3<F>, s: F) {
    *m *= s;
}

/// Determinant by cofactor expansion along the first row.
pub fn determinant<F: Float>(m: &Matrix3<F>) -> F {
    let d1 = m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)];
    let d2 = m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)];
    let d3 = m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)];
    m[(0, 0)] * d1 - m[(0, 1)] * d2 + m[(0, 2)] * d3
}

/// Invert a 3x3 matrix through its adjugate.
///
/// Fails with [`Error::NotInvertible`] only if the determinant is exactly zero. Nearly
/// singular matrices are inverted and may produce very large entries.
pub fn invert3x3<F: Float>(m: &Matrix3<F>) -> Result<Matrix3<F>, Error> {
    let det = determinant(m);
    if det == F::zero() {
        return Err(Error::NotInvertible);
    }
    let invdet = F::one() / det;

    let adj = Matrix3::new(
        m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)],
        m[(0, 2)] * m[(2, 1)] - m[(0, 1)] * m[(2, 2)],
        m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)],
        m[(1, 2)] * m[(2, 0)] - m[(1, 0)] * m[(2, 2)],
        m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)],
        m[(1, 0)] * m[(0, 2)] - m[(0, 0)] * m[(1, 2)],
        m[(1, 0)] * m[(2, 1)] - m[(2, 0)] * m[(1, 1)],
        m[(2, 0)] * m[(0, 1)] - m[(0, 0)] * m[(2, 1)],
        m[(0, 0)] * m[(1, 1)] - m[(1, 0)] * m[(0, 1)],
    );
    Ok(adj * invdet)
}

/// Skew-symmetric matrix `V` such that `V * w == v x w`.
pub fn skew_symmetric<F: Float>(v: &Vector3<F>) -> Matrix3<F> {
    let zero = F::zero();
    Matrix3::new(
        zero, -v.z, v.y, //
        v.z, zero, -v.x, //
        -v.y, v.x, zero,
    )
}

/// Convert radians to degrees.
#[inline]
pub fn rad_to_deg<F: Float>(rad: F) -> F {
    rad * nalgebra::convert::<f64, F>(180.) / F::pi()
}

/// Absolute value without going through `num_traits::Signed`, whose `abs` collides with
/// the one on [`ComplexField`].
#[inline]
pub(crate) fn abs<F: Float>(x: F) -> F {
    ComplexField::abs(x)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::{matrix, vector};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    #[test]
    fn matmul_vec() {
        let m = matrix![1., 2., 3.; 4., 5., 6.; 7., 8., 9.];
        let v = vector![1., 2., 3.];
        assert_eq!(super::matmul_vec(&m, &v), vector![14., 32., 50.]);
    }

    #[test]
    fn matmul_and_square() {
        let a = matrix![1., 2., 0.; 0., 1., 0.; 0., 0., 2.];
        let b = matrix![0., 1., 0.; 1., 0., 0.; 0., 0., 1.];
        assert_eq!(super::matmul(&a, &b), matrix![2., 1., 0.; 1., 0., 0.; 0., 0., 2.]);
        assert_eq!(square(&a), matrix![1., 4., 0.; 0., 1., 0.; 0., 0., 4.]);
    }

    #[test]
    fn scale_in_place() {
        let mut m = Matrix3::<f64>::identity();
        scale(&mut m, 0.5);
        assert_eq!(m, Matrix3::identity() * 0.5);
    }

    #[test]
    fn dot_cross_magnitude() {
        let x = Vector3::<f64>::x();
        let y = Vector3::<f64>::y();
        assert_eq!(dot(&x, &y), 0.);
        assert_eq!(cross(&x, &y), Vector3::z());
        assert_eq!(magnitude(&vector![3., 4., 12.]), 13.);
    }

    #[test]
    fn normalize_unit_length() {
        let mut v: Vector3<f64> = vector![3., -4., 0.];
        normalize(&mut v).unwrap();
        assert_abs_diff_eq!(v, vector![0.6, -0.8, 0.], epsilon = 1e-15);
    }

    #[test]
    fn normalize_zero_vector() {
        let mut v = Vector3::<f64>::zeros();
        assert_eq!(normalize(&mut v), Err(Error::DegenerateVector));
        assert_eq!(v, Vector3::zeros());
    }

    #[test]
    fn normalize_tiny_vector() {
        let mut v = vector![1e-150, 0., 0.];
        normalize(&mut v).unwrap();
        assert_abs_diff_eq!(v, vector![1., 0., 0.], epsilon = 1e-15);
    }

    #[test]
    fn normalize_underflowing_vector() {
        // 1e-300 squared underflows, so the magnitude is exactly zero
        let mut v = vector![1e-300, 0., 0.];
        assert_eq!(magnitude(&v), 0.);
        assert_eq!(normalize(&mut v), Err(Error::DegenerateVector));
        assert_eq!(v, vector![1e-300, 0., 0.]);
    }

    #[test]
    fn invert() {
        let m = matrix![1., 2., 3.; 0., 1., 4.; 5., 6., 0.];
        let inv = invert3x3(&m).unwrap();
        assert_eq!(inv, matrix![-24., 18., 5.; 20., -15., -4.; -5., 4., 1.]);
    }

    #[test]
    fn invert_singular() {
        let m = matrix![1., 2., 3.; 4., 5., 6.; 7., 8., 9.];
        assert_eq!(determinant(&m), 0.);
        assert_eq!(invert3x3(&m), Err(Error::NotInvertible));
    }

    #[test]
    fn invert_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let m = Matrix3::<f64>::from_fn(|_, _| rng.random_range(-10.0..10.0));
            if determinant(&m).abs() < 1e-3 {
                continue;
            }
            let back = invert3x3(&invert3x3(&m).unwrap()).unwrap();
            assert_abs_diff_eq!(back, m, epsilon = 1e-8);
            assert_abs_diff_eq!(m * invert3x3(&m).unwrap(), Matrix3::identity(), epsilon = 1e-8);
        }
    }

    #[test]
    fn skew_symmetric_is_cross() {
        let v: Vector3<f64> = vector![0.3, -1.2, 2.5];
        let w: Vector3<f64> = vector![-0.7, 0.1, 4.];
        assert_abs_diff_eq!(skew_symmetric(&v) * w, cross(&v, &w), epsilon = 1e-15);
    }

    #[test]
    fn degrees() {
        assert_abs_diff_eq!(rad_to_deg(std::f64::consts::PI), 180., epsilon = 1e-12);
        assert_abs_diff_eq!(rad_to_deg(1f32), 57.29578, epsilon = 1e-4);
    }
}
