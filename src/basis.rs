//! Construction of the tangent plane from a projection center.
//!
//! Two constructions are provided and they are not interchangeable:
//! - [`change_of_basis`] only looks at the center position and yields the inverse of an
//!   orthogonal (not orthonormal) basis whose third axis points at the center.
//! - [`rotation_matrix`] also uses the center velocity and yields a proper rotation that
//!   maps the orbital plane onto the x-y plane and the center onto the positive x-axis.
#![allow(non_snake_case)]
use log::debug;
use nalgebra::{Matrix3, Vector3};

use crate::error::Error;
use crate::linalg::{
    abs, cross, dot, invert3x3, magnitude, matmul, matmul_vec, normalize, scale, skew_symmetric,
    square,
};
use crate::Float;

/// Default threshold for the near-parallel and near-zero tests of [`rotation_matrix`].
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Origin and orientation input of a tangent plane.
///
/// This is supplied fresh for every projection and never stored by the containers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Center<F: Float> {
    /// Heliocentric position of the reference point.
    pub position: Vector3<F>,
    /// Velocity of the reference point. Only its direction matters.
    pub velocity: Option<Vector3<F>>,
    /// Epoch of `position` and `velocity` (MJD).
    pub epoch: Option<F>,
}

impl<F: Float> Center<F> {
    /// A center without velocity or epoch.
    pub fn new(position: Vector3<F>) -> Self {
        Self {
            position,
            velocity: None,
            epoch: None,
        }
    }

    /// Set the velocity.
    pub fn with_velocity(mut self, velocity: Vector3<F>) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Set the epoch.
    pub fn with_epoch(mut self, epoch: F) -> Self {
        self.epoch = Some(epoch);
        self
    }
}

/// Matrix that expresses a vector in a basis built from the center position alone.
///
/// The basis has the columns `(a0 x X, a0 x (a0 x X), a0)` with `a0` the normalized
/// position and `X` the global x-axis; the returned matrix is its inverse.
///
/// # Errors
/// - [`Error::InvalidCenter`] if `position` is the zero vector.
/// - [`Error::NotInvertible`] if the basis collapses, i.e. `position` lies on the x-axis.
pub fn change_of_basis<F: Float>(position: &Vector3<F>) -> Result<Matrix3<F>, Error> {
    let mut axis0 = *position;
    normalize(&mut axis0).map_err(|_| Error::InvalidCenter)?;

    let axis1 = cross(&axis0, &Vector3::x());
    let axis2 = cross(&axis0, &axis1);
    let basis = Matrix3::from_columns(&[axis1, axis2, axis0]);

    invert3x3(&basis)
}

/// Unit vector normal to the plane spanned by the center position and velocity.
///
/// A velocity shorter than `epsilon`, or one whose direction is within `epsilon` (in
/// cosine) of the position, is replaced by the 45° diagonal of the x-y plane.
///
/// # Errors
/// [`Error::InvalidCenter`] if `position` is the zero vector, or if it is parallel to the
/// substituted velocity.
pub fn normal_vector<F: Float>(
    position: &Vector3<F>,
    velocity: &Vector3<F>,
    epsilon: F,
) -> Result<Vector3<F>, Error> {
    if position.iter().all(|c| *c == F::zero()) {
        return Err(Error::InvalidCenter);
    }

    let speed = magnitude(velocity);
    let nearly_parallel = speed >= epsilon
        && abs(dot(position, velocity)) / (magnitude(position) * speed) > F::one() - epsilon;
    let velocity = if speed < epsilon || nearly_parallel {
        debug!("Velocity unusable for the tangent plane, using the x-y diagonal instead.");
        let d = nalgebra::convert(std::f64::consts::FRAC_1_SQRT_2);
        Vector3::new(d, d, F::zero())
    } else {
        *velocity
    };

    let mut normal = cross(position, &velocity);
    normalize(&mut normal).map_err(|_| Error::InvalidCenter)?;
    Ok(normal)
}

/// Rotation taking the unit vector `normal` onto the z-axis (Rodrigues' formula).
fn r1_matrix<F: Float>(normal: &Vector3<F>, epsilon: F) -> Matrix3<F> {
    let z_axis = Vector3::z();
    let nu = cross(normal, &z_axis);

    // already aligned with the z-axis
    if magnitude(&nu) < epsilon {
        debug!("Orbital plane normal is along the z-axis, skipping first rotation.");
        return Matrix3::identity();
    }

    let cos_theta = dot(normal, &z_axis);
    let V = skew_symmetric(&nu);
    let mut V2 = square(&V);
    scale(&mut V2, F::one() / (F::one() + cos_theta));

    Matrix3::identity() + V + V2
}

/// Rotation about the z-axis taking the in-plane center `R1 * position` onto the x-axis.
fn r2_matrix<F: Float>(r1: &Matrix3<F>, position: &Vector3<F>) -> Result<Matrix3<F>, Error> {
    let mut r = matmul_vec(r1, position);
    normalize(&mut r).map_err(|_| Error::InvalidCenter)?;

    let zero = F::zero();
    Ok(Matrix3::new(
        r.x, r.y, zero, //
        -r.y, r.x, zero, //
        zero, zero, F::one(),
    ))
}

/// Rotation defining a motion-aware tangent plane.
///
/// The result maps the plane of `position` and `velocity` onto the x-y plane and the
/// center itself onto the positive x-axis, which then acts as the depth axis.
///
/// # Errors
/// [`Error::InvalidCenter`] if `position` is zero or no plane normal can be found; see
/// [`normal_vector`].
pub fn rotation_matrix<F: Float>(
    position: &Vector3<F>,
    velocity: &Vector3<F>,
    epsilon: F,
) -> Result<Matrix3<F>, Error> {
    let normal = normal_vector(position, velocity, epsilon)?;
    let r1 = r1_matrix(&normal, epsilon);
    let r2 = r2_matrix(&r1, position)?;
    Ok(matmul(&r2, &r1))
}
