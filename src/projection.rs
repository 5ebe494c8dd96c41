//! Batch projection of Cartesian point sources onto a gnomonic tangent plane.

use itertools::izip;
use log::{debug, info};
use nalgebra::{Matrix3, Vector2, Vector3};

use crate::basis::{change_of_basis, rotation_matrix, Center, DEFAULT_EPSILON};
use crate::error::Error;
use crate::linalg::{matmul_vec, rad_to_deg};
use crate::point_sources::{CartesianPointSources, GnomonicPointSources};
use crate::Float;

/// A tangent plane, i.e. the transform applied to every point and the way the rotated
/// point is flattened afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TangentPlane<F: Float> {
    /// Inverse of the position-only basis (see [`change_of_basis`]).
    /// The third rotated axis is the depth, and outputs are linear offsets.
    PositionOnly(Matrix3<F>),
    /// Rotation from position and velocity (see [`rotation_matrix`]).
    /// The first rotated axis is the depth, and outputs are in degrees.
    WithVelocity(Matrix3<F>),
}

impl<F: Float> TangentPlane<F> {
    /// The 3x3 transform.
    pub fn matrix(&self) -> &Matrix3<F> {
        match self {
            TangentPlane::PositionOnly(m) | TangentPlane::WithVelocity(m) => m,
        }
    }

    /// Project a single heliocentric position.
    ///
    /// Points with a vanishing depth component yield infinite or NaN coordinates.
    pub fn apply(&self, position: &Vector3<F>) -> Vector2<F> {
        let (x, y) = match self {
            TangentPlane::PositionOnly(m) => project_position_only_row(m, position),
            TangentPlane::WithVelocity(m) => project_with_velocity_row(m, position),
        };
        Vector2::new(x, y)
    }
}

#[inline(always)]
fn project_position_only_row<F: Float>(m: &Matrix3<F>, position: &Vector3<F>) -> (F, F) {
    let rotated = matmul_vec(m, position);
    (rotated.x / rotated.z, rotated.y / rotated.z)
}

#[inline(always)]
fn project_with_velocity_row<F: Float>(m: &Matrix3<F>, position: &Vector3<F>) -> (F, F) {
    let rotated = matmul_vec(m, position);
    (
        rad_to_deg(rotated.y / rotated.x),
        rad_to_deg(rotated.z / rotated.x),
    )
}

/// Options of a gnomonic projection.
///
/// Build it from a [`Center`] and adjust it via `with_*` functions. Whether the center
/// carries a velocity selects the variant:
/// - without velocity, points are expressed in the [`change_of_basis`] basis and divided by
///   their depth along the center direction;
/// - with velocity, points are rotated by [`rotation_matrix`] and converted to angular
///   offsets in degrees.
///
/// Example:
/// ```
/// # use gnomonic::{Center, CartesianPointSources, GnomonicPointSources, GnomonicProjector};
/// # use nalgebra::vector;
/// let mut cartesian = CartesianPointSources::new(1).unwrap();
/// cartesian.push(0.91, 0.79, 0.02, 1.0).unwrap();
///
/// let center = Center::new(vector![0.9, 0.8, 0.01]).with_velocity(vector![-0.05, 0.05, 1e-5]);
/// let mut gnomonic = GnomonicPointSources::new(cartesian.len()).unwrap();
/// GnomonicProjector::new(center)
///     .with_epsilon(1e-12)
///     .project(&cartesian, &mut gnomonic)
///     .unwrap();
/// assert_eq!(gnomonic.t(), &[1.0]);
/// ```
#[derive(Clone, Debug)]
pub struct GnomonicProjector<F: Float> {
    /// Origin and orientation of the tangent plane.
    center: Center<F>,
    /// Threshold of the near-parallel and near-zero tests.
    epsilon: F,
}

impl<F: Float> GnomonicProjector<F> {
    /// Create a projector with the default epsilon of `1e-10`.
    pub fn new(center: Center<F>) -> Self {
        Self {
            center,
            epsilon: nalgebra::convert(DEFAULT_EPSILON),
        }
    }

    /// Set the threshold below which a velocity counts as zero or parallel to the
    /// position, and below which the orbital plane counts as aligned with the z-axis.
    pub fn with_epsilon(mut self, epsilon: F) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// The center this projector was built from.
    pub fn center(&self) -> &Center<F> {
        &self.center
    }

    /// Build the tangent plane for the center.
    pub fn tangent_plane(&self) -> Result<TangentPlane<F>, Error> {
        if let Some(epoch) = self.center.epoch {
            debug!("Building tangent plane at epoch {epoch}.");
        }
        match self.center.velocity {
            None => {
                debug!("No center velocity given, using the position-only basis.");
                change_of_basis(&self.center.position).map(TangentPlane::PositionOnly)
            }
            Some(velocity) => {
                rotation_matrix(&self.center.position, &velocity, self.epsilon)
                    .map(TangentPlane::WithVelocity)
            }
        }
    }

    /// Project every point of `cartesian` into `gnomonic`.
    ///
    /// Times are copied through unchanged and in order. The tangent plane is built before
    /// `gnomonic` is touched, so on error it is left empty.
    ///
    /// # Panics
    /// If `gnomonic` is not empty.
    pub fn project(
        &self,
        cartesian: &CartesianPointSources<F>,
        gnomonic: &mut GnomonicPointSources<F>,
    ) -> Result<(), Error> {
        assert!(
            gnomonic.is_empty(),
            "gnomonic point sources must be empty before projecting"
        );

        let plane = self.tangent_plane()?;
        info!("Projecting {} point sources.", cartesian.len());
        gnomonic.reserve(cartesian.len())?;

        match plane {
            TangentPlane::PositionOnly(m) => {
                fill(cartesian, gnomonic, |v| project_position_only_row(&m, v))?
            }
            TangentPlane::WithVelocity(m) => {
                fill(cartesian, gnomonic, |v| project_with_velocity_row(&m, v))?
            }
        }

        info!("Projected {} point sources.", gnomonic.len());
        Ok(())
    }
}

/// Push one projected row per input row. `gnomonic` must already have room for all of them.
fn fill<F: Float>(
    cartesian: &CartesianPointSources<F>,
    gnomonic: &mut GnomonicPointSources<F>,
    project: impl Fn(&Vector3<F>) -> (F, F),
) -> Result<(), Error> {
    for (&x, &y, &z, &t) in izip!(cartesian.x(), cartesian.y(), cartesian.z(), cartesian.t()) {
        let (u, v) = project(&Vector3::new(x, y, z));
        gnomonic.push(u, v, t)?;
    }
    Ok(())
}

/// Project `cartesian` about `center` using the position-only basis.
///
/// Outputs are the first two basis coordinates divided by the depth along `center`.
///
/// # Errors
/// - [`Error::InvalidCenter`] if `center` is the zero vector.
/// - [`Error::NotInvertible`] if `center` lies on the x-axis.
///
/// # Panics
/// If `gnomonic` is not empty.
pub fn project_position_only<F: Float>(
    cartesian: &CartesianPointSources<F>,
    center: &Vector3<F>,
    gnomonic: &mut GnomonicPointSources<F>,
) -> Result<(), Error> {
    GnomonicProjector::new(Center::new(*center)).project(cartesian, gnomonic)
}

/// Project `cartesian` onto the tangent plane of a moving center, in degrees.
///
/// # Errors
/// [`Error::InvalidCenter`] if `center` is the zero vector or no orbital plane can be built.
///
/// # Panics
/// If `gnomonic` is not empty.
pub fn project_with_velocity<F: Float>(
    cartesian: &CartesianPointSources<F>,
    center: &Vector3<F>,
    center_velocity: &Vector3<F>,
    gnomonic: &mut GnomonicPointSources<F>,
) -> Result<(), Error> {
    GnomonicProjector::new(Center::new(*center).with_velocity(*center_velocity))
        .project(cartesian, gnomonic)
}

#[cfg(feature = "parallel")]
mod parallel {
    use super::*;
    use rayon::prelude::*;

    impl<F: Float> GnomonicProjector<F> {
        /// Project every point of `cartesian` into `gnomonic`, computing rows in parallel.
        ///
        /// The output is identical to [`project`](GnomonicProjector::project()), at the cost
        /// of one temporary buffer for the whole batch.
        ///
        /// # Panics
        /// If `gnomonic` is not empty.
        pub fn project_par(
            &self,
            cartesian: &CartesianPointSources<F>,
            gnomonic: &mut GnomonicPointSources<F>,
        ) -> Result<(), Error> {
            assert!(
                gnomonic.is_empty(),
                "gnomonic point sources must be empty before projecting"
            );

            let plane = self.tangent_plane()?;
            info!("Projecting {} point sources in parallel.", cartesian.len());
            gnomonic.reserve(cartesian.len())?;

            let projected = match plane {
                TangentPlane::PositionOnly(m) => {
                    project_rows_par(cartesian, |v| project_position_only_row(&m, v))
                }
                TangentPlane::WithVelocity(m) => {
                    project_rows_par(cartesian, |v| project_with_velocity_row(&m, v))
                }
            };
            for ((u, v), &t) in projected.into_iter().zip(cartesian.t()) {
                gnomonic.push(u, v, t)?;
            }

            info!("Projected {} point sources.", gnomonic.len());
            Ok(())
        }
    }

    fn project_rows_par<F: Float>(
        cartesian: &CartesianPointSources<F>,
        project: impl Fn(&Vector3<F>) -> (F, F) + Sync + Send,
    ) -> Vec<(F, F)> {
        (cartesian.x(), cartesian.y(), cartesian.z())
            .into_par_iter()
            .map(|(&x, &y, &z)| project(&Vector3::new(x, y, z)))
            .collect()
    }
}
