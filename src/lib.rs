#![warn(missing_docs)]

//! Gnomonic tangent-plane projection of heliocentric point sources. \
//! This is the computational core of tracklet-less orbit recovery: many observations near a
//! hypothesized orbit are projected onto a common flat plane, on which linear motion can be
//! tested cheaply.
//!
//! ## Interface
//! Point sources are stored in struct-of-arrays containers, [`CartesianPointSources`] for the
//! input and [`GnomonicPointSources`] for the output. The tangent plane is described by a
//! [`Center`], and the projection itself is configured with [`GnomonicProjector`].
//! For the common cases, [`project_position_only()`] and [`project_with_velocity()`] do both
//! steps at once.
//!
//! Example:
//! ```rust
//! use gnomonic::{project_with_velocity, CartesianPointSources, GnomonicPointSources};
//! use nalgebra::vector;
//!
//! let mut cartesian = CartesianPointSources::<f64>::new(2).unwrap();
//! cartesian.push(2.32724566583692, -0.449382385055792, 0.0866176471970003, 56537.2416032334).unwrap();
//! cartesian.push(2.32728038367672, -0.44938629368127, 0.0856592596632065, 56537.2416032334).unwrap();
//!
//! let center = vector![2.32545784897911, -0.459940068868785, 0.0788698905258432];
//! let velocity = vector![0.00257146073153728, 0.011315544836752, 0.00041171196985311];
//!
//! let mut gnomonic = GnomonicPointSources::new(cartesian.len()).unwrap();
//! project_with_velocity(&cartesian, &center, &velocity, &mut gnomonic).unwrap();
//! assert!((gnomonic.x()[0] - 0.26488865499153).abs() < 1e-10);
//! ```
//!
//! ## Variants
//! - Position only: the plane is spanned by an orthogonal basis built from the center
//!   position and the x-axis. Outputs are linear offsets divided by the depth along the center.
//! - Position and velocity: the plane is the orbital plane of the center, rotated such that the
//!   center lies on the x-axis. Outputs are angular offsets in degrees.
//!
//! Both variants leave points with zero depth as infinite or NaN coordinates instead of
//! rejecting them.
//!
//! ## Parameters
//! - `epsilon`: Threshold below which a velocity counts as zero or as parallel to the position,
//!     and below which the orbital plane counts as aligned with the z-axis. Defaults to `1e-10`.
//!
//! Projections of a batch can also be executed in parallel with the `parallel` feature.

pub mod basis;
pub mod error;
pub mod linalg;
pub(crate) mod ndarray_utils;
pub mod point_sources;
pub mod projection;

pub use basis::Center;
pub use error::Error;
pub use ndarray_utils::IntoNdarray2;
pub use point_sources::{
    CartesianPoint, CartesianPointSources, GnomonicPoint, GnomonicPointSources, PointSources,
    TopocentricPoint, TopocentricPointSources,
};
pub use projection::{project_position_only, project_with_velocity, GnomonicProjector, TangentPlane};

/// A generic float trait such that the projection is generic over `f32`/`f64`.
///
/// This trait is automatically implemented for all types implementing the supertraits.
/// Particularly, this includes `f32` and `f64`.
/// [`num_traits::Float`] is not a supertrait as the need to specify the provider of the redundant definitions of the basic math functions would clutter the code.
pub trait Float: Copy + Default + nalgebra::RealField + num_traits::FromPrimitive {}

impl<F> Float for F where F: Copy + Default + nalgebra::RealField + num_traits::FromPrimitive {}
