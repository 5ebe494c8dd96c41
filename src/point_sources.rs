//! Struct-of-arrays containers for batches of point sources.
//!
//! Every container stores one `Vec` per channel (e.g. `x`, `y`, `z`, `t`) and a single
//! logical capacity shared by all of them. Growth doubles that capacity, and storage for
//! every channel is secured before any channel is written, so a failed push leaves the
//! container exactly as it was.

use std::array;
use std::ops::{Deref, DerefMut};

use nalgebra::{Vector2, Vector3};

use crate::error::Error;
use crate::Float;

/// Generic struct-of-arrays container with `N` parallel channels.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSources<F, const N: usize> {
    channels: [Vec<F>; N],
    capacity: usize,
}

impl<F: Copy, const N: usize> PointSources<F, N> {
    /// Create an empty container that can hold `capacity` rows before growing.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        if capacity < 1 {
            return Err(Error::ZeroCapacity);
        }

        let mut channels: [Vec<F>; N] = array::from_fn(|_| Vec::new());
        for channel in &mut channels {
            channel.try_reserve_exact(capacity)?;
        }

        Ok(Self { channels, capacity })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Whether the container holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of rows that fit before the next reallocation.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Make room for `additional` more rows, doubling the capacity as often as needed.
    ///
    /// On failure the length and capacity are unchanged.
    pub fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        let required = self
            .len()
            .checked_add(additional)
            .ok_or(Error::OutOfMemory)?;
        if required <= self.capacity {
            return Ok(());
        }

        let mut capacity = self.capacity;
        while capacity < required {
            capacity = capacity.checked_mul(2).ok_or(Error::OutOfMemory)?;
        }
        for channel in &mut self.channels {
            channel.try_reserve_exact(capacity - channel.len())?;
        }
        self.capacity = capacity;

        Ok(())
    }

    /// Append one row, one value per channel.
    pub fn push(&mut self, row: [F; N]) -> Result<(), Error> {
        self.reserve(1)?;
        // cannot reallocate: every channel has room for one more value
        for (channel, value) in self.channels.iter_mut().zip(row) {
            channel.push(value);
        }
        Ok(())
    }

    /// Read the row at `index`.
    pub fn get(&self, index: usize) -> Result<[F; N], Error> {
        let len = self.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        Ok(array::from_fn(|c| self.channels[c][index]))
    }

    /// All values of one channel, in row order.
    ///
    /// # Panics
    /// If `channel >= N`.
    pub fn channel(&self, channel: usize) -> &[F] {
        &self.channels[channel]
    }

    /// Iterate over the rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = [F; N]> + '_ {
        (0..self.len()).map(move |i| array::from_fn(|c| self.channels[c][i]))
    }

    /// Release every channel buffer.
    ///
    /// Consuming `self` makes releasing twice, or using a released container, a compile error.
    pub fn free(self) {
        drop(self)
    }
}

/// One row of a [`CartesianPointSources`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartesianPoint<F: Float> {
    /// Heliocentric position.
    pub position: Vector3<F>,
    /// Observation time (MJD).
    pub t: F,
}

/// One row of a [`GnomonicPointSources`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GnomonicPoint<F: Float> {
    /// Position on the tangent plane.
    pub position: Vector2<F>,
    /// Observation time (MJD).
    pub t: F,
}

/// One row of a [`TopocentricPointSources`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopocentricPoint<F: Float> {
    /// Right ascension.
    pub ra: F,
    /// Declination.
    pub dec: F,
    /// Observation time (MJD).
    pub t: F,
}

/// Point sources relative to the sun, in heliocentric Cartesian coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianPointSources<F: Float>(PointSources<F, 4>);

impl<F: Float> CartesianPointSources<F> {
    /// Create an empty container with room for `capacity` points.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        Ok(Self(PointSources::new(capacity)?))
    }

    /// Append a point.
    pub fn push(&mut self, x: F, y: F, z: F, t: F) -> Result<(), Error> {
        self.0.push([x, y, z, t])
    }

    /// Read the point at `index`.
    pub fn get(&self, index: usize) -> Result<CartesianPoint<F>, Error> {
        let [x, y, z, t] = self.0.get(index)?;
        Ok(CartesianPoint {
            position: Vector3::new(x, y, z),
            t,
        })
    }

    /// Release the container.
    pub fn free(self) {
        self.0.free()
    }

    /// x coordinates.
    pub fn x(&self) -> &[F] {
        self.0.channel(0)
    }

    /// y coordinates.
    pub fn y(&self) -> &[F] {
        self.0.channel(1)
    }

    /// z coordinates.
    pub fn z(&self) -> &[F] {
        self.0.channel(2)
    }

    /// Observation times (MJD).
    pub fn t(&self) -> &[F] {
        self.0.channel(3)
    }
}

impl<F: Float> Deref for CartesianPointSources<F> {
    type Target = PointSources<F, 4>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<F: Float> DerefMut for CartesianPointSources<F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<F: Float> From<PointSources<F, 4>> for CartesianPointSources<F> {
    fn from(value: PointSources<F, 4>) -> Self {
        Self(value)
    }
}

/// Point sources placed on a gnomonic tangent plane.
#[derive(Debug, Clone, PartialEq)]
pub struct GnomonicPointSources<F: Float>(PointSources<F, 3>);

impl<F: Float> GnomonicPointSources<F> {
    /// Create an empty container with room for `capacity` points.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        Ok(Self(PointSources::new(capacity)?))
    }

    /// Append a point.
    pub fn push(&mut self, x: F, y: F, t: F) -> Result<(), Error> {
        self.0.push([x, y, t])
    }

    /// Read the point at `index`.
    pub fn get(&self, index: usize) -> Result<GnomonicPoint<F>, Error> {
        let [x, y, t] = self.0.get(index)?;
        Ok(GnomonicPoint {
            position: Vector2::new(x, y),
            t,
        })
    }

    /// Release the container.
    pub fn free(self) {
        self.0.free()
    }

    /// x coordinates.
    pub fn x(&self) -> &[F] {
        self.0.channel(0)
    }

    /// y coordinates.
    pub fn y(&self) -> &[F] {
        self.0.channel(1)
    }

    /// Observation times (MJD).
    pub fn t(&self) -> &[F] {
        self.0.channel(2)
    }
}

impl<F: Float> Deref for GnomonicPointSources<F> {
    type Target = PointSources<F, 3>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<F: Float> DerefMut for GnomonicPointSources<F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<F: Float> From<PointSources<F, 3>> for GnomonicPointSources<F> {
    fn from(value: PointSources<F, 3>) -> Self {
        Self(value)
    }
}

/// Point sources as seen from an observatory, in angular coordinates.
///
/// Only the storage lives here; converting to or from Cartesian coordinates is left to
/// the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TopocentricPointSources<F: Float>(PointSources<F, 3>);

impl<F: Float> TopocentricPointSources<F> {
    /// Create an empty container with room for `capacity` points.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        Ok(Self(PointSources::new(capacity)?))
    }

    /// Append a point.
    pub fn push(&mut self, ra: F, dec: F, t: F) -> Result<(), Error> {
        self.0.push([ra, dec, t])
    }

    /// Read the point at `index`.
    pub fn get(&self, index: usize) -> Result<TopocentricPoint<F>, Error> {
        let [ra, dec, t] = self.0.get(index)?;
        Ok(TopocentricPoint { ra, dec, t })
    }

    /// Release the container.
    pub fn free(self) {
        self.0.free()
    }

    /// Right ascensions.
    pub fn ra(&self) -> &[F] {
        self.0.channel(0)
    }

    /// Declinations.
    pub fn dec(&self) -> &[F] {
        self.0.channel(1)
    }

    /// Observation times (MJD).
    pub fn t(&self) -> &[F] {
        self.0.channel(2)
    }
}

impl<F: Float> Deref for TopocentricPointSources<F> {
    type Target = PointSources<F, 3>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<F: Float> DerefMut for TopocentricPointSources<F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<F: Float> From<PointSources<F, 3>> for TopocentricPointSources<F> {
    fn from(value: PointSources<F, 3>) -> Self {
        Self(value)
    }
}
