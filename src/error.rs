//! Error type shared by the linear algebra, container, and projection layers.

/// Everything that can go wrong while building a tangent plane or filling a container.
///
/// None of these are transient; the caller decides whether to skip a center or abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The center position is the zero vector, or a normalization needed to build the
    /// tangent plane collapsed to zero magnitude.
    #[error("invalid projection center")]
    InvalidCenter,
    /// The basis matrix has a determinant of exactly zero.
    #[error("matrix is not invertible")]
    NotInvertible,
    /// Allocating or growing a container failed.
    #[error("out of memory")]
    OutOfMemory,
    /// A row was requested past the current length of a container.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested row.
        index: usize,
        /// Length of the container.
        len: usize,
    },
    /// A vector of exactly zero magnitude was normalized.
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,
    /// A container was requested with a capacity of zero.
    #[error("capacity must be at least 1")]
    ZeroCapacity,
    /// An array did not have one column per container channel.
    #[error("expected {expected} columns, found {found}")]
    ColumnCount {
        /// Number of channels of the container.
        expected: usize,
        /// Number of columns of the array.
        found: usize,
    },
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::OutOfMemory
    }
}
