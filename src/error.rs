//! Error types for storage-tree construction and field access.

use thiserror::Error;

use crate::backend::Arch;
use crate::dtype::DType;

/// Main error type for layout, field, and descriptor operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The active backend carries no descriptor source tag.
    #[error("Unsupported backend: {0}")]
    UnsupportedBackend(Arch),

    /// A dense level declared mismatched axis and extent lists.
    #[error("Dense level declares {axes} axes but {extents} extents")]
    AxisArity { axes: usize, extents: usize },

    /// A dense level declared no axes at all.
    #[error("Dense level declares no axes")]
    EmptyLevel,

    /// A dense level declared an extent of zero.
    #[error("Extent of axis {axis} must be positive")]
    ZeroExtent { axis: usize },

    /// A virtual axis id beyond the supported maximum.
    #[error("Axis {axis} is out of range (at most {max} virtual axes)")]
    AxisOutOfRange { axis: usize, max: usize },

    /// The same virtual axis appears twice along a root-to-leaf chain.
    #[error("Axis {axis} is declared twice along the placement chain")]
    DuplicateAxis { axis: usize },

    /// A field was placed directly under the root, with no dense level.
    #[error("Field placed directly under the root")]
    PlaceAtRoot,

    /// A field slot that does not belong to the tree it was used with.
    #[error("Unknown field slot {slot}")]
    UnknownSlot { slot: usize },

    /// Wrong number of logical indices for a field.
    #[error("Expected {expected} indices, got {got}")]
    IndexArity { expected: usize, got: usize },

    /// A logical index outside the declared extent.
    #[error("Index {index} out of bounds for axis {axis} (extent {extent})")]
    IndexOutOfBounds {
        axis: usize,
        index: usize,
        extent: usize,
    },

    /// Typed access with an element type other than the declared one.
    #[error("Element type mismatch: field stores {expected}, access uses {actual}")]
    DtypeMismatch { expected: DType, actual: DType },

    /// Scalar cell access on a field that stores matrix cells.
    #[error("Cell access expects a scalar field, this field stores {rows}x{cols} matrix cells")]
    ExpectedScalarField { rows: usize, cols: usize },

    /// Component access on a field that stores scalar cells.
    #[error("Component access expects a matrix field")]
    ExpectedMatrixField,

    /// A matrix component outside the cell's row/column counts.
    #[error("Component ({row}, {col}) out of bounds for {rows}x{cols} matrix cells")]
    ComponentOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
