//! Field descriptor extraction for the rendering layer.
//!
//! A [`FieldDescriptor`] is a transient snapshot recomputed on demand;
//! it never outlives the call that produced it in any meaningful sense,
//! and extraction is a pure read of existing metadata.

use log::trace;

use crate::backend::{current_arch, FieldSource};
use crate::dtype::DType;
use crate::error::Result;
use crate::field::{Field, FieldKind};
use crate::snode::SNodeId;

/// Normalized description of a field, consumable by a rendering layer.
///
/// When `valid` is false the remaining fields hold inert defaults and
/// must be ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub valid: bool,
    pub source: FieldSource,
    pub shape: Vec<usize>,
    pub dtype: DType,
    pub snode: SNodeId,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// The descriptor for "no field": `valid` is false, everything else
    /// inert.
    pub fn invalid() -> FieldDescriptor {
        FieldDescriptor {
            valid: false,
            source: FieldSource::X64,
            shape: vec![],
            dtype: DType::F32,
            snode: SNodeId::ROOT,
            kind: FieldKind::Scalar,
        }
    }

    pub fn rows(&self) -> usize {
        self.kind.rows()
    }

    pub fn cols(&self) -> usize {
        self.kind.cols()
    }
}

impl Default for FieldDescriptor {
    fn default() -> Self {
        Self::invalid()
    }
}

/// Snapshot a field's metadata for the rendering layer.
///
/// A missing field yields the invalid sentinel, not an error. An active
/// arch with no source tag is fatal and propagates. Calling twice on an
/// unchanged field returns equal descriptors.
pub fn describe(field: Option<&Field>) -> Result<FieldDescriptor> {
    let Some(field) = field else {
        return Ok(FieldDescriptor::invalid());
    };
    let source = FieldSource::from_arch(current_arch())?;
    trace!(
        "describing field: shape {:?}, dtype {}, source {}",
        field.shape(),
        field.dtype(),
        source
    );
    Ok(FieldDescriptor {
        valid: true,
        source,
        shape: field.shape().to_vec(),
        dtype: field.dtype(),
        snode: field.snode(),
        kind: field.kind(),
    })
}
