//! Per-field memory layout: the physical dimension chain and the
//! logical-index to byte-offset addressing it induces.

use rustc_hash::FxHashMap;

use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::field::FieldKind;
use crate::snode::{Axis, SNodeId};

// A field's layout is fixed when its storage tree is finalized. Index
// slots (the order in which user code passes logical indices) are
// allocated in ascending axis-id order over the axes the field uses;
// the physical chain keeps declaration order and alone decides memory
// order. The two orders coincide only for row-major declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    /// Physical dimensions, outermost first, in declaration order.
    chain: Vec<(Axis, usize)>,
    /// Axis for each index slot, ascending by axis id.
    slot_axes: Vec<Axis>,
    /// Extents in index-slot order (the user-facing shape).
    shape: Vec<usize>,
    /// Cell strides in index-slot order.
    strides: Vec<usize>,
    dtype: DType,
    kind: FieldKind,
    snode: SNodeId,
}

impl FieldLayout {
    /// Build the layout for a validated root-to-leaf chain.
    pub(crate) fn new(
        chain: Vec<(Axis, usize)>,
        dtype: DType,
        kind: FieldKind,
        snode: SNodeId,
    ) -> Self {
        let mut phys_strides = vec![1usize; chain.len()];
        for i in (0..chain.len().saturating_sub(1)).rev() {
            phys_strides[i] = phys_strides[i + 1] * chain[i + 1].1;
        }

        let mut slot_axes: Vec<Axis> = chain.iter().map(|&(axis, _)| axis).collect();
        slot_axes.sort_unstable();

        let mut shape = Vec::with_capacity(slot_axes.len());
        let mut strides = Vec::with_capacity(slot_axes.len());
        for &axis in &slot_axes {
            let pos = chain
                .iter()
                .position(|&(a, _)| a == axis)
                .expect("slot axes come from the chain");
            shape.push(chain[pos].1);
            strides.push(phys_strides[pos]);
        }

        FieldLayout {
            chain,
            slot_axes,
            shape,
            strides,
            dtype,
            kind,
            snode,
        }
    }

    /// Physical dimensions, outermost first.
    pub fn chain(&self) -> &[(Axis, usize)] {
        &self.chain
    }

    /// Extents in index-slot order.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Cell strides in index-slot order.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The storage node this field was placed under.
    pub fn snode(&self) -> SNodeId {
        self.snode
    }

    /// Bytes per logical cell (all matrix components included).
    pub fn cell_size(&self) -> usize {
        self.dtype.size() * self.kind.components()
    }

    pub fn total_cells(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn size_in_bytes(&self) -> usize {
        self.total_cells() * self.cell_size()
    }

    /// Mapping from virtual axis id to index-slot position.
    ///
    /// Slots are allocated in ascending axis-id order when the tree is
    /// finalized, independent of nesting depth: two fields over the same
    /// axes map identically even if their extents or nesting differ.
    pub fn physical_index_position(&self) -> FxHashMap<usize, usize> {
        self.slot_axes
            .iter()
            .enumerate()
            .map(|(slot, axis)| (axis.id(), slot))
            .collect()
    }

    /// Byte offset of a logical cell.
    ///
    /// Indices are given in slot order, one per virtual axis. Adjacent
    /// indices of the physically innermost axis differ in address by
    /// exactly one cell size.
    pub fn address(&self, indices: &[usize]) -> Result<usize> {
        if indices.len() != self.shape.len() {
            return Err(Error::IndexArity {
                expected: self.shape.len(),
                got: indices.len(),
            });
        }
        let mut cells = 0usize;
        for (slot, &index) in indices.iter().enumerate() {
            let extent = self.shape[slot];
            if index >= extent {
                return Err(Error::IndexOutOfBounds {
                    axis: self.slot_axes[slot].id(),
                    index,
                    extent,
                });
            }
            cells += index * self.strides[slot];
        }
        Ok(cells * self.cell_size())
    }
}
