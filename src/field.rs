//! Fields: typed, shaped storage regions with host-owned cells.
//!
//! A field is created once by declaration and placement and is immutable
//! in shape, element type, and layout from then on; only its cell
//! contents change. The backing tree is shared (`Arc`), so several
//! fields placed in one tree stay cheap to hand around.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::dtype::{DType, ElemType};
use crate::error::{Error, Result};
use crate::layout::FieldLayout;
use crate::snode::{FieldSlot, SNodeId, SNodeTree};

/// What one logical cell holds.
///
/// Scalar cells count as 1x1 so consumers can treat row/column counts
/// uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar,
    Matrix { rows: usize, cols: usize },
}

impl FieldKind {
    pub fn rows(&self) -> usize {
        match self {
            FieldKind::Scalar => 1,
            FieldKind::Matrix { rows, .. } => *rows,
        }
    }

    pub fn cols(&self) -> usize {
        match self {
            FieldKind::Scalar => 1,
            FieldKind::Matrix { cols, .. } => *cols,
        }
    }

    /// Scalars per cell.
    pub fn components(&self) -> usize {
        self.rows() * self.cols()
    }
}

/// A typed, shaped storage region exposed to user code.
pub struct Field {
    tree: Arc<SNodeTree>,
    slot: FieldSlot,
    data: Vec<u8>,
}

impl Field {
    /// Bind a placed slot of a finalized tree, allocating zeroed cells.
    pub fn new(tree: Arc<SNodeTree>, slot: FieldSlot) -> Result<Field> {
        let layout = tree.layout(slot).ok_or(Error::UnknownSlot {
            slot: slot.index(),
        })?;
        let data = vec![0u8; layout.size_in_bytes()];
        Ok(Field { tree, slot, data })
    }

    /// A scalar field over one dense level, axes `0..shape.len()`.
    pub fn dense(dtype: DType, shape: &[usize]) -> Result<Field> {
        Self::dense_with_kind(dtype, FieldKind::Scalar, shape)
    }

    /// Like [`Field::dense`], with matrix cells.
    pub fn dense_with_kind(dtype: DType, kind: FieldKind, shape: &[usize]) -> Result<Field> {
        let (tree, slot) = SNodeTree::flat(dtype, kind, shape)?;
        Field::new(Arc::new(tree), slot)
    }

    pub fn layout(&self) -> &FieldLayout {
        // slot validity was checked in Field::new
        self.tree
            .layout(self.slot)
            .expect("field slot belongs to its tree")
    }

    pub fn tree(&self) -> &Arc<SNodeTree> {
        &self.tree
    }

    /// Extents in declared virtual-axis order.
    pub fn shape(&self) -> &[usize] {
        self.layout().shape()
    }

    pub fn dtype(&self) -> DType {
        self.layout().dtype()
    }

    pub fn kind(&self) -> FieldKind {
        self.layout().kind()
    }

    /// The storage node backing this field.
    pub fn snode(&self) -> SNodeId {
        self.layout().snode()
    }

    /// See [`FieldLayout::physical_index_position`].
    pub fn physical_index_position(&self) -> FxHashMap<usize, usize> {
        self.layout().physical_index_position()
    }

    /// Byte offset of a logical cell inside this field's storage.
    pub fn address(&self, indices: &[usize]) -> Result<usize> {
        self.layout().address(indices)
    }

    /// Read the scalar cell at `indices`.
    pub fn read<T: ElemType>(&self, indices: &[usize]) -> Result<T> {
        self.check_scalar()?;
        self.check_dtype::<T>()?;
        let offset = self.layout().address(indices)?;
        Ok(self.load(offset))
    }

    /// Write the scalar cell at `indices`.
    pub fn write<T: ElemType>(&mut self, indices: &[usize], value: T) -> Result<()> {
        self.check_scalar()?;
        self.check_dtype::<T>()?;
        let offset = self.layout().address(indices)?;
        self.store(offset, value);
        Ok(())
    }

    /// Read one component of the matrix cell at `indices`.
    pub fn read_at<T: ElemType>(&self, indices: &[usize], row: usize, col: usize) -> Result<T> {
        self.check_dtype::<T>()?;
        let offset = self.component_offset(indices, row, col)?;
        Ok(self.load(offset))
    }

    /// Write one component of the matrix cell at `indices`.
    pub fn write_at<T: ElemType>(
        &mut self,
        indices: &[usize],
        row: usize,
        col: usize,
        value: T,
    ) -> Result<()> {
        self.check_dtype::<T>()?;
        let offset = self.component_offset(indices, row, col)?;
        self.store(offset, value);
        Ok(())
    }

    fn check_dtype<T: ElemType>(&self) -> Result<()> {
        let expected = self.dtype();
        if T::DTYPE != expected {
            return Err(Error::DtypeMismatch {
                expected,
                actual: T::DTYPE,
            });
        }
        Ok(())
    }

    fn check_scalar(&self) -> Result<()> {
        match self.kind() {
            FieldKind::Scalar => Ok(()),
            FieldKind::Matrix { rows, cols } => Err(Error::ExpectedScalarField { rows, cols }),
        }
    }

    /// Byte offset of one component inside a matrix cell, row-major
    /// within the cell.
    fn component_offset(&self, indices: &[usize], row: usize, col: usize) -> Result<usize> {
        let FieldKind::Matrix { rows, cols } = self.kind() else {
            return Err(Error::ExpectedMatrixField);
        };
        if row >= rows || col >= cols {
            return Err(Error::ComponentOutOfBounds {
                row,
                col,
                rows,
                cols,
            });
        }
        let base = self.layout().address(indices)?;
        Ok(base + (row * cols + col) * self.dtype().size())
    }

    fn load<T: ElemType>(&self, offset: usize) -> T {
        let bytes = &self.data[offset..offset + std::mem::size_of::<T>()];
        bytemuck::pod_read_unaligned(bytes)
    }

    fn store<T: ElemType>(&mut self, offset: usize, value: T) {
        let bytes = &mut self.data[offset..offset + std::mem::size_of::<T>()];
        bytes.copy_from_slice(bytemuck::bytes_of(&value));
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("dtype", &self.dtype())
            .field("kind", &self.kind())
            .field("shape", &self.shape())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_field_is_zeroed() {
        let field = Field::dense(DType::F32, &[4, 3]).unwrap();
        for i in 0..4 {
            for j in 0..3 {
                assert_eq!(field.read::<f32>(&[i, j]).unwrap(), 0.0);
            }
        }
    }

    #[test]
    fn test_scalar_round_trip() {
        let mut field = Field::dense(DType::I32, &[5, 7]).unwrap();
        for i in 0..5 {
            for j in 0..7 {
                field.write(&[i, j], (i * 100 + j) as i32).unwrap();
            }
        }
        for i in 0..5 {
            for j in 0..7 {
                assert_eq!(field.read::<i32>(&[i, j]).unwrap(), (i * 100 + j) as i32);
            }
        }
    }

    #[test]
    fn test_dtype_mismatch() {
        let field = Field::dense(DType::F32, &[2]).unwrap();
        assert!(matches!(
            field.read::<i32>(&[0]),
            Err(Error::DtypeMismatch {
                expected: DType::F32,
                actual: DType::I32
            })
        ));
    }

    #[test]
    fn test_scalar_access_on_matrix_field() {
        let field =
            Field::dense_with_kind(DType::F32, FieldKind::Matrix { rows: 2, cols: 3 }, &[4])
                .unwrap();
        assert!(matches!(
            field.read::<f32>(&[0]),
            Err(Error::ExpectedScalarField { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_matrix_component_round_trip() {
        let mut field =
            Field::dense_with_kind(DType::F32, FieldKind::Matrix { rows: 2, cols: 3 }, &[4])
                .unwrap();
        for cell in 0..4 {
            for r in 0..2 {
                for c in 0..3 {
                    let v = (cell * 10 + r * 3 + c) as f32;
                    field.write_at(&[cell], r, c, v).unwrap();
                }
            }
        }
        assert_eq!(field.read_at::<f32>(&[3], 1, 2).unwrap(), 35.0);
        assert_eq!(field.read_at::<f32>(&[0], 0, 0).unwrap(), 0.0);
        assert!(matches!(
            field.read_at::<f32>(&[0], 2, 0),
            Err(Error::ComponentOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_component_access_on_scalar_field() {
        let field = Field::dense(DType::F32, &[2]).unwrap();
        assert!(matches!(
            field.read_at::<f32>(&[0], 0, 0),
            Err(Error::ExpectedMatrixField)
        ));
    }

    #[test]
    fn test_unknown_slot_rejected() {
        let (tree, _) = SNodeTree::flat(DType::F32, FieldKind::Scalar, &[4]).unwrap();
        let bogus = FieldSlot(7);
        assert!(matches!(
            Field::new(Arc::new(tree), bogus),
            Err(Error::UnknownSlot { slot: 7 })
        ));
    }
}
