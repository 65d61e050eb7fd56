//! Strata: layered field storage for compute runtimes
//!
//! Strata models how a compute runtime lays out user-declared fields in
//! memory — nested dense storage trees, virtual-axis to slot mapping,
//! byte addressing — and snapshots per-field descriptors for a
//! rendering layer to bind buffers against.
//!
//! # Architecture
//!
//! Strata provides:
//! - **dtype**: scalar element types and typed-access bounds
//! - **backend**: active-arch configuration and descriptor source tags
//! - **snode**: storage-tree declaration and finalization
//! - **layout**: per-field physical layout and addressing
//! - **field**: fields with host-owned cells
//! - **descriptor**: field descriptor extraction
//!
//! # Example
//!
//! ```
//! use strata::prelude::*;
//!
//! // column-major: axis j declared outside axis i
//! let mut builder = TreeBuilder::new();
//! let slot = builder
//!     .root()
//!     .dense(&[Axis::J], &[32])
//!     .dense(&[Axis::I], &[16])
//!     .place(DType::F32, FieldKind::Scalar);
//! let tree = builder.finalize().unwrap();
//! let mut field = Field::new(tree.into(), slot).unwrap();
//!
//! field.write(&[3, 5], 1.5f32).unwrap();
//! assert_eq!(field.read::<f32>(&[3, 5]).unwrap(), 1.5);
//!
//! let descriptor = describe(Some(&field)).unwrap();
//! assert!(descriptor.valid);
//! assert_eq!(descriptor.shape, vec![16, 32]);
//! ```

// ============================================================================
// Core Modules
// ============================================================================

pub mod backend;
pub mod descriptor;
pub mod dtype;
pub mod error;
pub mod field;
pub mod layout;
pub mod snode;

// ============================================================================
// Re-exports
// ============================================================================

pub use backend::{Arch, FieldSource};
pub use descriptor::{describe, FieldDescriptor};
pub use dtype::{DType, ElemType};
pub use error::{Error, Result};
pub use field::{Field, FieldKind};
pub use layout::FieldLayout;
pub use snode::{Axis, FieldSlot, SNodeId, SNodeTree, TreeBuilder};

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module with commonly used types and functions
pub mod prelude {
    pub use crate::backend::{current_arch, set_current_arch, with_arch, Arch, FieldSource};
    pub use crate::descriptor::{describe, FieldDescriptor};
    pub use crate::dtype::{DType, ElemType};
    pub use crate::error::{Error, Result};
    pub use crate::field::{Field, FieldKind};
    pub use crate::layout::FieldLayout;
    pub use crate::snode::{Axis, FieldSlot, SNodeId, SNodeTree, TreeBuilder};
}

// ============================================================================
// Tests
// ============================================================================
