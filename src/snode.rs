//! Storage-tree declaration and finalization.
//!
//! A storage tree describes nested memory layout: each dense level
//! declares one or more virtual axes with their extents, and fields are
//! placed under the innermost level. Trees are declared once through
//! [`TreeBuilder`], validated and frozen by [`TreeBuilder::finalize`],
//! and never restructured afterwards.
//!
//! # Example
//! ```
//! use strata::snode::{Axis, TreeBuilder};
//! use strata::dtype::DType;
//! use strata::field::FieldKind;
//!
//! let mut builder = TreeBuilder::new();
//! let slot = builder
//!     .root()
//!     .dense(&[Axis::J], &[32])
//!     .dense(&[Axis::I], &[16])
//!     .place(DType::F32, FieldKind::Scalar);
//! let tree = builder.finalize().unwrap();
//! assert_eq!(tree.layout(slot).unwrap().shape(), &[16, 32]);
//! ```

use log::debug;
use rustc_hash::FxHashSet;

use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::field::FieldKind;
use crate::layout::FieldLayout;

/// Maximum number of virtual axes a runtime exposes.
pub const MAX_AXES: usize = 8;

/// A virtual indexing axis as seen by user code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Axis(pub usize);

impl Axis {
    pub const I: Axis = Axis(0);
    pub const J: Axis = Axis(1);
    pub const K: Axis = Axis(2);
    pub const L: Axis = Axis(3);

    /// Axes `0..n` in order, for flat row-major declarations.
    pub fn array(n: usize) -> Vec<Axis> {
        (0..n).map(Axis).collect()
    }

    pub fn id(self) -> usize {
        self.0
    }
}

/// Opaque handle to a node of a finalized storage tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SNodeId(pub(crate) usize);

impl SNodeId {
    pub const ROOT: SNodeId = SNodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a field placed during tree construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSlot(pub(crate) usize);

impl FieldSlot {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SNodeKind {
    Root,
    Dense,
    Place,
}

/// One node of a storage tree.
#[derive(Debug, Clone)]
pub struct SNode {
    parent: Option<SNodeId>,
    kind: SNodeKind,
    axes: Vec<Axis>,
    extents: Vec<usize>,
}

impl SNode {
    pub fn parent(&self) -> Option<SNodeId> {
        self.parent
    }

    pub fn kind(&self) -> SNodeKind {
        self.kind
    }

    /// Axes declared at this level, in declaration order. Empty for root
    /// and place nodes.
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn extents(&self) -> &[usize] {
        &self.extents
    }
}

#[derive(Debug, Clone)]
struct PlaceDecl {
    node: SNodeId,
    dtype: DType,
    kind: FieldKind,
}

/// Builder for a storage tree. Declarations accumulate; all validation
/// happens in [`TreeBuilder::finalize`].
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<SNode>,
    places: Vec<PlaceDecl>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder {
            nodes: vec![SNode {
                parent: None,
                kind: SNodeKind::Root,
                axes: vec![],
                extents: vec![],
            }],
            places: vec![],
        }
    }

    /// The root of the tree under construction.
    pub fn root(&mut self) -> NodeRef<'_> {
        self.at(SNodeId::ROOT)
    }

    /// Re-enter a previously declared node, e.g. to place several fields
    /// under the same dense level.
    pub fn at(&mut self, node: SNodeId) -> NodeRef<'_> {
        NodeRef {
            builder: self,
            node,
        }
    }

    /// Validate all declarations and freeze the tree.
    ///
    /// Malformed declarations are fatal here; they never surface later
    /// in addressing or descriptor extraction.
    pub fn finalize(self) -> Result<SNodeTree> {
        for node in &self.nodes {
            if node.kind != SNodeKind::Dense {
                continue;
            }
            if node.axes.len() != node.extents.len() {
                return Err(Error::AxisArity {
                    axes: node.axes.len(),
                    extents: node.extents.len(),
                });
            }
            if node.axes.is_empty() {
                return Err(Error::EmptyLevel);
            }
            for (&axis, &extent) in node.axes.iter().zip(node.extents.iter()) {
                if axis.id() >= MAX_AXES {
                    return Err(Error::AxisOutOfRange {
                        axis: axis.id(),
                        max: MAX_AXES,
                    });
                }
                if extent == 0 {
                    return Err(Error::ZeroExtent { axis: axis.id() });
                }
            }
        }

        let mut layouts = Vec::with_capacity(self.places.len());
        for place in &self.places {
            let chain = self.chain_of(place.node)?;
            layouts.push(FieldLayout::new(chain, place.dtype, place.kind, place.node));
        }

        debug!(
            "finalized storage tree: {} nodes, {} fields",
            self.nodes.len(),
            layouts.len()
        );
        Ok(SNodeTree {
            nodes: self.nodes,
            layouts,
        })
    }

    /// Dense (axis, extent) pairs from the root down to `leaf`.
    fn chain_of(&self, leaf: SNodeId) -> Result<Vec<(Axis, usize)>> {
        let mut path = vec![];
        let mut cursor = Some(leaf);
        while let Some(id) = cursor {
            path.push(id);
            cursor = self.nodes[id.index()].parent;
        }
        path.reverse();

        let mut chain = vec![];
        let mut seen = FxHashSet::default();
        for id in path {
            let node = &self.nodes[id.index()];
            if node.kind != SNodeKind::Dense {
                continue;
            }
            for (&axis, &extent) in node.axes.iter().zip(node.extents.iter()) {
                if !seen.insert(axis) {
                    return Err(Error::DuplicateAxis { axis: axis.id() });
                }
                chain.push((axis, extent));
            }
        }
        if chain.is_empty() {
            return Err(Error::PlaceAtRoot);
        }
        Ok(chain)
    }
}

/// Chainable cursor into a [`TreeBuilder`].
pub struct NodeRef<'a> {
    builder: &'a mut TreeBuilder,
    node: SNodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> SNodeId {
        self.node
    }

    /// Append a dense child declaring `axes` with per-axis `extents`,
    /// nested inside the current node.
    pub fn dense(self, axes: &[Axis], extents: &[usize]) -> NodeRef<'a> {
        let id = SNodeId(self.builder.nodes.len());
        self.builder.nodes.push(SNode {
            parent: Some(self.node),
            kind: SNodeKind::Dense,
            axes: axes.to_vec(),
            extents: extents.to_vec(),
        });
        NodeRef {
            builder: self.builder,
            node: id,
        }
    }

    /// Attach a field leaf under the current node.
    pub fn place(self, dtype: DType, kind: FieldKind) -> FieldSlot {
        let id = SNodeId(self.builder.nodes.len());
        self.builder.nodes.push(SNode {
            parent: Some(self.node),
            kind: SNodeKind::Place,
            axes: vec![],
            extents: vec![],
        });
        let slot = FieldSlot(self.builder.places.len());
        self.builder.places.push(PlaceDecl {
            node: id,
            dtype,
            kind,
        });
        slot
    }
}

/// A finalized, immutable storage tree.
#[derive(Debug)]
pub struct SNodeTree {
    nodes: Vec<SNode>,
    layouts: Vec<FieldLayout>,
}

impl SNodeTree {
    /// One dense level over axes `0..shape.len()` with the given
    /// extents, holding a single field.
    pub fn flat(dtype: DType, kind: FieldKind, shape: &[usize]) -> Result<(SNodeTree, FieldSlot)> {
        let mut builder = TreeBuilder::new();
        let slot = builder
            .root()
            .dense(&Axis::array(shape.len()), shape)
            .place(dtype, kind);
        let tree = builder.finalize()?;
        Ok((tree, slot))
    }

    pub fn node(&self, id: SNodeId) -> Option<&SNode> {
        self.nodes.get(id.index())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn field_count(&self) -> usize {
        self.layouts.len()
    }

    pub fn layout(&self, slot: FieldSlot) -> Option<&FieldLayout> {
        self.layouts.get(slot.index())
    }
}
