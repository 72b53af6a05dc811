//! Flattened chain model — the output of the flattener, input to lowering.

use crate::ids::{LitId, SourceId};
use crate::OperandKind;

/// One leaf of the original chain, after flattening.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Operand {
    /// Text or Unit classification from the type system.
    pub kind: OperandKind,
    /// Opaque handle to the original sub-expression (caller-owned).
    pub source: SourceId,
    /// Left-to-right index over all leaves of the whole chain, including
    /// leaves inside nested sub-chains. Immutable once assigned.
    pub position: u32,
    /// Known constant text, if the operand is a compile-time literal.
    pub literal: Option<LitId>,
}

/// One entry of a flattened chain.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChainItem {
    /// An ordinary operand.
    Leaf(Operand),
    /// A user-written fixed-arity span concatenation, kept as a unit until
    /// the merge pass decides whether to absorb its operands into the
    /// parent chain. `parts` carry positions in the global order.
    Nested { parts: Vec<Operand> },
}

impl ChainItem {
    /// Position of the item's first (or only) operand.
    pub fn position(&self) -> u32 {
        match self {
            ChainItem::Leaf(op) => op.position,
            ChainItem::Nested { parts } => parts.first().map_or(u32::MAX, |op| op.position),
        }
    }
}

/// Flattened, ordered chain.
///
/// Invariant: item positions are strictly increasing and exactly reproduce
/// the source's left-to-right operand order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Chain {
    /// Ordered entries.
    pub items: Vec<ChainItem>,
    /// Total number of leaves across all entries, nested parts included.
    pub leaf_count: u32,
}

impl Chain {
    /// Empty chain (from lowering an invalid root).
    pub fn empty() -> Self {
        Self::default()
    }
}
