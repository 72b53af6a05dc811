//! Input chain fragment — the binary concatenation tree handed to the pass.
//!
//! [`ConcatArena`] uses struct-of-arrays layout for cache locality: node
//! kinds live in one flat `Vec` indexed by [`ExprId`], argument lists of
//! explicit span-concat calls in a flat `Vec<ExprId>` indexed by
//! [`ExprRange`], and known-constant text in a literal pool indexed by
//! [`LitId`]. Chains of 10 000+ operands are the stress shape, so node
//! storage stays flat and `Copy`.

use crate::ids::{ExprId, ExprRange, LitId, SourceId};

/// Convert a storage length to `u32`, panicking with context on overflow.
fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("{what} storage exceeded u32::MAX entries"))
}

/// Convert a list length to `u16`, panicking with context on overflow.
fn to_u16(len: usize, what: &str) -> u16 {
    u16::try_from(len).unwrap_or_else(|_| panic!("{what} exceeded u16::MAX entries"))
}

/// Classification of one chain operand.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OperandKind {
    /// A string-like value.
    Text,
    /// A single scalar character-like value.
    Unit,
}

/// One node of the input concatenation tree.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConcatExpr {
    /// A binary concatenation (`left + right`).
    Concat { left: ExprId, right: ExprId },
    /// One operand. `literal` is the optional precomputed constant text,
    /// used only to pre-merge adjacent literals at compile time.
    Leaf {
        kind: OperandKind,
        source: SourceId,
        literal: Option<LitId>,
    },
    /// A user-written explicit call to a fixed-arity (2–4) span
    /// concatenation, eligible for absorption into the parent chain.
    SpanConcat { args: ExprRange },
}

/// Arena for input concatenation trees.
///
/// Built by the embedding compiler (one arena per eligible expression
/// chain), consumed read-only by the flattener. Nothing here is mutated
/// during lowering.
#[derive(Clone, Debug, Default)]
pub struct ConcatArena {
    /// Node kinds, indexed by `ExprId`.
    kinds: Vec<ConcatExpr>,
    /// Flattened argument lists for `SpanConcat` nodes, indexed by `ExprRange`.
    expr_lists: Vec<ExprId>,
    /// Known-constant operand text, indexed by `LitId`.
    literals: Vec<Box<str>>,
}

impl ConcatArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena pre-allocated for roughly `operands` leaves.
    ///
    /// A chain of n operands has n leaves and n-1 concat nodes.
    pub fn with_capacity(operands: usize) -> Self {
        Self {
            kinds: Vec::with_capacity(operands * 2),
            expr_lists: Vec::new(),
            literals: Vec::new(),
        }
    }

    /// Allocate a node, returning its ID.
    pub fn push(&mut self, kind: ConcatExpr) -> ExprId {
        let id = ExprId::new(to_u32(self.kinds.len(), "concat expressions"));
        self.kinds.push(kind);
        id
    }

    /// Get the kind of a node.
    #[inline]
    pub fn kind(&self, id: ExprId) -> &ConcatExpr {
        &self.kinds[id.index()]
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no nodes have been allocated.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Allocate a contiguous argument list for a `SpanConcat` node.
    pub fn push_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        if ids.is_empty() {
            return ExprRange::EMPTY;
        }
        let start = to_u32(self.expr_lists.len(), "expression lists");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, to_u16(ids.len(), "span-concat argument list"))
    }

    /// Resolve an argument-list range to its IDs.
    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Intern a known-constant text into the literal pool.
    pub fn push_literal(&mut self, text: impl Into<Box<str>>) -> LitId {
        let id = LitId::new(to_u32(self.literals.len(), "literals"));
        self.literals.push(text.into());
        id
    }

    /// Resolve a literal ID to its text.
    #[inline]
    pub fn literal(&self, id: LitId) -> &str {
        &self.literals[id.index()]
    }

    // -- Builder conveniences (used by the embedding compiler and tests) --

    /// Allocate a Text leaf with no known constant value.
    pub fn text_leaf(&mut self, source: SourceId) -> ExprId {
        self.push(ConcatExpr::Leaf {
            kind: OperandKind::Text,
            source,
            literal: None,
        })
    }

    /// Allocate a Unit leaf with no known constant value.
    pub fn unit_leaf(&mut self, source: SourceId) -> ExprId {
        self.push(ConcatExpr::Leaf {
            kind: OperandKind::Unit,
            source,
            literal: None,
        })
    }

    /// Allocate a Text leaf carrying a known constant value.
    pub fn literal_leaf(&mut self, source: SourceId, text: &str) -> ExprId {
        let literal = Some(self.push_literal(text));
        self.push(ConcatExpr::Leaf {
            kind: OperandKind::Text,
            source,
            literal,
        })
    }

    /// Allocate a `Concat` node over two children.
    pub fn concat(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.push(ConcatExpr::Concat { left, right })
    }

    /// Allocate an explicit span-concat call node over its arguments.
    pub fn span_concat(&mut self, args: &[ExprId]) -> ExprId {
        let args = self.push_expr_list(args);
        self.push(ConcatExpr::SpanConcat { args })
    }

    /// Fold a slice of operands into a left-associated `Concat` spine,
    /// the dominant shape produced by source text (`a + b + c + ...`).
    ///
    /// Returns `ExprId::INVALID` for an empty slice.
    pub fn left_spine(&mut self, operands: &[ExprId]) -> ExprId {
        let mut iter = operands.iter().copied();
        let Some(mut acc) = iter.next() else {
            return ExprId::INVALID;
        };
        for next in iter {
            acc = self.concat(acc, next);
        }
        acc
    }
}
