//! Chain lowering — flat operand list to a minimal-cost call plan.
//!
//! Runs in three passes over the flattened chain:
//! - `merge`: absorb explicit span-concat sub-chains when the combined
//!   operand count stays within the largest fixed arity, and pre-merge
//!   adjacent known-constant operands.
//! - `strategy`: pick the span path, a fixed-arity text fold, or the
//!   variadic fallback, per operand count and capability table.
//! - `schedule`: record every operand evaluation (and Unit
//!   materialization) in strictly increasing position order, so the call
//!   tree's shape carries no evaluation-order significance.

mod merge;
mod schedule;
mod strategy;

use sable_ir::{CapabilityTable, ConcatArena, ExprId, LoweredPlan, Operand};

/// Lower the concatenation chain rooted at `root` into a call plan.
///
/// This is the pass entry point. The capability table is a read-only
/// snapshot of the target runtime's concatenation primitives, fixed for
/// the duration of the invocation. Lowering cannot fail: every capability
/// gap has a defined fallback, and the baseline pair (Unit→Text, variadic
/// text concat) is a precondition the embedding compiler diagnoses before
/// calling in. An invalid root yields the empty plan.
pub fn lower_chain(arena: &ConcatArena, root: ExprId, caps: CapabilityTable) -> LoweredPlan {
    let chain = crate::flatten(arena, root);
    tracing::debug!(
        leaves = chain.leaf_count,
        items = chain.items.len(),
        "lowering concat chain"
    );

    let items = merge::merge(chain);
    let pieces = merge::premerge_literals(arena, items);
    let plan = strategy::select(arena, caps, pieces);

    #[cfg(debug_assertions)]
    crate::validate(&plan, caps);

    plan
}

/// One strategy-selector input: an operand together with how its value is
/// produced.
pub(crate) enum Piece {
    /// Ordinary operand, evaluated from its source expression.
    Leaf(Operand),
    /// A run of adjacent known-constant operands pre-merged at compile
    /// time. `position` is the first member's position; loading a constant
    /// has no side effects, so the other members need no step of their own.
    Const { position: u32, text: String },
    /// An unabsorbed sub-chain, lowered as its own plan and consumed as
    /// one opaque Text value. Never eligible for a span view: its
    /// producing call has already committed to a Text result.
    Nested { position: u32, parts: Vec<Operand> },
}
