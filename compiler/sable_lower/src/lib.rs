//! Chained-concatenation lowering for the Sable compiler.
//!
//! This crate rewrites an arbitrarily long chain of string/character
//! concatenations into a minimal-cost sequence of runtime calls, driven by
//! a per-target [`CapabilityTable`](sable_ir::CapabilityTable), while
//! preserving the source program's left-to-right evaluation order.
//!
//! # Pipeline Position
//!
//! ```text
//! Parse → Type Check → **Concat Lowering** → code emitter
//! ```
//!
//! # What Happens During Lowering
//!
//! 1. **Flattening** (`flatten`): the nested binary `+` tree becomes a
//!    flat, ordered operand list. The left spine is walked with an
//!    explicit stack, so 10 000+-operand chains never overflow.
//!
//! 2. **Sub-chain merge** (`lower::merge`): operands that are themselves
//!    explicit fixed-arity span concatenations are absorbed into the
//!    parent chain when the combined operand count stays within the
//!    largest fixed arity (4); otherwise they stay opaque and are lowered
//!    as their own sub-plans.
//!
//! 3. **Strategy selection** (`lower::strategy`): per operand count and
//!    capability table, pick the n-ary span path, a fixed-arity text fold,
//!    or the variadic fallback.
//!
//! 4. **Evaluation scheduling** (`lower::schedule`): every operand is
//!    evaluated exactly once, in source order, before any call groups the
//!    results; Unit operands bound for span views are snapshotted into
//!    address-stable temporaries at their evaluation point.
//!
//! The pass is a total function: every capability gap has a defined
//! fallback, and a well-formed chain cannot fail to lower. It holds no
//! state across invocations and is safe to run concurrently on
//! independent chains.

mod flatten;
mod lower;
mod validate;

#[cfg(test)]
mod test_helpers;

pub use flatten::flatten;
pub use lower::lower_chain;
pub use validate::validate;
