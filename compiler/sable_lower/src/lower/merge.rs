//! Sub-chain merge and constant pre-merge.
//!
//! The merge decision is all-or-nothing over the fully unwrapped leaf
//! count: if absorbing every nested sub-chain keeps the total at or below
//! 4 — the largest fixed arity any span-concat operation exists for — all
//! of them are absorbed in place so one wider call can be emitted.
//! Otherwise none are, and each sub-chain stays an opaque Text-producing
//! call. A sub-chain whose absorption would push the total above 4 is
//! never unwrapped, even when unwrapping could still reduce the overall
//! call count; chains of 5+ always take the variadic path.

use sable_ir::{Chain, ChainItem, ConcatArena, Operand};

use super::Piece;

/// Largest fixed arity a dedicated concatenation operation exists for.
pub(super) const MAX_FIXED_ARITY: u32 = 4;

/// Apply the sub-chain merge policy to a flattened chain.
pub(super) fn merge(chain: Chain) -> Vec<ChainItem> {
    let has_nested = chain
        .items
        .iter()
        .any(|item| matches!(item, ChainItem::Nested { .. }));
    if !has_nested || chain.leaf_count > MAX_FIXED_ARITY {
        return chain.items;
    }

    tracing::debug!(leaves = chain.leaf_count, "absorbing nested sub-chains");
    let mut out = Vec::with_capacity(chain.leaf_count as usize);
    for item in chain.items {
        match item {
            ChainItem::Leaf(op) => out.push(ChainItem::Leaf(op)),
            // Relative order of the sub-chain's operands is preserved.
            ChainItem::Nested { parts } => out.extend(parts.into_iter().map(ChainItem::Leaf)),
        }
    }
    out
}

/// Pre-merge maximal runs of adjacent known-constant operands into single
/// synthetic Text operands.
///
/// Allowed compile-time optimization, not required for correctness:
/// constant loads have no side effects, so collapsing a run cannot
/// reorder anything. Runs of length 1 stay ordinary operands. Shrinking
/// the operand count here can move a chain below an arity boundary before
/// strategy selection.
pub(super) fn premerge_literals(arena: &ConcatArena, items: Vec<ChainItem>) -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(items.len());
    let mut run: Vec<Operand> = Vec::new();

    for item in items {
        match item {
            ChainItem::Leaf(op) if op.literal.is_some() => run.push(op),
            ChainItem::Leaf(op) => {
                flush_run(arena, &mut run, &mut pieces);
                pieces.push(Piece::Leaf(op));
            }
            ChainItem::Nested { parts } => {
                flush_run(arena, &mut run, &mut pieces);
                if let Some(first) = parts.first() {
                    pieces.push(Piece::Nested {
                        position: first.position,
                        parts,
                    });
                }
            }
        }
    }
    flush_run(arena, &mut run, &mut pieces);
    pieces
}

/// Flush a pending literal run: a single operand stays as-is, two or more
/// collapse into one `Const` piece at the first member's position.
fn flush_run(arena: &ConcatArena, run: &mut Vec<Operand>, pieces: &mut Vec<Piece>) {
    match run.len() {
        0 => {}
        1 => {
            if let Some(op) = run.pop() {
                pieces.push(Piece::Leaf(op));
            }
        }
        _ => {
            let mut text = String::new();
            for op in run.iter() {
                if let Some(lit) = op.literal {
                    text.push_str(arena.literal(lit));
                }
            }
            let position = run[0].position;
            pieces.push(Piece::Const { position, text });
            run.clear();
        }
    }
}
