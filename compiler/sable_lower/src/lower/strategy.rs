//! Strategy selection — the capability-driven state machine over operand
//! count.
//!
//! - n = 0: the empty-text constant, no call.
//! - n = 1: the operand verbatim (Unit gets a Unit→Text conversion).
//! - n ∈ {2,3,4}: the n-ary span path when the span-concat of that arity
//!   and every operand's view conversion are present; otherwise a
//!   fixed-arity text fold over whatever text-concat arities exist;
//!   otherwise the variadic fallback.
//! - n ≥ 5: the variadic path, unconditionally — past arity 4 the cost of
//!   one intermediate allocation undercuts the code-size and dispatch cost
//!   of chaining fixed-arity calls.
//!
//! Fold grouping is deterministic: at each step the earliest operands are
//! merged, using the smallest arity that still achieves the minimal total
//! call count. For four operands with only the 2-ary text concat this
//! yields `C2(C2(C2(o0,o1),o2),o3)`; with the 2- and 3-ary forms,
//! `C3(C2(o0,o1),o2,o3)`.

use smallvec::SmallVec;

use sable_ir::{
    CapabilityTable, ChainItem, ConcatArena, LoweredPlan, Operand, OperandKind, OperationId,
    PlanNode,
};

use super::merge::{self, MAX_FIXED_ARITY};
use super::schedule::Scheduler;
use super::Piece;

/// Pick a strategy and build the plan for one piece list.
pub(super) fn select(
    arena: &ConcatArena,
    caps: CapabilityTable,
    mut pieces: Vec<Piece>,
) -> LoweredPlan {
    let n = pieces.len();
    if n == 0 {
        return LoweredPlan::empty();
    }
    if n == 1 {
        let Some(piece) = pieces.pop() else {
            return LoweredPlan::empty();
        };
        return lower_single(arena, caps, piece);
    }
    if n <= MAX_FIXED_ARITY as usize {
        if let Some(op) = span_op(caps, &pieces) {
            tracing::debug!(n, ?op, "span concat path");
            return span_path(op, pieces);
        }
        if fold_cost(n, caps).is_some() {
            tracing::debug!(n, "fixed-arity text fold");
            return fold_path(arena, caps, pieces);
        }
    }
    tracing::debug!(n, "variadic text concat");
    variadic_path(arena, caps, pieces)
}

/// A chain of one operand needs no concatenation call.
fn lower_single(arena: &ConcatArena, caps: CapabilityTable, piece: Piece) -> LoweredPlan {
    let mut sched = Scheduler::new();
    let root = match piece {
        Piece::Leaf(op) => match op.kind {
            OperandKind::Text => PlanNode::Text(sched.eval(&op)),
            OperandKind::Unit => PlanNode::UnitToText(sched.eval(&op)),
        },
        Piece::Const { position, text } => PlanNode::Text(sched.constant(position, text)),
        // A lone unabsorbed sub-chain *is* the result.
        Piece::Nested { parts, .. } => return lower_nested(arena, caps, parts),
    };
    sched.finish(root)
}

/// The n-ary span-concat operation, if the table can serve this piece
/// list: the operation of that arity exists and every operand has its
/// view conversion.
fn span_op(caps: CapabilityTable, pieces: &[Piece]) -> Option<OperationId> {
    let op = OperationId::span_concat(pieces.len())?;
    if !caps.has(op) {
        return None;
    }
    pieces
        .iter()
        .all(|piece| span_viewable(caps, piece))
        .then_some(op)
}

fn span_viewable(caps: CapabilityTable, piece: &Piece) -> bool {
    match piece {
        Piece::Leaf(op) => match op.kind {
            OperandKind::Text => caps.has(OperationId::TextToSpan),
            OperandKind::Unit => caps.has(OperationId::UnitToSingleElementSpan),
        },
        Piece::Const { .. } => caps.has(OperationId::TextToSpan),
        Piece::Nested { .. } => false,
    }
}

/// One n-ary span-concat call over span views of every operand, in source
/// order. Unit operands are snapshotted into address-stable temporaries at
/// their evaluation point.
fn span_path(op: OperationId, pieces: Vec<Piece>) -> LoweredPlan {
    let mut sched = Scheduler::new();
    let mut args = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match piece {
            Piece::Leaf(operand) => match operand.kind {
                OperandKind::Text => args.push(PlanNode::TextSpan(sched.eval(&operand))),
                OperandKind::Unit => {
                    let slot = sched.eval(&operand);
                    let temp = sched.materialize(slot);
                    args.push(PlanNode::UnitSpan(temp));
                }
            },
            Piece::Const { position, text } => {
                args.push(PlanNode::TextSpan(sched.constant(position, text)));
            }
            // `span_viewable` rejects nested operands up front.
            Piece::Nested { .. } => unreachable!("span path never sees nested operands"),
        }
    }
    sched.finish(PlanNode::Call { op, args })
}

/// Degraded path: convert every operand to Text and fold with the
/// available fixed-arity text concats, minimizing call count.
fn fold_path(arena: &ConcatArena, caps: CapabilityTable, pieces: Vec<Piece>) -> LoweredPlan {
    let mut sched = Scheduler::new();
    // All operands are pre-evaluated left-to-right before any call groups
    // them, so the grouping below cannot reorder side effects.
    let mut nodes: SmallVec<[PlanNode; 4]> = pieces
        .into_iter()
        .map(|piece| text_node(arena, caps, &mut sched, piece))
        .collect();

    while nodes.len() > 1 {
        let len = nodes.len();
        let Some(total) = fold_cost(len, caps) else {
            break;
        };
        let step = (2..=len.min(MAX_FIXED_ARITY as usize)).find(|&k| {
            caps.has_text_concat(k)
                && fold_cost(len - k + 1, caps).is_some_and(|rest| rest + 1 == total)
        });
        let Some(k) = step else {
            break;
        };
        let Some(op) = OperationId::text_concat(k) else {
            break;
        };
        let merged = PlanNode::Call {
            op,
            args: nodes.drain(..k).collect(),
        };
        nodes.insert(0, merged);
    }

    let root = nodes.pop().unwrap_or(PlanNode::EmptyText);
    sched.finish(root)
}

/// Ultimate fallback: one call to the variadic text concatenation with the
/// full ordered operand list. Requires only the baseline operations.
fn variadic_path(arena: &ConcatArena, caps: CapabilityTable, pieces: Vec<Piece>) -> LoweredPlan {
    let mut sched = Scheduler::new();
    let args: Vec<PlanNode> = pieces
        .into_iter()
        .map(|piece| text_node(arena, caps, &mut sched, piece))
        .collect();
    sched.finish(PlanNode::Call {
        op: OperationId::VariadicTextConcat,
        args,
    })
}

/// Schedule one piece's evaluation and produce its Text-valued node.
fn text_node(
    arena: &ConcatArena,
    caps: CapabilityTable,
    sched: &mut Scheduler,
    piece: Piece,
) -> PlanNode {
    match piece {
        Piece::Leaf(op) => match op.kind {
            OperandKind::Text => PlanNode::Text(sched.eval(&op)),
            OperandKind::Unit => PlanNode::UnitToText(sched.eval(&op)),
        },
        Piece::Const { position, text } => PlanNode::Text(sched.constant(position, text)),
        Piece::Nested { position, parts } => {
            let plan = lower_nested(arena, caps, parts);
            PlanNode::Text(sched.nested(position, plan))
        }
    }
}

/// Lower an unabsorbed sub-chain as its own plan.
///
/// The sub-chain's operands are a plain flat list (nested items never nest
/// further after flattening), so this re-enters strategy selection with a
/// leaf-only piece list.
fn lower_nested(arena: &ConcatArena, caps: CapabilityTable, parts: Vec<Operand>) -> LoweredPlan {
    let items = parts.into_iter().map(ChainItem::Leaf).collect();
    let pieces = merge::premerge_literals(arena, items);
    select(arena, caps, pieces)
}

/// Minimal number of fixed-arity text-concat calls needed to fold `len`
/// operands with the available arities, or `None` if they cannot fold it
/// (e.g. two operands with only the 3-ary form present).
///
/// Folding k operands into one call leaves `len - k + 1` operands, so the
/// cost table builds up from a single operand costing nothing.
fn fold_cost(len: usize, caps: CapabilityTable) -> Option<u32> {
    if len == 0 {
        return None;
    }
    let mut cost: Vec<Option<u32>> = vec![None; len + 1];
    cost[1] = Some(0);
    for m in 2..=len {
        let mut best: Option<u32> = None;
        for k in 2..=m.min(MAX_FIXED_ARITY as usize) {
            if !caps.has_text_concat(k) {
                continue;
            }
            if let Some(rest) = cost[m - k + 1] {
                let candidate = rest + 1;
                best = Some(best.map_or(candidate, |b| b.min(candidate)));
            }
        }
        cost[m] = best;
    }
    cost[len]
}
