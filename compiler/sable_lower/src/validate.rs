//! Debug-mode validation of lowered-plan invariants.
//!
//! Walks a plan and asserts that:
//! - evaluated positions are strictly increasing across the step list
//! - slots are allocated densely, in step order, and filled before use
//! - every temporary has exactly one materialization (from an
//!   already-filled slot) and exactly one span-view consumer
//! - every fixed-arity call has the right argument count and its
//!   operation is present in the capability table the plan was built
//!   against (the baseline pair — Unit→Text and the variadic text
//!   concat — is exempt: its availability is a caller precondition)
//! - nested sub-plans satisfy the same invariants
//!
//! Run after lowering in debug builds and directly from tests. Catches
//! bugs in the lowering pass before the emitter consumes a bad plan.

use rustc_hash::{FxHashMap, FxHashSet};
use sable_ir::{CapabilityTable, EvalStep, LoweredPlan, OperationId, PlanNode, SlotId, TempId};

/// Validate that a plan satisfies every lowered-plan invariant.
///
/// Panics with a descriptive message on the first violation.
pub fn validate(plan: &LoweredPlan, caps: CapabilityTable) {
    let mut filled: FxHashSet<SlotId> = FxHashSet::default();
    let mut materialized: FxHashSet<TempId> = FxHashSet::default();
    let mut last_position: Option<u32> = None;

    for step in &plan.steps {
        if let Some(position) = step.position() {
            assert!(
                last_position.map_or(true, |last| last < position),
                "step positions must strictly increase: {last_position:?} then {position}"
            );
            last_position = Some(position);
        }
        match step {
            EvalStep::Eval { slot, .. } | EvalStep::Const { slot, .. } => {
                record_slot(&mut filled, *slot);
            }
            EvalStep::Nested { plan, slot, .. } => {
                record_slot(&mut filled, *slot);
                validate(plan, caps);
            }
            EvalStep::Materialize { slot, temp } => {
                assert!(
                    filled.contains(slot),
                    "materialization of unfilled slot {slot:?}"
                );
                assert!(
                    materialized.insert(*temp),
                    "temporary {temp:?} materialized twice"
                );
            }
        }
    }

    assert_eq!(
        filled.len(),
        plan.slot_count as usize,
        "slot_count disagrees with the step list"
    );
    assert_eq!(
        materialized.len(),
        plan.temp_count as usize,
        "temp_count disagrees with the step list"
    );

    let mut temp_uses: FxHashMap<TempId, u32> = FxHashMap::default();
    check_node(&plan.root, caps, &filled, &materialized, &mut temp_uses);

    // Each temporary backs exactly one span view; it is never shared
    // across operands or re-read after its consuming call.
    for temp in &materialized {
        assert_eq!(
            temp_uses.get(temp),
            Some(&1),
            "temporary {temp:?} must have exactly one span-view consumer"
        );
    }
}

fn record_slot(filled: &mut FxHashSet<SlotId>, slot: SlotId) {
    assert_eq!(
        slot.index(),
        filled.len(),
        "slots must be allocated densely in step order"
    );
    filled.insert(slot);
}

fn check_node(
    node: &PlanNode,
    caps: CapabilityTable,
    filled: &FxHashSet<SlotId>,
    materialized: &FxHashSet<TempId>,
    temp_uses: &mut FxHashMap<TempId, u32>,
) {
    match node {
        PlanNode::Call { op, args } => {
            let baseline = matches!(
                op,
                OperationId::VariadicTextConcat | OperationId::UnitToText
            );
            assert!(
                baseline || caps.has(*op),
                "call to {op:?} absent from the capability table"
            );
            if let Some(arity) = op.fixed_arity() {
                assert_eq!(args.len(), arity, "wrong argument count for {op:?}");
            }
            for arg in args {
                check_node(arg, caps, filled, materialized, temp_uses);
            }
        }
        PlanNode::Text(slot) | PlanNode::UnitToText(slot) => {
            assert!(filled.contains(slot), "use of unfilled slot {slot:?}");
        }
        PlanNode::TextSpan(slot) => {
            assert!(filled.contains(slot), "use of unfilled slot {slot:?}");
            assert!(
                caps.has(OperationId::TextToSpan),
                "span view over text without the text-to-span conversion"
            );
        }
        PlanNode::UnitSpan(temp) => {
            assert!(
                materialized.contains(temp),
                "span view over unmaterialized temporary {temp:?}"
            );
            assert!(
                caps.has(OperationId::UnitToSingleElementSpan),
                "unit span view without the span-of-one constructor"
            );
            *temp_uses.entry(*temp).or_insert(0) += 1;
        }
        PlanNode::EmptyText => {}
    }
}
