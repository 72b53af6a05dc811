//! Evaluation scheduling — operand steps in source order.
//!
//! The scheduler owns the plan's step list and its slot/temporary index
//! spaces. Strategy code calls it strictly left-to-right, so slot order
//! equals position order by construction: every operand is evaluated
//! exactly once before any call groups the results, independent of the
//! call tree's nesting shape.

use sable_ir::{EvalStep, LoweredPlan, Operand, PlanNode, SlotId, TempId};

/// Step-list builder for one plan.
pub(super) struct Scheduler {
    steps: Vec<EvalStep>,
    slots: u32,
    temps: u32,
}

impl Scheduler {
    pub(super) fn new() -> Self {
        Self {
            steps: Vec::new(),
            slots: 0,
            temps: 0,
        }
    }

    /// Record the evaluation of an ordinary operand.
    pub(super) fn eval(&mut self, op: &Operand) -> SlotId {
        let slot = self.alloc_slot();
        self.steps.push(EvalStep::Eval {
            position: op.position,
            kind: op.kind,
            source: op.source,
            slot,
        });
        slot
    }

    /// Record the load of a pre-merged constant.
    pub(super) fn constant(&mut self, position: u32, text: String) -> SlotId {
        let slot = self.alloc_slot();
        self.steps.push(EvalStep::Const {
            position,
            text: text.into_boxed_str(),
            slot,
        });
        slot
    }

    /// Record the execution of an unabsorbed sub-chain's plan.
    pub(super) fn nested(&mut self, position: u32, plan: LoweredPlan) -> SlotId {
        let slot = self.alloc_slot();
        self.steps.push(EvalStep::Nested {
            position,
            plan: Box::new(plan),
            slot,
        });
        slot
    }

    /// Record the snapshot of a Unit slot into a fresh address-stable
    /// temporary, immediately after its evaluation. Mandatory for every
    /// Unit operand bound for a span view, even when its source is a
    /// simple local: a later operand in the same chain may mutate the
    /// storage the value was read from.
    pub(super) fn materialize(&mut self, slot: SlotId) -> TempId {
        let temp = TempId::new(self.temps);
        self.temps += 1;
        self.steps.push(EvalStep::Materialize { slot, temp });
        temp
    }

    /// Finish the plan with its call tree.
    pub(super) fn finish(self, root: PlanNode) -> LoweredPlan {
        LoweredPlan {
            steps: self.steps,
            root,
            slot_count: self.slots,
            temp_count: self.temps,
        }
    }

    fn alloc_slot(&mut self) -> SlotId {
        let slot = SlotId::new(self.slots);
        self.slots += 1;
        slot
    }
}
