//! Lowered call plan — the output handed to the code emitter.
//!
//! A plan separates *when* operands are evaluated from *how* their values
//! are grouped into calls. `steps` lists every operand evaluation (and
//! temporary materialization) in strictly increasing position order; the
//! call tree in `root` only references already-filled slots and
//! temporaries. The emitter realizes the steps in order, then the root.
//! This shape is what makes the central invariant structural: evaluation
//! order equals source order regardless of call-tree nesting.

use crate::ids::{SlotId, SourceId, TempId};
use crate::{OperandKind, OperationId};

/// One pre-call step the emitter must realize, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalStep {
    /// Evaluate the operand's original sub-expression exactly once and
    /// store its value in `slot`.
    Eval {
        position: u32,
        kind: OperandKind,
        source: SourceId,
        slot: SlotId,
    },
    /// Load a compile-time-merged literal into `slot`. No side effects;
    /// `position` is the first merged operand's position.
    Const {
        position: u32,
        text: Box<str>,
        slot: SlotId,
    },
    /// Run an unabsorbed sub-chain's whole plan at this point in the order;
    /// its text result lands in `slot`.
    Nested {
        position: u32,
        plan: Box<LoweredPlan>,
        slot: SlotId,
    },
    /// Copy the Unit value in `slot` into the fresh, address-stable
    /// temporary `temp`, snapshotting it at its evaluation point. The
    /// temporary lives for the duration of the call consuming it and is
    /// never shared across operands.
    Materialize { slot: SlotId, temp: TempId },
}

impl EvalStep {
    /// The slot this step writes.
    pub fn slot(&self) -> Option<SlotId> {
        match self {
            EvalStep::Eval { slot, .. }
            | EvalStep::Const { slot, .. }
            | EvalStep::Nested { slot, .. } => Some(*slot),
            EvalStep::Materialize { .. } => None,
        }
    }

    /// The operand position this step evaluates, if it evaluates one.
    pub fn position(&self) -> Option<u32> {
        match self {
            EvalStep::Eval { position, .. }
            | EvalStep::Const { position, .. }
            | EvalStep::Nested { position, .. } => Some(*position),
            EvalStep::Materialize { .. } => None,
        }
    }
}

/// One node of the call tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanNode {
    /// Call a runtime concatenation operation with the given arguments,
    /// in order. (Arguments are views over pre-evaluated slots, so the
    /// tree shape carries no evaluation-order significance.)
    Call {
        op: OperationId,
        args: Vec<PlanNode>,
    },
    /// An evaluated Text value used directly.
    Text(SlotId),
    /// A non-copying span view over an evaluated Text value.
    TextSpan(SlotId),
    /// A length-1 span over the stable temporary holding a materialized
    /// Unit value.
    UnitSpan(TempId),
    /// An evaluated Unit value converted to Text.
    UnitToText(SlotId),
    /// The empty-text constant (an empty chain lowers to this, no call).
    EmptyText,
}

/// Output of one chain-lowering invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoweredPlan {
    /// Operand evaluations and materializations, in execution order.
    pub steps: Vec<EvalStep>,
    /// The call tree consuming the evaluated slots.
    pub root: PlanNode,
    /// Number of slots the steps fill.
    pub slot_count: u32,
    /// Number of temporaries the steps materialize.
    pub temp_count: u32,
}

impl Default for PlanNode {
    fn default() -> Self {
        PlanNode::EmptyText
    }
}

impl LoweredPlan {
    /// The plan for an empty chain: no steps, empty-text result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Positions of evaluated operands, in step order.
    ///
    /// For a well-formed plan this sequence is strictly increasing and
    /// equals the chain's position sequence.
    pub fn evaluation_order(&self) -> Vec<u32> {
        self.steps.iter().filter_map(EvalStep::position).collect()
    }
}
