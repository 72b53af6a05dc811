//! Shared IR for the Sable concatenation-lowering pass.
//!
//! Three data families, all created fresh per lowering invocation and
//! discarded once the plan reaches the emitter (no process-wide state):
//!
//! - **Input**: [`ConcatArena`] — the binary concatenation tree fragment
//!   (`Concat` / `Leaf` / explicit `SpanConcat` nodes), built by the parser
//!   side of the compiler and consumed read-only here.
//! - **Configuration**: [`CapabilityTable`] — which fixed-arity and
//!   variadic concatenation primitives the target runtime exposes, one
//!   read-only snapshot per invocation.
//! - **Output**: [`LoweredPlan`] — an ordered operand evaluation schedule
//!   plus a call tree over the evaluated slots, ready for code emission.

mod ast;
mod capability;
mod ids;
mod operand;
mod plan;

pub use ast::{ConcatArena, ConcatExpr, OperandKind};
pub use capability::{CapabilityTable, OperationId};
pub use ids::{ExprId, ExprRange, LitId, SlotId, SourceId, TempId};
pub use operand::{Chain, ChainItem, Operand};
pub use plan::{EvalStep, LoweredPlan, PlanNode};
