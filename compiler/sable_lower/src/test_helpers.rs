//! Shared test utilities — chain shorthands and a plan interpreter.
//!
//! The interpreter executes a `LoweredPlan` against scripted operand
//! sources, logging each evaluation's position, so tests can observe both
//! the final text a plan produces and the side-effect order it would
//! exhibit at runtime. Mutable cells model storage that one operand reads
//! and a later operand overwrites, the aliasing shape the materialization
//! rules exist for. Only compiled in test builds.

use rustc_hash::FxHashMap;
use sable_ir::{
    Chain, ChainItem, EvalStep, LoweredPlan, OperandKind, PlanNode, SourceId, TempId,
};

/// Shorthand for `SourceId::new(n)`.
pub(crate) fn src(n: u32) -> SourceId {
    SourceId::new(n)
}

/// All leaf positions of a chain, nested parts included, in item order.
pub(crate) fn chain_positions(chain: &Chain) -> Vec<u32> {
    chain
        .items
        .iter()
        .flat_map(|item| match item {
            ChainItem::Leaf(op) => vec![op.position],
            ChainItem::Nested { parts } => parts.iter().map(|op| op.position).collect(),
        })
        .collect()
}

/// What evaluating one scripted source does.
enum Script {
    /// Yield a fixed text value.
    Text(String),
    /// Yield a fixed unit value.
    Unit(char),
    /// Read the current value of a mutable cell (unit).
    ReadCell(u32),
    /// Write `put` into a cell, then yield it (unit). Models a call with a
    /// side effect on storage an earlier operand read.
    WriteCell { cell: u32, put: char },
}

#[derive(Clone)]
enum Value {
    Text(String),
    Unit(char),
}

impl Value {
    fn as_text(&self) -> String {
        match self {
            Value::Text(text) => text.clone(),
            Value::Unit(_) => panic!("text use of a unit slot"),
        }
    }
}

/// Scripted world of operand sources for executing plans.
#[derive(Default)]
pub(crate) struct World {
    scripts: FxHashMap<u32, Script>,
    cells: FxHashMap<u32, char>,
    /// Positions in the order they were evaluated.
    pub(crate) log: Vec<u32>,
}

impl World {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn text(&mut self, source: u32, value: impl Into<String>) {
        self.scripts.insert(source, Script::Text(value.into()));
    }

    pub(crate) fn unit(&mut self, source: u32, value: char) {
        self.scripts.insert(source, Script::Unit(value));
    }

    pub(crate) fn cell(&mut self, cell: u32, value: char) {
        self.cells.insert(cell, value);
    }

    pub(crate) fn read_cell(&mut self, source: u32, cell: u32) {
        self.scripts.insert(source, Script::ReadCell(cell));
    }

    pub(crate) fn write_cell(&mut self, source: u32, cell: u32, put: char) {
        self.scripts.insert(source, Script::WriteCell { cell, put });
    }

    /// Execute a plan's steps in order, then its call tree, returning the
    /// final text.
    pub(crate) fn run(&mut self, plan: &LoweredPlan) -> String {
        let mut slots: Vec<Option<Value>> = vec![None; plan.slot_count as usize];
        let mut temps: Vec<Option<char>> = vec![None; plan.temp_count as usize];

        for step in &plan.steps {
            match step {
                EvalStep::Eval {
                    position,
                    kind,
                    source,
                    slot,
                } => {
                    let value = self.eval_source(*source, *position, *kind);
                    slots[slot.index()] = Some(value);
                }
                EvalStep::Const { text, slot, .. } => {
                    slots[slot.index()] = Some(Value::Text(text.to_string()));
                }
                EvalStep::Nested { plan, slot, .. } => {
                    let text = self.run(plan);
                    slots[slot.index()] = Some(Value::Text(text));
                }
                EvalStep::Materialize { slot, temp } => {
                    let Some(Value::Unit(unit)) = &slots[slot.index()] else {
                        panic!("materialization of a non-unit slot {slot:?}");
                    };
                    temps[temp.index()] = Some(*unit);
                }
            }
        }

        node_text(&plan.root, &slots, &temps)
    }

    fn eval_source(&mut self, source: SourceId, position: u32, kind: OperandKind) -> Value {
        self.log.push(position);
        let Some(script) = self.scripts.get(&source.raw()) else {
            panic!("no script for {source:?}");
        };
        let value = match script {
            Script::Text(text) => Value::Text(text.clone()),
            Script::Unit(unit) => Value::Unit(*unit),
            Script::ReadCell(cell) => Value::Unit(self.cells[cell]),
            Script::WriteCell { cell, put } => {
                let put = *put;
                self.cells.insert(*cell, put);
                Value::Unit(put)
            }
        };
        match (&value, kind) {
            (Value::Text(_), OperandKind::Text) | (Value::Unit(_), OperandKind::Unit) => value,
            _ => panic!("script for {source:?} does not match operand kind {kind:?}"),
        }
    }
}

fn node_text(node: &PlanNode, slots: &[Option<Value>], temps: &[Option<char>]) -> String {
    match node {
        PlanNode::Call { args, .. } => args
            .iter()
            .map(|arg| node_text(arg, slots, temps))
            .collect(),
        PlanNode::Text(slot) | PlanNode::TextSpan(slot) => match &slots[slot.index()] {
            Some(value) => value.as_text(),
            None => panic!("use of unfilled slot {slot:?}"),
        },
        PlanNode::UnitToText(slot) => match &slots[slot.index()] {
            Some(Value::Unit(unit)) => unit.to_string(),
            _ => panic!("unit conversion of a non-unit slot {slot:?}"),
        },
        PlanNode::UnitSpan(temp) => read_temp(temps, *temp).to_string(),
        PlanNode::EmptyText => String::new(),
    }
}

fn read_temp(temps: &[Option<char>], temp: TempId) -> char {
    match temps[temp.index()] {
        Some(unit) => unit,
        None => panic!("span view over unmaterialized temporary {temp:?}"),
    }
}
