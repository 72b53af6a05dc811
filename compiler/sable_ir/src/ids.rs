//! ID and range newtypes for the concat IR.
//!
//! These types provide type-safe indices into [`ConcatArena`](crate::ConcatArena)
//! storage and into [`LoweredPlan`](crate::LoweredPlan) slot/temporary spaces,
//! preventing accidental cross-use between the different index spaces.

use std::fmt;

/// Index into a [`ConcatArena`](crate::ConcatArena) node table.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    /// Sentinel value indicating "no expression". Lowering an invalid root
    /// yields the empty plan rather than panicking.
    pub const INVALID: ExprId = ExprId(u32::MAX);

    /// Create a new `ExprId` from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns `true` if this is a valid (non-sentinel) ID.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "ExprId::INVALID")
        } else {
            write!(f, "ExprId({})", self.0)
        }
    }
}

impl Default for ExprId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// A contiguous range of expression IDs in a [`ConcatArena`](crate::ConcatArena).
///
/// Used for the argument lists of explicit span-concat calls. Indexes into
/// the arena's `expr_lists` storage. Layout: `start: u32, len: u16` = 8 bytes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct ExprRange {
    pub start: u32,
    pub len: u16,
}

impl ExprRange {
    /// Empty range constant.
    pub const EMPTY: Self = Self { start: 0, len: 0 };

    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        Self { start, len }
    }

    /// Returns `true` if the range contains no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements in the range.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

impl fmt::Debug for ExprRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExprRange({}..{})",
            self.start,
            self.start + u32::from(self.len)
        )
    }
}

/// Opaque handle to the original sub-expression an operand was read from.
///
/// Owned by the embedding compiler; the lowering engine never inspects it,
/// it only threads the handle through to the [`EvalStep`](crate::EvalStep)
/// that the emitter realizes.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct SourceId(u32);

impl SourceId {
    /// Create a new `SourceId` from a raw caller-chosen value.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw caller-chosen value back.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}

/// Index into a [`ConcatArena`](crate::ConcatArena)'s literal pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct LitId(u32);

impl LitId {
    /// Create a new `LitId` from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index into the literal pool.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for LitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LitId({})", self.0)
    }
}

/// Index of an evaluated-operand slot within one [`LoweredPlan`](crate::LoweredPlan).
///
/// Slots are numbered in evaluation order, which by construction equals the
/// operands' original left-to-right position order.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct SlotId(u32);

impl SlotId {
    /// Create a new `SlotId` from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw slot index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotId({})", self.0)
    }
}

/// Index of an address-stable temporary within one [`LoweredPlan`](crate::LoweredPlan).
///
/// Each temporary is written by exactly one materialization step and read by
/// exactly one span view; it is never reused across operands.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct TempId(u32);

impl TempId {
    /// Create a new `TempId` from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw temporary index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TempId({})", self.0)
    }
}
