//! Target-runtime capability table.
//!
//! The set of concatenation primitives a target runtime exposes is closed
//! and finite, so capabilities are a bitset over [`OperationId`] checked
//! with plain branches — no dynamic member lookup, no virtual dispatch.
//! The table is supplied once per lowering invocation and never mutated
//! during lowering.

use bitflags::bitflags;

/// One runtime operation the lowering engine may emit a call to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OperationId {
    /// 2-ary span-based concatenation.
    SpanConcat2,
    /// 3-ary span-based concatenation.
    SpanConcat3,
    /// 4-ary span-based concatenation.
    SpanConcat4,
    /// 2-ary text-based concatenation.
    TextConcat2,
    /// 3-ary text-based concatenation.
    TextConcat3,
    /// 4-ary text-based concatenation.
    TextConcat4,
    /// Concatenation of an arbitrary-length ordered collection of Text
    /// values. Baseline: assumed present on every supported runtime.
    VariadicTextConcat,
    /// Unit → Text conversion. Baseline: assumed present; its absence is a
    /// configuration error the embedding compiler diagnoses before lowering.
    UnitToText,
    /// Wrap a Unit value into a length-1 span over a stable address.
    UnitToSingleElementSpan,
    /// View a Text value as a span without copying.
    TextToSpan,
}

impl OperationId {
    /// The span-concat operation of the given arity, if one is defined.
    ///
    /// Arity 4 is structural: it is the largest fixed arity for which a
    /// dedicated span operation exists on any supported runtime.
    pub fn span_concat(arity: usize) -> Option<Self> {
        match arity {
            2 => Some(Self::SpanConcat2),
            3 => Some(Self::SpanConcat3),
            4 => Some(Self::SpanConcat4),
            _ => None,
        }
    }

    /// The text-concat operation of the given arity, if one is defined.
    pub fn text_concat(arity: usize) -> Option<Self> {
        match arity {
            2 => Some(Self::TextConcat2),
            3 => Some(Self::TextConcat3),
            4 => Some(Self::TextConcat4),
            _ => None,
        }
    }

    /// Number of arguments the operation's call takes, if fixed.
    pub fn fixed_arity(self) -> Option<usize> {
        match self {
            Self::SpanConcat2 | Self::TextConcat2 => Some(2),
            Self::SpanConcat3 | Self::TextConcat3 => Some(3),
            Self::SpanConcat4 | Self::TextConcat4 => Some(4),
            Self::UnitToText | Self::UnitToSingleElementSpan | Self::TextToSpan => Some(1),
            Self::VariadicTextConcat => None,
        }
    }

    /// The capability bit guarding this operation.
    const fn bit(self) -> CapabilityTable {
        match self {
            Self::SpanConcat2 => CapabilityTable::SPAN_CONCAT_2,
            Self::SpanConcat3 => CapabilityTable::SPAN_CONCAT_3,
            Self::SpanConcat4 => CapabilityTable::SPAN_CONCAT_4,
            Self::TextConcat2 => CapabilityTable::TEXT_CONCAT_2,
            Self::TextConcat3 => CapabilityTable::TEXT_CONCAT_3,
            Self::TextConcat4 => CapabilityTable::TEXT_CONCAT_4,
            Self::VariadicTextConcat => CapabilityTable::VARIADIC_TEXT_CONCAT,
            Self::UnitToText => CapabilityTable::UNIT_TO_TEXT,
            Self::UnitToSingleElementSpan => CapabilityTable::UNIT_TO_SINGLE_ELEMENT_SPAN,
            Self::TextToSpan => CapabilityTable::TEXT_TO_SPAN,
        }
    }
}

bitflags! {
    /// Which concatenation primitives the target runtime exposes.
    ///
    /// One bit per [`OperationId`]. Any subset of bits may be absent; the
    /// strategy selector has a defined fallback for every gap except the
    /// baseline pair (`UNIT_TO_TEXT`, `VARIADIC_TEXT_CONCAT`), whose
    /// absence is a caller-side configuration error.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct CapabilityTable: u32 {
        /// `OperationId::SpanConcat2` is available.
        const SPAN_CONCAT_2 = 1 << 0;
        /// `OperationId::SpanConcat3` is available.
        const SPAN_CONCAT_3 = 1 << 1;
        /// `OperationId::SpanConcat4` is available.
        const SPAN_CONCAT_4 = 1 << 2;
        /// `OperationId::TextConcat2` is available.
        const TEXT_CONCAT_2 = 1 << 3;
        /// `OperationId::TextConcat3` is available.
        const TEXT_CONCAT_3 = 1 << 4;
        /// `OperationId::TextConcat4` is available.
        const TEXT_CONCAT_4 = 1 << 5;
        /// `OperationId::VariadicTextConcat` is available.
        const VARIADIC_TEXT_CONCAT = 1 << 6;
        /// `OperationId::UnitToText` is available.
        const UNIT_TO_TEXT = 1 << 7;
        /// `OperationId::UnitToSingleElementSpan` is available.
        const UNIT_TO_SINGLE_ELEMENT_SPAN = 1 << 8;
        /// `OperationId::TextToSpan` is available.
        const TEXT_TO_SPAN = 1 << 9;
    }
}

impl CapabilityTable {
    /// A table with every primitive present.
    pub const fn full() -> Self {
        Self::all()
    }

    /// Whether an operation is available on this target.
    #[inline]
    pub fn has(self, op: OperationId) -> bool {
        self.contains(op.bit())
    }

    /// Whether the fixed-arity span concatenation of the given arity exists.
    pub fn has_span_concat(self, arity: usize) -> bool {
        OperationId::span_concat(arity).is_some_and(|op| self.has(op))
    }

    /// Whether the fixed-arity text concatenation of the given arity exists.
    pub fn has_text_concat(self, arity: usize) -> bool {
        OperationId::text_concat(arity).is_some_and(|op| self.has(op))
    }

    /// This table with one operation removed. Test convenience for
    /// exercising individual fallback paths.
    #[must_use]
    pub fn without(self, op: OperationId) -> Self {
        self.difference(op.bit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_table_has_every_operation() {
        let caps = CapabilityTable::full();
        for arity in 2..=4 {
            assert!(caps.has_span_concat(arity));
            assert!(caps.has_text_concat(arity));
        }
        assert!(caps.has(OperationId::VariadicTextConcat));
        assert!(caps.has(OperationId::UnitToText));
        assert!(caps.has(OperationId::UnitToSingleElementSpan));
        assert!(caps.has(OperationId::TextToSpan));
    }

    #[test]
    fn without_removes_exactly_one_bit() {
        let caps = CapabilityTable::full().without(OperationId::SpanConcat3);
        assert!(!caps.has_span_concat(3));
        assert!(caps.has_span_concat(2));
        assert!(caps.has_span_concat(4));
    }

    #[test]
    fn no_fixed_arity_span_concat_beyond_four() {
        assert_eq!(OperationId::span_concat(5), None);
        assert_eq!(OperationId::text_concat(1), None);
    }
}
