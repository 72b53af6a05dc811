//! Chain flattening — nested binary concat tree to a flat operand list.
//!
//! The dominant source shape is a single long left-associated chain
//! (thousands of `+` operations folded left-to-right). Naive recursive
//! descent overflows the native stack on such chains, so the walk runs
//! over an explicit work stack: a concat node pushes its children
//! right-then-left, and leaves pop off in source order. Span-concat
//! argument subtrees are shallow in practice and may recurse, guarded by
//! [`ensure_sufficient_stack`] against pathological nesting.
//!
//! Flattening a well-formed tree cannot fail; it is a total function over
//! the input shape.

use sable_ir::{Chain, ChainItem, ConcatArena, ConcatExpr, ExprId, Operand};
use sable_stack::ensure_sufficient_stack;

/// Flatten the concatenation tree rooted at `root` into an ordered chain.
///
/// Operand positions number every leaf left-to-right, including leaves
/// inside explicit span-concat sub-chains, so the chain exactly reproduces
/// the source's written operand order. An invalid root yields the empty
/// chain.
pub fn flatten(arena: &ConcatArena, root: ExprId) -> Chain {
    if !root.is_valid() {
        return Chain::empty();
    }
    let mut flattener = Flattener {
        arena,
        items: Vec::new(),
        next_position: 0,
    };
    flattener.run(root);
    Chain {
        items: flattener.items,
        leaf_count: flattener.next_position,
    }
}

/// Working state for one flattening walk.
struct Flattener<'a> {
    arena: &'a ConcatArena,
    items: Vec<ChainItem>,
    next_position: u32,
}

impl Flattener<'_> {
    /// Iterative in-order walk over concat nodes.
    fn run(&mut self, root: ExprId) {
        // Explicit work stack replaces native recursion for the spine:
        // children are pushed right-then-left so leaves pop in source order.
        let mut work = vec![root];
        while let Some(id) = work.pop() {
            match *self.arena.kind(id) {
                ConcatExpr::Concat { left, right } => {
                    work.push(right);
                    work.push(left);
                }
                ConcatExpr::Leaf {
                    kind,
                    source,
                    literal,
                } => {
                    let position = self.take_position();
                    self.items.push(ChainItem::Leaf(Operand {
                        kind,
                        source,
                        position,
                        literal,
                    }));
                }
                ConcatExpr::SpanConcat { args } => {
                    let args: Vec<ExprId> = self.arena.get_expr_list(args).to_vec();
                    let mut parts = Vec::with_capacity(args.len());
                    for arg in args {
                        self.collect_parts(arg, &mut parts);
                    }
                    self.items.push(ChainItem::Nested { parts });
                }
            }
        }
    }

    /// Collect the in-order leaves of one span-concat argument.
    ///
    /// An argument that is itself a concat (or another explicit span call)
    /// contributes all of its leaves, in order, to the sub-chain's parts.
    fn collect_parts(&mut self, id: ExprId, parts: &mut Vec<Operand>) {
        ensure_sufficient_stack(|| match *self.arena.kind(id) {
            ConcatExpr::Concat { left, right } => {
                self.collect_parts(left, parts);
                self.collect_parts(right, parts);
            }
            ConcatExpr::Leaf {
                kind,
                source,
                literal,
            } => {
                let position = self.take_position();
                parts.push(Operand {
                    kind,
                    source,
                    position,
                    literal,
                });
            }
            ConcatExpr::SpanConcat { args } => {
                // Copy IDs out to avoid holding a borrow on the list
                // storage across the recursive calls.
                let args: Vec<ExprId> = self.arena.get_expr_list(args).to_vec();
                for arg in args {
                    self.collect_parts(arg, parts);
                }
            }
        });
    }

    fn take_position(&mut self) -> u32 {
        let position = self.next_position;
        self.next_position += 1;
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{chain_positions, src};
    use pretty_assertions::assert_eq;
    use sable_ir::OperandKind;

    #[test]
    fn flatten_invalid_root_is_empty() {
        let arena = ConcatArena::new();
        let chain = flatten(&arena, ExprId::INVALID);
        assert_eq!(chain, Chain::empty());
    }

    #[test]
    fn flatten_single_leaf() {
        let mut arena = ConcatArena::new();
        let root = arena.text_leaf(src(0));
        let chain = flatten(&arena, root);
        assert_eq!(chain.leaf_count, 1);
        assert_eq!(chain_positions(&chain), vec![0]);
    }

    #[test]
    fn flatten_left_spine_in_source_order() {
        // ((t0 + u1) + t2)
        let mut arena = ConcatArena::new();
        let t0 = arena.text_leaf(src(0));
        let u1 = arena.unit_leaf(src(1));
        let t2 = arena.text_leaf(src(2));
        let inner = arena.concat(t0, u1);
        let root = arena.concat(inner, t2);

        let chain = flatten(&arena, root);
        assert_eq!(chain.leaf_count, 3);
        assert_eq!(chain_positions(&chain), vec![0, 1, 2]);
        let ChainItem::Leaf(op) = &chain.items[1] else {
            panic!("expected leaf");
        };
        assert_eq!(op.kind, OperandKind::Unit);
    }

    #[test]
    fn flatten_right_nested_in_source_order() {
        // (t0 + (t1 + t2)) — rare shape, same flat result.
        let mut arena = ConcatArena::new();
        let t0 = arena.text_leaf(src(0));
        let t1 = arena.text_leaf(src(1));
        let t2 = arena.text_leaf(src(2));
        let inner = arena.concat(t1, t2);
        let root = arena.concat(t0, inner);

        let chain = flatten(&arena, root);
        assert_eq!(chain_positions(&chain), vec![0, 1, 2]);
    }

    #[test]
    fn flatten_span_concat_operand_keeps_global_positions() {
        // t0 + SpanConcat(t1, t2) + t3
        let mut arena = ConcatArena::new();
        let t0 = arena.text_leaf(src(0));
        let s1 = arena.text_leaf(src(1));
        let s2 = arena.text_leaf(src(2));
        let nested = arena.span_concat(&[s1, s2]);
        let t3 = arena.text_leaf(src(3));
        let root = arena.left_spine(&[t0, nested, t3]);

        let chain = flatten(&arena, root);
        assert_eq!(chain.leaf_count, 4);
        assert_eq!(chain.items.len(), 3);
        let ChainItem::Nested { parts } = &chain.items[1] else {
            panic!("expected nested item");
        };
        assert_eq!(
            parts.iter().map(|op| op.position).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(chain.items[2].position(), 3);
    }

    #[test]
    fn flatten_span_concat_with_concat_argument() {
        // SpanConcat(t0, t1 + t2) — the concat argument contributes both
        // of its leaves to the sub-chain.
        let mut arena = ConcatArena::new();
        let t0 = arena.text_leaf(src(0));
        let t1 = arena.text_leaf(src(1));
        let t2 = arena.text_leaf(src(2));
        let arg = arena.concat(t1, t2);
        let root = arena.span_concat(&[t0, arg]);

        let chain = flatten(&arena, root);
        assert_eq!(chain.items.len(), 1);
        let ChainItem::Nested { parts } = &chain.items[0] else {
            panic!("expected nested item");
        };
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn flatten_ten_thousand_operand_left_chain() {
        // The stress shape: a left-associated chain of 10 000 operands.
        // Must flatten in bounded native stack depth.
        const N: u32 = 10_000;
        let mut arena = ConcatArena::with_capacity(N as usize);
        let mut root = arena.text_leaf(src(0));
        for i in 1..N {
            let leaf = arena.text_leaf(src(i));
            root = arena.concat(root, leaf);
        }

        let chain = flatten(&arena, root);
        assert_eq!(chain.leaf_count, N);
        assert_eq!(
            chain_positions(&chain),
            (0..N).collect::<Vec<_>>()
        );
    }
}
