// SPDX-License-Identifier: Apache-2.0

//! Canonicalizing store for two-input AND gates.
//!
//! Every AND gate ever requested for one circuit lives in a single
//! [`AndTable`], keyed by its canonical operand pair, so structurally equal
//! requests always resolve to the same variable. The backing structure is an
//! insert-only red-black tree held in an arena; tree edges are arena indices
//! and every node keeps a back-reference to its parent so the insertion
//! fixup can walk upward.

use std::cmp::Ordering;

use crate::lit::Lit;

/// Canonical operand pair of a gate.
///
/// The operand with the smaller absolute value goes left; ties keep the call
/// order. The derived ordering compares the signed values lexicographically,
/// which is intentionally a different ordering than the one that built the
/// pair. Both are part of the dedup contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Key {
    op_left: Lit,
    op_right: Lit,
}

impl Key {
    fn new(op1: Lit, op2: Lit) -> Key {
        if op1.var() <= op2.var() {
            Key { op_left: op1, op_right: op2 }
        } else {
            Key { op_left: op2, op_right: op1 }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Black,
    Red,
}

/// Arena index of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    color: Color,
    key: Key,
    var: i32,
}

/// A gate as handed to the emitter: its variable plus the canonical
/// operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateNode {
    pub var: Lit,
    pub op_left: Lit,
    pub op_right: Lit,
}

/// Hash-consing table of AND gates for one circuit under construction.
///
/// The table exclusively owns its nodes and only ever grows; a gate keeps
/// its variable for the life of the table. Variables are handed out from a
/// counter seeded past the circuit's reserved input and latch variables.
#[derive(Debug)]
pub struct AndTable {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    next_var: i32,
}

enum Side {
    Left,
    Right,
}

impl AndTable {
    /// Creates an empty table for a circuit with `reserved_vars` input and
    /// latch variables; gate variables start right after them.
    pub fn new(reserved_vars: u32) -> Self {
        AndTable { nodes: Vec::new(), root: None, next_var: 2 + reserved_vars as i32 }
    }

    /// Number of gates allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the variable of the AND of `op1` and `op2`, allocating a gate
    /// on the first request for this canonical key and returning the
    /// existing variable on every later one. Constants are valid operands;
    /// zero is not a literal.
    pub fn construct_and(&mut self, op1: Lit, op2: Lit) -> Lit {
        assert!(op1.0 != 0 && op2.0 != 0, "zero is not a valid gate operand");
        let key = Key::new(op1, op2);
        // Descend from the current root; remember where a new leaf would
        // attach.
        let mut attach: Option<(NodeId, Side)> = None;
        let mut cur = self.root;
        while let Some(id) = cur {
            match key.cmp(&self.node(id).key) {
                Ordering::Less => {
                    attach = Some((id, Side::Left));
                    cur = self.node(id).left;
                }
                Ordering::Equal => return Lit(self.node(id).var),
                Ordering::Greater => {
                    attach = Some((id, Side::Right));
                    cur = self.node(id).right;
                }
            }
        }
        let var = self.next_var;
        self.next_var += 1;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: attach.as_ref().map(|(p, _)| *p),
            left: None,
            right: None,
            color: Color::Red,
            key,
            var,
        });
        match attach {
            Some((p, Side::Left)) => self.nodes[p.0].left = Some(id),
            Some((p, Side::Right)) => self.nodes[p.0].right = Some(id),
            None => {}
        }
        self.repair(id);
        // Fixup rotations can move the root without telling us; re-derive it
        // from the inserted node after every insertion.
        let mut root = id;
        while let Some(p) = self.node(root).parent {
            root = p;
        }
        self.root = Some(root);
        Lit(var)
    }

    /// OR through De Morgan: a single AND gate over the negated operands,
    /// shared with any earlier request for the same negated key.
    pub fn construct_or(&mut self, op1: Lit, op2: Lit) -> Lit {
        self.construct_and(op1.negate(), op2.negate()).negate()
    }

    /// Gates in strictly increasing canonical-key order, so two tables with
    /// the same content always serialize identically.
    pub fn iter_in_order(&self) -> InOrderIter<'_> {
        let mut iter = InOrderIter { table: self, stack: Vec::new() };
        iter.push_left_spine(self.root);
        iter
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn uncle(&self, n: NodeId) -> Option<NodeId> {
        let p = self.node(n).parent?;
        let g = self.node(p).parent?;
        if self.node(g).left == Some(p) { self.node(g).right } else { self.node(g).left }
    }

    /// Restores the red-black properties after `n` was attached as a red
    /// leaf.
    fn repair(&mut self, n: NodeId) {
        let Some(p) = self.node(n).parent else {
            // The root must be black.
            self.nodes[n.0].color = Color::Black;
            return;
        };
        if self.node(p).color == Color::Black {
            return;
        }
        if let Some(u) = self.uncle(n) {
            if self.node(u).color == Color::Red {
                // Red uncle: push the conflict two levels up and retry
                // there.
                let g = self.node(p).parent.expect("red parent is never the root");
                self.nodes[p.0].color = Color::Black;
                self.nodes[u.0].color = Color::Black;
                self.nodes[g.0].color = Color::Red;
                self.repair(g);
                return;
            }
        }
        // Rotation case. The node must first become the left-left or
        // right-right grandchild; the zig-zag shapes need a preparatory
        // rotation with the parent.
        let mut n = n;
        let p = self.node(n).parent.expect("checked above");
        let g = self.node(p).parent.expect("red parent is never the root");
        if Some(n) == self.node(p).right && Some(p) == self.node(g).left {
            self.rotate_left(p);
            n = self.node(n).left.expect("old parent becomes left child");
        } else if Some(n) == self.node(p).left && Some(p) == self.node(g).right {
            self.rotate_right(p);
            n = self.node(n).right.expect("old parent becomes right child");
        }
        // Rotate with the grandparent and swap the parent/grandparent
        // colors.
        let p = self.node(n).parent.expect("checked above");
        let g = self.node(p).parent.expect("red parent is never the root");
        if Some(n) == self.node(p).left {
            self.rotate_right(g);
        } else {
            self.rotate_left(g);
        }
        self.nodes[p.0].color = Color::Black;
        self.nodes[g.0].color = Color::Red;
    }

    fn rotate_left(&mut self, n: NodeId) {
        let nnew = self.node(n).right.expect("rotation pivot must exist");
        let p = self.node(n).parent;
        self.nodes[n.0].right = self.node(nnew).left;
        self.nodes[nnew.0].left = Some(n);
        self.nodes[n.0].parent = Some(nnew);
        if let Some(r) = self.node(n).right {
            self.nodes[r.0].parent = Some(n);
        }
        self.attach_to_parent(n, p, nnew);
    }

    fn rotate_right(&mut self, n: NodeId) {
        let nnew = self.node(n).left.expect("rotation pivot must exist");
        let p = self.node(n).parent;
        self.nodes[n.0].left = self.node(nnew).right;
        self.nodes[nnew.0].right = Some(n);
        self.nodes[n.0].parent = Some(nnew);
        if let Some(l) = self.node(n).left {
            self.nodes[l.0].parent = Some(n);
        }
        self.attach_to_parent(n, p, nnew);
    }

    /// Points whichever child slot of `p` held `n` at `nnew` instead; with
    /// no parent, `nnew` becomes detached at the top (the caller re-derives
    /// the root).
    fn attach_to_parent(&mut self, n: NodeId, p: Option<NodeId>, nnew: NodeId) {
        if let Some(p) = p {
            if self.node(p).left == Some(n) {
                self.nodes[p.0].left = Some(nnew);
            } else if self.node(p).right == Some(n) {
                self.nodes[p.0].right = Some(nnew);
            }
        }
        self.nodes[nnew.0].parent = p;
    }
}

pub struct InOrderIter<'a> {
    table: &'a AndTable,
    stack: Vec<NodeId>,
}

impl InOrderIter<'_> {
    fn push_left_spine(&mut self, mut cur: Option<NodeId>) {
        while let Some(id) = cur {
            self.stack.push(id);
            cur = self.table.node(id).left;
        }
    }
}

impl Iterator for InOrderIter<'_> {
    type Item = GateNode;

    fn next(&mut self) -> Option<GateNode> {
        let id = self.stack.pop()?;
        let node = self.table.node(id);
        self.push_left_spine(node.right);
        Some(GateNode {
            var: Lit(node.var),
            op_left: node.key.op_left,
            op_right: node.key.op_right,
        })
    }
}
