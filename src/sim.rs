// SPDX-License-Identifier: Apache-2.0

//! Cycle-accurate interpreter for an [`Aig`].
//!
//! Drives a circuit one clock step at a time: feed one bool per input, read
//! back the outputs, and let the latches advance. Gates are evaluated on
//! demand with an explicit worklist, so the gate section may appear in any
//! order as long as the circuit is acyclic, which holds for everything the
//! builders in this crate produce.

use std::collections::HashMap;

use bitvec::prelude::*;

use crate::aiger::Aig;

pub struct Simulator<'a> {
    aig: &'a Aig,
    /// Gate variable to its two operand literals.
    gates: HashMap<u32, (u32, u32)>,
    /// Current latch states, indexed like `aig.latches`. All start at zero.
    latch_values: BitVec,
}

fn lit_value(values: &BitSlice, lit: u32) -> bool {
    if lit < 2 {
        return lit == 1;
    }
    values[(lit >> 1) as usize] ^ (lit & 1 == 1)
}

impl<'a> Simulator<'a> {
    pub fn new(aig: &'a Aig) -> Self {
        let gates = aig.ands.iter().map(|a| (a.lhs >> 1, (a.rhs0, a.rhs1))).collect();
        Simulator { aig, gates, latch_values: bitvec![0; aig.latches.len()] }
    }

    /// Latch states entering the next step, indexed like the latch section.
    pub fn latches(&self) -> &BitSlice {
        &self.latch_values
    }

    /// Runs one clock step: evaluates all outputs under `inputs` and the
    /// current latch states, then advances every latch to its next-state
    /// value. Returns the output values in declaration order.
    pub fn step(&mut self, inputs: &[bool]) -> Vec<bool> {
        assert_eq!(
            inputs.len(),
            self.aig.inputs.len(),
            "circuit has {} inputs, got {}",
            self.aig.inputs.len(),
            inputs.len()
        );
        let width = (self.aig.max_var + 1) as usize;
        let mut values = bitvec![0; width];
        let mut known = bitvec![0; width];
        known.set(0, true);
        for (symbol, &value) in self.aig.inputs.iter().zip(inputs) {
            values.set((symbol.lit >> 1) as usize, value);
            known.set((symbol.lit >> 1) as usize, true);
        }
        for (latch, value) in self.aig.latches.iter().zip(self.latch_values.iter().by_vals()) {
            values.set((latch.lit >> 1) as usize, value);
            known.set((latch.lit >> 1) as usize, true);
        }
        for output in &self.aig.outputs {
            self.resolve(output.lit, &mut values, &mut known);
        }
        for latch in &self.aig.latches {
            self.resolve(latch.next, &mut values, &mut known);
        }
        let outputs = self.aig.outputs.iter().map(|o| lit_value(&values, o.lit)).collect();
        let next: Vec<bool> =
            self.aig.latches.iter().map(|l| lit_value(&values, l.next)).collect();
        for (i, value) in next.into_iter().enumerate() {
            self.latch_values.set(i, value);
        }
        outputs
    }

    /// Makes the variable under `lit` known, evaluating its cone of gates
    /// in dependency order.
    fn resolve(&self, lit: u32, values: &mut BitVec, known: &mut BitVec) {
        if lit < 2 || known[(lit >> 1) as usize] {
            return;
        }
        let mut stack = vec![lit >> 1];
        while let Some(&var) = stack.last() {
            if known[var as usize] {
                stack.pop();
                continue;
            }
            let Some(&(rhs0, rhs1)) = self.gates.get(&var) else {
                panic!("variable {} has no definition", var);
            };
            let mut ready = true;
            for operand in [rhs0, rhs1] {
                if operand > 1 && !known[(operand >> 1) as usize] {
                    stack.push(operand >> 1);
                    ready = false;
                }
            }
            if ready {
                let value = lit_value(values, rhs0) && lit_value(values, rhs1);
                values.set(var as usize, value);
                known.set(var as usize, true);
                stack.pop();
            }
        }
    }
}
