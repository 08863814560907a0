// SPDX-License-Identifier: Apache-2.0

//! Comparator and increment gadgets over little-endian literal vectors.
//!
//! Counters in the task encoding are plain vectors of latch literals, least
//! significant bit first. These helpers build the combinational logic that
//! compares such a vector against a constant and that advances it by one.

use crate::and_table::AndTable;
use crate::lit::Lit;

/// Builds a literal that is true exactly when `bits` (LSB first) spell out
/// `value`.
///
/// Each bit contributes itself or its negation according to the matching bit
/// of `value`; the conjunction is folded left starting from constant true,
/// so an empty vector yields true for value zero.
pub fn equals_const(table: &mut AndTable, bits: &[Lit], value: u64) -> Lit {
    debug_assert!(
        bits.len() >= 64 || value >> bits.len() == 0,
        "comparison value must fit in the counter width"
    );
    let mut acc = Lit::TRUE;
    for (i, &bit) in bits.iter().enumerate() {
        let want_set = value >> i & 1 == 1;
        let cond = if want_set { bit } else { bit.negate() };
        acc = table.construct_and(acc, cond);
    }
    acc
}

/// Next-state literals for `bits + guard`, a ripple increment gated by
/// `guard` (LSB first in and out).
///
/// Each output bit either keeps its value (bit set, no incoming carry) or
/// flips (bit clear, carry arrives); the carry out of a position is the AND
/// of the carry in with the old bit. At all-ones the counter wraps to zero;
/// callers that need saturation force a hold upstream of the guard.
pub fn ripple_increment(table: &mut AndTable, bits: &[Lit], guard: Lit) -> Vec<Lit> {
    let mut carry = guard;
    let mut next = Vec::with_capacity(bits.len());
    for &bit in bits {
        let stay = table.construct_and(bit, carry.negate());
        let flip = table.construct_and(bit.negate(), carry);
        next.push(table.construct_or(stay, flip));
        carry = table.construct_and(carry, bit);
    }
    next
}

#[cfg(test)]
mod tests {
    use crate::aiger::Aig;
    use crate::sim::Simulator;

    use super::*;

    /// Wraps a gadget over `n` fresh inputs into a one-output circuit so the
    /// simulator can exercise every assignment.
    fn gadget_to_aig(n: u32, build: impl FnOnce(&mut AndTable, &[Lit]) -> Vec<Lit>) -> Aig {
        let mut table = AndTable::new(n);
        let inputs: Vec<Lit> = (0..n).map(|i| Lit::from_var(2 + i as i32)).collect();
        let outs = build(&mut table, &inputs);
        let mut aig = Aig::default();
        for lit in &inputs {
            aig.add_input(lit.to_aiger_lit(), None);
        }
        for gate in table.iter_in_order() {
            aig.add_and(
                gate.var.to_aiger_lit(),
                gate.op_left.to_aiger_lit(),
                gate.op_right.to_aiger_lit(),
            );
        }
        for out in outs {
            aig.add_output(out.to_aiger_lit(), None);
        }
        aig.check().unwrap();
        aig
    }

    fn bools(value: u64, n: u32) -> Vec<bool> {
        (0..n).map(|i| value >> i & 1 == 1).collect()
    }

    #[test]
    fn test_equals_const_over_all_assignments() {
        for target in 0..8u64 {
            let aig = gadget_to_aig(3, |table, bits| vec![equals_const(table, bits, target)]);
            let mut sim = Simulator::new(&aig);
            for assignment in 0..8u64 {
                let out = sim.step(&bools(assignment, 3));
                assert_eq!(
                    out,
                    vec![assignment == target],
                    "equals_const({}) on input {}",
                    target,
                    assignment
                );
            }
        }
    }

    #[test]
    fn test_equals_const_empty_vector_is_constant_true() {
        let mut table = AndTable::new(0);
        assert_eq!(equals_const(&mut table, &[], 0), Lit::TRUE);
        assert!(table.is_empty());
    }

    #[test]
    fn test_ripple_increment_all_values_and_guards() {
        // Inputs: three counter bits plus the guard; outputs are the next
        // counter bits.
        let aig = gadget_to_aig(4, |table, ins| {
            ripple_increment(table, &ins[..3], ins[3])
        });
        let mut sim = Simulator::new(&aig);
        for value in 0..8u64 {
            for guard in [false, true] {
                let mut inputs = bools(value, 3);
                inputs.push(guard);
                let out = sim.step(&inputs);
                let expected = if guard { (value + 1) % 8 } else { value };
                assert_eq!(out, bools(expected, 3), "value {} guard {}", value, guard);
            }
        }
    }
}
