// SPDX-License-Identifier: Apache-2.0

//! Merges single-output circuits over a shared input block into one
//! circuit whose output is the disjunction of theirs.
//!
//! Sources are combined by literal translation: input literals pass through
//! unchanged, everything above the input block is shifted past the
//! variables already in the merged circuit. Only the input count is
//! checked; the sources are trusted to agree on what the inputs mean and to
//! number them as the first variables, the way the generators in this crate
//! lay circuits out.

use log::debug;

use crate::aiger::Aig;

/// Incremental merger. Feed sources one at a time so each can be dropped as
/// soon as it has been absorbed, then call [`Merger::finish`].
#[derive(Debug, Default)]
pub struct Merger {
    dst: Aig,
    /// Shared input count, fixed by the first source.
    input_count: Option<u32>,
    /// Literal shift for the next source's non-input variables.
    offset: u32,
    /// Disjunction of all outputs absorbed so far; starts at constant
    /// false.
    output: u32,
    sources: usize,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorbs one source circuit. The first source fixes the input block
    /// (literals and names); every later one must declare the same number
    /// of inputs. A source with any other number of outputs than one is a
    /// contract violation and panics.
    pub fn add_source(&mut self, src: &Aig) -> Result<(), String> {
        assert_eq!(
            src.outputs.len(),
            1,
            "merge source must declare exactly one output, got {}",
            src.outputs.len()
        );
        let num_inputs = match self.input_count {
            None => {
                for input in &src.inputs {
                    self.dst.add_input(input.lit, input.name.as_deref());
                }
                self.input_count = Some(src.inputs.len() as u32);
                src.inputs.len() as u32
            }
            Some(count) => {
                if src.inputs.len() as u32 != count {
                    return Err(format!("expected {} inputs but got {}", count, src.inputs.len()));
                }
                count
            }
        };
        debug!(
            "merging source {}: {} latches, {} and gates, shift {}",
            self.sources + 1,
            src.latches.len(),
            src.ands.len(),
            self.offset
        );
        let offset = self.offset;
        let shift =
            |lit: u32| if lit <= 2 * num_inputs + 1 { lit } else { lit + offset };
        for and in &src.ands {
            self.dst.add_and(shift(and.lhs), shift(and.rhs0), shift(and.rhs1));
        }
        for latch in &src.latches {
            self.dst.add_latch(shift(latch.lit), shift(latch.next), latch.name.as_deref());
        }
        // Fold the source's output into the running disjunction through one
        // fresh AND over the negations.
        let src_out = shift(src.outputs[0].lit);
        let new_output = 2 * self.dst.max_var + 2;
        self.dst.add_and(new_output, self.output ^ 1, src_out ^ 1);
        self.output = new_output ^ 1;
        self.offset = 2 * self.dst.max_var;
        self.sources += 1;
        Ok(())
    }

    /// Declares the accumulated disjunction as the single output and
    /// returns the merged circuit.
    pub fn finish(mut self) -> Aig {
        debug!("merged {} sources into {} variables", self.sources, self.dst.max_var);
        self.dst.add_output(self.output, Some("output_disjunction"));
        self.dst
    }
}

/// Merges `sources` in order; errors carry the position of the offending
/// source.
pub fn merge_disjunction(sources: &[Aig]) -> Result<Aig, String> {
    if sources.is_empty() {
        return Err("need at least one source circuit".to_string());
    }
    let mut merger = Merger::new();
    for (i, src) in sources.iter().enumerate() {
        merger.add_source(src).map_err(|e| format!("source {}: {}", i + 1, e))?;
    }
    Ok(merger.finish())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::aiger::{AndGate, Latch, Symbol};
    use crate::emit_aiger::emit_aiger;
    use crate::sim::Simulator;

    use super::*;

    fn and_of_inputs() -> Aig {
        let mut aig = Aig::default();
        aig.add_input(2, Some("x"));
        aig.add_input(4, Some("y"));
        aig.add_and(6, 2, 4);
        aig.add_output(6, None);
        aig
    }

    #[test]
    fn test_two_source_merge_layout() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut latched = Aig::default();
        latched.add_input(2, Some("a"));
        latched.add_input(4, Some("b"));
        latched.add_latch(6, 8, Some("mem"));
        latched.add_and(8, 2, 6);
        latched.add_output(8, None);

        let merged = merge_disjunction(&[and_of_inputs(), latched]).unwrap();

        assert_eq!(
            merged.inputs,
            vec![
                Symbol { lit: 2, name: Some("x".to_string()) },
                Symbol { lit: 4, name: Some("y".to_string()) },
            ]
        );
        assert_eq!(
            merged.ands,
            vec![
                AndGate { lhs: 6, rhs0: 2, rhs1: 4 },
                AndGate { lhs: 8, rhs0: 1, rhs1: 7 },
                AndGate { lhs: 16, rhs0: 2, rhs1: 14 },
                AndGate { lhs: 18, rhs0: 8, rhs1: 17 },
            ]
        );
        assert_eq!(
            merged.latches,
            vec![Latch { lit: 14, next: 16, name: Some("mem".to_string()) }]
        );
        assert_eq!(
            merged.outputs,
            vec![Symbol { lit: 19, name: Some("output_disjunction".to_string()) }]
        );
        assert_eq!(merged.max_var, 9);
        assert_eq!(merged.check(), Ok(()));
    }

    #[test]
    fn test_merged_output_is_the_disjunction() {
        // Three combinational sources over the same two inputs: x AND y,
        // x alone, NOT y.
        let pass_x = {
            let mut aig = Aig::default();
            aig.add_input(2, Some("x"));
            aig.add_input(4, Some("y"));
            aig.add_output(2, None);
            aig
        };
        let not_y = {
            let mut aig = Aig::default();
            aig.add_input(2, Some("x"));
            aig.add_input(4, Some("y"));
            aig.add_output(5, None);
            aig
        };
        let merged = merge_disjunction(&[and_of_inputs(), pass_x, not_y]).unwrap();
        assert_eq!(merged.check(), Ok(()));
        let mut sim = Simulator::new(&merged);
        for (x, y) in [(false, false), (false, true), (true, false), (true, true)] {
            let want = (x && y) || x || !y;
            assert_eq!(sim.step(&[x, y]), vec![want], "x={} y={}", x, y);
        }
    }

    #[test]
    fn test_disjunction_matches_sources_over_four_inputs() {
        // Exhaustive check against independently simulated sources: the
        // merged output must equal the OR of theirs on every assignment,
        // and nothing else.
        let input_block = |aig: &mut Aig| {
            for (lit, name) in [(2, "a"), (4, "b"), (6, "c"), (8, "d")] {
                aig.add_input(lit, Some(name));
            }
        };
        let all_four = {
            let mut aig = Aig::default();
            input_block(&mut aig);
            aig.add_and(10, 2, 4);
            aig.add_and(12, 6, 8);
            aig.add_and(14, 10, 12);
            aig.add_output(14, None);
            aig
        };
        let a_implies_c = {
            let mut aig = Aig::default();
            input_block(&mut aig);
            aig.add_and(10, 2, 7);
            aig.add_output(11, None);
            aig
        };
        let just_d = {
            let mut aig = Aig::default();
            input_block(&mut aig);
            aig.add_output(8, None);
            aig
        };
        let sources = [all_four, a_implies_c, just_d];
        let merged = merge_disjunction(&sources).unwrap();
        assert_eq!(merged.check(), Ok(()));
        let mut source_sims: Vec<_> = sources.iter().map(Simulator::new).collect();
        let mut merged_sim = Simulator::new(&merged);
        for assignment in 0u32..16 {
            let inputs: Vec<bool> = (0..4).map(|bit| assignment & (1 << bit) != 0).collect();
            let outputs: Vec<bool> =
                source_sims.iter_mut().map(|sim| sim.step(&inputs)[0]).collect();
            let want = outputs.iter().any(|&out| out);
            assert_eq!(merged_sim.step(&inputs), vec![want], "assignment {:04b}", assignment);
        }
    }

    #[test]
    fn test_merged_latches_keep_their_behavior() {
        // A toggling latch merged with an input passthrough; the result
        // must alternate independently of the input.
        let toggler = {
            let mut aig = Aig::default();
            aig.add_input(2, Some("in"));
            aig.add_latch(4, 5, Some("phase"));
            aig.add_output(4, None);
            aig
        };
        let passthrough = {
            let mut aig = Aig::default();
            aig.add_input(2, Some("in"));
            aig.add_output(2, None);
            aig
        };
        let merged = merge_disjunction(&[toggler, passthrough]).unwrap();
        assert_eq!(merged.check(), Ok(()));
        let mut sim = Simulator::new(&merged);
        let inputs = [false, false, true, false];
        let want = [false, true, true, true];
        for (i, (&input, &expected)) in inputs.iter().zip(&want).enumerate() {
            assert_eq!(sim.step(&[input]), vec![expected], "step {}", i);
        }
    }

    #[test]
    fn test_single_source_keeps_semantics() {
        let merged = merge_disjunction(&[and_of_inputs()]).unwrap();
        let mut sim = Simulator::new(&merged);
        for (x, y) in [(false, false), (false, true), (true, false), (true, true)] {
            assert_eq!(sim.step(&[x, y]), vec![x && y]);
        }
    }

    #[test]
    fn test_input_count_mismatch_is_an_error() {
        let narrow = {
            let mut aig = Aig::default();
            aig.add_input(2, None);
            aig.add_output(2, None);
            aig
        };
        assert_eq!(
            merge_disjunction(&[and_of_inputs(), narrow]),
            Err("source 2: expected 2 inputs but got 1".to_string())
        );
    }

    #[test]
    #[should_panic(expected = "merge source must declare exactly one output, got 2")]
    fn test_multiple_outputs_violate_the_contract() {
        let mut two_outputs = and_of_inputs();
        two_outputs.add_output(2, None);
        let _ = merge_disjunction(&[two_outputs]);
    }

    #[test]
    fn test_merging_nothing_is_an_error() {
        assert_eq!(
            merge_disjunction(&[]),
            Err("need at least one source circuit".to_string())
        );
    }

    #[test]
    fn test_merge_is_deterministic() {
        let sources = [and_of_inputs(), and_of_inputs()];
        let first = emit_aiger(&merge_disjunction(&sources).unwrap());
        let second = emit_aiger(&merge_disjunction(&sources).unwrap());
        assert_eq!(first, second);
    }
}
