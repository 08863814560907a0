// SPDX-License-Identifier: Apache-2.0

//! Serializer for the AIGER ASCII (`aag`) format.

use std::fmt::Write as _;

use crate::aiger::Aig;

/// Renders `aig` as `aag` text: header, inputs, latches, outputs, and
/// gates, then the symbol table and an optional comment section.
///
/// Only named symbols get table entries. The comment section is emitted
/// only when there are comment lines, since a bare `c` terminator carries
/// no information.
pub fn emit_aiger(aig: &Aig) -> String {
    let mut out = String::new();
    writeln!(
        &mut out,
        "aag {} {} {} {} {}",
        aig.max_var,
        aig.inputs.len(),
        aig.latches.len(),
        aig.outputs.len(),
        aig.ands.len()
    )
    .unwrap();
    for input in &aig.inputs {
        writeln!(&mut out, "{}", input.lit).unwrap();
    }
    for latch in &aig.latches {
        writeln!(&mut out, "{} {}", latch.lit, latch.next).unwrap();
    }
    for output in &aig.outputs {
        writeln!(&mut out, "{}", output.lit).unwrap();
    }
    for and in &aig.ands {
        writeln!(&mut out, "{} {} {}", and.lhs, and.rhs0, and.rhs1).unwrap();
    }
    for (i, input) in aig.inputs.iter().enumerate() {
        if let Some(name) = &input.name {
            writeln!(&mut out, "i{} {}", i, name).unwrap();
        }
    }
    for (i, latch) in aig.latches.iter().enumerate() {
        if let Some(name) = &latch.name {
            writeln!(&mut out, "l{} {}", i, name).unwrap();
        }
    }
    for (i, output) in aig.outputs.iter().enumerate() {
        if let Some(name) = &output.name {
            writeln!(&mut out, "o{} {}", i, name).unwrap();
        }
    }
    if !aig.comments.is_empty() {
        writeln!(&mut out, "c").unwrap();
        for line in &aig.comments {
            writeln!(&mut out, "{}", line).unwrap();
        }
    }
    out
}
