// SPDX-License-Identifier: Apache-2.0

//! In-memory model of an and-inverter graph in AIGER terms.
//!
//! Literals here are the unsigned AIGER encoding: variable index times two,
//! plus one for negation. Constant false is 0, constant true is 1. The
//! signed convention used while building logic lives in [`crate::lit`]; this
//! module is the boundary representation that loading, emission, merging,
//! and simulation agree on.

use std::collections::HashSet;

/// A named input or output literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub lit: u32,
    pub name: Option<String>,
}

/// A latch: current-state literal, next-state function, optional name.
/// Latches initialize to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Latch {
    pub lit: u32,
    pub next: u32,
    pub name: Option<String>,
}

/// A two-input AND gate; `lhs` is the defined (even) literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AndGate {
    pub lhs: u32,
    pub rhs0: u32,
    pub rhs1: u32,
}

/// A complete circuit. `max_var` tracks the largest variable index seen in
/// any literal added so far, so freshly allocated variables never collide
/// with imported ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aig {
    pub max_var: u32,
    pub inputs: Vec<Symbol>,
    pub latches: Vec<Latch>,
    pub outputs: Vec<Symbol>,
    pub ands: Vec<AndGate>,
    pub comments: Vec<String>,
}

impl Aig {
    pub fn add_input(&mut self, lit: u32, name: Option<&str>) {
        self.import_literal(lit);
        self.inputs.push(Symbol { lit, name: name.map(String::from) });
    }

    pub fn add_latch(&mut self, lit: u32, next: u32, name: Option<&str>) {
        self.import_literal(lit);
        self.import_literal(next);
        self.latches.push(Latch { lit, next, name: name.map(String::from) });
    }

    pub fn add_output(&mut self, lit: u32, name: Option<&str>) {
        self.import_literal(lit);
        self.outputs.push(Symbol { lit, name: name.map(String::from) });
    }

    pub fn add_and(&mut self, lhs: u32, rhs0: u32, rhs1: u32) {
        self.import_literal(lhs);
        self.import_literal(rhs0);
        self.import_literal(rhs1);
        self.ands.push(AndGate { lhs, rhs0, rhs1 });
    }

    pub fn add_comment(&mut self, line: &str) {
        self.comments.push(line.to_string());
    }

    fn import_literal(&mut self, lit: u32) {
        self.max_var = self.max_var.max(lit >> 1);
    }

    /// Structural validation: every defining literal is even, positive and
    /// defined once; every referenced literal is a constant or has a
    /// definition. Returns the first problem found.
    pub fn check(&self) -> Result<(), String> {
        let mut defined: HashSet<u32> = HashSet::new();
        let mut define = |lit: u32, what: &str| -> Result<(), String> {
            if lit & 1 == 1 {
                return Err(format!("{} literal {} is negated", what, lit));
            }
            if lit < 2 {
                return Err(format!("{} literal {} is a constant", what, lit));
            }
            if !defined.insert(lit >> 1) {
                return Err(format!("variable {} defined more than once", lit >> 1));
            }
            Ok(())
        };
        for input in &self.inputs {
            define(input.lit, "input")?;
        }
        for latch in &self.latches {
            define(latch.lit, "latch")?;
        }
        for and in &self.ands {
            define(and.lhs, "and")?;
        }
        let check_ref = |lit: u32, what: &str| -> Result<(), String> {
            if lit >> 1 > self.max_var {
                return Err(format!("{} literal {} exceeds max_var {}", what, lit, self.max_var));
            }
            if lit > 1 && !defined.contains(&(lit >> 1)) {
                return Err(format!("{} literal {} has no definition", what, lit));
            }
            Ok(())
        };
        for latch in &self.latches {
            check_ref(latch.next, "latch next-state")?;
        }
        for output in &self.outputs {
            check_ref(output.lit, "output")?;
        }
        for and in &self.ands {
            check_ref(and.rhs0, "and operand")?;
            check_ref(and.rhs1, "and operand")?;
        }
        Ok(())
    }
}
