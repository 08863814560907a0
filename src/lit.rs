// SPDX-License-Identifier: Apache-2.0

//! Signed-literal convention shared by the gate table and the emitters.
//!
//! A literal is a signed integer: the magnitude names a variable and the
//! sign encodes negation. `1` and `-1` are reserved for the constants true
//! and false, `0` is never a literal, and real variables are numbered from
//! 2 upward. The AIGER file format instead uses non-negative literal ids
//! where the low bit encodes negation; the conversion between the two
//! spaces lives here and every literal crossing the emission boundary goes
//! through it.

/// A variable reference with polarity in the signed-integer convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit(pub i32);

impl Lit {
    /// Constant true.
    pub const TRUE: Lit = Lit(1);
    /// Constant false.
    pub const FALSE: Lit = Lit(-1);

    /// Non-negated literal for variable `var`. Variables start at 2; 1 is
    /// taken by the constants.
    pub fn from_var(var: i32) -> Self {
        debug_assert!(var >= 2, "variables are numbered from 2, got {}", var);
        Lit(var)
    }

    #[must_use]
    pub fn negate(&self) -> Self {
        debug_assert!(self.0 != 0);
        Lit(-self.0)
    }

    /// The variable this literal refers to, polarity stripped.
    pub fn var(&self) -> i32 {
        self.0.abs()
    }

    pub fn is_negated(&self) -> bool {
        self.0 < 0
    }

    pub fn is_constant(&self) -> bool {
        self.0 == 1 || self.0 == -1
    }

    /// Converts into the AIGER literal space: the constants map to `0`/`1`
    /// and variable `v` maps to `2*(v-1)`, plus one when negated.
    pub fn to_aiger_lit(&self) -> u32 {
        match self.0 {
            -1 => 0,
            1 => 1,
            v => {
                let mut lit = 2 * (v.unsigned_abs() - 1);
                if v < 0 {
                    lit += 1;
                }
                lit
            }
        }
    }

    /// Inverse of [`Lit::to_aiger_lit`].
    pub fn from_aiger_lit(lit: u32) -> Self {
        match lit {
            0 => Lit::FALSE,
            1 => Lit::TRUE,
            _ => {
                let var = (lit / 2 + 1) as i32;
                if lit % 2 == 1 { Lit(-var) } else { Lit(var) }
            }
        }
    }
}
