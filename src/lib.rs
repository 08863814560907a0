// SPDX-License-Identifier: Apache-2.0

pub mod aiger;
pub mod and_table;
pub mod counters;
pub mod emit_aiger;
pub mod lit;
pub mod load_aiger;
pub mod product;
pub mod sim;
pub mod task;
