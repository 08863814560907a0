// SPDX-License-Identifier: Apache-2.0

//! Parser for the AIGER ASCII (`aag`) format.
//!
//! Strict on syntax: the header counts must match the section contents
//! exactly and every literal must stay within the header's maximum variable
//! index. Semantic problems such as undefined operands are left to
//! [`Aig::check`], which callers run separately when they want it.

use crate::aiger::Aig;

fn parse_u32(tok: &str, what: &str, lineno: usize) -> Result<u32, String> {
    tok.parse().map_err(|_| format!("line {}: invalid {} '{}'", lineno, what, tok))
}

fn fields(line: &str, want: usize, lineno: usize) -> Result<Vec<&str>, String> {
    let toks: Vec<&str> = line.split_whitespace().collect();
    if toks.len() != want {
        return Err(format!("line {}: expected {} fields, got {}", lineno, want, toks.len()));
    }
    Ok(toks)
}

/// Parses an `aag` file into an [`Aig`].
pub fn load_aiger(text: &str) -> Result<Aig, String> {
    let mut lines = text.lines().enumerate();
    let mut take = |section: &str| -> Result<(usize, &str), String> {
        lines
            .next()
            .map(|(idx, line)| (idx + 1, line))
            .ok_or_else(|| format!("unexpected end of file in {} section", section))
    };

    let (lineno, header) = take("header")?;
    let toks: Vec<&str> = header.split_whitespace().collect();
    if toks.len() != 6 || toks[0] != "aag" {
        return Err(format!("line {}: expected header 'aag M I L O A'", lineno));
    }
    let header_max_var = parse_u32(toks[1], "maximum variable index", lineno)?;
    let num_inputs = parse_u32(toks[2], "input count", lineno)?;
    let num_latches = parse_u32(toks[3], "latch count", lineno)?;
    let num_outputs = parse_u32(toks[4], "output count", lineno)?;
    let num_ands = parse_u32(toks[5], "and count", lineno)?;

    let mut aig = Aig::default();
    for _ in 0..num_inputs {
        let (lineno, line) = take("input")?;
        let toks = fields(line, 1, lineno)?;
        aig.add_input(parse_u32(toks[0], "input literal", lineno)?, None);
    }
    for _ in 0..num_latches {
        let (lineno, line) = take("latch")?;
        let toks = fields(line, 2, lineno)?;
        aig.add_latch(
            parse_u32(toks[0], "latch literal", lineno)?,
            parse_u32(toks[1], "latch next-state literal", lineno)?,
            None,
        );
    }
    for _ in 0..num_outputs {
        let (lineno, line) = take("output")?;
        let toks = fields(line, 1, lineno)?;
        aig.add_output(parse_u32(toks[0], "output literal", lineno)?, None);
    }
    for _ in 0..num_ands {
        let (lineno, line) = take("and")?;
        let toks = fields(line, 3, lineno)?;
        aig.add_and(
            parse_u32(toks[0], "and literal", lineno)?,
            parse_u32(toks[1], "and operand", lineno)?,
            parse_u32(toks[2], "and operand", lineno)?,
        );
    }

    // Whatever follows is the symbol table, then comments after a lone "c".
    let mut in_comments = false;
    for (idx, line) in lines {
        let lineno = idx + 1;
        if in_comments {
            aig.comments.push(line.to_string());
            continue;
        }
        if line == "c" {
            in_comments = true;
            continue;
        }
        let (tag, name) = line
            .split_once(' ')
            .ok_or_else(|| format!("line {}: malformed symbol table entry '{}'", lineno, line))?;
        if tag.len() < 2 {
            return Err(format!("line {}: malformed symbol '{}'", lineno, tag));
        }
        // The kind letter may be multi-byte; split on its char boundary.
        let (kind, pos) = tag.split_at(tag.chars().next().map_or(1, char::len_utf8));
        let pos: usize = pos
            .parse()
            .map_err(|_| format!("line {}: invalid symbol position '{}'", lineno, pos))?;
        let slot = match kind {
            "i" => aig.inputs.get_mut(pos).map(|s| &mut s.name),
            "l" => aig.latches.get_mut(pos).map(|l| &mut l.name),
            "o" => aig.outputs.get_mut(pos).map(|s| &mut s.name),
            _ => return Err(format!("line {}: unknown symbol kind '{}'", lineno, kind)),
        };
        let Some(slot) = slot else {
            return Err(format!("line {}: symbol '{}' out of range", lineno, tag));
        };
        if slot.is_some() {
            return Err(format!("line {}: symbol '{}' redefined", lineno, tag));
        }
        *slot = Some(name.to_string());
    }

    if aig.max_var > header_max_var {
        return Err(format!(
            "header max variable {} is smaller than used variable {}",
            header_max_var, aig.max_var
        ));
    }
    aig.max_var = header_max_var;
    Ok(aig)
}
