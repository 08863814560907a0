// SPDX-License-Identifier: Apache-2.0

//! Merges AIGER circuits with common inputs into their disjunction.

use std::fs;
use std::path::PathBuf;
use std::process::exit;

use anyhow::Context;
use clap::Parser;

use taskaig::aiger::Aig;
use taskaig::emit_aiger::emit_aiger;
use taskaig::load_aiger::load_aiger;
use taskaig::product::Merger;

/// Creates the product of AIGs with common inputs: the merged circuit's
/// single output is the disjunction of the sources' outputs.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input AIGER ASCII files, at least two
    #[arg(required = true, num_args = 2.., value_name = "INPUTFILES")]
    inputs: Vec<PathBuf>,
}

fn read_source(path: &PathBuf) -> anyhow::Result<Aig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading error on {}", path.display()))?;
    load_aiger(&text).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
}

fn main() {
    let _ = env_logger::builder().try_init();
    let args = Args::parse();
    let mut merger = Merger::new();
    for path in &args.inputs {
        let source = match read_source(path) {
            Ok(aig) => aig,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                exit(1);
            }
        };
        if let Err(e) = merger.add_source(&source) {
            eprintln!("Error: {}: {}", path.display(), e);
            exit(1);
        }
    }
    let merged = merger.finish();
    if cfg!(debug_assertions) {
        if let Err(e) = merged.check() {
            eprintln!("Error: merged circuit is malformed: {}", e);
            exit(1);
        }
    }
    print!("{}", emit_aiger(&merged));
}
