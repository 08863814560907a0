// SPDX-License-Identifier: Apache-2.0

//! Encodes one periodic task as an AIG whose output flags deadline misses.

use std::process::exit;

use clap::Parser;

use taskaig::emit_aiger::emit_aiger;
use taskaig::task::TaskParams;

/// Creates an AIG for a deterministic task system.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of tasks in the system
    total_tasks: u64,
    /// Index of the task this circuit models
    task_index: u64,
    /// Relative deadline in logical time units
    deadline: u64,
    /// Arrival time of the first job; 0 starts the task immediately
    init_arrival: u64,
    /// Largest admissible execution time (always admissible)
    max_exec_time: u64,
    /// Largest admissible inter-arrival gap (always admissible)
    max_arrival_time: u64,
    /// Additional admissible execution time, repeatable
    #[arg(short = 'e', value_name = "TIME")]
    exec_times: Vec<u64>,
    /// Additional admissible inter-arrival gap, repeatable
    #[arg(short = 'a', value_name = "TIME")]
    arrival_times: Vec<u64>,
}

fn main() {
    let _ = env_logger::builder().try_init();
    let args = Args::parse();
    let mut params = match TaskParams::new(
        args.total_tasks,
        args.task_index,
        args.deadline,
        args.init_arrival,
        args.max_exec_time,
        args.max_arrival_time,
    ) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };
    for &time in &args.exec_times {
        params.add_exec_time(time);
    }
    for &gap in &args.arrival_times {
        params.add_arrival_time(gap);
    }
    let aig = params.encode();
    if cfg!(debug_assertions) {
        if let Err(e) = aig.check() {
            eprintln!("Error: encoded circuit is malformed: {}", e);
            exit(1);
        }
    }
    print!("{}", emit_aiger(&aig));
}
