// SPDX-License-Identifier: Apache-2.0

//! Encoder from one periodic task's parameters to a monitor circuit.
//!
//! The circuit models the admissible schedules of a single task under a
//! scheduler that picks one task per logical time unit. Logical time runs at
//! half the clock: a phase latch (`tick_tock`) alternates every step and all
//! counting happens on steps where it reads 1, which is also the phase the
//! single output samples. The output, `deadline_violation`, rises exactly
//! when the current job has been pending for `deadline` time units without
//! terminating.
//!
//! Counters are latch vectors, LSB first. The execution counter tracks the
//! elapsed time of the pending job, jumps to all-ones when the job
//! terminates, and holds there until the next accepted arrival resets it;
//! all-ones is sized to stay strictly above every compared value, so the
//! frozen state can never fake a deadline hit. The arrival counter counts
//! time since the last arrival and wraps at the maximum inter-arrival gap,
//! which forces an arrival; earlier declared gaps arrive only when the
//! uncontrollable `next_job` input asks for it. Arrivals while a job is
//! still pending are dropped.

use log::{debug, warn};

use crate::aiger::Aig;
use crate::and_table::AndTable;
use crate::counters::{equals_const, ripple_increment};
use crate::lit::Lit;

/// Validated parameters of one task.
#[derive(Debug, Clone)]
pub struct TaskParams {
    total_tasks: u64,
    task_index: u64,
    deadline: u64,
    init_arrival: u64,
    max_exec_time: u64,
    max_arrival_time: u64,
    /// Admissible execution times below the maximum, ascending, deduplicated.
    exec_times: Vec<u64>,
    /// Admissible inter-arrival gaps below the maximum, ascending,
    /// deduplicated.
    arrival_times: Vec<u64>,
}

fn insert_threshold(list: &mut Vec<u64>, value: u64) {
    if let Err(pos) = list.binary_search(&value) {
        list.insert(pos, value);
    }
}

impl TaskParams {
    pub fn new(
        total_tasks: u64,
        task_index: u64,
        deadline: u64,
        init_arrival: u64,
        max_exec_time: u64,
        max_arrival_time: u64,
    ) -> Result<TaskParams, String> {
        if total_tasks == 0 {
            return Err("total_tasks must be at least 1".to_string());
        }
        if task_index >= total_tasks {
            return Err(format!("task_index {} out of range for {} tasks", task_index, total_tasks));
        }
        if deadline == 0 {
            return Err("deadline must be at least 1".to_string());
        }
        if deadline == u64::MAX {
            return Err(format!("deadline {} is too large to encode", deadline));
        }
        if max_exec_time == 0 {
            return Err("max_exec_time must be at least 1".to_string());
        }
        if max_exec_time == u64::MAX {
            return Err(format!("max_exec_time {} is too large to encode", max_exec_time));
        }
        if max_arrival_time == 0 {
            return Err("max_arrival_time must be at least 1".to_string());
        }
        if init_arrival > max_arrival_time {
            return Err(format!(
                "init_arrival {} exceeds max_arrival_time {}",
                init_arrival, max_arrival_time
            ));
        }
        Ok(TaskParams {
            total_tasks,
            task_index,
            deadline,
            init_arrival,
            max_exec_time,
            max_arrival_time,
            exec_times: Vec::new(),
            arrival_times: Vec::new(),
        })
    }

    /// Declares an admissible execution time below the forced maximum.
    /// Values outside `1..max_exec_time` are ignored with a warning; the
    /// maximum itself is always admissible.
    pub fn add_exec_time(&mut self, value: u64) {
        if value == 0 || value >= self.max_exec_time {
            warn!("ignoring execution time {} outside 1..{}", value, self.max_exec_time);
            return;
        }
        insert_threshold(&mut self.exec_times, value);
    }

    /// Declares an admissible inter-arrival gap below the forced maximum.
    pub fn add_arrival_time(&mut self, value: u64) {
        if value == 0 || value >= self.max_arrival_time {
            warn!("ignoring arrival time {} outside 1..{}", value, self.max_arrival_time);
            return;
        }
        insert_threshold(&mut self.arrival_times, value);
    }

    /// Scheduler choice input width: every task index must be expressible.
    fn choice_bits(&self) -> u32 {
        self.total_tasks.ilog2() + 1
    }

    /// Execution counter width: must represent the deadline and the largest
    /// execution time while keeping the all-ones freeze value strictly above
    /// both.
    fn exec_bits(&self) -> u32 {
        (self.deadline.max(self.max_exec_time) + 1).ilog2() + 1
    }

    /// Arrival counter width: counts `0..max_arrival_time - 1`, arrival
    /// firing on the step that would complete the gap.
    fn arrival_bits(&self) -> u32 {
        (self.max_arrival_time - 1).max(1).ilog2() + 1
    }

    /// Builds the monitor circuit.
    pub fn encode(&self) -> Aig {
        let choice_bits = self.choice_bits();
        let exec_bits = self.exec_bits();
        let arrival_bits = self.arrival_bits();
        let num_inputs = choice_bits + 2;
        let num_latches = exec_bits + arrival_bits + 2;
        debug!(
            "encoding task {} of {}: {} choice bits, {} exec bits, {} arrival bits",
            self.task_index, self.total_tasks, choice_bits, exec_bits, arrival_bits
        );

        // Fixed variable layout: inputs from 2, latches right after.
        let latch_base = 2 + num_inputs as i32;
        let choice: Vec<Lit> = (0..choice_bits as i32).map(|i| Lit::from_var(2 + i)).collect();
        let end_exec_early = Lit::from_var(2 + choice_bits as i32);
        let next_job = Lit::from_var(3 + choice_bits as i32);
        let exec: Vec<Lit> =
            (0..exec_bits as i32).map(|i| Lit::from_var(latch_base + i)).collect();
        let arrival: Vec<Lit> = (0..arrival_bits as i32)
            .map(|i| Lit::from_var(latch_base + exec_bits as i32 + i))
            .collect();
        let tick = Lit::from_var(latch_base + (exec_bits + arrival_bits) as i32);
        let is_init = Lit::from_var(latch_base + (exec_bits + arrival_bits) as i32 + 1);

        let mut table = AndTable::new(num_inputs + num_latches);

        let scheduled = equals_const(&mut table, &choice, self.task_index);

        // Arrival detection. A declared gap arrives only on demand; the
        // maximum gap forces an arrival unconditionally. Gaps compare one
        // below their value: the counter shows the completed waiting time,
        // and the arrival lands on the step that completes the gap.
        let mut chain = Lit::FALSE;
        for &gap in &self.arrival_times {
            let at_gap = equals_const(&mut table, &arrival, gap - 1);
            let requested = table.construct_and(at_gap, next_job);
            chain = table.construct_or(chain, requested);
        }
        let at_max_gap = equals_const(&mut table, &arrival, self.max_arrival_time - 1);
        chain = table.construct_or(chain, at_max_gap);
        let after_init = table.construct_and(is_init, chain);
        let pre_arrive = if self.init_arrival == 0 {
            after_init
        } else {
            let countdown_done =
                equals_const(&mut table, &arrival, self.init_arrival - 1);
            let first = table.construct_and(is_init.negate(), countdown_done);
            table.construct_or(after_init, first)
        };
        let arrive = table.construct_and(tick, pre_arrive);

        // The initialization latch rises once the initial countdown
        // completes on a counting edge, and then stays up. A zero countdown
        // means the task starts initialized.
        let init_next = if self.init_arrival == 0 {
            Lit::TRUE
        } else {
            let countdown_done =
                equals_const(&mut table, &arrival, self.init_arrival - 1);
            let pending = table.construct_and(is_init.negate(), countdown_done);
            let completes = table.construct_and(tick, pending);
            table.construct_or(is_init, completes)
        };

        // Arrival counter: counts every logical step, resets on arrival.
        let arrival_ripple = ripple_increment(&mut table, &arrival, tick);
        let arrival_next: Vec<Lit> = arrival_ripple
            .iter()
            .map(|&bit| table.construct_and(arrive.negate(), bit))
            .collect();

        // Termination: on a counting edge where this task is scheduled and
        // the job is still live, either a declared execution time taken
        // early or the forced maximum finishes the job.
        let all_ones = u64::MAX >> (64 - exec_bits);
        let done = equals_const(&mut table, &exec, all_ones);
        let mut tchain = Lit::FALSE;
        for &time in &self.exec_times {
            let at_time = equals_const(&mut table, &exec, time);
            let taken = table.construct_and(at_time, end_exec_early);
            tchain = table.construct_or(tchain, taken);
        }
        let at_max_time = equals_const(&mut table, &exec, self.max_exec_time);
        tchain = table.construct_or(tchain, at_max_time);
        let while_live = table.construct_and(tick, scheduled);
        let while_live = table.construct_and(while_live, done.negate());
        let term = table.construct_and(while_live, tchain);

        // Execution counter: elapsed time of the pending job. Termination
        // or an already-frozen state pins every bit high; an accepted
        // arrival (only once frozen) clears the counter for the new job.
        let reset = table.construct_and(arrive, done);
        let count_guard = table.construct_and(tick, is_init);
        let exec_ripple = ripple_increment(&mut table, &exec, count_guard);
        let freeze = table.construct_or(term, done);
        let exec_next: Vec<Lit> = exec_ripple
            .iter()
            .map(|&bit| {
                let held = table.construct_or(freeze, bit);
                table.construct_and(reset.negate(), held)
            })
            .collect();

        // The deliverable: pending job at exactly the deadline, sampled in
        // the counting phase.
        let at_deadline = equals_const(&mut table, &exec, self.deadline);
        let missed = table.construct_and(at_deadline, done.negate());
        let violation = table.construct_and(missed, tick);

        let mut aig = Aig::default();
        for (i, lit) in choice.iter().enumerate() {
            let name = format!("controllable_choicetask{}", i);
            aig.add_input(lit.to_aiger_lit(), Some(&name));
        }
        aig.add_input(end_exec_early.to_aiger_lit(), Some("end_exec_early"));
        aig.add_input(next_job.to_aiger_lit(), Some("next_job"));
        for (i, (lit, next)) in exec.iter().zip(&exec_next).enumerate() {
            let name = format!("exec_counter_latch{}", i);
            aig.add_latch(lit.to_aiger_lit(), next.to_aiger_lit(), Some(&name));
        }
        for (i, (lit, next)) in arrival.iter().zip(&arrival_next).enumerate() {
            let name = format!("arrival_counter_latch{}", i);
            aig.add_latch(lit.to_aiger_lit(), next.to_aiger_lit(), Some(&name));
        }
        aig.add_latch(tick.to_aiger_lit(), tick.negate().to_aiger_lit(), Some("tick_tock"));
        aig.add_latch(is_init.to_aiger_lit(), init_next.to_aiger_lit(), Some("is_initialized"));
        for gate in table.iter_in_order() {
            aig.add_and(
                gate.var.to_aiger_lit(),
                gate.op_left.to_aiger_lit(),
                gate.op_right.to_aiger_lit(),
            );
        }
        aig.add_output(violation.to_aiger_lit(), Some("deadline_violation"));
        debug!("encoded {} and gates over {} variables", aig.ands.len(), aig.max_var);
        aig
    }
}
