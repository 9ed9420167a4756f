//! This module contains the allocation scheduler: the periodic decision
//! procedure granting memory admission and CPU shares to processes
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::output_log::{ProcessRow, SchedulerLog, SimulatorInfo, TickLog};
use crate::process::{Process, ProcessState, CPU_CAPACITY, MEMORY_CAPACITY_MB, PROGRESS_RATE};
use crate::registry::{ProcessRegistry, ProcessUpdate};
use crate::usage::system_usage;

/// This function implements one scheduling tick over a frozen snapshot.
///
/// # Arguments
///
/// * `snapshot` - A mutable slice of process records in insertion order.
///
/// # Description
///
/// Completed processes keep their state and progress and hold no grant; apart
/// from the `allocated_cpu` reset they are skipped entirely. All other
/// processes go through three passes:
///
/// 1. Memory admission in snapshot order: a process whose memory request
///    still fits under the 2048 MB cap becomes `Ready` and occupies its
///    request; otherwise it becomes `Waiting` and is excluded from CPU
///    consideration this tick.
/// 2. CPU grant among the admitted, in the same order: a process whose CPU
///    request still fits under the 100% cap becomes `Running` with
///    `allocated_cpu = cpu_request`; otherwise it stays `Ready` with
///    `allocated_cpu = 0` (admitted but starved this tick).
/// 3. Progress update for every `Running` process:
///    `progress += allocated_cpu * PROGRESS_RATE`, clamped to 100. Reaching
///    100 transitions the process to `Completed`, which is terminal.
///
/// The procedure is deterministic given the snapshot order and has no error
/// paths; an empty snapshot is a no-op. `allocated_cpu` is recomputed from
/// zero on every tick.
pub fn compute_tick(snapshot: &mut [Process]) {
    let mut mem_used = 0.0;
    for process in snapshot.iter_mut() {
        process.allocated_cpu = 0.0;
        if process.is_completed() {
            continue;
        }
        if mem_used + process.mem_request <= MEMORY_CAPACITY_MB {
            process.state = ProcessState::Ready;
            mem_used += process.mem_request;
        } else {
            process.state = ProcessState::Waiting;
        }
    }

    let mut cpu_allocated = 0.0;
    for process in snapshot.iter_mut() {
        if process.state != ProcessState::Ready {
            continue;
        }
        if cpu_allocated + process.cpu_request <= CPU_CAPACITY {
            process.state = ProcessState::Running;
            process.allocated_cpu = process.cpu_request;
            cpu_allocated += process.cpu_request;
        }
    }

    for process in snapshot.iter_mut() {
        if process.state != ProcessState::Running {
            continue;
        }
        process.progress = (process.progress + process.allocated_cpu * PROGRESS_RATE).min(100.0);
        if process.progress >= 100.0 {
            process.state = ProcessState::Completed;
            // A completed process holds no grant; later ticks leave it at 0.
            process.allocated_cpu = 0.0;
        }
    }
}

/// Drives scheduling ticks against a shared registry.
#[derive(Clone)]
pub struct AllocationScheduler {
    registry: ProcessRegistry,
}

impl AllocationScheduler {
    pub fn new(registry: &ProcessRegistry) -> Self {
        Self {
            registry: registry.clone(),
        }
    }

    /// Runs one tick: snapshot, compute, write back, report.
    pub fn tick(&self, tick: usize) -> TickLog {
        let mut snapshot = self.registry.snapshot();
        compute_tick(&mut snapshot);

        let updates: Vec<ProcessUpdate> = snapshot
            .iter()
            .map(|p| ProcessUpdate {
                id: p.id,
                state: p.state,
                progress: p.progress,
                allocated_cpu: p.allocated_cpu,
            })
            .collect();
        self.registry.apply_updates(&updates);

        let usage = system_usage(&snapshot);
        let rows = snapshot.iter().map(ProcessRow::new).collect();
        debug!(
            "tick {}: {} processes, cpu {:.1}%, mem {:.1}%",
            tick,
            snapshot.len(),
            usage.cpu_percent,
            usage.mem_percent
        );
        TickLog { tick, rows, usage }
    }
}

/// Fixed-cadence scheduler loop. A started tick always runs to completion;
/// the stop flag only suppresses future ticks.
pub fn run_scheduler_loop(
    scheduler: AllocationScheduler,
    stop: Arc<AtomicBool>,
    interval: Duration,
) -> SchedulerLog {
    let mut log = SchedulerLog::new(SimulatorInfo::with_tick_interval(interval));
    let mut tick = 0;
    while !stop.load(Ordering::SeqCst) {
        log.tick_logs.push(scheduler.tick(tick));
        tick += 1;
        std::thread::sleep(interval);
    }
    log
}
