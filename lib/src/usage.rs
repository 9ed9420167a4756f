//! Aggregate CPU and memory usage derived from the process table
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_derive::{Deserialize, Serialize};

use crate::process::{Process, ProcessState, CPU_CAPACITY, MEMORY_CAPACITY_MB};
use crate::registry::ProcessRegistry;

/// System-wide usage figures, both already capped to [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemUsage {
    pub cpu_percent: f32,
    pub mem_percent: f32,
}

/// Pure reduction over a snapshot: granted CPU over Running processes and
/// occupied memory over Ready and Running ones, as capped percentages.
pub fn system_usage(snapshot: &[Process]) -> SystemUsage {
    let total_cpu: f32 = snapshot
        .iter()
        .filter(|p| p.state == ProcessState::Running)
        .map(|p| p.allocated_cpu)
        .sum();
    let total_mem: f32 = snapshot.iter().map(|p| p.mem_used()).sum();
    SystemUsage {
        cpu_percent: total_cpu.min(CPU_CAPACITY),
        mem_percent: (total_mem / MEMORY_CAPACITY_MB * 100.0).min(100.0),
    }
}

/// Periodic independent read of the registry, recording one sample per
/// interval until the stop flag is raised.
pub fn run_usage_sampler(
    registry: ProcessRegistry,
    stop: Arc<AtomicBool>,
    interval: Duration,
) -> Vec<SystemUsage> {
    let mut samples = Vec::new();
    while !stop.load(Ordering::SeqCst) {
        samples.push(system_usage(&registry.snapshot()));
        std::thread::sleep(interval);
    }
    samples
}
