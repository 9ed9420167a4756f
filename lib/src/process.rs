//! This module contains the definition of a simulated process and the
//! configuration constants of the simulator
use std::time::Duration;

use serde_derive::{Deserialize, Serialize};

/// Total CPU share that can be granted per tick (%).
pub const CPU_CAPACITY: f32 = 100.0;
/// Total memory that admitted processes may occupy (MB).
pub const MEMORY_CAPACITY_MB: f32 = 2048.0;
/// First process id handed out by a fresh registry.
pub const BASE_PROCESS_ID: u32 = 1001;
/// Progress gained per allocated-CPU-percent per tick.
/// A fully granted process (100%) completes on its 14th tick.
pub const PROGRESS_RATE: f32 = 0.075;
/// Cadence of the scheduling tick.
pub const TICK_INTERVAL: Duration = Duration::from_millis(450);
/// Cadence of the system usage sampler.
pub const USAGE_INTERVAL: Duration = Duration::from_millis(500);

///enum to represent the four states of a simulated process
///not admitted for memory, admitted but not granted CPU, granted CPU, finished
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    #[default]
    Ready,
    Waiting,
    Running,
    Completed,
}

impl ProcessState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessState::Ready => "Ready",
            ProcessState::Waiting => "Waiting",
            ProcessState::Running => "Running",
            ProcessState::Completed => "Completed",
        }
    }
}

/// One simulated workload competing for CPU and memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub id: u32,
    pub name: String,
    pub cpu_request: f32,
    pub mem_request: f32,
    pub progress: f32,
    pub state: ProcessState,
    pub allocated_cpu: f32,
}

impl Process {
    pub fn new(id: u32, name: &str, cpu_request: f32, mem_request: f32) -> Self {
        Self {
            id,
            name: name.to_string(),
            cpu_request,
            mem_request,
            progress: 0.0,
            state: ProcessState::Ready,
            allocated_cpu: 0.0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == ProcessState::Completed
    }

    /// Memory shown as occupied: the full request while admitted, otherwise 0.
    pub fn mem_used(&self) -> f32 {
        match self.state {
            ProcessState::Ready | ProcessState::Running => self.mem_request,
            ProcessState::Waiting | ProcessState::Completed => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_new_default_params() {
        let process = Process::new(BASE_PROCESS_ID, "Process_1", 40.0, 512.0);
        assert_eq!(process.id, 1001);
        assert_eq!(process.name, "Process_1");
        assert_eq!(process.cpu_request, 40.0);
        assert_eq!(process.mem_request, 512.0);
        assert_eq!(process.progress, 0.0);
        assert_eq!(process.state, ProcessState::Ready);
        assert_eq!(process.allocated_cpu, 0.0);
    }

    #[test]
    fn test_process_state_as_str() {
        assert_eq!(ProcessState::Ready.as_str(), "Ready");
        assert_eq!(ProcessState::Waiting.as_str(), "Waiting");
        assert_eq!(ProcessState::Running.as_str(), "Running");
        assert_eq!(ProcessState::Completed.as_str(), "Completed");
    }

    #[test]
    fn test_process_mem_used_by_state() {
        let mut process = Process::new(BASE_PROCESS_ID, "Process_1", 40.0, 512.0);
        assert_eq!(process.mem_used(), 512.0);
        process.state = ProcessState::Running;
        assert_eq!(process.mem_used(), 512.0);
        process.state = ProcessState::Waiting;
        assert_eq!(process.mem_used(), 0.0);
        process.state = ProcessState::Completed;
        assert_eq!(process.mem_used(), 0.0);
    }
}
