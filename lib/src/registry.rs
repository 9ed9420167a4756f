//! Thread-safe process table shared between the scheduler, the usage
//! sampler, and the external actor adding and removing processes
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use log::warn;

use crate::process::{Process, ProcessState, BASE_PROCESS_ID};

/// Write-back record for one process after a scheduling tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessUpdate {
    pub id: u32,
    pub state: ProcessState,
    pub progress: f32,
    pub allocated_cpu: f32,
}

struct RegistryTable {
    // Ids are monotone, so id order is insertion order.
    processes: BTreeMap<u32, Process>,
    next_id: u32,
}

/// Handle to the shared process table. Cloning shares the same table.
///
/// Every operation takes the single internal lock for the duration of one
/// short table mutation or copy; no I/O and no nested locking happens while
/// it is held. Readers get copies, never live references.
#[derive(Clone)]
pub struct ProcessRegistry {
    table: Arc<Mutex<RegistryTable>>,
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(RegistryTable {
                processes: BTreeMap::new(),
                next_id: BASE_PROCESS_ID,
            })),
        }
    }

    ///return Option since the add boundary refuses empty names
    pub fn add(&self, name: &str, cpu_request: f32, mem_request: f32) -> Option<u32> {
        let name = name.trim();
        if name.is_empty() {
            warn!("Process name cannot be empty");
            return None;
        }
        let mut table = self.table.lock().unwrap();
        let id = table.next_id;
        table.next_id += 1;
        table
            .processes
            .insert(id, Process::new(id, name, cpu_request, mem_request));
        Some(id)
    }

    pub fn remove(&self, id: u32) -> bool {
        let mut table = self.table.lock().unwrap();
        if table.processes.remove(&id).is_none() {
            warn!("Process {} does not exist", id);
            return false;
        }
        true
    }

    /// Drops every process and restarts id assignment at the base value.
    pub fn clear(&self) {
        let mut table = self.table.lock().unwrap();
        table.processes.clear();
        table.next_id = BASE_PROCESS_ID;
    }

    /// Consistent copy of all processes in insertion order.
    pub fn snapshot(&self) -> Vec<Process> {
        let table = self.table.lock().unwrap();
        table.processes.values().cloned().collect()
    }

    /// Writes tick results back in one critical section.
    /// Updates for ids removed since the snapshot are dropped.
    pub fn apply_updates(&self, updates: &[ProcessUpdate]) {
        let mut table = self.table.lock().unwrap();
        for update in updates {
            if let Some(process) = table.processes.get_mut(&update.id) {
                process.state = update.state;
                process.progress = update.progress;
                process.allocated_cpu = update.allocated_cpu;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.table.lock().unwrap().processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
