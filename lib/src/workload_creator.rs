//! Generate a workload (timed add/remove events) from a yaml file
use std::fs;

use getset::{CopyGetters, Getters};
use serde_derive::{Deserialize, Serialize};

fn default_cpu_request() -> f32 {
    10.0
}

fn default_mem_request() -> f32 {
    256.0
}

/// One process entering the simulation, optionally leaving it again.
#[derive(Clone, Serialize, Deserialize, Getters, CopyGetters)]
pub struct WorkloadEvent {
    #[getset(get = "pub")]
    name: String,
    #[serde(default = "default_cpu_request")]
    #[getset(get_copy = "pub")]
    cpu_request: f32,
    #[serde(default = "default_mem_request")]
    #[getset(get_copy = "pub")]
    mem_request: f32,
    /// Tick at which the process is added.
    #[serde(default)]
    #[getset(get_copy = "pub")]
    arrival_tick: usize,
    /// Ticks after arrival before the process is removed again.
    #[serde(default)]
    #[getset(get_copy = "pub")]
    remove_after: Option<usize>,
}

impl WorkloadEvent {
    pub fn new(
        name: &str,
        cpu_request: f32,
        mem_request: f32,
        arrival_tick: usize,
        remove_after: Option<usize>,
    ) -> Self {
        Self {
            name: name.to_string(),
            cpu_request,
            mem_request,
            arrival_tick,
            remove_after,
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Workload {
    pub events: Vec<WorkloadEvent>,
}

/// load yaml file and return the workload events for one run
///
/// # Arguments
///
/// *  `file_path` - yaml file path
///
/// # Returns
///
/// *  `workload` - events sorted by arrival tick
pub fn load_workload_from_yaml(file_path: &str) -> Workload {
    if !file_path.ends_with(".yaml") && !file_path.ends_with(".yml") {
        panic!("Invalid file type: {}", file_path);
    }
    let file_content = fs::read_to_string(file_path).unwrap();
    let mut workload: Workload =
        serde_yaml::from_str(&file_content).expect("Failed to parse workload YAML");
    workload.events.sort_by_key(|event| event.arrival_tick());
    workload
}
