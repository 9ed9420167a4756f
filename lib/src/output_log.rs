//! YAML run logs: per-tick process rows plus the configuration surface
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde_derive::{Deserialize, Serialize};

use crate::process::{
    Process, BASE_PROCESS_ID, CPU_CAPACITY, MEMORY_CAPACITY_MB, PROGRESS_RATE, TICK_INTERVAL,
};
use crate::usage::SystemUsage;

/// The constant configuration surface of one run.
#[derive(Clone, Serialize, Deserialize)]
pub struct SimulatorInfo {
    pub cpu_capacity: f32,
    pub memory_capacity_mb: f32,
    pub base_process_id: u32,
    pub progress_rate: f32,
    pub tick_interval_ms: u64,
}

impl Default for SimulatorInfo {
    fn default() -> Self {
        Self::with_tick_interval(TICK_INTERVAL)
    }
}

impl SimulatorInfo {
    pub fn with_tick_interval(tick_interval: Duration) -> Self {
        Self {
            cpu_capacity: CPU_CAPACITY,
            memory_capacity_mb: MEMORY_CAPACITY_MB,
            base_process_id: BASE_PROCESS_ID,
            progress_rate: PROGRESS_RATE,
            tick_interval_ms: tick_interval.as_millis() as u64,
        }
    }
}

/// Tick output for one process, in display form.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProcessRow {
    pub id: u32,
    pub name: String,
    pub requested_cpu: f32,
    pub allocated_cpu: f32,
    pub requested_mem: f32,
    pub mem_used: f32,
    pub progress: f32,
    pub state: String,
}

impl ProcessRow {
    pub fn new(process: &Process) -> Self {
        Self {
            id: process.id,
            name: process.name.clone(),
            requested_cpu: process.cpu_request,
            allocated_cpu: process.allocated_cpu,
            requested_mem: process.mem_request,
            mem_used: process.mem_used(),
            progress: process.progress,
            state: process.state.as_str().to_string(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TickLog {
    pub tick: usize,
    pub rows: Vec<ProcessRow>,
    pub usage: SystemUsage,
}

/// Everything recorded over one run of the scheduler loop.
#[derive(Clone, Serialize, Deserialize)]
pub struct SchedulerLog {
    pub simulator_info: SimulatorInfo,
    pub tick_logs: Vec<TickLog>,
}

impl SchedulerLog {
    pub fn new(simulator_info: SimulatorInfo) -> Self {
        Self {
            simulator_info,
            tick_logs: Vec::new(),
        }
    }

    pub fn dump_to_yaml(&self, file_path: &str) {
        let yaml =
            serde_yaml::to_string(self).expect("Failed to serialize SchedulerLog to YAML");
        append_info_to_yaml(file_path, &yaml);
    }
}

pub fn create_yaml_file(folder_path: &str, file_name: &str) -> String {
    if fs::metadata(folder_path).is_err() {
        let _ = fs::create_dir_all(folder_path);
        info!("Created folder: {}", folder_path);
    }
    let file_path = format!("{}/{}.yaml", folder_path, file_name);
    if let Err(err) = fs::File::create(&file_path) {
        warn!("Failed to create file: {}", err);
    }
    file_path
}

pub fn append_info_to_yaml(file_path: &str, info: &str) {
    if let Ok(mut file) = OpenOptions::new()
        .write(true)
        .append(true)
        .create(true)
        .open(file_path)
    {
        if let Err(err) = file.write_all(info.as_bytes()) {
            eprintln!("Failed to write to file: {}", err);
        }
    } else {
        eprintln!("Failed to open file: {}", file_path);
    }
}

/// Creates `<dir>/<utc-timestamp>-allocation-log.yaml` and returns its path.
pub fn create_allocation_log_yaml(dir_path: &str) -> String {
    let now: DateTime<Utc> = Utc::now();
    let date = now.format("%Y-%m-%d-%H-%M-%S").to_string();
    let file_name = format!("{}-allocation-log", date);
    create_yaml_file(dir_path, &file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessState;

    #[test]
    fn test_process_row_display_values() {
        let mut process = Process::new(BASE_PROCESS_ID, "Process_1", 70.0, 512.0);
        process.state = ProcessState::Waiting;
        let row = ProcessRow::new(&process);
        assert_eq!(row.id, 1001);
        assert_eq!(row.requested_mem, 512.0);
        assert_eq!(row.mem_used, 0.0);
        assert_eq!(row.allocated_cpu, 0.0);
        assert_eq!(row.state, "Waiting");
    }

    #[test]
    fn test_scheduler_log_yaml_round_trip() {
        let mut log = SchedulerLog::new(SimulatorInfo::default());
        let process = Process::new(BASE_PROCESS_ID, "Process_1", 40.0, 256.0);
        log.tick_logs.push(TickLog {
            tick: 0,
            rows: vec![ProcessRow::new(&process)],
            usage: SystemUsage {
                cpu_percent: 40.0,
                mem_percent: 12.5,
            },
        });
        let yaml = serde_yaml::to_string(&log).unwrap();
        let parsed: SchedulerLog = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.simulator_info.base_process_id, BASE_PROCESS_ID);
        assert_eq!(parsed.tick_logs.len(), 1);
        assert_eq!(parsed.tick_logs[0].rows[0].name, "Process_1");
        assert_eq!(parsed.tick_logs[0].usage.mem_percent, 12.5);
    }
}
