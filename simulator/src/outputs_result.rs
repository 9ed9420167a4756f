use lib::output_log::append_info_to_yaml;
use lib::usage::SystemUsage;
use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct RunResultInfo {
    ticks_run: usize,
    total_processes: usize,
    completed_processes: usize,
    all_completed: bool,
}

pub fn dump_run_result_to_file(
    file_path: &str,
    ticks_run: usize,
    total_processes: usize,
    completed_processes: usize,
) {
    let result_info = RunResultInfo {
        ticks_run,
        total_processes,
        completed_processes,
        all_completed: completed_processes == total_processes,
    };
    let yaml =
        serde_yaml::to_string(&result_info).expect("Failed to serialize run result to YAML");
    append_info_to_yaml(file_path, &yaml);
}

#[derive(Serialize, Deserialize)]
struct UsageSamples {
    usage_samples: Vec<SystemUsage>,
}

pub fn dump_usage_samples_to_file(file_path: &str, samples: Vec<SystemUsage>) {
    let usage_samples = UsageSamples {
        usage_samples: samples,
    };
    let yaml =
        serde_yaml::to_string(&usage_samples).expect("Failed to serialize usage samples to YAML");
    append_info_to_yaml(file_path, &yaml);
}
