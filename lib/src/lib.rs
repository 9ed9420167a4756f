pub mod output_log;
pub mod process;
pub mod registry;
pub mod scheduler;
pub mod usage;
pub mod workload_creator;
