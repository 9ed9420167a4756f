mod outputs_result;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use lib::output_log::create_allocation_log_yaml;
use lib::process::USAGE_INTERVAL;
use lib::registry::ProcessRegistry;
use lib::scheduler::{run_scheduler_loop, AllocationScheduler};
use lib::usage::run_usage_sampler;
use lib::workload_creator::load_workload_from_yaml;
use log::{info, warn};
use outputs_result::{dump_run_result_to_file, dump_usage_samples_to_file};

#[derive(Parser)]
#[clap(
    name = "Adaptive_Resource_Allocation_Simulator",
    version = "1.0",
    about = "About:
    Replays a workload of timed add/remove events against a shared process
    registry while the allocation scheduler ticks on a fixed cadence.
    CPU grants are capped at 100% and admitted memory at 2048 MB."
)]
struct ArgParser {
    ///Path to workload file.
    #[clap(short = 'f', long = "workload_file_path", required = true)]
    workload_file_path: String,
    ///Number of ticks to run before stopping.
    #[clap(short = 't', long = "tick_count", default_value = "60")]
    tick_count: usize,
    ///Tick interval in milliseconds.
    #[clap(short = 'i', long = "tick_interval_ms", default_value = "450")]
    tick_interval_ms: u64,
    ///Path to output directory.
    #[clap(short = 'o', long = "output_dir_path", default_value = "../outputs")]
    output_dir_path: String,
}

fn main() {
    env_logger::init();
    let arg: ArgParser = ArgParser::parse();
    let workload = load_workload_from_yaml(&arg.workload_file_path);
    let tick_interval = Duration::from_millis(arg.tick_interval_ms);

    let registry = ProcessRegistry::new();
    let stop = Arc::new(AtomicBool::new(false));

    let scheduler = AllocationScheduler::new(&registry);
    let scheduler_stop = stop.clone();
    let scheduler_handle =
        thread::spawn(move || run_scheduler_loop(scheduler, scheduler_stop, tick_interval));

    let sampler_registry = registry.clone();
    let sampler_stop = stop.clone();
    let sampler_handle =
        thread::spawn(move || run_usage_sampler(sampler_registry, sampler_stop, USAGE_INTERVAL));

    // Replay the workload as the external actor: adds and removes land on
    // their tick while the scheduler runs independently.
    let mut pending = workload.events.as_slice();
    let mut removals: Vec<(usize, u32)> = Vec::new();
    let mut total_processes = 0;
    for tick in 0..arg.tick_count {
        while let Some((event, rest)) = pending.split_first() {
            if event.arrival_tick() > tick {
                break;
            }
            match registry.add(event.name(), event.cpu_request(), event.mem_request()) {
                Some(id) => {
                    info!("tick {}: added {} as {}", tick, event.name(), id);
                    total_processes += 1;
                    if let Some(remove_after) = event.remove_after() {
                        removals.push((tick + remove_after, id));
                    }
                }
                None => warn!("tick {}: refused workload event", tick),
            }
            pending = rest;
        }
        removals.retain(|(remove_tick, id)| {
            if *remove_tick > tick {
                return true;
            }
            if registry.remove(*id) {
                info!("tick {}: removed {}", tick, id);
            }
            false
        });
        thread::sleep(tick_interval);
    }

    stop.store(true, Ordering::SeqCst);
    let scheduler_log = scheduler_handle.join().expect("Scheduler thread panicked");
    let usage_samples = sampler_handle.join().expect("Usage sampler thread panicked");

    let final_snapshot = registry.snapshot();
    let completed = final_snapshot.iter().filter(|p| p.is_completed()).count();
    info!(
        "run finished: {} ticks, {}/{} processes completed",
        scheduler_log.tick_logs.len(),
        completed,
        final_snapshot.len()
    );

    let file_path = create_allocation_log_yaml(&arg.output_dir_path);
    scheduler_log.dump_to_yaml(&file_path);
    dump_usage_samples_to_file(&file_path, usage_samples);
    dump_run_result_to_file(
        &file_path,
        scheduler_log.tick_logs.len(),
        total_processes,
        completed,
    );
}
