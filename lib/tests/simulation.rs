//! End-to-end runs of the scheduler loop against a registry mutated by a
//! concurrent actor, checking the capacity invariants on every tick.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lib::process::{ProcessState, CPU_CAPACITY, MEMORY_CAPACITY_MB};
use lib::registry::ProcessRegistry;
use lib::scheduler::{run_scheduler_loop, AllocationScheduler};
use lib::usage::system_usage;

#[test]
fn test_caps_hold_under_concurrent_add_and_remove() {
    let registry = ProcessRegistry::new();
    let scheduler = AllocationScheduler::new(&registry);
    let stop = Arc::new(AtomicBool::new(false));

    let loop_stop = stop.clone();
    let handle = std::thread::spawn(move || {
        run_scheduler_loop(scheduler, loop_stop, Duration::from_millis(2))
    });

    // The actor churns the table while the scheduler ticks.
    let mut ids = Vec::new();
    for index in 0..20 {
        let id = registry
            .add(&format!("Process_{}", index + 1), 30.0, 600.0)
            .unwrap();
        ids.push(id);
        if index % 3 == 0 {
            registry.remove(ids[index / 3]);
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    std::thread::sleep(Duration::from_millis(20));
    stop.store(true, Ordering::SeqCst);
    let log = handle.join().unwrap();

    assert!(!log.tick_logs.is_empty());
    for tick_log in &log.tick_logs {
        let granted: f32 = tick_log
            .rows
            .iter()
            .filter(|row| row.state == "Running")
            .map(|row| row.allocated_cpu)
            .sum();
        let occupied: f32 = tick_log.rows.iter().map(|row| row.mem_used).sum();
        assert!(granted <= CPU_CAPACITY);
        assert!(occupied <= MEMORY_CAPACITY_MB);
        assert!(tick_log.usage.cpu_percent <= 100.0);
        assert!(tick_log.usage.mem_percent <= 100.0);
    }
}

#[test]
fn test_completed_process_frees_capacity_for_waiting_one() {
    let registry = ProcessRegistry::new();
    registry.add("Process_1", 100.0, 1500.0).unwrap();
    registry.add("Process_2", 100.0, 1500.0).unwrap();
    let scheduler = AllocationScheduler::new(&registry);

    // Process_1 monopolizes both resources until it completes on tick 14,
    // then Process_2 gets admitted and granted.
    let mut tick = 0;
    while !registry.snapshot()[0].is_completed() {
        scheduler.tick(tick);
        tick += 1;
        assert!(tick <= 14);
        if !registry.snapshot()[0].is_completed() {
            assert_eq!(registry.snapshot()[1].state, ProcessState::Waiting);
        }
    }
    scheduler.tick(tick);
    let snapshot = registry.snapshot();
    assert_eq!(snapshot[1].state, ProcessState::Running);
    assert_eq!(snapshot[1].allocated_cpu, 100.0);

    let usage = system_usage(&snapshot);
    assert_eq!(usage.cpu_percent, 100.0);
    assert!((usage.mem_percent - 1500.0 / 2048.0 * 100.0).abs() < 1e-3);
}
