//! Core-pinned task spawning for the ESP32 dual-core.
//!
//! Wraps `esp_pthread_set_cfg()` so that `std::thread::spawn` creates a
//! FreeRTOS task pinned to a specific CPU core with explicit priority
//! and stack size. On non-ESP targets, falls back to a plain named thread.
//!
//! # ESP-IDF Threading Model
//!
//! ESP-IDF implements `std::thread` via pthreads, which are thin wrappers
//! around FreeRTOS tasks. `esp_pthread_set_cfg()` sets thread-local
//! configuration that applies to the *next* `pthread_create()` call from
//! the calling thread, so all tasks are spawned from `main` in sequence.

use std::thread::JoinHandle;

use log::info;

use crate::config::TaskSpec;
use crate::error::InitError;
use crate::health::TaskId;

/// CPU core identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU).
    Pro = 0,
    /// Core 1 (APP_CPU).
    App = 1,
}

/// Spawn `f` as the FreeRTOS task for `task`.
#[cfg(target_os = "espidf")]
pub fn spawn_task(
    task: TaskId,
    spec: TaskSpec,
    core: Core,
    f: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>, InitError> {
    unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = core as i32;
        cfg.prio = spec.priority as i32;
        cfg.stack_size = (spec.stack_kb * 1024) as i32;
        cfg.thread_name = task.c_name().as_ptr();
        let ret = esp_idf_sys::esp_pthread_set_cfg(&cfg);
        if ret != esp_idf_sys::ESP_OK as i32 {
            log::error!("esp_pthread_set_cfg failed for {task}: {ret}");
            return Err(InitError::Spawn);
        }
    }

    info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        task, core, spec.priority, spec.stack_kb
    );

    std::thread::Builder::new()
        .name(task.name().into())
        .spawn(f)
        .map_err(|_| InitError::Spawn)
}

/// Simulation fallback: ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_task(
    task: TaskId,
    spec: TaskSpec,
    _core: Core,
    f: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>, InitError> {
    info!(
        "Spawning '{}' (sim, no core pinning, stack={}KB)",
        task, spec.stack_kb
    );

    std::thread::Builder::new()
        .name(task.name().into())
        .stack_size(spec.stack_kb * 1024)
        .spawn(f)
        .map_err(|_| InitError::Spawn)
}
