//! Background tick runner for autonomous simulation.
//!
//! Provides an optional push-based loop that advances the simulation
//! automatically. Pull-based ticks (the request layer calling
//! `WorldStateManager::tick`) can coexist safely because the manager
//! serialises all callers behind its lock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info};

use crate::world::WorldStateManager;

/// Errors from controlling the runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// `start` was called while the loop is already running.
    #[error("tick runner is already running")]
    AlreadyRunning,
}

/// Background thread that periodically advances the simulation.
pub struct TickRunner {
    world: Arc<WorldStateManager>,
    interval: Duration,
    delta_hours: f64,
    running: Arc<AtomicBool>,
    ticks_completed: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl TickRunner {
    /// Create a runner that ticks `world` by `delta_hours` every
    /// `interval` of real time.
    pub fn new(world: Arc<WorldStateManager>, interval: Duration, delta_hours: f64) -> Self {
        TickRunner {
            world,
            interval,
            delta_hours,
            running: Arc::new(AtomicBool::new(false)),
            ticks_completed: Arc::new(AtomicU64::new(0)),
            handle: None,
        }
    }

    /// Whether the background loop is currently running.
    pub fn running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Number of ticks completed since the last start.
    pub fn ticks_completed(&self) -> u64 {
        self.ticks_completed.load(Ordering::SeqCst)
    }

    /// Interval between ticks in real time.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the background tick loop.
    pub fn start(&mut self) -> Result<(), RunnerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(RunnerError::AlreadyRunning);
        }
        self.ticks_completed.store(0, Ordering::SeqCst);

        let world = Arc::clone(&self.world);
        let running = Arc::clone(&self.running);
        let completed = Arc::clone(&self.ticks_completed);
        let interval = self.interval;
        let delta_hours = self.delta_hours;

        self.handle = Some(std::thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                let result = world.tick(delta_hours);
                completed.fetch_add(1, Ordering::SeqCst);
                if result.events_pending > 10_000 {
                    error!(pending = result.events_pending, "event queue backlog growing");
                }
                std::thread::sleep(interval);
            }
        }));
        info!(
            interval_ms = self.interval.as_millis() as u64,
            delta_hours = self.delta_hours,
            "tick runner started"
        );
        Ok(())
    }

    /// Gracefully stop the background loop. Idempotent.
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        info!(ticks = self.ticks_completed(), "tick runner stopped");
    }
}

impl Drop for TickRunner {
    fn drop(&mut self) {
        self.stop();
    }
}
