//! Atomic scan-progress counters shared between rayon workers and the
//! background status reporter.
//!
//! `tested` and `found` are lock-free atomics updated from the parallel
//! candidate loop; `current` is a Mutex'd string describing the interval
//! being scanned (low contention — written once per chunk, not per
//! candidate). A dedicated reporter thread logs tested/found/rate every
//! 30 seconds until the `shutdown` flag is set.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

pub struct Progress {
    /// Candidates handed to the checker so far.
    pub tested: AtomicU64,
    /// Witnesses reported by the driver.
    pub found: AtomicU64,
    /// Human-readable description of the interval in flight.
    pub current: Mutex<String>,
    start: Instant,
    shutdown: AtomicBool,
}

impl Progress {
    pub fn new() -> Arc<Self> {
        Arc::new(Progress {
            tested: AtomicU64::new(0),
            found: AtomicU64::new(0),
            current: Mutex::new(String::new()),
            start: Instant::now(),
            shutdown: AtomicBool::new(false),
        })
    }

    pub fn start_reporter(self: &Arc<Self>) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        thread::spawn(move || loop {
            thread::sleep(Duration::from_secs(30));
            if progress.shutdown.load(Ordering::Relaxed) {
                break;
            }
            progress.print_status();
        })
    }

    pub fn print_status(&self) {
        let elapsed = self.start.elapsed();
        let tested = self.tested.load(Ordering::Relaxed);
        let found = self.found.load(Ordering::Relaxed);
        let current = self.current.lock().unwrap().clone();
        let rate = if elapsed.as_secs() > 0 {
            tested as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        let h = elapsed.as_secs() / 3600;
        let m = (elapsed.as_secs() % 3600) / 60;
        let s = elapsed.as_secs() % 60;
        info!(
            current = %current,
            tested,
            rate = format_args!("{:.2}", rate),
            found,
            elapsed = format_args!("{:02}:{:02}:{:02}", h, m, s),
            "scan progress"
        );
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
