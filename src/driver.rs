use std::sync::atomic::Ordering;

use anyhow::{ensure, Result};
use tracing::info;

use crate::checker::{Checker, Witness};
use crate::interval;
use crate::progress::Progress;

/// Largest supported search bound: the largest y with y^4 < 2^126, which
/// keeps y^4 + 1 and everything derived from it (divisors, z, x^2, the
/// factorizer's modular arithmetic) inside the exact 128-bit range.
pub const MAX_Y: u128 = 3_037_000_499;

pub const DEFAULT_Y_MAX: u128 = 1_000_000_000;
pub const DEFAULT_CHUNK_SIZE: u128 = 200_000;

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Candidates y are drawn from [0, y_max).
    pub y_max: u128,
    /// Width of each sequentially processed sub-range.
    pub chunk_size: u128,
}

impl SearchConfig {
    /// Range check from startup: raising y_max past MAX_Y would silently
    /// wrap y^4 + 1, so it is refused loudly instead.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.chunk_size > 0, "chunk size must be at least 1");
        ensure!(
            self.y_max <= MAX_Y,
            "y_max {} exceeds the supported bound {}: y^4 + 1 would leave \
             the exact 128-bit range",
            self.y_max,
            MAX_Y
        );
        Ok(())
    }
}

/// Sweep [0, y_max) in consecutive chunks, lowest first, halting the whole
/// search as soon as any chunk yields a witness.
///
/// Chunks are processed in ascending order. When several solutions exist the
/// reported one depends on this order (and on scheduling within a chunk), so
/// which witness comes back first is implementation-defined.
pub fn run<C: Checker>(
    config: &SearchConfig,
    checker: &C,
    progress: &Progress,
) -> Result<Option<Witness>> {
    config.validate()?;
    let mut lo: u128 = 0;
    while lo < config.y_max {
        let hi = lo.saturating_add(config.chunk_size).min(config.y_max);
        info!(lo = %lo, hi = %hi, "searching interval");
        *progress.current.lock().unwrap() = format!("y in [{}, {})", lo, hi);
        if let Some(witness) = interval::search(lo, hi, checker, progress)? {
            progress.found.fetch_add(1, Ordering::Relaxed);
            return Ok(Some(witness));
        }
        lo = hi;
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording {
        seen: Mutex<Vec<u128>>,
        solves: Option<u128>,
    }

    impl Recording {
        fn new(solves: Option<u128>) -> Self {
            Recording {
                seen: Mutex::new(Vec::new()),
                solves,
            }
        }
    }

    impl Checker for Recording {
        fn check(&self, y: u128) -> Result<Option<Witness>> {
            self.seen.lock().unwrap().push(y);
            Ok((self.solves == Some(y)).then_some(Witness { x: 0, y, z: 0 }))
        }
    }

    #[test]
    fn rejects_oversized_y_max() {
        let config = SearchConfig {
            y_max: MAX_Y + 1,
            chunk_size: DEFAULT_CHUNK_SIZE,
        };
        assert!(config.validate().is_err());
        assert!(SearchConfig {
            y_max: MAX_Y,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let config = SearchConfig {
            y_max: 100,
            chunk_size: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn exhaustion_scans_every_chunk() {
        let rec = Recording::new(None);
        let progress = Progress::new();
        let config = SearchConfig {
            y_max: 100,
            chunk_size: 30,
        };
        // Chunks [0,30) [30,60) [60,90) [90,100) — all must be visited.
        let outcome = run(&config, &rec, &progress).unwrap();
        assert_eq!(outcome, None);
        let mut seen = rec.seen.lock().unwrap().clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).map(|i| i * 10).collect::<Vec<u128>>());
        assert_eq!(progress.tested.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn halts_after_the_solving_chunk() {
        let rec = Recording::new(Some(50));
        let progress = Progress::new();
        let config = SearchConfig {
            y_max: 1_000,
            chunk_size: 30,
        };
        let witness = run(&config, &rec, &progress).unwrap().unwrap();
        assert_eq!(witness.y, 50);
        // Chunks past [30, 60) were never started.
        let seen = rec.seen.lock().unwrap().clone();
        assert!(seen.iter().all(|&y| y < 60), "scanned past the hit: {:?}", seen);
        assert_eq!(progress.found.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn chunk_size_larger_than_range() {
        let rec = Recording::new(None);
        let progress = Progress::new();
        let config = SearchConfig {
            y_max: 25,
            chunk_size: DEFAULT_CHUNK_SIZE,
        };
        assert_eq!(run(&config, &rec, &progress).unwrap(), None);
        assert_eq!(progress.tested.load(Ordering::Relaxed), 3); // 0, 10, 20
    }
}
