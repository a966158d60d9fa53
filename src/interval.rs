use anyhow::{Context, Result};
use rayon::prelude::*;
use std::sync::atomic::Ordering;

use crate::checker::{Checker, Witness};
use crate::progress::Progress;

/// Candidates are restricted to y ≡ 0 (mod 10): the equation taken mod 20
/// admits solutions only with 10 | y (and 10 | x, but x is derived rather
/// than scanned).
const RESIDUE_STEP: u128 = 10;

/// Scan [lo, hi) for a y with a solution, evaluating candidates in parallel
/// on the rayon pool.
///
/// Returns *some* solving y's witness, not necessarily the smallest — when
/// several workers hit simultaneously, whichever lands first wins. A checker
/// error from any worker aborts the scan with that error.
pub fn search<C: Checker>(
    lo: u128,
    hi: u128,
    checker: &C,
    progress: &Progress,
) -> Result<Option<Witness>> {
    let first = match lo.checked_next_multiple_of(RESIDUE_STEP) {
        Some(first) if first < hi => first,
        _ => return Ok(None),
    };
    let count = u64::try_from((hi - first).div_ceil(RESIDUE_STEP))
        .context("interval too wide to enumerate")?;

    (0..count)
        .into_par_iter()
        .map(|i| first + RESIDUE_STEP * i as u128)
        .map(|y| {
            progress.tested.fetch_add(1, Ordering::Relaxed);
            checker.check(y)
        })
        .find_map_any(|outcome| match outcome {
            Ok(Some(witness)) => Some(Ok(witness)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{PairingChecker, Witness};
    use crate::factor::RhoFactorizer;
    use anyhow::bail;
    use std::sync::Mutex;

    /// Records every y it is asked about; optionally "solves" a chosen y.
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

        fn seen_sorted(&self) -> Vec<u128> {
            let mut v = self.seen.lock().unwrap().clone();
            v.sort_unstable();
            v
        }
    }

    impl Checker for Recording {
        fn check(&self, y: u128) -> Result<Option<Witness>> {
            self.seen.lock().unwrap().push(y);
            Ok((self.solves == Some(y)).then_some(Witness { x: 1, y, z: 1 }))
        }
    }

    #[test]
    fn only_multiples_of_ten_are_evaluated() {
        let rec = Recording::new(None);
        let progress = Progress::new();
        let found = search(5, 25, &rec, &progress).unwrap();
        assert_eq!(found, None);
        assert_eq!(rec.seen_sorted(), vec![10, 20]);
        assert_eq!(progress.tested.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn bounds_are_half_open() {
        let rec = Recording::new(None);
        let progress = Progress::new();
        search(10, 30, &rec, &progress).unwrap();
        // 30 is excluded, 10 is included.
        assert_eq!(rec.seen_sorted(), vec![10, 20]);
    }

    #[test]
    fn empty_and_gap_intervals() {
        let rec = Recording::new(None);
        let progress = Progress::new();
        assert_eq!(search(15, 15, &rec, &progress).unwrap(), None);
        // No multiple of 10 inside [21, 29).
        assert_eq!(search(21, 29, &rec, &progress).unwrap(), None);
        assert!(rec.seen_sorted().is_empty());
    }

    #[test]
    fn witness_is_returned_when_a_candidate_solves() {
        let rec = Recording::new(Some(70));
        let progress = Progress::new();
        let found = search(0, 200, &rec, &progress).unwrap();
        assert_eq!(found.map(|w| w.y), Some(70));
    }

    struct Failing;

    impl Checker for Failing {
        fn check(&self, y: u128) -> Result<Option<Witness>> {
            bail!("factorizer gave up on y = {}", y)
        }
    }

    #[test]
    fn checker_errors_abort_the_scan() {
        let progress = Progress::new();
        assert!(search(0, 100, &Failing, &progress).is_err());
    }

    #[test]
    fn real_pipeline_finds_nothing_in_small_ranges() {
        let checker = PairingChecker::new(RhoFactorizer);
        let progress = Progress::new();
        assert_eq!(search(0, 110, &checker, &progress).unwrap(), None);
        // y = 0 is a candidate by residue but rejected by the checker.
        assert_eq!(progress.tested.load(Ordering::Relaxed), 11);
    }
}
