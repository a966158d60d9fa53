//! Prime factorization behind a trait boundary.
//!
//! The search core only consumes the `Factorizer` contract: a complete
//! prime → multiplicity map whose product reconstructs the input. The
//! default implementation does trial division by primes up to 997, then
//! splits what remains with Brent-cycle Pollard rho. Valid for inputs
//! below 2^127 (the modular arithmetic in `primality` needs one headroom
//! bit); the driver's range check keeps every y^4 + 1 well inside that.
//!
//! A factorizer that cannot split its input, or returns a multiset that
//! fails to reconstruct it, reports an error — the caller treats that as
//! fatal rather than as "no solution".

use std::collections::BTreeMap;

use anyhow::{bail, ensure, Result};

use crate::primality::{is_prime, mod_mul, PRIMES_TO_997};

/// Prime → multiplicity. Keys unique, multiplicities positive.
pub type Factorization = BTreeMap<u128, u32>;

/// The external-collaborator boundary: any correct factorization routine
/// satisfies this contract.
pub trait Factorizer: Send + Sync {
    fn factorize(&self, n: u128) -> Result<Factorization>;
}

/// Trial division + Pollard rho (Brent variant).
#[derive(Debug, Default, Clone, Copy)]
pub struct RhoFactorizer;

/// Distinct rho polynomials x^2 + c to try before giving up on a composite.
const RHO_RETRIES: u128 = 64;

impl Factorizer for RhoFactorizer {
    fn factorize(&self, n: u128) -> Result<Factorization> {
        ensure!(n > 0, "cannot factor 0");
        let mut factors = Factorization::new();
        let mut rest = n;

        for &p in &PRIMES_TO_997 {
            let p = p as u128;
            if p * p > rest {
                break;
            }
            while rest % p == 0 {
                *factors.entry(p).or_insert(0) += 1;
                rest /= p;
            }
        }
        if rest > 1 {
            split(rest, &mut factors)?;
        }

        let product = factors.iter().try_fold(1u128, |acc, (&p, &e)| {
            (0..e).try_fold(acc, |acc, _| acc.checked_mul(p))
        });
        ensure!(
            product == Some(n),
            "factor multiset of {} does not reconstruct it",
            n
        );
        Ok(factors)
    }
}

/// Recursively split a number with no prime factor below 997.
fn split(n: u128, factors: &mut Factorization) -> Result<()> {
    if n == 1 {
        return Ok(());
    }
    if is_prime(n) {
        *factors.entry(n).or_insert(0) += 1;
        return Ok(());
    }
    let d = pollard_rho(n)?;
    split(d, factors)?;
    split(n / d, factors)
}

/// Find a nontrivial divisor of an odd composite `n`.
fn pollard_rho(n: u128) -> Result<u128> {
    if n % 2 == 0 {
        return Ok(2);
    }
    for c in 1..=RHO_RETRIES {
        if let Some(d) = rho_cycle(n, c) {
            return Ok(d);
        }
    }
    bail!(
        "pollard rho failed to split {} after {} polynomial choices",
        n,
        RHO_RETRIES
    )
}

/// One Brent cycle with polynomial x^2 + c. Accumulates |x - y| products in
/// batches of 128 between gcd evaluations; on an overshoot (gcd == n) the
/// batch is replayed one step at a time from the saved position.
fn rho_cycle(n: u128, c: u128) -> Option<u128> {
    let mut x: u128 = c.wrapping_mul(6364136223846793005).wrapping_add(1) % n;
    let mut y = x;
    let mut saved = x;
    let mut q: u128 = 1;
    let mut r: u128 = 1;
    let mut d: u128 = 1;

    while d == 1 {
        x = y;
        for _ in 0..r {
            y = rho_step(y, c, n);
        }
        let mut k: u128 = 0;
        while k < r && d == 1 {
            saved = y;
            let batch = (r - k).min(128);
            for _ in 0..batch {
                y = rho_step(y, c, n);
                q = mod_mul(q, x.abs_diff(y), n);
            }
            d = gcd(q, n);
            k += batch;
        }
        r *= 2;
    }

    if d == n {
        loop {
            saved = rho_step(saved, c, n);
            d = gcd(x.abs_diff(saved), n);
            if d > 1 {
                break;
            }
        }
    }
    (d != n).then_some(d)
}

#[inline]
fn rho_step(y: u128, c: u128, n: u128) -> u128 {
    (mod_mul(y, y, n) + c) % n
}

/// Binary GCD.
pub fn gcd(mut a: u128, mut b: u128) -> u128 {
    if a == 0 {
        return b;
    }
    if b == 0 {
        return a;
    }
    let shift = (a | b).trailing_zeros();
    a >>= a.trailing_zeros();
    loop {
        b >>= b.trailing_zeros();
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        b -= a;
        if b == 0 {
            break;
        }
    }
    a << shift
}
