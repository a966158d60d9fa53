//! Divisor enumeration from a prime factorization.

use crate::factor::Factorization;

/// All divisors of the number described by `f`, sorted ascending.
///
/// Starts from {1} and extends by each prime's powers p^1..p^e, multiplying
/// every previously known divisor (the Cartesian product over prime powers).
/// Prime order does not affect the result. The output length is exactly
/// ∏ (e_i + 1), and 1 and N are always present.
pub fn divisors(f: &Factorization) -> Vec<u128> {
    let mut divs: Vec<u128> = vec![1];
    for (&p, &e) in f {
        let known = divs.len();
        let mut power: u128 = 1;
        for _ in 0..e {
            power *= p;
            for i in 0..known {
                divs.push(divs[i] * power);
            }
        }
    }
    divs.sort_unstable();
    divs
}
