//! Parallel search for integer solutions to x^4 + y^4 + 1 = z^2.
//!
//! For a fixed y, write Y = y^4 + 1. Any solution satisfies
//! z^2 - (x^2)^2 = Y, so a = z - x^2 and b = z + x^2 form a divisor pair
//! of Y with a <= b and matching parity, and conversely every such pair
//! with (b - a)/2 a perfect square yields a solution. The search therefore
//! reduces each candidate y to: factor Y, enumerate its divisors, and test
//! each pair up to sqrt(Y).
//!
//! Candidates themselves are pruned first: the equation taken mod 20 forces
//! 10 | y, so only one value in ten is ever factored. Candidates are
//! independent, and are evaluated in parallel within sequentially processed
//! chunks of the search range.

pub mod checker;
pub mod divisors;
pub mod driver;
pub mod factor;
pub mod interval;
pub mod primality;
pub mod progress;
pub mod square;

pub use checker::{Checker, PairingChecker, Witness};
pub use driver::SearchConfig;
pub use factor::{Factorization, Factorizer, RhoFactorizer};
pub use progress::Progress;
