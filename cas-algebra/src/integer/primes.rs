//! Prime sieve and bounded trial-division factorization.
//!
//! Factorization only divides by the primes in a [`PrimeTable`]. Whatever is left over after
//! dividing out every prime in the table is reported as the [`Factorization::remainder`], which
//! the simplification engine treats as an opaque factor.

use crate::error::ArgumentError;
use crate::primitive::int;
use once_cell::sync::Lazy;
use rug::Integer;
use std::collections::BTreeMap;
use tracing::debug;

/// Upper bound of the primes in the default table, [`PrimeTable::global`].
pub const DEFAULT_SIEVE_LIMIT: u32 = 1 << 24;

static GLOBAL_TABLE: Lazy<PrimeTable> = Lazy::new(|| PrimeTable::new(DEFAULT_SIEVE_LIMIT));

/// A fixed-size bit set marking the odd composite numbers found by the sieve.
struct OddComposites {
    words: Vec<u64>,
}

impl OddComposites {
    fn new(len: usize) -> Self {
        Self { words: vec![0; len.div_ceil(64)] }
    }

    /// Index of the odd number `n >= 3`.
    fn index(n: u64) -> usize {
        (n / 2 - 1) as usize
    }

    fn get(&self, n: u64) -> bool {
        let i = Self::index(n);
        self.words[i / 64] & (1 << (i % 64)) != 0
    }

    fn set(&mut self, n: u64) {
        let i = Self::index(n);
        self.words[i / 64] |= 1 << (i % 64);
    }
}

/// Returns every prime less than or equal to `limit`, in ascending order.
///
/// The sieve only stores odd numbers; 2 is always included when `limit >= 2`.
pub fn calculate_primes(limit: u32) -> Vec<u32> {
    if limit < 2 {
        return Vec::new();
    }

    let limit = limit as u64;
    let mut composites = OddComposites::new(((limit - 1) / 2) as usize);
    let mut primes = vec![2];

    let mut n = 3;
    while n <= limit {
        if !composites.get(n) {
            primes.push(n as u32);

            let mut multiple = n * n;
            while multiple <= limit {
                composites.set(multiple);
                multiple += 2 * n;
            }
        }
        n += 2;
    }

    primes
}

/// The result of factorizing an integer with a [`PrimeTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factorization {
    /// Each prime factor found in the table, mapped to its multiplicity.
    pub prime_factors: BTreeMap<u32, u32>,

    /// The cofactor left after dividing out every prime in the table. This is `1` if the number
    /// was fully factorized.
    pub remainder: Integer,
}

impl Factorization {
    /// Returns true if part of the number could not be factorized with the table.
    pub fn has_remainder(&self) -> bool {
        self.remainder != 1
    }
}

/// An immutable table of all the primes up to some limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeTable {
    limit: u32,
    primes: Vec<u32>,
}

impl PrimeTable {
    /// Builds a table of all primes up to and including `limit`.
    pub fn new(limit: u32) -> Self {
        let primes = calculate_primes(limit);
        debug!(limit, count = primes.len(), "built prime table");
        Self { limit, primes }
    }

    /// The process-wide table of primes up to [`DEFAULT_SIEVE_LIMIT`], built on first use.
    pub fn global() -> &'static Self {
        &GLOBAL_TABLE
    }

    /// The upper bound this table was built with.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// The primes in the table, in ascending order.
    pub fn primes(&self) -> &[u32] {
        &self.primes
    }

    /// Factorizes `n` by trial division with the primes in the table.
    ///
    /// Returns an error if `n <= 1`.
    pub fn factorize(&self, n: &Integer) -> Result<Factorization, ArgumentError> {
        if *n <= 1 {
            return Err(ArgumentError::NotFactorizable(n.clone()));
        }

        let mut prime_factors = BTreeMap::new();
        let mut remainder = n.clone();
        for &prime in &self.primes {
            if remainder == 1 {
                break;
            }

            // no prime factor below `prime` is left, so the remainder is itself prime
            let square = prime as u64 * prime as u64;
            if remainder < square {
                match remainder.to_u32() {
                    Some(last) if last <= self.limit => {
                        prime_factors.insert(last, 1);
                        remainder = int(1);
                    },
                    _ => {},
                }
                break;
            }

            let mut multiplicity = 0;
            while remainder.is_divisible_u(prime) {
                remainder.div_exact_u_mut(prime);
                multiplicity += 1;
            }
            if multiplicity > 0 {
                prime_factors.insert(prime, multiplicity);
            }
        }

        Ok(Factorization { prime_factors, remainder })
    }
}

/// Factorizes `n` using the process-wide [`PrimeTable`].
///
/// Returns an error if `n <= 1`.
pub fn factorize(n: &Integer) -> Result<Factorization, ArgumentError> {
    PrimeTable::global().factorize(n)
}
