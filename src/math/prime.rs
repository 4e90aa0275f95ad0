// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prime testing and prime sampling for small, demonstration-sized keys.

use num_bigint_dig::prime::probably_prime;
use num_bigint_dig::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;

use crate::error::{Error, Result};

/// Smallest bit length for which `[2^(bits-1), 2^bits - 1]` contains two primes.
pub const MIN_PRIME_BITS: usize = 2;

/// Deterministic primality by trial division with odd divisors up to `⌊√n⌋`.
///
/// Exact for every input, but `O(√n)`: only suitable for the tiny primes
/// used by demonstration keys.
pub fn is_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    if *n == two {
        return true;
    }
    if n.is_even() {
        return false;
    }

    let limit = n.sqrt();
    let mut divisor = BigUint::from(3u32);
    while divisor <= limit {
        if (n % &divisor).is_zero() {
            return false;
        }
        divisor += 2u32;
    }
    true
}

/// Strategy used to decide whether a sampled candidate is prime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Primality {
    /// Exact trial division, see [`is_prime`].
    #[default]
    TrialDivision,

    /// Miller-Rabin with the given number of rounds. Never reports a prime
    /// as composite; a composite passes with probability at most `4^-rounds`.
    MillerRabin { rounds: usize },
}

impl Primality {
    pub fn test(&self, n: &BigUint) -> bool {
        match *self {
            Primality::TrialDivision => is_prime(n),
            Primality::MillerRabin { rounds } => probably_prime(n, rounds.max(1)),
        }
    }
}

/// Sample uniformly from `[2^(bits-1), 2^bits - 1]` until a prime is found.
///
/// ## Error
///
/// Fails with [`Error::InvalidParameter`] when `bits < 2`: such ranges hold
/// fewer than two primes and the search could never produce a usable pair.
pub fn generate_prime<R: Rng + ?Sized>(bits: usize, rng: &mut R) -> Result<BigUint> {
    generate_prime_with(bits, Primality::TrialDivision, rng)
}

/// Same as [`generate_prime`] with an explicit primality strategy.
pub fn generate_prime_with<R: Rng + ?Sized>(
    bits: usize,
    primality: Primality,
    rng: &mut R,
) -> Result<BigUint> {
    if bits < MIN_PRIME_BITS {
        return Err(Error::InvalidParameter(format!(
            "prime bit length must be at least {MIN_PRIME_BITS}, got {bits}"
        )));
    }

    let low = BigUint::one() << (bits - 1);
    let high = BigUint::one() << bits;

    loop {
        let candidate = rng.gen_biguint_range(&low, &high);
        if primality.test(&candidate) {
            tracing::trace!(%candidate, bits, "sampled prime");
            return Ok(candidate);
        }
    }
}
