// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Number-theory primitives used by key generation, encryption and signing.
//!
//! Everything here operates on arbitrary-precision integers and is
//! deterministic given its inputs. None of it is constant-time.

mod prime;

pub use prime::*;

use num_bigint_dig::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{Error, Result};

/// Greatest common divisor by the iterative Euclidean algorithm.
///
/// `gcd(a, 0) == a`.
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let mut a = a.clone();
    let mut b = b.clone();
    while !b.is_zero() {
        let r = &a % &b;
        a = std::mem::replace(&mut b, r);
    }
    a
}

/// Extended Euclidean algorithm.
///
/// Returns `(g, x, y)` with `a*x + b*y == g == gcd(a, b)`. The remainder
/// sequence stays unsigned; only the Bézout coefficients need a sign.
pub fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let (q, rem) = old_r.div_rem(&r);
        let q = BigInt::from_biguint(Sign::Plus, q);

        old_r = std::mem::replace(&mut r, rem);

        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);

        let next_t = &old_t - &q * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    (old_r, old_s, old_t)
}

/// Modular multiplicative inverse of `e` modulo `m`, normalized into `[0, m)`.
///
/// ## Error
///
/// Fails with [`Error::NoInverseExists`] when `gcd(e, m) != 1`, and with
/// [`Error::InvalidParameter`] for a zero modulus.
pub fn mod_inverse(e: &BigUint, m: &BigUint) -> Result<BigUint> {
    if m.is_zero() {
        return Err(Error::InvalidParameter("modulus must be non-zero".into()));
    }

    let (g, x, _) = extended_gcd(e, m);
    if !g.is_one() {
        return Err(Error::NoInverseExists);
    }

    let m = BigInt::from_biguint(Sign::Plus, m.clone());
    x.mod_floor(&m).to_biguint().ok_or(Error::NoInverseExists)
}

/// Square-and-multiply modular exponentiation: `base^exp mod modulus`.
///
/// `base` is reduced into `[0, modulus)` first and `exp == 0` yields
/// `1 mod modulus`.
pub fn power_mod(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::InvalidParameter("modulus must be non-zero".into()));
    }

    Ok(square_and_multiply(base, exp, modulus))
}

/// Square-and-multiply body of [`power_mod`]. `modulus` must be non-zero.
pub(crate) fn square_and_multiply(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    let mut result = BigUint::one() % modulus;
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        exp = exp >> 1usize;
        base = (&base * &base) % modulus;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn gcd_table() {
        let cases = [(48, 18, 6), (17, 5, 1), (0, 9, 9), (9, 0, 9), (0, 0, 0), (270, 192, 6)];
        for (a, b, g) in cases {
            assert_eq!(gcd(&big(a), &big(b)), big(g), "gcd({a}, {b})");
        }
    }

    #[test]
    fn extended_gcd_satisfies_bezout() {
        let cases = [(240u64, 46u64), (17, 3120), (3120, 17), (1, 1), (99, 78), (5, 0)];
        for (a, b) in cases {
            let (g, x, y) = extended_gcd(&big(a), &big(b));
            assert_eq!(g, gcd(&big(a), &big(b)));

            let lhs = BigInt::from(a) * &x + BigInt::from(b) * &y;
            assert_eq!(lhs, BigInt::from_biguint(Sign::Plus, g), "bezout for ({a}, {b})");
        }
    }

    #[test]
    fn extended_gcd_with_zero_first_argument() {
        let (g, x, y) = extended_gcd(&BigUint::zero(), &big(5));
        assert_eq!(g, big(5));
        assert_eq!(x, BigInt::zero());
        assert_eq!(y, BigInt::one());
    }

    #[test]
    fn mod_inverse_known_values() {
        assert_eq!(mod_inverse(&big(3), &big(11)).unwrap(), big(4));
        assert_eq!(mod_inverse(&big(17), &big(3120)).unwrap(), big(2753));
        assert_eq!(mod_inverse(&big(7), &big(40)).unwrap(), big(23));
    }

    #[test]
    fn mod_inverse_is_normalized() {
        // extended_gcd(10, 17) yields a negative coefficient
        let inv = mod_inverse(&big(10), &big(17)).unwrap();
        assert!(inv < big(17));
        assert_eq!((big(10) * &inv) % big(17), BigUint::one());
    }

    #[test]
    fn mod_inverse_fails_when_not_coprime() {
        assert_eq!(mod_inverse(&big(4), &big(8)), Err(Error::NoInverseExists));
        assert_eq!(mod_inverse(&big(6), &big(9)), Err(Error::NoInverseExists));
    }

    #[test]
    fn mod_inverse_rejects_zero_modulus() {
        assert!(matches!(
            mod_inverse(&big(3), &BigUint::zero()),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn power_mod_matches_modpow() {
        let cases = [(4u64, 13u64, 497u64), (2, 10, 1000), (65, 17, 3233), (2790, 2753, 3233)];
        for (b, e, m) in cases {
            assert_eq!(
                power_mod(&big(b), &big(e), &big(m)).unwrap(),
                big(b).modpow(&big(e), &big(m)),
                "{b}^{e} mod {m}"
            );
        }
        assert_eq!(power_mod(&big(4), &big(13), &big(497)).unwrap(), big(445));
    }

    #[test]
    fn power_mod_zero_exponent() {
        assert_eq!(power_mod(&big(12), &BigUint::zero(), &big(7)).unwrap(), BigUint::one());
        assert_eq!(power_mod(&big(12), &BigUint::zero(), &BigUint::one()).unwrap(), BigUint::zero());
    }

    #[test]
    fn power_mod_reduces_base() {
        assert_eq!(
            power_mod(&big(200), &big(3), &big(187)).unwrap(),
            power_mod(&big(13), &big(3), &big(187)).unwrap()
        );
    }

    #[test]
    fn square_and_multiply_agrees_with_power_mod() {
        for m in [1u64, 2, 187, 3233] {
            for b in [0u64, 1, 65, 2790, 5000] {
                assert_eq!(
                    square_and_multiply(&big(b), &big(2753), &big(m)),
                    power_mod(&big(b), &big(2753), &big(m)).unwrap(),
                    "{b}^2753 mod {m}"
                );
            }
        }
    }

    #[test]
    fn power_mod_rejects_zero_modulus() {
        assert!(matches!(
            power_mod(&big(2), &big(3), &BigUint::zero()),
            Err(Error::InvalidParameter(_))
        ));
    }
}
