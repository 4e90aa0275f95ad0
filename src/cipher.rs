// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Textbook (unpadded, deterministic) RSA encryption.
//!
//! Strings are split into one unit per `char`, using the Unicode scalar value
//! as the integer. Each unit is encrypted on its own, so equal characters
//! always encrypt to equal ciphertext units.

use num_bigint_dig::BigUint;
use num_traits::ToPrimitive;

use crate::ciphertext::Ciphertext;
use crate::error::{Error, Result};
use crate::key::{KeyPair, PrivateKey, PublicKey};
use crate::math;

/// Map each `char` of `message` to its Unicode scalar value.
pub fn encode_str(message: &str) -> Vec<BigUint> {
    message.chars().map(|c| BigUint::from(u32::from(c))).collect()
}

/// Inverse of [`encode_str`].
///
/// ## Error
///
/// Fails with [`Error::InvalidCodepoint`] on a unit that is not a Unicode
/// scalar value.
pub fn decode_units(units: &[BigUint]) -> Result<String> {
    units
        .iter()
        .map(|unit| {
            unit.to_u32()
                .and_then(char::from_u32)
                .ok_or_else(|| Error::InvalidCodepoint(unit.clone()))
        })
        .collect()
}

/// Encrypts integer units under a public key.
pub trait Encrypt {
    /// Encrypt one unit: `c = m^e mod n`.
    ///
    /// ## Error
    ///
    /// Fails with [`Error::MessageTooLarge`] if `m >= n`. Oversized units are
    /// never truncated or reduced.
    fn encrypt_unit(&self, m: &BigUint) -> Result<BigUint>;

    /// Encrypt every unit in order. Fails on the first unit that does not fit.
    fn encrypt(&self, units: &[BigUint]) -> Result<Ciphertext> {
        units.iter().map(|m| self.encrypt_unit(m)).collect()
    }

    /// Encrypt a non-empty string, one unit per character.
    fn encrypt_str(&self, message: &str) -> Result<Ciphertext> {
        if message.is_empty() {
            return Err(Error::InvalidParameter("message must not be empty".into()));
        }
        self.encrypt(&encode_str(message))
    }
}

/// Decrypts ciphertext units with a private key.
pub trait Decrypt {
    /// Decrypt one unit: `m = c^d mod n`.
    ///
    /// ## Error
    ///
    /// Fails with [`Error::InvalidCiphertext`] if `c >= n`.
    fn decrypt_unit(&self, c: &BigUint) -> Result<BigUint>;

    /// Decrypt every unit in order.
    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Vec<BigUint>> {
        ciphertext.iter().map(|c| self.decrypt_unit(c)).collect()
    }

    /// Decrypt and map the recovered units back to characters.
    fn decrypt_str(&self, ciphertext: &Ciphertext) -> Result<String> {
        decode_units(&self.decrypt(ciphertext)?)
    }
}

impl Encrypt for PublicKey {
    fn encrypt_unit(&self, m: &BigUint) -> Result<BigUint> {
        if m >= self.n() {
            return Err(Error::MessageTooLarge {
                unit: m.clone(),
                modulus: self.n().clone(),
            });
        }

        let c = math::power_mod(m, self.e(), self.n())?;
        tracing::trace!(%m, %c, "encrypted unit");
        Ok(c)
    }
}

impl Decrypt for PrivateKey {
    fn decrypt_unit(&self, c: &BigUint) -> Result<BigUint> {
        if c >= self.n() {
            return Err(Error::InvalidCiphertext {
                unit: c.clone(),
                modulus: self.n().clone(),
            });
        }

        let m = math::power_mod(c, self.d(), self.n())?;
        tracing::trace!(%c, %m, "decrypted unit");
        Ok(m)
    }
}

impl Encrypt for KeyPair {
    fn encrypt_unit(&self, m: &BigUint) -> Result<BigUint> {
        self.public_key().encrypt_unit(m)
    }
}

impl Decrypt for KeyPair {
    fn decrypt_unit(&self, c: &BigUint) -> Result<BigUint> {
        self.private_key().decrypt_unit(c)
    }
}
