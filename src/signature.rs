// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hash-then-sign signatures over SHA-256.
//!
//! ## Security
//!
//! The 256-bit digest is reduced modulo `n` whenever it does not fit, on both
//! the signing and the verifying side. With demonstration-sized moduli this
//! throws away most of the digest, so collisions are trivial to find. No
//! padding is applied.

use num_bigint_dig::BigUint;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::key::{KeyPair, PrivateKey, PublicKey};
use crate::math;

/// SHA-256 digest of a message, as hex and as a big-endian integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageDigest {
    hex: String,
    #[serde(rename = "int", with = "crate::serde_decimal")]
    value: BigUint,
}

impl MessageDigest {
    /// Hash `message` with SHA-256.
    pub fn of<M: AsRef<[u8]>>(message: M) -> Self {
        let digest = Sha256::digest(message.as_ref());
        let hex = hex::encode(digest);
        let value = BigUint::from_bytes_be(&digest);
        tracing::trace!(%hex, "hashed message");

        Self { hex, value }
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Number of hex characters (64 for SHA-256).
    pub fn hex_len(&self) -> usize {
        self.hex.len()
    }

    /// The digest as used under modulus `n`: `h` itself when `h < n`, else `h mod n`.
    pub fn reduced(&self, n: &BigUint) -> BigUint {
        if &self.value >= n {
            &self.value % n
        } else {
            self.value.clone()
        }
    }
}

/// A signature value `s` with `0 <= s < n`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature {
    #[serde(with = "crate::serde_decimal")]
    value: BigUint,
}

impl Signature {
    pub fn new(value: BigUint) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }
}

impl From<BigUint> for Signature {
    fn from(value: BigUint) -> Self {
        Self::new(value)
    }
}

/// Everything computed while producing a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signing {
    pub signature: Signature,
    pub digest: MessageDigest,
    /// The reduced digest that was actually exponentiated.
    #[serde(with = "crate::serde_decimal")]
    pub signed_hash: BigUint,
}

/// Everything computed while checking a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub is_valid: bool,
    pub digest: MessageDigest,
    /// Reduced digest recomputed from the presented message.
    #[serde(with = "crate::serde_decimal")]
    pub computed_hash: BigUint,
    /// `s^e mod n`.
    #[serde(with = "crate::serde_decimal")]
    pub recovered_hash: BigUint,
}

/// Produces signatures with a private exponent.
pub trait Sign {
    /// Sign `message`, returning the signature with its intermediate values.
    ///
    /// ## Error
    ///
    /// Fails with [`Error::InvalidParameter`] on an empty message.
    fn sign_detailed<M: AsRef<[u8]>>(&self, message: M) -> Result<Signing>;

    /// Sign `message`: `s = h^d mod n`.
    fn sign<M: AsRef<[u8]>>(&self, message: M) -> Result<Signature> {
        self.sign_detailed(message).map(|signing| signing.signature)
    }
}

/// Checks signatures with a public exponent.
pub trait Verify {
    /// Recompute the digest of `message` and compare it to `s^e mod n`.
    ///
    /// Never fails: an empty message or an out-of-range signature simply
    /// does not verify.
    fn verify_detailed<M: AsRef<[u8]>>(&self, message: M, signature: &Signature) -> Verification;

    fn verify<M: AsRef<[u8]>>(&self, message: M, signature: &Signature) -> bool {
        self.verify_detailed(message, signature).is_valid
    }
}

impl Sign for PrivateKey {
    fn sign_detailed<M: AsRef<[u8]>>(&self, message: M) -> Result<Signing> {
        let message = message.as_ref();
        if message.is_empty() {
            return Err(Error::InvalidParameter("message must not be empty".into()));
        }

        let digest = MessageDigest::of(message);
        let signed_hash = digest.reduced(self.n());
        let s = math::power_mod(&signed_hash, self.d(), self.n())?;
        tracing::debug!(hash = %digest.hex(), %signed_hash, signature = %s, "signed message");

        Ok(Signing {
            signature: Signature::new(s),
            digest,
            signed_hash,
        })
    }
}

impl Verify for PublicKey {
    fn verify_detailed<M: AsRef<[u8]>>(&self, message: M, signature: &Signature) -> Verification {
        let message = message.as_ref();
        let digest = MessageDigest::of(message);
        let computed_hash = digest.reduced(self.n());

        let recovered_hash = math::square_and_multiply(signature.value(), self.e(), self.n());

        let is_valid = !message.is_empty()
            && signature.value() < self.n()
            && computed_hash == recovered_hash;
        tracing::debug!(%computed_hash, %recovered_hash, is_valid, "verified signature");

        Verification {
            is_valid,
            digest,
            computed_hash,
            recovered_hash,
        }
    }
}

impl Sign for KeyPair {
    fn sign_detailed<M: AsRef<[u8]>>(&self, message: M) -> Result<Signing> {
        self.private_key().sign_detailed(message)
    }
}

impl Verify for KeyPair {
    fn verify_detailed<M: AsRef<[u8]>>(&self, message: M, signature: &Signature) -> Verification {
        self.public_key().verify_detailed(message, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyPairBuilder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_keypair(bits: usize, seed: u64) -> KeyPair {
        KeyPairBuilder::new()
            .bit_length(bits)
            .build_with_rng(&mut StdRng::seed_from_u64(seed))
            .unwrap()
    }

    #[test]
    fn digest_matches_sha256_vector() {
        let digest = MessageDigest::of("abc");
        assert_eq!(
            digest.hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(digest.hex_len(), 64);
        assert_eq!(
            digest.value(),
            &BigUint::parse_bytes(digest.hex().as_bytes(), 16).unwrap()
        );
    }

    #[test]
    fn digest_reduction() {
        let digest = MessageDigest::of("Hello");
        let n = BigUint::from(3233u32);
        assert_eq!(digest.reduced(&n), digest.value() % &n);

        let huge = digest.value() + 1u32;
        assert_eq!(&digest.reduced(&huge), digest.value());
    }

    #[test]
    fn sign_verify_roundtrip() {
        let mut rng = StdRng::seed_from_u64(31);
        for bits in [4usize, 8, 10, 16] {
            let keypair = KeyPairBuilder::new().bit_length(bits).build_with_rng(&mut rng).unwrap();
            for message in ["Hello", "Hello, Bob!", "a", "署名", "The quick brown fox"] {
                let signature = keypair.private_key().sign(message).unwrap();
                assert!(signature.value() < keypair.public_key().n());
                assert!(keypair.public_key().verify(message, &signature), "{message} @ {bits}");
            }
        }
    }

    #[test]
    fn signing_is_deterministic() {
        let keypair = seeded_keypair(10, 4);
        let a = keypair.sign("same message").unwrap();
        let b = keypair.sign("same message").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tampered_message_fails() {
        // wide enough primes that the reduced digest keeps ~64 bits
        let keypair = seeded_keypair(32, 12);
        let signature = keypair.sign("Transfer 100 to Bob").unwrap();

        assert!(keypair.verify("Transfer 100 to Bob", &signature));
        assert!(!keypair.verify("Transfer 900 to Bob", &signature));
        assert!(!keypair.verify("transfer 100 to Bob", &signature));
    }

    #[test]
    fn mismatched_key_fails() {
        let alice = seeded_keypair(32, 1);
        let bob = seeded_keypair(32, 2);

        let signature = alice.sign("from alice").unwrap();
        assert!(alice.verify("from alice", &signature));
        assert!(!bob.verify("from alice", &signature));
    }

    #[test]
    fn detailed_values_line_up() {
        let keypair = seeded_keypair(10, 6);
        let signing = keypair.sign_detailed("Hello").unwrap();
        let n = keypair.public_key().n();

        assert_eq!(signing.digest, MessageDigest::of("Hello"));
        assert_eq!(signing.signed_hash, signing.digest.reduced(n));

        let verification = keypair.verify_detailed("Hello", &signing.signature);
        assert!(verification.is_valid);
        assert_eq!(verification.computed_hash, signing.signed_hash);
        assert_eq!(verification.recovered_hash, signing.signed_hash);
    }

    #[test]
    fn out_of_range_signature_is_invalid() {
        let keypair = seeded_keypair(10, 7);
        let n = keypair.public_key().n().clone();
        let signature = keypair.sign("Hello").unwrap();

        // s + n recovers the same hash but lies outside [0, n)
        let shifted = Signature::new(signature.value() + &n);
        assert!(!keypair.verify("Hello", &shifted));
    }

    #[test]
    fn empty_message() {
        let keypair = seeded_keypair(10, 8);
        assert!(matches!(keypair.sign(""), Err(Error::InvalidParameter(_))));

        let signature = Signature::new(BigUint::from(1u32));
        assert!(!keypair.verify("", &signature));
    }

    #[test]
    fn signature_serializes_as_decimal() {
        let signature = Signature::new(BigUint::from(2790u32));
        let json = serde_json::to_string(&signature).unwrap();
        assert_eq!(json, r#""2790""#);
        assert_eq!(serde_json::from_str::<Signature>(&json).unwrap(), signature);
    }
}
