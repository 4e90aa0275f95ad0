// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Username-addressed operations for a delivery layer (HTTP handlers, CLI).
//!
//! Every result is a plain serializable report; big integers render as
//! decimal strings.

use std::fmt;

use num_bigint_dig::BigUint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::cipher::{Decrypt, Encrypt};
use crate::ciphertext::Ciphertext;
use crate::error::{Error, Result};
use crate::key::{KeyDiagnostics, KeyPairBuilder, PrivateKey, PublicKey};
use crate::registry::KeyRegistry;
use crate::signature::{Sign, Signature, Verify};

/// Outcome of generating and registering a key pair.
#[derive(Debug, Clone, Serialize)]
pub struct KeyGeneration {
    pub username: String,
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
    pub key_generation_details: KeyDiagnostics,
}

/// Entry of [`SecureMessaging::list_users`]. Carries no private material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub username: String,
    pub public_key: PublicKey,
}

/// Per-user inspection view. The private exponent is never included.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetails {
    pub username: String,
    pub public_key: PublicKey,
    pub has_private_key: bool,
    pub key_details: Factorization,
}

/// Factors of a registered modulus, for display.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct Factorization {
    #[serde(with = "crate::serde_decimal")]
    pub p: BigUint,
    #[serde(with = "crate::serde_decimal")]
    pub q: BigUint,
    #[serde(rename = "phi_n", with = "crate::serde_decimal")]
    pub lambda: BigUint,
}

#[cfg(not(feature = "expose-secret"))]
impl fmt::Debug for Factorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factorization").finish_non_exhaustive()
    }
}

impl From<&KeyDiagnostics> for Factorization {
    fn from(diagnostics: &KeyDiagnostics) -> Self {
        Self {
            p: diagnostics.p.clone(),
            q: diagnostics.q.clone(),
            lambda: diagnostics.lambda.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignatureReport {
    pub username: String,
    pub message: String,
    pub signature: Signature,
    /// SHA-256 of the message, hex encoded.
    pub hash_hex: String,
    #[serde(with = "crate::serde_decimal")]
    pub hash_int: BigUint,
    /// Digest after reduction modulo `n`.
    #[serde(with = "crate::serde_decimal")]
    pub signed_hash: BigUint,
    #[serde(with = "crate::serde_decimal")]
    pub n: BigUint,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub username: String,
    pub message: String,
    pub signature: Signature,
    pub is_valid: bool,
    #[serde(with = "crate::serde_decimal")]
    pub computed_hash: BigUint,
    #[serde(with = "crate::serde_decimal")]
    pub recovered_hash: BigUint,
    pub hash_hex: String,
    #[serde(with = "crate::serde_decimal")]
    pub n: BigUint,
    #[serde(with = "crate::serde_decimal")]
    pub e: BigUint,
}

/// Multi-user encryption and signing over a borrowed [`KeyRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct SecureMessaging<'a> {
    registry: &'a KeyRegistry,
}

impl<'a> SecureMessaging<'a> {
    pub fn new(registry: &'a KeyRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a KeyRegistry {
        self.registry
    }

    /// Generate a key pair for `username` from fresh entropy and register it.
    pub fn generate_keypair(&self, username: &str, bits: usize) -> Result<KeyGeneration> {
        let mut rng = StdRng::from_entropy();
        self.generate_keypair_with_rng(username, bits, &mut rng)
    }

    /// Generate a key pair for `username` using `rng` and register it,
    /// replacing any existing entry.
    pub fn generate_keypair_with_rng<R: Rng + ?Sized>(
        &self,
        username: &str,
        bits: usize,
        rng: &mut R,
    ) -> Result<KeyGeneration> {
        if username.is_empty() {
            return Err(Error::InvalidParameter("username must not be empty".into()));
        }

        let key_pair = KeyPairBuilder::new().bit_length(bits).build_with_rng(rng)?;
        let generation = KeyGeneration {
            username: username.to_string(),
            public_key: key_pair.public_key().clone(),
            private_key: key_pair.private_key().clone(),
            key_generation_details: key_pair.diagnostics().clone(),
        };

        self.registry.register(username, key_pair);
        tracing::info!(username, bits, "generated key pair");

        Ok(generation)
    }

    /// Encrypt `message` from `sender` to `receiver` with the receiver's public key.
    ///
    /// Both users must be registered.
    pub fn send_message(&self, sender: &str, receiver: &str, message: &str) -> Result<Ciphertext> {
        if !self.registry.contains(sender) {
            return Err(Error::UserNotFound(sender.to_string()));
        }

        let public_key = self.registry.get_public(receiver)?;
        let ciphertext = public_key.encrypt_str(message)?;
        tracing::debug!(sender, receiver, units = ciphertext.len(), "encrypted message");

        Ok(ciphertext)
    }

    /// Decrypt a message addressed to `receiver` with their private key.
    pub fn receive_message(&self, receiver: &str, ciphertext: &Ciphertext) -> Result<String> {
        let private_key = self.registry.get_private(receiver)?;
        let message = private_key.decrypt_str(ciphertext)?;
        tracing::debug!(receiver, units = ciphertext.len(), "decrypted message");

        Ok(message)
    }

    /// Sign `message` with `username`'s private key.
    pub fn sign(&self, username: &str, message: &str) -> Result<SignatureReport> {
        let private_key = self.registry.get_private(username)?;
        let signing = private_key.sign_detailed(message)?;

        Ok(SignatureReport {
            username: username.to_string(),
            message: message.to_string(),
            signature: signing.signature,
            hash_hex: signing.digest.hex().to_string(),
            hash_int: signing.digest.value().clone(),
            signed_hash: signing.signed_hash,
            n: private_key.n().clone(),
        })
    }

    /// Verify `signature` over `message` against `username`'s public key.
    pub fn verify(
        &self,
        username: &str,
        message: &str,
        signature: &Signature,
    ) -> Result<VerificationReport> {
        let public_key = self.registry.get_public(username)?;
        let verification = public_key.verify_detailed(message, signature);

        Ok(VerificationReport {
            username: username.to_string(),
            message: message.to_string(),
            signature: signature.clone(),
            is_valid: verification.is_valid,
            computed_hash: verification.computed_hash,
            recovered_hash: verification.recovered_hash,
            hash_hex: verification.digest.hex().to_string(),
            n: public_key.n().clone(),
            e: public_key.e().clone(),
        })
    }

    /// Every registered user with their public key only.
    pub fn list_users(&self) -> Vec<UserSummary> {
        self.registry
            .list()
            .into_iter()
            .map(|(username, public_key)| UserSummary {
                username,
                public_key,
            })
            .collect()
    }

    pub fn get_user(&self, username: &str) -> Result<UserDetails> {
        let identity = self.registry.identity(username)?;

        Ok(UserDetails {
            username: identity.username().to_string(),
            public_key: identity.public_key().clone(),
            has_private_key: true,
            key_details: Factorization::from(identity.diagnostics()),
        })
    }
}
