// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Textbook RSA
//!
//! RSA from first principles: prime generation, key pair derivation,
//! unpadded per-unit encryption and SHA-256 hash-then-sign signatures.
//!
//! ## Security
//!
//! This is a teaching engine, not a cryptographic library. Primes are found
//! by trial division and are tiny by default, no operation is constant-time,
//! nothing is padded, and identical plaintext units always produce identical
//! ciphertext units. Private material is still zeroized on drop.
//!
//! ## Example
//!
//! ```rust,no_run
//! use textbook_rsa::{Decrypt, Encrypt, KeyPairBuilder, Sign, Verify};
//!
//! let keypair = KeyPairBuilder::new().bit_length(8).build().expect("key generation failed");
//!
//! let ciphertext = keypair.public_key().encrypt_str("HI").expect("encryption failed");
//! let decrypted = keypair.private_key().decrypt_str(&ciphertext).expect("decryption failed");
//! assert_eq!(decrypted, "HI");
//!
//! let signature = keypair.private_key().sign("hello").expect("signing failed");
//! assert!(keypair.public_key().verify("hello", &signature));
//! ```

mod cipher;
mod ciphertext;
mod error;
mod key;
pub mod math;
mod registry;
mod serde_decimal;
mod service;
mod signature;

pub use cipher::*;
pub use ciphertext::*;
pub use error::*;
pub use key::*;
pub use math::Primality;
pub use registry::*;
pub use service::*;
pub use signature::*;
