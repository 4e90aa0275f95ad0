// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;

/// Errors that can occur during number-theoretic and cryptographic operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Modular inverse does not exist")]
    NoInverseExists,

    #[error("Key pair generation failed: {0}")]
    KeypairGenerationFailed(String),

    #[error("Message value {unit} is too large for modulus {modulus}")]
    MessageTooLarge { unit: BigUint, modulus: BigUint },

    #[error("Ciphertext value {unit} is out of range for modulus {modulus}")]
    InvalidCiphertext { unit: BigUint, modulus: BigUint },

    #[error("Value {0} is not a valid Unicode code point")]
    InvalidCodepoint(BigUint),

    #[error("User {0} not found")]
    UserNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
