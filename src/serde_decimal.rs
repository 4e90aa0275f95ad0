// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serde adapter rendering big integers as decimal strings.
//!
//! JSON numbers cannot carry arbitrary precision, so every `BigUint` crossing
//! a serialization boundary is written as `"12345"`.

use num_bigint_dig::BigUint;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &BigUint, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_str_radix(10))
}

pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<BigUint, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BigUint::parse_bytes(s.trim().as_bytes(), 10)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid decimal integer: {s}")))
}

/// Same encoding for ordered sequences of integers.
pub mod seq {
    use num_bigint_dig::BigUint;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(values: &[BigUint], serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&value.to_str_radix(10))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Vec<BigUint>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|s| {
                BigUint::parse_bytes(s.trim().as_bytes(), 10).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid decimal integer: {s}"))
                })
            })
            .collect()
    }
}
