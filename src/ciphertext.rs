// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::ops::Deref;

use num_bigint_dig::BigUint;
use serde::{Deserialize, Serialize};

/// Ordered sequence of encrypted units, one per plaintext unit.
///
/// Every unit of a ciphertext produced under modulus `n` satisfies `0 <= c < n`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ciphertext {
    #[serde(with = "crate::serde_decimal::seq")]
    units: Vec<BigUint>,
}

impl Ciphertext {
    pub fn new(units: Vec<BigUint>) -> Self {
        Self { units }
    }

    pub fn units(&self) -> &[BigUint] {
        &self.units
    }

    pub fn into_units(self) -> Vec<BigUint> {
        self.units
    }
}

impl Deref for Ciphertext {
    type Target = [BigUint];

    fn deref(&self) -> &Self::Target {
        &self.units
    }
}

impl From<Vec<BigUint>> for Ciphertext {
    fn from(units: Vec<BigUint>) -> Self {
        Self::new(units)
    }
}

impl FromIterator<BigUint> for Ciphertext {
    fn from_iter<I: IntoIterator<Item = BigUint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Ciphertext {
    type Item = &'a BigUint;
    type IntoIter = std::slice::Iter<'a, BigUint>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ciphertext_serialization() {
        let c: Ciphertext = [72u32, 0xDEADBEEF].into_iter().map(BigUint::from).collect();

        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"["72","3735928559"]"#);

        let restored: Ciphertext = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, c);
        assert_eq!(restored.len(), 2);
    }

    #[test]
    fn rejects_non_decimal_units() {
        let result = serde_json::from_str::<Ciphertext>(r#"["12","0x1f"]"#);
        assert!(result.is_err());
    }
}
